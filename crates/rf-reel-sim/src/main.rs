//! reel-sim: headless reel spin driver
//!
//! Builds an orchestrator from a config file or preset, drives it at a fixed
//! frame rate and prints the spin event trace.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;

use rf_reel_spin::{
    HeadlessLayout, ReelSpinOrchestrator, SpinConfig, SpinEvent, SpinEventKind, SpinProfile,
    StyleConfig, estimate_spin,
};

#[derive(Parser, Debug)]
#[command(name = "reel-sim", version, about = "Drive reel spin sessions headlessly")]
struct Args {
    /// Config file (.json, .yaml, .yml); overrides --profile
    #[arg(long)]
    config: Option<PathBuf>,

    /// Style preset: classic, turbo, elastic
    #[arg(long, default_value = "classic")]
    profile: String,

    /// Reel count (3-5)
    #[arg(long)]
    reels: Option<usize>,

    /// Number of spins to run
    #[arg(long, default_value_t = 1)]
    spins: u32,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// RNG seed for reproducible symbols
    #[arg(long)]
    seed: Option<u64>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Give up on a spin after this many simulated seconds
    #[arg(long, default_value_t = 60.0)]
    max_secs: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be positive, got {}", args.fps);
    }

    let config = build_config(&args)?;
    let estimate = estimate_spin(&config.style, config.reel_count, &config.bounds, &config.motion);
    log::info!(
        "{} reels, {:?}/{:?}, estimated {:.3}s out + {:.3}s in",
        config.reel_count,
        config.style.out_style,
        config.style.in_style,
        estimate.out_secs,
        estimate.in_secs
    );

    let reel_count = config.reel_count;
    let mut slots = ReelSpinOrchestrator::with_layout(
        config,
        Box::new(HeadlessLayout::new(reel_count)),
    )
    .context("building orchestrator")?;

    let frame_delta = 1.0 / args.fps;
    let max_frames = (args.max_secs * args.fps).ceil() as u64;

    for _ in 0..args.spins {
        if !slots.trigger_spin() {
            bail!("spin trigger rejected while idle");
        }

        let mut frames = 0u64;
        while slots.is_spinning() {
            slots.advance(frame_delta);
            frames += 1;
            if frames > max_frames {
                bail!("spin did not complete within {}s", args.max_secs);
            }
        }

        for event in slots.drain_events() {
            print_event(&event, args.json)?;
        }

        if let Some(outcome) = slots.last_outcome() {
            if !args.json {
                println!(
                    "spin {} done in {:.3}s ({} frames){}",
                    outcome.session_id,
                    outcome.total_secs(),
                    frames,
                    if outcome.all_match() { " MATCH" } else { "" }
                );
            }
        }
    }

    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<SpinConfig> {
    let mut config = match &args.config {
        Some(path) => SpinConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let profile: SpinProfile = args.profile.parse()?;
            SpinConfig::new(3, StyleConfig::from_profile(profile))
        }
    };

    if let Some(reels) = args.reels {
        config.reel_count = reels;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    config.validate()?;
    Ok(config)
}

fn print_event(event: &SpinEvent, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let detail = match &event.kind {
        SpinEventKind::SpinStarted {
            reel_count,
            out_style,
            in_style,
        } => format!("{reel_count} reels, {out_style:?} -> {in_style:?}"),
        SpinEventKind::PhaseChanged { from, to } => format!("{from:?} -> {to:?}"),
        SpinEventKind::ReelArrived { phase, reel, offset } => {
            format!("reel {reel} at {offset:.1} ({phase:?})")
        }
        SpinEventKind::SymbolsAssigned { symbols, overlay } => {
            let names: Vec<String> = symbols.iter().map(ToString::to_string).collect();
            if overlay.is_empty() {
                names.join(" ")
            } else {
                format!("{} (overlay {})", names.join(" "), overlay.len())
            }
        }
        SpinEventKind::OverlayReleased { forced } => {
            if *forced { "forced".into() } else { "window".into() }
        }
        SpinEventKind::SpinCompleted { symbols } => format!("{} symbols", symbols.len()),
        SpinEventKind::OverlayShown | SpinEventKind::OverlayHolding => String::new(),
    };

    println!(
        "{:>9.1}ms  #{:<4} {:<18} {}",
        event.timestamp_ms,
        event.session_id,
        event.type_name(),
        detail
    );
    Ok(())
}
