//! Symbol definitions and sampling

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};

/// Symbol identifier shown on a reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: SymbolId,
    /// Display name (e.g., "CHERRY", "SEVEN")
    pub name: String,
    /// Payout multiplier carried for the match check collaborator
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

impl Symbol {
    /// Create a symbol
    pub fn new(id: u32, name: impl Into<String>, multiplier: f64) -> Self {
        Self {
            id: SymbolId(id),
            name: name.into(),
            multiplier,
        }
    }
}

/// Fixed set of symbols a reel can land on
///
/// Sampling is uniform and with replacement: every reel draws independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
}

impl SymbolSet {
    /// Create a set, rejecting empty sets and duplicate ids
    pub fn new(symbols: Vec<Symbol>) -> ReelResult<Self> {
        if symbols.is_empty() {
            return Err(ReelError::EmptySymbolSet);
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if !seen.insert(symbol.id) {
                return Err(ReelError::DuplicateSymbol(symbol.id.0));
            }
        }

        Ok(Self { symbols })
    }

    /// Classic fruit-machine set
    pub fn classic() -> Self {
        Self {
            symbols: vec![
                Symbol::new(1, "CHERRY", 2.0),
                Symbol::new(2, "LEMON", 3.0),
                Symbol::new(3, "ORANGE", 4.0),
                Symbol::new(4, "PLUM", 5.0),
                Symbol::new(5, "BELL", 10.0),
                Symbol::new(6, "BAR", 20.0),
                Symbol::new(7, "SEVEN", 50.0),
            ],
        }
    }

    /// Get symbol by ID
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Check whether an id belongs to this set
    pub fn contains(&self, id: SymbolId) -> bool {
        self.get(id).is_some()
    }

    /// All symbol IDs in definition order
    pub fn ids(&self) -> Vec<SymbolId> {
        self.symbols.iter().map(|s| s.id).collect()
    }

    /// Draw one symbol uniformly at random
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SymbolId {
        // Non-empty by construction.
        let idx = rng.random_range(0..self.symbols.len());
        self.symbols[idx].id
    }

    /// Draw `count` symbols independently
    pub fn sample_many<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<SymbolId> {
        (0..count).map(|_| self.sample(rng)).collect()
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed set
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate symbols
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::classic()
    }
}

impl TryFrom<Vec<Symbol>> for SymbolSet {
    type Error = ReelError;

    fn try_from(symbols: Vec<Symbol>) -> ReelResult<Self> {
        Self::new(symbols)
    }
}

impl From<SymbolSet> for Vec<Symbol> {
    fn from(set: SymbolSet) -> Self {
        set.symbols
    }
}
