//! Genome representation for strategy discovery
//!
//! A chromosome is a complete candidate strategy: a short list of entry
//! conditions, a short list of exit conditions and its risk parameters. Each
//! condition is a `Gene` that compares one indicator output against a
//! threshold.
//!
//! Chromosomes are plain values. Every genetic operator takes its inputs by
//! reference and returns fresh instances, so a chromosome held by the
//! population or the hall of fame is never changed behind its owner's back.
//!
//! # Example
//!
//! ```text
//! entry: RSI(period=14) < 30.00 AND ADX(period=20) > 25.00
//! exit:  RSI(period=14) > 70.00
//! risk:  LONG, SL 2.0%, TP 4.5%
//! ```

use crate::types::{Condition, Direction};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const MIN_ENTRY_GENES: usize = 1;
pub const MAX_ENTRY_GENES: usize = 5;
pub const MIN_EXIT_GENES: usize = 1;
pub const MAX_EXIT_GENES: usize = 3;

pub const STOP_LOSS_RANGE: (f64, f64) = (0.5, 10.0);
pub const TAKE_PROFIT_RANGE: (f64, f64) = (0.5, 20.0);

/// One indicator-based condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub indicator: String,
    pub params: BTreeMap<String, f64>,
    pub condition: Condition,
    pub threshold: f64,
    /// Output selector for multi-output indicators (e.g. MACD "signal")
    pub output: Option<String>,
}

/// Trading session window, hours in 0..=23
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFilter {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl TimeFilter {
    pub fn is_valid(&self) -> bool {
        self.start_hour < 24 && self.end_hour < 24
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    pub id: Uuid,
    pub entry_genes: Vec<Gene>,
    pub exit_genes: Vec<Gene>,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub direction: Direction,
    pub long_stop_loss_pct: Option<f64>,
    pub long_take_profit_pct: Option<f64>,
    pub short_stop_loss_pct: Option<f64>,
    pub short_take_profit_pct: Option<f64>,
    pub time_filter: Option<TimeFilter>,
}

impl Chromosome {
    pub fn gene_count(&self) -> usize {
        self.entry_genes.len() + self.exit_genes.len()
    }

    pub fn has_direction_overrides(&self) -> bool {
        self.long_stop_loss_pct.is_some()
            || self.long_take_profit_pct.is_some()
            || self.short_stop_loss_pct.is_some()
            || self.short_take_profit_pct.is_some()
    }

    /// Same strategy under a new identity
    pub fn with_new_id<R: Rng>(&self, rng: &mut R) -> Self {
        Self {
            id: new_id(rng),
            ..self.clone()
        }
    }
}

/// Chromosome ids come from the run's RNG so seeded runs reproduce them
pub fn new_id<R: Rng>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}
