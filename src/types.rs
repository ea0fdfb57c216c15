use serde::{Deserialize, Serialize};
use std::fmt;

/// How an indicator's output relates to a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorCategory {
    BoundedOscillator, // Fixed scale (RSI, CCI, Williams %R)
    PriceRelative,     // Follows price, only crossings are meaningful (MACD, MA crosses)
}

/// Comparison between an indicator value and a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    CrossesAbove,
    CrossesBelow,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::GreaterThan,
        Condition::LessThan,
        Condition::GreaterOrEqual,
        Condition::LessOrEqual,
        Condition::CrossesAbove,
        Condition::CrossesBelow,
    ];

    pub const CROSSING: [Condition; 2] = [Condition::CrossesAbove, Condition::CrossesBelow];

    /// Logical complement used by the condition-flip mutation
    pub fn complement(self) -> Self {
        match self {
            Condition::GreaterThan => Condition::LessThan,
            Condition::LessThan => Condition::GreaterThan,
            Condition::GreaterOrEqual => Condition::LessOrEqual,
            Condition::LessOrEqual => Condition::GreaterOrEqual,
            Condition::CrossesAbove => Condition::CrossesBelow,
            Condition::CrossesBelow => Condition::CrossesAbove,
        }
    }

    pub fn is_crossing(self) -> bool {
        matches!(self, Condition::CrossesAbove | Condition::CrossesBelow)
    }

    /// Crossing counterpart of a comparison (GT/GTE -> above, LT/LTE -> below)
    pub fn to_crossing(self) -> Self {
        match self {
            Condition::GreaterThan | Condition::GreaterOrEqual | Condition::CrossesAbove => {
                Condition::CrossesAbove
            }
            Condition::LessThan | Condition::LessOrEqual | Condition::CrossesBelow => {
                Condition::CrossesBelow
            }
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Condition::GreaterThan => ">",
            Condition::LessThan => "<",
            Condition::GreaterOrEqual => ">=",
            Condition::LessOrEqual => "<=",
            Condition::CrossesAbove => "crosses above",
            Condition::CrossesBelow => "crosses below",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Trading direction of a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
    Both,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Long, Direction::Short, Direction::Both];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
            Direction::Both => "BOTH",
        };
        f.write_str(name)
    }
}
