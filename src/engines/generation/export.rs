use crate::engines::generation::genome::{Chromosome, Gene};
use crate::types::{Condition, Direction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Converts a chromosome into an external strategy description.
///
/// Implementations must be deterministic and pure.
pub trait StrategyExporter {
    type Document;

    fn export(&self, chromosome: &Chromosome) -> Self::Document;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub indicator: String,
    pub params: BTreeMap<String, f64>,
    pub output: Option<String>,
    pub condition: Condition,
    pub threshold: f64,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSpec {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<SideRisk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<SideRisk>,
}

/// Per-direction risk, falling back to the global values when not overridden
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideRisk {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDocument {
    pub id: String,
    pub direction: Direction,
    /// All entry rules must hold (AND)
    pub entry_rules: Vec<RuleSpec>,
    /// Any exit rule closes the position (OR)
    pub exit_rules: Vec<RuleSpec>,
    pub risk: RiskSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_hours: Option<(u8, u8)>,
}

impl StrategyDocument {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One-line summary, e.g. `LONG: RSI(period=14) < 30.00 => RSI(period=14) > 70.00`
    pub fn to_formula_short(&self, max_len: usize) -> String {
        let join = |rules: &[RuleSpec], sep: &str| {
            rules.iter().map(|r| r.formula.as_str()).collect::<Vec<_>>().join(sep)
        };
        let formula = format!(
            "{}: {} => {}",
            self.direction,
            join(&self.entry_rules, " AND "),
            join(&self.exit_rules, " OR ")
        );

        if formula.chars().count() <= max_len {
            formula
        } else {
            let truncated: String = formula.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", truncated)
        }
    }
}

/// Exports to `StrategyDocument`
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExporter;

impl StrategyExporter for DocumentExporter {
    type Document = StrategyDocument;

    fn export(&self, chromosome: &Chromosome) -> StrategyDocument {
        let side = |sl: Option<f64>, tp: Option<f64>| {
            if sl.is_none() && tp.is_none() {
                return None;
            }
            Some(SideRisk {
                stop_loss_pct: sl.unwrap_or(chromosome.stop_loss_pct),
                take_profit_pct: tp.unwrap_or(chromosome.take_profit_pct),
            })
        };

        StrategyDocument {
            id: chromosome.id.to_string(),
            direction: chromosome.direction,
            entry_rules: chromosome.entry_genes.iter().map(rule_spec).collect(),
            exit_rules: chromosome.exit_genes.iter().map(rule_spec).collect(),
            risk: RiskSpec {
                stop_loss_pct: chromosome.stop_loss_pct,
                take_profit_pct: chromosome.take_profit_pct,
                long: side(chromosome.long_stop_loss_pct, chromosome.long_take_profit_pct),
                short: side(chromosome.short_stop_loss_pct, chromosome.short_take_profit_pct),
            },
            session_hours: chromosome.time_filter.map(|f| (f.start_hour, f.end_hour)),
        }
    }
}

fn rule_spec(gene: &Gene) -> RuleSpec {
    RuleSpec {
        indicator: gene.indicator.clone(),
        params: gene.params.clone(),
        output: gene.output.clone(),
        condition: gene.condition,
        threshold: gene.threshold,
        formula: gene_formula(gene),
    }
}

/// `MACD(fast=12, signal=9, slow=26).signal crosses above 0.00`
pub fn gene_formula(gene: &Gene) -> String {
    let params = gene
        .params
        .iter()
        .map(|(name, value)| {
            if value.fract() == 0.0 {
                format!("{}={}", name, *value as i64)
            } else {
                format!("{}={:.2}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let output = gene.output.as_ref().map(|o| format!(".{}", o)).unwrap_or_default();

    format!("{}({}){} {} {:.2}", gene.indicator, params, output, gene.condition, gene.threshold)
}
