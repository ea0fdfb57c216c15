use crate::engines::generation::genome::*;
use crate::error::{DiscoveryError, Result};
use crate::utils::indicator_metadata::ParameterSpace;

/// Structural validity checks for chromosomes against a parameter space
pub struct ChromosomeValidator<'a> {
    space: &'a ParameterSpace,
}

impl<'a> ChromosomeValidator<'a> {
    pub fn new(space: &'a ParameterSpace) -> Self {
        Self { space }
    }

    pub fn is_valid(&self, chromosome: &Chromosome) -> bool {
        self.violations(chromosome).is_empty()
    }

    /// Validate gene counts, genes, and risk parameters
    pub fn validate(&self, chromosome: &Chromosome) -> Result<()> {
        let violations = self.violations(chromosome);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DiscoveryError::Validation(violations.join("; ")))
        }
    }

    pub fn violations(&self, chromosome: &Chromosome) -> Vec<String> {
        let mut violations = Vec::new();

        let entries = chromosome.entry_genes.len();
        if !(MIN_ENTRY_GENES..=MAX_ENTRY_GENES).contains(&entries) {
            violations.push(format!(
                "entry gene count {} outside [{}, {}]",
                entries, MIN_ENTRY_GENES, MAX_ENTRY_GENES
            ));
        }
        let exits = chromosome.exit_genes.len();
        if !(MIN_EXIT_GENES..=MAX_EXIT_GENES).contains(&exits) {
            violations.push(format!(
                "exit gene count {} outside [{}, {}]",
                exits, MIN_EXIT_GENES, MAX_EXIT_GENES
            ));
        }

        for (i, gene) in chromosome.entry_genes.iter().enumerate() {
            self.check_gene(gene, &format!("entry[{}]", i), &mut violations);
        }
        for (i, gene) in chromosome.exit_genes.iter().enumerate() {
            self.check_gene(gene, &format!("exit[{}]", i), &mut violations);
        }

        check_pct("stop_loss_pct", Some(chromosome.stop_loss_pct), STOP_LOSS_RANGE, &mut violations);
        check_pct("take_profit_pct", Some(chromosome.take_profit_pct), TAKE_PROFIT_RANGE, &mut violations);
        check_pct("long_stop_loss_pct", chromosome.long_stop_loss_pct, STOP_LOSS_RANGE, &mut violations);
        check_pct("long_take_profit_pct", chromosome.long_take_profit_pct, TAKE_PROFIT_RANGE, &mut violations);
        check_pct("short_stop_loss_pct", chromosome.short_stop_loss_pct, STOP_LOSS_RANGE, &mut violations);
        check_pct("short_take_profit_pct", chromosome.short_take_profit_pct, TAKE_PROFIT_RANGE, &mut violations);

        if let Some(filter) = chromosome.time_filter {
            if !filter.is_valid() {
                violations.push(format!(
                    "time filter hours {}-{} outside 0-23",
                    filter.start_hour, filter.end_hour
                ));
            }
        }

        // Direction validity is carried by the enum type itself.
        violations
    }

    fn check_gene(&self, gene: &Gene, label: &str, violations: &mut Vec<String>) {
        let Some(spec) = self.space.get(&gene.indicator) else {
            violations.push(format!("{}: unknown indicator {}", label, gene.indicator));
            return;
        };

        for range in spec.params {
            match gene.params.get(range.name) {
                Some(&value) if range.contains(value) => {}
                Some(&value) => violations.push(format!(
                    "{}: {}.{} = {} outside [{}, {}]",
                    label, spec.name, range.name, value, range.min, range.max
                )),
                None => violations.push(format!(
                    "{}: {} missing parameter {}",
                    label, spec.name, range.name
                )),
            }
        }
        for name in gene.params.keys() {
            if spec.param(name).is_none() {
                violations.push(format!("{}: {} has no parameter {}", label, spec.name, name));
            }
        }

        if !spec.constraints_hold(&gene.params) {
            violations.push(format!("{}: {} cross-parameter constraint violated", label, spec.name));
        }

        if !spec.threshold_in_range(gene.threshold) {
            violations.push(format!(
                "{}: {} threshold {} outside its range",
                label, spec.name, gene.threshold
            ));
        }

        if let Some(output) = &gene.output {
            if !spec.outputs.contains(&output.as_str()) {
                violations.push(format!("{}: {} has no output {}", label, spec.name, output));
            }
        }
    }
}

fn check_pct(name: &str, value: Option<f64>, (lo, hi): (f64, f64), violations: &mut Vec<String>) {
    if let Some(value) = value {
        if !(value >= lo && value <= hi) {
            violations.push(format!("{} = {} outside [{}, {}]", name, value, lo, hi));
        }
    }
}
