//! Pareto utilities for multi-objective fitness.
//!
//! Objectives are (sharpe, 1 - drawdown, profit factor), all maximized.
//! Ranking peels fronts iteratively: the non-dominated members of what
//! remains get the current rank and are removed until nothing is left.

use crate::engines::evaluation::fitness::FitnessResult;

/// Check if objective vector A dominates B (all objectives maximized).
/// A dominates B if A is no worse than B in all objectives and strictly better in at least one
pub fn dominates(a_objectives: &[f64], b_objectives: &[f64]) -> bool {
    if a_objectives.len() != b_objectives.len() {
        return false;
    }

    let mut at_least_one_better = false;

    for (&a_val, &b_val) in a_objectives.iter().zip(b_objectives) {
        if b_val > a_val {
            // B is better in this objective, so A does not dominate B
            return false;
        }
        if a_val > b_val {
            at_least_one_better = true;
        }
    }

    at_least_one_better
}

pub fn pareto_dominates(a: &FitnessResult, b: &FitnessResult) -> bool {
    dominates(&a.objectives(), &b.objectives())
}

/// Group indices into fronts, best front first
pub fn pareto_fronts(objectives: &[[f64; 3]]) -> Vec<Vec<usize>> {
    let mut remaining: Vec<usize> = (0..objectives.len()).collect();
    let mut fronts = Vec::new();

    while !remaining.is_empty() {
        let front: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&i| {
                !remaining
                    .iter()
                    .any(|&j| j != i && dominates(&objectives[j], &objectives[i]))
            })
            .collect();

        // NaN objectives can leave every member "dominated"; take the rest as one front.
        if front.is_empty() {
            fronts.push(std::mem::take(&mut remaining));
            break;
        }

        remaining.retain(|i| !front.contains(i));
        fronts.push(front);
    }

    fronts
}

/// Pareto rank per individual (0 = non-dominated front)
pub fn pareto_rank(population: &[FitnessResult]) -> Vec<usize> {
    let objectives: Vec<[f64; 3]> = population.iter().map(FitnessResult::objectives).collect();
    let mut ranks = vec![0; population.len()];

    for (rank, front) in pareto_fronts(&objectives).iter().enumerate() {
        for &idx in front {
            ranks[idx] = rank;
        }
    }

    ranks
}
