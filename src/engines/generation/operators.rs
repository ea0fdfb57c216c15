use crate::engines::generation::genome::*;
use crate::error::{DiscoveryError, Result};
use crate::types::{Condition, Direction, IndicatorCategory};
use crate::utils::indicator_metadata::{IndicatorSpec, ParameterSpace};
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Relative jitter applied by every perturbation (±20%)
pub const MUTATION_JITTER: f64 = 0.2;

/// Share of the mutation rate used for adding or removing a gene
pub const STRUCTURAL_MUTATION_FACTOR: f64 = 0.3;

/// Share of the mutation rate used for each global risk parameter
pub const GLOBAL_MUTATION_FACTOR: f64 = 0.5;

// Entry counts {1, 2, 3, 4-5} and exit counts {1, 2, 3}
const ENTRY_COUNT_WEIGHTS: [u32; 4] = [50, 30, 15, 5];
const EXIT_COUNT_WEIGHTS: [u32; 3] = [60, 30, 10];

/// Random gene for a specific indicator
pub fn random_gene_for<R: Rng>(spec: &IndicatorSpec, rng: &mut R) -> Gene {
    let params = spec.sample_params(rng);
    let condition = match spec.category {
        IndicatorCategory::BoundedOscillator => Condition::ALL[rng.gen_range(0..Condition::ALL.len())],
        IndicatorCategory::PriceRelative => {
            Condition::CROSSING[rng.gen_range(0..Condition::CROSSING.len())]
        }
    };
    let threshold = match spec.category {
        IndicatorCategory::BoundedOscillator => spec.sample_threshold(rng),
        IndicatorCategory::PriceRelative => 0.0,
    };
    let output = choose_output(spec, rng);

    Gene {
        indicator: spec.name.to_string(),
        params,
        condition,
        threshold,
        output,
    }
}

/// Random gene from a uniformly chosen indicator
pub fn random_gene<R: Rng>(space: &ParameterSpace, rng: &mut R) -> Gene {
    random_gene_for(space.choose(rng), rng)
}

fn choose_output<R: Rng>(spec: &IndicatorSpec, rng: &mut R) -> Option<String> {
    if spec.outputs.is_empty() {
        None
    } else {
        Some(spec.outputs[rng.gen_range(0..spec.outputs.len())].to_string())
    }
}

fn weighted_choice<R: Rng>(weights: &[u32], rng: &mut R) -> usize {
    WeightedIndex::new(weights)
        .map(|dist| dist.sample(rng))
        .unwrap_or(0)
}

fn sample_pct<R: Rng>((lo, hi): (f64, f64), rng: &mut R) -> f64 {
    let value = rng.gen_range(lo..=hi);
    ((value * 100.0).round() / 100.0).clamp(lo, hi)
}

/// Generate a random valid chromosome.
///
/// Gene counts are skewed toward short strategies; strategies with many
/// conjunctive conditions rarely trade at all.
pub fn random_chromosome<R: Rng>(
    space: &ParameterSpace,
    direction_constraint: Option<Direction>,
    rng: &mut R,
) -> Chromosome {
    let id = new_id(rng);

    let entry_count = match weighted_choice(&ENTRY_COUNT_WEIGHTS, rng) {
        0 => 1,
        1 => 2,
        2 => 3,
        _ => rng.gen_range(4..=MAX_ENTRY_GENES),
    };
    let exit_count = weighted_choice(&EXIT_COUNT_WEIGHTS, rng) + 1;

    let entry_genes = (0..entry_count).map(|_| random_gene(space, rng)).collect();
    let exit_genes = (0..exit_count).map(|_| random_gene(space, rng)).collect();

    let direction = direction_constraint
        .unwrap_or_else(|| Direction::ALL[rng.gen_range(0..Direction::ALL.len())]);
    let stop_loss_pct = sample_pct(STOP_LOSS_RANGE, rng);
    let take_profit_pct = sample_pct(TAKE_PROFIT_RANGE, rng);

    let mut chromosome = Chromosome {
        id,
        entry_genes,
        exit_genes,
        stop_loss_pct,
        take_profit_pct,
        direction,
        long_stop_loss_pct: None,
        long_take_profit_pct: None,
        short_stop_loss_pct: None,
        short_take_profit_pct: None,
        time_filter: None,
    };

    if direction == Direction::Both {
        chromosome.long_stop_loss_pct = Some(sample_pct(STOP_LOSS_RANGE, rng));
        chromosome.long_take_profit_pct = Some(sample_pct(TAKE_PROFIT_RANGE, rng));
        chromosome.short_stop_loss_pct = Some(sample_pct(STOP_LOSS_RANGE, rng));
        chromosome.short_take_profit_pct = Some(sample_pct(TAKE_PROFIT_RANGE, rng));
    }

    chromosome
}

/// Generate the initial population
pub fn initialize_population<R: Rng>(
    size: usize,
    direction_constraint: Option<Direction>,
    space: &ParameterSpace,
    rng: &mut R,
) -> Vec<Chromosome> {
    (0..size)
        .map(|_| random_chromosome(space, direction_constraint, rng))
        .collect()
}

/// Uniform gene-wise crossover with length drift.
///
/// Positions both parents fill are split between the children; positions
/// only one parent fills are inherited by each child with probability 0.5.
/// Risk fields are inherited per child by independent coin flips.
pub fn crossover<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    space: &ParameterSpace,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let (entry1, entry2) = cross_genes(&parent1.entry_genes, &parent2.entry_genes, rng);
    let (exit1, exit2) = cross_genes(&parent1.exit_genes, &parent2.exit_genes, rng);

    let child1 = assemble_child(parent1, parent2, entry1, exit1, space, rng);
    let child2 = assemble_child(parent1, parent2, entry2, exit2, space, rng);
    (child1, child2)
}

fn cross_genes<R: Rng>(genes1: &[Gene], genes2: &[Gene], rng: &mut R) -> (Vec<Gene>, Vec<Gene>) {
    let len = genes1.len().max(genes2.len());
    let mut child1 = Vec::with_capacity(len);
    let mut child2 = Vec::with_capacity(len);

    for i in 0..len {
        match (genes1.get(i), genes2.get(i)) {
            (Some(a), Some(b)) => {
                if rng.gen_bool(0.5) {
                    child1.push(a.clone());
                    child2.push(b.clone());
                } else {
                    child1.push(b.clone());
                    child2.push(a.clone());
                }
            }
            (Some(only), None) | (None, Some(only)) => {
                if rng.gen_bool(0.5) {
                    child1.push(only.clone());
                }
                if rng.gen_bool(0.5) {
                    child2.push(only.clone());
                }
            }
            (None, None) => {}
        }
    }

    (child1, child2)
}

fn pick<T: Clone, R: Rng>(a: &T, b: &T, rng: &mut R) -> T {
    if rng.gen_bool(0.5) {
        a.clone()
    } else {
        b.clone()
    }
}

fn assemble_child<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    mut entry_genes: Vec<Gene>,
    mut exit_genes: Vec<Gene>,
    space: &ParameterSpace,
    rng: &mut R,
) -> Chromosome {
    clamp_gene_count(&mut entry_genes, MIN_ENTRY_GENES, MAX_ENTRY_GENES, space, rng);
    clamp_gene_count(&mut exit_genes, MIN_EXIT_GENES, MAX_EXIT_GENES, space, rng);

    Chromosome {
        id: new_id(rng),
        entry_genes,
        exit_genes,
        stop_loss_pct: pick(&parent1.stop_loss_pct, &parent2.stop_loss_pct, rng),
        take_profit_pct: pick(&parent1.take_profit_pct, &parent2.take_profit_pct, rng),
        direction: pick(&parent1.direction, &parent2.direction, rng),
        long_stop_loss_pct: pick(&parent1.long_stop_loss_pct, &parent2.long_stop_loss_pct, rng),
        long_take_profit_pct: pick(&parent1.long_take_profit_pct, &parent2.long_take_profit_pct, rng),
        short_stop_loss_pct: pick(&parent1.short_stop_loss_pct, &parent2.short_stop_loss_pct, rng),
        short_take_profit_pct: pick(&parent1.short_take_profit_pct, &parent2.short_take_profit_pct, rng),
        time_filter: pick(&parent1.time_filter, &parent2.time_filter, rng),
    }
}

fn clamp_gene_count<R: Rng>(
    genes: &mut Vec<Gene>,
    min: usize,
    max: usize,
    space: &ParameterSpace,
    rng: &mut R,
) {
    while genes.len() < min {
        genes.push(random_gene(space, rng));
    }
    genes.truncate(max);
}

fn jitter<R: Rng>(rng: &mut R) -> f64 {
    1.0 + rng.gen_range(-MUTATION_JITTER..=MUTATION_JITTER)
}

/// Mutate a copy of `chromosome`; the input is left untouched.
///
/// Each gene mutates with probability `rate`. Gene-list length changes with
/// probability `rate * 0.3` per list, and each risk parameter with
/// probability `rate * 0.5`.
pub fn mutate<R: Rng>(
    chromosome: &Chromosome,
    rate: f64,
    space: &ParameterSpace,
    rng: &mut R,
) -> Chromosome {
    let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    let mut child = chromosome.with_new_id(rng);

    for gene in child.entry_genes.iter_mut().chain(child.exit_genes.iter_mut()) {
        if rng.gen_bool(rate) {
            mutate_gene(gene, space, rng);
        }
    }

    let structural_rate = rate * STRUCTURAL_MUTATION_FACTOR;
    mutate_structure(&mut child.entry_genes, MIN_ENTRY_GENES, MAX_ENTRY_GENES, structural_rate, space, rng);
    mutate_structure(&mut child.exit_genes, MIN_EXIT_GENES, MAX_EXIT_GENES, structural_rate, space, rng);

    let global_rate = rate * GLOBAL_MUTATION_FACTOR;
    if rng.gen_bool(global_rate) {
        child.stop_loss_pct = perturb_pct(child.stop_loss_pct, STOP_LOSS_RANGE, rng);
    }
    if rng.gen_bool(global_rate) {
        child.take_profit_pct = perturb_pct(child.take_profit_pct, TAKE_PROFIT_RANGE, rng);
    }
    for (value, range) in [
        (&mut child.long_stop_loss_pct, STOP_LOSS_RANGE),
        (&mut child.long_take_profit_pct, TAKE_PROFIT_RANGE),
        (&mut child.short_stop_loss_pct, STOP_LOSS_RANGE),
        (&mut child.short_take_profit_pct, TAKE_PROFIT_RANGE),
    ] {
        if let Some(current) = value {
            if rng.gen_bool(global_rate) {
                *current = perturb_pct(*current, range, rng);
            }
        }
    }

    child
}

fn perturb_pct<R: Rng>(value: f64, (lo, hi): (f64, f64), rng: &mut R) -> f64 {
    (value * jitter(rng)).clamp(lo, hi)
}

fn mutate_structure<R: Rng>(
    genes: &mut Vec<Gene>,
    min: usize,
    max: usize,
    rate: f64,
    space: &ParameterSpace,
    rng: &mut R,
) {
    if !rng.gen_bool(rate) {
        return;
    }
    if rng.gen_bool(0.5) {
        if genes.len() < max {
            genes.push(random_gene(space, rng));
        }
    } else if genes.len() > min {
        let idx = rng.gen_range(0..genes.len());
        genes.remove(idx);
    }
}

/// Apply exactly one of: indicator swap, parameter perturbation,
/// condition flip, threshold perturbation
fn mutate_gene<R: Rng>(gene: &mut Gene, space: &ParameterSpace, rng: &mut R) {
    let Some(spec) = space.get(&gene.indicator) else {
        debug!("Replacing gene with unknown indicator {}", gene.indicator);
        *gene = random_gene(space, rng);
        return;
    };

    match rng.gen_range(0..4) {
        0 => {
            let new_spec = space.choose(rng);
            swap_indicator(gene, new_spec, rng);
        }
        1 => {
            for (name, value) in gene.params.iter_mut() {
                if let Some(range) = spec.param(name) {
                    *value = range.clamp(*value * jitter(rng));
                }
            }
            spec.enforce_constraints(&mut gene.params);
        }
        2 => {
            gene.condition = gene.condition.complement();
        }
        _ => {
            gene.threshold = perturb_threshold(spec, gene.threshold, rng);
        }
    }
}

/// Replace the gene's indicator, resampling params, threshold and output.
/// Price-relative targets take a zero threshold and a crossing condition.
fn swap_indicator<R: Rng>(gene: &mut Gene, new_spec: &IndicatorSpec, rng: &mut R) {
    gene.indicator = new_spec.name.to_string();
    gene.params = new_spec.sample_params(rng);
    gene.threshold = new_spec.sample_threshold(rng);
    gene.output = choose_output(new_spec, rng);
    if new_spec.category == IndicatorCategory::PriceRelative {
        gene.threshold = 0.0;
        gene.condition = gene.condition.to_crossing();
    }
}

/// Relative jitter, or an absolute ±jitter window around zero so a zero
/// threshold can still move
fn perturb_threshold<R: Rng>(spec: &IndicatorSpec, threshold: f64, rng: &mut R) -> f64 {
    if spec.threshold_range.is_none() {
        return 0.0;
    }
    let moved = if threshold == 0.0 {
        rng.gen_range(-MUTATION_JITTER..=MUTATION_JITTER)
    } else {
        threshold * jitter(rng)
    };
    spec.clamp_threshold(moved)
}

fn check_selection_input(population: &[Chromosome], scores: &[f64]) -> Result<()> {
    if population.is_empty() {
        return Err(DiscoveryError::EmptyPopulation);
    }
    if population.len() != scores.len() {
        return Err(DiscoveryError::PopulationSizeMismatch {
            population: population.len(),
            scores: scores.len(),
        });
    }
    Ok(())
}

/// Tournament selection: best of `tournament_size` distinct random candidates
pub fn tournament_selection<R: Rng>(
    population: &[Chromosome],
    scores: &[f64],
    tournament_size: usize,
    rng: &mut R,
) -> Result<Chromosome> {
    check_selection_input(population, scores)?;

    let k = tournament_size.clamp(1, population.len());
    let contenders = rand::seq::index::sample(rng, population.len(), k);

    let mut best_idx = contenders.index(0);
    for idx in contenders.iter().skip(1) {
        if scores[idx] > scores[best_idx] {
            best_idx = idx;
        }
    }

    Ok(population[best_idx].clone())
}

/// Clones of the `n` highest-scored individuals, best first
pub fn elitism(population: &[Chromosome], scores: &[f64], n: usize) -> Result<Vec<Chromosome>> {
    check_selection_input(population, scores)?;

    let n = n.min(population.len());
    if n == 0 {
        return Ok(Vec::new());
    }

    // Ties resolve toward the lower index so the order is total.
    let by_score_desc = |a: &usize, b: &usize| scores[*b].total_cmp(&scores[*a]).then(a.cmp(b));

    let mut order: Vec<usize> = (0..population.len()).collect();
    if n < order.len() {
        order.select_nth_unstable_by(n - 1, by_score_desc);
        order.truncate(n);
    }
    order.sort_by(by_score_desc);

    Ok(order.into_iter().map(|i| population[i].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::validator::ChromosomeValidator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    #[test]
    fn test_random_chromosomes_are_valid() {
        let space = ParameterSpace::standard();
        let validator = ChromosomeValidator::new(&space);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..300 {
            let chromosome = random_chromosome(&space, None, &mut rng);
            assert!(validator.validate(&chromosome).is_ok(), "{:?}", validator.violations(&chromosome));
            assert_eq!(chromosome.has_direction_overrides(), chromosome.direction == Direction::Both);
        }
    }

    #[test]
    fn test_price_relative_genes_use_crossings() {
        let space = ParameterSpace::standard();
        let macd = space.get("MACD").unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..50 {
            let gene = random_gene_for(macd, &mut rng);
            assert!(gene.condition.is_crossing());
            assert_eq!(gene.threshold, 0.0);
            assert!(gene.output.is_some());
        }
    }

    fn rsi_gene(condition: Condition, threshold: f64) -> Gene {
        Gene {
            indicator: "RSI".to_string(),
            params: BTreeMap::from([("period".to_string(), 14.0)]),
            condition,
            threshold,
            output: None,
        }
    }

    #[test]
    fn test_swap_to_price_relative_coerces_crossing() {
        let space = ParameterSpace::standard();
        let mut rng = StdRng::seed_from_u64(31);

        for (condition, crossing) in [
            (Condition::GreaterThan, Condition::CrossesAbove),
            (Condition::GreaterOrEqual, Condition::CrossesAbove),
            (Condition::LessThan, Condition::CrossesBelow),
            (Condition::LessOrEqual, Condition::CrossesBelow),
            (Condition::CrossesBelow, Condition::CrossesBelow),
        ] {
            for target in ["MACD", "EMA_CROSS", "SMA_CROSS", "BBANDS"] {
                let spec = space.get(target).unwrap();
                let mut gene = rsi_gene(condition, 70.0);
                swap_indicator(&mut gene, spec, &mut rng);

                assert_eq!(gene.indicator, target);
                assert_eq!(gene.condition, crossing);
                assert_eq!(gene.threshold, 0.0);
                assert!(spec.constraints_hold(&gene.params));
                assert_eq!(gene.output.is_some(), !spec.outputs.is_empty());
            }
        }
    }

    #[test]
    fn test_swap_to_bounded_keeps_condition() {
        let space = ParameterSpace::standard();
        let cci = space.get("CCI").unwrap();
        let mut rng = StdRng::seed_from_u64(32);

        for _ in 0..20 {
            let mut gene = rsi_gene(Condition::LessOrEqual, 30.0);
            swap_indicator(&mut gene, cci, &mut rng);
            assert_eq!(gene.indicator, "CCI");
            assert_eq!(gene.condition, Condition::LessOrEqual);
            assert!(cci.threshold_in_range(gene.threshold));
        }
    }

    #[test]
    fn test_mutation_swap_into_price_relative_space() {
        // Every gene mutates, and any swap lands on MACD
        let space = ParameterSpace::restricted(&["RSI".to_string(), "MACD".to_string()]).unwrap();
        let validator = ChromosomeValidator::new(&space);
        let mut rng = StdRng::seed_from_u64(33);

        let mut swapped = 0;
        for _ in 0..100 {
            let mut parent = random_chromosome(&space, None, &mut rng);
            parent.entry_genes = vec![rsi_gene(Condition::GreaterThan, 70.0)];
            let child = mutate(&parent, 1.0, &space, &mut rng);

            for gene in child.entry_genes.iter().filter(|g| g.indicator == "MACD") {
                assert!(gene.condition.is_crossing());
                assert_eq!(gene.threshold, 0.0);
                swapped += 1;
            }
            assert!(validator.is_valid(&child), "{:?}", validator.violations(&child));
        }
        assert!(swapped > 0);
    }

    fn distinct_genes(thresholds: &[f64]) -> Vec<Gene> {
        thresholds.iter().map(|&t| rsi_gene(Condition::LessThan, t)).collect()
    }

    #[test]
    fn test_crossover_genes_come_from_parents() {
        let space = ParameterSpace::standard();
        let mut rng = StdRng::seed_from_u64(40);

        for _ in 0..200 {
            let mut short = random_chromosome(&space, None, &mut rng);
            let mut long = random_chromosome(&space, None, &mut rng);
            short.entry_genes = distinct_genes(&[80.0, 81.0]);
            long.entry_genes = distinct_genes(&[20.0, 21.0, 22.0, 23.0, 24.0]);

            let (child1, child2) = crossover(&short, &long, &space, &mut rng);
            for child in [&child1, &child2] {
                assert!((2..=MAX_ENTRY_GENES).contains(&child.entry_genes.len()));
                for gene in &child.entry_genes {
                    assert!(short.entry_genes.contains(gene) || long.entry_genes.contains(gene));
                }
                for gene in &child.exit_genes {
                    assert!(short.exit_genes.contains(gene) || long.exit_genes.contains(gene));
                }
            }

            // Shared positions are split between the children
            for i in 0..2 {
                let pair = (&child1.entry_genes[i], &child2.entry_genes[i]);
                assert!(
                    pair == (&short.entry_genes[i], &long.entry_genes[i])
                        || pair == (&long.entry_genes[i], &short.entry_genes[i])
                );
            }
        }
    }

    #[test]
    fn test_crossover_length_drift() {
        let space = ParameterSpace::standard();
        let mut rng = StdRng::seed_from_u64(41);
        let trials = 500;

        let mut inherited = 0;
        let mut lengths = std::collections::HashSet::new();
        for _ in 0..trials {
            let mut short = random_chromosome(&space, None, &mut rng);
            let mut long = random_chromosome(&space, None, &mut rng);
            short.entry_genes = distinct_genes(&[80.0]);
            long.entry_genes = distinct_genes(&[20.0, 21.0, 22.0, 23.0, 24.0]);

            let (child, _) = crossover(&short, &long, &space, &mut rng);
            lengths.insert(child.entry_genes.len());
            // Positions 1..5 exist only in the long parent
            inherited += long.entry_genes[1..]
                .iter()
                .filter(|gene| child.entry_genes.contains(gene))
                .count();
        }

        let rate = inherited as f64 / (4 * trials) as f64;
        assert!((0.45..=0.55).contains(&rate), "inclusion rate = {}", rate);
        assert!(lengths.contains(&1) && lengths.contains(&5), "{:?}", lengths);
    }

    #[test]
    fn test_elitism_count_is_clamped() {
        let space = ParameterSpace::standard();
        let mut rng = StdRng::seed_from_u64(35);
        let population = initialize_population(4, None, &space, &mut rng);
        let scores = vec![0.2, 0.7, 0.5, 0.1];

        assert!(elitism(&population, &scores, 0).unwrap().is_empty());

        let everyone = elitism(&population, &scores, 10).unwrap();
        let ids: Vec<_> = everyone.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![population[1].id, population[2].id, population[0].id, population[3].id]);

        assert_eq!(elitism(&population, &scores, 4).unwrap(), everyone);
    }

    #[test]
    fn test_entry_count_skews_small() {
        let space = ParameterSpace::standard();
        let mut rng = StdRng::seed_from_u64(8);
        let population = initialize_population(1000, None, &space, &mut rng);

        let singles = population.iter().filter(|c| c.entry_genes.len() == 1).count();
        let large = population.iter().filter(|c| c.entry_genes.len() >= 4).count();
        assert!(singles > 400 && singles < 600, "singles = {}", singles);
        assert!(large < 100, "large = {}", large);
    }

    #[test]
    fn test_direction_constraint() {
        let space = ParameterSpace::standard();
        let mut rng = StdRng::seed_from_u64(1);

        let longs = initialize_population(20, Some(Direction::Long), &space, &mut rng);
        assert!(longs.iter().all(|c| c.direction == Direction::Long && !c.has_direction_overrides()));

        let both = initialize_population(20, Some(Direction::Both), &space, &mut rng);
        assert!(both.iter().all(|c| c.long_stop_loss_pct.is_some() && c.short_take_profit_pct.is_some()));
    }

    #[test]
    fn test_zero_threshold_escapes() {
        let space = ParameterSpace::standard();
        let cci = space.get("CCI").unwrap();
        let mut rng = StdRng::seed_from_u64(13);

        let moved = (0..20).any(|_| perturb_threshold(cci, 0.0, &mut rng) != 0.0);
        assert!(moved);
        for _ in 0..20 {
            assert!(perturb_threshold(cci, 0.0, &mut rng).abs() <= MUTATION_JITTER);
        }
    }

    #[test]
    fn test_tournament_with_replacement_free_sampling() {
        let space = ParameterSpace::standard();
        let mut rng = StdRng::seed_from_u64(21);
        let population = initialize_population(5, None, &space, &mut rng);
        let scores = vec![0.1, 0.9, 0.3, 0.5, 0.2];

        for _ in 0..10 {
            let winner = tournament_selection(&population, &scores, 5, &mut rng).unwrap();
            assert_eq!(winner.id, population[1].id);
        }
    }

    #[test]
    fn test_elitism_orders_best_first() {
        let space = ParameterSpace::standard();
        let mut rng = StdRng::seed_from_u64(34);
        let population = initialize_population(6, None, &space, &mut rng);
        let scores = vec![0.4, 0.8, 0.1, 0.8, 0.6, 0.0];

        let elites = elitism(&population, &scores, 3).unwrap();
        let ids: Vec<_> = elites.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![population[1].id, population[3].id, population[4].id]);
    }

    #[test]
    fn test_selection_errors() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            tournament_selection(&[], &[], 3, &mut rng),
            Err(DiscoveryError::EmptyPopulation)
        ));

        let space = ParameterSpace::standard();
        let population = initialize_population(2, None, &space, &mut rng);
        assert!(matches!(
            elitism(&population, &[1.0], 1),
            Err(DiscoveryError::PopulationSizeMismatch { population: 2, scores: 1 })
        ));
    }
}
