use crate::error::{DiscoveryError, Result};
use crate::types::IndicatorCategory;
use rand::Rng;
use std::collections::BTreeMap;

/// Inclusive numeric range of one indicator parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, min, max }
    }

    /// Both bounds integral: values are sampled and kept as integers
    pub fn is_integral(&self) -> bool {
        self.min.fract() == 0.0 && self.max.fract() == 0.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp into range, rounding first for integral ranges
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if self.is_integral() { value.round() } else { value };
        value.clamp(self.min, self.max)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.is_integral() {
            rng.gen_range(self.min as i64..=self.max as i64) as f64
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    fn step(&self) -> f64 {
        if self.is_integral() {
            1.0
        } else {
            (self.max - self.min) / 100.0
        }
    }
}

/// `lesser` must stay strictly below `greater` (e.g. fast < slow period)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamConstraint {
    pub lesser: &'static str,
    pub greater: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSpec {
    pub name: &'static str,
    pub params: &'static [ParamRange],
    pub threshold_range: Option<(f64, f64)>,
    pub category: IndicatorCategory,
    pub outputs: &'static [&'static str],
    pub constraints: &'static [ParamConstraint],
}

impl IndicatorSpec {
    pub fn param(&self, name: &str) -> Option<&ParamRange> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Uniform draw inside the threshold range, neutral zero when unranged
    pub fn sample_threshold<R: Rng>(&self, rng: &mut R) -> f64 {
        match self.threshold_range {
            Some((lo, hi)) => rng.gen_range(lo..=hi),
            None => 0.0,
        }
    }

    pub fn clamp_threshold(&self, value: f64) -> f64 {
        match self.threshold_range {
            Some((lo, hi)) => value.clamp(lo, hi),
            None => 0.0,
        }
    }

    pub fn threshold_in_range(&self, value: f64) -> bool {
        match self.threshold_range {
            Some((lo, hi)) => value >= lo && value <= hi,
            None => value == 0.0,
        }
    }

    pub fn sample_params<R: Rng>(&self, rng: &mut R) -> BTreeMap<String, f64> {
        let mut params: BTreeMap<String, f64> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.sample(rng)))
            .collect();
        self.enforce_constraints(&mut params);
        params
    }

    /// Swap or nudge values until every cross-parameter constraint holds
    pub fn enforce_constraints(&self, params: &mut BTreeMap<String, f64>) {
        for constraint in self.constraints {
            let (Some(lesser_range), Some(greater_range)) =
                (self.param(constraint.lesser), self.param(constraint.greater))
            else {
                continue;
            };
            let (Some(&a), Some(&b)) = (params.get(constraint.lesser), params.get(constraint.greater))
            else {
                continue;
            };

            let (mut a, mut b) = if a > b { (b, a) } else { (a, b) };
            a = lesser_range.clamp(a);
            b = greater_range.clamp(b);
            if a >= b {
                b = greater_range.clamp(a + greater_range.step());
            }
            if a >= b {
                a = lesser_range.clamp(b - lesser_range.step());
            }

            params.insert(constraint.lesser.to_string(), a);
            params.insert(constraint.greater.to_string(), b);
        }
    }

    /// Problems that would make sampling panic or leave a constraint unsatisfiable
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for range in self.params {
            if !(range.min.is_finite() && range.max.is_finite() && range.min <= range.max) {
                violations.push(format!(
                    "{}.{}: bounds [{}, {}] must be finite and ordered",
                    self.name, range.name, range.min, range.max
                ));
            }
        }
        if let Some((lo, hi)) = self.threshold_range {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                violations.push(format!(
                    "{}: threshold range [{}, {}] must be finite and ordered",
                    self.name, lo, hi
                ));
            }
        }
        for constraint in self.constraints {
            match (self.param(constraint.lesser), self.param(constraint.greater)) {
                (Some(lesser), Some(greater)) => {
                    if !(lesser.min < greater.max) {
                        violations.push(format!(
                            "{}: {} < {} cannot hold ({}.min = {}, {}.max = {})",
                            self.name,
                            constraint.lesser,
                            constraint.greater,
                            constraint.lesser,
                            lesser.min,
                            constraint.greater,
                            greater.max
                        ));
                    }
                }
                _ => violations.push(format!(
                    "{}: constraint {} < {} names an unknown parameter",
                    self.name, constraint.lesser, constraint.greater
                )),
            }
        }

        violations
    }

    pub fn constraints_hold(&self, params: &BTreeMap<String, f64>) -> bool {
        self.constraints.iter().all(|c| {
            match (params.get(c.lesser), params.get(c.greater)) {
                (Some(a), Some(b)) => a < b,
                _ => false,
            }
        })
    }
}

const FAST_SLOW: &[ParamConstraint] = &[ParamConstraint { lesser: "fast", greater: "slow" }];

pub static STANDARD_INDICATORS: &[IndicatorSpec] = &[
    IndicatorSpec {
        name: "RSI",
        params: &[ParamRange::new("period", 2.0, 50.0)],
        threshold_range: Some((10.0, 90.0)),
        category: IndicatorCategory::BoundedOscillator,
        outputs: &[],
        constraints: &[],
    },
    IndicatorSpec {
        name: "STOCH",
        params: &[
            ParamRange::new("k_period", 5.0, 21.0),
            ParamRange::new("d_period", 3.0, 9.0),
        ],
        threshold_range: Some((10.0, 90.0)),
        category: IndicatorCategory::BoundedOscillator,
        outputs: &["k", "d"],
        constraints: &[ParamConstraint { lesser: "d_period", greater: "k_period" }],
    },
    IndicatorSpec {
        name: "CCI",
        params: &[ParamRange::new("period", 10.0, 50.0)],
        threshold_range: Some((-200.0, 200.0)),
        category: IndicatorCategory::BoundedOscillator,
        outputs: &[],
        constraints: &[],
    },
    IndicatorSpec {
        name: "WILLR",
        params: &[ParamRange::new("period", 7.0, 28.0)],
        threshold_range: Some((-90.0, -10.0)),
        category: IndicatorCategory::BoundedOscillator,
        outputs: &[],
        constraints: &[],
    },
    IndicatorSpec {
        name: "MFI",
        params: &[ParamRange::new("period", 7.0, 28.0)],
        threshold_range: Some((10.0, 90.0)),
        category: IndicatorCategory::BoundedOscillator,
        outputs: &[],
        constraints: &[],
    },
    IndicatorSpec {
        name: "ADX",
        params: &[ParamRange::new("period", 7.0, 28.0)],
        threshold_range: Some((15.0, 50.0)),
        category: IndicatorCategory::BoundedOscillator,
        outputs: &[],
        constraints: &[],
    },
    IndicatorSpec {
        name: "ROC",
        params: &[ParamRange::new("period", 5.0, 30.0)],
        threshold_range: Some((-10.0, 10.0)),
        category: IndicatorCategory::BoundedOscillator,
        outputs: &[],
        constraints: &[],
    },
    IndicatorSpec {
        name: "MACD",
        params: &[
            ParamRange::new("fast", 8.0, 15.0),
            ParamRange::new("slow", 20.0, 35.0),
            ParamRange::new("signal", 5.0, 12.0),
        ],
        threshold_range: None,
        category: IndicatorCategory::PriceRelative,
        outputs: &["macd", "signal", "histogram"],
        constraints: FAST_SLOW,
    },
    IndicatorSpec {
        name: "EMA_CROSS",
        params: &[ParamRange::new("fast", 5.0, 20.0), ParamRange::new("slow", 20.0, 100.0)],
        threshold_range: None,
        category: IndicatorCategory::PriceRelative,
        outputs: &[],
        constraints: FAST_SLOW,
    },
    IndicatorSpec {
        name: "SMA_CROSS",
        params: &[ParamRange::new("fast", 5.0, 20.0), ParamRange::new("slow", 20.0, 100.0)],
        threshold_range: None,
        category: IndicatorCategory::PriceRelative,
        outputs: &[],
        constraints: FAST_SLOW,
    },
    IndicatorSpec {
        name: "BBANDS",
        params: &[ParamRange::new("period", 10.0, 30.0), ParamRange::new("std_dev", 1.5, 3.0)],
        threshold_range: None,
        category: IndicatorCategory::PriceRelative,
        outputs: &["upper", "middle", "lower"],
        constraints: &[],
    },
];

/// The set of indicators the search may draw from.
///
/// Built once from a static table and passed by reference to the genome
/// model and operators.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    indicators: Vec<&'static IndicatorSpec>,
}

impl ParameterSpace {
    /// Checks the whole table up front and reports every problem at once
    pub fn new(indicators: &'static [IndicatorSpec]) -> Result<Self> {
        let mut violations = Vec::new();
        if indicators.is_empty() {
            violations.push("parameter space needs at least one indicator".to_string());
        }
        for (i, spec) in indicators.iter().enumerate() {
            if indicators[..i].iter().any(|other| other.name == spec.name) {
                violations.push(format!("duplicate indicator {}", spec.name));
            }
            violations.extend(spec.violations());
        }

        if !violations.is_empty() {
            return Err(DiscoveryError::Configuration(violations.join("; ")));
        }
        Ok(Self {
            indicators: indicators.iter().collect(),
        })
    }

    pub fn standard() -> Self {
        Self {
            indicators: STANDARD_INDICATORS.iter().collect(),
        }
    }

    /// Restrict the standard table to the named indicators; empty keeps all
    pub fn restricted(names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(Self::standard());
        }

        let mut indicators = Vec::with_capacity(names.len());
        for name in names {
            let spec = STANDARD_INDICATORS
                .iter()
                .find(|spec| spec.name == name.as_str())
                .ok_or_else(|| DiscoveryError::UnknownIndicator(name.clone()))?;
            // Listing a name twice would double its draw weight
            if !indicators.iter().any(|known: &&IndicatorSpec| known.name == spec.name) {
                indicators.push(spec);
            }
        }
        Ok(Self { indicators })
    }

    pub fn get(&self, indicator: &str) -> Option<&'static IndicatorSpec> {
        self.indicators.iter().copied().find(|spec| spec.name == indicator)
    }

    pub fn contains(&self, indicator: &str) -> bool {
        self.get(indicator).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.indicators.iter().map(|spec| spec.name)
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn choose<R: Rng>(&self, rng: &mut R) -> &'static IndicatorSpec {
        self.indicators[rng.gen_range(0..self.indicators.len())]
    }
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::standard()
    }
}
