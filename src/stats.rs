use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{CycleRecord, UserSettings, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH};

/// Cap on expected cycle-length variation when scoring predictability.
const MAX_VARIATION_DAYS: f64 = 15.0;
/// A cycle counts as regular when within this many days of the mean.
const REGULAR_CYCLE_TOLERANCE: i64 = 3;
/// Clinically typical period length band, inclusive.
const CONSISTENT_PERIOD_MIN: u32 = 3;
const CONSISTENT_PERIOD_MAX: u32 = 7;
/// `is_irregular` threshold: unrounded std deviation above this many
/// days flags the history as irregular. Deliberately stricter than the
/// `Irregular` banding below (> 5 days); see the crate documentation.
const IRREGULAR_STD_DEV: f64 = 7.0;
/// `is_irregular` needs at least this many completed cycles to judge.
const MIN_CYCLES_FOR_IRREGULARITY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regularity {
    Regular,
    SomewhatIrregular,
    Irregular,
    HighlyIrregular,
    NoData,
}

impl fmt::Display for Regularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Regularity::Regular => "Regular",
            Regularity::SomewhatIrregular => "Somewhat Irregular",
            Regularity::Irregular => "Irregular",
            Regularity::HighlyIrregular => "Highly Irregular",
            Regularity::NoData => "No data",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predictability {
    High,
    Moderate,
    Low,
    Unknown,
}

impl fmt::Display for Predictability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Predictability::High => "High",
            Predictability::Moderate => "Moderate",
            Predictability::Low => "Low",
            Predictability::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Descriptive summary of completed cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleStatistics {
    pub total_cycles: usize,
    /// Mean cycle length in days, rounded to the nearest whole day.
    pub average_cycle_length: i64,
    /// Mean period length in days, rounded to the nearest whole day.
    pub average_period_length: i64,
    /// Population standard deviation of cycle lengths, one decimal.
    pub cycle_variation: f64,
    pub regularity: Regularity,
    /// 0-100, inversely proportional to cycle-length variation.
    pub predictability_score: u32,
    pub predictability: Predictability,
    pub shortest_cycle: i64,
    pub longest_cycle: i64,
    pub shortest_period: u32,
    pub longest_period: u32,
    /// Cycles within ±3 days of the mean length.
    pub regular_cycles: usize,
    /// Periods within the clinically typical 3-7 day band.
    pub consistent_periods: usize,
}

/// Summarize completed cycles. An empty cycle list produces a
/// well-defined empty-state object rather than an error, falling back
/// to the configured averages or the 28/5 baselines when settings are
/// also absent.
pub fn cycle_statistics(
    cycles: &[CycleRecord],
    settings: Option<&UserSettings>,
) -> CycleStatistics {
    if cycles.is_empty() {
        let fallback = settings.filter(|s| s.is_valid());
        return CycleStatistics {
            total_cycles: 0,
            average_cycle_length: i64::from(
                fallback.map_or(DEFAULT_CYCLE_LENGTH, |s| s.average_cycle_length),
            ),
            average_period_length: i64::from(
                fallback.map_or(DEFAULT_PERIOD_LENGTH, |s| s.average_period_length),
            ),
            cycle_variation: 0.0,
            regularity: Regularity::NoData,
            predictability_score: 0,
            predictability: Predictability::Unknown,
            shortest_cycle: 0,
            longest_cycle: 0,
            shortest_period: 0,
            longest_period: 0,
            regular_cycles: 0,
            consistent_periods: 0,
        };
    }

    let cycle_lengths: Vec<i64> = cycles.iter().map(|c| c.length_days).collect();
    let period_lengths: Vec<u32> = cycles.iter().map(|c| c.period_length).collect();

    let average_cycle_length = rounded_mean(&cycle_lengths);
    let average_period_length =
        rounded_mean(&period_lengths.iter().map(|&p| i64::from(p)).collect::<Vec<_>>());

    // One-decimal rounding happens before banding, so the thresholds
    // apply to the value users actually see.
    let cycle_variation = (population_std_dev(&cycle_lengths) * 10.0).round() / 10.0;

    let regularity = if cycle_variation > 8.0 {
        Regularity::HighlyIrregular
    } else if cycle_variation > 5.0 {
        Regularity::Irregular
    } else if cycle_variation > 3.0 {
        Regularity::SomewhatIrregular
    } else {
        Regularity::Regular
    };

    let predictability_score =
        ((1.0 - cycle_variation / MAX_VARIATION_DAYS).max(0.0) * 100.0).round() as u32;
    let predictability = if predictability_score >= 80 {
        Predictability::High
    } else if predictability_score >= 60 {
        Predictability::Moderate
    } else {
        Predictability::Low
    };

    let regular_cycles = cycle_lengths
        .iter()
        .filter(|&&len| (len - average_cycle_length).abs() <= REGULAR_CYCLE_TOLERANCE)
        .count();
    let consistent_periods = period_lengths
        .iter()
        .filter(|&&len| (CONSISTENT_PERIOD_MIN..=CONSISTENT_PERIOD_MAX).contains(&len))
        .count();

    CycleStatistics {
        total_cycles: cycles.len(),
        average_cycle_length,
        average_period_length,
        cycle_variation,
        regularity,
        predictability_score,
        predictability,
        shortest_cycle: cycle_lengths.iter().copied().min().unwrap_or(0),
        longest_cycle: cycle_lengths.iter().copied().max().unwrap_or(0),
        shortest_period: period_lengths.iter().copied().min().unwrap_or(0),
        longest_period: period_lengths.iter().copied().max().unwrap_or(0),
        regular_cycles,
        consistent_periods,
    }
}

/// Conservative overall-irregularity flag: true only with 3 or more
/// completed cycles whose unrounded length deviation exceeds 7 days.
pub fn is_irregular(cycles: &[CycleRecord]) -> bool {
    if cycles.len() < MIN_CYCLES_FOR_IRREGULARITY {
        return false;
    }
    let lengths: Vec<i64> = cycles.iter().map(|c| c.length_days).collect();
    population_std_dev(&lengths) > IRREGULAR_STD_DEV
}

fn rounded_mean(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    (values.iter().sum::<i64>() as f64 / values.len() as f64).round() as i64
}

fn population_std_dev(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<i64>() as f64 / values.len() as f64;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}
