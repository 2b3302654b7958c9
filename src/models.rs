use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Baseline cycle length in days when the user has not configured one.
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
/// Baseline period length in days when the user has not configured one.
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;
/// The luteal phase is modeled as a fixed 14-day span, so estimated
/// ovulation is always `cycle length - 14`, not the cycle midpoint.
pub const LUTEAL_PHASE_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
    Unknown,
}

/// User-editable averages that drive every phase and prediction
/// computation when historical data is insufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub average_cycle_length: u32,
    pub average_period_length: u32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            average_cycle_length: DEFAULT_CYCLE_LENGTH,
            average_period_length: DEFAULT_PERIOD_LENGTH,
        }
    }
}

impl UserSettings {
    /// Both averages must be positive for any computation to use them.
    pub fn is_valid(&self) -> bool {
        self.average_cycle_length > 0 && self.average_period_length > 0
    }
}

/// One completed cycle, derived from two consecutive period starts.
/// Always a recomputed view, never stored: `end` is the next period's
/// start and `period_length` is carried over from the settings rather
/// than measured per cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub index: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length_days: i64,
    pub period_length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertileWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Per-phase date buckets for calendar rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDays {
    pub menstrual: Vec<NaiveDate>,
    pub follicular: Vec<NaiveDate>,
    pub ovulation: Vec<NaiveDate>,
    pub luteal: Vec<NaiveDate>,
}

/// Relative hormone levels for a single cycle day. Decorative chart
/// data only; see [`crate::hormones`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HormoneLevels {
    pub estrogen: f64,
    pub progesterone: f64,
}

/// Sort ascending and drop duplicate calendar days. Period starts are
/// treated as a set of distinct days, so re-logging the same date is a
/// no-op everywhere.
pub fn normalize_starts(starts: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut sorted = starts.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted
}
