use chrono::{Duration, NaiveDate};

use crate::models::{normalize_starts, FertileWindow, UserSettings, LUTEAL_PHASE_DAYS};

/// Sperm remains viable for about 5 days before ovulation.
const FERTILE_DAYS_BEFORE: i64 = 5;
/// The egg remains viable for about 1 day after ovulation.
const FERTILE_DAYS_AFTER: i64 = 1;
/// Prediction looks at gaps between at most the last 4 recorded starts.
const RECENT_STARTS: usize = 4;

/// Estimate the next period start.
///
/// Uses the rounded mean of inter-start gaps over the trailing starts
/// when at least two completed gaps exist; with less history the
/// configured average cycle length is used instead. `None` when no
/// starts are recorded or settings are absent.
pub fn predicted_next_period(
    starts: &[NaiveDate],
    settings: Option<&UserSettings>,
) -> Option<NaiveDate> {
    let settings = settings.filter(|s| s.is_valid())?;

    let sorted = normalize_starts(starts);
    let last_start = *sorted.last()?;

    let recent = &sorted[sorted.len().saturating_sub(RECENT_STARTS)..];
    let gaps: Vec<i64> = recent
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .collect();

    let predicted_length = if gaps.len() >= 2 {
        (gaps.iter().sum::<i64>() as f64 / gaps.len() as f64).round() as i64
    } else {
        i64::from(settings.average_cycle_length)
    };

    Some(last_start + Duration::days(predicted_length))
}

/// Estimated ovulation: 14 days before the predicted next period
/// (constant luteal-phase assumption).
pub fn predicted_ovulation(
    starts: &[NaiveDate],
    settings: Option<&UserSettings>,
) -> Option<NaiveDate> {
    predicted_next_period(starts, settings).map(|next| next - Duration::days(LUTEAL_PHASE_DAYS))
}

/// The date range in which conception is possible, derived from
/// estimated ovulation.
pub fn fertile_window(
    starts: &[NaiveDate],
    settings: Option<&UserSettings>,
) -> Option<FertileWindow> {
    let ovulation = predicted_ovulation(starts, settings)?;
    Some(FertileWindow {
        start: ovulation - Duration::days(FERTILE_DAYS_BEFORE),
        end: ovulation + Duration::days(FERTILE_DAYS_AFTER),
    })
}
