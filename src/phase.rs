use chrono::{Duration, NaiveDate};

use crate::models::{normalize_starts, CycleDays, CyclePhase, UserSettings, LUTEAL_PHASE_DAYS};

/// Days on either side of estimated ovulation treated as the ovulation
/// window.
const OVULATION_WINDOW: i64 = 2;

/// Horizon for calendar generation: never project phases further than
/// this many days past `today`.
const CALENDAR_HORIZON_DAYS: i64 = 60;

/// 1-indexed cycle day number for `date`, relative to the most recent
/// period start on or before it.
///
/// Dates past the last recorded start wrap modulo the configured average
/// cycle length, treating the future as consecutive hypothetical cycles
/// of fixed length. `None` when there is no preceding start, no starts
/// at all, or no usable settings.
pub fn cycle_day_number(
    date: NaiveDate,
    starts: &[NaiveDate],
    settings: Option<&UserSettings>,
) -> Option<u32> {
    let settings = settings.filter(|s| s.is_valid())?;

    let sorted = normalize_starts(starts);
    let relevant_start = sorted.iter().rev().find(|&&s| s <= date)?;

    let days_since = (date - *relevant_start).num_days() + 1;
    let cycle_length = i64::from(settings.average_cycle_length);

    let day = if days_since > cycle_length {
        ((days_since - 1) % cycle_length) + 1
    } else {
        days_since
    };

    Some(day as u32)
}

/// Classify which phase of the cycle `date` falls in. Returns
/// [`CyclePhase::Unknown`] when settings are absent or no period start
/// precedes the date — never an error.
pub fn cycle_phase(
    date: NaiveDate,
    starts: &[NaiveDate],
    settings: Option<&UserSettings>,
) -> CyclePhase {
    let Some(settings) = settings.filter(|s| s.is_valid()) else {
        return CyclePhase::Unknown;
    };
    let Some(day) = cycle_day_number(date, starts, Some(settings)) else {
        return CyclePhase::Unknown;
    };

    let ovulation_day = i64::from(settings.average_cycle_length) - LUTEAL_PHASE_DAYS;
    classify_day(
        i64::from(day),
        i64::from(settings.average_period_length),
        ovulation_day,
    )
}

/// Bucket every projected cycle day into its phase for calendar
/// rendering: one synthetic cycle of the configured average length per
/// recorded start, clipped at `today + 60` days. `today` is a parameter
/// so callers (and tests) control the horizon.
pub fn phase_calendar(
    starts: &[NaiveDate],
    settings: Option<&UserSettings>,
    today: NaiveDate,
) -> CycleDays {
    let mut days = CycleDays::default();

    let Some(settings) = settings.filter(|s| s.is_valid()) else {
        return days;
    };

    let cycle_length = i64::from(settings.average_cycle_length);
    let period_length = i64::from(settings.average_period_length);
    let ovulation_day = cycle_length - LUTEAL_PHASE_DAYS;
    let horizon = today + Duration::days(CALENDAR_HORIZON_DAYS);

    for start in normalize_starts(starts) {
        for day in 1..=cycle_length {
            let date = start + Duration::days(day - 1);
            if date > horizon {
                break;
            }
            match classify_day(day, period_length, ovulation_day) {
                CyclePhase::Menstrual => days.menstrual.push(date),
                CyclePhase::Follicular => days.follicular.push(date),
                CyclePhase::Ovulation => days.ovulation.push(date),
                _ => days.luteal.push(date),
            }
        }
    }

    days
}

fn classify_day(day: i64, period_length: i64, ovulation_day: i64) -> CyclePhase {
    if day <= period_length {
        CyclePhase::Menstrual
    } else if day < ovulation_day - OVULATION_WINDOW {
        CyclePhase::Follicular
    } else if day <= ovulation_day + OVULATION_WINDOW {
        CyclePhase::Ovulation
    } else {
        CyclePhase::Luteal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn settings() -> UserSettings {
        UserSettings {
            average_cycle_length: 28,
            average_period_length: 5,
        }
    }

    #[test]
    fn unknown_without_settings_or_starts() {
        let d = date(2026, 1, 10);
        assert_eq!(cycle_phase(d, &[d], None), CyclePhase::Unknown);
        assert_eq!(cycle_phase(d, &[], Some(&settings())), CyclePhase::Unknown);
    }

    #[test]
    fn unknown_before_first_start() {
        let start = date(2026, 1, 10);
        let phase = cycle_phase(date(2026, 1, 9), &[start], Some(&settings()));
        assert_eq!(phase, CyclePhase::Unknown);
        assert_eq!(cycle_day_number(date(2026, 1, 9), &[start], Some(&settings())), None);
    }

    // Ovulation day is 28 - 14 = 14, window covers days 12-16.
    #[test]
    fn phase_ladder_for_default_settings() {
        let start = date(2026, 1, 1);
        let starts = vec![start];
        let s = settings();

        assert_eq!(cycle_phase(start, &starts, Some(&s)), CyclePhase::Menstrual);
        assert_eq!(
            cycle_phase(start + Duration::days(6), &starts, Some(&s)),
            CyclePhase::Follicular
        );
        assert_eq!(
            cycle_phase(start + Duration::days(13), &starts, Some(&s)),
            CyclePhase::Ovulation
        );
        assert_eq!(
            cycle_phase(start + Duration::days(20), &starts, Some(&s)),
            CyclePhase::Luteal
        );
    }

    #[test]
    fn day_number_wraps_past_last_start() {
        let start = date(2026, 1, 1);
        let s = settings();

        // 31 days after the start: day 31 wraps to day 3 of a
        // hypothetical next cycle.
        let day = cycle_day_number(start + Duration::days(30), &[start], Some(&s));
        assert_eq!(day, Some(3));
        assert_eq!(
            cycle_phase(start + Duration::days(30), &[start], Some(&s)),
            CyclePhase::Menstrual
        );
    }

    #[test]
    fn day_number_uses_most_recent_start() {
        let starts = vec![date(2026, 1, 1), date(2026, 1, 29)];
        let day = cycle_day_number(date(2026, 1, 30), &starts, Some(&settings()));
        assert_eq!(day, Some(2));
    }

    #[test]
    fn calendar_buckets_each_phase_once_per_cycle() {
        let start = date(2026, 1, 1);
        let days = phase_calendar(&[start], Some(&settings()), start);

        assert_eq!(days.menstrual.len(), 5);
        assert_eq!(days.follicular.len(), 6); // days 6-11
        assert_eq!(days.ovulation.len(), 5); // days 12-16
        assert_eq!(days.luteal.len(), 12); // days 17-28
        assert_eq!(days.menstrual[0], start);
    }

    #[test]
    fn calendar_clips_at_horizon() {
        let start = date(2026, 1, 1);
        // Projection starts 70 days after "today": only days within
        // today + 60 survive, so nothing from this cycle does.
        let today = start - Duration::days(70);
        let days = phase_calendar(&[start], Some(&settings()), today);
        assert!(days.menstrual.is_empty());
        assert!(days.luteal.is_empty());
    }
}
