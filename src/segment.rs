use chrono::NaiveDate;

use crate::models::{normalize_starts, CycleRecord, UserSettings};

/// Turn recorded period starts into completed cycle records, one per
/// consecutive pair of distinct starts in chronological order.
///
/// The final cycle — the one beginning at the last known start — has no
/// end yet and is deliberately excluded. Empty or single-element input
/// yields an empty list, as does absent/invalid settings (the carried
/// period length has nowhere to come from).
pub fn segment_cycles(
    starts: &[NaiveDate],
    settings: Option<&UserSettings>,
) -> Vec<CycleRecord> {
    let Some(settings) = settings.filter(|s| s.is_valid()) else {
        return Vec::new();
    };

    let sorted = normalize_starts(starts);

    sorted
        .windows(2)
        .enumerate()
        .map(|(index, pair)| CycleRecord {
            index,
            start: pair[0],
            end: pair[1],
            length_days: (pair[1] - pair[0]).num_days(),
            period_length: settings.average_period_length,
        })
        .collect()
}
