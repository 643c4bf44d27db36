use crate::model::AttendanceRecord;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_CHART_WINDOW: usize = 7;

/// Half-up rounding to one decimal place: `floor(10*x + 0.5) / 10`.
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub percentage: f64,
}

pub fn compute_stats<'a, I>(records: I) -> AttendanceStats
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut total: usize = 0;
    let mut present: usize = 0;
    for r in records {
        total += 1;
        if r.status.is_present() {
            present += 1;
        }
    }

    let percentage = if total > 0 {
        round_off_1_decimal(100.0 * (present as f64) / (total as f64))
    } else {
        0.0
    };

    AttendanceStats {
        total,
        present,
        absent: total - present,
        percentage,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTally {
    pub date: String,
    pub present: usize,
    pub absent: usize,
}

/// Present/absent counts for the `window` most recent distinct dates,
/// oldest first.
pub fn group_by_date_window<'a, I>(records: I, window: usize) -> Vec<DailyTally>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    // ISO dates order lexicographically, so the map is already chronological.
    let mut by_date: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for r in records {
        let slot = by_date.entry(r.date.as_str()).or_insert((0, 0));
        if r.status.is_present() {
            slot.0 += 1;
        } else {
            slot.1 += 1;
        }
    }

    let skip = by_date.len().saturating_sub(window);
    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, (present, absent))| DailyTally {
            date: date.to_string(),
            present,
            absent,
        })
        .collect()
}
