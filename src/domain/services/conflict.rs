use chrono::{DateTime, Utc};
use std::cmp::{max, min};

/// Half-open interval overlap: touching endpoints do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    max(a_start, b_start) < min(a_end, b_end)
}

/// True if the proposed interval overlaps any busy interval.
pub fn has_conflict(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    busy: &[(DateTime<Utc>, DateTime<Utc>)],
) -> bool {
    busy.iter().any(|(b_start, b_end)| overlaps(start, end, *b_start, *b_end))
}
