use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::services::conflict::overlaps;
use crate::domain::services::slots::Slot;

/// Keep the candidate slots that touch no busy interval. Pure filter;
/// busy intervals come fresh from storage on every call.
pub fn free_slots(candidates: &[Slot], busy: &[(DateTime<Utc>, DateTime<Utc>)]) -> Vec<Slot> {
    candidates
        .iter()
        .filter(|(start, end)| !busy.iter().any(|(b_start, b_end)| overlaps(*start, *end, *b_start, *b_end)))
        .copied()
        .collect()
}

/// The UTC window covering `date` in `tz`: [local midnight, next local
/// midnight). Returns None only for dates a DST rule leaves unresolvable.
pub fn local_day_window(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()?;
    let end = tz.from_local_datetime(&date.succ_opt()?.and_hms_opt(0, 0, 0)?).earliest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}
