use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// A candidate appointment window, both boundaries in UTC.
pub type Slot = (DateTime<Utc>, DateTime<Utc>);

/// Generate the consecutive working-hour slots of `date` in `tz`.
///
/// The cursor steps through local wall-clock time and every slot boundary
/// is converted to UTC on its own, so a DST shift inside the working day
/// cannot drift the later slots. A trailing window shorter than
/// `slot_minutes` is dropped; `work_end <= work_start` yields nothing.
/// Slots whose local boundary is skipped or ambiguous on a transition day
/// are omitted rather than guessed.
pub fn working_slots(
    date: NaiveDate,
    work_start: NaiveTime,
    work_end: NaiveTime,
    slot_minutes: u32,
    tz: Tz,
) -> Vec<Slot> {
    if slot_minutes == 0 {
        return Vec::new();
    }

    let step = Duration::minutes(slot_minutes as i64);
    let end_local = date.and_time(work_end);

    let mut slots = Vec::new();
    let mut cursor = date.and_time(work_start);

    while cursor + step <= end_local {
        let next = cursor + step;
        if let (Some(start), Some(end)) = (
            tz.from_local_datetime(&cursor).single(),
            tz.from_local_datetime(&next).single(),
        ) {
            slots.push((start.with_timezone(&Utc), end.with_timezone(&Utc)));
        }
        cursor = next;
    }

    slots
}
