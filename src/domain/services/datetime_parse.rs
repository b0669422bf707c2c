use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Best-effort parse of a whole message as a date-time expression, for the
/// second webhook pass. Naive values are interpreted in `tz`; numeric
/// dates are day-first. Returns None when the text is not (entirely) a
/// date-time, which makes that pass a no-op.
pub fn parse_date_time(text: &str, tz: Tz, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%d.%m.%Y %H:%M",
        "%d/%m/%Y %H:%M",
    ];
    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return resolve_local(naive, tz);
        }
    }

    // Relative forms: "tomorrow 14:00", "today at 9:30", bare "14:00".
    let lower = trimmed.to_lowercase();
    let mut tomorrow = false;
    let mut time_token = None;
    for word in lower.split_whitespace() {
        match word {
            "today" | "at" => {}
            "tomorrow" => tomorrow = true,
            other => {
                if time_token.is_some() {
                    return None;
                }
                time_token = Some(other);
            }
        }
    }

    let time = NaiveTime::parse_from_str(time_token?, "%H:%M").ok()?;
    let mut date = now.with_timezone(&tz).date_naive();
    if tomorrow {
        date = date.succ_opt()?;
    }
    resolve_local(date.and_time(time), tz)
}

fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn istanbul() -> Tz {
        "Europe/Istanbul".parse().unwrap()
    }

    fn reference() -> DateTime<Utc> {
        // 2025-06-16 09:00 UTC = 12:00 in Istanbul.
        Utc.with_ymd_and_hms(2025, 6, 16, 9, 0, 0).unwrap()
    }

    #[test]
    fn iso_date_time_resolves_in_local_zone() {
        let parsed = parse_date_time("2025-06-17 14:00", istanbul(), reference()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 17, 11, 0, 0).unwrap());
    }

    #[test]
    fn day_first_numeric_dates_are_accepted() {
        let parsed = parse_date_time("17.06.2025 14:00", istanbul(), reference()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 17, 11, 0, 0).unwrap());
    }

    #[test]
    fn tomorrow_with_time_is_relative_to_local_today() {
        let parsed = parse_date_time("tomorrow at 10:00", istanbul(), reference()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 17, 7, 0, 0).unwrap());
    }

    #[test]
    fn bare_time_means_today() {
        let parsed = parse_date_time("15:30", istanbul(), reference()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 16, 12, 30, 0).unwrap());
    }

    #[test]
    fn prose_is_rejected() {
        assert!(parse_date_time("book me in please", istanbul(), reference()).is_none());
        assert!(parse_date_time("cancel", istanbul(), reference()).is_none());
        assert!(parse_date_time("", istanbul(), reference()).is_none());
    }
}
