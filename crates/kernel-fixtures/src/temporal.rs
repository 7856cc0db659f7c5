//! String forms of temporal literals.
//!
//! Dates, times and timestamps may be written either as raw integers in the
//! Arrow storage unit or as ISO-8601 style strings. Strings are converted
//! here; sub-unit digits that the target unit cannot hold are rejected.

use std::sync::LazyLock;

use arrow::datatypes::TimeUnit;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Unix epoch date, base for Arrow Date32/Date64 offsets.
static UNIX_EPOCH_DATE: LazyLock<NaiveDate> =
    LazyLock::new(|| NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date is always valid"));

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Days since the epoch for a `YYYY-MM-DD` string.
pub(crate) fn date_to_days(text: &str) -> Result<i32, String> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| format!("invalid date \"{text}\": {e}"))?;
    i32::try_from((date - *UNIX_EPOCH_DATE).num_days())
        .map_err(|_| format!("date \"{text}\" out of range for Date32"))
}

/// Milliseconds since the epoch for a `YYYY-MM-DD` string.
pub(crate) fn date_to_millis(text: &str) -> Result<i64, String> {
    let days = date_to_days(text)?;
    i64::from(days)
        .checked_mul(MILLIS_PER_DAY)
        .ok_or_else(|| format!("date \"{text}\" out of range for Date64"))
}

/// Time of day for an `HH:MM:SS[.fff]` string, in `unit` since midnight.
pub(crate) fn time_of_day(text: &str, unit: TimeUnit) -> Result<i64, String> {
    let time = NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .map_err(|e| format!("invalid time \"{text}\": {e}"))?;
    let nanos = time.nanosecond();
    if nanos >= 1_000_000_000 {
        return Err(format!("leap second in \"{text}\" is not representable"));
    }
    in_unit(
        i64::from(time.num_seconds_from_midnight()),
        i64::from(nanos),
        unit,
    )
    .map_err(|e| format!("time \"{text}\": {e}"))
}

/// Timestamp in `unit` since the epoch.
///
/// Accepts RFC 3339 (offset applied), `YYYY-MM-DD HH:MM:SS[.f]`,
/// `YYYY-MM-DDTHH:MM:SS[.f]` and a bare `YYYY-MM-DD` (midnight).
/// Strings without an offset are read as UTC.
pub(crate) fn timestamp(text: &str, unit: TimeUnit) -> Result<i64, String> {
    let datetime = parse_datetime(text)?.and_utc();
    in_unit(
        datetime.timestamp(),
        i64::from(datetime.timestamp_subsec_nanos()),
        unit,
    )
    .map_err(|e| format!("timestamp \"{text}\": {e}"))
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime, String> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Ok(datetime.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(datetime);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::default()))
        .map_err(|_| format!("invalid timestamp \"{text}\""))
}

fn in_unit(seconds: i64, nanos: i64, unit: TimeUnit) -> Result<i64, String> {
    let (per_second, nanos_per_tick) = match unit {
        TimeUnit::Second => (1, 1_000_000_000),
        TimeUnit::Millisecond => (1_000, 1_000_000),
        TimeUnit::Microsecond => (1_000_000, 1_000),
        TimeUnit::Nanosecond => (1_000_000_000, 1),
    };
    if nanos % nanos_per_tick != 0 {
        return Err(format!("fractional digits finer than {unit:?}"));
    }
    seconds
        .checked_mul(per_second)
        .and_then(|ticks| ticks.checked_add(nanos / nanos_per_tick))
        .ok_or_else(|| format!("overflows {unit:?} range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_count_days_from_epoch() {
        assert_eq!(date_to_days("1970-01-01").unwrap(), 0);
        assert_eq!(date_to_days("1970-01-02").unwrap(), 1);
        assert_eq!(date_to_days("1969-12-31").unwrap(), -1);
        assert_eq!(date_to_millis("1970-01-02").unwrap(), MILLIS_PER_DAY);
        assert!(date_to_days("1970-13-01").is_err());
    }

    #[test]
    fn time_of_day_respects_unit() {
        assert_eq!(time_of_day("00:01:00", TimeUnit::Second).unwrap(), 60);
        assert_eq!(
            time_of_day("00:00:01.250", TimeUnit::Millisecond).unwrap(),
            1_250
        );
        let err = time_of_day("00:00:01.250", TimeUnit::Second).unwrap_err();
        assert!(err.contains("fractional"), "got: {err}");
    }

    #[test]
    fn timestamps_accept_common_forms() {
        let expected = 86_400 + 59;
        for text in [
            "1970-01-02 00:00:59",
            "1970-01-02T00:00:59",
            "1970-01-02T00:00:59Z",
            "1970-01-02T01:00:59+01:00",
        ] {
            assert_eq!(timestamp(text, TimeUnit::Second).unwrap(), expected, "{text}");
        }
        assert_eq!(timestamp("1970-01-02", TimeUnit::Second).unwrap(), 86_400);
        assert_eq!(
            timestamp("1970-01-01 00:00:00.000001", TimeUnit::Microsecond).unwrap(),
            1
        );
    }

    #[test]
    fn timestamp_overflow_is_an_error() {
        let err = timestamp("2300-01-01 00:00:00", TimeUnit::Nanosecond).unwrap_err();
        assert!(err.contains("overflows"), "got: {err}");
        assert!(timestamp("yesterday", TimeUnit::Second).is_err());
    }
}
