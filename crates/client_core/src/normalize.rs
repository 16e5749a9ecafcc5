//! Lenient coercion of raw form entries into a [`PredictionRequest`].
//!
//! Nothing in here fails: malformed numbers degrade to zero and an
//! unreadable publish date falls back to the submission instant.

use std::collections::BTreeMap;

use chrono::{
    DateTime, Duration, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc,
};
use shared::{
    domain::{
        FIELD_CHANNEL_SUBSCRIBERS, FIELD_CHANNEL_VIDEO_COUNT, FIELD_DURATION_MINUTES,
        FIELD_PUBLISH_DATE, FIELD_PUBLISH_HOUR, FIELD_TAG_COUNT, FIELD_TITLE,
    },
    protocol::PredictionRequest,
};

/// Wall-clock layouts a date/time form control may hand over.
const LOCAL_DATE_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Layout used to pre-fill the publish date control.
pub const PUBLISH_DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Builds the outgoing request from form entries in submission order.
///
/// Later entries with the same name win. Local wall-clock publish dates are
/// read in `tz`; `now` stands in for a missing or unreadable date.
pub fn normalize_form<Tz: TimeZone>(
    entries: &[(String, String)],
    tz: &Tz,
    now: DateTime<Utc>,
) -> PredictionRequest {
    let mut request = PredictionRequest {
        title: String::new(),
        publish_date: format_instant(now),
        publish_hour: 0,
        duration_minutes: 0.0,
        tag_count: 0.0,
        channel_subscribers: 0.0,
        channel_video_count: 0.0,
        extra: BTreeMap::new(),
    };

    for (name, value) in entries {
        match name.as_str() {
            FIELD_TITLE => request.title = value.clone(),
            FIELD_PUBLISH_DATE => request.publish_date = normalize_publish_date(value, tz, now),
            FIELD_PUBLISH_HOUR => request.publish_hour = parse_leading_int(value),
            FIELD_DURATION_MINUTES => request.duration_minutes = parse_leading_float(value),
            FIELD_TAG_COUNT => request.tag_count = parse_leading_float(value),
            FIELD_CHANNEL_SUBSCRIBERS => request.channel_subscribers = parse_leading_float(value),
            FIELD_CHANNEL_VIDEO_COUNT => request.channel_video_count = parse_leading_float(value),
            _ => {
                request.extra.insert(name.clone(), value.clone());
            }
        }
    }

    request
}

/// Reads the longest numeric prefix of `raw`, returning `0.0` when there is
/// none or the result is not finite.
pub fn parse_leading_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    end = skip_digits(bytes, end);
    let mut mantissa_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(bytes, end + 1);
        let frac_digits = frac_end - (end + 1);
        if mantissa_digits + frac_digits > 0 {
            end = frac_end;
            mantissa_digits += frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_end = skip_digits(bytes, exp_end);
        if digits_end > exp_end {
            end = digits_end;
        }
    }

    match s[..end].parse::<f64>() {
        // -0 collapses to 0 like every other "nothing useful" input.
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => 0.0,
    }
}

/// Reads a leading base-10 integer, ignoring anything after the digits.
pub fn parse_leading_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let end = skip_digits(bytes, sign_len);
    if end == sign_len {
        return 0;
    }
    s[..end].parse::<i64>().unwrap_or(0)
}

fn skip_digits(bytes: &[u8], mut at: usize) -> usize {
    while bytes.get(at).is_some_and(u8::is_ascii_digit) {
        at += 1;
    }
    at
}

/// Converts whatever the date control produced into a UTC ISO-8601 instant
/// with millisecond precision.
///
/// RFC 3339 input keeps its own offset. Wall-clock input is read in `tz`,
/// except a bare date, which is taken as UTC midnight.
pub fn normalize_publish_date<Tz: TimeZone>(raw: &str, tz: &Tz, now: DateTime<Utc>) -> String {
    let trimmed = raw.trim();
    let instant = DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_wall_clock(trimmed, tz))
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc())
        })
        .unwrap_or(now);
    format_instant(instant)
}

fn parse_wall_clock<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    LOCAL_DATE_TIME_FORMATS.iter().find_map(|format| {
        let naive = NaiveDateTime::parse_from_str(raw, format).ok()?;
        resolve_wall_clock(&naive, tz)
    })
}

/// A wall-clock time skipped by a forward transition is read with the offset
/// in force before the transition, which lands it just past the gap.
fn resolve_wall_clock<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    if let Some(local) = tz.from_local_datetime(naive).earliest() {
        return Some(local.with_timezone(&Utc));
    }
    let day_before = tz
        .from_local_datetime(&(*naive - Duration::days(1)))
        .earliest()?;
    let offset = day_before.offset().fix().local_minus_utc();
    Some((*naive - Duration::seconds(i64::from(offset))).and_utc())
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Value the publish date control is pre-filled with at start-up.
pub fn default_publish_date_input<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(PUBLISH_DATE_INPUT_FORMAT).to_string()
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
