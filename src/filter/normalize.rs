use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Case- and accent-insensitive form of `text`: canonical decomposition,
/// combining marks removed, then lower-cased.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .to_lowercase()
}

/// Text a record field contributes to prefix matching. Nulls, arrays and
/// objects never match.
pub fn record_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Calendar day of a record timestamp. Offsets are kept as written: the day is
/// the one printed in the value, not the one in any local time zone.
pub fn record_day(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.naive_local().date());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|stamp| stamp.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize("José Pérez"), "jose perez");
        assert_eq!(normalize("MUÑOZ"), "munoz");
        assert_eq!(normalize("Ürología"), "urologia");
    }

    #[test]
    fn record_days_ignore_time_of_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(record_day(&json!("2024-03-10T23:59:00")), Some(day));
        assert_eq!(record_day(&json!("2024-03-10T23:59:00-04:00")), Some(day));
        assert_eq!(record_day(&json!("2024-03-10 08:15")), Some(day));
        assert_eq!(record_day(&json!("2024-03-10")), Some(day));
        assert_eq!(record_day(&json!("yesterday")), None);
        assert_eq!(record_day(&json!(20240310)), None);
    }

    #[test]
    fn scalar_values_become_text() {
        assert_eq!(record_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(record_text(&json!(null)), None);
        assert_eq!(record_text(&json!(["a"])), None);
    }
}
