//! Response shaping: datetime rendering and model-to-view conversion.

use chrono::{DateTime, Utc};

/// Wire format for timestamps in shaped responses.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders a timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn render_datetime(value: &DateTime<Utc>) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Renders an optional timestamp, or the empty string when absent.
///
/// Every nullable datetime in a shaped response goes through this so
/// that "not recorded" always reads the same on the wire.
pub fn render_datetime_opt(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(inner) => render_datetime(&inner),
        None => String::new(),
    }
}

/// Converts fetched rows into their serializable view shape.
pub fn transform<M, V: From<M>>(records: Vec<M>) -> Vec<V> {
    records.into_iter().map(V::from).collect()
}

/// Converts a single record into a one-element view sequence.
pub fn transform_one<M, V: From<M>>(record: M) -> Vec<V> {
    vec![V::from(record)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_datetime_format() {
        let value = Utc.with_ymd_and_hms(2026, 4, 12, 9, 5, 3).unwrap();
        assert_eq!(render_datetime(&value), "2026-04-12 09:05:03");
    }

    #[test]
    fn test_render_datetime_opt_none_is_empty() {
        assert_eq!(render_datetime_opt(None), "");
    }

    #[test]
    fn test_render_datetime_opt_some() {
        let value = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(render_datetime_opt(Some(value)), "2026-01-01 00:00:00");
    }

    #[derive(Debug, PartialEq)]
    struct Raw(u32);

    #[derive(Debug, PartialEq)]
    struct View(String);

    impl From<Raw> for View {
        fn from(raw: Raw) -> Self {
            View(raw.0.to_string())
        }
    }

    #[test]
    fn test_transform_keeps_order() {
        let shaped: Vec<View> = transform(vec![Raw(3), Raw(1), Raw(2)]);
        assert_eq!(
            shaped,
            vec![
                View("3".to_string()),
                View("1".to_string()),
                View("2".to_string())
            ]
        );
    }

    #[test]
    fn test_transform_empty_input() {
        let shaped: Vec<View> = transform(Vec::<Raw>::new());
        assert!(shaped.is_empty());
    }

    #[test]
    fn test_transform_one_wraps_single_record() {
        let shaped: Vec<View> = transform_one(Raw(7));
        assert_eq!(shaped, vec![View("7".to_string())]);
    }
}
