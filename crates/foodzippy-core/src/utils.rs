//! Utility functions shared by the admin client and console

use chrono::{DateTime, NaiveDate, Utc};

/// First instant of `month` and last second of its final day, both in UTC
///
/// Returns `None` for an out-of-range month.
#[must_use]
pub fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next.pred_opt()?;

    Some((
        first.and_hms_opt(0, 0, 0)?.and_utc(),
        last.and_hms_opt(23, 59, 59)?.and_utc(),
    ))
}

/// Uppercase the first character, leaving the rest untouched
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Substitute `{{key}}` placeholders; unknown placeholders are left as-is
#[must_use]
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{{{key}}}}}"), value)
        })
}

/// Parse a coordinate that the backend may send as a number or a numeric string
#[must_use]
pub fn parse_coordinate(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (parsed.is_finite() && parsed != 0.0).then_some(parsed)
}

/// Format an amount in rupees the way the console displays it
#[must_use]
pub fn format_rupees(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("₹{amount:.0}")
    } else {
        format!("₹{amount:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(2025, 2, "2025-02-01T00:00:00+00:00", "2025-02-28T23:59:59+00:00")]
    #[case(2024, 2, "2024-02-01T00:00:00+00:00", "2024-02-29T23:59:59+00:00")]
    #[case(2025, 12, "2025-12-01T00:00:00+00:00", "2025-12-31T23:59:59+00:00")]
    fn test_month_bounds(
        #[case] year: i32,
        #[case] month: u32,
        #[case] start: &str,
        #[case] end: &str,
    ) {
        let (from, to) = month_bounds(year, month).unwrap();
        assert_eq!(from.to_rfc3339(), start);
        assert_eq!(to.to_rfc3339(), end);
    }

    #[test]
    fn test_month_bounds_rejects_invalid_month() {
        assert!(month_bounds(2025, 0).is_none());
        assert!(month_bounds(2025, 13).is_none());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("restaurant"), "Restaurant");
        assert_eq!(capitalize("cloud-kitchen"), "Cloud-kitchen");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_render_template() {
        let rendered = render_template(
            "Dear {{name}}, your ID is {{loginId}}. {{unknown}}",
            &[("name", "Ravi"), ("loginId", "DP-001")],
        );
        assert_eq!(rendered, "Dear Ravi, your ID is DP-001. {{unknown}}");
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate(&json!(12.97)), Some(12.97));
        assert_eq!(parse_coordinate(&json!("77.59")), Some(77.59));
        assert_eq!(parse_coordinate(&json!("north")), None);
        assert_eq!(parse_coordinate(&json!(0)), None);
        assert_eq!(parse_coordinate(&json!(null)), None);
    }

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(150.0), "₹150");
        assert_eq!(format_rupees(99.5), "₹99.50");
    }
}
