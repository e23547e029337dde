use chrono::{DateTime, Utc};

/// Human-readable GDP: `2.50T`, `3.40B`, `7.00M`, otherwise a grouped
/// two-decimal number. Missing or zero values render as `0`.
pub fn format_gdp(gdp: Option<f64>) -> String {
    let gdp = match gdp {
        Some(value) if value != 0.0 && !value.is_nan() => value,
        _ => return "0".to_string(),
    };

    if gdp >= 1e12 {
        format!("{:.2}T", gdp / 1e12)
    } else if gdp >= 1e9 {
        format!("{:.2}B", gdp / 1e9)
    } else if gdp >= 1e6 {
        format!("{:.2}M", gdp / 1e6)
    } else {
        group_thousands(gdp)
    }
}

/// e.g. "Oct 17, 2026, 9:30 AM UTC"
pub fn format_refreshed(refreshed: Option<DateTime<Utc>>) -> String {
    match refreshed {
        Some(dt) => dt.format("%b %-d, %Y, %-I:%M %p UTC").to_string(),
        None => "Never".to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let (whole, fraction) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", whole),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_gdp_by_magnitude() {
        assert_eq!(format_gdp(Some(2_500_000_000_000.0)), "2.50T");
        assert_eq!(format_gdp(Some(3_400_000_000.0)), "3.40B");
        assert_eq!(format_gdp(Some(7_000_000.0)), "7.00M");
        assert_eq!(format_gdp(Some(999.0)), "999.00");
    }

    #[test]
    fn missing_or_zero_gdp_is_zero() {
        assert_eq!(format_gdp(None), "0");
        assert_eq!(format_gdp(Some(0.0)), "0");
        assert_eq!(format_gdp(Some(f64::NAN)), "0");
    }

    #[test]
    fn small_values_are_grouped() {
        assert_eq!(format_gdp(Some(123_456.789)), "123,456.79");
        assert_eq!(format_gdp(Some(1_000.5)), "1,000.50");
        assert_eq!(format_gdp(Some(0.126)), "0.13");
    }

    #[test]
    fn formats_refresh_time() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 17, 21, 5, 0).unwrap();
        assert_eq!(format_refreshed(Some(dt)), "Oct 17, 2026, 9:05 PM UTC");
        assert_eq!(format_refreshed(None), "Never");
    }
}
