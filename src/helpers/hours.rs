//! Numeric rules for hour cells and the totals derived from them.

/// Reads the leading decimal numeral of `raw`, if any.
///
/// Leading whitespace is skipped and anything after the numeral is ignored,
/// so `"8h"` reads as `8.0`. Returns `None` when there is no numeral or the
/// value is not finite.
pub fn parse_hours(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parsed value of an optional cell, with empty or malformed input counting as zero.
pub fn hours_or_zero(raw: Option<&str>) -> f64 {
    raw.and_then(parse_hours).unwrap_or(0.0)
}

/// Fixed two-decimal rendering used for every sum and total.
pub fn format_hours(value: f64) -> String {
    format!("{:.2}", value)
}

/// Sums raw cell strings and renders the result.
pub fn sum_hours<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let total: f64 = values.into_iter().map(|v| hours_or_zero(Some(v))).sum();
    format_hours(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(parse_hours("8.00"), Some(8.0));
        assert_eq!(parse_hours("  4.5"), Some(4.5));
        assert_eq!(parse_hours(".5"), Some(0.5));
        assert_eq!(parse_hours("7."), Some(7.0));
        assert_eq!(parse_hours("-1.25"), Some(-1.25));
        assert_eq!(parse_hours("1e1"), Some(10.0));
    }

    #[test]
    fn reads_leading_numeral_only() {
        assert_eq!(parse_hours("8h"), Some(8.0));
        assert_eq!(parse_hours("3.5 hours"), Some(3.5));
        assert_eq!(parse_hours("2e"), Some(2.0));
        assert_eq!(parse_hours("1.2.3"), Some(1.2));
    }

    #[test]
    fn rejects_non_numerals() {
        assert_eq!(parse_hours(""), None);
        assert_eq!(parse_hours("abc"), None);
        assert_eq!(parse_hours("."), None);
        assert_eq!(parse_hours("-"), None);
        assert_eq!(parse_hours("inf"), None);
        assert_eq!(parse_hours("Infinity"), None);
        assert_eq!(parse_hours("-Infinity"), None);
        assert_eq!(parse_hours("NaN"), None);
        assert_eq!(parse_hours("1e400"), None);
    }

    #[test]
    fn sums_with_two_decimals() {
        assert_eq!(sum_hours(["8.00", "8.00", "8.00", "", ""]), "24.00");
        assert_eq!(sum_hours(["0.1", "0.2"]), "0.30");
        assert_eq!(sum_hours(["Infinity", "8"]), "8.00");
        assert_eq!(sum_hours(["abc", "1.005"]), "1.00");
        assert_eq!(sum_hours(std::iter::empty()), "0.00");
    }
}
