//! Number formatting shared by the text exporters.

/// Format `value` with `digits` significant digits, `%g` style: trailing
/// zeros are dropped and exponent notation is used when the exponent is
/// below -4 or at least `digits`.
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_notation() {
        assert_eq!(format_significant(1.0, 7), "1");
        assert_eq!(format_significant(-0.5, 7), "-0.5");
        assert_eq!(format_significant(123.456789, 7), "123.4568");
        assert_eq!(format_significant(0.1 + 0.2, 7), "0.3");
        assert_eq!(format_significant(1234567.0, 7), "1234567");
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(format_significant(12345678.0, 7), "1.234568e+07");
        assert_eq!(format_significant(0.0000012, 7), "1.2e-06");
        assert_eq!(format_significant(0.00001, 7), "1e-05");
    }

    #[test]
    fn test_zero_and_non_finite() {
        assert_eq!(format_significant(0.0, 7), "0");
        assert_eq!(format_significant(-0.0, 7), "0");
        assert_eq!(format_significant(f64::INFINITY, 7), "inf");
    }

    #[test]
    fn test_rounding_carries_into_exponent() {
        assert_eq!(format_significant(9.9999999, 7), "10");
        assert_eq!(format_significant(0.99999999, 3), "1");
    }
}
