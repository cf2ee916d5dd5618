//! Minor-unit / major-unit conversions.
//!
//! API amounts arrive as signed minor units (pence) where a debit is
//! negative. Display amounts are major units with the sign flipped, so a
//! purchase shows as a positive figure.

/// Minor units per major unit.
pub const MINOR_PER_MAJOR: i64 = 100;

/// Signed major units, sign preserved: `amount / 100`.
pub fn major_from_minor(amount: i64) -> f64 {
    amount as f64 / MINOR_PER_MAJOR as f64
}

/// Format a major-unit value with two fractional digits, rounding half away
/// from zero.
pub fn format_major(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid "-0.00"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.2}")
}

/// Format an exact minor-unit amount as a major-unit string.
pub fn format_minor(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let per = MINOR_PER_MAJOR as u64;
    format!("{sign}{}.{:02}", abs / per, abs % per)
}

/// Display string for a transaction amount: sign flipped, two decimals.
/// Works on the magnitude so `i64::MIN` formats instead of overflowing.
pub fn display_amount(amount: i64) -> String {
    let sign = if amount > 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let per = MINOR_PER_MAJOR as u64;
    format!("{sign}{}.{:02}", abs / per, abs % per)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_becomes_positive_spend() {
        assert_eq!(display_amount(-1250), "12.50");
        assert_eq!(display_amount(300), "-3.00");
        assert_eq!(display_amount(0), "0.00");
    }

    #[test]
    fn test_display_amount_at_i64_bounds() {
        assert_eq!(display_amount(i64::MIN), "92233720368547758.08");
        assert_eq!(display_amount(i64::MAX), "-92233720368547758.07");
    }

    #[test]
    fn test_format_minor_small_values() {
        assert_eq!(format_minor(5), "0.05");
        assert_eq!(format_minor(-5), "-0.05");
        assert_eq!(format_minor(0), "0.00");
        assert_eq!(format_minor(123456), "1234.56");
    }

    #[test]
    fn test_format_major_rounds_half_away_from_zero() {
        assert_eq!(format_major(0.125), "0.13");
        assert_eq!(format_major(-0.125), "-0.13");
        assert_eq!(format_major(200.0 - 200.0), "0.00");
        assert_eq!(format_major(-0.001), "0.00");
    }
}
