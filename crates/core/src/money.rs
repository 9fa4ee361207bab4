//! Money formatting

use rust_decimal::Decimal;
use rusty_money::{Money, iso};

/// Format a monetary amount as a user-facing USD string, e.g. `$9.00`.
pub fn format_usd(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::USD).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_amounts_with_minor_digits() {
        assert_eq!(format_usd(Decimal::from(9)), "$9.00");
    }

    #[test]
    fn formats_fractional_amounts() {
        assert_eq!(format_usd(Decimal::new(450, 2)), "$4.50");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_usd(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn formats_thousands_with_separator() {
        assert_eq!(format_usd(Decimal::new(123_450, 2)), "$1,234.50");
    }
}
