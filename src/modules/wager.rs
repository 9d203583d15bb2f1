//! Wager parsing and validation

use crate::modules::error::WagerError;

/// Parse the wager field against the current balance.
pub fn parse_wager(input: &str, balance: f64) -> Result<f64, WagerError> {
    let trimmed = input.trim();
    let wager: f64 = trimmed
        .parse()
        .map_err(|_| WagerError::NotANumber(trimmed.to_string()))?;
    if !wager.is_finite() {
        return Err(WagerError::NotANumber(trimmed.to_string()));
    }
    if wager <= 0.0 {
        return Err(WagerError::NotPositive(wager));
    }
    if wager > balance {
        return Err(WagerError::ExceedsBalance { wager, balance });
    }
    Ok(wager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_valid_wager() {
        assert_eq!(parse_wager("10", 100.0), Ok(10.0));
        assert_eq!(parse_wager(" 2.5 ", 100.0), Ok(2.5));
        assert_eq!(parse_wager("100", 100.0), Ok(100.0));
    }

    #[test]
    fn test_rejects_text() {
        assert_eq!(parse_wager("abc", 100.0), Err(WagerError::NotANumber("abc".into())));
        assert!(matches!(parse_wager("", 100.0), Err(WagerError::NotANumber(_))));
        assert!(matches!(parse_wager("NaN", 100.0), Err(WagerError::NotANumber(_))));
        assert!(matches!(parse_wager("inf", 100.0), Err(WagerError::NotANumber(_))));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(parse_wager("0", 100.0), Err(WagerError::NotPositive(0.0)));
        assert_eq!(parse_wager("-5", 100.0), Err(WagerError::NotPositive(-5.0)));
    }

    #[test]
    fn test_rejects_over_balance() {
        assert_eq!(
            parse_wager("50", 30.0),
            Err(WagerError::ExceedsBalance { wager: 50.0, balance: 30.0 })
        );
    }

    proptest! {
        #[test]
        fn prop_accepted_wagers_are_in_range(w in -1000.0f64..1000.0, balance in 0.0f64..500.0) {
            match parse_wager(&w.to_string(), balance) {
                Ok(v) => prop_assert!(v > 0.0 && v <= balance),
                Err(_) => prop_assert!(w <= 0.0 || w > balance),
            }
        }
    }
}
