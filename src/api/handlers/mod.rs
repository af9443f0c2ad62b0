//! HTTP handlers and the input helpers they share.
//!
//! Every mutating handler follows the same protocol:
//! 1) locate the target row, `404` when it's absent;
//! 2) validate the form fields, `400` before anything is written;
//! 3) apply the change and commit, rolling back and answering `400` with the
//!    store's message on any failure.

pub mod baked_goods;
pub mod bakeries;
pub mod health;
pub mod root;
pub mod types;

use sqlx::{Sqlite, Transaction};
use tracing::error;

use super::error::ApiError;

pub const BAKERY_NOT_FOUND: &str = "Bakery not found";
pub const BAKED_GOOD_NOT_FOUND: &str = "Baked good not found";
pub const NO_BAKED_GOODS: &str = "No baked goods found";

/// Path ids that aren't integers can't match a row.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Treat absent, empty and whitespace-only form values alike. Values that
/// pass are returned as sent.
pub fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Parse a price as a whole number.
///
/// `"3"` and `"3.0"` both yield `3`; `"3.5"` is rejected instead of being
/// truncated.
pub fn parse_price(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    if let Ok(price) = raw.parse::<i64>() {
        return Ok(price);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => {
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            if value >= i64::MIN as f64 && value < i64::MAX as f64 {
                #[allow(clippy::cast_possible_truncation)]
                Ok(value as i64)
            } else {
                Err(format!("price out of range: '{raw}'"))
            }
        }
        Ok(_) => Err(format!("price must be a whole number: '{raw}'")),
        Err(_) => Err(format!("could not convert price to a number: '{raw}'")),
    }
}

pub fn parse_bakery_id(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid literal for bakery_id, expected an integer: '{}'", raw.trim()))
}

/// Roll back `tx` after `err` and hand the error back to the caller.
pub(crate) async fn rollback(tx: Transaction<'_, Sqlite>, err: ApiError) -> ApiError {
    if let Err(rollback_err) = tx.rollback().await {
        error!("Failed to roll back transaction: {rollback_err}");
    }
    err
}


#[cfg(test)]
mod input_tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id("7"), Some(7));
        assert_eq!(parse_id("-1"), Some(-1));
        assert_eq!(parse_id("seven"), None);
        assert_eq!(parse_id("1.5"), None);
    }

    #[test]
    fn required_filters_blank_values() {
        assert_eq!(required(None), None);
        assert_eq!(required(Some(String::new())), None);
        assert_eq!(required(Some("   ".to_string())), None);
        assert_eq!(required(Some(" Rye ".to_string())), Some(" Rye ".to_string()));
    }

    #[test]
    fn parse_price_keeps_whole_numbers() {
        assert_eq!(parse_price("3"), Ok(3));
        assert_eq!(parse_price(" 12 "), Ok(12));
        assert_eq!(parse_price("3.0"), Ok(3));
        assert_eq!(parse_price("-2"), Ok(-2));
    }

    #[test]
    fn parse_price_rejects_fractions_and_text() {
        assert!(parse_price("3.5").is_err_and(|msg| msg.contains("whole number")));
        assert!(parse_price("abc").is_err_and(|msg| msg.contains("'abc'")));
        assert!(parse_price("NaN").is_err());
        assert!(parse_price("1e300").is_err_and(|msg| msg.contains("out of range")));
    }

    #[test]
    fn parse_bakery_id_requires_an_integer() {
        assert_eq!(parse_bakery_id("1"), Ok(1));
        assert!(parse_bakery_id("1.0").is_err());
        assert!(parse_bakery_id("one").is_err_and(|msg| msg.contains("'one'")));
    }
}
