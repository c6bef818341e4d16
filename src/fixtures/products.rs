//! Product fixture schema and price parsing.

use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::fixtures::FixtureError;

/// Top-level shape of a products fixture file.
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// ISO code shared by every price in the file
    pub currency: String,

    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// One product entry in a fixture file.
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Price in major units, e.g. `"20.00"`
    pub price: String,

    /// Image reference, if any
    #[serde(default)]
    pub image: Option<String>,

    /// Selling farmer, if any
    #[serde(default)]
    pub farmer: Option<String>,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,
}

/// Parse a fixture price like `"20"` or `"18.50"` into minor units.
///
/// The fractional part may use at most the currency's exponent digits and is
/// right-padded, so `"18.5"` is 1850 minor units for a two-exponent currency.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] for negative values, non-numeric
/// input, or a fractional part longer than the currency allows.
pub fn parse_price(raw: &str, currency: &'static Currency) -> Result<i64, FixtureError> {
    let invalid = || FixtureError::InvalidPrice(raw.to_string());

    let trimmed = raw.trim();

    let (major_str, fraction_str) = match trimmed.split_once('.') {
        Some((major, fraction)) => (major, Some(fraction)),
        None => (trimmed, None),
    };

    let major: i64 = major_str.parse().map_err(|_err| invalid())?;

    if major < 0 || trimmed.starts_with('-') {
        return Err(invalid());
    }

    let fraction = match fraction_str {
        None => 0,
        Some(digits) => {
            let digit_count = u32::try_from(digits.len()).map_err(|_err| invalid())?;

            if digit_count == 0
                || digit_count > currency.exponent
                || !digits.chars().all(|c| c.is_ascii_digit())
            {
                return Err(invalid());
            }

            let parsed: i64 = digits.parse().map_err(|_err| invalid())?;

            parsed * 10_i64.pow(currency.exponent - digit_count)
        }
    };

    Ok(major * 10_i64.pow(currency.exponent) + fraction)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;

    use super::*;

    #[test]
    fn parses_whole_and_fractional_prices() {
        assert_eq!(parse_price("20", INR).ok(), Some(2000));
        assert_eq!(parse_price("20.00", INR).ok(), Some(2000));
        assert_eq!(parse_price("18.5", INR).ok(), Some(1850));
        assert_eq!(parse_price(" 15.25 ", INR).ok(), Some(1525));
    }

    #[test]
    fn rejects_negative_and_malformed_prices() {
        for raw in ["-1", "-0.50", "abc", "1.234", "1.", "1.x"] {
            assert!(
                matches!(parse_price(raw, INR), Err(FixtureError::InvalidPrice(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }
}
