//! Domain Value Objects
//!
//! Validated product inputs. A [`ProductDraft`] can only be built from
//! values that pass every field rule.

use std::fmt;
use std::str::FromStr;

use kernel::validation::ModelState;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("The value '{0}' is not valid for Price.")]
    Invalid(String),

    #[error("The field Price must be zero or greater.")]
    Negative,
}

/// Non-negative exact decimal price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, PriceError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(value.normalize()))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value =
            Decimal::from_str(trimmed).map_err(|_| PriceError::Invalid(trimmed.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated product fields, ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    name: String,
    category: String,
    description: String,
    price: Price,
}

impl ProductDraft {
    /// Validate raw form values.
    ///
    /// Every failing field is reported; the draft exists only when none fail.
    pub fn new(
        name: &str,
        category: &str,
        description: &str,
        price: &str,
    ) -> Result<Self, ModelState> {
        let mut state = ModelState::new();

        state.require("Name", name);
        state.require("Category", category);
        state.require("Description", description);

        let price = if state.require("Price", price) {
            match price.parse::<Price>() {
                Ok(price) => Some(price),
                Err(e) => {
                    state.add_error("Price", e.to_string());
                    None
                }
            }
        } else {
            None
        };

        match price {
            Some(price) if state.is_valid() => Ok(Self {
                name: name.trim().to_string(),
                category: category.trim().to_string(),
                description: description.trim().to_string(),
                price,
            }),
            _ => Err(state),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Price {
        self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_parse() {
        assert_eq!("19.99".parse::<Price>().unwrap().to_string(), "19.99");
        assert_eq!(" 0 ".parse::<Price>().unwrap(), Price::ZERO);
        assert_eq!("-0".parse::<Price>().unwrap(), Price::ZERO);
        assert_eq!("-1".parse::<Price>(), Err(PriceError::Negative));
        assert_eq!(
            "abc".parse::<Price>(),
            Err(PriceError::Invalid("abc".to_string()))
        );
    }

    #[test]
    fn test_price_is_exact() {
        let price = "0.10".parse::<Price>().unwrap();
        let sum = price.amount() + "0.20".parse::<Price>().unwrap().amount();
        assert_eq!(sum, Decimal::from_str("0.3").unwrap());
    }

    #[test]
    fn test_draft_trims_fields() {
        let draft = ProductDraft::new(" Laptop ", "Electronics", "15 inch", "999.50").unwrap();
        assert_eq!(draft.name(), "Laptop");
        assert_eq!(draft.price().amount(), Decimal::new(9995, 1));
    }

    #[test]
    fn test_draft_reports_every_field() {
        let state = ProductDraft::new("", " ", "", "").unwrap_err();
        assert_eq!(state.error_count(), 4);
        assert_eq!(state.errors_for("Name"), ["The Name field is required."]);
        assert_eq!(state.errors_for("Price"), ["The Price field is required."]);
    }

    #[test]
    fn test_draft_rejects_negative_price() {
        let state = ProductDraft::new("Pen", "Office", "Blue ink", "-5").unwrap_err();
        assert_eq!(state.error_count(), 1);
        assert!(state.has_error("Price"));
    }
}
