//! Cart
//!
//! Cart lines and the [`Cart`] that owns them. One [`CartLine`] is recorded
//! per add-to-cart action; duplicates for the same product are expected and
//! are merged later by [`crate::consolidation::consolidate`].

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors related to cart construction or line validation.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency (index, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line carries a zero quantity (index).
    #[error("Line {0} has a zero quantity")]
    ZeroQuantity(usize),

    /// A line carries a negative unit price (index).
    #[error("Line {0} has a negative unit price")]
    NegativePrice(usize),

    /// A stored line's currency code is not a known ISO currency.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// One add-to-cart action for a product, with the price captured at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredCartLine", into = "StoredCartLine")]
pub struct CartLine {
    /// Id of the product this line refers to
    pub product_id: ProductId,

    /// Product name at add time
    pub name: String,

    /// Price per unit at add time
    pub unit_price: Money<'static, Currency>,

    /// Image reference carried over from the product, if any
    pub image: Option<String>,

    /// Number of units this line represents
    pub quantity: u32,
}

impl CartLine {
    /// Create a single-unit line from a catalog product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self::with_quantity(product, 1)
    }

    /// Create a line from a catalog product with an explicit quantity.
    #[must_use]
    pub fn with_quantity(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// The price of this line: unit price times quantity, exact in minor units.
    #[must_use]
    pub fn line_total(&self) -> Money<'static, Currency> {
        Money::from_minor(
            self.unit_price.to_minor_units() * i64::from(self.quantity),
            self.unit_price.currency(),
        )
    }
}

/// Serialized form of a [`CartLine`]. A missing `quantity` means one unit,
/// matching records written before quantities were tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCartLine {
    product_id: ProductId,
    name: String,
    unit_price_minor: i64,
    currency: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl TryFrom<StoredCartLine> for CartLine {
    type Error = CartError;

    fn try_from(stored: StoredCartLine) -> Result<Self, Self::Error> {
        let currency = iso::find(&stored.currency)
            .ok_or_else(|| CartError::UnknownCurrency(stored.currency.clone()))?;

        Ok(CartLine {
            product_id: stored.product_id,
            name: stored.name,
            unit_price: Money::from_minor(stored.unit_price_minor, currency),
            image: stored.image,
            quantity: stored.quantity,
        })
    }
}

impl From<CartLine> for StoredCartLine {
    fn from(line: CartLine) -> Self {
        StoredCartLine {
            product_id: line.product_id,
            name: line.name,
            unit_price_minor: line.unit_price.to_minor_units(),
            currency: line.unit_price.currency().iso_alpha_code.to_string(),
            image: line.image,
            quantity: line.quantity,
        }
    }
}

/// A buyer's cart: an ordered sequence of lines in a single currency.
#[derive(Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart with the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart from the given lines.
    ///
    /// Validation happens here, at the boundary: the consolidation functions
    /// assume lines they receive have already passed these checks.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line's currency differs from the cart
    /// currency, its quantity is zero, or its unit price is negative.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        lines
            .iter()
            .enumerate()
            .try_for_each(|(i, line)| validate_line(i, line, currency))?;

        Ok(Cart { lines, currency })
    }

    /// Record one add-to-cart action for a product (a single unit).
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product fails boundary validation.
    pub fn add(&mut self, product: &Product) -> Result<(), CartError> {
        self.add_line(CartLine::from_product(product))
    }

    /// Record an add-to-cart action with an explicit quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product fails boundary validation.
    pub fn add_with_quantity(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        self.add_line(CartLine::with_quantity(product, quantity))
    }

    /// Append a pre-built line, validating it against the cart currency.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the line fails boundary validation.
    pub fn add_line(&mut self, line: CartLine) -> Result<(), CartError> {
        validate_line(self.lines.len(), &line, self.currency)?;

        self.lines.push(line);

        Ok(())
    }

    /// Remove every line for the given product. Removing an absent id is a
    /// no-op; the cart is left equivalent.
    pub fn remove_product(&mut self, id: &ProductId) {
        self.lines.retain(|line| line.product_id != *id);
    }

    /// The raw lines, in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the subtotal of the cart. Zero for an empty cart.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        let minor: i64 = self
            .lines
            .iter()
            .map(|line| line.line_total().to_minor_units())
            .sum();

        Money::from_minor(minor, self.currency)
    }
}

fn validate_line(
    index: usize,
    line: &CartLine,
    currency: &'static Currency,
) -> Result<(), CartError> {
    let line_currency = line.unit_price.currency();

    if line_currency != currency {
        return Err(CartError::CurrencyMismatch(
            index,
            line_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ));
    }

    if line.quantity == 0 {
        return Err(CartError::ZeroQuantity(index));
    }

    if line.unit_price.to_minor_units() < 0 {
        return Err(CartError::NegativePrice(index));
    }

    Ok(())
}
