//! Fixtures
//!
//! YAML-backed catalogs and carts for demos and integration tests. A fixture
//! set named `market` is read from `fixtures/products/market.yml` and
//! `fixtures/carts/market.yml` under the base path.

use std::{fs, path::PathBuf};

use rusty_money::{Money, iso};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartLine},
    fixtures::{carts::CartFixture, products::ProductsFixture},
    products::{Catalog, CatalogError, Product, ProductId},
};

pub mod carts;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A cart fixture references a product the products fixture doesn't define
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Not enough cart lines in the fixture
    #[error("Not enough cart lines in fixture, available: {available}, requested: {requested}")]
    NotEnoughLines {
        /// Number of lines defined in the fixture
        available: usize,
        /// Number of lines requested
        requested: usize,
    },

    /// Catalog construction error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart construction error
    #[error("Failed to build cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products in file order
    products: Vec<Product>,

    /// Cart line product ids in click order
    cart_ids: Vec<ProductId>,

    /// Currency for the fixture set
    currency: Option<&'static iso::Currency>,
}

impl Fixture {
    /// Create a new empty fixture with the default base path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with a custom base path.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            cart_ids: Vec::new(),
            currency: None,
        }
    }

    /// Load the products and cart files of a named fixture set.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if either file cannot be read or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?;
        fixture.load_cart(name)?;

        Ok(fixture)
    }

    /// Load products from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed, the
    /// currency code is unknown, or a price is malformed.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let currency = iso::find(&fixture.currency)
            .ok_or_else(|| FixtureError::UnknownCurrency(fixture.currency.clone()))?;

        self.currency = Some(currency);

        for entry in fixture.products {
            let minor_units = products::parse_price(&entry.price, currency)?;

            let mut product = Product::new(
                entry.id.as_str(),
                entry.name,
                Money::from_minor(minor_units, currency),
                entry.stock,
            );

            product.image = entry.image;
            product.farmer = entry.farmer;

            self.products.push(product);
        }

        Ok(self)
    }

    /// Load cart lines from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        self.cart_ids
            .extend(fixture.lines.iter().map(|id| ProductId::from(id.as_str())));

        Ok(self)
    }

    /// Build a catalog from the loaded products.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if no products were loaded, or a
    /// wrapped [`CatalogError`] if the products don't form a valid catalog.
    pub fn catalog(&self) -> Result<Catalog, FixtureError> {
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;

        Ok(Catalog::with_products(self.products.clone(), currency)?)
    }

    /// Build a cart from the first `n` loaded lines (all of them if `None`).
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if more lines are requested than the
    /// fixture defines, or a line references an unknown product.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart, FixtureError> {
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;
        let requested = n.unwrap_or(self.cart_ids.len());

        if requested > self.cart_ids.len() {
            return Err(FixtureError::NotEnoughLines {
                available: self.cart_ids.len(),
                requested,
            });
        }

        let lines = self
            .cart_ids
            .iter()
            .take(requested)
            .map(|id| {
                self.products
                    .iter()
                    .find(|product| product.id == *id)
                    .map(CartLine::from_product)
                    .ok_or_else(|| FixtureError::ProductNotFound(id.as_str().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Cart::with_lines(lines, currency)?)
    }

    /// Currency of the loaded fixture set, if products have been loaded.
    #[must_use]
    pub fn currency(&self) -> Option<&'static iso::Currency> {
        self.currency
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
