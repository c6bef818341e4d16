//! Products
//!
//! Product records and the insertion-ordered [`Catalog`] they live in.

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque string identifier for a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Errors converting stored product records into [`Product`] values.
#[derive(Debug, Error)]
pub enum ProductError {
    /// The stored currency code is not a known ISO currency.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The stored price is negative (minor units).
    #[error("Negative unit price: {0}")]
    NegativePrice(i64),
}

/// A catalog product offered by a farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredProduct", into = "StoredProduct")]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Price per unit
    pub unit_price: Money<'static, Currency>,

    /// Image reference (URI), if any
    pub image: Option<String>,

    /// Name of the farmer selling the product, if known
    pub farmer: Option<String>,

    /// Units currently in stock
    pub stock: u32,
}

impl Product {
    /// Create a new product with no image or farmer attribution.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money<'static, Currency>,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            image: None,
            farmer: None,
            stock,
        }
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the selling farmer's name.
    #[must_use]
    pub fn with_farmer(mut self, farmer: impl Into<String>) -> Self {
        self.farmer = Some(farmer.into());
        self
    }
}

/// Serialized form of a [`Product`]; prices are stored as minor units plus
/// an ISO currency code.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredProduct {
    id: ProductId,
    name: String,
    unit_price_minor: i64,
    currency: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    farmer: Option<String>,
    #[serde(default)]
    stock: u32,
}

impl TryFrom<StoredProduct> for Product {
    type Error = ProductError;

    fn try_from(stored: StoredProduct) -> Result<Self, Self::Error> {
        let currency = iso::find(&stored.currency)
            .ok_or_else(|| ProductError::UnknownCurrency(stored.currency.clone()))?;

        if stored.unit_price_minor < 0 {
            return Err(ProductError::NegativePrice(stored.unit_price_minor));
        }

        Ok(Product {
            id: stored.id,
            name: stored.name,
            unit_price: Money::from_minor(stored.unit_price_minor, currency),
            image: stored.image,
            farmer: stored.farmer,
            stock: stored.stock,
        })
    }
}

impl From<Product> for StoredProduct {
    fn from(product: Product) -> Self {
        StoredProduct {
            id: product.id,
            name: product.name,
            unit_price_minor: product.unit_price.to_minor_units(),
            currency: product.unit_price.currency().iso_alpha_code.to_string(),
            image: product.image,
            farmer: product.farmer,
            stock: product.stock,
        }
    }
}

/// Errors related to catalog construction or stock movements.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product's currency differs from the catalog currency (id, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// A product with the same id is already in the catalog.
    #[error("Product {0} is already in the catalog")]
    DuplicateProduct(ProductId),

    /// No product with the given id exists.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// Not enough stock to satisfy a reservation.
    #[error("Not enough of product {id} available: only {available} left")]
    InsufficientStock {
        /// The product being reserved
        id: ProductId,
        /// Units currently in stock
        available: u32,
    },
}

/// Insertion-ordered product catalog with a single currency.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog with the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            products: Vec::new(),
            index: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from the given products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on a currency mismatch or duplicate product id.
    pub fn with_products(
        products: impl Into<Vec<Product>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new(currency);

        for product in products.into() {
            catalog.add(product)?;
        }

        Ok(catalog)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on a currency mismatch or duplicate product id.
    pub fn add(&mut self, product: Product) -> Result<(), CatalogError> {
        let product_currency = product.unit_price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id.clone(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if self.index.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id.clone()));
        }

        self.index.insert(product.id.clone(), self.products.len());
        self.products.push(product);

        Ok(())
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }

    /// Case-insensitive name-substring search, in catalog order.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let needle = term.to_lowercase();

        self.products
            .iter()
            .filter(|product| product.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Iterate over the products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Get the number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Reserve `quantity` units of a product, decrementing its stock.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if the id is unknown, or
    /// [`CatalogError::InsufficientStock`] if fewer than `quantity` units remain.
    pub fn reserve(&mut self, id: &ProductId, quantity: u32) -> Result<(), CatalogError> {
        let product = self.product_mut(id)?;

        if product.stock < quantity {
            return Err(CatalogError::InsufficientStock {
                id: id.clone(),
                available: product.stock,
            });
        }

        product.stock -= quantity;

        Ok(())
    }

    /// Return `quantity` units of a product to stock.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if the id is unknown.
    pub fn restock(&mut self, id: &ProductId, quantity: u32) -> Result<(), CatalogError> {
        let product = self.product_mut(id)?;

        product.stock = product.stock.saturating_add(quantity);

        Ok(())
    }

    fn product_mut(&mut self, id: &ProductId) -> Result<&mut Product, CatalogError> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;

        self.products
            .get_mut(idx)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{INR, USD};
    use testresult::TestResult;

    use super::*;

    fn test_products() -> [Product; 3] {
        [
            Product::new("p1", "Tomato", Money::from_minor(2000, INR), 50),
            Product::new("p2", "Onion", Money::from_minor(1500, INR), 30),
            Product::new("p3", "Red Onion", Money::from_minor(1800, INR), 10),
        ]
    }

    #[test]
    fn with_products_preserves_insertion_order() -> TestResult {
        let catalog = Catalog::with_products(test_products(), INR)?;

        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["Tomato", "Onion", "Red Onion"]);

        Ok(())
    }

    #[test]
    fn add_currency_mismatch_errors() {
        let mut catalog = Catalog::new(INR);

        let result = catalog.add(Product::new(
            "p1",
            "Tomato",
            Money::from_minor(2000, USD),
            50,
        ));

        match result {
            Err(CatalogError::CurrencyMismatch(id, product_currency, catalog_currency)) => {
                assert_eq!(id, ProductId::from("p1"));
                assert_eq!(product_currency, USD.iso_alpha_code);
                assert_eq!(catalog_currency, INR.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn add_duplicate_id_errors() -> TestResult {
        let mut catalog = Catalog::new(INR);

        catalog.add(Product::new(
            "p1",
            "Tomato",
            Money::from_minor(2000, INR),
            50,
        ))?;

        let result = catalog.add(Product::new(
            "p1",
            "Cherry Tomato",
            Money::from_minor(2500, INR),
            10,
        ));

        assert!(matches!(result, Err(CatalogError::DuplicateProduct(_))));

        Ok(())
    }

    #[test]
    fn get_returns_product_by_id() -> TestResult {
        let catalog = Catalog::with_products(test_products(), INR)?;

        let product = catalog
            .get(&ProductId::from("p2"))
            .ok_or("expected product p2")?;

        assert_eq!(product.name, "Onion");
        assert_eq!(product.unit_price, Money::from_minor(1500, INR));

        Ok(())
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() -> TestResult {
        let catalog = Catalog::with_products(test_products(), INR)?;

        let names: Vec<&str> = catalog
            .search("ONion")
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(names, vec!["Onion", "Red Onion"]);

        Ok(())
    }

    #[test]
    fn search_no_match_returns_empty() -> TestResult {
        let catalog = Catalog::with_products(test_products(), INR)?;

        assert!(catalog.search("mango").is_empty());

        Ok(())
    }

    #[test]
    fn reserve_decrements_stock() -> TestResult {
        let mut catalog = Catalog::with_products(test_products(), INR)?;
        let id = ProductId::from("p1");

        catalog.reserve(&id, 20)?;

        let product = catalog.get(&id).ok_or("expected product p1")?;
        assert_eq!(product.stock, 30);

        Ok(())
    }

    #[test]
    fn reserve_more_than_stock_errors() -> TestResult {
        let mut catalog = Catalog::with_products(test_products(), INR)?;
        let id = ProductId::from("p3");

        let err = catalog.reserve(&id, 11).expect_err("expected stock error");

        assert!(matches!(
            err,
            CatalogError::InsufficientStock { available: 10, .. }
        ));

        Ok(())
    }

    #[test]
    fn restock_returns_units() -> TestResult {
        let mut catalog = Catalog::with_products(test_products(), INR)?;
        let id = ProductId::from("p2");

        catalog.reserve(&id, 30)?;
        catalog.restock(&id, 5)?;

        let product = catalog.get(&id).ok_or("expected product p2")?;
        assert_eq!(product.stock, 5);

        Ok(())
    }

    #[test]
    fn reserve_unknown_product_errors() {
        let mut catalog = Catalog::new(INR);

        let err = catalog
            .reserve(&ProductId::from("ghost"), 1)
            .expect_err("expected not-found error");

        assert!(matches!(err, CatalogError::ProductNotFound(_)));
    }

    #[test]
    fn product_serde_round_trips_price_and_currency() -> TestResult {
        let product = Product::new("p1", "Tomato", Money::from_minor(2000, INR), 50)
            .with_image("tomato.png")
            .with_farmer("Ravi");

        let json = serde_json::to_string(&product)?;
        let back: Product = serde_json::from_str(&json)?;

        assert_eq!(back, product);
        assert_eq!(back.unit_price.currency(), INR);

        Ok(())
    }

    #[test]
    fn product_deserialization_rejects_unknown_currency() {
        let json = r#"{
            "id": "p1",
            "name": "Tomato",
            "unit_price_minor": 2000,
            "currency": "ZZZ",
            "stock": 1
        }"#;

        let result: Result<Product, _> = serde_json::from_str(json);

        assert!(result.is_err(), "expected unknown currency to fail");
    }

    #[test]
    fn product_deserialization_rejects_negative_price() {
        let json = r#"{
            "id": "p1",
            "name": "Tomato",
            "unit_price_minor": -100,
            "currency": "INR",
            "stock": 1
        }"#;

        let result: Result<Product, _> = serde_json::from_str(json);

        assert!(result.is_err(), "expected negative price to fail");
    }
}
