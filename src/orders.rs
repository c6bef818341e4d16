//! Orders
//!
//! Order placement against the catalog. Placing an order checks and reserves
//! stock; cancelling returns the units. Totals are computed from the
//! catalog's current price, not the price captured in the cart, so a buyer
//! always pays what the farmer is charging at order time.

use std::fmt;

use chrono::{DateTime, Utc};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    consolidation::ConsolidatedLine,
    products::{Catalog, CatalogError, ProductId},
};

/// Errors related to placing or updating orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Wrapped catalog error (unknown product, insufficient stock).
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No order with the given id exists.
    #[error("Order {0} not found")]
    OrderNotFound(u64),

    /// The order was cancelled and its status can no longer change.
    #[error("Order {0} is cancelled")]
    AlreadyCancelled(u64),
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Placed and stock reserved
    Confirmed,

    /// Handed over to the buyer
    Delivered,

    /// Cancelled; reserved stock returned
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Confirmed => f.write_str("confirmed"),
            OrderStatus::Delivered => f.write_str("delivered"),
            OrderStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A placed order for a single product.
#[derive(Debug, Clone)]
pub struct Order {
    /// Order id, unique within its [`OrderBook`]
    pub id: u64,

    /// Product ordered
    pub product_id: ProductId,

    /// Product name at order time
    pub product_name: String,

    /// Selling farmer, if the product names one
    pub farmer: Option<String>,

    /// Buyer placing the order
    pub buyer: String,

    /// Units ordered
    pub quantity: u32,

    /// Total charged: catalog unit price times quantity
    pub total: Money<'static, Currency>,

    /// Current lifecycle status
    pub status: OrderStatus,

    /// When the order was placed
    pub created_at: DateTime<Utc>,
}

/// In-memory order ledger with sequential ids.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    next_id: u64,
}

impl OrderBook {
    /// Create an empty order book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an order for `quantity` units of a product, reserving stock.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Catalog`] if the product is unknown or fewer
    /// than `quantity` units remain in stock.
    pub fn place(
        &mut self,
        catalog: &mut Catalog,
        buyer: &str,
        product_id: &ProductId,
        quantity: u32,
        created_at: DateTime<Utc>,
    ) -> Result<u64, OrderError> {
        let (product_name, farmer, unit_price) = {
            let product = catalog
                .get(product_id)
                .ok_or_else(|| CatalogError::ProductNotFound(product_id.clone()))?;

            (
                product.name.clone(),
                product.farmer.clone(),
                product.unit_price,
            )
        };

        catalog.reserve(product_id, quantity)?;

        let id = self.next_id;
        self.next_id += 1;

        self.orders.push(Order {
            id,
            product_id: product_id.clone(),
            product_name,
            farmer,
            buyer: buyer.to_string(),
            quantity,
            total: Money::from_minor(
                unit_price.to_minor_units() * i64::from(quantity),
                unit_price.currency(),
            ),
            status: OrderStatus::Confirmed,
            created_at,
        });

        Ok(id)
    }

    /// Place one order per consolidated cart row.
    ///
    /// Stock for every row is checked before anything is reserved, so a
    /// failing row leaves the catalog untouched.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Catalog`] if any row's product is unknown or
    /// lacks stock; no order is placed in that case.
    pub fn place_cart(
        &mut self,
        catalog: &mut Catalog,
        buyer: &str,
        consolidated: &[ConsolidatedLine],
        created_at: DateTime<Utc>,
    ) -> Result<Vec<u64>, OrderError> {
        for row in consolidated {
            let product = catalog
                .get(&row.product_id)
                .ok_or_else(|| CatalogError::ProductNotFound(row.product_id.clone()))?;

            if product.stock < row.quantity {
                return Err(OrderError::Catalog(CatalogError::InsufficientStock {
                    id: row.product_id.clone(),
                    available: product.stock,
                }));
            }
        }

        let mut ids = Vec::with_capacity(consolidated.len());

        for row in consolidated {
            ids.push(self.place(catalog, buyer, &row.product_id, row.quantity, created_at)?);
        }

        Ok(ids)
    }

    /// Cancel an order, returning its reserved units to stock.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::OrderNotFound`] for an unknown id,
    /// [`OrderError::AlreadyCancelled`] if the order was already cancelled,
    /// or [`OrderError::Catalog`] if the product has left the catalog.
    pub fn cancel(&mut self, catalog: &mut Catalog, id: u64) -> Result<(), OrderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(OrderError::OrderNotFound(id))?;

        if order.status == OrderStatus::Cancelled {
            return Err(OrderError::AlreadyCancelled(id));
        }

        catalog.restock(&order.product_id, order.quantity)?;
        order.status = OrderStatus::Cancelled;

        Ok(())
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::OrderNotFound`] for an unknown id, or
    /// [`OrderError::AlreadyCancelled`] if the order was cancelled; use
    /// [`OrderBook::cancel`] to cancel, so stock is returned.
    pub fn set_status(&mut self, id: u64, status: OrderStatus) -> Result<(), OrderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(OrderError::OrderNotFound(id))?;

        if order.status == OrderStatus::Cancelled {
            return Err(OrderError::AlreadyCancelled(id));
        }

        order.status = status;

        Ok(())
    }

    /// Look up an order by id.
    pub fn get(&self, id: u64) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// A buyer's orders, newest first.
    pub fn for_buyer(&self, buyer: &str) -> Vec<&Order> {
        self.orders
            .iter()
            .rev()
            .filter(|order| order.buyer == buyer)
            .collect()
    }

    /// A farmer's sales, newest first.
    pub fn for_farmer(&self, farmer: &str) -> Vec<&Order> {
        self.orders
            .iter()
            .rev()
            .filter(|order| order.farmer.as_deref() == Some(farmer))
            .collect()
    }

    /// Iterate over all orders, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Get the number of orders placed, including cancelled ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if no orders have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
