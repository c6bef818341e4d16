//! Farm2Home prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bill::{Bill, BillError, BillRow},
    cart::{Cart, CartError, CartLine},
    consolidation::{ConsolidatedLine, consolidate, grand_total},
    favorites::Favorites,
    fixtures::{Fixture, FixtureError},
    orders::{Order, OrderBook, OrderError, OrderStatus},
    products::{Catalog, CatalogError, Product, ProductId},
    store::{JsonFileStore, MemoryStore, Store, StoreError},
};
