//! Farm2Home
//!
//! Farm2Home is the cart, order and billing core of a farmer-to-buyer marketplace:
//! typed cart lines, pure consolidation, bill generation and rendering, plus the
//! catalog, favorites, orders, and persistence the surrounding application needs.

pub mod bill;
pub mod cart;
pub mod consolidation;
pub mod favorites;
pub mod fixtures;
pub mod orders;
pub mod prelude;
pub mod products;
pub mod store;
pub mod utils;
