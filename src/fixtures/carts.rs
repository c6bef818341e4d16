//! Cart fixture schema.

use serde::Deserialize;

/// Top-level shape of a cart fixture file: product ids in click order, one
/// entry per add-to-cart action.
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Product ids, possibly repeated
    pub lines: Vec<String>,
}
