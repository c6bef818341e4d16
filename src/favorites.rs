//! Favorites
//!
//! A buyer's favorited products: an ordered, duplicate-free set of ids that
//! can be projected back onto a catalog for display.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::products::{Catalog, Product, ProductId};

/// Ordered set of favorited product ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>", into = "Vec<ProductId>")]
pub struct Favorites {
    ids: SmallVec<[ProductId; 8]>,
}

impl Favorites {
    /// Create an empty favorites set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a product as a favorite. Returns false if it already was one.
    pub fn add(&mut self, id: ProductId) -> bool {
        if self.contains(&id) {
            return false;
        }

        self.ids.push(id);

        true
    }

    /// Unmark a product. Returns false if it was not a favorite.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.ids.len();

        self.ids.retain(|existing| existing != id);

        self.ids.len() != before
    }

    /// Flip a product's favorite state. Returns true if it is now a favorite.
    pub fn toggle(&mut self, id: &ProductId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id.clone());
            true
        }
    }

    /// Check whether a product is favorited.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Iterate over the favorited ids in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }

    /// Get the number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Project the favorites onto a catalog, in favorites order.
    ///
    /// Ids that no longer resolve to a catalog product are skipped, matching
    /// the display behavior when a farmer has withdrawn a product.
    pub fn products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        self.ids.iter().filter_map(|id| catalog.get(id)).collect()
    }
}

impl From<Vec<ProductId>> for Favorites {
    fn from(ids: Vec<ProductId>) -> Self {
        let mut favorites = Favorites::new();

        for id in ids {
            favorites.add(id);
        }

        favorites
    }
}

impl From<Favorites> for Vec<ProductId> {
    fn from(favorites: Favorites) -> Self {
        favorites.ids.into_vec()
    }
}
