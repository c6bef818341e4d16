//! Store
//!
//! Pluggable persistence for cart lines, favorites, and catalog products,
//! modeled on the browser-local storage the UI writes to: namespaced string
//! keys holding JSON payloads, last-write-wins. The cart logic never touches
//! a concrete storage mechanism; it goes through the [`Store`] trait.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{cart::CartLine, favorites::Favorites, products::Product};

/// Key prefix shared by all records this crate writes.
const NAMESPACE: &str = "farm2home";

/// Key for the persisted cart lines.
pub const CART_KEY: &str = "cart";

/// Key for the persisted favorites.
pub const FAVORITES_KEY: &str = "favorites";

/// Key for the persisted product catalog.
pub const PRODUCTS_KEY: &str = "products";

/// Errors that can occur reading or writing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying IO failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Payload could not be serialized or deserialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A namespaced string key-value store.
pub trait Store {
    /// Read the value for a key, or `None` if the key has never been set.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write the value for a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

fn namespaced(key: &str) -> String {
    format!("{NAMESPACE}.{key}")
}

/// In-memory store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);

        Ok(())
    }
}

/// File-backed store: one JSON file per key under a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at the given directory. The directory is
    /// created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}

/// Persist the raw cart lines.
///
/// # Errors
///
/// Returns a [`StoreError`] if serialization or the store write fails.
pub fn save_cart_lines(store: &mut impl Store, lines: &[CartLine]) -> Result<(), StoreError> {
    let payload = serde_json::to_string(lines)?;

    store.set(&namespaced(CART_KEY), &payload)
}

/// Load the persisted cart lines; an absent key means an empty cart.
///
/// # Errors
///
/// Returns a [`StoreError`] if the store read or deserialization fails.
pub fn load_cart_lines(store: &impl Store) -> Result<Vec<CartLine>, StoreError> {
    match store.get(&namespaced(CART_KEY))? {
        Some(payload) => Ok(serde_json::from_str(&payload)?),
        None => Ok(Vec::new()),
    }
}

/// Persist the favorites set.
///
/// # Errors
///
/// Returns a [`StoreError`] if serialization or the store write fails.
pub fn save_favorites(store: &mut impl Store, favorites: &Favorites) -> Result<(), StoreError> {
    let payload = serde_json::to_string(favorites)?;

    store.set(&namespaced(FAVORITES_KEY), &payload)
}

/// Load the persisted favorites; an absent key means none.
///
/// # Errors
///
/// Returns a [`StoreError`] if the store read or deserialization fails.
pub fn load_favorites(store: &impl Store) -> Result<Favorites, StoreError> {
    match store.get(&namespaced(FAVORITES_KEY))? {
        Some(payload) => Ok(serde_json::from_str(&payload)?),
        None => Ok(Favorites::new()),
    }
}

/// Persist the catalog's products.
///
/// # Errors
///
/// Returns a [`StoreError`] if serialization or the store write fails.
pub fn save_products(store: &mut impl Store, products: &[Product]) -> Result<(), StoreError> {
    let payload = serde_json::to_string(products)?;

    store.set(&namespaced(PRODUCTS_KEY), &payload)
}

/// Load the persisted products; an absent key means an empty list.
///
/// # Errors
///
/// Returns a [`StoreError`] if the store read or deserialization fails.
pub fn load_products(store: &impl Store) -> Result<Vec<Product>, StoreError> {
    match store.get(&namespaced(PRODUCTS_KEY))? {
        Some(payload) => Ok(serde_json::from_str(&payload)?),
        None => Ok(Vec::new()),
    }
}
