//! Catalog models and catalog-feed CSV parsing.
//!
//! The engine never fetches the catalog itself; it receives a snapshot of
//! `{ id, name, sku, price, stock }` records and treats it as immutable for
//! the duration of one computation.

use crate::money::Money;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// A purchasable unit: product or service.
///
/// Services have unbounded availability, modeled as `stock: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Opaque identifier assigned by the catalog service.
    pub id: String,

    /// Display name, used in validation messages.
    pub name: String,

    /// Stock-keeping unit code.
    pub sku: String,

    /// Unit price. Non-negative.
    pub price: Money,

    /// Units currently in stock; `None` for services (unconstrained).
    pub stock: Option<u32>,
}

/// An immutable catalog snapshot indexed by item id.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    items: HashMap<String, CatalogItem>,
}

impl CatalogSnapshot {
    /// Builds a snapshot from a list of items. Later duplicates win,
    /// matching a feed where re-sent records supersede earlier ones.
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        CatalogSnapshot {
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    /// Number of items in the snapshot.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the snapshot holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Raw catalog record as read from the feed CSV.
///
/// Uses string-based fields for flexibility; `parse` rejects records the
/// engine cannot price rather than letting them poison the snapshot.
#[derive(Debug, Deserialize)]
pub struct CatalogRecord {
    /// Item identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// SKU code
    pub sku: String,

    /// Unit price as decimal text
    pub price: String,

    /// Stock count; empty for services
    pub stock: Option<String>,
}

impl CatalogRecord {
    /// Parses the raw record into a [`CatalogItem`].
    ///
    /// Returns `None` if the record is invalid (empty id, unparseable or
    /// negative price, unparseable stock). Malformed catalog records become
    /// "item not found" downstream instead of raised errors.
    pub fn parse(&self) -> Option<CatalogItem> {
        let id = self.id.trim();
        if id.is_empty() {
            return None;
        }

        let price = Money::from_str(&self.price).ok()?;
        if price.is_negative() {
            return None;
        }

        let stock = match self.stock.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(text.parse::<u32>().ok()?),
        };

        Some(CatalogItem {
            id: id.to_string(),
            name: self.name.trim().to_string(),
            sku: self.sku.trim().to_string(),
            price,
            stock,
        })
    }
}
