//! Catalog snapshot resolver.
//!
//! Turns the user's raw selection (ids plus free-text quantities) into
//! priced, quantity-bounded [`OrderLine`]s against one catalog snapshot.
//! Pure and deterministic; unknown items become placeholder lines so the
//! validator can report them by name instead of this layer throwing.

use crate::catalog::{CatalogItem, CatalogSnapshot};
use crate::money::Money;
use std::collections::HashMap;

/// A selected catalog item with a requested quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// The id the user selected, kept even when the lookup fails.
    pub item_id: String,

    /// Resolved catalog item; `None` marks a placeholder for an unknown id.
    pub item: Option<CatalogItem>,

    /// Effective quantity after parsing and clamping. Zero only on
    /// placeholder lines.
    pub quantity: u32,

    /// Grandfathered quantity ceiling: `stock + quantity already committed
    /// to this order before the edit began`. `None` for services.
    pub max_quantity: Option<u32>,
}

impl OrderLine {
    /// The line's contribution to the subtotal. Placeholders contribute 0.
    pub fn line_total(&self) -> Money {
        match &self.item {
            Some(item) => item.price * self.quantity,
            None => Money::ZERO,
        }
    }

    /// Returns `true` if the requested quantity exceeds the grandfathered
    /// ceiling. Placeholder and service lines never exceed.
    pub fn exceeds_max(&self) -> bool {
        match self.max_quantity {
            Some(max) => self.quantity > max,
            None => false,
        }
    }
}

/// Parses a free-text quantity field.
///
/// Unparseable text and values below 1 clamp to 1. This leniency is a
/// preserved product decision, not an oversight: the quantity widget is
/// free text and the order form forgives garbage rather than blocking.
fn parse_quantity(text: Option<&str>) -> u32 {
    text.and_then(|t| t.trim().parse::<u32>().ok())
        .filter(|&q| q >= 1)
        .unwrap_or(1)
}

/// Resolves selected ids to order lines against a catalog snapshot.
///
/// `quantities` maps item id to the raw quantity text; `original_quantities`
/// carries the per-item quantity committed to this order before the edit
/// began, which raises the stock ceiling (grandfathering) so that stock
/// consumed by *other* orders cannot block an edit that keeps its own
/// previously valid quantities.
pub fn resolve(
    selected_ids: &[String],
    quantities: &HashMap<String, String>,
    catalog: &CatalogSnapshot,
    original_quantities: &HashMap<String, u32>,
) -> Vec<OrderLine> {
    selected_ids
        .iter()
        .map(|id| match catalog.get(id) {
            Some(item) => {
                let quantity = parse_quantity(quantities.get(id).map(String::as_str));
                let grandfathered = original_quantities.get(id).copied().unwrap_or(0);
                OrderLine {
                    item_id: id.clone(),
                    item: Some(item.clone()),
                    quantity,
                    max_quantity: item.stock.map(|stock| stock + grandfathered),
                }
            }
            None => OrderLine {
                item_id: id.clone(),
                item: None,
                quantity: 0,
                max_quantity: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::from_items([
            CatalogItem {
                id: "P1".to_string(),
                name: "Alloy Wheel 17\"".to_string(),
                sku: "WHL-017".to_string(),
                price: Money::from_str("120.00").unwrap(),
                stock: Some(4),
            },
            CatalogItem {
                id: "S1".to_string(),
                name: "Wheel Alignment".to_string(),
                sku: "SRV-ALN".to_string(),
                price: Money::from_str("49.50").unwrap(),
                stock: None,
            },
        ])
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn quantities(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_known_items() {
        let lines = resolve(
            &ids(&["P1", "S1"]),
            &quantities(&[("P1", "2"), ("S1", "1")]),
            &catalog(),
            &HashMap::new(),
        );

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].max_quantity, Some(4));
        assert_eq!(lines[0].line_total().to_string(), "240.00");

        // Services have no ceiling.
        assert_eq!(lines[1].max_quantity, None);
        assert!(!lines[1].exceeds_max());
    }

    #[test]
    fn test_unknown_id_becomes_placeholder() {
        let lines = resolve(&ids(&["GHOST"]), &HashMap::new(), &catalog(), &HashMap::new());

        assert_eq!(lines.len(), 1);
        assert!(lines[0].item.is_none());
        assert_eq!(lines[0].quantity, 0);
        assert!(lines[0].line_total().is_zero());
    }

    #[test]
    fn test_quantity_clamps_to_one() {
        for bad in ["", "abc", "0", "-3", "1.5"] {
            let lines = resolve(
                &ids(&["P1"]),
                &quantities(&[("P1", bad)]),
                &catalog(),
                &HashMap::new(),
            );
            assert_eq!(lines[0].quantity, 1, "quantity text {:?}", bad);
        }

        // Missing entry entirely also clamps to 1.
        let lines = resolve(&ids(&["P1"]), &HashMap::new(), &catalog(), &HashMap::new());
        assert_eq!(lines[0].quantity, 1);
    }

    #[test]
    fn test_grandfathering_raises_ceiling() {
        let original = HashMap::from([("P1".to_string(), 3u32)]);
        let lines = resolve(
            &ids(&["P1"]),
            &quantities(&[("P1", "7")]),
            &catalog(),
            &original,
        );

        // stock 4 + original 3 = 7 allowed
        assert_eq!(lines[0].max_quantity, Some(7));
        assert!(!lines[0].exceeds_max());

        let lines = resolve(
            &ids(&["P1"]),
            &quantities(&[("P1", "8")]),
            &catalog(),
            &original,
        );
        assert!(lines[0].exceeds_max());
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let selected = ids(&["P1", "S1", "GHOST"]);
        let q = quantities(&[("P1", "2")]);
        let original = HashMap::from([("P1".to_string(), 1u32)]);

        let a = resolve(&selected, &q, &catalog(), &original);
        let b = resolve(&selected, &q, &catalog(), &original);
        assert_eq!(a, b);
    }
}
