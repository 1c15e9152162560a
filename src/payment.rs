//! Payment models: methods, statuses, and the two kinds of payment.
//!
//! "Previous" payments ([`PaymentRecord`]) are immutable history loaded with
//! the order. "Current" payments ([`PaymentEntry`]) are the in-progress rows
//! being edited; their amount is raw text until submission, because the form
//! stores whatever the user typed.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of a current payment entry within one editing session.
pub type PaymentEntryId = u32;

/// How a payment was (or will be) made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the counter.
    #[default]
    Cash,
    /// Credit or debit card.
    Card,
    /// EFTPOS terminal.
    Eftpos,
    /// Buy-now-pay-later provider.
    PayLater,
    /// Anything else (bank transfer, voucher, ...).
    Other,
}

impl PaymentMethod {
    /// Parses a method name, case-insensitively. Returns `None` for
    /// unknown names so feed rows can be skipped with a warning.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Some(PaymentMethod::Card),
            "eftpos" => Some(PaymentMethod::Eftpos),
            "paylater" | "pay_later" | "bnpl" => Some(PaymentMethod::PayLater),
            "other" => Some(PaymentMethod::Other),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Eftpos => "eftpos",
            PaymentMethod::PayLater => "pay_later",
            PaymentMethod::Other => "other",
        }
    }
}

/// Whether a payment settles the whole remaining balance or part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Explicit, manually entered amount.
    Partial,
    /// Pays off whatever is left of the order total.
    Full,
}

impl PaymentStatus {
    /// Parses a status name, case-insensitively.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "partial" => Some(PaymentStatus::Partial),
            "full" => Some(PaymentStatus::Full),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Partial => "partial",
            PaymentStatus::Full => "full",
        }
    }
}

/// An immutable, already-persisted payment loaded with the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRecord {
    /// Payment method used.
    pub method: PaymentMethod,

    /// Status it was recorded with.
    pub status: PaymentStatus,

    /// Recorded amount.
    pub amount: Money,

    /// Free-text note.
    pub note: String,
}

/// An in-progress payment row being edited.
///
/// A new row always starts as a cash payment with status `full` and an
/// unset amount; the status-change rule then derives the amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEntry {
    /// Row identifier, unique within the editing session.
    pub id: PaymentEntryId,

    /// Selected payment method.
    pub method: PaymentMethod,

    /// Selected status; `None` when the user cleared the selector.
    pub status: Option<PaymentStatus>,

    /// Raw amount text exactly as typed. Empty means unset.
    pub amount: String,

    /// Free-text note.
    pub note: String,
}

impl PaymentEntry {
    /// Creates a row with the default field values.
    pub fn new(id: PaymentEntryId) -> Self {
        PaymentEntry {
            id,
            method: PaymentMethod::Cash,
            status: Some(PaymentStatus::Full),
            amount: String::new(),
            note: String::new(),
        }
    }

    /// Parses the amount text. Empty/blank text is unset (`None`);
    /// anything else must parse as a decimal.
    pub fn parsed_amount(&self) -> Option<Money> {
        let trimmed = self.amount.trim();
        if trimmed.is_empty() {
            return None;
        }
        Money::from_str(trimmed).ok()
    }

    /// The amount this row contributes to paid sums: parsed value, or 0
    /// when unset or unparseable.
    pub fn amount_or_zero(&self) -> Money {
        self.parsed_amount().unwrap_or(Money::ZERO)
    }
}

/// Appends a fresh default row and returns its id.
pub fn add_entry(entries: &mut Vec<PaymentEntry>, id: PaymentEntryId) -> PaymentEntryId {
    entries.push(PaymentEntry::new(id));
    id
}

/// Removes a row by id.
///
/// The last remaining row is never removed: it resets to default values
/// instead, so the current payment list is never empty while editing.
pub fn remove_entry(entries: &mut Vec<PaymentEntry>, id: PaymentEntryId) {
    if entries.len() == 1 {
        if entries[0].id == id {
            entries[0] = PaymentEntry::new(id);
        }
        return;
    }
    entries.retain(|e| e.id != id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_aliases() {
        assert_eq!(PaymentMethod::parse("Cash"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::parse("credit"), Some(PaymentMethod::Card));
        assert_eq!(PaymentMethod::parse("debit"), Some(PaymentMethod::Card));
        assert_eq!(PaymentMethod::parse("BNPL"), Some(PaymentMethod::PayLater));
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(PaymentStatus::parse(" FULL "), Some(PaymentStatus::Full));
        assert_eq!(PaymentStatus::parse("partial"), Some(PaymentStatus::Partial));
        assert_eq!(PaymentStatus::parse(""), None);
    }

    #[test]
    fn test_new_entry_defaults() {
        let entry = PaymentEntry::new(1);
        assert_eq!(entry.method, PaymentMethod::Cash);
        assert_eq!(entry.status, Some(PaymentStatus::Full));
        assert_eq!(entry.amount, "");
        assert_eq!(entry.parsed_amount(), None);
        assert!(entry.amount_or_zero().is_zero());
    }

    #[test]
    fn test_amount_parsing() {
        let mut entry = PaymentEntry::new(1);

        entry.amount = " 12.50 ".to_string();
        assert_eq!(entry.parsed_amount().unwrap().to_string(), "12.50");

        entry.amount = "not a number".to_string();
        assert_eq!(entry.parsed_amount(), None);
        assert!(entry.amount_or_zero().is_zero());
    }

    #[test]
    fn test_remove_entry_keeps_last_row_as_default() {
        let mut entries = vec![PaymentEntry::new(1)];
        entries[0].amount = "50.00".to_string();
        entries[0].method = PaymentMethod::Card;

        remove_entry(&mut entries, 1);

        // Row survives, reset to defaults.
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], PaymentEntry::new(1));
    }

    #[test]
    fn test_remove_entry_with_multiple_rows() {
        let mut entries = vec![PaymentEntry::new(1), PaymentEntry::new(2)];
        remove_entry(&mut entries, 1);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, 2);

        // Unknown id is a no-op.
        remove_entry(&mut entries, 99);
        assert_eq!(entries.len(), 1);
    }
}
