//! Payment reconciliation engine.
//!
//! Given an order's grand total, its recorded payment history, and the
//! in-progress payment rows being edited, computes how much has been paid,
//! how much remains, and whether the candidate state is acceptable to
//! submit. Every function here is pure: same inputs, same outputs, and all
//! rule violations come back as data, never as errors.
//!
//! The status-change rule is deliberately asymmetric: switching a row to
//! `full` derives its amount from the remaining balance, switching to
//! `partial` resets it to zero for explicit manual entry. Both are product
//! behavior carried over from the order forms this engine replaces.

use crate::error::ValidationErrors;
use crate::money::Money;
use crate::payment::{PaymentEntry, PaymentEntryId, PaymentRecord, PaymentStatus};
use crate::pricing::{price, PriceSummary};
use crate::resolver::OrderLine;
use rust_decimal::Decimal;
use serde::Serialize;

/// Absolute tolerance for the aggregate overpayment check.
///
/// Absorbs round-trip noise from decimal-string parsing; a numerical
/// allowance, not a business rule.
fn overpay_tolerance() -> Money {
    Money::new(Decimal::new(1, 2)) // 0.01
}

/// Sum of all previous payment amounts.
fn sum_previous(previous: &[PaymentRecord]) -> Money {
    previous.iter().map(|p| p.amount).sum()
}

/// Sum of current entry amounts, unset/unparseable counting as zero,
/// optionally skipping one entry by id.
fn sum_current(current: &[PaymentEntry], excluding: Option<PaymentEntryId>) -> Money {
    current
        .iter()
        .filter(|e| excluding != Some(e.id))
        .map(PaymentEntry::amount_or_zero)
        .sum()
}

/// Computes the remaining balance of an order.
///
/// `grand_total` minus all previous payments minus all current entries
/// except the one named by `excluding`. Excluding the entry being edited
/// adds its own pre-edit amount back, which is what makes repeated
/// full/partial toggles idempotent instead of compounding.
pub fn compute_remaining(
    grand_total: Money,
    previous: &[PaymentRecord],
    current: &[PaymentEntry],
    excluding: Option<PaymentEntryId>,
) -> Money {
    grand_total - sum_previous(previous) - sum_current(current, excluding)
}

/// Applies a status change to a payment entry.
///
/// - to `full`: the amount becomes the remaining balance computed as if
///   this entry had not been filled in yet, rounded to 2 decimal places —
///   "full" means "pay off whatever is left";
/// - to `partial`: the amount resets to zero, since partial payments
///   require explicit manual entry;
/// - cleared status: the amount is left untouched.
pub fn on_status_change(
    entry: &PaymentEntry,
    new_status: Option<PaymentStatus>,
    current: &[PaymentEntry],
    grand_total: Money,
    previous: &[PaymentRecord],
) -> PaymentEntry {
    let mut updated = entry.clone();
    updated.status = new_status;

    match new_status {
        Some(PaymentStatus::Full) => {
            let remaining = compute_remaining(grand_total, previous, current, Some(entry.id));
            updated.amount = remaining.rounded().to_string();
        }
        Some(PaymentStatus::Partial) => {
            updated.amount = "0".to_string();
        }
        None => {}
    }

    updated
}

/// Applies an amount edit to a payment entry.
///
/// The raw text is stored verbatim so the field stays editable; non-numeric
/// text is not an incremental error by itself. A parsed amount above the
/// adjusted balance (remaining with this entry's own prior amount added
/// back) returns a field error naming that balance; anything else returns
/// `None`, which clears the error class without touching unrelated errors.
pub fn on_amount_change(
    entry: &PaymentEntry,
    new_amount: &str,
    current: &[PaymentEntry],
    grand_total: Money,
    previous: &[PaymentRecord],
) -> (PaymentEntry, Option<String>) {
    let mut updated = entry.clone();
    updated.amount = new_amount.to_string();

    let field_error = match updated.parsed_amount() {
        Some(parsed) if parsed > Money::ZERO => {
            let adjusted = compute_remaining(grand_total, previous, current, Some(entry.id));
            if parsed > adjusted {
                Some(format!("amount exceeds remaining balance of {}", adjusted))
            } else {
                None
            }
        }
        _ => None,
    };

    (updated, field_error)
}

/// Validates a candidate order state at submission time.
///
/// Line checks (unknown item, quantity over the grandfathered ceiling)
/// short-circuit within the line pass; all other checks accumulate so the
/// caller can show every violation at once. Returns an empty map when the
/// state is acceptable to submit.
pub fn validate_submission(
    lines: &[OrderLine],
    current: &[PaymentEntry],
    grand_total: Money,
    previous: &[PaymentRecord],
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    // Line pass: first offending line wins, further line checks stop.
    for line in lines {
        match &line.item {
            None => {
                errors.insert("items", format!("'{}' not found in catalog", line.item_id));
                break;
            }
            Some(item) => {
                if line.exceeds_max() {
                    let max = line.max_quantity.unwrap_or(0);
                    errors.insert(
                        "items",
                        format!("'{}' exceeds available stock (max {})", item.name, max),
                    );
                    break;
                }
            }
        }
    }

    if lines.is_empty() {
        errors.insert("items", "select at least one product or service item");
    }

    // Payment pass: every row is checked, nothing short-circuits.
    let mut current_paid = Money::ZERO;
    for (idx, entry) in current.iter().enumerate() {
        if entry.status.is_none() {
            errors.insert(format!("payment[{idx}].status"), "payment status is required");
        }

        let trimmed = entry.amount.trim();
        if trimmed.is_empty() {
            continue; // unset counts as zero
        }
        match entry.parsed_amount() {
            None => {
                errors.insert(format!("payment[{idx}].amount"), "amount must be a number");
            }
            Some(amount) if amount.is_negative() => {
                errors.insert(
                    format!("payment[{idx}].amount"),
                    "amount must not be negative",
                );
            }
            Some(amount) => current_paid += amount,
        }
    }

    let total_paid = sum_previous(previous) + current_paid;
    if total_paid > grand_total + overpay_tolerance() {
        errors.insert(
            "payments",
            format!("total payments {total_paid} exceed order total {grand_total}"),
        );
    }

    errors
}

/// The full recomputed view of an order edit.
///
/// Produced from scratch on every state change and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    /// Subtotal and grand total.
    pub pricing: PriceSummary,

    /// Sum of previously recorded payments.
    pub previous_paid: Money,

    /// Sum of current entry amounts (unset/unparseable as zero).
    pub current_paid: Money,

    /// `grand_total − previous_paid − current_paid`.
    pub remaining: Money,

    /// Submission verdict; empty means acceptable.
    pub errors: ValidationErrors,
}

impl ReconciliationResult {
    /// Returns `true` if the candidate state is acceptable to submit.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Prices the order and reconciles its payments in one pass.
pub fn reconcile(
    lines: &[OrderLine],
    charges: Money,
    previous: &[PaymentRecord],
    current: &[PaymentEntry],
) -> ReconciliationResult {
    let pricing = price(lines, charges);
    let previous_paid = sum_previous(previous);
    let current_paid = sum_current(current, None);

    ReconciliationResult {
        pricing,
        previous_paid,
        current_paid,
        remaining: pricing.grand_total - previous_paid - current_paid,
        errors: validate_submission(lines, current, pricing.grand_total, previous),
    }
}
