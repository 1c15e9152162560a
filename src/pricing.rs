//! Pricing calculator.
//!
//! Folds resolved order lines plus externally supplied charges into the
//! order's subtotal and grand total. Charges (tax, fees) are an opaque
//! input computed elsewhere; the calculator only adds them on.

use crate::money::Money;
use crate::resolver::OrderLine;
use serde::Serialize;

/// Computed order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceSummary {
    /// Sum of `price × quantity` over all resolved lines.
    pub subtotal: Money,

    /// `subtotal + charges`.
    pub grand_total: Money,
}

/// Prices an order: sums line totals at full precision, then adds charges.
///
/// Accumulation never rounds intermediates; display rounding happens at the
/// boundary only, so long orders do not accumulate drift.
pub fn price(lines: &[OrderLine], charges: Money) -> PriceSummary {
    let subtotal: Money = lines.iter().map(OrderLine::line_total).sum();
    PriceSummary {
        subtotal,
        grand_total: subtotal + charges,
    }
}
