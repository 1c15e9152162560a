//! # Invoice Engine
//!
//! The invoice subtotal and payment-reconciliation engine behind a retail
//! admin dashboard: given an order's selected catalog lines, externally
//! computed charges, recorded payment history, and the in-progress payment
//! rows being edited, it computes totals and remaining balance and validates
//! whether the candidate state is acceptable to submit.
//!
//! ## Design Principles
//!
//! - **Pure core**: resolver, pricing, and reconciliation are side-effect
//!   free; every state change is a total recomputation
//! - **Decimal arithmetic**: full-precision `rust_decimal` internally,
//!   2-decimal-place rounding only at the boundary
//! - **Errors as data**: rule violations come back as a field-keyed map,
//!   never as exceptions
//! - **Deterministic output**: same inputs, same result, same row order
//!
//! ## Example
//!
//! ```no_run
//! use invoice_engine::{load_catalog, write_result, OrderSession};
//! use std::io::Cursor;
//!
//! let catalog = load_catalog(Cursor::new("id,name,sku,price,stock\n")).unwrap();
//! let mut session = OrderSession::new();
//! session
//!     .process_csv(Cursor::new("record,id,quantity,method,status,amount,note\n"))
//!     .unwrap();
//! let result = session.reconcile(&catalog);
//! write_result(&result, std::io::stdout()).unwrap();
//! ```

pub mod catalog;
pub mod error;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod reconcile;
pub mod resolver;
pub mod session;

pub use catalog::{CatalogItem, CatalogRecord, CatalogSnapshot};
pub use error::{EngineError, Result, ValidationErrors};
pub use money::Money;
pub use payment::{
    add_entry, remove_entry, PaymentEntry, PaymentEntryId, PaymentMethod, PaymentRecord,
    PaymentStatus,
};
pub use pricing::{price, PriceSummary};
pub use reconcile::{
    compute_remaining, on_amount_change, on_status_change, reconcile, validate_submission,
    ReconciliationResult,
};
pub use resolver::{resolve, OrderLine};
pub use session::{load_catalog, write_result, OrderSession};
