//! CSV harness: catalog feed loading, order-session loading, result output.
//!
//! Feeds are read in streaming fashion; malformed rows are logged at warn
//! level with their row number and skipped, so one bad record never sinks a
//! whole session. The core stays pure — this module is the only place that
//! touches I/O.

use crate::catalog::{CatalogRecord, CatalogSnapshot};
use crate::error::Result;
use crate::money::Money;
use crate::payment::{
    add_entry, PaymentEntry, PaymentEntryId, PaymentMethod, PaymentRecord, PaymentStatus,
};
use crate::reconcile::{reconcile, ReconciliationResult};
use crate::resolver::resolve;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::str::FromStr;

/// Loads a catalog snapshot from a `id,name,sku,price,stock` CSV feed.
///
/// Invalid records are logged and skipped; re-sent ids supersede earlier
/// ones, matching the feed contract.
pub fn load_catalog<R: Read>(reader: R) -> Result<CatalogSnapshot> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut items = Vec::new();
    for (row_idx, result) in csv_reader.deserialize::<CatalogRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        match result {
            Ok(record) => match record.parse() {
                Some(item) => {
                    debug!("Row {}: catalog item '{}'", row_num, item.id);
                    items.push(item);
                }
                None => warn!("Row {}: invalid catalog record, skipping", row_num),
            },
            Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
        }
    }

    Ok(CatalogSnapshot::from_items(items))
}

/// Raw order-session row as read from CSV.
///
/// The `record` column selects the kind; the remaining columns are used or
/// ignored per kind. Columns: `record,id,quantity,method,status,amount,note`.
#[derive(Debug, serde::Deserialize)]
struct SessionRecord {
    record: String,
    id: Option<String>,
    quantity: Option<String>,
    method: Option<String>,
    status: Option<String>,
    amount: Option<String>,
    note: Option<String>,
}

impl SessionRecord {
    fn text(field: &Option<String>) -> &str {
        field.as_deref().map(str::trim).unwrap_or("")
    }
}

/// One order-edit session assembled from a session feed.
///
/// Holds everything the core needs for a total-state recomputation: the
/// selection, quantity texts, grandfathered original quantities, charges,
/// payment history, and the current payment rows.
#[derive(Debug, Default)]
pub struct OrderSession {
    selected: Vec<String>,
    quantities: HashMap<String, String>,
    original_quantities: HashMap<String, u32>,
    charges: Money,
    previous: Vec<PaymentRecord>,
    current: Vec<PaymentEntry>,
    next_entry_id: PaymentEntryId,
}

impl OrderSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        OrderSession::default()
    }

    /// Reads session records from a CSV reader in streaming fashion.
    ///
    /// Unknown record kinds and rows missing required fields are logged at
    /// warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<SessionRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    if !self.apply(&record) {
                        warn!("Row {}: invalid session record, skipping", row_num);
                    }
                }
                Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
            }
        }

        Ok(())
    }

    /// Applies one session record. Returns `false` if the row is invalid.
    fn apply(&mut self, record: &SessionRecord) -> bool {
        match record.record.trim().to_lowercase().as_str() {
            "line" => {
                let id = SessionRecord::text(&record.id);
                if id.is_empty() {
                    return false;
                }
                if !self.selected.iter().any(|s| s == id) {
                    self.selected.push(id.to_string());
                }
                if let Some(quantity) = &record.quantity {
                    self.quantities.insert(id.to_string(), quantity.clone());
                }
                true
            }
            "original" => {
                let id = SessionRecord::text(&record.id);
                let quantity = SessionRecord::text(&record.quantity);
                match (id.is_empty(), quantity.parse::<u32>()) {
                    (false, Ok(q)) => {
                        self.original_quantities.insert(id.to_string(), q);
                        true
                    }
                    _ => false,
                }
            }
            "charge" => match Money::from_str(SessionRecord::text(&record.amount)) {
                Ok(amount) if !amount.is_negative() => {
                    // Last charge row wins; charges are a single opaque input.
                    self.charges = amount;
                    true
                }
                _ => false,
            },
            "previous" => {
                let method = match PaymentMethod::parse(SessionRecord::text(&record.method)) {
                    Some(m) => m,
                    None => return false,
                };
                let status = match PaymentStatus::parse(SessionRecord::text(&record.status)) {
                    Some(s) => s,
                    None => return false,
                };
                let amount = match Money::from_str(SessionRecord::text(&record.amount)) {
                    Ok(a) if !a.is_negative() => a,
                    _ => return false,
                };
                self.previous.push(PaymentRecord {
                    method,
                    status,
                    amount,
                    note: SessionRecord::text(&record.note).to_string(),
                });
                true
            }
            "payment" => {
                let method_text = SessionRecord::text(&record.method);
                let method = if method_text.is_empty() {
                    PaymentMethod::Cash
                } else {
                    match PaymentMethod::parse(method_text) {
                        Some(m) => m,
                        None => return false,
                    }
                };

                let status_text = SessionRecord::text(&record.status);
                let status = if status_text.is_empty() {
                    None
                } else {
                    match PaymentStatus::parse(status_text) {
                        Some(s) => Some(s),
                        None => return false,
                    }
                };

                let id = add_entry(&mut self.current, self.next_entry_id);
                self.next_entry_id += 1;

                // Safety: the entry was just pushed above
                let entry = self.current.last_mut().expect("entry exists");
                entry.method = method;
                entry.status = status;
                // Amount text is kept verbatim, garbage included.
                entry.amount = record.amount.clone().unwrap_or_default();
                entry.note = SessionRecord::text(&record.note).to_string();
                debug!("Added payment entry {} ({})", id, method.as_str());
                true
            }
            _ => false,
        }
    }

    /// Resolves, prices, and reconciles the session against a catalog.
    ///
    /// A session with no payment rows gets one default entry, keeping the
    /// "at least one current entry while editing" rule.
    pub fn reconcile(&self, catalog: &CatalogSnapshot) -> ReconciliationResult {
        let lines = resolve(
            &self.selected,
            &self.quantities,
            catalog,
            &self.original_quantities,
        );

        let default_entry;
        let current: &[PaymentEntry] = if self.current.is_empty() {
            default_entry = [PaymentEntry::new(0)];
            &default_entry
        } else {
            &self.current
        };

        reconcile(&lines, self.charges, &self.previous, current)
    }
}

/// Writes a reconciliation result as `field,value` CSV.
///
/// Totals come first in a fixed order, then one row per validation error in
/// field order, so output is deterministic and diffable.
pub fn write_result<W: Write>(result: &ReconciliationResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["field", "value"])?;
    csv_writer.write_record(["subtotal", result.pricing.subtotal.to_string().as_str()])?;
    csv_writer.write_record(["total", result.pricing.grand_total.to_string().as_str()])?;
    csv_writer.write_record(["previous_paid", result.previous_paid.to_string().as_str()])?;
    csv_writer.write_record(["current_paid", result.current_paid.to_string().as_str()])?;
    csv_writer.write_record(["remaining", result.remaining.to_string().as_str()])?;
    csv_writer.write_record(["valid", result.is_valid().to_string().as_str()])?;

    for (field, message) in result.errors.iter() {
        csv_writer.write_record([field, message])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CATALOG: &str = "id,name,sku,price,stock\n\
        P1,All-Season Tyre,TYR-001,89.95,4\n\
        S1,Fitting,SRV-FIT,20.00,\n";

    fn run_session(session_csv: &str) -> ReconciliationResult {
        let catalog = load_catalog(Cursor::new(CATALOG)).unwrap();
        let mut session = OrderSession::new();
        session.process_csv(Cursor::new(session_csv)).unwrap();
        session.reconcile(&catalog)
    }

    #[test]
    fn test_load_catalog_skips_bad_rows() {
        let csv = "id,name,sku,price,stock\n\
            P1,Tyre,TYR,10.00,4\n\
            ,Nameless,X,5.00,1\n\
            P2,Bad Price,Y,abc,1\n";

        let catalog = load_catalog(Cursor::new(csv)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("P1").is_some());
    }

    #[test]
    fn test_session_full_payment_settles_order() {
        let result = run_session(
            "record,id,quantity,method,status,amount,note\n\
             line,P1,2,,,,\n\
             line,S1,1,,,,\n\
             payment,,,cash,full,199.90,\n",
        );

        assert_eq!(result.pricing.subtotal.to_string(), "199.90");
        assert!(result.remaining.is_zero());
        assert!(result.is_valid());
    }

    #[test]
    fn test_session_without_payment_rows_gets_default_entry() {
        let result = run_session(
            "record,id,quantity,method,status,amount,note\n\
             line,P1,1,,,,\n",
        );

        // One default entry (cash, full, unset amount) is supplied.
        assert!(result.current_paid.is_zero());
        assert!(result.is_valid());
    }

    #[test]
    fn test_session_charge_and_previous_payment() {
        let result = run_session(
            "record,id,quantity,method,status,amount,note\n\
             line,P1,1,,,,\n\
             charge,,,,,10.05,\n\
             previous,,,card,partial,50.00,deposit\n\
             payment,,,cash,full,50.00,\n",
        );

        assert_eq!(result.pricing.grand_total.to_string(), "100.00");
        assert_eq!(result.previous_paid.to_string(), "50.00");
        assert!(result.remaining.is_zero());
        assert!(result.is_valid());
    }

    #[test]
    fn test_session_grandfathered_edit() {
        // Stock is 4, but 3 units were committed before the edit: max 7.
        let result = run_session(
            "record,id,quantity,method,status,amount,note\n\
             line,P1,7,,,,\n\
             original,P1,3,,,,\n",
        );
        assert!(result.is_valid());

        let result = run_session(
            "record,id,quantity,method,status,amount,note\n\
             line,P1,8,,,,\n\
             original,P1,3,,,,\n",
        );
        assert_eq!(
            result.errors.get("items"),
            Some("'All-Season Tyre' exceeds available stock (max 7)")
        );
    }

    #[test]
    fn test_session_skips_unknown_record_kinds() {
        let result = run_session(
            "record,id,quantity,method,status,amount,note\n\
             teapot,P1,1,,,,\n\
             line,P1,1,,,,\n",
        );

        assert_eq!(result.pricing.subtotal.to_string(), "89.95");
    }

    #[test]
    fn test_write_result_is_deterministic() {
        let result = run_session(
            "record,id,quantity,method,status,amount,note\n\
             line,GHOST,1,,,,\n\
             payment,,,cash,,abc,\n",
        );

        let mut output = Vec::new();
        write_result(&result, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "field,value");
        assert_eq!(lines[1], "subtotal,0.00");
        assert!(lines.contains(&"valid,false"));
        assert!(text.contains("items,'GHOST' not found in catalog"));
    }
}
