//! Invoice Engine CLI
//!
//! Reconciles one order-edit session against a catalog snapshot and writes
//! the computed totals and validation verdict as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- catalog.csv order.csv > result.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use invoice_engine::{load_catalog, write_result, EngineError, OrderSession, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(EngineError::MissingArgument);
    }

    let catalog_file = File::open(&args[1])?;
    let catalog = load_catalog(BufReader::new(catalog_file))?;

    let session_file = File::open(&args[2])?;
    let mut session = OrderSession::new();
    session.process_csv(BufReader::new(session_file))?;

    let result = session.reconcile(&catalog);

    let stdout = io::stdout();
    let handle = stdout.lock();
    write_result(&result, handle)?;

    Ok(())
}
