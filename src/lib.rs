//! Expense Ledger stores expenses and answers aggregate questions about them.
//!
//! Expenses are persisted in a SQLite database that is mirrored to a CSV
//! file. The CSV file doubles as an import path for data recorded before the
//! database existed: an empty database is seeded from it on the first load.
//!
//! This library provides:
//! - [load] and [save] for reading and writing a full set of expenses,
//! - a [Ledger] for editing expenses in memory between saves,
//! - and the pure functions in [aggregation] for totals and trends.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use expense_ledger::{Expense, Ledger, load, save};
//! use time::macros::date;
//!
//! # fn main() -> Result<(), expense_ledger::Error> {
//! let path = Path::new("data/expenses.csv");
//! let mut ledger = Ledger::new(load(path)?);
//!
//! ledger.add(Expense::build(12.5, date!(2025 - 11 - 01), "Food").finalise())?;
//! save(path, ledger.expenses())?;
//!
//! println!("Spent {} in total", ledger.total());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod aggregation;
mod config;
mod dataset;
mod error;
mod expense;
mod ledger;
pub mod mirror;
pub mod store;
mod summary;

pub use config::{Config, DATA_FILE_ENV, DEFAULT_DATA_FILE};
pub use dataset::{Dataset, Loaded, STORE_EXTENSION, Seed, load, save, store_path};
pub use error::Error;
pub use expense::{DATE_FORMAT, Expense, ExpenseBuilder, ExpenseId};
pub use ledger::{ExpenseUpdate, Ledger};
pub use summary::{CategorySummary, DailyTotal, Summary, format_currency};
