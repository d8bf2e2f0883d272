//! Defines the crate level error type and conversions from the storage libraries.

use std::path::PathBuf;

use crate::expense::ExpenseId;

/// The errors that may occur when loading, saving or editing expenses.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested expense was not found.
    ///
    /// Returned by lookups on a [Ledger](crate::Ledger) when the ID does not
    /// refer to an expense in the collection. This is not fatal, the caller
    /// should check that the ID is correct.
    #[error("the requested expense could not be found")]
    NotFound,

    /// Two expenses in the same collection share an ID.
    ///
    /// Expense IDs are the join key between the database and the in-memory
    /// collection, so a save that would store the same ID twice is rejected
    /// and the previously saved expenses are left untouched.
    #[error("the expense ID \"{0}\" is used more than once")]
    DuplicateExpenseId(ExpenseId),

    /// The CSV path has the database extension, so the database would be
    /// opened on the CSV file itself and overwritten by the next save.
    #[error(
        "the data file {} has the database extension .db, use another extension such as .csv",
        .0.display()
    )]
    InvalidDataFile(PathBuf),

    /// The interchange CSV file could not be written or read as a whole.
    ///
    /// Individual malformed rows never produce this error, they are skipped.
    #[error("could not process the CSV file: {0}")]
    InvalidCSV(String),

    /// A file system operation failed, e.g. the data directory could not be
    /// created or the CSV file could not be opened.
    #[error("an I/O error occurred: {0}")]
    Io(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        if value.is_io_error() {
            Error::Io(value.to_string())
        } else {
            Error::InvalidCSV(value.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}
