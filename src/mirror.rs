//! Reads and writes the CSV copy of the expenses.
//!
//! The CSV file is a human readable mirror of the database and the import
//! path for data recorded before the database existed. It is always rewritten
//! in full, never patched.
//!
//! Reading is lenient: a row that cannot be parsed is skipped and counted
//! instead of failing the whole read. Older files that only have the columns
//! `date,category,amount` are accepted, with a fresh ID generated for each row
//! and an empty description.

use std::{
    fs::{self, File},
    io,
    path::Path,
};

use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    expense::{DATE_FORMAT, Expense, ExpenseId},
};

/// The column names written to the header row, in order.
pub const HEADER: [&str; 5] = ["id", "date", "category", "description", "amount"];

/// Dates are read with optional zero padding, so `2025-1-5` and `2025-01-05`
/// are the same day. Dates are always written padded.
const READ_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month padding:none]-[day padding:none]");

/// The expenses parsed from a CSV file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MirrorContents {
    /// The rows that parsed successfully, in file order.
    pub expenses: Vec<Expense>,
    /// The number of rows that were skipped because they could not be parsed.
    pub skipped_rows: usize,
}

/// A CSV row before validation. Columns are matched by header name, so the
/// column order in the file does not matter.
#[derive(Debug, Deserialize)]
struct MirrorRow {
    #[serde(default)]
    id: Option<String>,
    date: String,
    category: String,
    #[serde(default)]
    description: Option<String>,
    amount: String,
}

/// Why a row was skipped.
#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error("the category is empty")]
    EmptyCategory,
    #[error("\"{0}\" is not a date in the format YYYY-MM-DD: {1}")]
    InvalidDate(String, time::error::Parse),
    #[error("\"{0}\" is not a number")]
    InvalidAmount(String),
}

impl MirrorRow {
    fn into_expense(self) -> Result<Expense, RowError> {
        if self.category.is_empty() {
            return Err(RowError::EmptyCategory);
        }

        let date = Date::parse(self.date.trim(), &READ_DATE_FORMAT)
            .map_err(|error| RowError::InvalidDate(self.date.clone(), error))?;

        let amount = match self.amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => amount,
            _ => return Err(RowError::InvalidAmount(self.amount)),
        };

        let id = match self.id {
            Some(id) if !id.is_empty() => ExpenseId::from(id),
            _ => ExpenseId::new(),
        };

        Ok(Expense {
            id,
            date,
            category: self.category,
            description: self.description.unwrap_or_default(),
            amount,
        })
    }
}

/// Reads the expenses from the CSV file at `path`.
///
/// Returns empty contents if the file does not exist.
///
/// # Errors
/// Returns an [Error::Io] if the file exists but cannot be read. Rows that
/// cannot be parsed are skipped and counted in
/// [MirrorContents::skipped_rows], they never cause an error.
pub fn read(path: &Path) -> Result<MirrorContents, Error> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No CSV file at {}, nothing to read", path.display());
            return Ok(MirrorContents::default());
        }
        Err(error) => return Err(error.into()),
    };

    let contents = read_from(file)?;

    if contents.skipped_rows > 0 {
        tracing::warn!(
            "Skipped {} malformed rows in {}",
            contents.skipped_rows,
            path.display()
        );
    }

    Ok(contents)
}

/// Reads expenses from CSV data with a header row.
///
/// # Errors
/// Returns an [Error::Io] if `reader` fails. Malformed rows are skipped.
pub fn read_from<R: io::Read>(reader: R) -> Result<MirrorContents, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut contents = MirrorContents::default();

    // Row 1 is the header.
    for (row_number, result) in (2..).zip(reader.deserialize::<MirrorRow>()) {
        let row = match result {
            Ok(row) => row,
            Err(error) if error.is_io_error() => return Err(error.into()),
            Err(error) => {
                tracing::warn!("Skipping CSV row {row_number}: {error}");
                contents.skipped_rows += 1;
                continue;
            }
        };

        match row.into_expense() {
            Ok(expense) => contents.expenses.push(expense),
            Err(error) => {
                tracing::warn!("Skipping CSV row {row_number}: {error}");
                contents.skipped_rows += 1;
            }
        }
    }

    Ok(contents)
}

/// Writes `expenses` to the CSV file at `path`, replacing the existing file.
///
/// Parent directories are created if they do not exist.
///
/// # Errors
/// Returns an [Error::Io] if the directory or file cannot be created or
/// written to.
pub fn write(path: &Path, expenses: &[Expense]) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    write_to(&mut writer, expenses)?;
    tracing::debug!("Wrote {} expenses to {}", expenses.len(), path.display());

    Ok(())
}

/// Writes the header row and one row per expense to `writer`.
///
/// Amounts are written with exactly two decimal places.
pub fn write_to<W: io::Write>(
    writer: &mut csv::Writer<W>,
    expenses: &[Expense],
) -> Result<(), Error> {
    writer.write_record(HEADER)?;

    for expense in expenses {
        let date = expense.date.format(&DATE_FORMAT).map_err(|error| {
            Error::InvalidCSV(format!("could not format date {}: {error}", expense.date))
        })?;
        let amount = format!("{:.2}", expense.amount);

        writer.write_record([
            expense.id.as_str(),
            date.as_str(),
            expense.category.as_str(),
            expense.description.as_str(),
            amount.as_str(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
