//! Defines the expense store trait and its SQLite implementation.
//!
//! The store is the source of truth for saved expenses. Writes that touch more
//! than one row run inside a single SQLite transaction so a failure part way
//! through leaves the previously committed rows untouched.

use std::path::Path;

use rusqlite::{Connection, Row};

use crate::{Error, Expense};

/// Handles the durable storage and retrieval of expenses.
pub trait ExpenseStore {
    /// Create the backing table if it does not exist yet.
    ///
    /// Safe to call every time the store is opened.
    fn ensure_schema(&mut self) -> Result<(), Error>;

    /// Whether the store contains zero expenses.
    fn is_empty(&self) -> Result<bool, Error>;

    /// The number of expenses in the store.
    fn count(&self) -> Result<usize, Error>;

    /// Insert each expense, replacing any stored expense with the same ID.
    ///
    /// Used when seeding an empty store from the CSV file.
    fn bulk_upsert(&mut self, expenses: &[Expense]) -> Result<(), Error>;

    /// Replace every stored expense with exactly `expenses`.
    ///
    /// Implementers must make the replacement atomic: on error the previously
    /// stored expenses must remain intact.
    fn replace_all(&mut self, expenses: &[Expense]) -> Result<(), Error>;

    /// Retrieve every stored expense, most recent first.
    fn scan_all(&self) -> Result<Vec<Expense>, Error>;
}

/// Stores expenses in a SQLite database.
#[derive(Debug)]
pub struct SQLiteExpenseStore {
    connection: Connection,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// Call [ExpenseStore::ensure_schema] before using the store.
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Open (or create) the SQLite database file at `path`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the file cannot be opened as a SQLite
    /// database.
    pub fn open(path: &Path) -> Result<Self, Error> {
        tracing::debug!("Opening expense database at {}", path.display());
        let connection = Connection::open(path)?;

        Ok(Self::new(connection))
    }

    fn insert_all(
        transaction: &rusqlite::Transaction,
        sql: &str,
        expenses: &[Expense],
    ) -> Result<(), Error> {
        let mut statement = transaction.prepare(sql)?;

        for expense in expenses {
            statement
                .execute((
                    &expense.id,
                    expense.date,
                    &expense.category,
                    &expense.description,
                    expense.amount,
                ))
                .map_err(|error| match error {
                    rusqlite::Error::SqliteFailure(
                        rusqlite::ffi::Error {
                            code: _,
                            extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY,
                        },
                        _,
                    ) => Error::DuplicateExpenseId(expense.id.clone()),
                    error => error.into(),
                })?;
        }

        Ok(())
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Create the expense table and its date index in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the table cannot be created.
    fn ensure_schema(&mut self) -> Result<(), Error> {
        self.connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS expenses (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                amount REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);",
        )?;

        Ok(())
    }

    fn is_empty(&self) -> Result<bool, Error> {
        let has_rows: bool =
            self.connection
                .query_row("SELECT EXISTS(SELECT 1 FROM expenses)", [], |row| {
                    row.get(0)
                })?;

        Ok(!has_rows)
    }

    fn count(&self) -> Result<usize, Error> {
        let count: u32 =
            self.connection
                .query_row("SELECT COUNT(id) FROM expenses", [], |row| row.get(0))?;

        Ok(count as usize)
    }

    /// Insert or replace `expenses` by ID in a single transaction.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error, in which case
    /// none of the expenses are written.
    fn bulk_upsert(&mut self, expenses: &[Expense]) -> Result<(), Error> {
        let transaction = self.connection.transaction()?;

        Self::insert_all(
            &transaction,
            "INSERT OR REPLACE INTO expenses (id, date, category, description, amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            expenses,
        )?;

        transaction.commit()?;
        tracing::debug!("Upserted {} expenses", expenses.len());

        Ok(())
    }

    /// Delete all stored expenses and insert `expenses` in a single transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateExpenseId] if two expenses in `expenses` share an ID,
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// In both cases the transaction is rolled back and the previously stored
    /// expenses are kept.
    fn replace_all(&mut self, expenses: &[Expense]) -> Result<(), Error> {
        // Dropping the transaction without committing rolls it back.
        let transaction = self.connection.transaction()?;

        let deleted = transaction.execute("DELETE FROM expenses", ())?;

        Self::insert_all(
            &transaction,
            "INSERT INTO expenses (id, date, category, description, amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            expenses,
        )?;

        transaction.commit()?;
        tracing::debug!(
            "Replaced {deleted} stored expenses with {} expenses",
            expenses.len()
        );

        Ok(())
    }

    /// Retrieve all expenses ordered by date, most recent first.
    ///
    /// Expenses on the same date are ordered by ID.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error or a stored row
    /// holds an invalid date.
    fn scan_all(&self) -> Result<Vec<Expense>, Error> {
        self.connection
            .prepare(
                "SELECT id, date, category, description, amount FROM expenses
                 ORDER BY date DESC, id ASC",
            )?
            .query_map([], map_expense_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect()
    }
}

/// Map a database row to an [Expense].
///
/// Expects the columns `id, date, category, description, amount` in that order.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let category = row.get(2)?;
    let description = row.get(3)?;
    let amount = row.get(4)?;

    Ok(Expense {
        id,
        date,
        category,
        description,
        amount,
    })
}
