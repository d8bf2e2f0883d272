//! Defines the expense model and its identifier.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use uuid::Uuid;

/// The text format for expense dates in the CSV file, e.g. `2025-11-01`.
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// An opaque, unique identifier for an [Expense].
///
/// New IDs are random UUIDs, but any text read back from storage is accepted
/// as-is so that IDs from older files survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Generate a fresh, random ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for ExpenseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ExpenseId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToSql for ExpenseId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for ExpenseId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(Self::from)
    }
}

/// A single expense, i.e. an amount of money spent on something on a given day.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense. Never changes once the expense is created.
    pub id: ExpenseId,
    /// When the expense happened.
    pub date: Date,
    /// A free text label used to group expenses, e.g. "Food" or "Rent".
    pub category: String,
    /// A text description of what the expense was for, may be empty.
    pub description: String,
    /// The amount of money spent.
    ///
    /// Not required to be positive, refunds may be recorded as negative
    /// amounts.
    pub amount: f64,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, category: &str) -> ExpenseBuilder {
        ExpenseBuilder {
            id: None,
            amount,
            date,
            category: category.to_owned(),
            description: String::new(),
        }
    }

    /// The year and month of the expense formatted as `YYYY-MM`.
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.date.year(), u8::from(self.date.month()))
    }
}

/// A builder for creating [Expense] instances.
///
/// # Examples
///
/// ```
/// use time::macros::date;
///
/// use expense_ledger::Expense;
///
/// let expense = Expense::build(12.5, date!(2025 - 11 - 01), "Food")
///     .description("Lunch")
///     .finalise();
///
/// assert_eq!(expense.category, "Food");
/// assert_eq!(expense.description, "Lunch");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseBuilder {
    /// The ID to use. A fresh ID is generated by [ExpenseBuilder::finalise] if
    /// this is `None`.
    pub id: Option<ExpenseId>,
    /// The amount of money spent.
    pub amount: f64,
    /// The date when the expense occurred.
    pub date: Date,
    /// The category label.
    pub category: String,
    /// Defaults to an empty string.
    pub description: String,
}

impl ExpenseBuilder {
    /// Use an existing ID instead of generating a new one.
    pub fn id(mut self, id: ExpenseId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the description for the expense.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Create the expense, generating an ID if one was not set.
    pub fn finalise(self) -> Expense {
        Expense {
            id: self.id.unwrap_or_default(),
            date: self.date,
            category: self.category,
            description: self.description,
            amount: self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Expense, ExpenseId};

    #[test]
    fn finalise_generates_unique_ids() {
        let first = Expense::build(1.0, date!(2025 - 11 - 01), "Food").finalise();
        let second = Expense::build(1.0, date!(2025 - 11 - 01), "Food").finalise();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn finalise_keeps_given_id() {
        let expense = Expense::build(1.0, date!(2025 - 11 - 01), "Food")
            .id(ExpenseId::from("abc"))
            .finalise();

        assert_eq!(expense.id.as_str(), "abc");
        assert_eq!(expense.description, "");
    }

    #[test]
    fn month_key_is_zero_padded() {
        let expense = Expense::build(1.0, date!(2025 - 03 - 09), "Food").finalise();

        assert_eq!(expense.month_key(), "2025-03");
    }
}
