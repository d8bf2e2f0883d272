//! The in-memory collection of expenses that callers edit between saves.

use std::collections::BTreeMap;

use time::Date;

use crate::{Error, Expense, ExpenseId, aggregation};

/// New values for the editable fields of an existing expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseUpdate {
    /// The new date.
    pub date: Date,
    /// The new category label.
    pub category: String,
    /// The new amount.
    pub amount: f64,
    /// The new description.
    pub description: String,
}

/// An ordered collection of expenses with unique IDs.
///
/// Edits only change the collection in memory. Pass [Ledger::expenses] to
/// [save](crate::save) to make them durable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    expenses: Vec<Expense>,
}

impl Ledger {
    /// Create a ledger from the expenses returned by [load](crate::load).
    pub fn new(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    /// The expenses in the ledger, in the order they were loaded or added.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Consume the ledger and return its expenses.
    pub fn into_expenses(self) -> Vec<Expense> {
        self.expenses
    }

    /// The number of expenses in the ledger.
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Whether the ledger has no expenses.
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Add an expense to the end of the ledger.
    ///
    /// # Errors
    /// Returns [Error::DuplicateExpenseId] if an expense with the same ID is
    /// already in the ledger.
    pub fn add(&mut self, expense: Expense) -> Result<(), Error> {
        if self.position(&expense.id).is_some() {
            return Err(Error::DuplicateExpenseId(expense.id));
        }

        self.expenses.push(expense);

        Ok(())
    }

    /// Retrieve an expense by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to an expense in the
    /// ledger.
    pub fn get(&self, id: &ExpenseId) -> Result<&Expense, Error> {
        self.expenses
            .iter()
            .find(|expense| &expense.id == id)
            .ok_or(Error::NotFound)
    }

    /// Overwrite the editable fields of the expense with `id`.
    ///
    /// The ID and the position of the expense are kept.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to an expense in the
    /// ledger.
    pub fn update(&mut self, id: &ExpenseId, update: ExpenseUpdate) -> Result<&Expense, Error> {
        let index = self.position(id).ok_or(Error::NotFound)?;
        let expense = &mut self.expenses[index];

        expense.date = update.date;
        expense.category = update.category;
        expense.amount = update.amount;
        expense.description = update.description;

        Ok(&*expense)
    }

    /// Remove the expense with `id`, keeping the order of the others.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to an expense in the
    /// ledger.
    pub fn delete(&mut self, id: &ExpenseId) -> Result<Expense, Error> {
        let index = self.position(id).ok_or(Error::NotFound)?;

        Ok(self.expenses.remove(index))
    }

    fn position(&self, id: &ExpenseId) -> Option<usize> {
        self.expenses.iter().position(|expense| &expense.id == id)
    }

    /// See [aggregation::total].
    pub fn total(&self) -> f64 {
        aggregation::total(&self.expenses)
    }

    /// See [aggregation::total_by_category].
    pub fn total_by_category(&self) -> BTreeMap<String, f64> {
        aggregation::total_by_category(&self.expenses)
    }

    /// See [aggregation::highest_and_lowest_category].
    pub fn highest_and_lowest_category(
        &self,
    ) -> (
        Option<aggregation::CategoryTotal>,
        Option<aggregation::CategoryTotal>,
    ) {
        aggregation::highest_and_lowest_category(&self.expenses)
    }

    /// See [aggregation::trend_by_date].
    pub fn trend_by_date(&self) -> Vec<(Date, f64)> {
        aggregation::trend_by_date(&self.expenses)
    }

    /// See [aggregation::total_by_month].
    pub fn total_by_month(&self) -> BTreeMap<String, f64> {
        aggregation::total_by_month(&self.expenses)
    }
}

impl From<Vec<Expense>> for Ledger {
    fn from(expenses: Vec<Expense>) -> Self {
        Self::new(expenses)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, Expense, ExpenseId, ExpenseUpdate, Ledger};

    fn get_test_ledger() -> Ledger {
        Ledger::new(vec![
            Expense::build(10.0, date!(2025 - 11 - 01), "Food")
                .id(ExpenseId::from("a"))
                .finalise(),
            Expense::build(500.0, date!(2025 - 11 - 01), "Rent")
                .id(ExpenseId::from("b"))
                .finalise(),
            Expense::build(5.0, date!(2025 - 11 - 02), "Food")
                .id(ExpenseId::from("c"))
                .finalise(),
        ])
    }

    #[test]
    fn add_appends_expense() {
        let mut ledger = get_test_ledger();
        let expense = Expense::build(1.0, date!(2025 - 11 - 03), "Coffee").finalise();

        ledger.add(expense.clone()).unwrap();

        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.get(&expense.id), Ok(&expense));
        assert_eq!(ledger.total(), 516.0);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut ledger = get_test_ledger();
        let expense = Expense::build(1.0, date!(2025 - 11 - 03), "Coffee")
            .id(ExpenseId::from("a"))
            .finalise();

        let result = ledger.add(expense);

        assert_eq!(result, Err(Error::DuplicateExpenseId(ExpenseId::from("a"))));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let ledger = get_test_ledger();

        assert_eq!(ledger.get(&ExpenseId::from("missing")), Err(Error::NotFound));
    }

    #[test]
    fn update_changes_fields_and_keeps_id() {
        let mut ledger = get_test_ledger();
        let id = ExpenseId::from("b");

        let updated = ledger
            .update(
                &id,
                ExpenseUpdate {
                    date: date!(2025 - 12 - 01),
                    category: "Housing".to_owned(),
                    amount: 550.0,
                    description: "December rent".to_owned(),
                },
            )
            .unwrap()
            .clone();

        assert_eq!(updated.id, id);
        assert_eq!(updated.category, "Housing");
        assert_eq!(ledger.expenses()[1], updated);
        assert_eq!(ledger.total_by_month()["2025-12"], 550.0);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut ledger = get_test_ledger();
        let before = ledger.clone();

        let result = ledger.update(
            &ExpenseId::from("missing"),
            ExpenseUpdate {
                date: date!(2025 - 12 - 01),
                category: "Food".to_owned(),
                amount: 1.0,
                description: String::new(),
            },
        );

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(ledger, before);
    }

    #[test]
    fn delete_removes_expense_and_keeps_order() {
        let mut ledger = get_test_ledger();

        let removed = ledger.delete(&ExpenseId::from("b")).unwrap();

        assert_eq!(removed.category, "Rent");
        let ids: Vec<&str> = ledger
            .expenses()
            .iter()
            .map(|expense| expense.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(
            ledger.highest_and_lowest_category(),
            (Some(("Food".to_owned(), 15.0)), Some(("Food".to_owned(), 15.0)))
        );
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut ledger = get_test_ledger();

        assert_eq!(ledger.delete(&ExpenseId::from("missing")), Err(Error::NotFound));
        assert_eq!(ledger.len(), 3);
    }
}
