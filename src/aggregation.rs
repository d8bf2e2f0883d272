//! Expense aggregation for totals, category breakdowns and trends.
//!
//! Every function here is pure: it takes a slice of expenses, never touches
//! storage and treats the slice as an unordered collection. Grouped results
//! are returned in ordered maps so iteration order is always by key.

use std::{collections::BTreeMap, ops::RangeInclusive};

use time::Date;

use crate::Expense;

/// A category name paired with the sum of its expense amounts.
pub type CategoryTotal = (String, f64);

/// Sums the amounts of all expenses.
///
/// # Returns
/// The total amount, `0.0` when `expenses` is empty.
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Sums expense amounts by category.
///
/// Categories are matched exactly: "food" and "Food" are separate groups and
/// whitespace is not trimmed.
///
/// # Returns
/// BTreeMap mapping each category to the sum of its expense amounts.
pub fn total_by_category(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }

    totals
}

/// Finds the categories with the highest and lowest totals.
///
/// When several categories share the highest (or lowest) total, the one that
/// sorts first by name is chosen.
///
/// # Returns
/// Tuple of (highest, lowest), both `None` if there are no expenses.
pub fn highest_and_lowest_category(
    expenses: &[Expense],
) -> (Option<CategoryTotal>, Option<CategoryTotal>) {
    let totals = total_by_category(expenses);

    let mut highest: Option<(&String, f64)> = None;
    let mut lowest: Option<(&String, f64)> = None;

    for (category, &amount) in &totals {
        if highest.is_none_or(|(_, max)| amount > max) {
            highest = Some((category, amount));
        }

        if lowest.is_none_or(|(_, min)| amount < min) {
            lowest = Some((category, amount));
        }
    }

    let to_owned = |(category, amount): (&String, f64)| (category.to_owned(), amount);

    (highest.map(to_owned), lowest.map(to_owned))
}

/// Sums expense amounts by day.
///
/// # Returns
/// Vector of (date, total) pairs sorted by date, oldest first.
pub fn trend_by_date(expenses: &[Expense]) -> Vec<(Date, f64)> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.date).or_insert(0.0) += expense.amount;
    }

    totals.into_iter().collect()
}

/// Sums expense amounts by month.
///
/// # Returns
/// BTreeMap mapping each month, formatted as `YYYY-MM`, to the sum of the
/// expense amounts in that month.
pub fn total_by_month(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.month_key()).or_insert(0.0) += expense.amount;
    }

    totals
}

/// The mean expense amount, or `None` if there are no expenses.
pub fn average_amount(expenses: &[Expense]) -> Option<f64> {
    if expenses.is_empty() {
        return None;
    }

    Some(total(expenses) / expenses.len() as f64)
}

/// Counts the number of expenses in each category.
pub fn count_by_category(expenses: &[Expense]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();

    for expense in expenses {
        *counts.entry(expense.category.clone()).or_insert(0) += 1;
    }

    counts
}

/// Returns up to `limit` expenses with the largest amounts, largest first.
///
/// Expenses with equal amounts keep their relative order from `expenses`.
pub fn largest_expenses(expenses: &[Expense], limit: usize) -> Vec<&Expense> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    sorted.truncate(limit);
    sorted
}

/// Returns the expenses dated within `range` (inclusive), oldest first.
pub fn expenses_between(expenses: &[Expense], range: RangeInclusive<Date>) -> Vec<&Expense> {
    let mut selected: Vec<&Expense> = expenses
        .iter()
        .filter(|expense| range.contains(&expense.date))
        .collect();
    selected.sort_by_key(|expense| expense.date);
    selected
}

/// Sums expense amounts by category for the month `month` (`YYYY-MM`).
pub fn total_by_category_for_month(expenses: &[Expense], month: &str) -> BTreeMap<String, f64> {
    let in_month: Vec<Expense> = expenses
        .iter()
        .filter(|expense| expense.month_key() == month)
        .cloned()
        .collect();

    total_by_category(&in_month)
}

/// Returns the categories whose total is strictly greater than `threshold`.
///
/// # Returns
/// Vector of (category, total) sorted by total, largest first. Categories
/// with equal totals are sorted by name.
pub fn categories_over(expenses: &[Expense], threshold: f64) -> Vec<CategoryTotal> {
    let mut over: Vec<CategoryTotal> = total_by_category(expenses)
        .into_iter()
        .filter(|(_, amount)| *amount > threshold)
        .collect();
    over.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    over
}
