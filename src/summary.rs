//! A one-shot summary of the aggregate views over a set of expenses.

use std::{collections::BTreeMap, fmt::Display};

use serde::Serialize;
use time::Date;

use crate::{Expense, aggregation};

/// A category and the sum of its expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// The category label.
    pub category: String,
    /// The sum of the expense amounts in the category.
    pub total: f64,
}

/// The sum of the expenses on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    /// The day.
    pub date: Date,
    /// The sum of the expense amounts on `date`.
    pub total: f64,
}

/// Totals, category breakdown, extremes and trends for a set of expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of all expense amounts.
    pub total: f64,
    /// The number of expenses summarised.
    pub count: usize,
    /// Category totals ordered by category name.
    pub by_category: BTreeMap<String, f64>,
    /// The category with the largest total.
    pub highest_category: Option<CategorySummary>,
    /// The category with the smallest total.
    pub lowest_category: Option<CategorySummary>,
    /// Daily totals, oldest first.
    pub trend: Vec<DailyTotal>,
    /// Monthly totals keyed by `YYYY-MM`.
    pub by_month: BTreeMap<String, f64>,
}

impl Summary {
    /// Compute the summary for `expenses`.
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let (highest, lowest) = aggregation::highest_and_lowest_category(expenses);
        let to_summary = |(category, total)| CategorySummary { category, total };

        Self {
            total: aggregation::total(expenses),
            count: expenses.len(),
            by_category: aggregation::total_by_category(expenses),
            highest_category: highest.map(to_summary),
            lowest_category: lowest.map(to_summary),
            trend: aggregation::trend_by_date(expenses)
                .into_iter()
                .map(|(date, total)| DailyTotal { date, total })
                .collect(),
            by_month: aggregation::total_by_month(expenses),
        }
    }
}

/// Formats `amount` as dollars with two decimal places, e.g. `-$3.50`.
///
/// No thousands separator is added, so large amounts print as `$1234.56`.
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        // abs() turns -0.0 into 0.0
        format!("${:.2}", amount.abs())
    }
}

fn format_category(category: Option<&CategorySummary>) -> String {
    match category {
        Some(CategorySummary { category, total }) => {
            format!("{category} ({})", format_currency(*total))
        }
        None => "N/A".to_owned(),
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Summary ===")?;
        writeln!(f, "Total expense: {}", format_currency(self.total))?;

        writeln!(f, "\nTotal by category:")?;
        for (category, total) in &self.by_category {
            writeln!(f, "  {category}: {}", format_currency(*total))?;
        }

        writeln!(
            f,
            "\nHighest spend category: {}",
            format_category(self.highest_category.as_ref())
        )?;
        writeln!(
            f,
            "Lowest spend category: {}",
            format_category(self.lowest_category.as_ref())
        )?;

        writeln!(f, "\nExpense trend (by date):")?;
        for DailyTotal { date, total } in &self.trend {
            writeln!(f, "  {date}: {}", format_currency(*total))?;
        }

        writeln!(f, "\nExpense trend (by month):")?;
        for (month, total) in &self.by_month {
            writeln!(f, "  {month}: {}", format_currency(*total))?;
        }

        Ok(())
    }
}
