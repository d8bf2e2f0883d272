use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_ledger::{Config, Expense, Summary, aggregation, format_currency, load};

/// Print a summary of the expenses stored for a CSV file.
///
/// The database next to the CSV file is seeded from it on the first run.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path of the expenses CSV file. Defaults to $EXPENSES_DATA_FILE or
    /// `data/expenses.csv`.
    #[arg(long, short)]
    data_file: Option<PathBuf>,

    /// Only include expenses from this month, formatted as YYYY-MM.
    #[arg(long, short)]
    month: Option<String>,

    /// Also list the N largest expenses.
    #[arg(long, default_value_t = 0)]
    top: usize,

    /// Print the summary as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();
    let config = Config::from_env().with_data_file(args.data_file);

    tracing::debug!("Reading expenses for {}", config.data_file().display());
    let mut expenses = load(config.data_file())?;

    if let Some(month) = &args.month {
        expenses.retain(|expense| &expense.month_key() == month);
    }

    let summary = Summary::from_expenses(&expenses);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print!("{summary}");

    if let Some(average) = aggregation::average_amount(&expenses) {
        println!("\nAverage expense: {}", format_currency(average));
    }

    if args.top > 0 {
        println!("\nLargest expenses:");
        for expense in aggregation::largest_expenses(&expenses, args.top) {
            println!("  {}", format_expense(expense));
        }
    }

    Ok(())
}

fn format_expense(expense: &Expense) -> String {
    let mut line = format!(
        "{} {} {}",
        expense.date,
        expense.category,
        format_currency(expense.amount)
    );

    if !expense.description.is_empty() {
        line.push_str(&format!(" ({})", expense.description));
    }

    line
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
