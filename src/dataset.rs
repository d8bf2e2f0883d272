//! Keeps the expense database and its CSV mirror in step.
//!
//! A dataset is named by the path of its CSV file, e.g. `data/expenses.csv`.
//! The database lives next to it with the extension swapped
//! (`data/expenses.db`) and is the source of truth:
//!
//! - Loading seeds an empty database from the CSV file once, then always
//!   reads from the database. Later edits to the CSV file are ignored.
//! - Saving replaces the database contents in one SQLite transaction and only
//!   then rewrites the CSV file. If the process stops between the two steps
//!   the database is already correct and the next save fixes the CSV file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    Error, Expense, mirror,
    store::{ExpenseStore, SQLiteExpenseStore},
};

/// The file extension of the database that backs a CSV file.
pub const STORE_EXTENSION: &str = "db";

/// Derive the database path for the CSV file at `mirror_path`.
///
/// # Examples
/// ```
/// use std::path::Path;
///
/// use expense_ledger::store_path;
///
/// assert_eq!(
///     store_path(Path::new("data/expenses.csv")),
///     Path::new("data/expenses.db")
/// );
/// ```
pub fn store_path(mirror_path: &Path) -> PathBuf {
    mirror_path.with_extension(STORE_EXTENSION)
}

/// How the database was prepared during a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    /// The database was empty, so the CSV file was read and its rows were
    /// copied into the database.
    Seeded {
        /// The number of expenses copied from the CSV file.
        imported: usize,
        /// The number of CSV rows that could not be parsed.
        skipped: usize,
    },
    /// The database already held expenses, the CSV file was not read.
    AlreadyPopulated,
}

/// The result of [Dataset::load].
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// Every stored expense, most recent first.
    pub expenses: Vec<Expense>,
    /// Whether the database was seeded from the CSV file.
    pub seed: Seed,
}

/// A CSV file paired with the database that backs it.
#[derive(Debug)]
pub struct Dataset<S> {
    mirror_path: PathBuf,
    store: S,
}

impl Dataset<SQLiteExpenseStore> {
    /// Open the dataset for the CSV file at `mirror_path`.
    ///
    /// The database file is created next to the CSV file if it does not exist,
    /// along with any missing parent directories.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidDataFile] if `mirror_path` has the `.db` extension,
    /// - [Error::Io] if the parent directory cannot be created,
    /// - or [Error::SqlError] if the database cannot be opened.
    pub fn open(mirror_path: impl Into<PathBuf>) -> Result<Self, Error> {
        let mirror_path = mirror_path.into();

        if mirror_path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case(STORE_EXTENSION))
        {
            return Err(Error::InvalidDataFile(mirror_path));
        }

        let store_path = store_path(&mirror_path);

        if let Some(parent) = store_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }

        let store = SQLiteExpenseStore::open(&store_path)?;

        Ok(Self::with_store(mirror_path, store))
    }
}

impl<S: ExpenseStore> Dataset<S> {
    /// Pair the CSV file at `mirror_path` with an already opened `store`.
    pub fn with_store(mirror_path: impl Into<PathBuf>, store: S) -> Self {
        Self {
            mirror_path: mirror_path.into(),
            store,
        }
    }

    /// The path of the CSV file.
    pub fn mirror_path(&self) -> &Path {
        &self.mirror_path
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load every stored expense, seeding the database from the CSV file if
    /// the database is empty.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created, the CSV file exists
    /// but cannot be read, or the database cannot be read or written.
    pub fn load(&mut self) -> Result<Loaded, Error> {
        self.store.ensure_schema()?;

        let seed = if self.store.is_empty()? {
            self.seed_from_mirror()?
        } else {
            Seed::AlreadyPopulated
        };

        let expenses = self.store.scan_all()?;
        tracing::debug!(
            "Loaded {} expenses from the database for {}",
            expenses.len(),
            self.mirror_path.display()
        );

        Ok(Loaded { expenses, seed })
    }

    fn seed_from_mirror(&mut self) -> Result<Seed, Error> {
        let contents = mirror::read(&self.mirror_path)?;
        let imported = contents.expenses.len();

        if imported > 0 {
            self.store.bulk_upsert(&contents.expenses)?;
            tracing::info!(
                "Seeded the database with {imported} expenses from {}",
                self.mirror_path.display()
            );
        }

        Ok(Seed::Seeded {
            imported,
            skipped: contents.skipped_rows,
        })
    }

    /// Replace the stored expenses with `expenses` and rewrite the CSV file.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateExpenseId] if two expenses share an ID,
    /// - [Error::SqlError] if the database cannot be written,
    /// - or [Error::Io] if the CSV file cannot be written.
    ///
    /// If writing the database fails, neither the database nor the CSV file
    /// is changed. If only the CSV write fails, the database already holds
    /// `expenses`.
    pub fn save(&mut self, expenses: &[Expense]) -> Result<(), Error> {
        self.store.ensure_schema()?;
        self.store.replace_all(expenses)?;

        mirror::write(&self.mirror_path, expenses).inspect_err(|error| {
            tracing::error!(
                "Saved expenses to the database but could not update {}: {error}",
                self.mirror_path.display()
            );
        })?;

        tracing::info!(
            "Saved {} expenses to {}",
            expenses.len(),
            self.mirror_path.display()
        );

        Ok(())
    }
}

/// Load the expenses for the CSV file at `path`.
///
/// A missing CSV file is treated as an empty dataset. See [Dataset::load].
pub fn load(path: &Path) -> Result<Vec<Expense>, Error> {
    Dataset::open(path)?
        .load()
        .map(|loaded| loaded.expenses)
}

/// Save `expenses` as the full set of expenses for the CSV file at `path`.
///
/// See [Dataset::save].
pub fn save(path: &Path, expenses: &[Expense]) -> Result<(), Error> {
    Dataset::open(path)?.save(expenses)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::TempDir;
    use time::macros::date;

    use crate::{
        Error, Expense, ExpenseId,
        dataset::{Dataset, Seed, load, save, store_path},
        mirror,
        store::ExpenseStore,
    };

    fn get_test_path(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join("data").join("expenses.csv")
    }

    fn sorted_by_id(mut expenses: Vec<Expense>) -> Vec<Expense> {
        expenses.sort_by(|a, b| a.id.cmp(&b.id));
        expenses
    }

    fn november_expenses() -> Vec<Expense> {
        vec![
            Expense::build(10.0, date!(2025 - 11 - 01), "Food").finalise(),
            Expense::build(500.0, date!(2025 - 11 - 01), "Rent")
                .description("November")
                .finalise(),
            Expense::build(5.25, date!(2025 - 11 - 02), "Food").finalise(),
        ]
    }

    #[test]
    fn store_path_swaps_extension() {
        assert_eq!(
            store_path(&PathBuf::from("data/expenses.csv")),
            PathBuf::from("data/expenses.db")
        );
        assert_eq!(
            store_path(&PathBuf::from("expenses")),
            PathBuf::from("expenses.db")
        );
    }

    #[test]
    fn open_rejects_data_file_with_database_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.db");

        let result = Dataset::open(&path);

        assert!(matches!(result, Err(Error::InvalidDataFile(ref rejected)) if *rejected == path));
        assert!(!path.exists());
    }

    #[test]
    fn save_to_database_extension_leaves_existing_file_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.DB");
        fs::write(&path, "keep me").unwrap();

        let result = save(&path, &november_expenses());

        assert_eq!(result, Err(Error::InvalidDataFile(path.clone())));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
        assert!(matches!(load(&path), Err(Error::InvalidDataFile(_))));
    }

    #[test]
    fn load_without_csv_returns_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = get_test_path(&temp_dir);

        let loaded = Dataset::open(&path).unwrap().load().unwrap();

        assert_eq!(loaded.expenses, vec![]);
        assert_eq!(
            loaded.seed,
            Seed::Seeded {
                imported: 0,
                skipped: 0
            }
        );
        assert!(store_path(&path).is_file());
    }

    #[test]
    fn load_seeds_from_legacy_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = get_test_path(&temp_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "date,category,amount\n\
             2025-11-01,Food,10.00\n\
             2025-11-01,Rent,500.00\n\
             not-a-date,Food,1.00\n\
             2025-11-02,Food,5.00\n",
        )
        .unwrap();

        let loaded = Dataset::open(&path).unwrap().load().unwrap();

        assert_eq!(
            loaded.seed,
            Seed::Seeded {
                imported: 3,
                skipped: 1
            }
        );
        let dates: Vec<_> = loaded.expenses.iter().map(|expense| expense.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 11 - 02),
                date!(2025 - 11 - 01),
                date!(2025 - 11 - 01)
            ]
        );
    }

    #[test]
    fn second_load_does_not_seed() {
        let temp_dir = TempDir::new().unwrap();
        let path = get_test_path(&temp_dir);
        mirror::write(&path, &november_expenses()).unwrap();

        let first = Dataset::open(&path).unwrap().load().unwrap();
        let second = Dataset::open(&path).unwrap().load().unwrap();

        assert!(matches!(first.seed, Seed::Seeded { imported: 3, .. }));
        assert_eq!(second.seed, Seed::AlreadyPopulated);
        assert_eq!(first.expenses, second.expenses);
    }

    #[test]
    fn load_ignores_csv_changes_once_seeded() {
        let temp_dir = TempDir::new().unwrap();
        let path = get_test_path(&temp_dir);
        mirror::write(&path, &november_expenses()).unwrap();
        let seeded = load(&path).unwrap();

        mirror::write(
            &path,
            &[Expense::build(1.0, date!(2020 - 01 - 01), "Stale").finalise()],
        )
        .unwrap();
        let reloaded = load(&path).unwrap();

        assert_eq!(reloaded, seeded);
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = get_test_path(&temp_dir);
        let expenses = november_expenses();

        save(&path, &expenses).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(sorted_by_id(loaded), sorted_by_id(expenses));
    }

    #[test]
    fn save_rewrites_csv_from_same_expenses() {
        let temp_dir = TempDir::new().unwrap();
        let path = get_test_path(&temp_dir);
        let mut dataset = Dataset::open(&path).unwrap();
        let mut expenses = dataset.load().unwrap().expenses;

        expenses.extend(november_expenses());
        dataset.save(&expenses).unwrap();

        let contents = mirror::read(&path).unwrap();
        assert_eq!(contents.expenses, expenses);
        assert_eq!(dataset.store().count().unwrap(), 3);
    }

    #[test]
    fn save_removes_deleted_expenses() {
        let temp_dir = TempDir::new().unwrap();
        let path = get_test_path(&temp_dir);
        save(&path, &november_expenses()).unwrap();

        let mut expenses = load(&path).unwrap();
        let removed = expenses.remove(0);
        save(&path, &expenses).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().all(|expense| expense.id != removed.id));
    }

    #[test]
    fn failed_save_keeps_database_and_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = get_test_path(&temp_dir);
        let original = november_expenses();
        save(&path, &original).unwrap();
        let csv_before = fs::read_to_string(&path).unwrap();

        let duplicate_id = ExpenseId::from("duplicate");
        let result = save(
            &path,
            &[
                Expense::build(1.0, date!(2025 - 12 - 01), "Food")
                    .id(duplicate_id.clone())
                    .finalise(),
                Expense::build(2.0, date!(2025 - 12 - 02), "Food")
                    .id(duplicate_id.clone())
                    .finalise(),
            ],
        );

        assert_eq!(result, Err(Error::DuplicateExpenseId(duplicate_id)));
        assert_eq!(sorted_by_id(load(&path).unwrap()), sorted_by_id(original));
        assert_eq!(fs::read_to_string(&path).unwrap(), csv_before);
    }
}
