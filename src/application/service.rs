use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{
    Amount, ExpenseRecord, IntegrityReport, NewExpense, SearchField, build_integrity_report,
    compute_category_totals, compute_monthly_totals, compute_total, filter_records,
};
use crate::storage::LedgerStore;

use super::{AppError, CategoryTotal, MonthlyTotal, TotalReport};

/// Default ledger file, relative to the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "expenses.csv";

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, menu, tests).
pub struct ExpenseService {
    store: LedgerStore,
}

impl ExpenseService {
    /// Create a service over an existing store handle.
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Open the ledger at `path`, creating it with a header if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let service = Self::new(LedgerStore::new(path));
        service.initialize()?;
        Ok(service)
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Make sure the ledger file exists with its header. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<bool, AppError> {
        Ok(self.store.initialize()?)
    }

    /// Validate and append a new expense.
    ///
    /// Nothing is written when the date or amount is rejected.
    pub fn add_expense(
        &self,
        date: &str,
        category: &str,
        amount: &str,
        description: &str,
    ) -> Result<ExpenseRecord, AppError> {
        let expense = NewExpense::parse(date, category, amount, description)?;
        let record = expense.into_record();
        self.store.append(&record)?;
        Ok(record)
    }

    /// All records in storage order.
    pub fn list_expenses(&self) -> Result<Vec<ExpenseRecord>, AppError> {
        Ok(self.store.read_table()?.records())
    }

    /// Records whose `field` contains `keyword`, ignoring case.
    pub fn search_expenses(
        &self,
        field: SearchField,
        keyword: &str,
    ) -> Result<Vec<ExpenseRecord>, AppError> {
        let records = self.list_expenses()?;
        let found: Vec<ExpenseRecord> = filter_records(&records, field, keyword)
            .into_iter()
            .cloned()
            .collect();
        debug!(%field, keyword, matches = found.len(), "searched expenses");
        Ok(found)
    }

    /// Sum of every parseable amount.
    pub fn total_amount(&self) -> Result<Amount, AppError> {
        Ok(compute_total(&self.list_expenses()?))
    }

    /// Total together with how many records were read.
    pub fn total_report(&self) -> Result<TotalReport, AppError> {
        let records = self.list_expenses()?;
        Ok(TotalReport {
            total: compute_total(&records),
            record_count: records.len(),
        })
    }

    /// Totals per `YYYY-MM`, oldest month first.
    pub fn monthly_summary(&self) -> Result<Vec<MonthlyTotal>, AppError> {
        let records = self.list_expenses()?;
        Ok(compute_monthly_totals(&records)
            .into_iter()
            .map(|(month, total)| MonthlyTotal { month, total })
            .collect())
    }

    /// Totals per lowercased category, in alphabetical order.
    pub fn category_summary(&self) -> Result<Vec<CategoryTotal>, AppError> {
        let records = self.list_expenses()?;
        Ok(compute_category_totals(&records)
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect())
    }

    /// Remove every record dated exactly `date` whose description equals
    /// `description` ignoring case. Returns how many were removed; 0 means
    /// nothing matched and the file was left untouched.
    ///
    /// Rows that cannot be read as records are kept as they are.
    pub fn delete_expense(&self, date: &str, description: &str) -> Result<usize, AppError> {
        let mut table = self.store.read_table()?;
        let before = table.rows.len();

        table.rows.retain(|row| match row.to_record() {
            Ok(record) => !record.matches_key(date, description),
            Err(_) => true,
        });

        let deleted = before - table.rows.len();
        if deleted > 0 {
            self.store.rewrite(&table)?;
            info!(date, description, deleted, "deleted expenses");
        }
        Ok(deleted)
    }

    /// Scan the whole file and report rows that aggregation would skip.
    pub fn check_integrity(&self) -> Result<IntegrityReport, AppError> {
        let table = self.store.read_table()?;
        let mut records = Vec::new();
        let mut shape_errors = Vec::new();

        for row in &table.rows {
            match row.to_record() {
                Ok(record) => records.push((row.line, record)),
                Err(malformed) => shape_errors.push(malformed),
            }
        }

        Ok(build_integrity_report(&records, shape_errors))
    }
}
