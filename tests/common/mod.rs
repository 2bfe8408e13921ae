// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use anyhow::Result;
use impensa::application::ExpenseService;
use tempfile::TempDir;

pub const HEADER_LINE: &str = "Date,Category,Amount,Description";

/// Helper to create a test service with a temporary ledger file
pub fn test_service() -> Result<(ExpenseService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("expenses.csv");
    let service = ExpenseService::open(path)?;
    Ok((service, temp_dir))
}

/// Helper to create a service over a ledger file with the given raw content
pub fn service_with_content(content: impl AsRef<[u8]>) -> Result<(ExpenseService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("expenses.csv");
    fs::write(&path, content)?;
    let service = ExpenseService::open(path)?;
    Ok((service, temp_dir))
}

/// Read the ledger file as text
pub fn read_ledger(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Test fixture: a few expenses across two months and three categories
pub struct StandardExpenses;

impl StandardExpenses {
    pub fn create(service: &ExpenseService) -> Result<()> {
        service.add_expense("2024-01-05", "Food", "10", "Groceries")?;
        service.add_expense("2024-01-20", "food", "5", "Lunch")?;
        service.add_expense("2024-02-01", "Transport", "3", "Bus ticket")?;
        Ok(())
    }
}
