use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ExpenseRecord, parse_date};

/// A stored row that cannot be used as-is. Never fatal: readers skip it and
/// `check` reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRecord {
    /// 1-based line in the ledger file (the header is line 1)
    pub line: u64,
    pub reason: String,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Summary of the ledger file's health.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub row_count: usize,
    pub valid_count: usize,
    pub issues: Vec<MalformedRecord>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Build a report from rows that were already split into well-shaped records
/// and shape failures.
pub fn build_integrity_report(
    records: &[(u64, ExpenseRecord)],
    shape_errors: Vec<MalformedRecord>,
) -> IntegrityReport {
    let row_count = records.len() + shape_errors.len();
    let mut issues = shape_errors;
    let mut valid_count = 0;

    for (line, record) in records {
        let before = issues.len();
        if parse_date(&record.date).is_err() {
            issues.push(MalformedRecord {
                line: *line,
                reason: format!("invalid date '{}'", record.date),
            });
        }
        if record.parsed_amount().is_err() {
            issues.push(MalformedRecord {
                line: *line,
                reason: format!("invalid amount '{}'", record.amount),
            });
        }
        if issues.len() == before {
            valid_count += 1;
        }
    }

    issues.sort_by_key(|issue| issue.line);

    IntegrityReport {
        row_count,
        valid_count,
        issues,
    }
}
