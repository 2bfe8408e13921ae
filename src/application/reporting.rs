use serde::{Deserialize, Serialize};

use crate::domain::{Amount, capitalize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub total: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Lowercased category name
    pub category: String,
    pub total: Amount,
}

impl CategoryTotal {
    /// Category name as shown to users, e.g. "food" -> "Food".
    pub fn display_name(&self) -> String {
        capitalize(&self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalReport {
    pub total: Amount,
    pub record_count: usize,
}
