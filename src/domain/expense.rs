use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Amount, parse_amount};

/// Date format used both for input validation and for storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header row of the ledger file, in column order.
pub const HEADER: [&str; 4] = ["Date", "Category", "Amount", "Description"];

/// Errors raised while validating user input, before anything is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid amount '{0}'. Use a number like '12.50' or '-3'")]
    InvalidAmount(String),
}

/// A row exactly as it is stored in the ledger file.
///
/// Fields are kept verbatim; case folding and amount parsing happen at query
/// time so the stored text is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

impl ExpenseRecord {
    /// Parsed amount, or an error when the stored text is not a number.
    pub fn parsed_amount(&self) -> Result<Amount, ValidationError> {
        parse_amount(&self.amount).map_err(|_| ValidationError::InvalidAmount(self.amount.clone()))
    }

    /// The `YYYY-MM` prefix of the date.
    pub fn month(&self) -> String {
        self.date.chars().take(7).collect()
    }

    pub fn category_key(&self) -> String {
        self.category.to_lowercase()
    }

    /// Value of the given field, used by search.
    pub fn field(&self, field: SearchField) -> &str {
        match field {
            SearchField::Date => &self.date,
            SearchField::Category => &self.category,
        }
    }

    /// Exact date plus case-insensitive full description match.
    pub fn matches_key(&self, date: &str, description: &str) -> bool {
        self.date == date && self.description.to_lowercase() == description.to_lowercase()
    }

    pub fn to_row(&self) -> [&str; 4] {
        [&self.date, &self.category, &self.amount, &self.description]
    }
}

/// A validated expense ready to be appended.
///
/// The amount keeps the caller's text; `amount_value` is what it parsed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: String,
    pub amount_value: Amount,
    pub description: String,
}

impl NewExpense {
    /// Validate raw input. The date must be a real calendar date written in
    /// canonical `YYYY-MM-DD` form, and the amount must parse as a number.
    pub fn parse(
        date: &str,
        category: impl Into<String>,
        amount: &str,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let date = parse_date(date)?;
        let amount_value =
            parse_amount(amount).map_err(|_| ValidationError::InvalidAmount(amount.to_string()))?;

        Ok(Self {
            date,
            category: category.into(),
            amount: amount.to_string(),
            amount_value,
            description: description.into(),
        })
    }

    pub fn into_record(self) -> ExpenseRecord {
        ExpenseRecord {
            date: self.date.format(DATE_FORMAT).to_string(),
            category: self.category,
            amount: self.amount,
            description: self.description,
        }
    }
}

/// Strictly parse a `YYYY-MM-DD` date.
///
/// chrono accepts unpadded fields like `2024-1-5`; those are rejected so the
/// stored text always has a 7-character month prefix.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidDate(input.to_string());

    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())?;
    if date.format(DATE_FORMAT).to_string() != trimmed {
        return Err(invalid());
    }
    Ok(date)
}

/// Field a search keyword is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Date,
    Category,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Date => "date",
            SearchField::Category => "category",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SearchField::Date),
            "category" => Ok(SearchField::Category),
            _ => Err(format!("unknown search field: {}", s)),
        }
    }
}

/// Uppercase the first character and lowercase the rest.
/// Example: "fOOD" -> "Food"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, category: &str, amount: &str, description: &str) -> ExpenseRecord {
        ExpenseRecord {
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            description: description.into(),
        }
    }

    #[test]
    fn test_parse_date_accepts_real_dates() {
        assert!(parse_date("2024-02-29").is_ok()); // leap year
        assert!(parse_date("2023-12-31").is_ok());
        assert!(parse_date(" 2024-01-05 ").is_ok());
    }

    #[test]
    fn test_parse_date_rejects_invalid() {
        for input in [
            "2024-02-30",
            "2024-13-01",
            "2023-02-29",
            "not-a-date",
            "2024-1-5",
            "2024/01/05",
            "",
        ] {
            assert_eq!(
                parse_date(input),
                Err(ValidationError::InvalidDate(input.to_string())),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_new_expense_keeps_amount_text() {
        let expense = NewExpense::parse("2024-01-05", "Food", "12.345", "Lunch").unwrap();
        assert_eq!(expense.amount_value.to_string(), "12.345");
        assert_eq!(
            expense.into_record(),
            record("2024-01-05", "Food", "12.345", "Lunch")
        );

        let expense = NewExpense::parse("2024-01-05", "Food", "1e3", "Lunch").unwrap();
        assert_eq!(expense.amount_value.to_string(), "1000");
        assert_eq!(expense.into_record().amount, "1e3");
    }

    #[test]
    fn test_new_expense_rejects_bad_amount() {
        let err = NewExpense::parse("2024-01-05", "Food", "abc", "Lunch").unwrap_err();
        assert_eq!(err, ValidationError::InvalidAmount("abc".into()));
    }

    #[test]
    fn test_date_is_checked_before_amount() {
        let err = NewExpense::parse("2024-02-30", "Food", "abc", "Lunch").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate(_)));
    }

    #[test]
    fn test_matches_key_is_case_insensitive_on_description_only() {
        let r = record("2024-01-01", "Food", "5.00", "Lunch");
        assert!(r.matches_key("2024-01-01", "lunch"));
        assert!(r.matches_key("2024-01-01", "LUNCH"));
        assert!(!r.matches_key("2024-01-01", "lun"));
        assert!(!r.matches_key("2024-01-02", "Lunch"));
    }

    #[test]
    fn test_month_handles_short_dates() {
        assert_eq!(record("2024-01-05", "", "", "").month(), "2024-01");
        assert_eq!(record("2024", "", "", "").month(), "2024");
    }

    #[test]
    fn test_search_field_from_str() {
        assert_eq!("date".parse::<SearchField>(), Ok(SearchField::Date));
        assert_eq!("Category".parse::<SearchField>(), Ok(SearchField::Category));
        assert!("amount".parse::<SearchField>().is_err());
        assert!("2".parse::<SearchField>().is_err());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("food"), "Food");
        assert_eq!(capitalize("fOOD"), "Food");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }
}
