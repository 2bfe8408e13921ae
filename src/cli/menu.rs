use std::io::{BufRead, Write};

use anyhow::Result;

use crate::application::ExpenseService;
use crate::domain::{SearchField, format_amount, parse_amount, parse_date};

use super::write_records_table;

const MENU_ITEMS: [&str; 8] = [
    "Add Expense",
    "View All Expenses",
    "Search Expenses",
    "Total Expenses",
    "Monthly Summary",
    "Category-wise Summary",
    "Delete an Expense",
    "Exit",
];

/// What the loop does after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// Interactive eight-choice menu over any line-based input and output.
///
/// End of input behaves like choosing Exit. Invalid input is reported and the
/// ledger is left untouched; storage failures end the loop with an error.
pub struct Menu<'a, R, W> {
    service: &'a ExpenseService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a ExpenseService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n=== Personal Expense Tracker ===")?;
            for (i, item) in MENU_ITEMS.iter().enumerate() {
                writeln!(self.output, "{}. {}", i + 1, item)?;
            }

            let Some(choice) = self.prompt("Choose an option (1-8): ")? else {
                break;
            };

            let step = match choice.trim() {
                "1" => self.add_expense()?,
                "2" => self.view_expenses()?,
                "3" => self.search_expenses()?,
                "4" => self.total_expenses()?,
                "5" => self.monthly_summary()?,
                "6" => self.category_summary()?,
                "7" => self.delete_expense()?,
                "8" => Step::Quit,
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Step::Continue
                }
            };

            if step == Step::Quit {
                break;
            }
        }

        writeln!(self.output, "Exiting... See you next time!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Print `label` and read one line without its line ending; `None` at
    /// end of input. Other whitespace is kept for free-text fields.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn add_expense(&mut self) -> Result<Step> {
        writeln!(self.output, "\nAdd New Expense")?;

        let Some(date) = self.prompt("Date (YYYY-MM-DD): ")? else {
            return Ok(Step::Quit);
        };
        if let Err(e) = parse_date(&date) {
            writeln!(self.output, "{}", e)?;
            return Ok(Step::Continue);
        }

        let Some(category) = self.prompt("Category (e.g., Food, Transport): ")? else {
            return Ok(Step::Quit);
        };

        let Some(amount) = self.prompt("Amount: ")? else {
            return Ok(Step::Quit);
        };
        let amount = amount.trim();
        if parse_amount(amount).is_err() {
            writeln!(self.output, "Please enter a valid number for amount.")?;
            return Ok(Step::Continue);
        }

        let Some(description) = self.prompt("Description: ")? else {
            return Ok(Step::Quit);
        };

        match self
            .service
            .add_expense(&date, &category, amount, &description)
        {
            Ok(_) => writeln!(self.output, "Expense added successfully!")?,
            Err(e) if e.is_validation() => writeln!(self.output, "{}", e)?,
            Err(e) => return Err(e.into()),
        }
        Ok(Step::Continue)
    }

    fn view_expenses(&mut self) -> Result<Step> {
        writeln!(self.output, "\n--- All Expenses ---")?;
        let records = self.service.list_expenses()?;
        write_records_table(&mut self.output, &records)?;
        Ok(Step::Continue)
    }

    fn search_expenses(&mut self) -> Result<Step> {
        writeln!(self.output, "\nSearch Expenses")?;

        let Some(choice) = self.prompt("Search by (1) Date or (2) Category? ")? else {
            return Ok(Step::Quit);
        };
        let Some(field) = search_field_choice(&choice) else {
            writeln!(self.output, "Invalid choice. Please try again.")?;
            return Ok(Step::Continue);
        };

        let Some(keyword) = self.prompt("Enter your search term: ")? else {
            return Ok(Step::Quit);
        };

        let records = self.service.search_expenses(field, &keyword)?;
        if records.is_empty() {
            writeln!(self.output, "No matching records found.")?;
        } else {
            write_records_table(&mut self.output, &records)?;
        }
        Ok(Step::Continue)
    }

    fn total_expenses(&mut self) -> Result<Step> {
        let total = self.service.total_amount()?;
        writeln!(self.output, "\nTotal Expenses: {}", format_amount(total))?;
        Ok(Step::Continue)
    }

    fn monthly_summary(&mut self) -> Result<Step> {
        writeln!(self.output, "\nMonthly Summary:")?;
        for entry in self.service.monthly_summary()? {
            writeln!(self.output, "{}: {}", entry.month, format_amount(entry.total))?;
        }
        Ok(Step::Continue)
    }

    fn category_summary(&mut self) -> Result<Step> {
        writeln!(self.output, "\nCategory-wise Summary:")?;
        for entry in self.service.category_summary()? {
            writeln!(
                self.output,
                "{}: {}",
                entry.display_name(),
                format_amount(entry.total)
            )?;
        }
        Ok(Step::Continue)
    }

    fn delete_expense(&mut self) -> Result<Step> {
        self.view_expenses()?;

        let Some(date) = self.prompt("\nEnter date of expense to delete (YYYY-MM-DD): ")? else {
            return Ok(Step::Quit);
        };
        let Some(description) = self.prompt("Enter description of expense to delete: ")? else {
            return Ok(Step::Quit);
        };

        match self.service.delete_expense(date.trim(), &description)? {
            0 => writeln!(self.output, "No matching expense found to delete.")?,
            n => writeln!(self.output, "Deleted {} expense(s).", n)?,
        }
        Ok(Step::Continue)
    }
}

/// Menu answer for the search field: the numbered choices or the field name.
fn search_field_choice(choice: &str) -> Option<SearchField> {
    match choice.trim() {
        "1" => Some(SearchField::Date),
        "2" => Some(SearchField::Category),
        other => other.parse().ok(),
    }
}
