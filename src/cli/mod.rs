mod menu;

pub use menu::*;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{DEFAULT_LEDGER_FILE, ExpenseService};
use crate::domain::{ExpenseRecord, SearchField, format_amount};

/// Impensa - Personal Expense Ledger
#[derive(Parser)]
#[command(name = "impensa")]
#[command(about = "A personal expense ledger kept in a plain CSV file")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, global = true, default_value = DEFAULT_LEDGER_FILE)]
    pub file: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run (starts the interactive menu if omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger file if it does not exist
    Init,

    /// Record a new expense
    Add {
        /// Date of the expense (YYYY-MM-DD)
        date: String,

        /// Category (e.g., "Food", "Transport")
        category: String,

        /// Amount (e.g., "12.50" or "-3")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Free-text description
        #[arg(default_value = "")]
        description: String,
    },

    /// List all expenses
    List {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Search expenses by date or category
    Search {
        /// Field to search: date, category
        #[arg(long, default_value = "category")]
        by: String,

        /// Text to look for (case-insensitive)
        keyword: String,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show the total of all expenses
    Total {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Totals per month
    Monthly {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Totals per category
    Categories {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Delete expenses matching a date and description
    Delete {
        /// Exact date of the expense (YYYY-MM-DD)
        date: String,

        /// Full description (case-insensitive)
        description: String,
    },

    /// Verify every row of the ledger file
    Check,

    /// Start the interactive menu
    Menu,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let service = ExpenseService::open(&self.file)
            .with_context(|| format!("Failed to open ledger file: {}", self.file))?;

        match self.command.unwrap_or(Commands::Menu) {
            Commands::Init => {
                println!("Ledger ready: {}", service.path().display());
            }

            Commands::Add {
                date,
                category,
                amount,
                description,
            } => {
                let record = service.add_expense(&date, &category, &amount, &description)?;
                println!(
                    "Added expense: {} {} {} ({})",
                    record.date, record.category, record.amount, record.description
                );
            }

            Commands::List { format } => {
                let records = service.list_expenses()?;
                print_records(&records, &format)?;
            }

            Commands::Search {
                by,
                keyword,
                format,
            } => {
                let field: SearchField = by.parse().map_err(|e| {
                    anyhow::anyhow!(
                        "Invalid search field '{}'. Valid fields: date, category. Error: {}",
                        by,
                        e
                    )
                })?;
                let records = service.search_expenses(field, &keyword)?;
                print_records(&records, &format)?;
            }

            Commands::Total { format } => {
                let report = service.total_report()?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                    "csv" => {
                        let mut writer = csv::Writer::from_writer(io::stdout());
                        writer.write_record(["total", "records"])?;
                        writer.write_record([
                            format_amount(report.total),
                            report.record_count.to_string(),
                        ])?;
                        writer.flush()?;
                    }
                    _ => println!("Total Expenses: {}", format_amount(report.total)),
                }
            }

            Commands::Monthly { format } => {
                let summary = service.monthly_summary()?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                    "csv" => {
                        let mut writer = csv::Writer::from_writer(io::stdout());
                        writer.write_record(["month", "total"])?;
                        for entry in &summary {
                            writer.write_record([&entry.month, &format_amount(entry.total)])?;
                        }
                        writer.flush()?;
                    }
                    _ => {
                        if summary.is_empty() {
                            println!("No expenses found.");
                        } else {
                            println!("{:<10} {:>12}", "MONTH", "TOTAL");
                            println!("{}", "-".repeat(23));
                            for entry in &summary {
                                println!("{:<10} {:>12}", entry.month, format_amount(entry.total));
                            }
                        }
                    }
                }
            }

            Commands::Categories { format } => {
                let summary = service.category_summary()?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                    "csv" => {
                        let mut writer = csv::Writer::from_writer(io::stdout());
                        writer.write_record(["category", "total"])?;
                        for entry in &summary {
                            writer.write_record([&entry.category, &format_amount(entry.total)])?;
                        }
                        writer.flush()?;
                    }
                    _ => {
                        if summary.is_empty() {
                            println!("No expenses found.");
                        } else {
                            println!("{:<20} {:>12}", "CATEGORY", "TOTAL");
                            println!("{}", "-".repeat(33));
                            for entry in &summary {
                                println!(
                                    "{:<20} {:>12}",
                                    truncate(&entry.display_name(), 20),
                                    format_amount(entry.total)
                                );
                            }
                        }
                    }
                }
            }

            Commands::Delete { date, description } => {
                let deleted = service.delete_expense(&date, &description)?;
                if deleted == 0 {
                    println!("No matching expense found to delete.");
                } else {
                    println!("Deleted {} expense(s).", deleted);
                }
            }

            Commands::Check => run_check_command(&service)?,

            Commands::Menu => {
                let stdin = io::stdin();
                let mut menu = Menu::new(&service, stdin.lock(), io::stdout());
                menu.run()?;
            }
        }

        Ok(())
    }
}

fn run_check_command(service: &ExpenseService) -> Result<()> {
    println!("Checking ledger file {}...\n", service.path().display());

    let report = service.check_integrity()?;

    println!("Rows:    {}", report.row_count);
    println!("Valid:   {}", report.valid_count);
    println!();

    if report.is_healthy() {
        println!("Ledger is consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        anyhow::bail!("Ledger integrity check failed");
    }

    Ok(())
}

fn print_records(records: &[ExpenseRecord], format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(records)?),
        "csv" => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record(crate::domain::HEADER)?;
            for record in records {
                writer.write_record(record.to_row())?;
            }
            writer.flush()?;
        }
        _ => {
            let mut out = io::stdout().lock();
            write_records_table(&mut out, records)?;
        }
    }
    Ok(())
}

/// Render records as an aligned table, or a "no expenses" line when empty.
pub fn write_records_table<W: Write>(out: &mut W, records: &[ExpenseRecord]) -> io::Result<()> {
    if records.is_empty() {
        writeln!(out, "No expenses found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<10}  {:<15} {:>12}  {}",
        "DATE", "CATEGORY", "AMOUNT", "DESCRIPTION"
    )?;
    writeln!(out, "{}", "-".repeat(60))?;
    for record in records {
        let amount = record
            .parsed_amount()
            .map(format_amount)
            .unwrap_or_else(|_| record.amount.clone());
        writeln!(
            out,
            "{:<10}  {:<15} {:>12}  {}",
            record.date,
            truncate(&record.category, 15),
            amount,
            record.description
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
