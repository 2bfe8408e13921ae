// Application layer: validation and use cases on top of the CSV store.
// Every client (CLI subcommands, interactive menu) goes through ExpenseService.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
