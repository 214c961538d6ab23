//! Export module for the farm ledger
//!
//! CSV exports of transactions, budget cells and the year history, for
//! spreadsheets and external reporting.

pub mod csv;

pub use self::csv::{export_budget_csv, export_transactions_csv, export_year_history_csv};
