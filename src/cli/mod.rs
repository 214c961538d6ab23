//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the service layer.

pub mod activity;
pub mod budget;
pub mod category;
pub mod expense;
pub mod export;
pub mod surplus;
pub mod transfer;
pub mod vendor;
pub mod year;

pub use activity::{handle_activity_command, ActivityCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use surplus::{handle_surplus_command, SurplusCommands};
pub use transfer::handle_transfer_command;
pub use vendor::{handle_vendor_command, VendorCommands};
pub use year::{handle_year_command, YearCommands};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CellRef, Money, Month};

/// Parse a user-entered amount
pub(crate) fn parse_money(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| LedgerError::InvalidAmount(e.to_string()))
}

pub(crate) fn parse_month(input: &str) -> LedgerResult<Month> {
    input.parse()
}

/// Parse a YYYY-MM-DD date
pub(crate) fn parse_date(input: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", input)))
}

/// Parse a `Month/Category` cell reference
pub(crate) fn parse_cell(input: &str) -> LedgerResult<CellRef> {
    let (month, category) = input.split_once('/').ok_or_else(|| {
        LedgerError::Validation(format!("Invalid cell '{}', expected Month/Category", input))
    })?;
    let category = category.trim();
    if category.is_empty() {
        return Err(LedgerError::Validation(format!("Invalid cell '{}': missing category", input)));
    }
    Ok(CellRef::new(parse_month(month)?, category))
}

/// Parse a `Category=value` pair
pub(crate) fn parse_pair(input: &str) -> LedgerResult<(String, String)> {
    let (key, value) = input.split_once('=').ok_or_else(|| {
        LedgerError::Validation(format!("Invalid entry '{}', expected Category=value", input))
    })?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

pub(crate) fn parse_percentage(input: &str) -> LedgerResult<Decimal> {
    input
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(format!("Invalid percentage: {}", input)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_cell() {
        let cell = parse_cell("enero/Mano de Obra").unwrap();
        assert_eq!(cell, CellRef::new(Month::Enero, "Mano de Obra"));
        assert!(parse_cell("Enero").is_err());
        assert!(parse_cell("Enero/ ").is_err());
        assert!(parse_cell("Smarch/Servicios").is_err());
    }

    #[test]
    fn test_parse_pair_and_percentage() {
        let (key, value) = parse_pair("Servicios = 40%").unwrap();
        assert_eq!(key, "Servicios");
        assert_eq!(parse_percentage(&value).unwrap(), dec!(40));
        assert!(parse_pair("Servicios").is_err());
    }
}
