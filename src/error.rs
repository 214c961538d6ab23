//! Custom error types for the farm ledger
//!
//! This module defines the error hierarchy for the engine using thiserror
//! for ergonomic error definitions.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Money, Month};

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Amount is not a positive number
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    DuplicateEntity {
        entity_type: &'static str,
        identifier: String,
    },

    /// Entity belongs to the predefined set and cannot be removed
    #[error("{entity_type} is predefined and cannot be removed: {identifier}")]
    ProtectedEntity {
        entity_type: &'static str,
        identifier: String,
    },

    /// A budget cell (or the prior-year surplus) cannot cover the amount
    #[error("Insufficient budget in {cell}: need {needed}, have {available}")]
    InsufficientBudget {
        cell: String,
        needed: Money,
        available: Money,
    },

    /// The transaction date belongs to a year other than the active year
    #[error("Transaction year {transaction_year} differs from active year {active_year}")]
    CalendarYearMismatch {
        transaction_year: i32,
        active_year: i32,
    },

    /// Custom redistribution percentages do not add up to 100
    #[error("Percentages must add up to 100, got {total}")]
    PercentageSumInvalid { total: Decimal },

    /// The actor may not mutate financial state
    #[error("'{actor}' is not allowed to {action}")]
    Forbidden { actor: String, action: String },

    /// A year budget already exists and overwrite was not confirmed
    #[error("Budget for year {0} already exists")]
    DuplicateYear(i32),

    /// There is no positive surplus to redistribute
    #[error("No surplus available for year {year}")]
    NoSurplus { year: i32 },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for subcategories
    pub fn subcategory_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Subcategory",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget cells
    pub fn cell_not_found(month: Month, category: &str) -> Self {
        Self::NotFound {
            entity_type: "Budget cell",
            identifier: format!("{}/{}", month, category),
        }
    }

    /// Create a "not found" error for vendors
    pub fn vendor_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Vendor",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an authorization failure
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidAmount(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::category_not_found("Semillas");
        assert_eq!(err.to_string(), "Category not found: Semillas");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insufficient_budget_error() {
        let err = LedgerError::InsufficientBudget {
            cell: "Enero/Insumos Agrícolas".into(),
            needed: Money::new(dec!(50)),
            available: Money::new(dec!(30)),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient budget in Enero/Insumos Agrícolas: need $50.00, have $30.00"
        );
    }

    #[test]
    fn test_forbidden_error() {
        let err = LedgerError::Forbidden {
            actor: "ana".into(),
            action: "register expenses".into(),
        };
        assert!(err.is_forbidden());
        assert_eq!(err.to_string(), "'ana' is not allowed to register expenses");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ledger_err: LedgerError = io_err.into();
        assert!(matches!(ledger_err, LedgerError::Io(_)));
    }
}
