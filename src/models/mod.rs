//! Core data models for the farm ledger
//!
//! This module contains all the data structures used throughout the engine:
//! money, months, the category taxonomy, transactions, budget cells,
//! surplus records and vendors.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod month;
pub mod surplus;
pub mod transaction;
pub mod vendor;

pub use budget::{CellRef, ModifiedFlags, MonthlyBudget, TransferLogEntry, UsageBand, YearBudget};
pub use category::{Category, CategoryOrigin, CustomTaxonomy, PREDEFINED_CATEGORIES};
pub use ids::{TransactionId, VendorId};
pub use money::{Money, MoneyParseError};
pub use month::Month;
pub use surplus::{SurplusDecision, SurplusRecord};
pub use transaction::{Transaction, TransactionValidationError};
pub use vendor::Vendor;
