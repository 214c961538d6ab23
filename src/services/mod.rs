//! Service layer for the farm ledger
//!
//! The services hold the engine's rules on top of the ledger store. Each
//! one borrows the `LedgerContext`; mutating services check authorization
//! first, persist the documents they touched and audit the action last.

pub mod calculator;
pub mod planner;
pub mod reallocation;
pub mod registrar;
pub mod rollover;
pub mod taxonomy;
pub mod vendor;

pub use calculator::{BudgetCalculator, CellStatus, MonthSummary, TransactionFilter, YearSummary};
pub use planner::BudgetPlanner;
pub use reallocation::{ReallocationEngine, SurplusPlan};
pub use registrar::{
    ExpenseDraft, RegistrationDecisions, RegistrationOutcome, RemediationDecision,
    TransactionRegistrar, YearMismatchDecision,
};
pub use rollover::YearRolloverManager;
pub use taxonomy::TaxonomyService;
pub use vendor::{VendorDraft, VendorService};
