//! Storage layer for the farm ledger
//!
//! The engine hands whole documents to a `Persistence` collaborator, one per
//! `DocumentKind`. Documents are typed and versioned (see `documents`); the
//! collaborator only moves JSON values in and out.

pub mod documents;
pub mod file_io;
pub mod json_files;
pub mod memory;
pub mod store;

pub use documents::CURRENT_SCHEMA_VERSION;
pub use file_io::write_json_atomic;
pub use json_files::JsonFilePersistence;
pub use memory::MemoryPersistence;
pub use store::LedgerStore;

use serde_json::Value;
use std::fmt;

use crate::error::LedgerResult;

/// The persisted documents, one file each when stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    Transactions,
    /// Active year plus per-year modified flags
    MonthlyBudgets,
    Vendors,
    YearBudgets,
    SurplusRecords,
    CustomTaxonomy,
    TransferLog,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 7] = [
        DocumentKind::Transactions,
        DocumentKind::MonthlyBudgets,
        DocumentKind::Vendors,
        DocumentKind::YearBudgets,
        DocumentKind::SurplusRecords,
        DocumentKind::CustomTaxonomy,
        DocumentKind::TransferLog,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DocumentKind::Transactions => "transactions.json",
            DocumentKind::MonthlyBudgets => "monthly_budgets.json",
            DocumentKind::Vendors => "vendors.json",
            DocumentKind::YearBudgets => "year_budgets.json",
            DocumentKind::SurplusRecords => "surplus_records.json",
            DocumentKind::CustomTaxonomy => "custom_categories.json",
            DocumentKind::TransferLog => "transfer_log.json",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Transactions => "transactions",
            DocumentKind::MonthlyBudgets => "monthly budgets",
            DocumentKind::Vendors => "vendors",
            DocumentKind::YearBudgets => "year budgets",
            DocumentKind::SurplusRecords => "surplus records",
            DocumentKind::CustomTaxonomy => "custom taxonomy",
            DocumentKind::TransferLog => "transfer log",
        };
        f.write_str(name)
    }
}

/// Persistence collaborator
///
/// `load` returns `Ok(None)` for an absent document and
/// `Err(LedgerError::Json)` for one that is not valid JSON. Any other error
/// is propagated to the caller unchanged.
pub trait Persistence: Send {
    fn load(&self, kind: DocumentKind) -> LedgerResult<Option<Value>>;

    fn save(&mut self, kind: DocumentKind, document: &Value) -> LedgerResult<()>;
}
