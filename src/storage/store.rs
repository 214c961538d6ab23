//! In-memory ledger state
//!
//! `LedgerStore` holds every collection the engine works on. It is loaded
//! once from the persistence collaborator and written back one document at
//! a time after each mutation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    CustomTaxonomy, ModifiedFlags, SurplusRecord, Transaction, TransferLogEntry, Vendor, YearBudget,
};

use super::documents::{
    decode, encode, CustomTaxonomyDocument, Document, MigrationContext, MonthlyBudgetsDocument,
    SurplusRecordsDocument, TransactionsDocument, TransferLogDocument, VendorsDocument,
    YearBudgetsDocument, CURRENT_SCHEMA_VERSION,
};
use super::{DocumentKind, Persistence};

/// All ledger collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerStore {
    /// Expenses in insertion order
    pub transactions: Vec<Transaction>,
    pub years: BTreeMap<i32, YearBudget>,
    pub modified: BTreeMap<i32, ModifiedFlags>,
    pub surplus_records: BTreeMap<i32, SurplusRecord>,
    pub custom_taxonomy: CustomTaxonomy,
    pub vendors: Vec<Vendor>,
    pub transfer_log: Vec<TransferLogEntry>,
}

/// A freshly loaded store together with the persisted working year
#[derive(Debug)]
pub struct LoadedStore {
    pub store: LedgerStore,
    pub active_year: i32,
}

fn load_document<D: Document>(
    persistence: &dyn Persistence,
    ctx: MigrationContext,
) -> LedgerResult<D> {
    let value = match persistence.load(D::KIND) {
        Ok(value) => value,
        Err(LedgerError::Json(message)) => {
            warn!(kind = %D::KIND, error = %message, "malformed document, using empty default");
            None
        }
        Err(e) => return Err(e),
    };
    decode(value, ctx)
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every document.
    ///
    /// `fallback_year` becomes the working year when none was persisted.
    pub fn load(
        persistence: &dyn Persistence,
        now: DateTime<Utc>,
        fallback_year: i32,
    ) -> LedgerResult<LoadedStore> {
        let ctx = MigrationContext { now };

        let transactions: TransactionsDocument = load_document(persistence, ctx)?;
        let working: MonthlyBudgetsDocument = load_document(persistence, ctx)?;
        let vendors: VendorsDocument = load_document(persistence, ctx)?;
        let years: YearBudgetsDocument = load_document(persistence, ctx)?;
        let surplus: SurplusRecordsDocument = load_document(persistence, ctx)?;
        let taxonomy: CustomTaxonomyDocument = load_document(persistence, ctx)?;
        let transfers: TransferLogDocument = load_document(persistence, ctx)?;

        let active_year = working.active_year.unwrap_or(fallback_year);

        let mut store = LedgerStore {
            transactions: transactions.transactions,
            years: years.years,
            modified: working.modified,
            surplus_records: surplus.records,
            custom_taxonomy: taxonomy.categories,
            vendors: vendors.vendors,
            transfer_log: transfers.entries,
        };

        if let Some((budget, flags)) = working.unassigned {
            store.adopt_legacy_working_budget(active_year, budget, flags);
        }

        debug!(
            active_year,
            transactions = store.transactions.len(),
            years = store.years.len(),
            "ledger loaded"
        );

        Ok(LoadedStore { store, active_year })
    }

    /// Legacy working budgets only seed a year that has no stored budget
    fn adopt_legacy_working_budget(&mut self, year: i32, budget: YearBudget, flags: ModifiedFlags) {
        if !budget.is_empty() && self.years.get(&year).map_or(true, YearBudget::is_empty) {
            self.years.insert(year, budget);
        }
        if !flags.is_empty() {
            self.modified.entry(year).or_insert(flags);
        }
    }

    /// Write one document
    pub fn save(
        &self,
        persistence: &mut dyn Persistence,
        kind: DocumentKind,
        active_year: i32,
    ) -> LedgerResult<()> {
        let value = match kind {
            DocumentKind::Transactions => encode(&TransactionsDocument {
                schema_version: CURRENT_SCHEMA_VERSION,
                transactions: self.transactions.clone(),
            })?,
            DocumentKind::MonthlyBudgets => encode(&MonthlyBudgetsDocument {
                schema_version: CURRENT_SCHEMA_VERSION,
                active_year: Some(active_year),
                modified: self.modified.clone(),
                unassigned: None,
            })?,
            DocumentKind::Vendors => encode(&VendorsDocument {
                schema_version: CURRENT_SCHEMA_VERSION,
                vendors: self.vendors.clone(),
            })?,
            DocumentKind::YearBudgets => encode(&YearBudgetsDocument {
                schema_version: CURRENT_SCHEMA_VERSION,
                years: self.years.clone(),
            })?,
            DocumentKind::SurplusRecords => encode(&SurplusRecordsDocument {
                schema_version: CURRENT_SCHEMA_VERSION,
                records: self.surplus_records.clone(),
            })?,
            DocumentKind::CustomTaxonomy => encode(&CustomTaxonomyDocument {
                schema_version: CURRENT_SCHEMA_VERSION,
                categories: self.custom_taxonomy.clone(),
            })?,
            DocumentKind::TransferLog => encode(&TransferLogDocument {
                schema_version: CURRENT_SCHEMA_VERSION,
                entries: self.transfer_log.clone(),
            })?,
        };

        persistence.save(kind, &value)
    }

    /// Write every document
    pub fn save_all(&self, persistence: &mut dyn Persistence, active_year: i32) -> LedgerResult<()> {
        for kind in DocumentKind::ALL {
            self.save(persistence, kind, active_year)?;
        }
        Ok(())
    }

    /// Budget of a year; missing years read as empty
    pub fn year(&self, year: i32) -> Option<&YearBudget> {
        self.years.get(&year)
    }

    /// Mutable budget of a year, created empty if absent
    pub fn year_mut(&mut self, year: i32) -> &mut YearBudget {
        self.years.entry(year).or_default()
    }

    /// Mutable modified flags of a year, created empty if absent
    pub fn flags_mut(&mut self, year: i32) -> &mut ModifiedFlags {
        self.modified.entry(year).or_default()
    }
}
