//! Session-owned ledger context
//!
//! `LedgerContext` bundles the store, the working year, the settings and the
//! three collaborators (persistence, authorization, clock). Every engine
//! service borrows it; there is no process-wide state.

use chrono::Datelike;
use tracing::{info, warn};

use crate::audit::{Actor, Authorizer};
use crate::clock::Clock;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::services::{
    BudgetCalculator, BudgetPlanner, ReallocationEngine, TaxonomyService, TransactionRegistrar,
    VendorService, YearRolloverManager,
};
use crate::storage::{DocumentKind, LedgerStore, Persistence};

/// Everything one session needs to run the engine
pub struct LedgerContext {
    store: LedgerStore,
    active_year: i32,
    /// Store and working year as of the last successful save
    committed: (LedgerStore, i32),
    settings: Settings,
    persistence: Box<dyn Persistence>,
    authorizer: Box<dyn Authorizer>,
    clock: Box<dyn Clock>,
}

impl LedgerContext {
    /// Load all documents and restore the persisted working year, falling
    /// back to the clock's current year
    pub fn open(
        persistence: Box<dyn Persistence>,
        authorizer: Box<dyn Authorizer>,
        clock: Box<dyn Clock>,
        settings: Settings,
    ) -> LedgerResult<Self> {
        let loaded = LedgerStore::load(persistence.as_ref(), clock.now(), clock.today().year())?;
        info!(active_year = loaded.active_year, "ledger opened");

        Ok(Self {
            committed: (loaded.store.clone(), loaded.active_year),
            store: loaded.store,
            active_year: loaded.active_year,
            settings,
            persistence,
            authorizer,
            clock,
        })
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn active_year(&self) -> i32 {
        self.active_year
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Read-only budget figures over the current store
    pub fn calculator(&self) -> BudgetCalculator<'_> {
        BudgetCalculator::new(&self.store)
    }

    pub fn taxonomy(&mut self) -> TaxonomyService<'_> {
        TaxonomyService::new(self)
    }

    pub fn registrar(&mut self) -> TransactionRegistrar<'_> {
        TransactionRegistrar::new(self)
    }

    pub fn reallocation(&mut self) -> ReallocationEngine<'_> {
        ReallocationEngine::new(self)
    }

    pub fn rollover(&mut self) -> YearRolloverManager<'_> {
        YearRolloverManager::new(self)
    }

    pub fn planner(&mut self) -> BudgetPlanner<'_> {
        BudgetPlanner::new(self)
    }

    pub fn vendors(&mut self) -> VendorService<'_> {
        VendorService::new(self)
    }

    // === Crate-internal plumbing for the services ===

    pub(crate) fn store_mut(&mut self) -> &mut LedgerStore {
        &mut self.store
    }

    pub(crate) fn set_active_year(&mut self, year: i32) {
        self.active_year = year;
    }

    /// Refuse unless the actor may mutate financial state
    pub(crate) fn require_mutation(&self, actor: &Actor, action: &str) -> LedgerResult<()> {
        if self.authorizer.may_mutate(actor) {
            Ok(())
        } else {
            Err(LedgerError::Forbidden {
                actor: actor.username.clone(),
                action: action.to_string(),
            })
        }
    }

    /// Write the given documents back.
    ///
    /// On failure the in-memory store and working year are restored to the
    /// last successful save, so the caller can retry the whole operation.
    pub(crate) fn persist(&mut self, kinds: &[DocumentKind]) -> LedgerResult<()> {
        match self.save_documents(kinds) {
            Ok(()) => {
                self.committed = (self.store.clone(), self.active_year);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "save failed, restoring last saved state");
                let (store, active_year) = self.committed.clone();
                self.store = store;
                self.active_year = active_year;
                Err(e)
            }
        }
    }

    fn save_documents(&mut self, kinds: &[DocumentKind]) -> LedgerResult<()> {
        for kind in kinds {
            self.store
                .save(self.persistence.as_mut(), *kind, self.active_year)?;
        }
        Ok(())
    }

    pub(crate) fn audit(&mut self, actor: &Actor, action: &str, details: &str) -> LedgerResult<()> {
        self.authorizer.audit(actor, action, details)
    }
}
