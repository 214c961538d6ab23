//! Year rollover
//!
//! Creating year budgets, switching the working year, and the per-year
//! history used for closing reports.

use tracing::info;

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::error::{LedgerError, LedgerResult};
use crate::models::YearBudget;
use crate::services::calculator::YearSummary;
use crate::storage::DocumentKind;

/// Service for year lifecycle operations
pub struct YearRolloverManager<'a> {
    ctx: &'a mut LedgerContext,
}

impl<'a> YearRolloverManager<'a> {
    pub fn new(ctx: &'a mut LedgerContext) -> Self {
        Self { ctx }
    }

    /// Create the budget for `year`, blank or as a copy of `year - 1`.
    ///
    /// An existing year is only replaced when `overwrite` is set. Modified
    /// flags never carry over. The active year is left alone.
    pub fn create_year(
        &mut self,
        actor: &Actor,
        year: i32,
        clone_from_previous: bool,
        overwrite: bool,
    ) -> LedgerResult<YearBudget> {
        self.ctx.require_mutation(actor, "create year")?;

        if self.ctx.store().years.contains_key(&year) && !overwrite {
            return Err(LedgerError::DuplicateYear(year));
        }

        let budget = if clone_from_previous {
            self.ctx
                .store()
                .year(year - 1)
                .cloned()
                .ok_or(LedgerError::NotFound {
                    entity_type: "Year budget",
                    identifier: (year - 1).to_string(),
                })?
        } else {
            YearBudget::new()
        };

        let store = self.ctx.store_mut();
        store.years.insert(year, budget.clone());
        store.modified.remove(&year);

        self.ctx
            .persist(&[DocumentKind::YearBudgets, DocumentKind::MonthlyBudgets])?;
        let details = if clone_from_previous {
            format!("{} (copied from {})", year, year - 1)
        } else {
            year.to_string()
        };
        self.ctx.audit(actor, "create year", &details)?;
        info!(year, cloned = clone_from_previous, "year budget created");

        Ok(budget)
    }

    /// Point the engine at another year.
    ///
    /// Not a data mutation, so any role may do it; it is still audited. A
    /// year with no stored budget gets an empty one.
    pub fn switch_active_year(&mut self, actor: &Actor, year: i32) -> LedgerResult<()> {
        let previous = self.ctx.active_year();
        let created = !self.ctx.store().years.contains_key(&year);
        self.ctx.set_active_year(year);
        self.ctx.store_mut().year_mut(year);

        let mut docs = vec![DocumentKind::MonthlyBudgets];
        if created {
            docs.push(DocumentKind::YearBudgets);
        }
        self.ctx.persist(&docs)?;
        self.ctx
            .audit(actor, "switch year", &format!("{} -> {}", previous, year))?;
        info!(from = previous, to = year, "active year switched");
        Ok(())
    }

    /// Summary of every stored year, newest first
    pub fn compute_year_history(&self) -> Vec<YearSummary> {
        let calc = self.ctx.calculator();
        self.ctx
            .store()
            .years
            .keys()
            .rev()
            .map(|&year| calc.year_summary(year))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Role;
    use crate::models::{Money, Month, SurplusDecision, SurplusRecord, Transaction};
    use crate::test_utils::{actor, admin, date, ledger_on, money};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_blank_year() {
        let mut ledger = ledger_on(date(2025, 6, 1));
        let budget = ledger
            .ctx
            .rollover()
            .create_year(&admin(), 2026, false, false)
            .unwrap();

        assert!(budget.is_empty());
        assert!(ledger.ctx.store().years.contains_key(&2026));
        assert_eq!(ledger.ctx.active_year(), 2025);
    }

    #[test]
    fn test_clone_copies_amounts_not_flags() {
        let mut ledger = ledger_on(date(2025, 6, 1));
        {
            let store = ledger.ctx.store_mut();
            store.year_mut(2025).month_mut(Month::Marzo).set("Servicios", money(dec!(80)));
            store.flags_mut(2025).mark(Month::Marzo, "Servicios");
        }

        ledger
            .ctx
            .rollover()
            .create_year(&admin(), 2026, true, false)
            .unwrap();

        // Later edits to the source must not leak into the copy
        ledger
            .ctx
            .store_mut()
            .year_mut(2025)
            .month_mut(Month::Marzo)
            .set("Servicios", money(dec!(1)));

        let calc = ledger.ctx.calculator();
        assert_eq!(calc.budgeted("Servicios", Month::Marzo, 2026), money(dec!(80)));
        assert!(calc.cell_status("Servicios", Month::Marzo, 2025).modified);
        assert!(!calc.cell_status("Servicios", Month::Marzo, 2026).modified);
    }

    #[test]
    fn test_existing_year_needs_overwrite() {
        let mut ledger = ledger_on(date(2025, 6, 1));
        ledger
            .ctx
            .store_mut()
            .year_mut(2025)
            .month_mut(Month::Enero)
            .set("Servicios", money(dec!(10)));
        let mut rollover = ledger.ctx.rollover();

        let err = rollover.create_year(&admin(), 2025, false, false).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateYear(2025)));

        let budget = rollover.create_year(&admin(), 2025, false, true).unwrap();
        assert!(budget.is_empty());
    }

    #[test]
    fn test_clone_without_previous_year_fails() {
        let mut ledger = ledger_on(date(2025, 6, 1));
        let err = ledger
            .ctx
            .rollover()
            .create_year(&admin(), 2030, true, false)
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!ledger.ctx.store().years.contains_key(&2030));
    }

    #[test]
    fn test_viewer_may_switch_but_not_create() {
        let mut ledger = ledger_on(date(2025, 6, 1));
        let viewer = actor(Role::Viewer);

        let err = ledger
            .ctx
            .rollover()
            .create_year(&viewer, 2026, false, false)
            .unwrap_err();
        assert!(err.is_forbidden());

        ledger.ctx.rollover().switch_active_year(&viewer, 2023).unwrap();
        assert_eq!(ledger.ctx.active_year(), 2023);
        assert!(ledger.ctx.store().years[&2023].is_empty());
        assert_eq!(ledger.audited_actions(), vec!["switch year"]);
    }

    #[test]
    fn test_switched_year_appears_in_history() {
        let mut ledger = ledger_on(date(2025, 6, 1));
        ledger.ctx.rollover().switch_active_year(&admin(), 2027).unwrap();

        let history = ledger.ctx.rollover().compute_year_history();
        assert_eq!(history[0].year, 2027);
        assert_eq!(history[0].total_budget, Money::zero());

        let reopened = ledger.reopen(date(2025, 6, 1));
        assert!(reopened.store().years.contains_key(&2027));
    }

    #[test]
    fn test_failed_switch_keeps_previous_year() {
        let mut ledger = ledger_on(date(2025, 6, 1));
        ledger.persistence.set_fail_saves(true).unwrap();

        let err = ledger
            .ctx
            .rollover()
            .switch_active_year(&admin(), 2027)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        assert_eq!(ledger.ctx.active_year(), 2025);
        assert!(!ledger.ctx.store().years.contains_key(&2027));
        assert!(ledger.audited_actions().is_empty());
    }

    #[test]
    fn test_active_year_survives_reopen() {
        let mut ledger = ledger_on(date(2025, 6, 1));
        ledger.ctx.rollover().switch_active_year(&admin(), 2022).unwrap();

        let reopened = ledger.reopen(date(2025, 6, 1));
        assert_eq!(reopened.active_year(), 2022);
    }

    #[test]
    fn test_year_history_is_descending() {
        let mut ledger = ledger_on(date(2025, 6, 1));
        {
            let store = ledger.ctx.store_mut();
            store.year_mut(2023).month_mut(Month::Enero).set("Servicios", money(dec!(100)));
            store.year_mut(2024).month_mut(Month::Enero).set("Servicios", money(dec!(200)));
            store.year_mut(2025);
            store.transactions.push(Transaction::new(
                date(2024, 1, 9),
                "Servicios",
                money(dec!(50)),
                Utc::now(),
            ));
            store.surplus_records.insert(
                2024,
                SurplusRecord::new(money(dec!(150)), Some(SurplusDecision::Training), Utc::now()),
            );
        }

        let history = ledger.ctx.rollover().compute_year_history();
        let years: Vec<_> = history.iter().map(|h| h.year).collect();
        assert_eq!(years, vec![2025, 2024, 2023]);

        assert_eq!(history[0].total_budget, Money::zero());
        assert_eq!(history[1].total_spent, money(dec!(50)));
        assert_eq!(history[1].surplus, money(dec!(150)));
        assert_eq!(history[1].surplus_decision, Some(SurplusDecision::Training));
        assert_eq!(history[2].surplus_decision, None);
    }
}
