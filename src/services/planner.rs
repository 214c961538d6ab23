//! Monthly budget planner
//!
//! Direct edits to the active year's budget: whole months, single cells,
//! and copying one month's plan onto others.

use tracing::info;

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Month, MonthlyBudget};
use crate::services::calculator::MonthSummary;
use crate::storage::DocumentKind;

/// Service for editing budget amounts
pub struct BudgetPlanner<'a> {
    ctx: &'a mut LedgerContext,
}

fn check_amount(category: &str, amount: Money) -> LedgerResult<()> {
    if amount.is_negative() {
        return Err(LedgerError::InvalidAmount(format!(
            "budget for {} cannot be negative: {}",
            category, amount
        )));
    }
    Ok(())
}

impl<'a> BudgetPlanner<'a> {
    pub fn new(ctx: &'a mut LedgerContext) -> Self {
        Self { ctx }
    }

    fn check_category(&self, category: &str) -> LedgerResult<()> {
        if self.ctx.store().custom_taxonomy.exists(category) {
            Ok(())
        } else {
            Err(LedgerError::category_not_found(category))
        }
    }

    /// Replace a whole month. Its modified flags are cleared.
    pub fn set_month_budget(
        &mut self,
        actor: &Actor,
        month: Month,
        budget: MonthlyBudget,
    ) -> LedgerResult<()> {
        self.ctx.require_mutation(actor, "set month budget")?;
        for (category, amount) in budget.iter() {
            self.check_category(category)?;
            check_amount(category, *amount)?;
        }

        let year = self.ctx.active_year();
        let total = budget.total();
        let store = self.ctx.store_mut();
        store.year_mut(year).set_month(month, budget);
        store.flags_mut(year).clear_month(month);

        self.ctx
            .persist(&[DocumentKind::YearBudgets, DocumentKind::MonthlyBudgets])?;
        self.ctx
            .audit(actor, "set month budget", &format!("{} {}: {}", month, year, total))?;
        info!(%month, year, %total, "month budget set");
        Ok(())
    }

    /// Set one cell by hand and mark it modified
    pub fn override_cell(
        &mut self,
        actor: &Actor,
        month: Month,
        category: &str,
        amount: Money,
    ) -> LedgerResult<()> {
        self.ctx.require_mutation(actor, "override budget")?;
        self.check_category(category)?;
        check_amount(category, amount)?;

        let year = self.ctx.active_year();
        let store = self.ctx.store_mut();
        store.year_mut(year).month_mut(month).set(category, amount);
        store.flags_mut(year).mark(month, category);

        self.ctx
            .persist(&[DocumentKind::YearBudgets, DocumentKind::MonthlyBudgets])?;
        self.ctx.audit(
            actor,
            "override budget",
            &format!("{}/{} {}: {}", month, category, year, amount),
        )?;
        Ok(())
    }

    /// Copy one month's amounts onto another
    pub fn copy_month(&mut self, actor: &Actor, from: Month, to: Month) -> LedgerResult<()> {
        self.copy_to(actor, from, &[to])
    }

    /// Copy one month's amounts onto the other eleven
    pub fn apply_to_all_months(&mut self, actor: &Actor, from: Month) -> LedgerResult<()> {
        let targets: Vec<Month> = Month::ALL.into_iter().filter(|m| *m != from).collect();
        self.copy_to(actor, from, &targets)
    }

    fn copy_to(&mut self, actor: &Actor, from: Month, targets: &[Month]) -> LedgerResult<()> {
        self.ctx.require_mutation(actor, "copy month budget")?;

        let year = self.ctx.active_year();
        let source = self
            .ctx
            .store()
            .year(year)
            .and_then(|y| y.month(from))
            .filter(|m| !m.is_empty())
            .cloned()
            .ok_or_else(|| LedgerError::NotFound {
                entity_type: "Month budget",
                identifier: format!("{} {}", from, year),
            })?;

        let store = self.ctx.store_mut();
        for &month in targets.iter().filter(|m| **m != from) {
            store.year_mut(year).set_month(month, source.clone());
            store.flags_mut(year).clear_month(month);
        }

        self.ctx
            .persist(&[DocumentKind::YearBudgets, DocumentKind::MonthlyBudgets])?;
        let names: Vec<&str> = targets.iter().map(|m| m.name()).collect();
        self.ctx.audit(
            actor,
            "copy month budget",
            &format!("{} -> {}", from, names.join(", ")),
        )?;
        info!(%from, targets = targets.len(), year, "month budget copied");
        Ok(())
    }

    /// Month-by-month totals of the active year
    pub fn annual_summary(&self) -> Vec<MonthSummary> {
        self.ctx.calculator().annual_summary(self.ctx.active_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Role;
    use crate::test_utils::{actor, admin, date, ledger_on, money};
    use rust_decimal_macros::dec;

    fn plan(pairs: &[(&str, rust_decimal::Decimal)]) -> MonthlyBudget {
        pairs
            .iter()
            .map(|(c, a)| (c.to_string(), money(*a)))
            .collect()
    }

    #[test]
    fn test_set_month_budget_clears_flags() {
        let mut ledger = ledger_on(date(2025, 2, 1));
        let mut planner = ledger.ctx.planner();
        planner
            .override_cell(&admin(), Month::Enero, "Servicios", money(dec!(40)))
            .unwrap();
        planner
            .set_month_budget(&admin(), Month::Enero, plan(&[("Servicios", dec!(100)), ("Mano de Obra", dec!(900))]))
            .unwrap();

        let calc = ledger.ctx.calculator();
        assert_eq!(calc.budgeted("Servicios", Month::Enero, 2025), money(dec!(100)));
        assert!(!calc.cell_status("Servicios", Month::Enero, 2025).modified);
        assert_eq!(calc.year_total_budget(2025), money(dec!(1000)));
    }

    #[test]
    fn test_override_marks_cell() {
        let mut ledger = ledger_on(date(2025, 2, 1));
        ledger
            .ctx
            .planner()
            .override_cell(&admin(), Month::Abril, "Servicios", money(dec!(75.5)))
            .unwrap();

        let status = ledger.ctx.calculator().cell_status("Servicios", Month::Abril, 2025);
        assert_eq!(status.budgeted, money(dec!(75.5)));
        assert!(status.modified);
    }

    #[test]
    fn test_rejects_negative_and_unknown() {
        let mut ledger = ledger_on(date(2025, 2, 1));
        let mut planner = ledger.ctx.planner();

        let err = planner
            .override_cell(&admin(), Month::Enero, "Servicios", money(dec!(-1)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let err = planner
            .set_month_budget(&admin(), Month::Enero, plan(&[("Pesca", dec!(1))]))
            .unwrap_err();
        assert!(err.is_not_found());

        let err = planner
            .override_cell(&actor(Role::Viewer), Month::Enero, "Servicios", money(dec!(1)))
            .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_apply_to_all_months() {
        let mut ledger = ledger_on(date(2025, 2, 1));
        let mut planner = ledger.ctx.planner();
        planner
            .set_month_budget(&admin(), Month::Enero, plan(&[("Servicios", dec!(100))]))
            .unwrap();
        planner.apply_to_all_months(&admin(), Month::Enero).unwrap();

        let summary = planner.annual_summary();
        assert!(summary.iter().all(|m| m.budgeted == money(dec!(100))));
        assert_eq!(ledger.ctx.calculator().year_total_budget(2025), money(dec!(1200)));
    }

    #[test]
    fn test_copy_from_empty_month_fails() {
        let mut ledger = ledger_on(date(2025, 2, 1));
        let err = ledger
            .ctx
            .planner()
            .copy_month(&admin(), Month::Junio, Month::Julio)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_copy_month_replaces_target() {
        let mut ledger = ledger_on(date(2025, 2, 1));
        let mut planner = ledger.ctx.planner();
        planner
            .set_month_budget(&admin(), Month::Enero, plan(&[("Servicios", dec!(10))]))
            .unwrap();
        planner
            .override_cell(&admin(), Month::Febrero, "Mano de Obra", money(dec!(5)))
            .unwrap();
        planner.copy_month(&admin(), Month::Enero, Month::Febrero).unwrap();

        let calc = ledger.ctx.calculator();
        assert_eq!(calc.budgeted("Servicios", Month::Febrero, 2025), money(dec!(10)));
        assert_eq!(calc.budgeted("Mano de Obra", Month::Febrero, 2025), Money::zero());
        assert!(!calc.cell_status("Mano de Obra", Month::Febrero, 2025).modified);
    }
}
