//! Budget calculator
//!
//! Pure read-side figures derived from the store on every call: budgeted,
//! spent, available, usage and year surplus. Nothing is cached because the
//! store may have changed between calls.

use std::collections::BTreeSet;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Money, Month, SurplusDecision, Transaction, UsageBand};
use crate::storage::LedgerStore;

/// Figures for one (month, category) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellStatus {
    pub month: Month,
    pub category: String,
    pub budgeted: Money,
    pub spent: Money,
    pub available: Money,
    pub usage_ratio: Decimal,
    pub band: UsageBand,
    pub modified: bool,
}

/// Totals for one month of a year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: Month,
    pub budgeted: Money,
    pub spent: Money,
    pub available: Money,
}

/// Totals for one year, as shown in the year history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub total_budget: Money,
    pub total_spent: Money,
    pub surplus: Money,
    pub surplus_decision: Option<SurplusDecision>,
}

/// Filter for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub year: Option<i32>,
    pub month: Option<Month>,
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.year.map_or(true, |y| txn.date.year() == y)
            && self.month.map_or(true, |m| Month::of(txn.date) == m)
            && self.category.as_deref().map_or(true, |c| txn.category == c)
    }
}

/// Read-only calculator over a store snapshot
pub struct BudgetCalculator<'a> {
    store: &'a LedgerStore,
}

impl<'a> BudgetCalculator<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Budgeted amount of a cell, zero when absent
    pub fn budgeted(&self, category: &str, month: Month, year: i32) -> Money {
        self.store
            .year(year)
            .map(|y| y.budgeted(month, category))
            .unwrap_or_default()
    }

    /// Sum of expenses in that category dated within (month, year)
    pub fn spent(&self, category: &str, month: Month, year: i32) -> Money {
        self.store
            .transactions
            .iter()
            .filter(|t| t.category == category && month.contains(year, t.date))
            .map(|t| t.amount)
            .sum()
    }

    /// `budgeted - spent`; negative when overspent
    pub fn available(&self, category: &str, month: Month, year: i32) -> Money {
        self.budgeted(category, month, year) - self.spent(category, month, year)
    }

    /// `spent / budgeted`, or zero when nothing is budgeted
    pub fn usage_ratio(&self, category: &str, month: Month, year: i32) -> Decimal {
        let budgeted = self.budgeted(category, month, year);
        if !budgeted.is_positive() {
            return Decimal::ZERO;
        }
        self.spent(category, month, year).ratio_of(budgeted)
    }

    pub fn usage_band(&self, category: &str, month: Month, year: i32) -> UsageBand {
        UsageBand::classify(self.usage_ratio(category, month, year))
    }

    pub fn cell_status(&self, category: &str, month: Month, year: i32) -> CellStatus {
        let budgeted = self.budgeted(category, month, year);
        let spent = self.spent(category, month, year);
        let usage_ratio = if budgeted.is_positive() {
            spent.ratio_of(budgeted)
        } else {
            Decimal::ZERO
        };

        CellStatus {
            month,
            category: category.to_string(),
            budgeted,
            spent,
            available: budgeted - spent,
            usage_ratio,
            band: UsageBand::classify(usage_ratio),
            modified: self
                .store
                .modified
                .get(&year)
                .map_or(false, |f| f.is_modified(month, category)),
        }
    }

    /// Every category that is budgeted or has spend in the month
    pub fn month_overview(&self, month: Month, year: i32) -> Vec<CellStatus> {
        let mut categories: BTreeSet<&str> = BTreeSet::new();
        if let Some(budget) = self.store.year(year).and_then(|y| y.month(month)) {
            categories.extend(budget.iter().map(|(c, _)| c.as_str()));
        }
        categories.extend(
            self.store
                .transactions
                .iter()
                .filter(|t| month.contains(year, t.date))
                .map(|t| t.category.as_str()),
        );

        categories
            .into_iter()
            .map(|c| self.cell_status(c, month, year))
            .collect()
    }

    /// Cells of a month with money left over, candidates for transfers
    pub fn month_leftovers(&self, month: Month, year: i32) -> Vec<CellStatus> {
        self.month_overview(month, year)
            .into_iter()
            .filter(|cell| cell.available.is_positive())
            .collect()
    }

    pub fn year_total_budget(&self, year: i32) -> Money {
        self.store.year(year).map(|y| y.total()).unwrap_or_default()
    }

    /// Spend across the whole calendar year, whatever the working year is
    pub fn year_total_spent(&self, year: i32) -> Money {
        self.store
            .transactions
            .iter()
            .filter(|t| t.date.year() == year)
            .map(|t| t.amount)
            .sum()
    }

    /// Total budgeted minus total spent over the calendar year
    pub fn year_surplus(&self, year: i32) -> Money {
        self.year_total_budget(year) - self.year_total_spent(year)
    }

    /// Surplus of `year` not yet drawn to cover shortfalls
    pub fn surplus_remaining(&self, year: i32) -> Money {
        let used = self
            .store
            .surplus_records
            .get(&year)
            .map(|r| r.used)
            .unwrap_or_default();
        self.year_surplus(year) - used
    }

    /// Month-by-month totals for a year, all twelve months
    pub fn annual_summary(&self, year: i32) -> Vec<MonthSummary> {
        Month::ALL
            .iter()
            .map(|&month| {
                let budgeted = self
                    .store
                    .year(year)
                    .and_then(|y| y.month(month))
                    .map(|m| m.total())
                    .unwrap_or_default();
                let spent: Money = self
                    .store
                    .transactions
                    .iter()
                    .filter(|t| month.contains(year, t.date))
                    .map(|t| t.amount)
                    .sum();
                MonthSummary {
                    month,
                    budgeted,
                    spent,
                    available: budgeted - spent,
                }
            })
            .collect()
    }

    pub fn year_summary(&self, year: i32) -> YearSummary {
        let total_budget = self.year_total_budget(year);
        let total_spent = self.year_total_spent(year);
        YearSummary {
            year,
            total_budget,
            total_spent,
            surplus: total_budget - total_spent,
            surplus_decision: self
                .store
                .surplus_records
                .get(&year)
                .and_then(|r| r.decision),
        }
    }

    /// Transactions in stored order
    pub fn transactions(&self, filter: &TransactionFilter) -> Vec<&'a Transaction> {
        self.store
            .transactions
            .iter()
            .filter(|t| filter.matches(t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, money};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn store_with_seeds() -> LedgerStore {
        let mut store = LedgerStore::new();
        store
            .year_mut(2024)
            .month_mut(Month::Enero)
            .set("Semillas", money(dec!(1000)));
        for amount in [dec!(300), dec!(400), dec!(200)] {
            store.transactions.push(Transaction::new(
                date(2024, 1, 10),
                "Semillas",
                money(amount),
                Utc::now(),
            ));
        }
        store
    }

    #[test]
    fn test_seed_budget_scenario() {
        let store = store_with_seeds();
        let calc = BudgetCalculator::new(&store);

        assert_eq!(calc.spent("Semillas", Month::Enero, 2024), money(dec!(900)));
        assert_eq!(calc.available("Semillas", Month::Enero, 2024), money(dec!(100)));
        assert_eq!(calc.usage_ratio("Semillas", Month::Enero, 2024), dec!(0.9));
        assert_eq!(calc.usage_band("Semillas", Month::Enero, 2024), UsageBand::Critical);
    }

    #[test]
    fn test_spent_matches_month_and_year_exactly() {
        let mut store = store_with_seeds();
        store.transactions.push(Transaction::new(date(2023, 1, 10), "Semillas", money(dec!(50)), Utc::now()));
        store.transactions.push(Transaction::new(date(2024, 2, 1), "Semillas", money(dec!(50)), Utc::now()));
        store.transactions.push(Transaction::new(date(2024, 1, 2), "semillas", money(dec!(50)), Utc::now()));
        let calc = BudgetCalculator::new(&store);

        assert_eq!(calc.spent("Semillas", Month::Enero, 2024), money(dec!(900)));
    }

    #[test]
    fn test_overspend_is_negative_available() {
        let mut store = store_with_seeds();
        store.transactions.push(Transaction::new(date(2024, 1, 20), "Semillas", money(dec!(250)), Utc::now()));
        let calc = BudgetCalculator::new(&store);

        assert_eq!(calc.available("Semillas", Month::Enero, 2024), money(dec!(-150)));
        assert_eq!(calc.usage_band("Semillas", Month::Enero, 2024), UsageBand::Exceeded);
    }

    #[test]
    fn test_zero_budget_has_zero_ratio() {
        let mut store = LedgerStore::new();
        store.transactions.push(Transaction::new(date(2024, 3, 1), "Servicios", money(dec!(10)), Utc::now()));
        let calc = BudgetCalculator::new(&store);

        assert_eq!(calc.usage_ratio("Servicios", Month::Marzo, 2024), Decimal::ZERO);
        assert_eq!(calc.available("Servicios", Month::Marzo, 2024), money(dec!(-10)));
    }

    #[test]
    fn test_year_surplus_uses_calendar_year() {
        let mut store = LedgerStore::new();
        for month in Month::ALL {
            store.year_mut(2024).month_mut(month).set("Mano de Obra", money(dec!(10000)));
        }
        store.transactions.push(Transaction::new(date(2024, 6, 1), "Mano de Obra", money(dec!(95000)), Utc::now()));
        store.transactions.push(Transaction::new(date(2025, 1, 1), "Mano de Obra", money(dec!(7)), Utc::now()));
        let calc = BudgetCalculator::new(&store);

        assert_eq!(calc.year_total_budget(2024), money(dec!(120000)));
        assert_eq!(calc.year_surplus(2024), money(dec!(25000)));
        assert_eq!(calc.year_surplus(2025), money(dec!(-7)));
    }

    #[test]
    fn test_month_overview_and_leftovers() {
        let mut store = store_with_seeds();
        store.year_mut(2024).month_mut(Month::Enero).set("Servicios", money(dec!(50)));
        store.transactions.push(Transaction::new(date(2024, 1, 4), "Otros Gastos", money(dec!(5)), Utc::now()));
        let calc = BudgetCalculator::new(&store);

        let overview = calc.month_overview(Month::Enero, 2024);
        let names: Vec<_> = overview.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Otros Gastos", "Semillas", "Servicios"]);

        let leftovers = calc.month_leftovers(Month::Enero, 2024);
        let names: Vec<_> = leftovers.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Semillas", "Servicios"]);
    }

    #[test]
    fn test_annual_summary_covers_all_months() {
        let store = store_with_seeds();
        let calc = BudgetCalculator::new(&store);

        let summary = calc.annual_summary(2024);
        assert_eq!(summary.len(), 12);
        assert_eq!(summary[0].available, money(dec!(100)));
        assert_eq!(summary[1].budgeted, Money::zero());
    }

    #[test]
    fn test_transaction_filter() {
        let mut store = store_with_seeds();
        store.transactions.push(Transaction::new(date(2024, 2, 1), "Servicios", money(dec!(1)), Utc::now()));
        let calc = BudgetCalculator::new(&store);

        assert_eq!(calc.transactions(&TransactionFilter::default()).len(), 4);
        assert_eq!(calc.transactions(&TransactionFilter::default().month(Month::Febrero)).len(), 1);
        assert_eq!(calc.transactions(&TransactionFilter::default().category("Semillas").year(2024)).len(), 3);
        assert!(calc.transactions(&TransactionFilter::default().year(2023)).is_empty());
    }
}
