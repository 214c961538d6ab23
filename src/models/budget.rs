//! Budget cells, months and years
//!
//! A cell is one (month, category) amount inside a year. Amounts and the
//! "modified" markers are kept in separate maps of the same shape; the
//! markers are advisory and never consulted for amounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::money::Money;
use super::month::Month;

/// Budgeted amount per category for one month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyBudget {
    cells: BTreeMap<String, Money>,
}

impl MonthlyBudget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Budgeted amount for a category, zero when the cell is absent
    pub fn get(&self, category: &str) -> Money {
        self.cells.get(category).copied().unwrap_or_default()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.cells.contains_key(category)
    }

    pub fn set(&mut self, category: impl Into<String>, amount: Money) {
        self.cells.insert(category.into(), amount);
    }

    /// Add to a cell, creating it at zero first
    pub fn add(&mut self, category: &str, amount: Money) {
        *self.cells.entry(category.to_string()).or_default() += amount;
    }

    pub fn remove(&mut self, category: &str) -> Option<Money> {
        self.cells.remove(category)
    }

    pub fn total(&self) -> Money {
        self.cells.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Money)> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Money)> {
        self.cells.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, Money)> for MonthlyBudget {
    fn from_iter<I: IntoIterator<Item = (String, Money)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Twelve monthly budgets of one year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearBudget {
    months: BTreeMap<Month, MonthlyBudget>,
}

impl YearBudget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(&self, month: Month) -> Option<&MonthlyBudget> {
        self.months.get(&month)
    }

    /// Mutable month view, created empty on first access
    pub fn month_mut(&mut self, month: Month) -> &mut MonthlyBudget {
        self.months.entry(month).or_default()
    }

    pub fn set_month(&mut self, month: Month, budget: MonthlyBudget) {
        self.months.insert(month, budget);
    }

    pub fn budgeted(&self, month: Month, category: &str) -> Money {
        self.months
            .get(&month)
            .map(|m| m.get(category))
            .unwrap_or_default()
    }

    pub fn contains_cell(&self, month: Month, category: &str) -> bool {
        self.months
            .get(&month)
            .map(|m| m.contains(category))
            .unwrap_or(false)
    }

    pub fn total(&self) -> Money {
        self.months.values().map(MonthlyBudget::total).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Month, &MonthlyBudget)> {
        self.months.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Month, &mut MonthlyBudget)> {
        self.months.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.months.values().all(MonthlyBudget::is_empty)
    }
}

/// Manual-override markers for one year, same shape as the amounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifiedFlags {
    flags: BTreeMap<Month, BTreeMap<String, bool>>,
}

impl ModifiedFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, month: Month, category: &str) {
        self.flags
            .entry(month)
            .or_default()
            .insert(category.to_string(), true);
    }

    pub fn is_modified(&self, month: Month, category: &str) -> bool {
        self.flags
            .get(&month)
            .and_then(|m| m.get(category))
            .copied()
            .unwrap_or(false)
    }

    pub fn clear_month(&mut self, month: Month) {
        self.flags.remove(&month);
    }

    pub fn is_empty(&self) -> bool {
        self.flags.values().all(|m| !m.values().any(|f| *f))
    }
}

/// One (month, category) coordinate inside the active year
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub month: Month,
    pub category: String,
}

impl CellRef {
    pub fn new(month: Month, category: impl Into<String>) -> Self {
        Self {
            month,
            category: category.into(),
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.category)
    }
}

/// Append-only record of a point transfer between cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferLogEntry {
    pub timestamp: DateTime<Utc>,
    pub year: i32,
    pub amount: Money,
    pub source: CellRef,
    pub dest: CellRef,
    pub actor: String,
}

/// Spend level of a cell relative to its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UsageBand {
    Ok,
    Alert,
    Critical,
    Exceeded,
}

impl UsageBand {
    /// Classify a spent/budgeted ratio.
    ///
    /// 0.75 is still OK and 1.00 is still CRITICAL. CRITICAL starts at 0.90
    /// inclusive.
    pub fn classify(ratio: Decimal) -> Self {
        if ratio > Decimal::ONE {
            UsageBand::Exceeded
        } else if ratio >= dec!(0.90) {
            UsageBand::Critical
        } else if ratio > dec!(0.75) {
            UsageBand::Alert
        } else {
            UsageBand::Ok
        }
    }
}

impl fmt::Display for UsageBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageBand::Ok => write!(f, "OK"),
            UsageBand::Alert => write!(f, "ALERT"),
            UsageBand::Critical => write!(f, "CRITICAL"),
            UsageBand::Exceeded => write!(f, "EXCEEDED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(v: Decimal) -> Money {
        Money::new(v)
    }

    #[test]
    fn test_monthly_budget_add_creates_cell() {
        let mut budget = MonthlyBudget::new();
        assert_eq!(budget.get("Servicios"), Money::zero());
        budget.add("Servicios", m(dec!(10)));
        budget.add("Servicios", m(dec!(5.5)));
        assert_eq!(budget.get("Servicios"), m(dec!(15.5)));
        assert_eq!(budget.total(), m(dec!(15.5)));
    }

    #[test]
    fn test_year_total() {
        let mut year = YearBudget::new();
        year.month_mut(Month::Enero).set("A", m(dec!(100)));
        year.month_mut(Month::Junio).set("B", m(dec!(50)));
        assert_eq!(year.total(), m(dec!(150)));
        assert_eq!(year.budgeted(Month::Junio, "B"), m(dec!(50)));
        assert_eq!(year.budgeted(Month::Julio, "B"), Money::zero());
        assert!(year.contains_cell(Month::Enero, "A"));
        assert!(!year.contains_cell(Month::Enero, "B"));
    }

    #[test]
    fn test_year_budget_json_shape() {
        let mut year = YearBudget::new();
        year.month_mut(Month::Enero).set("Semillas", m(dec!(1000)));
        let json = serde_json::to_value(&year).unwrap();
        assert_eq!(json, serde_json::json!({"Enero": {"Semillas": "1000"}}));
    }

    #[test]
    fn test_modified_flags() {
        let mut flags = ModifiedFlags::new();
        assert!(flags.is_empty());
        flags.mark(Month::Marzo, "Servicios");
        assert!(flags.is_modified(Month::Marzo, "Servicios"));
        assert!(!flags.is_modified(Month::Abril, "Servicios"));
        flags.clear_month(Month::Marzo);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_usage_bands() {
        assert_eq!(UsageBand::classify(dec!(0)), UsageBand::Ok);
        assert_eq!(UsageBand::classify(dec!(0.7499)), UsageBand::Ok);
        assert_eq!(UsageBand::classify(dec!(0.75)), UsageBand::Ok);
        assert_eq!(UsageBand::classify(dec!(0.7501)), UsageBand::Alert);
        assert_eq!(UsageBand::classify(dec!(0.8999)), UsageBand::Alert);
        assert_eq!(UsageBand::classify(dec!(0.90)), UsageBand::Critical);
        assert_eq!(UsageBand::classify(dec!(1.00)), UsageBand::Critical);
        assert_eq!(UsageBand::classify(dec!(1.0001)), UsageBand::Exceeded);
    }
}
