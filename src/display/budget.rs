//! Budget display formatting
//!
//! Month overviews with usage bands, the annual summary and the year history.

use crate::models::{Money, Month};
use crate::services::{CellStatus, MonthSummary, YearSummary};

use super::truncate;

/// Format the cells of one month, with a totals line
pub fn format_month_overview(month: Month, year: i32, cells: &[CellStatus]) -> String {
    let mut output = format!("Budget for {} {}\n", month, year);

    if cells.is_empty() {
        output.push_str("No budget or spending recorded.\n");
        return output;
    }

    output.push_str(&format!(
        "{:28} {:>12} {:>12} {:>12} {:>7}  {:9}\n",
        "Category", "Budgeted", "Spent", "Available", "Used", "Status"
    ));
    output.push_str(&"-".repeat(88));
    output.push('\n');

    for cell in cells {
        let marker = if cell.modified { "*" } else { " " };
        output.push_str(&format!(
            "{:28} {:>12} {:>12} {:>12} {:>6.1}%  {:9}{}\n",
            truncate(&cell.category, 28),
            cell.budgeted.to_string(),
            cell.spent.to_string(),
            cell.available.to_string(),
            cell.usage_ratio * rust_decimal::Decimal::ONE_HUNDRED,
            cell.band.to_string(),
            marker
        ));
    }

    let budgeted: Money = cells.iter().map(|c| c.budgeted).sum();
    let spent: Money = cells.iter().map(|c| c.spent).sum();
    output.push_str(&"-".repeat(88));
    output.push('\n');
    output.push_str(&format!(
        "{:28} {:>12} {:>12} {:>12}\n",
        "Total",
        budgeted.to_string(),
        spent.to_string(),
        (budgeted - spent).to_string()
    ));

    if cells.iter().any(|c| c.modified) {
        output.push_str("* manually adjusted\n");
    }

    output
}

pub fn format_annual_summary(year: i32, months: &[MonthSummary]) -> String {
    let mut output = format!("Annual summary {}\n", year);
    output.push_str(&format!(
        "{:12} {:>14} {:>14} {:>14}\n",
        "Month", "Budgeted", "Spent", "Available"
    ));
    output.push_str(&"-".repeat(57));
    output.push('\n');

    for m in months {
        output.push_str(&format!(
            "{:12} {:>14} {:>14} {:>14}\n",
            m.month.name(),
            m.budgeted.to_string(),
            m.spent.to_string(),
            m.available.to_string()
        ));
    }

    output
}

pub fn format_year_history(history: &[YearSummary]) -> String {
    if history.is_empty() {
        return "No year budgets stored.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:6} {:>14} {:>14} {:>14}  {}\n",
        "Year", "Budget", "Spent", "Surplus", "Decision"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for h in history {
        let decision = h.surplus_decision.map(|d| d.label()).unwrap_or("-");
        output.push_str(&format!(
            "{:6} {:>14} {:>14} {:>14}  {}\n",
            h.year,
            h.total_budget.to_string(),
            h.total_spent.to_string(),
            h.surplus.to_string(),
            decision
        ));
    }

    output
}
