//! CSV export
//!
//! Exports transactions, budget cells and the year history in a
//! spreadsheet-friendly form.

use std::io::Write;

use serde::Serialize;

use crate::error::LedgerResult;
use crate::models::{Month, Transaction};
use crate::services::{BudgetCalculator, TransactionFilter, YearSummary};
use crate::storage::LedgerStore;

#[derive(Serialize)]
struct TransactionRow<'a> {
    id: String,
    date: String,
    category: &'a str,
    subcategory: &'a str,
    amount: String,
    counterparty: &'a str,
    note: &'a str,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(txn: &'a Transaction) -> Self {
        Self {
            id: txn.id.as_uuid().to_string(),
            date: txn.date.to_string(),
            category: &txn.category,
            subcategory: &txn.subcategory,
            amount: txn.amount.amount().to_string(),
            counterparty: txn.counterparty.as_deref().unwrap_or(""),
            note: &txn.note,
        }
    }
}

#[derive(Serialize)]
struct BudgetRow<'a> {
    month: &'static str,
    category: &'a str,
    budgeted: String,
    spent: String,
    available: String,
    usage: String,
    band: String,
    modified: bool,
}

#[derive(Serialize)]
struct YearRow {
    year: i32,
    total_budget: String,
    total_spent: String,
    surplus: String,
    decision: String,
}

/// Export transactions, optionally only those dated in `year`
pub fn export_transactions_csv<W: Write>(
    store: &LedgerStore,
    writer: W,
    year: Option<i32>,
) -> LedgerResult<usize> {
    let filter = TransactionFilter {
        year,
        ..Default::default()
    };

    let mut wtr = csv::Writer::from_writer(writer);
    let transactions = BudgetCalculator::new(store).transactions(&filter);
    for txn in &transactions {
        wtr.serialize(TransactionRow::from(*txn))?;
    }
    wtr.flush()?;

    Ok(transactions.len())
}

/// Export every budgeted or spent cell of a year, month by month
pub fn export_budget_csv<W: Write>(store: &LedgerStore, writer: W, year: i32) -> LedgerResult<usize> {
    let calc = BudgetCalculator::new(store);
    let mut wtr = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for month in Month::ALL {
        for cell in calc.month_overview(month, year) {
            wtr.serialize(BudgetRow {
                month: month.name(),
                category: &cell.category,
                budgeted: cell.budgeted.amount().to_string(),
                spent: cell.spent.amount().to_string(),
                available: cell.available.amount().to_string(),
                usage: format!("{:.2}", cell.usage_ratio),
                band: cell.band.to_string(),
                modified: cell.modified,
            })?;
            rows += 1;
        }
    }
    wtr.flush()?;

    Ok(rows)
}

/// Export the year history
pub fn export_year_history_csv<W: Write>(history: &[YearSummary], writer: W) -> LedgerResult<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    for summary in history {
        wtr.serialize(YearRow {
            year: summary.year,
            total_budget: summary.total_budget.amount().to_string(),
            total_spent: summary.total_spent.amount().to_string(),
            surplus: summary.surplus.amount().to_string(),
            decision: summary
                .surplus_decision
                .map(|d| d.label().to_string())
                .unwrap_or_default(),
        })?;
    }
    wtr.flush()?;

    Ok(history.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, money};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn store() -> LedgerStore {
        let mut store = LedgerStore::new();
        store
            .year_mut(2024)
            .month_mut(Month::Enero)
            .set("Servicios", money(dec!(100)));
        let mut txn = Transaction::new(date(2024, 1, 2), "Servicios", money(dec!(12.50)), Utc::now());
        txn.note = "luz, enero".into();
        store.transactions.push(txn);
        store.transactions.push(Transaction::new(
            date(2025, 1, 2),
            "Servicios",
            money(dec!(1)),
            Utc::now(),
        ));
        store
    }

    #[test]
    fn test_transactions_csv_quotes_fields() {
        let mut out = Vec::new();
        let rows = export_transactions_csv(&store(), &mut out, Some(2024)).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(rows, 1);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,date,category,subcategory,amount,counterparty,note")
        );
        let row = lines.next().unwrap();
        assert!(row.contains("2024-01-02,Servicios,,12.50,,\"luz, enero\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_budget_csv() {
        let mut out = Vec::new();
        let rows = export_budget_csv(&store(), &mut out, 2024).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(rows, 1);
        assert!(text.contains("Enero,Servicios,100,12.50,87.50,"));
        assert!(text.trim_end().ends_with(",OK,false"));
    }

    #[test]
    fn test_year_history_csv() {
        let history = vec![YearSummary {
            year: 2024,
            total_budget: money(dec!(100)),
            total_spent: money(dec!(40)),
            surplus: money(dec!(60)),
            surplus_decision: None,
        }];
        let mut out = Vec::new();
        export_year_history_csv(&history, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("year,total_budget,total_spent,surplus,decision\n"));
        assert!(text.contains("2024,100,40,60,\n"));
    }
}
