//! Transaction display formatting

use crate::models::Transaction;

use super::truncate;

/// Format one register row
pub fn format_transaction_row(txn: &Transaction) -> String {
    format!(
        "{:12} {} {:24} {:18} {:>12}  {}",
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        truncate(&txn.category, 24),
        truncate(&txn.subcategory, 18),
        txn.amount.to_string(),
        txn.counterparty.as_deref().unwrap_or("")
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[&Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:24} {:18} {:>12}  {}\n",
        "ID", "Date", "Category", "Subcategory", "Amount", "Vendor"
    ));
    output.push_str(&"-".repeat(96));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }

    output
}

pub fn format_transaction_details(txn: &Transaction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if !txn.subcategory.is_empty() {
        output.push_str(&format!("Subcategory: {}\n", txn.subcategory));
    }
    if let Some(vendor) = &txn.counterparty {
        output.push_str(&format!("Vendor:      {}\n", vendor));
    }
    if !txn.note.is_empty() {
        output.push_str(&format!("Note:        {}\n", txn.note));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_register_lists_rows() {
        let txn = Transaction::new(
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            "Servicios",
            Money::new(dec!(42)),
            Utc::now(),
        );
        let output = format_transaction_register(&[&txn]);

        assert!(output.contains("2025-02-03"));
        assert!(output.contains("$42.00"));
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(format_transaction_register(&[]), "No transactions found.\n");
    }
}
