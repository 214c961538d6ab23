//! Expense transaction model
//!
//! A transaction is an immutable spend record against one category on one
//! calendar day. It can only be removed, never edited.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::TransactionId;
use super::money::Money;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Calendar day of the expense
    pub date: NaiveDate,

    /// Category name (join key into the taxonomy and budget cells)
    pub category: String,

    /// Advisory subcategory, not checked against the taxonomy
    #[serde(default)]
    pub subcategory: String,

    /// Always positive
    pub amount: Money,

    /// Vendor or other counterparty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,

    #[serde(default)]
    pub note: String,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction stamped with the given creation time
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            date,
            category: category.into(),
            subcategory: String::new(),
            amount,
            counterparty: None,
            note: String::new(),
            created_at,
        }
    }

    /// Check the (date, category, amount) tuple used by legacy deletes
    pub fn matches_key(&self, date: NaiveDate, category: &str, amount: Money) -> bool {
        self.date == date && self.category == category && self.amount == amount
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::MissingCategory);
        }
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionValidationError {
    MissingCategory,
    NonPositiveAmount(Money),
}

impl std::fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCategory => write!(f, "Transaction category is required"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_matches_key() {
        let txn = Transaction::new(date(2024, 1, 5), "Servicios", Money::new(dec!(40)), Utc::now());
        assert!(txn.matches_key(date(2024, 1, 5), "Servicios", Money::new(dec!(40.00))));
        assert!(!txn.matches_key(date(2024, 1, 6), "Servicios", Money::new(dec!(40))));
        assert!(!txn.matches_key(date(2024, 1, 5), "servicios", Money::new(dec!(40))));
    }

    #[test]
    fn test_validation() {
        let mut txn = Transaction::new(date(2024, 1, 5), "Servicios", Money::zero(), Utc::now());
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NonPositiveAmount(_))
        ));

        txn.amount = Money::new(dec!(1));
        txn.category = " ".into();
        assert_eq!(txn.validate(), Err(TransactionValidationError::MissingCategory));
    }

    #[test]
    fn test_counterparty_is_optional_on_disk() {
        let txn = Transaction::new(date(2024, 2, 1), "Mano de Obra", Money::new(dec!(10)), Utc::now());
        let json = serde_json::to_value(&txn).unwrap();
        assert!(json.get("counterparty").is_none());
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }
}
