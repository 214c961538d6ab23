//! Year-end surplus records
//!
//! One record per source year, written whenever a redistribution strategy is
//! applied. The strategy labels are part of the persisted format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// What was done with a year's surplus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurplusDecision {
    #[serde(rename = "Fondo de Emergencias")]
    EmergencyReserve,
    #[serde(rename = "Distribuido en Presupuesto")]
    Proportional,
    #[serde(rename = "Inversión en Infraestructura")]
    Infrastructure,
    #[serde(rename = "Capacitación y Tecnología")]
    Training,
    #[serde(rename = "Distribución Personalizada")]
    Custom,
}

impl SurplusDecision {
    pub fn label(self) -> &'static str {
        match self {
            SurplusDecision::EmergencyReserve => "Fondo de Emergencias",
            SurplusDecision::Proportional => "Distribuido en Presupuesto",
            SurplusDecision::Infrastructure => "Inversión en Infraestructura",
            SurplusDecision::Training => "Capacitación y Tecnología",
            SurplusDecision::Custom => "Distribución Personalizada",
        }
    }
}

impl fmt::Display for SurplusDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Surplus carried over from one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurplusRecord {
    /// Surplus amount at the time the record was written
    pub amount: Money,

    /// Strategy applied, absent when the record only tracks draws
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<SurplusDecision>,

    /// Portion already drawn to cover shortfalls
    #[serde(default)]
    pub used: Money,

    pub recorded_at: DateTime<Utc>,
}

impl SurplusRecord {
    pub fn new(amount: Money, decision: Option<SurplusDecision>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            amount,
            decision,
            used: Money::zero(),
            recorded_at,
        }
    }

    /// Amount still available for draws
    pub fn remaining(&self) -> Money {
        self.amount - self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decision_labels_are_persisted() {
        let json = serde_json::to_string(&SurplusDecision::Infrastructure).unwrap();
        assert_eq!(json, "\"Inversión en Infraestructura\"");
        let back: SurplusDecision = serde_json::from_str("\"Fondo de Emergencias\"").unwrap();
        assert_eq!(back, SurplusDecision::EmergencyReserve);
    }

    #[test]
    fn test_remaining() {
        let mut record = SurplusRecord::new(Money::new(dec!(500)), None, Utc::now());
        record.used = Money::new(dec!(120));
        assert_eq!(record.remaining(), Money::new(dec!(380)));
    }
}
