//! Versioned persisted documents
//!
//! Every document carries a `schema_version`. Decoding follows these rules:
//! - absent document: empty default
//! - version newer than this build understands: rejected
//! - no version at all: treated as a pre-versioning layout and migrated
//! - anything else that doesn't fit the shape: logged and replaced by the default

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    CustomTaxonomy, ModifiedFlags, Money, SurplusDecision, SurplusRecord, Transaction,
    TransactionId, TransferLogEntry, Vendor, VendorId, YearBudget,
};

use super::DocumentKind;

/// Highest schema version this build reads and the one it writes
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

fn current_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// Context handed to legacy migrations
#[derive(Debug, Clone, Copy)]
pub struct MigrationContext {
    pub now: DateTime<Utc>,
}

/// A typed document stored under one `DocumentKind`
pub trait Document: Serialize + DeserializeOwned + Default {
    const KIND: DocumentKind;

    /// Convert a pre-versioning layout, `None` if the value isn't one
    fn migrate_legacy(value: Value, ctx: MigrationContext) -> Option<Self>;
}

/// Decode a loaded value into a typed document
pub fn decode<D: Document>(value: Option<Value>, ctx: MigrationContext) -> LedgerResult<D> {
    let Some(value) = value else {
        return Ok(D::default());
    };

    match value.get("schema_version").map(Value::as_u64) {
        Some(Some(version)) if version > u64::from(CURRENT_SCHEMA_VERSION) => {
            Err(LedgerError::Storage(format!(
                "{} document has schema version {}, this build supports up to {}",
                D::KIND,
                version,
                CURRENT_SCHEMA_VERSION
            )))
        }
        Some(_) => match serde_json::from_value::<D>(value) {
            Ok(document) => Ok(document),
            Err(e) => {
                warn!(kind = %D::KIND, error = %e, "document does not match its schema, using empty default");
                Ok(D::default())
            }
        },
        None => match D::migrate_legacy(value, ctx) {
            Some(document) => {
                info!(kind = %D::KIND, "migrated legacy document");
                Ok(document)
            }
            None => {
                warn!(kind = %D::KIND, "unrecognized document layout, using empty default");
                Ok(D::default())
            }
        },
    }
}

/// Encode a typed document for the persistence collaborator
pub fn encode<D: Document>(document: &D) -> LedgerResult<Value> {
    Ok(serde_json::to_value(document)?)
}

fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// === Transactions ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsDocument {
    #[serde(default = "current_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Default for TransactionsDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct LegacyTransaction {
    fecha: String,
    categoria: String,
    #[serde(default)]
    subcategoria: String,
    monto: Money,
    #[serde(default)]
    proveedor: String,
    #[serde(default)]
    descripcion: String,
}

impl Document for TransactionsDocument {
    const KIND: DocumentKind = DocumentKind::Transactions;

    fn migrate_legacy(value: Value, ctx: MigrationContext) -> Option<Self> {
        let legacy: Vec<LegacyTransaction> = serde_json::from_value(value).ok()?;
        let transactions = legacy
            .into_iter()
            .map(|t| {
                Some(Transaction {
                    id: TransactionId::new(),
                    date: parse_legacy_date(&t.fecha)?,
                    category: t.categoria,
                    subcategory: t.subcategoria,
                    amount: t.monto,
                    counterparty: non_empty(t.proveedor),
                    note: t.descripcion,
                    created_at: ctx.now,
                })
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions,
        })
    }
}

// === Monthly budgets (working state) ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBudgetsDocument {
    #[serde(default = "current_version")]
    pub schema_version: u32,

    /// Working year at the time of the last save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_year: Option<i32>,

    /// Manual-override markers per year
    #[serde(default)]
    pub modified: BTreeMap<i32, ModifiedFlags>,

    /// Amounts and markers from a legacy file that belong to whatever year
    /// ends up active; never written back
    #[serde(skip)]
    pub unassigned: Option<(YearBudget, ModifiedFlags)>,
}

impl Default for MonthlyBudgetsDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            active_year: None,
            modified: BTreeMap::new(),
            unassigned: None,
        }
    }
}

#[derive(Deserialize)]
struct LegacyMonthlyBudgets {
    #[serde(default)]
    presupuesto: YearBudget,
    #[serde(default)]
    modificado: ModifiedFlags,
}

impl Document for MonthlyBudgetsDocument {
    const KIND: DocumentKind = DocumentKind::MonthlyBudgets;

    fn migrate_legacy(value: Value, _ctx: MigrationContext) -> Option<Self> {
        let object = value.as_object()?;
        if !object.contains_key("presupuesto") && !object.contains_key("modificado") {
            return None;
        }
        let legacy: LegacyMonthlyBudgets = serde_json::from_value(value).ok()?;

        Some(Self {
            unassigned: Some((legacy.presupuesto, legacy.modificado)),
            ..Self::default()
        })
    }
}

// === Vendors ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorsDocument {
    #[serde(default = "current_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
}

impl Default for VendorsDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            vendors: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct LegacyVendor {
    nombre: String,
    #[serde(default)]
    telefono: String,
    #[serde(default)]
    direccion: String,
    #[serde(default)]
    notas: String,
    #[serde(default)]
    categorias: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    fecha_registro: String,
}

impl Document for VendorsDocument {
    const KIND: DocumentKind = DocumentKind::Vendors;

    fn migrate_legacy(value: Value, ctx: MigrationContext) -> Option<Self> {
        // Keyed by a numeric string id; the key order is the insertion order
        let legacy: BTreeMap<String, LegacyVendor> = serde_json::from_value(value).ok()?;
        let mut entries: Vec<(String, LegacyVendor)> = legacy.into_iter().collect();
        entries.sort_by_key(|(key, _)| key.parse::<u64>().unwrap_or(u64::MAX));

        let vendors = entries
            .into_iter()
            .map(|(_, v)| Vendor {
                id: VendorId::new(),
                name: v.nombre,
                phone: v.telefono,
                address: v.direccion,
                notes: v.notas,
                categories: v.categorias,
                registered_on: parse_legacy_date(&v.fecha_registro)
                    .unwrap_or_else(|| ctx.now.date_naive()),
            })
            .collect();

        Some(Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            vendors,
        })
    }
}

// === Year budgets ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearBudgetsDocument {
    #[serde(default = "current_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub years: BTreeMap<i32, YearBudget>,
}

impl Default for YearBudgetsDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            years: BTreeMap::new(),
        }
    }
}

impl Document for YearBudgetsDocument {
    const KIND: DocumentKind = DocumentKind::YearBudgets;

    fn migrate_legacy(value: Value, _ctx: MigrationContext) -> Option<Self> {
        let years: BTreeMap<i32, YearBudget> = serde_json::from_value(value).ok()?;
        Some(Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            years,
        })
    }
}

// === Surplus records ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurplusRecordsDocument {
    #[serde(default = "current_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub records: BTreeMap<i32, SurplusRecord>,
}

impl Default for SurplusRecordsDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            records: BTreeMap::new(),
        }
    }
}

#[derive(Deserialize)]
struct LegacySurplusRecord {
    #[serde(default)]
    monto: Money,
    #[serde(default)]
    decision: Option<SurplusDecision>,
    #[serde(default)]
    fecha: Option<String>,
    #[serde(default)]
    usado: Money,
}

impl Document for SurplusRecordsDocument {
    const KIND: DocumentKind = DocumentKind::SurplusRecords;

    fn migrate_legacy(value: Value, ctx: MigrationContext) -> Option<Self> {
        let legacy: BTreeMap<i32, LegacySurplusRecord> = serde_json::from_value(value).ok()?;
        let records = legacy
            .into_iter()
            .map(|(year, r)| {
                let recorded_at = r
                    .fecha
                    .as_deref()
                    .and_then(parse_legacy_date)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
                    .unwrap_or(ctx.now);
                let record = SurplusRecord {
                    amount: r.monto,
                    decision: r.decision,
                    used: r.usado,
                    recorded_at,
                };
                (year, record)
            })
            .collect();

        Some(Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            records,
        })
    }
}

// === Custom taxonomy ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomTaxonomyDocument {
    #[serde(default = "current_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub categories: CustomTaxonomy,
}

impl Default for CustomTaxonomyDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            categories: CustomTaxonomy::default(),
        }
    }
}

impl Document for CustomTaxonomyDocument {
    const KIND: DocumentKind = DocumentKind::CustomTaxonomy;

    fn migrate_legacy(value: Value, _ctx: MigrationContext) -> Option<Self> {
        let categories: CustomTaxonomy = serde_json::from_value(value).ok()?;
        Some(Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            categories,
        })
    }
}

// === Transfer log ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferLogDocument {
    #[serde(default = "current_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub entries: Vec<TransferLogEntry>,
}

impl Default for TransferLogDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            entries: Vec::new(),
        }
    }
}

impl Document for TransferLogDocument {
    const KIND: DocumentKind = DocumentKind::TransferLog;

    // The transfer log did not exist before versioning
    fn migrate_legacy(_value: Value, _ctx: MigrationContext) -> Option<Self> {
        None
    }
}
