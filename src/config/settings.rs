//! User settings for the farm ledger
//!
//! Holds the knobs of the reallocation strategies and the CLI session
//! defaults. Every field has a serde default so older files keep loading.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::audit::Role;
use crate::error::LedgerError;
use crate::storage::file_io::write_json_atomic;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Allowed distance from 100 when custom percentages are summed
    #[serde(default = "default_surplus_tolerance")]
    pub surplus_tolerance: Decimal,

    /// Category receiving the infrastructure surplus strategy
    #[serde(default = "default_infrastructure_category")]
    pub infrastructure_category: String,

    /// Category overwritten by the training/technology surplus strategy
    #[serde(default = "default_training_category")]
    pub training_category: String,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for output (strftime)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Actor used by the CLI when no --user is given
    #[serde(default = "default_actor")]
    pub default_actor: String,

    #[serde(default)]
    pub default_role: Role,
}

fn default_schema_version() -> u32 {
    1
}

fn default_surplus_tolerance() -> Decimal {
    dec!(0.01)
}

fn default_infrastructure_category() -> String {
    "Infraestructura".to_string()
}

fn default_training_category() -> String {
    "Capacitación y Tecnología".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_actor() -> String {
    "admin".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            surplus_tolerance: default_surplus_tolerance(),
            infrastructure_category: default_infrastructure_category(),
            training_category: default_training_category(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_actor: default_actor(),
            default_role: Role::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.surplus_tolerance, dec!(0.01));
        assert_eq!(settings.infrastructure_category, "Infraestructura");
        assert_eq!(settings.training_category, "Capacitación y Tecnología");
        assert_eq!(settings.default_role, Role::Administrator);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.surplus_tolerance = dec!(0.5);
        settings.default_role = Role::Viewer;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.surplus_tolerance, dec!(0.5));
        assert_eq!(loaded.default_role, Role::Viewer);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.surplus_tolerance, dec!(0.01));
    }
}
