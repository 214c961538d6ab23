//! Vendor directory entries
//!
//! Vendors are referenced by name from transactions. Names are unique
//! ignoring case.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::VendorId;

/// A supplier or service provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,

    /// Categories the vendor serves, with the subcategories within each
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,

    pub registered_on: NaiveDate,
}

impl Vendor {
    pub fn new(name: impl Into<String>, registered_on: NaiveDate) -> Self {
        Self {
            id: VendorId::new(),
            name: name.into(),
            phone: String::new(),
            address: String::new(),
            notes: String::new(),
            categories: BTreeMap::new(),
            registered_on,
        }
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    /// Check whether the vendor serves a category
    pub fn serves(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_named_ignores_case() {
        let vendor = Vendor::new("AgroSur", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(vendor.is_named("agrosur"));
        assert!(vendor.is_named(" AGROSUR "));
        assert!(!vendor.is_named("Agro"));
    }
}
