//! Vendor service
//!
//! Keeps the directory of suppliers that expenses refer to by name.

use std::collections::BTreeMap;

use tracing::info;

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Vendor;
use crate::storage::DocumentKind;

/// Fields for creating or updating a vendor
#[derive(Debug, Clone, Default)]
pub struct VendorDraft {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
    pub categories: BTreeMap<String, Vec<String>>,
}

impl VendorDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Service for vendor management
pub struct VendorService<'a> {
    ctx: &'a mut LedgerContext,
}

impl<'a> VendorService<'a> {
    pub fn new(ctx: &'a mut LedgerContext) -> Self {
        Self { ctx }
    }

    /// Vendors sorted by name
    pub fn list(&self) -> Vec<Vendor> {
        let mut vendors = self.ctx.store().vendors.clone();
        vendors.sort_by_key(|v| v.name.to_lowercase());
        vendors
    }

    /// Find a vendor by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&Vendor> {
        self.ctx.store().vendors.iter().find(|v| v.is_named(name))
    }

    /// Vendors serving a category
    pub fn serving(&self, category: &str) -> Vec<&Vendor> {
        self.ctx
            .store()
            .vendors
            .iter()
            .filter(|v| v.serves(category))
            .collect()
    }

    /// Create a vendor, or replace the details of the one with that name.
    ///
    /// An existing vendor keeps its id and original registration date.
    pub fn upsert(&mut self, actor: &Actor, draft: VendorDraft) -> LedgerResult<Vendor> {
        self.ctx.require_mutation(actor, "save vendor")?;

        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::Validation("Vendor name cannot be empty".into()));
        }
        for category in draft.categories.keys() {
            if !self.ctx.store().custom_taxonomy.exists(category) {
                return Err(LedgerError::category_not_found(category.as_str()));
            }
        }

        let today = self.ctx.clock().today();
        let vendors = &mut self.ctx.store_mut().vendors;
        let (vendor, created) = match vendors.iter().position(|v| v.is_named(&name)) {
            Some(index) => (&mut vendors[index], false),
            None => {
                vendors.push(Vendor::new(name.as_str(), today));
                let last = vendors.len() - 1;
                (&mut vendors[last], true)
            }
        };

        vendor.name = name;
        vendor.phone = draft.phone.trim().to_string();
        vendor.address = draft.address.trim().to_string();
        vendor.notes = draft.notes;
        vendor.categories = draft.categories;
        let saved = vendor.clone();

        self.ctx.persist(&[DocumentKind::Vendors])?;
        let action = if created { "add vendor" } else { "update vendor" };
        self.ctx.audit(actor, action, &saved.name)?;
        info!(vendor = %saved.name, created, "vendor saved");

        Ok(saved)
    }

    pub fn remove(&mut self, actor: &Actor, name: &str) -> LedgerResult<Vendor> {
        self.ctx.require_mutation(actor, "remove vendor")?;

        let vendors = &mut self.ctx.store_mut().vendors;
        let index = vendors
            .iter()
            .position(|v| v.is_named(name))
            .ok_or_else(|| LedgerError::vendor_not_found(name))?;
        let removed = vendors.remove(index);

        self.ctx.persist(&[DocumentKind::Vendors])?;
        self.ctx.audit(actor, "remove vendor", &removed.name)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Role;
    use crate::test_utils::{actor, admin, date, ledger_on};

    fn draft(name: &str, categories: &[&str]) -> VendorDraft {
        VendorDraft {
            name: name.into(),
            phone: "555-0101".into(),
            categories: categories
                .iter()
                .map(|c| (c.to_string(), Vec::new()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let mut ledger = ledger_on(date(2025, 4, 2));
        let created = ledger
            .ctx
            .vendors()
            .upsert(&admin(), draft("AgroSur", &["Insumos Agrícolas"]))
            .unwrap();
        assert_eq!(created.registered_on, date(2025, 4, 2));

        let mut later = ledger.reopen(date(2025, 9, 9));
        let mut update = draft("agrosur", &["Servicios"]);
        update.phone = "555-0199".into();
        let updated = later.vendors().upsert(&admin(), update).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.registered_on, date(2025, 4, 2));
        assert_eq!(updated.phone, "555-0199");
        assert!(updated.serves("Servicios"));
        assert!(!updated.serves("Insumos Agrícolas"));
        assert_eq!(later.store().vendors.len(), 1);
    }

    #[test]
    fn test_upsert_validates() {
        let mut ledger = ledger_on(date(2025, 4, 2));
        let mut vendors = ledger.ctx.vendors();

        assert!(vendors.upsert(&admin(), draft("  ", &[])).unwrap_err().is_validation());
        assert!(vendors.upsert(&admin(), draft("X", &["Pesca"])).unwrap_err().is_not_found());
        assert!(vendors
            .upsert(&actor(Role::Viewer), draft("X", &[]))
            .unwrap_err()
            .is_forbidden());
    }

    #[test]
    fn test_list_find_remove() {
        let mut ledger = ledger_on(date(2025, 4, 2));
        let mut vendors = ledger.ctx.vendors();
        vendors.upsert(&admin(), draft("Riegos Norte", &["Servicios"])).unwrap();
        vendors.upsert(&admin(), draft("AgroSur", &[])).unwrap();

        let names: Vec<_> = vendors.list().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["AgroSur", "Riegos Norte"]);
        assert!(vendors.find("RIEGOS NORTE").is_some());
        assert_eq!(vendors.serving("Servicios").len(), 1);

        vendors.remove(&admin(), "agrosur").unwrap();
        assert!(vendors.find("AgroSur").is_none());
        assert!(vendors.remove(&admin(), "agrosur").unwrap_err().is_not_found());
    }
}
