//! Taxonomy service
//!
//! Category and subcategory management over the two-layer taxonomy.
//! Predefined entries are never edited in place: touching one copies it
//! into the custom layer first.

use tracing::info;

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::error::{LedgerError, LedgerResult};
use crate::models::category::predefined_subcategories;
use crate::models::Category;
use crate::storage::DocumentKind;

/// Service for category management
pub struct TaxonomyService<'a> {
    ctx: &'a mut LedgerContext,
}

fn clean_name(kind: &str, name: &str) -> LedgerResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation(format!("{} name cannot be empty", kind)));
    }
    Ok(name.to_string())
}

impl<'a> TaxonomyService<'a> {
    pub fn new(ctx: &'a mut LedgerContext) -> Self {
        Self { ctx }
    }

    /// Predefined categories in built-in order, then custom ones by name
    pub fn resolve_all_categories(&self) -> Vec<Category> {
        self.ctx.store().custom_taxonomy.resolve_all()
    }

    pub fn get(&self, name: &str) -> LedgerResult<Category> {
        self.ctx
            .store()
            .custom_taxonomy
            .resolve(name)
            .ok_or_else(|| LedgerError::category_not_found(name))
    }

    /// Add a custom category with no subcategories
    pub fn add_category(&mut self, actor: &Actor, name: &str) -> LedgerResult<Category> {
        self.ctx.require_mutation(actor, "add category")?;
        let name = clean_name("Category", name)?;

        if self.ctx.store().custom_taxonomy.exists(&name) {
            return Err(LedgerError::DuplicateEntity {
                entity_type: "Category",
                identifier: name,
            });
        }

        self.ctx
            .store_mut()
            .custom_taxonomy
            .insert(name.clone(), Vec::new());
        self.ctx.persist(&[DocumentKind::CustomTaxonomy])?;
        self.ctx.audit(actor, "add category", &name)?;
        info!(category = %name, "category added");

        self.get(&name)
    }

    /// Add a subcategory, materializing a custom clone of a predefined entry
    pub fn add_subcategory(
        &mut self,
        actor: &Actor,
        category: &str,
        name: &str,
    ) -> LedgerResult<Category> {
        self.ctx.require_mutation(actor, "add subcategory")?;
        let name = clean_name("Subcategory", name)?;
        let existing = self.get(category)?;

        if existing.has_subcategory(&name) {
            return Err(LedgerError::DuplicateEntity {
                entity_type: "Subcategory",
                identifier: format!("{}/{}", category, name),
            });
        }

        self.ctx
            .store_mut()
            .custom_taxonomy
            .materialize(category)
            .push(name.clone());
        self.ctx.persist(&[DocumentKind::CustomTaxonomy])?;
        self.ctx
            .audit(actor, "add subcategory", &format!("{}/{}", category, name))?;

        self.get(category)
    }

    /// Remove a category's custom entry.
    ///
    /// A predefined category without a custom entry is protected; with one,
    /// only the custom layer goes and the built-in definition reappears.
    pub fn remove_category(&mut self, actor: &Actor, name: &str) -> LedgerResult<()> {
        self.ctx.require_mutation(actor, "remove category")?;

        let taxonomy = &self.ctx.store().custom_taxonomy;
        if !taxonomy.contains(name) {
            if predefined_subcategories(name).is_some() {
                return Err(LedgerError::ProtectedEntity {
                    entity_type: "Category",
                    identifier: name.to_string(),
                });
            }
            return Err(LedgerError::category_not_found(name));
        }

        self.ctx.store_mut().custom_taxonomy.remove(name);
        self.ctx.persist(&[DocumentKind::CustomTaxonomy])?;
        self.ctx.audit(actor, "remove category", name)?;
        info!(category = %name, "category removed");

        Ok(())
    }

    pub fn remove_subcategory(
        &mut self,
        actor: &Actor,
        category: &str,
        name: &str,
    ) -> LedgerResult<Category> {
        self.ctx.require_mutation(actor, "remove subcategory")?;
        let existing = self.get(category)?;
        if !existing.has_subcategory(name) {
            return Err(LedgerError::subcategory_not_found(format!("{}/{}", category, name)));
        }

        self.ctx
            .store_mut()
            .custom_taxonomy
            .materialize(category)
            .retain(|s| s != name);
        self.ctx.persist(&[DocumentKind::CustomTaxonomy])?;
        self.ctx
            .audit(actor, "remove subcategory", &format!("{}/{}", category, name))?;

        self.get(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Role;
    use crate::models::CategoryOrigin;
    use crate::test_utils::{actor, admin, date, ledger_on};

    #[test]
    fn test_resolve_all_lists_predefined_first() {
        let mut ledger = ledger_on(date(2025, 1, 1));
        ledger.ctx.taxonomy().add_category(&admin(), "Apicultura").unwrap();

        let all = ledger.ctx.taxonomy().resolve_all_categories();
        assert_eq!(all.len(), 9);
        assert_eq!(all[0].name, "Insumos Agrícolas");
        assert_eq!(all[8].name, "Apicultura");
        assert_eq!(all[8].origin, CategoryOrigin::Custom);
    }

    #[test]
    fn test_add_duplicate_category_fails() {
        let mut ledger = ledger_on(date(2025, 1, 1));
        let mut taxonomy = ledger.ctx.taxonomy();

        let err = taxonomy.add_category(&admin(), "Servicios").unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateEntity { .. }));

        taxonomy.add_category(&admin(), "Apicultura").unwrap();
        let err = taxonomy.add_category(&admin(), " Apicultura ").unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateEntity { .. }));

        // Names are case-sensitive keys
        assert!(taxonomy.add_category(&admin(), "apicultura").is_ok());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut ledger = ledger_on(date(2025, 1, 1));
        let err = ledger.ctx.taxonomy().add_category(&admin(), "   ").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_predefined_category_is_protected_until_overridden() {
        let mut ledger = ledger_on(date(2025, 1, 1));
        let mut taxonomy = ledger.ctx.taxonomy();

        let err = taxonomy.remove_category(&admin(), "Servicios").unwrap_err();
        assert!(matches!(err, LedgerError::ProtectedEntity { .. }));

        let mixed = taxonomy
            .add_subcategory(&admin(), "Servicios", "Internet")
            .unwrap();
        assert_eq!(mixed.origin, CategoryOrigin::Mixed);
        assert_eq!(mixed.subcategories.len(), 5);
        assert!(mixed.has_subcategory("Agua"));

        taxonomy.remove_category(&admin(), "Servicios").unwrap();

        let restored = taxonomy.get("Servicios").unwrap();
        assert_eq!(restored.origin, CategoryOrigin::Predefined);
        assert_eq!(restored.subcategories, vec!["Agua", "Electricidad", "Combustible", "Transporte"]);
    }

    #[test]
    fn test_remove_predefined_subcategory_leaves_builtin_untouched() {
        let mut ledger = ledger_on(date(2025, 1, 1));
        let mut taxonomy = ledger.ctx.taxonomy();

        let category = taxonomy
            .remove_subcategory(&admin(), "Otros Gastos", "Varios")
            .unwrap();
        assert!(!category.has_subcategory("Varios"));
        assert!(predefined_subcategories("Otros Gastos").unwrap().contains(&"Varios"));

        let err = taxonomy
            .remove_subcategory(&admin(), "Otros Gastos", "Varios")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_unknown_category_is_not_found() {
        let mut ledger = ledger_on(date(2025, 1, 1));
        let err = ledger.ctx.taxonomy().remove_category(&admin(), "Pesca").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_viewer_cannot_edit_taxonomy() {
        let mut ledger = ledger_on(date(2025, 1, 1));
        let err = ledger
            .ctx
            .taxonomy()
            .add_category(&actor(Role::Viewer), "Apicultura")
            .unwrap_err();
        assert!(err.is_forbidden());
        assert!(ledger.audited_actions().is_empty());
    }

    #[test]
    fn test_custom_layer_is_persisted_and_audited() {
        let mut ledger = ledger_on(date(2025, 1, 1));
        ledger.ctx.taxonomy().add_category(&admin(), "Apicultura").unwrap();
        ledger
            .ctx
            .taxonomy()
            .add_subcategory(&admin(), "Apicultura", "Colmenas")
            .unwrap();

        let mut reopened = ledger.reopen(date(2025, 1, 1));
        let category = reopened.taxonomy().get("Apicultura").unwrap();
        assert_eq!(category.subcategories, vec!["Colmenas"]);
        assert_eq!(ledger.audited_actions(), vec!["add category", "add subcategory"]);
    }
}
