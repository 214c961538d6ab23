//! Category taxonomy model
//!
//! The taxonomy has two layers. The predefined layer is compiled in and can
//! never change; the custom layer is user data. When both define the same
//! category name the custom entry wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in categories and their subcategories, in display order
pub const PREDEFINED_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Insumos Agrícolas",
        &["Semillas", "Fertilizantes", "Pesticidas", "Abonos", "Herbicidas"],
    ),
    (
        "Maquinaria y Equipos",
        &[
            "Tractores",
            "Cosechadoras",
            "Equipos de riego",
            "Herramientas",
            "Mantenimiento",
        ],
    ),
    (
        "Alimentación Animal",
        &[
            "Forraje",
            "Concentrados",
            "Suplementos",
            "Medicamentos veterinarios",
        ],
    ),
    (
        "Ganado y Animales",
        &["Compra de ganado", "Reproducción", "Cuidado veterinario"],
    ),
    (
        "Mano de Obra",
        &["Salarios", "Jornaleros", "Técnicos", "Prestaciones"],
    ),
    (
        "Servicios",
        &["Agua", "Electricidad", "Combustible", "Transporte"],
    ),
    (
        "Infraestructura",
        &["Construcción", "Reparaciones", "Cercas", "Establos"],
    ),
    (
        "Otros Gastos",
        &["Seguros", "Impuestos", "Asesoría", "Varios"],
    ),
];

/// Look up a predefined category's subcategories
pub fn predefined_subcategories(name: &str) -> Option<&'static [&'static str]> {
    PREDEFINED_CATEGORIES
        .iter()
        .find(|(category, _)| *category == name)
        .map(|(_, subcategories)| *subcategories)
}

/// Where a resolved category comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryOrigin {
    /// Only in the built-in layer
    Predefined,
    /// Only in the custom layer
    Custom,
    /// Built-in name overridden by a custom entry
    Mixed,
}

impl std::fmt::Display for CategoryOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryOrigin::Predefined => write!(f, "predefined"),
            CategoryOrigin::Custom => write!(f, "custom"),
            CategoryOrigin::Mixed => write!(f, "mixed"),
        }
    }
}

/// A category as seen by the rest of the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub subcategories: Vec<String>,
    pub origin: CategoryOrigin,
}

impl Category {
    pub fn has_subcategory(&self, name: &str) -> bool {
        self.subcategories.iter().any(|s| s == name)
    }
}

/// The user-managed layer of the taxonomy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomTaxonomy {
    entries: BTreeMap<String, Vec<String>>,
}

impl CustomTaxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Vec<String>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, subcategories: Vec<String>) {
        self.entries.insert(name.into(), subcategories);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries.remove(name)
    }

    /// Mutable access to a category's custom entry, cloning the predefined
    /// subcategories into the custom layer on first touch
    pub fn materialize(&mut self, name: &str) -> &mut Vec<String> {
        self.entries.entry(name.to_string()).or_insert_with(|| {
            predefined_subcategories(name)
                .map(|subs| subs.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default()
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve one category across both layers
    pub fn resolve(&self, name: &str) -> Option<Category> {
        match (predefined_subcategories(name), self.entries.get(name)) {
            (Some(_), Some(custom)) => Some(Category {
                name: name.to_string(),
                subcategories: custom.clone(),
                origin: CategoryOrigin::Mixed,
            }),
            (Some(base), None) => Some(Category {
                name: name.to_string(),
                subcategories: base.iter().map(|s| s.to_string()).collect(),
                origin: CategoryOrigin::Predefined,
            }),
            (None, Some(custom)) => Some(Category {
                name: name.to_string(),
                subcategories: custom.clone(),
                origin: CategoryOrigin::Custom,
            }),
            (None, None) => None,
        }
    }

    /// All categories: predefined names in built-in order, then custom-only
    /// names alphabetically
    pub fn resolve_all(&self) -> Vec<Category> {
        let predefined = PREDEFINED_CATEGORIES
            .iter()
            .filter_map(|(name, _)| self.resolve(name));
        let custom_only = self
            .entries
            .keys()
            .filter(|name| predefined_subcategories(name).is_none())
            .filter_map(|name| self.resolve(name));

        predefined.chain(custom_only).collect()
    }

    /// Check whether a category name exists in either layer
    pub fn exists(&self, name: &str) -> bool {
        predefined_subcategories(name).is_some() || self.entries.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_lookup() {
        let subs = predefined_subcategories("Insumos Agrícolas").unwrap();
        assert!(subs.contains(&"Semillas"));
        assert!(predefined_subcategories("insumos agrícolas").is_none());
    }

    #[test]
    fn test_resolve_all_orders_predefined_first() {
        let mut custom = CustomTaxonomy::new();
        custom.insert("Apicultura", vec!["Colmenas".into()]);
        custom.insert("Acuicultura", vec![]);

        let all = custom.resolve_all();
        assert_eq!(all.len(), PREDEFINED_CATEGORIES.len() + 2);
        assert_eq!(all[0].name, "Insumos Agrícolas");
        assert_eq!(all[all.len() - 2].name, "Acuicultura");
        assert_eq!(all[all.len() - 1].name, "Apicultura");
        assert_eq!(all[all.len() - 1].origin, CategoryOrigin::Custom);
    }

    #[test]
    fn test_custom_layer_overrides_predefined() {
        let mut custom = CustomTaxonomy::new();
        custom.materialize("Servicios").push("Internet".into());

        let resolved = custom.resolve("Servicios").unwrap();
        assert_eq!(resolved.origin, CategoryOrigin::Mixed);
        assert_eq!(resolved.subcategories.len(), 5);
        assert!(resolved.has_subcategory("Agua"));
        assert!(resolved.has_subcategory("Internet"));
        assert_eq!(predefined_subcategories("Servicios").unwrap().len(), 4);
    }
}
