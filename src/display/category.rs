//! Category display formatting

use crate::models::{Category, CategoryOrigin};

/// Format the resolved taxonomy as an indented tree
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories defined.\n".to_string();
    }

    let mut output = String::new();
    for category in categories {
        let tag = match category.origin {
            CategoryOrigin::Predefined => "",
            CategoryOrigin::Custom => " [custom]",
            CategoryOrigin::Mixed => " [customized]",
        };
        output.push_str(&format!("{}{}\n", category.name, tag));

        if category.subcategories.is_empty() {
            output.push_str("  (no subcategories)\n");
        }
        for sub in &category.subcategories {
            output.push_str(&format!("  - {}\n", sub));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomTaxonomy;

    #[test]
    fn test_tree_tags_custom_entries() {
        let mut taxonomy = CustomTaxonomy::new();
        taxonomy.insert("Apicultura", Vec::new());
        let output = format_category_tree(&taxonomy.resolve_all());

        assert!(output.starts_with("Insumos Agrícolas\n  - Semillas\n"));
        assert!(output.contains("Apicultura [custom]\n  (no subcategories)\n"));
    }
}
