//! Category CLI commands
//!
//! Implements CLI commands for the category taxonomy.

use clap::Subcommand;

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::display::format_category_tree;
use crate::error::LedgerResult;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories with their subcategories
    List,

    /// Add a custom category
    Add {
        /// Category name
        name: String,
    },

    /// Add a subcategory to a category
    #[command(name = "add-sub")]
    AddSub {
        /// Category name
        category: String,
        /// Subcategory name
        name: String,
    },

    /// Remove a custom category, or the customizations of a predefined one
    Remove {
        /// Category name
        name: String,
    },

    /// Remove a subcategory
    #[command(name = "remove-sub")]
    RemoveSub {
        /// Category name
        category: String,
        /// Subcategory name
        name: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    ctx: &mut LedgerContext,
    actor: &Actor,
    cmd: CategoryCommands,
) -> LedgerResult<()> {
    let mut service = ctx.taxonomy();

    match cmd {
        CategoryCommands::List => {
            print!("{}", format_category_tree(&service.resolve_all_categories()));
        }

        CategoryCommands::Add { name } => {
            let category = service.add_category(actor, &name)?;
            println!("Added category: {}", category.name);
        }

        CategoryCommands::AddSub { category, name } => {
            let updated = service.add_subcategory(actor, &category, &name)?;
            println!("Added subcategory '{}' to {}", name.trim(), updated.name);
        }

        CategoryCommands::Remove { name } => {
            service.remove_category(actor, &name)?;
            println!("Removed category: {}", name);
        }

        CategoryCommands::RemoveSub { category, name } => {
            let updated = service.remove_subcategory(actor, &category, &name)?;
            println!("Removed subcategory '{}' from {}", name, updated.name);
        }
    }

    Ok(())
}
