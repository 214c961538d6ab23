//! Vendor CLI commands

use std::collections::BTreeMap;

use clap::Subcommand;

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::display::{format_vendor_details, format_vendor_list};
use crate::error::{LedgerError, LedgerResult};
use crate::services::VendorDraft;

/// Vendor subcommands
#[derive(Subcommand)]
pub enum VendorCommands {
    /// List all vendors
    List,

    /// Show vendor details
    Show {
        /// Vendor name
        name: String,
    },

    /// Add a vendor or replace an existing vendor's details
    Save {
        /// Vendor name
        name: String,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Served category, optionally with subcategories: "Category" or
        /// "Category=Sub1,Sub2"
        #[arg(short, long)]
        serves: Vec<String>,
    },

    /// Remove a vendor
    Remove {
        /// Vendor name
        name: String,
    },
}

fn parse_served(entries: &[String]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|entry| match entry.split_once('=') {
            Some((category, subs)) => (
                category.trim().to_string(),
                subs.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            None => (entry.trim().to_string(), Vec::new()),
        })
        .collect()
}

/// Handle a vendor command
pub fn handle_vendor_command(
    ctx: &mut LedgerContext,
    actor: &Actor,
    cmd: VendorCommands,
) -> LedgerResult<()> {
    let mut service = ctx.vendors();

    match cmd {
        VendorCommands::List => {
            print!("{}", format_vendor_list(&service.list()));
        }

        VendorCommands::Show { name } => {
            let vendor = service
                .find(&name)
                .ok_or_else(|| LedgerError::vendor_not_found(&name))?;
            print!("{}", format_vendor_details(vendor));
        }

        VendorCommands::Save {
            name,
            phone,
            address,
            notes,
            serves,
        } => {
            let draft = VendorDraft {
                name,
                phone: phone.unwrap_or_default(),
                address: address.unwrap_or_default(),
                notes: notes.unwrap_or_default(),
                categories: parse_served(&serves),
            };
            let vendor = service.upsert(actor, draft)?;
            println!("Saved vendor: {} ({})", vendor.name, vendor.id);
        }

        VendorCommands::Remove { name } => {
            let removed = service.remove(actor, &name)?;
            println!("Removed vendor: {}", removed.name);
        }
    }

    Ok(())
}
