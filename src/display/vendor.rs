//! Vendor display formatting

use crate::models::Vendor;

use super::truncate;

pub fn format_vendor_list(vendors: &[Vendor]) -> String {
    if vendors.is_empty() {
        return "No vendors registered.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:28} {:16} {}\n",
        "ID", "Name", "Phone", "Categories"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for vendor in vendors {
        let categories: Vec<&str> = vendor.categories.keys().map(String::as_str).collect();
        output.push_str(&format!(
            "{:12} {:28} {:16} {}\n",
            vendor.id.to_string(),
            truncate(&vendor.name, 28),
            truncate(&vendor.phone, 16),
            categories.join(", ")
        ));
    }

    output
}

pub fn format_vendor_details(vendor: &Vendor) -> String {
    let mut output = String::new();
    output.push_str(&format!("Vendor:     {}\n", vendor.name));
    output.push_str(&format!("ID:         {}\n", vendor.id));
    output.push_str(&format!("Registered: {}\n", vendor.registered_on));

    if !vendor.phone.is_empty() {
        output.push_str(&format!("Phone:      {}\n", vendor.phone));
    }
    if !vendor.address.is_empty() {
        output.push_str(&format!("Address:    {}\n", vendor.address));
    }
    if !vendor.notes.is_empty() {
        output.push_str(&format!("Notes:      {}\n", vendor.notes));
    }
    for (category, subs) in &vendor.categories {
        if subs.is_empty() {
            output.push_str(&format!("Serves:     {}\n", category));
        } else {
            output.push_str(&format!("Serves:     {} ({})\n", category, subs.join(", ")));
        }
    }

    output
}
