//! Display formatting for terminal output
//!
//! Plain-text tables for the CLI. Formatting only; every figure comes from
//! the services.

pub mod budget;
pub mod category;
pub mod transaction;
pub mod vendor;

pub use budget::{format_annual_summary, format_month_overview, format_year_history};
pub use category::format_category_tree;
pub use transaction::{format_transaction_details, format_transaction_register};
pub use vendor::{format_vendor_details, format_vendor_list};

/// Cut a string to `max` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
