//! Transfer CLI command
//!
//! Moves budget between two cells of the active year.

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::error::LedgerResult;

use super::{parse_cell, parse_money};

/// Handle a transfer command
pub fn handle_transfer_command(
    ctx: &mut LedgerContext,
    actor: &Actor,
    amount: &str,
    from: &str,
    to: &str,
) -> LedgerResult<()> {
    let amount = parse_money(amount)?;
    let source = parse_cell(from)?;
    let dest = parse_cell(to)?;

    let entry = ctx.reallocation().transfer(actor, amount, source, dest)?;

    let calc = ctx.calculator();
    println!(
        "Transferred {} from {} to {} ({})",
        entry.amount, entry.source, entry.dest, entry.year
    );
    println!(
        "  {} available: {}",
        entry.source,
        calc.available(&entry.source.category, entry.source.month, entry.year)
    );
    println!(
        "  {} budgeted:  {}",
        entry.dest,
        calc.budgeted(&entry.dest.category, entry.dest.month, entry.year)
    );

    Ok(())
}
