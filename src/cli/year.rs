//! Year CLI commands
//!
//! Creating year budgets, switching the active year and the year history.

use clap::Subcommand;

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::display::format_year_history;
use crate::error::LedgerResult;

/// Year subcommands
#[derive(Subcommand)]
pub enum YearCommands {
    /// Show the active year
    Current,

    /// Create a year budget
    Create {
        /// Year to create
        year: i32,
        /// Copy the previous year's budget
        #[arg(long)]
        clone: bool,
        /// Replace the year if it already exists
        #[arg(long)]
        overwrite: bool,
    },

    /// Make another year the active year
    Switch {
        /// Year to work on
        year: i32,
    },

    /// Totals and surplus decisions for every stored year
    History,
}

/// Handle a year command
pub fn handle_year_command(
    ctx: &mut LedgerContext,
    actor: &Actor,
    cmd: YearCommands,
) -> LedgerResult<()> {
    match cmd {
        YearCommands::Current => {
            let year = ctx.active_year();
            let stored = if ctx.store().years.contains_key(&year) {
                ""
            } else {
                " (no budget stored yet)"
            };
            println!("Active year: {}{}", year, stored);
        }

        YearCommands::Create {
            year,
            clone,
            overwrite,
        } => {
            let budget = ctx.rollover().create_year(actor, year, clone, overwrite)?;
            if clone {
                println!("Created {} from {} ({} budgeted)", year, year - 1, budget.total());
            } else {
                println!("Created empty budget for {}", year);
            }
        }

        YearCommands::Switch { year } => {
            ctx.rollover().switch_active_year(actor, year)?;
            println!("Active year is now {}", year);
        }

        YearCommands::History => {
            let history = ctx.rollover().compute_year_history();
            print!("{}", format_year_history(&history));
        }
    }

    Ok(())
}
