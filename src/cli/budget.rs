//! Budget CLI commands
//!
//! Implements CLI commands for viewing and editing the active year's
//! monthly budgets.

use clap::Subcommand;

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::display::{format_annual_summary, format_month_overview};
use crate::error::LedgerResult;
use crate::models::{Month, MonthlyBudget};

use super::{parse_money, parse_month, parse_pair};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show one month of the active year
    Show {
        /// Month name or number (defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Set one cell (marks it as manually adjusted)
    Set {
        /// Month name or number
        month: String,
        /// Category name
        category: String,
        /// Amount (e.g., "1500" or "1500.00")
        amount: String,
    },

    /// Replace a whole month
    #[command(name = "set-month")]
    SetMonth {
        /// Month name or number
        month: String,
        /// Cells as Category=amount
        #[arg(required = true)]
        cells: Vec<String>,
    },

    /// Copy one month's budget onto another
    Copy {
        /// Source month
        from: String,
        /// Target month
        to: String,
    },

    /// Copy one month's budget onto every other month
    #[command(name = "apply-all")]
    ApplyAll {
        /// Source month
        from: String,
    },

    /// Month-by-month totals of the active year
    Summary,

    /// Cells of a month with money left over
    Leftovers {
        /// Month name or number
        month: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    ctx: &mut LedgerContext,
    actor: &Actor,
    cmd: BudgetCommands,
) -> LedgerResult<()> {
    let year = ctx.active_year();

    match cmd {
        BudgetCommands::Show { month } => {
            let month = match month {
                Some(m) => parse_month(&m)?,
                None => Month::of(ctx.clock().today()),
            };
            let cells = ctx.calculator().month_overview(month, year);
            print!("{}", format_month_overview(month, year, &cells));
        }

        BudgetCommands::Set {
            month,
            category,
            amount,
        } => {
            let month = parse_month(&month)?;
            let amount = parse_money(&amount)?;
            ctx.planner().override_cell(actor, month, &category, amount)?;
            println!("Set {}/{} {} to {}", month, category, year, amount);
        }

        BudgetCommands::SetMonth { month, cells } => {
            let month = parse_month(&month)?;
            let mut budget = MonthlyBudget::new();
            for cell in &cells {
                let (category, amount) = parse_pair(cell)?;
                budget.set(category, parse_money(&amount)?);
            }
            let total = budget.total();
            ctx.planner().set_month_budget(actor, month, budget)?;
            println!("Set budget for {} {}: {} total", month, year, total);
        }

        BudgetCommands::Copy { from, to } => {
            let from = parse_month(&from)?;
            let to = parse_month(&to)?;
            ctx.planner().copy_month(actor, from, to)?;
            println!("Copied {} budget to {}", from, to);
        }

        BudgetCommands::ApplyAll { from } => {
            let from = parse_month(&from)?;
            ctx.planner().apply_to_all_months(actor, from)?;
            println!("Applied {} budget to every month of {}", from, year);
        }

        BudgetCommands::Summary => {
            let summary = ctx.planner().annual_summary();
            print!("{}", format_annual_summary(year, &summary));
        }

        BudgetCommands::Leftovers { month } => {
            let month = parse_month(&month)?;
            let cells = ctx.calculator().month_leftovers(month, year);
            if cells.is_empty() {
                println!("No leftover funds in {} {}.", month, year);
            } else {
                for cell in cells {
                    println!("{:28} {:>12}", cell.category, cell.available.to_string());
                }
            }
        }
    }

    Ok(())
}
