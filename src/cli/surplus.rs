//! Surplus CLI commands
//!
//! Shows a closed year's surplus and applies a redistribution strategy to
//! the active year.

use std::collections::BTreeMap;

use clap::{Subcommand, ValueEnum};

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::error::{LedgerError, LedgerResult};
use crate::services::SurplusPlan;

use super::{parse_pair, parse_percentage};

/// Redistribution strategy
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Strategy {
    /// Keep the surplus as an emergency reserve
    Reserve,
    /// Spread over every budgeted cell by weight
    Proportional,
    /// Add it all to January infrastructure
    Infrastructure,
    /// Set January training and technology to it
    Training,
    /// Split by percentages (requires --split)
    Custom,
}

/// Surplus subcommands
#[derive(Subcommand)]
pub enum SurplusCommands {
    /// Show a year's surplus and what was done with it
    Show {
        /// Year (defaults to the year before the active year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Redistribute a year's surplus into the active year
    Apply {
        #[arg(value_enum)]
        strategy: Strategy,
        /// Source year (defaults to the year before the active year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Percentages for the custom strategy, as Category=pct
        #[arg(long)]
        split: Vec<String>,
    },
}

fn plan_for(strategy: Strategy, split: &[String]) -> LedgerResult<SurplusPlan> {
    Ok(match strategy {
        Strategy::Reserve => SurplusPlan::EmergencyReserve,
        Strategy::Proportional => SurplusPlan::Proportional,
        Strategy::Infrastructure => SurplusPlan::Infrastructure,
        Strategy::Training => SurplusPlan::Training,
        Strategy::Custom => {
            if split.is_empty() {
                return Err(LedgerError::Validation(
                    "custom strategy requires at least one --split Category=pct".into(),
                ));
            }
            let mut percentages = BTreeMap::new();
            for entry in split {
                let (category, pct) = parse_pair(entry)?;
                percentages.insert(category, parse_percentage(&pct)?);
            }
            SurplusPlan::Custom(percentages)
        }
    })
}

/// Handle a surplus command
pub fn handle_surplus_command(
    ctx: &mut LedgerContext,
    actor: &Actor,
    cmd: SurplusCommands,
) -> LedgerResult<()> {
    let default_year = ctx.active_year() - 1;

    match cmd {
        SurplusCommands::Show { year } => {
            let year = year.unwrap_or(default_year);
            let calc = ctx.calculator();
            println!("Surplus for {}", year);
            println!("  Budgeted:  {}", calc.year_total_budget(year));
            println!("  Spent:     {}", calc.year_total_spent(year));
            println!("  Surplus:   {}", calc.year_surplus(year));
            println!("  Remaining: {}", calc.surplus_remaining(year));
            match ctx.store().surplus_records.get(&year) {
                Some(record) => {
                    let decision = record.decision.map(|d| d.label()).unwrap_or("(draws only)");
                    println!("  Decision:  {} on {}", decision, record.recorded_at.format("%Y-%m-%d"));
                    println!("  Drawn:     {}", record.used);
                }
                None => println!("  Decision:  (none)"),
            }
        }

        SurplusCommands::Apply {
            strategy,
            year,
            split,
        } => {
            let source_year = year.unwrap_or(default_year);
            let plan = plan_for(strategy, &split)?;
            let record = ctx.reallocation().apply_surplus(actor, source_year, plan)?;
            println!(
                "Applied {} surplus of {} into {}: {}",
                source_year,
                record.amount,
                ctx.active_year(),
                record.decision.map(|d| d.label()).unwrap_or_default()
            );
        }
    }

    Ok(())
}
