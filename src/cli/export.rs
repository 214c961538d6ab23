//! CLI commands for data export
//!
//! Writes CSV exports to a file, or to stdout when no file is given.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::context::LedgerContext;
use crate::error::LedgerResult;
use crate::export::{export_budget_csv, export_transactions_csv, export_year_history_csv};

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export expenses to CSV
    Transactions {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only expenses dated in this year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Export a year's budget cells with spend and usage
    Budget {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Year (defaults to the active year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Export the year history
    History {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_output(output: &Option<PathBuf>) -> LedgerResult<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

fn report(rows: usize, what: &str, output: &Option<PathBuf>) {
    if let Some(path) = output {
        println!("Exported {} {} to {}", rows, what, path.display());
    }
}

/// Handle export commands
pub fn handle_export_command(ctx: &mut LedgerContext, cmd: ExportCommands) -> LedgerResult<()> {
    match cmd {
        ExportCommands::Transactions { output, year } => {
            let rows = export_transactions_csv(ctx.store(), open_output(&output)?, year)?;
            report(rows, "expenses", &output);
        }

        ExportCommands::Budget { output, year } => {
            let year = year.unwrap_or_else(|| ctx.active_year());
            let rows = export_budget_csv(ctx.store(), open_output(&output)?, year)?;
            report(rows, "budget cells", &output);
        }

        ExportCommands::History { output } => {
            let history = ctx.rollover().compute_year_history();
            let rows = export_year_history_csv(&history, open_output(&output)?)?;
            report(rows, "years", &output);
        }
    }

    Ok(())
}
