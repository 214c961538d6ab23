//! Activity log CLI commands

use clap::Subcommand;

use crate::audit::ActivityLogger;
use crate::error::LedgerResult;

/// Activity subcommands
#[derive(Subcommand)]
pub enum ActivityCommands {
    /// Show the most recent audited actions
    Show {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only entries by this user
        #[arg(short, long)]
        actor: Option<String>,
    },
}

/// Handle an activity command
pub fn handle_activity_command(logger: &ActivityLogger, cmd: ActivityCommands) -> LedgerResult<()> {
    match cmd {
        ActivityCommands::Show { limit, actor } => {
            let entries = match &actor {
                Some(actor) => {
                    let mut matching: Vec<_> = logger
                        .read_all()?
                        .into_iter()
                        .filter(|e| &e.actor == actor)
                        .collect();
                    let skip = matching.len().saturating_sub(limit);
                    matching.drain(..skip);
                    matching
                }
                None => logger.read_recent(limit)?,
            };

            if entries.is_empty() {
                println!("No activity recorded.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}
