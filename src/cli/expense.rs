//! Expense CLI commands
//!
//! Records, lists and deletes expenses. Overspending and out-of-year dates
//! are resolved with flags; without one the command reports the problem
//! and the options.

use chrono::Datelike;
use clap::{Subcommand, ValueEnum};

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Month};
use crate::services::{
    ExpenseDraft, RegistrationDecisions, RegistrationOutcome, RemediationDecision,
    TransactionFilter, YearMismatchDecision,
};

use super::{parse_cell, parse_date, parse_money, parse_month};

/// What to do when the expense date is outside the active year
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum YearChoice {
    /// Switch the active year to the expense's year
    Adopt,
    /// Keep the active year and move the date into it
    Rewrite,
    Abort,
}

/// How to cover an expense larger than its cell's available budget
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Remedy {
    /// Raise the cell budget (requires --raise-to)
    Raise,
    /// Transfer the shortfall from another cell (requires --from)
    Transfer,
    /// Draw the shortfall from last year's surplus
    Surplus,
    /// Add the shortfall to the cell with no source
    Force,
    Abort,
}

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Category name
        category: String,
        /// Amount (e.g., "250" or "250.00")
        amount: String,
        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Subcategory
        #[arg(short, long)]
        sub: Option<String>,
        /// Vendor name
        #[arg(short, long)]
        vendor: Option<String>,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
        /// Resolution when the date is outside the active year
        #[arg(long, value_enum)]
        on_year: Option<YearChoice>,
        /// Resolution when the cell budget is insufficient
        #[arg(long, value_enum)]
        remedy: Option<Remedy>,
        /// New cell budget for --remedy raise
        #[arg(long)]
        raise_to: Option<String>,
        /// Source cell for --remedy transfer, as Month/Category
        #[arg(long)]
        from: Option<String>,
    },

    /// List expenses
    List {
        /// Calendar year (defaults to the active year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Month name or number
        #[arg(short, long)]
        month: Option<String>,
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show one expense
    Show {
        /// Expense ID
        id: String,
    },

    /// Delete an expense by ID
    Delete {
        /// Expense ID
        id: String,
    },

    /// Delete the first expense matching date, category and amount
    #[command(name = "delete-match")]
    DeleteMatch {
        /// Expense date (YYYY-MM-DD)
        date: String,
        /// Category name
        category: String,
        /// Amount
        amount: String,
    },
}

fn remediation(
    remedy: Remedy,
    raise_to: Option<&str>,
    from: Option<&str>,
) -> LedgerResult<RemediationDecision> {
    Ok(match remedy {
        Remedy::Raise => {
            let to = raise_to.ok_or_else(|| {
                LedgerError::Validation("--remedy raise requires --raise-to".into())
            })?;
            RemediationDecision::RaiseBudget {
                to: parse_money(to)?,
            }
        }
        Remedy::Transfer => {
            let from = from.ok_or_else(|| {
                LedgerError::Validation("--remedy transfer requires --from Month/Category".into())
            })?;
            let cell = parse_cell(from)?;
            RemediationDecision::TransferFrom {
                month: cell.month,
                category: cell.category,
            }
        }
        Remedy::Surplus => RemediationDecision::DrawPriorSurplus,
        Remedy::Force => RemediationDecision::ForceAdd,
        Remedy::Abort => RemediationDecision::Abort,
    })
}

fn print_shortfall_help(ctx: &LedgerContext, needed: Money, available: Money) {
    let prior = ctx.active_year() - 1;
    eprintln!("Shortfall: {}", needed - available);
    eprintln!("Re-run with one of:");
    eprintln!("  --remedy raise --raise-to <amount>   raise this cell's budget");
    eprintln!("  --remedy transfer --from Month/Cat    move funds from another cell");
    eprintln!(
        "  --remedy surplus                      draw from {} surplus ({} left)",
        prior,
        ctx.calculator().surplus_remaining(prior)
    );
    eprintln!("  --remedy force                        add the shortfall with no source");
}

/// Handle an expense command
pub fn handle_expense_command(
    ctx: &mut LedgerContext,
    actor: &Actor,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    match cmd {
        ExpenseCommands::Add {
            category,
            amount,
            date,
            sub,
            vendor,
            note,
            on_year,
            remedy,
            raise_to,
            from,
        } => {
            let mut draft = ExpenseDraft::new(category, parse_money(&amount)?);
            draft.date = date.as_deref().map(parse_date).transpose()?;
            draft.subcategory = sub.unwrap_or_default();
            draft.counterparty = vendor;
            draft.note = note.unwrap_or_default();

            let decisions = RegistrationDecisions {
                on_year_mismatch: on_year.map(|choice| match choice {
                    YearChoice::Adopt => YearMismatchDecision::AdoptYear,
                    YearChoice::Rewrite => YearMismatchDecision::RewriteDate,
                    YearChoice::Abort => YearMismatchDecision::Abort,
                }),
                on_shortfall: remedy
                    .map(|r| remediation(r, raise_to.as_deref(), from.as_deref()))
                    .transpose()?,
            };

            let result = ctx.registrar().register(actor, draft, &decisions);
            match result {
                Ok(RegistrationOutcome::Recorded(txn)) => {
                    println!("Recorded expense: {}", txn.id);
                    println!("  {} {} {}", txn.date, txn.category, txn.amount);
                    let status = ctx.calculator().cell_status(
                        &txn.category,
                        Month::of(txn.date),
                        txn.date.year(),
                    );
                    println!(
                        "  Available in {}/{}: {} ({})",
                        status.month, status.category, status.available, status.band
                    );
                }
                Ok(RegistrationOutcome::Aborted) => {
                    println!("Expense not recorded.");
                }
                Err(LedgerError::InsufficientBudget {
                    cell,
                    needed,
                    available,
                }) if decisions.on_shortfall.is_none() => {
                    print_shortfall_help(ctx, needed, available);
                    return Err(LedgerError::InsufficientBudget {
                        cell,
                        needed,
                        available,
                    });
                }
                Err(LedgerError::CalendarYearMismatch {
                    transaction_year,
                    active_year,
                }) => {
                    eprintln!("Re-run with --on-year adopt, rewrite or abort.");
                    return Err(LedgerError::CalendarYearMismatch {
                        transaction_year,
                        active_year,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        ExpenseCommands::List {
            year,
            month,
            category,
        } => {
            let filter = TransactionFilter {
                year: Some(year.unwrap_or_else(|| ctx.active_year())),
                month: month.as_deref().map(parse_month).transpose()?,
                category,
            };
            let calc = ctx.calculator();
            let transactions = calc.transactions(&filter);
            print!("{}", format_transaction_register(&transactions));
            if !transactions.is_empty() {
                let total: Money = transactions.iter().map(|t| t.amount).sum();
                println!("{} expenses, {} total", transactions.len(), total);
            }
        }

        ExpenseCommands::Show { id } => {
            let matches: Vec<_> = ctx
                .store()
                .transactions
                .iter()
                .filter(|t| t.id.matches(&id))
                .collect();
            match matches.as_slice() {
                [txn] => print!("{}", format_transaction_details(txn)),
                [] => return Err(LedgerError::transaction_not_found(id)),
                _ => {
                    return Err(LedgerError::Validation(format!(
                        "'{}' matches {} expenses, use a longer id",
                        id,
                        matches.len()
                    )))
                }
            }
        }

        ExpenseCommands::Delete { id } => {
            let removed = ctx.registrar().delete_transaction(actor, &id)?;
            println!("Deleted expense: {}", removed);
        }

        ExpenseCommands::DeleteMatch {
            date,
            category,
            amount,
        } => {
            let removed = ctx.registrar().delete_matching(
                actor,
                parse_date(&date)?,
                &category,
                parse_money(&amount)?,
            )?;
            println!("Deleted expense: {}", removed);
        }
    }

    Ok(())
}
