//! Transaction registrar
//!
//! Validates and records expenses. A registration that would overspend its
//! cell, or that is dated outside the active year, stops at a decision
//! point; the caller resolves it by passing a decision and retrying.
//! Each resolved step is persisted on its own, so a retry after a later
//! failure never repeats it.

use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CellRef, Money, Month, SurplusRecord, Transaction};
use crate::services::ReallocationEngine;
use crate::storage::DocumentKind;

/// Input for a new expense
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    /// Defaults to the clock's today
    pub date: Option<NaiveDate>,
    pub category: String,
    pub subcategory: String,
    pub amount: Money,
    pub counterparty: Option<String>,
    pub note: String,
}

impl ExpenseDraft {
    pub fn new(category: impl Into<String>, amount: Money) -> Self {
        Self {
            category: category.into(),
            amount,
            ..Default::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Parse user-entered amount text
    pub fn parse_amount(input: &str) -> LedgerResult<Money> {
        Money::parse(input).map_err(|e| LedgerError::InvalidAmount(e.to_string()))
    }
}

/// Resolution when the expense date is outside the active year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearMismatchDecision {
    /// Make the expense's year the active year
    AdoptYear,
    /// Move the date to the same day in the active year
    RewriteDate,
    Abort,
}

/// Resolution when the expense exceeds what its cell has available
#[derive(Debug, Clone, PartialEq)]
pub enum RemediationDecision {
    /// Set the cell's budget to `to`, which must cover spent plus the expense
    RaiseBudget { to: Money },
    /// Move the shortfall in from another cell of the active year
    TransferFrom { month: Month, category: String },
    /// Cover the shortfall from the previous year's unused surplus
    DrawPriorSurplus,
    /// Add the shortfall to the cell with no source
    ForceAdd,
    Abort,
}

/// Decisions the caller has already made for a registration
#[derive(Debug, Clone, Default)]
pub struct RegistrationDecisions {
    pub on_year_mismatch: Option<YearMismatchDecision>,
    pub on_shortfall: Option<RemediationDecision>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    Recorded(Transaction),
    Aborted,
}

/// Same month and day in `year`, or the first of the month when that day
/// does not exist (29 February)
pub fn rewrite_into_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 1))
}

/// Service for recording and deleting expenses
pub struct TransactionRegistrar<'a> {
    ctx: &'a mut LedgerContext,
}

impl<'a> TransactionRegistrar<'a> {
    pub fn new(ctx: &'a mut LedgerContext) -> Self {
        Self { ctx }
    }

    /// Unused surplus of the year before the active year
    pub fn prior_year_available(&self) -> Money {
        self.ctx
            .calculator()
            .surplus_remaining(self.ctx.active_year() - 1)
    }

    /// Record an expense.
    ///
    /// Without the needed decision this fails with `CalendarYearMismatch` or
    /// `InsufficientBudget` and nothing is written.
    pub fn register(
        &mut self,
        actor: &Actor,
        draft: ExpenseDraft,
        decisions: &RegistrationDecisions,
    ) -> LedgerResult<RegistrationOutcome> {
        self.ctx.require_mutation(actor, "register expense")?;

        if !draft.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "expense amount must be positive, got {}",
                draft.amount
            )));
        }

        let category = draft.category.trim().to_string();
        if !self.ctx.store().custom_taxonomy.exists(&category) {
            return Err(LedgerError::category_not_found(category));
        }

        let mut date = draft.date.unwrap_or_else(|| self.ctx.clock().today());
        let active_year = self.ctx.active_year();

        if date.year() != active_year {
            match decisions.on_year_mismatch {
                None => {
                    return Err(LedgerError::CalendarYearMismatch {
                        transaction_year: date.year(),
                        active_year,
                    })
                }
                Some(YearMismatchDecision::Abort) => return Ok(RegistrationOutcome::Aborted),
                Some(YearMismatchDecision::AdoptYear) => self.adopt_year(actor, date.year())?,
                Some(YearMismatchDecision::RewriteDate) => {
                    date = rewrite_into_year(date, active_year).ok_or_else(|| {
                        LedgerError::Validation(format!(
                            "cannot move {} into {}",
                            date, active_year
                        ))
                    })?;
                }
            }
        }

        let mut txn = Transaction::new(date, category, draft.amount, self.ctx.clock().now());
        txn.subcategory = draft.subcategory.trim().to_string();
        txn.counterparty = draft
            .counterparty
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        txn.note = draft.note;
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let year = date.year();
        let month = Month::of(date);
        let category = txn.category.clone();
        let available = self.ctx.calculator().available(&category, month, year);

        let mut touched = vec![DocumentKind::Transactions];
        if draft.amount > available {
            let shortfall = draft.amount - available;
            match &decisions.on_shortfall {
                None => {
                    return Err(LedgerError::InsufficientBudget {
                        cell: CellRef::new(month, category.as_str()).to_string(),
                        needed: draft.amount,
                        available,
                    })
                }
                Some(RemediationDecision::Abort) => return Ok(RegistrationOutcome::Aborted),
                Some(decision) => {
                    touched.extend(self.remediate(
                        actor,
                        decision,
                        CellRef::new(month, category.as_str()),
                        draft.amount,
                        shortfall,
                    )?);
                }
            }
        }

        self.ctx.store_mut().transactions.push(txn.clone());
        self.ctx.persist(&touched)?;
        self.ctx.audit(actor, "register expense", &txn.to_string())?;
        info!(id = %txn.id, category = %txn.category, amount = %txn.amount, "expense recorded");

        Ok(RegistrationOutcome::Recorded(txn))
    }

    fn adopt_year(&mut self, actor: &Actor, year: i32) -> LedgerResult<()> {
        self.ctx.set_active_year(year);
        self.ctx.store_mut().year_mut(year);
        self.ctx
            .persist(&[DocumentKind::YearBudgets, DocumentKind::MonthlyBudgets])?;
        self.ctx
            .audit(actor, "switch year", &format!("{} (adopted for expense)", year))?;
        info!(year, "active year adopted from expense date");
        Ok(())
    }

    /// Apply one remediation; returns the documents it changed
    fn remediate(
        &mut self,
        actor: &Actor,
        decision: &RemediationDecision,
        cell: CellRef,
        amount: Money,
        shortfall: Money,
    ) -> LedgerResult<Vec<DocumentKind>> {
        let year = self.ctx.active_year();
        let budget_docs = vec![DocumentKind::YearBudgets, DocumentKind::MonthlyBudgets];

        match decision {
            RemediationDecision::RaiseBudget { to } => {
                let spent = self.ctx.calculator().spent(&cell.category, cell.month, year);
                if *to - spent < amount {
                    return Err(LedgerError::InsufficientBudget {
                        cell: cell.to_string(),
                        needed: amount,
                        available: *to - spent,
                    });
                }
                let store = self.ctx.store_mut();
                store.year_mut(year).month_mut(cell.month).set(cell.category.as_str(), *to);
                store.flags_mut(year).mark(cell.month, &cell.category);
                Ok(budget_docs)
            }
            RemediationDecision::TransferFrom { month, category } => {
                ReallocationEngine::new(&mut *self.ctx).move_funds(
                    actor,
                    shortfall,
                    CellRef::new(*month, category.as_str()),
                    cell,
                )?;
                let mut docs = budget_docs;
                docs.push(DocumentKind::TransferLog);
                Ok(docs)
            }
            RemediationDecision::DrawPriorSurplus => {
                let prior = year - 1;
                let remaining = self.prior_year_available();
                if shortfall > remaining {
                    return Err(LedgerError::InsufficientBudget {
                        cell: format!("surplus {}", prior),
                        needed: shortfall,
                        available: remaining,
                    });
                }

                let surplus = self.ctx.calculator().year_surplus(prior);
                let now = self.ctx.clock().now();
                let store = self.ctx.store_mut();
                store
                    .surplus_records
                    .entry(prior)
                    .or_insert_with(|| SurplusRecord::new(surplus, None, now))
                    .used += shortfall;
                store.year_mut(year).month_mut(cell.month).add(&cell.category, shortfall);
                store.flags_mut(year).mark(cell.month, &cell.category);

                let mut docs = budget_docs;
                docs.push(DocumentKind::SurplusRecords);
                Ok(docs)
            }
            RemediationDecision::ForceAdd => {
                warn!(%cell, %shortfall, "shortfall force-added with no source");
                let store = self.ctx.store_mut();
                store.year_mut(year).month_mut(cell.month).add(&cell.category, shortfall);
                store.flags_mut(year).mark(cell.month, &cell.category);
                Ok(budget_docs)
            }
            RemediationDecision::Abort => Ok(Vec::new()),
        }
    }

    /// Delete by surrogate id (full UUID, `txn-` display form or a prefix)
    pub fn delete_transaction(&mut self, actor: &Actor, id: &str) -> LedgerResult<Transaction> {
        self.ctx.require_mutation(actor, "delete expense")?;

        let matches: Vec<usize> = self
            .ctx
            .store()
            .transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| t.id.matches(id))
            .map(|(i, _)| i)
            .collect();

        let index = match matches.as_slice() {
            [] => return Err(LedgerError::transaction_not_found(id)),
            [index] => *index,
            _ => {
                return Err(LedgerError::Validation(format!(
                    "'{}' matches {} transactions, use a longer id",
                    id,
                    matches.len()
                )))
            }
        };

        self.remove_at(actor, index)
    }

    /// Delete the first transaction, in stored order, matching all three
    /// fields. Several identical expenses are indistinguishable this way.
    pub fn delete_matching(
        &mut self,
        actor: &Actor,
        date: NaiveDate,
        category: &str,
        amount: Money,
    ) -> LedgerResult<Transaction> {
        self.ctx.require_mutation(actor, "delete expense")?;

        let index = self
            .ctx
            .store()
            .transactions
            .iter()
            .position(|t| t.matches_key(date, category, amount))
            .ok_or_else(|| {
                LedgerError::transaction_not_found(format!("{} {} {}", date, category, amount))
            })?;

        self.remove_at(actor, index)
    }

    fn remove_at(&mut self, actor: &Actor, index: usize) -> LedgerResult<Transaction> {
        let removed = self.ctx.store_mut().transactions.remove(index);
        self.ctx.persist(&[DocumentKind::Transactions])?;
        self.ctx.audit(actor, "delete expense", &removed.to_string())?;
        info!(id = %removed.id, "expense deleted");
        Ok(removed)
    }
}
