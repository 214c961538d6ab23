//! Reallocation engine
//!
//! Moves money between budget cells of the active year, and redistributes
//! a closed year's surplus into the active year with one of five strategies.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::audit::Actor;
use crate::context::LedgerContext;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CellRef, Money, Month, SurplusDecision, SurplusRecord, TransferLogEntry};
use crate::storage::DocumentKind;

/// How a year surplus is put back into the active year's budget
#[derive(Debug, Clone, PartialEq)]
pub enum SurplusPlan {
    /// Keep the surplus aside; no cell changes
    EmergencyReserve,
    /// Spread over every budgeted cell in proportion to its amount
    Proportional,
    /// Add everything to January of the infrastructure category
    Infrastructure,
    /// Set January of the training category to the surplus
    Training,
    /// Category to percentage; must total 100 within tolerance
    Custom(BTreeMap<String, Decimal>),
}

impl SurplusPlan {
    pub fn decision(&self) -> SurplusDecision {
        match self {
            SurplusPlan::EmergencyReserve => SurplusDecision::EmergencyReserve,
            SurplusPlan::Proportional => SurplusDecision::Proportional,
            SurplusPlan::Infrastructure => SurplusDecision::Infrastructure,
            SurplusPlan::Training => SurplusDecision::Training,
            SurplusPlan::Custom(_) => SurplusDecision::Custom,
        }
    }
}

/// Service for transfers and surplus redistribution
pub struct ReallocationEngine<'a> {
    ctx: &'a mut LedgerContext,
}

impl<'a> ReallocationEngine<'a> {
    pub fn new(ctx: &'a mut LedgerContext) -> Self {
        Self { ctx }
    }

    /// Move `amount` from one cell of the active year to another.
    ///
    /// The source must have at least `amount` available. The destination is
    /// created at zero when absent and marked modified.
    pub fn transfer(
        &mut self,
        actor: &Actor,
        amount: Money,
        source: CellRef,
        dest: CellRef,
    ) -> LedgerResult<TransferLogEntry> {
        self.ctx.require_mutation(actor, "transfer funds")?;

        let entry = self.move_funds(actor, amount, source, dest)?;

        self.ctx.persist(&[
            DocumentKind::YearBudgets,
            DocumentKind::MonthlyBudgets,
            DocumentKind::TransferLog,
        ])?;
        self.ctx.audit(
            actor,
            "transfer funds",
            &format!("{} from {} to {}", entry.amount, entry.source, entry.dest),
        )?;

        Ok(entry)
    }

    /// Validate and apply a transfer in memory, without persisting
    pub(crate) fn move_funds(
        &mut self,
        actor: &Actor,
        amount: Money,
        source: CellRef,
        dest: CellRef,
    ) -> LedgerResult<TransferLogEntry> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "transfer amount must be positive, got {}",
                amount
            )));
        }
        if source == dest {
            return Err(LedgerError::Validation(
                "source and destination are the same cell".into(),
            ));
        }

        let year = self.ctx.active_year();
        let store = self.ctx.store();

        if !store
            .year(year)
            .map_or(false, |y| y.contains_cell(source.month, &source.category))
        {
            return Err(LedgerError::cell_not_found(source.month, &source.category));
        }

        let dest_known = store.custom_taxonomy.exists(&dest.category)
            || store
                .year(year)
                .map_or(false, |y| y.iter().any(|(_, m)| m.contains(&dest.category)));
        if !dest_known {
            return Err(LedgerError::category_not_found(dest.category.as_str()));
        }

        let available = self
            .ctx
            .calculator()
            .available(&source.category, source.month, year);
        if amount > available {
            return Err(LedgerError::InsufficientBudget {
                cell: source.to_string(),
                needed: amount,
                available,
            });
        }

        let entry = TransferLogEntry {
            timestamp: self.ctx.clock().now(),
            year,
            amount,
            source,
            dest,
            actor: actor.username.clone(),
        };

        let store = self.ctx.store_mut();
        let budget = store.year_mut(year);
        budget
            .month_mut(entry.source.month)
            .add(&entry.source.category, -amount);
        budget.month_mut(entry.dest.month).add(&entry.dest.category, amount);
        store
            .flags_mut(year)
            .mark(entry.dest.month, &entry.dest.category);
        store.transfer_log.push(entry.clone());

        debug!(%amount, source = %entry.source, dest = %entry.dest, "funds moved");
        Ok(entry)
    }

    /// Redistribute the surplus of `source_year` into the active year.
    ///
    /// Writes one surplus record for `source_year`, replacing any earlier one
    /// but keeping what was already drawn from it.
    pub fn apply_surplus(
        &mut self,
        actor: &Actor,
        source_year: i32,
        plan: SurplusPlan,
    ) -> LedgerResult<SurplusRecord> {
        self.ctx.require_mutation(actor, "apply surplus")?;

        let surplus = self.ctx.calculator().year_surplus(source_year);
        if !surplus.is_positive() {
            return Err(LedgerError::NoSurplus { year: source_year });
        }

        if let SurplusPlan::Custom(percentages) = &plan {
            self.validate_percentages(percentages)?;
        }

        let year = self.ctx.active_year();
        let infrastructure = self.ctx.settings().infrastructure_category.clone();
        let training = self.ctx.settings().training_category.clone();
        let budget = self.ctx.store_mut().year_mut(year);

        match &plan {
            SurplusPlan::EmergencyReserve => {}
            SurplusPlan::Proportional => {
                let total: Money = budget
                    .iter()
                    .flat_map(|(_, m)| m.iter())
                    .map(|(_, amount)| *amount)
                    .filter(Money::is_positive)
                    .sum();
                if total.is_positive() {
                    // Shares are whole cents; the rounding remainder goes to
                    // the largest cell so the shares add up to the surplus.
                    let mut distributed = Money::zero();
                    let mut largest: Option<(Month, String, Money)> = None;
                    for (month, cells) in budget.iter_mut() {
                        for (category, amount) in cells.iter_mut() {
                            if !amount.is_positive() {
                                continue;
                            }
                            if largest.as_ref().map_or(true, |(_, _, top)| *amount > *top) {
                                largest = Some((*month, category.clone(), *amount));
                            }
                            let share = (surplus * amount.ratio_of(total)).round_cents();
                            *amount += share;
                            distributed += share;
                        }
                    }
                    if let Some((month, category, _)) = largest {
                        budget.month_mut(month).add(&category, surplus - distributed);
                    }
                }
            }
            SurplusPlan::Infrastructure => {
                budget.month_mut(Month::Enero).add(&infrastructure, surplus);
            }
            SurplusPlan::Training => {
                budget.month_mut(Month::Enero).set(training, surplus);
            }
            SurplusPlan::Custom(percentages) => {
                for (category, pct) in percentages {
                    if pct.is_zero() {
                        continue;
                    }
                    budget
                        .month_mut(Month::Enero)
                        .add(category, surplus * (*pct / dec!(100)));
                }
            }
        }

        let now = self.ctx.clock().now();
        let records = &mut self.ctx.store_mut().surplus_records;
        let used = records.get(&source_year).map(|r| r.used).unwrap_or_default();
        let mut record = SurplusRecord::new(surplus, Some(plan.decision()), now);
        record.used = used;
        records.insert(source_year, record.clone());

        self.ctx
            .persist(&[DocumentKind::YearBudgets, DocumentKind::SurplusRecords])?;
        self.ctx.audit(
            actor,
            "apply surplus",
            &format!("{} of {} as {}", surplus, source_year, plan.decision()),
        )?;
        info!(source_year, active_year = year, %surplus, decision = %plan.decision(), "surplus applied");

        Ok(record)
    }

    fn validate_percentages(&self, percentages: &BTreeMap<String, Decimal>) -> LedgerResult<()> {
        if let Some((category, pct)) = percentages.iter().find(|(_, p)| p.is_sign_negative()) {
            return Err(LedgerError::InvalidAmount(format!(
                "percentage for {} is negative: {}",
                category, pct
            )));
        }

        let total: Decimal = percentages.values().sum();
        if (total - dec!(100)).abs() > self.ctx.settings().surplus_tolerance {
            return Err(LedgerError::PercentageSumInvalid { total });
        }

        let store = self.ctx.store();
        let year = store.year(self.ctx.active_year());
        for category in percentages.keys() {
            let known = store.custom_taxonomy.exists(category)
                || year.map_or(false, |y| y.iter().any(|(_, m)| m.contains(category)));
            if !known {
                return Err(LedgerError::category_not_found(category.as_str()));
            }
        }

        Ok(())
    }
}
