//! Shared fixtures for unit tests

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::audit::{ActivityEntry, Actor, Authorizer, Role};
use crate::clock::{Clock, FixedClock};
use crate::config::Settings;
use crate::context::LedgerContext;
use crate::error::LedgerResult;
use crate::models::Money;
use crate::storage::{DocumentKind, MemoryPersistence};

/// A context over in-memory persistence, with handles to inspect what it wrote
pub struct TestLedger {
    pub ctx: LedgerContext,
    pub persistence: MemoryPersistence,
    pub audit: Arc<Mutex<Vec<ActivityEntry>>>,
}

impl TestLedger {
    /// Actions audited so far
    pub fn audited_actions(&self) -> Vec<String> {
        self.audit
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.action.clone())
            .collect()
    }

    /// Save everything seeded directly into the store
    pub fn save_all(&mut self) {
        self.ctx.persist(&DocumentKind::ALL).unwrap();
    }

    /// Reopen a fresh context over the same persisted documents
    pub fn reopen(&self, today: NaiveDate) -> LedgerContext {
        ledger_with(self.persistence.clone(), today).ctx
    }
}

/// Role-gated authorizer that keeps entries where the test can read them
struct RecordingAuthorizer {
    entries: Arc<Mutex<Vec<ActivityEntry>>>,
    clock: FixedClock,
}

impl Authorizer for RecordingAuthorizer {
    fn may_mutate(&self, actor: &Actor) -> bool {
        actor.role.can_mutate()
    }

    fn audit(&mut self, actor: &Actor, action: &str, details: &str) -> LedgerResult<()> {
        let entry = ActivityEntry::new(self.clock.now(), actor, action, details);
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

pub fn ledger_on(today: NaiveDate) -> TestLedger {
    ledger_with(MemoryPersistence::new(), today)
}

pub fn ledger_with(persistence: MemoryPersistence, today: NaiveDate) -> TestLedger {
    let audit = Arc::new(Mutex::new(Vec::new()));
    let clock = FixedClock::on(today);
    let authorizer = RecordingAuthorizer {
        entries: Arc::clone(&audit),
        clock,
    };
    let ctx = LedgerContext::open(
        Box::new(persistence.clone()),
        Box::new(authorizer),
        Box::new(clock),
        Settings::default(),
    )
    .unwrap();

    TestLedger {
        ctx,
        persistence,
        audit,
    }
}

pub fn actor(role: Role) -> Actor {
    let name = match role {
        Role::Administrator => "admin",
        Role::User => "ana",
        Role::Viewer => "victor",
    };
    Actor::new(name, role)
}

pub fn admin() -> Actor {
    actor(Role::Administrator)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn money(amount: Decimal) -> Money {
    Money::new(amount)
}
