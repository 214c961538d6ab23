//! Authorization collaborator
//!
//! The engine asks `may_mutate` before every state-changing operation and
//! calls `audit` after every successful one.

use crate::clock::{Clock, SystemClock};
use crate::error::LedgerResult;

use super::actor::Actor;
use super::entry::ActivityEntry;
use super::logger::ActivityLogger;

/// Permission check plus audit trail
pub trait Authorizer: Send {
    /// Whether the actor may change financial state
    fn may_mutate(&self, actor: &Actor) -> bool;

    /// Record a completed action
    fn audit(&mut self, actor: &Actor, action: &str, details: &str) -> LedgerResult<()>;
}

/// Where audited entries go
#[derive(Debug)]
pub enum ActivitySink {
    File(ActivityLogger),
    Memory(Vec<ActivityEntry>),
}

/// Grants Administrator and User roles, denies Viewer
pub struct RoleAuthorizer {
    sink: ActivitySink,
    clock: Box<dyn Clock>,
}

impl RoleAuthorizer {
    /// Audit to a JSONL file
    pub fn with_logger(logger: ActivityLogger) -> Self {
        Self {
            sink: ActivitySink::File(logger),
            clock: Box::new(SystemClock),
        }
    }

    /// Keep audited entries in memory
    pub fn in_memory() -> Self {
        Self {
            sink: ActivitySink::Memory(Vec::new()),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Entries recorded so far when auditing in memory
    pub fn recorded(&self) -> &[ActivityEntry] {
        match &self.sink {
            ActivitySink::Memory(entries) => entries,
            ActivitySink::File(_) => &[],
        }
    }
}

impl Authorizer for RoleAuthorizer {
    fn may_mutate(&self, actor: &Actor) -> bool {
        actor.role.can_mutate()
    }

    fn audit(&mut self, actor: &Actor, action: &str, details: &str) -> LedgerResult<()> {
        let entry = ActivityEntry::new(self.clock.now(), actor, action, details);
        match &mut self.sink {
            ActivitySink::File(logger) => logger.log(&entry),
            ActivitySink::Memory(entries) => {
                entries.push(entry);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Role;
    use tempfile::TempDir;

    #[test]
    fn test_roles() {
        let auth = RoleAuthorizer::in_memory();
        assert!(auth.may_mutate(&Actor::new("a", Role::Administrator)));
        assert!(auth.may_mutate(&Actor::new("u", Role::User)));
        assert!(!auth.may_mutate(&Actor::new("v", Role::Viewer)));
    }

    #[test]
    fn test_audit_in_memory() {
        let mut auth = RoleAuthorizer::in_memory();
        let actor = Actor::new("ana", Role::User);
        auth.audit(&actor, "add category", "Apicultura").unwrap();

        assert_eq!(auth.recorded().len(), 1);
        assert_eq!(auth.recorded()[0].details, "Apicultura");
    }

    #[test]
    fn test_audit_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let logger = ActivityLogger::new(temp_dir.path().join("activity.log"));
        let mut auth = RoleAuthorizer::with_logger(logger.clone());

        auth.audit(&Actor::new("ana", Role::User), "transfer", "x").unwrap();

        assert_eq!(logger.read_all().unwrap().len(), 1);
        assert!(auth.recorded().is_empty());
    }
}
