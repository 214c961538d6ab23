//! Authorization and activity logging
//!
//! The engine only needs two things from the outside world here: whether
//! an actor may mutate financial state, and a place to record what they did.
//! Activity entries are stored as JSONL, one action per line.

pub mod actor;
pub mod authorizer;
pub mod entry;
pub mod logger;

pub use actor::{Actor, Role};
pub use authorizer::{ActivitySink, Authorizer, RoleAuthorizer};
pub use entry::ActivityEntry;
pub use logger::ActivityLogger;
