//! Activity log entry
//!
//! One line of the activity trail: who did what, when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actor::{Actor, Role};

/// A single audited action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// When the action completed (UTC)
    pub timestamp: DateTime<Utc>,

    pub actor: String,

    pub role: Role,

    /// Short action name, e.g. "register expense"
    pub action: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

impl ActivityEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        actor: &Actor,
        action: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            actor: actor.username.clone(),
            role: actor.role,
            action: action.into(),
            details: details.into(),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} ({}) {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.actor,
            self.role,
            self.action
        );

        if !self.details.is_empty() {
            output.push_str(&format!(": {}", self.details));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_readable_format() {
        let actor = Actor::new("ana", Role::User);
        let entry = ActivityEntry::new(Utc::now(), &actor, "transfer", "Enero/A -> Enero/B $10.00");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("ana (Usuario) transfer"));
        assert!(formatted.ends_with("Enero/A -> Enero/B $10.00"));
    }

    #[test]
    fn test_serialization_skips_empty_details() {
        let actor = Actor::new("ana", Role::Administrator);
        let entry = ActivityEntry::new(Utc::now(), &actor, "switch year", "");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("details").is_none());

        let back: ActivityEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
