//! Session identity handed to the engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "Administrador", alias = "administrator")]
    Administrator,
    #[serde(rename = "Usuario", alias = "user")]
    User,
    #[serde(rename = "Visualizador", alias = "viewer")]
    Viewer,
}

impl Role {
    /// Roles allowed to change financial state
    pub fn can_mutate(self) -> bool {
        matches!(self, Role::Administrator | Role::User)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => write!(f, "Administrador"),
            Role::User => write!(f, "Usuario"),
            Role::Viewer => write!(f, "Visualizador"),
        }
    }
}

impl FromStr for Role {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "administrador" | "administrator" | "admin" => Ok(Role::Administrator),
            "usuario" | "user" => Ok(Role::User),
            "visualizador" | "viewer" => Ok(Role::Viewer),
            other => Err(LedgerError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Who is performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_permissions() {
        assert_eq!("Usuario".parse::<Role>().unwrap(), Role::User);
        assert_eq!("viewer".parse::<Role>().unwrap(), Role::Viewer);
        assert!(Role::Administrator.can_mutate());
        assert!(Role::User.can_mutate());
        assert!(!Role::Viewer.can_mutate());
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Viewer).unwrap(), "\"Visualizador\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }
}
