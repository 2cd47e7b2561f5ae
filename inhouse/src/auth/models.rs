//! Permission data models.

use crate::lobby::UserId;
use serde::{Deserialize, Serialize};

/// Role name granting admin rights when no other rule applies
pub const DEFAULT_ADMIN_ROLE: &str = "Inhouse Admin";

/// The chat user on whose behalf the bridge calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub display_name: String,
    /// Holds the guild's administrator permission
    #[serde(default)]
    pub is_administrator: bool,
    /// Guild role names
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Actor {
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            is_administrator: false,
            roles: Vec::new(),
        }
    }

    pub fn administrator(mut self) -> Self {
        self.is_administrator = true;
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}
