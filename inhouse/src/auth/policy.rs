//! Admin policy and bridge token verification.

use super::{
    errors::{AuthError, AuthResult},
    models::{Actor, DEFAULT_ADMIN_ROLE},
};
use crate::lobby::UserId;
use std::collections::HashSet;
use subtle::ConstantTimeEq;

/// Decides who may trigger admin-only actions.
///
/// An actor qualifies when listed as a global admin, when holding the guild
/// administrator permission, or when carrying one of the admin roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPolicy {
    global_admin_ids: HashSet<UserId>,
    admin_roles: Vec<String>,
}

impl AdminPolicy {
    /// Create a policy
    ///
    /// # Arguments
    ///
    /// * `global_admin_ids` - Users with admin rights in every guild
    /// * `admin_roles` - Role names that grant admin rights
    pub fn new(global_admin_ids: impl IntoIterator<Item = UserId>, admin_roles: Vec<String>) -> Self {
        Self {
            global_admin_ids: global_admin_ids.into_iter().collect(),
            admin_roles,
        }
    }

    pub fn admin_roles(&self) -> &[String] {
        &self.admin_roles
    }

    /// Whether `actor` may trigger an admin-only action
    pub fn can_trigger_admin_action(&self, actor: &Actor) -> bool {
        self.global_admin_ids.contains(&actor.user_id)
            || actor.is_administrator
            || actor
                .roles
                .iter()
                .any(|role| self.admin_roles.iter().any(|admin| admin == role))
    }

    /// Require admin rights for `action`
    ///
    /// # Errors
    ///
    /// * `AuthError::Forbidden` - Actor is not an admin
    pub fn require_admin(&self, actor: &Actor, action: &str) -> AuthResult<()> {
        if self.can_trigger_admin_action(actor) {
            return Ok(());
        }

        log::warn!(
            "User {} denied admin action '{}'",
            actor.user_id,
            action
        );
        Err(AuthError::Forbidden {
            action: action.to_string(),
            role: self
                .admin_roles
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_ADMIN_ROLE.to_string()),
        })
    }
}

impl Default for AdminPolicy {
    fn default() -> Self {
        Self::new(Vec::new(), vec![DEFAULT_ADMIN_ROLE.to_string()])
    }
}

/// Shared secret the chat bridge presents on every request
#[derive(Clone)]
pub struct BridgeToken(String);

impl BridgeToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Check a presented token in constant time
    ///
    /// # Errors
    ///
    /// * `AuthError::MissingToken` - Nothing was presented
    /// * `AuthError::InvalidToken` - Token does not match
    pub fn verify(&self, presented: Option<&str>) -> AuthResult<()> {
        let presented = presented.ok_or(AuthError::MissingToken)?;

        if bool::from(self.0.as_bytes().ct_eq(presented.as_bytes())) {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

impl std::fmt::Debug for BridgeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BridgeToken(***)")
    }
}
