//! Permission module: who may trigger admin-only lobby actions.
//!
//! Checks are made once, at the boundary where a request enters the system,
//! through an explicit [`AdminPolicy`] capability. Lobby, wallet and rating
//! code never inspect roles themselves.
//!
//! ## Example
//!
//! ```
//! use inhouse::auth::{Actor, AdminPolicy};
//!
//! let policy = AdminPolicy::new([187], vec!["Inhouse Admin".to_string()]);
//! let actor = Actor::new(5, "captain").with_role("Inhouse Admin");
//!
//! assert!(policy.can_trigger_admin_action(&actor));
//! ```

pub mod errors;
pub mod models;
pub mod policy;

pub use errors::{AuthError, AuthResult};
pub use models::{Actor, DEFAULT_ADMIN_ROLE};
pub use policy::{AdminPolicy, BridgeToken};
