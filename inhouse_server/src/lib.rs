//! HTTP service driving inhouse lobbies for a chat-platform bridge.
//!
//! The binary in `main.rs` wires configuration, storage and providers; the
//! modules here are public so integration tests can build the router.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod refresh;
