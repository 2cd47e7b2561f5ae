//! Guild settings: command prefix, lobby password, inhouse mode, league
//! binding and live channel, each stored with who set it and when.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::{SettingsError, SettingsResult};
pub use models::{ChangeContext, DEFAULT_PASSWORD, DEFAULT_PREFIX, SettingEntry, SettingKey};
pub use service::{SettingsService, render_audit_log};
