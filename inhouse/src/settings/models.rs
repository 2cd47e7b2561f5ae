//! Guild settings data models.

use super::errors::SettingsError;
use crate::lobby::GuildId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Default command prefix
pub const DEFAULT_PREFIX: &str = "!";

/// Default lobby password
pub const DEFAULT_PASSWORD: &str = "penguin";

/// Per-guild setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    Prefix,
    Password,
    Mode,
    League,
    LiveChannel,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::Prefix,
        SettingKey::Password,
        SettingKey::Mode,
        SettingKey::League,
        SettingKey::LiveChannel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Prefix => "prefix",
            SettingKey::Password => "password",
            SettingKey::Mode => "mode",
            SettingKey::League => "league",
            SettingKey::LiveChannel => "live_channel",
        }
    }

    /// Heading used in the audit log
    pub fn label(&self) -> &'static str {
        match self {
            SettingKey::Prefix => "Prefix",
            SettingKey::Password => "Lobby Password",
            SettingKey::Mode => "Inhouse Mode",
            SettingKey::League => "Bound League",
            SettingKey::LiveChannel => "Live Channel",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

/// Stored setting value with its audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub guild_id: GuildId,
    pub key: SettingKey,
    pub value: String,
    /// Display name of whoever set the value
    pub set_by: Option<String>,
    /// Guild name at the time the value was set
    pub server_name: Option<String>,
    pub set_at: DateTime<Utc>,
}

/// Who is changing a setting, for the audit trail
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeContext {
    pub set_by: Option<String>,
    pub server_name: Option<String>,
}

impl ChangeContext {
    pub fn new(set_by: impl Into<String>, server_name: Option<String>) -> Self {
        Self {
            set_by: Some(set_by.into()),
            server_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip_through_str() {
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>().expect("key"), key);
        }
        assert!("colour".parse::<SettingKey>().is_err());
    }
}
