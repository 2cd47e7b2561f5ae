//! Guild settings service with an audit trail.

use super::{
    errors::{SettingsError, SettingsResult},
    models::{ChangeContext, DEFAULT_PASSWORD, DEFAULT_PREFIX, SettingEntry, SettingKey},
};
use crate::{
    db::SettingsRepository,
    lobby::{GuildId, InhouseMode},
};
use chrono::Utc;
use std::sync::Arc;

/// Longest accepted command prefix
pub const MAX_PREFIX_LEN: usize = 5;

/// Longest accepted lobby password
pub const MAX_PASSWORD_LEN: usize = 64;

/// Guild settings service
#[derive(Clone)]
pub struct SettingsService {
    repository: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SettingsRepository>) -> Self {
        Self { repository }
    }

    /// Command prefix, `!` when unset
    pub async fn prefix(&self, guild_id: GuildId) -> SettingsResult<String> {
        self.value_or(guild_id, SettingKey::Prefix, DEFAULT_PREFIX).await
    }

    /// Change the command prefix
    ///
    /// # Errors
    ///
    /// * `SettingsError::InvalidValue` - Prefix is empty, too long or contains whitespace
    pub async fn set_prefix(
        &self,
        guild_id: GuildId,
        prefix: &str,
        context: ChangeContext,
    ) -> SettingsResult<SettingEntry> {
        if prefix.is_empty()
            || prefix.chars().count() > MAX_PREFIX_LEN
            || prefix.chars().any(char::is_whitespace)
        {
            return Err(invalid(
                SettingKey::Prefix,
                format!("must be 1 to {} characters without spaces", MAX_PREFIX_LEN),
            ));
        }

        self.store(guild_id, SettingKey::Prefix, prefix, context).await
    }

    /// Lobby password, `penguin` when unset
    pub async fn password(&self, guild_id: GuildId) -> SettingsResult<String> {
        self.value_or(guild_id, SettingKey::Password, DEFAULT_PASSWORD)
            .await
    }

    /// Change the lobby password
    ///
    /// # Errors
    ///
    /// * `SettingsError::InvalidValue` - Password is blank or too long
    pub async fn set_password(
        &self,
        guild_id: GuildId,
        password: &str,
        context: ChangeContext,
    ) -> SettingsResult<SettingEntry> {
        let password = password.trim();
        if password.is_empty() || password.chars().count() > MAX_PASSWORD_LEN {
            return Err(invalid(
                SettingKey::Password,
                format!("must be 1 to {} characters", MAX_PASSWORD_LEN),
            ));
        }

        self.store(guild_id, SettingKey::Password, password, context)
            .await
    }

    /// Inhouse mode, regular when unset or unreadable
    pub async fn mode(&self, guild_id: GuildId) -> SettingsResult<InhouseMode> {
        Ok(self
            .repository
            .setting(guild_id, SettingKey::Mode)
            .await?
            .map(|entry| InhouseMode::parse_lenient(&entry.value))
            .unwrap_or_default())
    }

    /// Change the inhouse mode
    pub async fn set_mode(
        &self,
        guild_id: GuildId,
        mode: InhouseMode,
        context: ChangeContext,
    ) -> SettingsResult<SettingEntry> {
        self.store(guild_id, SettingKey::Mode, &mode.to_string(), context)
            .await
    }

    /// Bind a league to the guild
    ///
    /// # Errors
    ///
    /// * `SettingsError::InvalidValue` - League ID is not numeric
    pub async fn bind_league(
        &self,
        guild_id: GuildId,
        league_id: &str,
        context: ChangeContext,
    ) -> SettingsResult<SettingEntry> {
        let league_id = league_id.trim();
        if league_id.is_empty() || !league_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(SettingKey::League, "must be a number".to_string()));
        }

        self.store(guild_id, SettingKey::League, league_id, context)
            .await
    }

    /// Bound league, if any
    pub async fn league(&self, guild_id: GuildId) -> SettingsResult<Option<String>> {
        Ok(self
            .repository
            .setting(guild_id, SettingKey::League)
            .await?
            .map(|entry| entry.value))
    }

    /// Set the channel that receives live match updates
    pub async fn set_live_channel(
        &self,
        guild_id: GuildId,
        channel_id: i64,
        context: ChangeContext,
    ) -> SettingsResult<SettingEntry> {
        self.store(
            guild_id,
            SettingKey::LiveChannel,
            &channel_id.to_string(),
            context,
        )
        .await
    }

    /// Every stored setting of a guild with who set it and when
    pub async fn audit_log(&self, guild_id: GuildId) -> SettingsResult<Vec<SettingEntry>> {
        let mut entries = self.repository.settings(guild_id).await?;
        entries.sort_by_key(|entry| entry.key);
        Ok(entries)
    }

    async fn value_or(
        &self,
        guild_id: GuildId,
        key: SettingKey,
        default: &str,
    ) -> SettingsResult<String> {
        Ok(self
            .repository
            .setting(guild_id, key)
            .await?
            .map(|entry| entry.value)
            .unwrap_or_else(|| default.to_string()))
    }

    async fn store(
        &self,
        guild_id: GuildId,
        key: SettingKey,
        value: &str,
        context: ChangeContext,
    ) -> SettingsResult<SettingEntry> {
        let entry = SettingEntry {
            guild_id,
            key,
            value: value.to_string(),
            set_by: context.set_by,
            server_name: context.server_name,
            set_at: Utc::now(),
        };
        self.repository.save_setting(&entry).await?;

        log::info!(
            "Guild {}: {} set by {}",
            guild_id,
            key,
            entry.set_by.as_deref().unwrap_or("unknown")
        );
        Ok(entry)
    }
}

fn invalid(key: SettingKey, reason: String) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        reason,
    }
}

/// Render the audit log the way `viewlogs` shows it
///
/// The verbose form adds the guild ID, the raw timestamp and the server name.
pub fn render_audit_log(
    guild_id: GuildId,
    guild_name: &str,
    entries: &[SettingEntry],
    verbose: bool,
) -> String {
    let mut lines = Vec::new();
    if verbose {
        lines.push(format!(
            "Admin Logs (Verbose) for `{}` (Guild ID: `{}`)",
            guild_name, guild_id
        ));
    } else {
        lines.push(format!("Admin Logs for `{}`", guild_name));
    }

    if entries.is_empty() {
        lines.push("No settings stored for this guild.".to_string());
        return lines.join("\n");
    }

    for entry in entries {
        let set_by = entry.set_by.as_deref().unwrap_or("Unknown");
        if verbose {
            lines.push(format!(
                "\n{}:\n  • Value: `{}`\n  • Set by: {}\n  • Timestamp: `{}`\n  • Server: {}",
                entry.key.label(),
                entry.value,
                set_by,
                entry.set_at.to_rfc3339(),
                entry.server_name.as_deref().unwrap_or("Unknown")
            ));
        } else {
            lines.push(format!(
                "\n{}: `{}`\nSet by: {}\nTime: {}",
                entry.key.label(),
                entry.value,
                set_by,
                entry.set_at.format("%Y-%m-%d %H:%M UTC")
            ));
        }
    }

    lines.join("\n")
}
