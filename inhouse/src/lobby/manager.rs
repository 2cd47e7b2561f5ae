//! Lobby registry for spawning and managing per-guild lobby actors.

use super::{
    actor::{LobbyActor, LobbyHandle},
    config::{InhouseMode, LobbyConfig},
    entities::GuildId,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Registry of active lobbies, one actor per guild
pub struct LobbyManager {
    /// Configuration applied to every new lobby
    config: LobbyConfig,

    /// Active lobby handles
    lobbies: Arc<RwLock<HashMap<GuildId, LobbyHandle>>>,
}

impl LobbyManager {
    /// Create a new lobby manager
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for lobbies spawned by this manager
    ///
    /// # Returns
    ///
    /// * `LobbyManager` - New lobby manager instance
    pub fn new(config: LobbyConfig) -> Self {
        Self {
            config,
            lobbies: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    /// Get the handle of a running lobby
    pub async fn get_lobby(&self, guild_id: GuildId) -> Option<LobbyHandle> {
        let lobbies = self.lobbies.read().await;
        lobbies
            .get(&guild_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    /// Get the guild's lobby, spawning it if none is running
    ///
    /// `mode` and `password` only seed a newly spawned lobby; a running lobby
    /// keeps its own state.
    ///
    /// # Arguments
    ///
    /// * `guild_id` - Guild ID
    /// * `mode` - Initial inhouse mode
    /// * `password` - Initial lobby password
    ///
    /// # Returns
    ///
    /// * `LobbyHandle` - Handle to the guild's lobby actor
    pub async fn open_lobby(
        &self,
        guild_id: GuildId,
        mode: InhouseMode,
        password: String,
    ) -> LobbyHandle {
        if let Some(handle) = self.get_lobby(guild_id).await {
            return handle;
        }

        let mut lobbies = self.lobbies.write().await;

        // Another task may have spawned it while we waited for the write lock
        if let Some(handle) = lobbies.get(&guild_id).filter(|h| !h.is_closed()) {
            return handle.clone();
        }

        let (actor, handle) = LobbyActor::new(guild_id, self.config.clone(), mode, password);
        lobbies.insert(guild_id, handle.clone());
        drop(lobbies);

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Spawned lobby for guild {}", guild_id);
        handle
    }

    /// Close a guild's lobby and remove it from the registry
    ///
    /// # Returns
    ///
    /// * `bool` - Whether a lobby was registered for the guild
    pub async fn close_lobby(&self, guild_id: GuildId) -> bool {
        let handle = self.lobbies.write().await.remove(&guild_id);

        match handle {
            Some(handle) => {
                if handle.close().await.is_err() {
                    log::warn!("Lobby {} was already stopped", guild_id);
                }
                log::info!("Closed lobby for guild {}", guild_id);
                true
            }
            None => false,
        }
    }

    /// Close every lobby
    pub async fn close_all(&self) -> usize {
        let handles: Vec<LobbyHandle> = self.lobbies.write().await.drain().map(|(_, h)| h).collect();
        let count = handles.len();

        for handle in handles {
            let _ = handle.close().await;
        }

        log::info!("Closed {} lobby actor(s)", count);
        count
    }

    /// Number of running lobbies
    pub async fn active_lobby_count(&self) -> usize {
        let lobbies = self.lobbies.read().await;
        lobbies.values().filter(|handle| !handle.is_closed()).count()
    }

    /// Guilds with a running lobby
    pub async fn guild_ids(&self) -> Vec<GuildId> {
        let lobbies = self.lobbies.read().await;
        let mut ids: Vec<GuildId> = lobbies
            .iter()
            .filter(|(_, handle)| !handle.is_closed())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for LobbyManager {
    fn default() -> Self {
        Self::new(LobbyConfig::default())
    }
}
