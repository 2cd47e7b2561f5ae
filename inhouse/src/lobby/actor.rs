//! Lobby actor implementation with async message handling.

use super::{
    config::{InhouseMode, LobbyConfig},
    entities::{GuildId, Participant, UserId},
    errors::{LobbyError, LobbyResult},
    messages::{AlternativeView, BatchOutcome, LeaveOutcome, LobbyMessage, LobbyView},
    state::Lobby,
};
use tokio::sync::{mpsc, oneshot};

/// Lobby actor handle for sending messages
#[derive(Clone, Debug)]
pub struct LobbyHandle {
    sender: mpsc::Sender<LobbyMessage>,
    guild_id: GuildId,
}

impl LobbyHandle {
    /// Create a new lobby handle
    pub fn new(sender: mpsc::Sender<LobbyMessage>, guild_id: GuildId) -> Self {
        Self { sender, guild_id }
    }

    /// Get guild ID
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// Whether the actor behind this handle has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the lobby
    pub async fn send(&self, message: LobbyMessage) -> LobbyResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| LobbyError::LobbyClosed)
    }

    /// Send a message and wait for its reply
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> LobbyMessage,
    ) -> LobbyResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| LobbyError::LobbyClosed)
    }

    pub async fn join(&self, participant: Participant) -> LobbyResult<LobbyView> {
        self.request(|response| LobbyMessage::Join {
            participant,
            response,
        })
        .await?
    }

    pub async fn leave(&self, user_id: UserId) -> LobbyResult<LeaveOutcome> {
        self.request(|response| LobbyMessage::Leave { user_id, response })
            .await?
    }

    pub async fn add_many(&self, participants: Vec<Participant>) -> LobbyResult<BatchOutcome> {
        self.request(|response| LobbyMessage::AddMany {
            participants,
            response,
        })
        .await
    }

    pub async fn remove_many(&self, user_ids: Vec<UserId>) -> LobbyResult<BatchOutcome> {
        self.request(|response| LobbyMessage::RemoveMany { user_ids, response })
            .await
    }

    pub async fn reset(&self) -> LobbyResult<LobbyView> {
        self.request(|response| LobbyMessage::Reset { response })
            .await
    }

    pub async fn generate(&self) -> LobbyResult<AlternativeView> {
        self.request(|response| LobbyMessage::Generate { response })
            .await?
    }

    pub async fn reroll(&self) -> LobbyResult<AlternativeView> {
        self.request(|response| LobbyMessage::Reroll { response })
            .await?
    }

    pub async fn set_mode(&self, mode: InhouseMode) -> LobbyResult<LobbyView> {
        self.request(|response| LobbyMessage::SetMode { mode, response })
            .await
    }

    pub async fn set_password(&self, password: String) -> LobbyResult<LobbyView> {
        self.request(|response| LobbyMessage::SetPassword { password, response })
            .await
    }

    pub async fn view(&self) -> LobbyResult<LobbyView> {
        self.request(|response| LobbyMessage::GetView { response })
            .await
    }

    pub async fn current_alternative(&self) -> LobbyResult<Option<AlternativeView>> {
        self.request(|response| LobbyMessage::GetAlternative { response })
            .await
    }

    pub async fn alert_targets(&self) -> LobbyResult<Vec<UserId>> {
        self.request(|response| LobbyMessage::AlertTargets { response })
            .await?
    }

    /// Ask the actor to stop; pending messages already queued are dropped
    pub async fn close(&self) -> LobbyResult<()> {
        self.send(LobbyMessage::Close).await
    }
}

/// Lobby actor owning a single guild's lobby
///
/// Messages are handled one at a time, so roster and rotation changes for a
/// guild are serialized without a lock.
pub struct LobbyActor {
    /// Lobby state
    lobby: Lobby,

    /// Message inbox
    inbox: mpsc::Receiver<LobbyMessage>,

    /// Is lobby closed
    is_closed: bool,
}

impl LobbyActor {
    /// Create a new lobby actor
    ///
    /// # Arguments
    ///
    /// * `guild_id` - Guild the lobby belongs to
    /// * `config` - Lobby configuration
    /// * `mode` - Initial inhouse mode
    /// * `password` - Lobby password shown to players
    ///
    /// # Returns
    ///
    /// * `(LobbyActor, LobbyHandle)` - Actor and handle for sending messages
    pub fn new(
        guild_id: GuildId,
        config: LobbyConfig,
        mode: InhouseMode,
        password: String,
    ) -> (Self, LobbyHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity.max(1));

        let actor = Self {
            lobby: Lobby::new(guild_id, config, mode, password),
            inbox,
            is_closed: false,
        };

        (actor, LobbyHandle::new(sender, guild_id))
    }

    /// Run the lobby actor event loop
    pub async fn run(mut self) {
        let guild_id = self.lobby.guild_id();
        log::info!("Lobby {} starting ({})", guild_id, self.lobby.mode());

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        log::info!("Lobby {} closed", guild_id);
    }

    /// Handle a lobby message
    fn handle_message(&mut self, message: LobbyMessage) {
        let guild_id = self.lobby.guild_id();

        match message {
            LobbyMessage::Join {
                participant,
                response,
            } => {
                let user_id = participant.id;
                let result = self.lobby.add(participant).map(|()| self.lobby.view());
                if let Ok(view) = &result {
                    log::info!(
                        "Lobby {}: player {} joined ({}/{})",
                        guild_id,
                        user_id,
                        view.player_count,
                        view.capacity
                    );
                }
                let _ = response.send(result);
            }

            LobbyMessage::Leave { user_id, response } => {
                let result = self.lobby.remove(user_id);
                if let Ok(outcome) = &result {
                    log::info!(
                        "Lobby {}: player {} left ({}/{})",
                        guild_id,
                        user_id,
                        outcome.lobby.player_count,
                        outcome.lobby.capacity
                    );
                }
                let _ = response.send(result);
            }

            LobbyMessage::AddMany {
                participants,
                response,
            } => {
                let _ = response.send(self.lobby.add_many(participants));
            }

            LobbyMessage::RemoveMany { user_ids, response } => {
                let _ = response.send(self.lobby.remove_many(user_ids));
            }

            LobbyMessage::Reset { response } => {
                let cleared = self.lobby.reset();
                log::info!("Lobby {}: reset, {} player(s) cleared", guild_id, cleared);
                let _ = response.send(self.lobby.view());
            }

            LobbyMessage::Generate { response } => {
                let _ = response.send(self.lobby.generate());
            }

            LobbyMessage::Reroll { response } => {
                let _ = response.send(self.lobby.reroll());
            }

            LobbyMessage::SetMode { mode, response } => {
                self.lobby.set_mode(mode);
                let _ = response.send(self.lobby.view());
            }

            LobbyMessage::SetPassword { password, response } => {
                self.lobby.set_password(password);
                let _ = response.send(self.lobby.view());
            }

            LobbyMessage::GetView { response } => {
                let _ = response.send(self.lobby.view());
            }

            LobbyMessage::GetAlternative { response } => {
                let _ = response.send(self.lobby.current());
            }

            LobbyMessage::AlertTargets { response } => {
                let _ = response.send(self.lobby.alert_targets());
            }

            LobbyMessage::Close => {
                self.is_closed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_lobby(mode: InhouseMode) -> LobbyHandle {
        let (actor, handle) = LobbyActor::new(7, LobbyConfig::default(), mode, "penguin".into());
        tokio::spawn(actor.run());
        handle
    }

    #[tokio::test]
    async fn test_join_and_view_round_trip() {
        let handle = spawn_lobby(InhouseMode::Regular);

        let view = handle
            .join(Participant::new(1, "alpha", 3000))
            .await
            .expect("join");
        assert_eq!(view.player_count, 1);
        assert!(!view.ready);

        let err = handle
            .join(Participant::new(1, "alpha", 3000))
            .await
            .unwrap_err();
        assert_eq!(err, LobbyError::AlreadyPresent(1));

        let view = handle.view().await.expect("view");
        assert_eq!(view.players[0].display_name, "alpha");
        assert_eq!(view.password, "penguin");
    }

    #[tokio::test]
    async fn test_generate_through_actor() {
        let handle = spawn_lobby(InhouseMode::Regular);
        for id in 1..=10 {
            handle
                .join(Participant::new(id, format!("p{}", id), id as u32 * 250))
                .await
                .expect("join");
        }

        let shown = handle.generate().await.expect("generate");
        assert_eq!(
            handle.current_alternative().await.expect("alive"),
            Some(shown)
        );

        let rerolled = handle.reroll().await.expect("reroll");
        assert_eq!(rerolled.roll_label(), "Roll #2/5");
    }

    #[tokio::test]
    async fn test_closed_lobby_rejects_messages() {
        let handle = spawn_lobby(InhouseMode::Regular);
        handle.close().await.expect("close");

        // Give the actor a chance to observe the close
        for _ in 0..50 {
            if handle.is_closed() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert!(handle.is_closed());
        assert_eq!(handle.view().await, Err(LobbyError::LobbyClosed));
    }
}
