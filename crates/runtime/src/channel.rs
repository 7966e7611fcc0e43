//! Entry point for transports.
//!
//! [`RealtimeChannel`] owns the session registry, spawns one worker per
//! battle and routes client messages to the owning worker after checking
//! that the sender controls the combatant it names.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use battle_core::{
    BattleEnv, BattleSession, BattleSnapshot, GameError, PartyMember, PlayerId, SessionId,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info};

use crate::api::{
    Rejection, Result, RuntimeError, SessionHandle, SessionRegistry, Subscription,
};
use crate::config::RuntimeConfig;
use crate::events::ClientMessage;
use crate::workers::SessionWorker;

/// Realtime front door shared by every connection.
///
/// Cloning is cheap; clones share the registry.
#[derive(Clone)]
pub struct RealtimeChannel {
    env: Arc<BattleEnv>,
    config: RuntimeConfig,
    registry: SessionRegistry,
}

impl RealtimeChannel {
    /// Creates a channel over shared content.
    ///
    /// A balance config in `config.battle` replaces the one carried by `env`.
    pub fn new(env: Arc<BattleEnv>, config: RuntimeConfig) -> Self {
        let env = match &config.battle {
            Some(battle) => Arc::new(env.as_ref().clone().with_config(battle.clone())),
            None => env,
        };

        Self {
            env,
            config,
            registry: SessionRegistry::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn env(&self) -> &Arc<BattleEnv> {
        &self.env
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Starts a battle for a lobby with a seed derived from its id.
    pub async fn create_session(
        &self,
        session_id: impl Into<SessionId>,
        roster: &[PartyMember],
        template_id: &str,
    ) -> Result<BattleSnapshot> {
        let session_id = session_id.into();
        let seed = seed_for(&session_id);
        self.create_session_with_seed(session_id, roster, template_id, seed)
            .await
    }

    /// Starts a battle with an explicit seed.
    ///
    /// The returned snapshot is in `Intro`; the first turn is handed out when
    /// a client reports the intro animation complete or the intro times out.
    pub async fn create_session_with_seed(
        &self,
        session_id: impl Into<SessionId>,
        roster: &[PartyMember],
        template_id: &str,
        seed: u64,
    ) -> Result<BattleSnapshot> {
        let session_id = session_id.into();
        if self.registry.contains(&session_id).await {
            return Err(RuntimeError::SessionAlreadyExists { session_id });
        }

        let session = BattleSession::from_catalog(
            session_id.clone(),
            roster,
            template_id,
            Arc::clone(&self.env),
            seed,
        )?;

        let owners: HashMap<_, _> = roster
            .iter()
            .map(|member| (member.id, member.owner.clone()))
            .collect();
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let (event_tx, _) = broadcast::channel(self.config.broadcast_buffer_size);

        let worker = SessionWorker::new(
            session,
            self.config.clone(),
            command_rx,
            event_tx,
            self.registry.clone(),
        );
        let snapshot = worker.snapshot();

        self.registry
            .insert(SessionHandle::new(session_id.clone(), command_tx, owners))
            .await?;
        tokio::spawn(worker.run());

        info!(
            target: "runtime::channel",
            session = %session_id,
            template = template_id,
            party = roster.len(),
            "Session created"
        );
        Ok(snapshot)
    }

    /// Subscribes to a session's stream, starting from a full snapshot.
    pub async fn subscribe(&self, session_id: &SessionId) -> Result<Subscription> {
        self.registry.get(session_id).await?.subscribe().await
    }

    /// Authoritative state of a session.
    pub async fn snapshot(&self, session_id: &SessionId) -> Result<BattleSnapshot> {
        self.registry.get(session_id).await?.query_snapshot().await
    }

    /// Stops a session early; subscribers receive `SessionClosed` without an outcome.
    pub async fn close_session(&self, session_id: &SessionId) -> Result<()> {
        self.registry.get(session_id).await?.close().await
    }

    /// Routes one client message on behalf of `player`.
    ///
    /// Failures are returned to the caller only and never reach other
    /// subscribers.
    pub async fn dispatch(
        &self,
        player: &PlayerId,
        message: ClientMessage,
    ) -> std::result::Result<(), Rejection> {
        self.route(player, message).await.map_err(|error| {
            let severity = error.severity();
            if severity.is_internal() {
                error!(
                    target: "runtime::channel",
                    player = %player,
                    code = error.error_code(),
                    severity = severity.as_str(),
                    error = %error,
                    "Request failed"
                );
            } else {
                debug!(
                    target: "runtime::channel",
                    player = %player,
                    code = error.error_code(),
                    error = %error,
                    "Request rejected"
                );
            }
            Rejection::from(error)
        })
    }

    async fn route(&self, player: &PlayerId, message: ClientMessage) -> Result<()> {
        let handle = self.registry.get(message.session_id()).await?;

        match message {
            ClientMessage::PerformAction {
                combatant_id,
                action,
                ..
            } => {
                handle.authorize(player, combatant_id)?;
                handle.perform_action(combatant_id, action).await
            }
            ClientMessage::AnimationComplete { .. } => handle.animation_complete().await,
        }
    }
}

/// Stable seed for a session id within one build.
fn seed_for(session_id: &SessionId) -> u64 {
    let mut hasher = DefaultHasher::new();
    session_id.hash(&mut hasher);
    hasher.finish()
}
