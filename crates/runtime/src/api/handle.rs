//! Cloneable façade for issuing commands to one session worker.
//!
//! [`SessionHandle`] hides the channel plumbing; [`Subscription`] is the
//! per-client view of the session's broadcast stream.
use std::collections::HashMap;
use std::sync::Arc;

use battle_core::{BattleAction, BattleSnapshot, CombatantId, PlayerId, SessionId};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::events::{DeltaPayload, ServerMessage};
use crate::workers::Command;

/// Client-facing handle to a running session.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    session_id: SessionId,
    command_tx: mpsc::Sender<Command>,
    /// Controller of every player combatant; fixed when the battle starts.
    owners: Arc<HashMap<CombatantId, PlayerId>>,
}

impl SessionHandle {
    pub(crate) fn new(
        session_id: SessionId,
        command_tx: mpsc::Sender<Command>,
        owners: HashMap<CombatantId, PlayerId>,
    ) -> Self {
        Self {
            session_id,
            command_tx,
            owners: Arc::new(owners),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn owner_of(&self, combatant: CombatantId) -> Option<&PlayerId> {
        self.owners.get(&combatant)
    }

    /// Checks that `player` controls `combatant` in this session.
    pub fn authorize(&self, player: &PlayerId, combatant: CombatantId) -> Result<()> {
        match self.owner_of(combatant) {
            Some(owner) if owner == player => Ok(()),
            _ => Err(RuntimeError::UnauthorizedCombatant {
                player: player.clone(),
                combatant,
            }),
        }
    }

    /// Submit an action for `combatant`; ownership must already be checked.
    pub async fn perform_action(
        &self,
        combatant: CombatantId,
        action: BattleAction,
    ) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::PerformAction {
            combatant,
            action,
            reply: reply_tx,
        })
        .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Report that a client finished animating the last delta.
    pub async fn animation_complete(&self) -> Result<()> {
        self.send(Command::AnimationComplete).await
    }

    /// Subscribe to the session's broadcast stream.
    ///
    /// The snapshot and the receiver are taken together inside the worker.
    /// The snapshot includes resolved steps whose deltas are still paced;
    /// [`Subscription::recv`] drops those deltas when they go out.
    pub async fn subscribe(&self) -> Result<Subscription> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Subscribe { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Query the authoritative state (read-only snapshot).
    pub async fn query_snapshot(&self) -> Result<BattleSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::QuerySnapshot { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Ask the worker to stop; subscribers receive `SessionClosed`.
    pub async fn close(&self) -> Result<()> {
        self.send(Command::Close).await
    }

    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}

/// One client's subscription to a session.
#[derive(Debug)]
pub struct Subscription {
    snapshot: BattleSnapshot,
    seq: u64,
    receiver: broadcast::Receiver<ServerMessage>,
}

impl Subscription {
    pub(crate) fn new(
        snapshot: BattleSnapshot,
        seq: u64,
        receiver: broadcast::Receiver<ServerMessage>,
    ) -> Self {
        Self {
            snapshot,
            seq,
            receiver,
        }
    }

    /// State as of subscription time.
    pub fn snapshot(&self) -> &BattleSnapshot {
        &self.snapshot
    }

    /// Sequence of the last delta already folded into [`snapshot`](Self::snapshot).
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The snapshot as the first message a transport should forward.
    pub fn snapshot_message(&self) -> ServerMessage {
        ServerMessage::StateDelta {
            session_id: self.snapshot.session_id.clone(),
            seq: self.seq,
            payload: DeltaPayload::Snapshot(Box::new(self.snapshot.clone())),
            entry: None,
        }
    }

    /// Next broadcast message, or `None` once the session worker is gone.
    ///
    /// Deltas already folded into the snapshot are skipped.
    pub async fn recv(&mut self) -> Result<Option<ServerMessage>> {
        loop {
            let message = match self.receiver.recv().await {
                Ok(message) => message,
                Err(broadcast::error::RecvError::Closed) => return Ok(None),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    return Err(RuntimeError::SubscriberLagged { skipped });
                }
            };
            match message {
                ServerMessage::StateDelta { seq, .. } if seq <= self.seq => continue,
                message => return Ok(Some(message)),
            }
        }
    }
}
