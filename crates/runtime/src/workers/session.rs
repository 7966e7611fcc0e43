//! Session worker that owns one authoritative [`BattleSession`].
//!
//! Receives commands from [`crate::SessionHandle`], resolves actions through
//! the battle core, and broadcasts the resulting deltas paced by client
//! animation acknowledgements.

use battle_core::{
    ActionRecord, BattleAction, BattleError, BattleSession, BattleSnapshot, BattleState,
    CombatantId, GameError, RewardResolver, SessionId, SnapshotDiff,
};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use super::{Batch, BroadcastPacer};
use crate::api::{Result, SessionRegistry, Subscription};
use crate::config::RuntimeConfig;
use crate::events::{DeltaPayload, ServerMessage};

/// Commands that can be sent to a session worker.
#[derive(Debug)]
pub(crate) enum Command {
    /// Validate and resolve an action; ownership is checked by the caller.
    PerformAction {
        combatant: CombatantId,
        action: BattleAction,
        reply: oneshot::Sender<Result<()>>,
    },
    /// A client finished animating the last released delta.
    AnimationComplete,
    /// Snapshot plus a receiver positioned right after it.
    Subscribe { reply: oneshot::Sender<Subscription> },
    /// Authoritative state, regardless of what has been broadcast.
    QuerySnapshot { reply: oneshot::Sender<BattleSnapshot> },
    /// Stop the session without an outcome.
    Close,
}

/// Background task that owns one battle.
pub(crate) struct SessionWorker {
    session: BattleSession,
    config: RuntimeConfig,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<ServerMessage>,
    registry: SessionRegistry,
    pacer: BroadcastPacer,
    /// Authoritative state as of the last queued batch; what new
    /// subscribers start from.
    latest: BattleSnapshot,
    next_seq: u64,
    intro_deadline: Option<Instant>,
    idle_deadline: Option<Instant>,
    closed: bool,
}

impl SessionWorker {
    pub fn new(
        session: BattleSession,
        config: RuntimeConfig,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<ServerMessage>,
        registry: SessionRegistry,
    ) -> Self {
        let snapshot = session.snapshot();
        let intro_deadline =
            (session.state() == BattleState::Intro).then(|| Instant::now() + config.intro_timeout);

        Self {
            pacer: BroadcastPacer::new(config.animation_timeout),
            session,
            config,
            command_rx,
            event_tx,
            registry,
            latest: snapshot,
            next_seq: 1,
            intro_deadline,
            idle_deadline: None,
            closed: false,
        }
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        self.latest.clone()
    }

    fn session_id(&self) -> &SessionId {
        self.session.session_id()
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        info!(
            target: "runtime::session",
            session = %self.session_id(),
            template = %self.session.template().id,
            seed = self.session.seed(),
            "Session started"
        );

        while !self.closed {
            let deadline = self.next_deadline();
            let timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                () = timer => self.handle_timer(Instant::now()).await,
            }
        }

        if !self.closed {
            self.registry.remove(self.session.session_id()).await;
        }
        info!(
            target: "runtime::session",
            session = %self.session_id(),
            outcome = ?self.session.outcome(),
            turns = self.session.turn_number(),
            "Session closed"
        );
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::PerformAction {
                combatant,
                action,
                reply,
            } => {
                let result = self.perform_action(combatant, action).await;
                let _ = reply.send(result);
            }
            Command::AnimationComplete => self.animation_complete().await,
            Command::Subscribe { reply } => {
                // Queued batches at or below this seq are already in the snapshot
                let subscription = Subscription::new(
                    self.latest.clone(),
                    self.next_seq - 1,
                    self.event_tx.subscribe(),
                );
                let _ = reply.send(subscription);
            }
            Command::QuerySnapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::Close => self.close().await,
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        if self.pacer.is_busy() {
            return self.pacer.deadline();
        }
        match self.session.state() {
            BattleState::Intro => self.intro_deadline,
            BattleState::AwaitingAction => self.idle_deadline,
            _ => None,
        }
    }

    async fn handle_timer(&mut self, now: Instant) {
        let due = |deadline: Option<Instant>| deadline.is_some_and(|at| at <= now);

        if self.pacer.is_busy() {
            if due(self.pacer.deadline()) {
                debug!(
                    target: "runtime::session",
                    session = %self.session_id(),
                    "Animation timeout; releasing without acknowledgement"
                );
                self.acknowledge().await;
            }
            return;
        }

        match self.session.state() {
            BattleState::Intro if due(self.intro_deadline) => self.complete_intro().await,
            BattleState::AwaitingAction if due(self.idle_deadline) => self.idle_timeout().await,
            _ => {}
        }
    }

    async fn perform_action(
        &mut self,
        combatant: CombatantId,
        action: BattleAction,
    ) -> Result<()> {
        if self.pacer.is_busy() {
            return Err(BattleError::ActionInFlight.into());
        }

        let record = match self.session.submit_action(combatant, action) {
            Ok(record) => record,
            Err(error) => {
                debug!(
                    target: "runtime::session",
                    session = %self.session_id(),
                    combatant = %combatant,
                    code = error.error_code(),
                    error = %error,
                    "Action rejected"
                );
                return Err(error.into());
            }
        };

        info!(
            target: "runtime::session",
            session = %self.session_id(),
            combatant = %combatant,
            kind = %record.kind,
            turn = record.turn_number,
            "Action resolved"
        );
        self.idle_deadline = None;
        self.run_resolution(Some(record)).await;
        Ok(())
    }

    async fn animation_complete(&mut self) {
        if self.pacer.is_waiting() {
            self.acknowledge().await;
        } else if self.session.state() == BattleState::Intro {
            self.complete_intro().await;
        } else {
            trace!(
                target: "runtime::session",
                session = %self.session_id(),
                "Ignoring acknowledgement with nothing pending"
            );
        }
    }

    async fn complete_intro(&mut self) {
        self.intro_deadline = None;
        if let Err(error) = self.session.complete_intro() {
            warn!(
                target: "runtime::session",
                session = %self.session_id(),
                error = %error,
                "Intro could not complete"
            );
            return;
        }
        self.run_resolution(None).await;
    }

    async fn idle_timeout(&mut self) {
        self.idle_deadline = None;
        match self.session.submit_default_action() {
            Ok(record) => {
                info!(
                    target: "runtime::session",
                    session = %self.session_id(),
                    combatant = %record.actor,
                    "Idle timeout; defending"
                );
                self.run_resolution(Some(record)).await;
            }
            Err(error) => debug!(
                target: "runtime::session",
                session = %self.session_id(),
                error = %error,
                "Idle timeout ignored"
            ),
        }
    }

    /// Queues the step that just resolved plus every automatic turn after it,
    /// then releases the first batch.
    async fn run_resolution(&mut self, first: Option<ActionRecord>) {
        self.queue_step(first);
        while let Some(record) = self.session.resolve_pending_turn() {
            debug!(
                target: "runtime::session",
                session = %self.session_id(),
                combatant = %record.actor,
                kind = %record.kind,
                automatic = record.automatic,
                "Automatic turn resolved"
            );
            self.queue_step(Some(record));
        }

        if self.session.is_finished() {
            self.queue_closing();
        }

        if let Some(batch) = self.pacer.release_next(Instant::now()) {
            self.publish(batch).await;
        }
    }

    fn queue_step(&mut self, entry: Option<ActionRecord>) {
        let after = self.session.snapshot();
        let diff = SnapshotDiff::between(&self.latest, &after);
        let seq = self.next_seq;
        self.next_seq += 1;

        let message = ServerMessage::StateDelta {
            session_id: self.session_id().clone(),
            seq,
            payload: DeltaPayload::Diff(diff),
            entry,
        };
        self.latest = after;
        self.pacer.push(Batch {
            seq,
            messages: vec![message],
            closes: false,
        });
    }

    /// Attaches the reward and the close notice to the terminal delta.
    fn queue_closing(&mut self) {
        let session_id = self.session_id().clone();
        let outcome = self.session.outcome();

        let reward = match RewardResolver::resolve(&mut self.session) {
            Ok(reward) => reward,
            Err(error) => {
                error!(
                    target: "runtime::session",
                    session = %session_id,
                    error = %error,
                    "Reward resolution failed"
                );
                None
            }
        };
        if let Err(error) = self.session.teardown() {
            error!(
                target: "runtime::session",
                session = %session_id,
                error = %error,
                "Teardown failed"
            );
        }

        let Some(batch) = self.pacer.last_mut() else {
            return;
        };
        if let Some(reward) = reward {
            info!(
                target: "runtime::session",
                session = %session_id,
                xp = reward.xp,
                gold = reward.gold,
                recipients = reward.recipients.len(),
                "Rewards granted"
            );
            batch.messages.push(ServerMessage::Reward {
                session_id: session_id.clone(),
                reward,
            });
        }
        batch.messages.push(ServerMessage::SessionClosed {
            session_id,
            outcome,
        });
        batch.closes = true;
    }

    async fn acknowledge(&mut self) {
        match self.pacer.acknowledge(Instant::now()) {
            Some(batch) => self.publish(batch).await,
            None => self.settle(),
        }
    }

    fn settle(&mut self) {
        self.session.settle();
        self.latest.action_in_flight = false;

        if self.session.state() == BattleState::AwaitingAction {
            self.idle_deadline = Some(Instant::now() + self.config.idle_timeout);
        }
    }

    async fn publish(&mut self, batch: Batch) {
        trace!(
            target: "runtime::session",
            session = %self.session_id(),
            seq = batch.seq,
            messages = batch.messages.len(),
            "Releasing batch"
        );

        if batch.closes {
            // Unregister first so a client reacting to the close never finds the session
            self.registry.remove(self.session.session_id()).await;
            self.closed = true;
        }

        for message in batch.messages {
            if self.event_tx.send(message).is_err() {
                trace!(
                    target: "runtime::session",
                    session = %self.session_id(),
                    "No subscribers for broadcast"
                );
            }
        }
    }

    async fn close(&mut self) {
        let discarded = self.pacer.clear();
        if discarded > 0 {
            warn!(
                target: "runtime::session",
                session = %self.session_id(),
                discarded,
                "Closing with undelivered deltas"
            );
        }

        self.registry.remove(self.session.session_id()).await;
        self.closed = true;
        let notice = ServerMessage::SessionClosed {
            session_id: self.session_id().clone(),
            outcome: self.session.outcome(),
        };
        if self.event_tx.send(notice).is_err() {
            trace!(
                target: "runtime::session",
                session = %self.session_id(),
                "No subscribers for close notice"
            );
        }
    }
}
