//! Client loop that plays every party member with the built-in policy.

use anyhow::{Result, bail};
use battle_core::{
    AiContext, BattleAction, BattleOutcome, BattleSnapshot, BattleState, EnemyAi, SessionId,
};
use battle_runtime::{ClientMessage, RealtimeChannel, ServerMessage};

/// Drives one session from its intro to `SessionClosed`.
pub struct Autopilot {
    channel: RealtimeChannel,
    session_id: SessionId,
}

impl Autopilot {
    pub fn new(channel: RealtimeChannel, session_id: impl Into<SessionId>) -> Self {
        Self {
            channel,
            session_id: session_id.into(),
        }
    }

    /// Plays until the session closes, printing every message as JSON.
    pub async fn run(self) -> Result<Option<BattleOutcome>> {
        let mut subscription = self.channel.subscribe(&self.session_id).await?;
        let mut view = subscription.snapshot().clone();
        print(&subscription.snapshot_message())?;

        // Skip the intro animation
        self.acknowledge(&view).await;

        while let Some(message) = subscription.recv().await? {
            print(&message)?;
            message.apply_to(&mut view);

            match message {
                ServerMessage::StateDelta { .. } => {
                    self.acknowledge(&view).await;
                    if view.state == BattleState::AwaitingAction {
                        self.act(&view).await;
                    }
                }
                ServerMessage::Reward { .. } => {}
                ServerMessage::SessionClosed { outcome, .. } => return Ok(outcome),
            }
        }

        bail!("session {} ended without a close notice", self.session_id)
    }

    async fn acknowledge(&self, view: &BattleSnapshot) {
        let Some(player) = view.combatants.iter().find_map(|c| c.owner.clone()) else {
            return;
        };
        let message = ClientMessage::AnimationComplete {
            session_id: self.session_id.clone(),
        };
        // The session may already be gone after its final delta
        let _ = self.channel.dispatch(&player, message).await;
    }

    async fn act(&self, view: &BattleSnapshot) {
        let Some(actor) = view.turn_owner.and_then(|id| view.combatant(id)) else {
            return;
        };
        let Some(player) = actor.owner.clone() else {
            return;
        };

        let env = self.channel.env();
        let decision = EnemyAi::decide(&AiContext::from_snapshot(view, env), actor.id);

        let request = |action: BattleAction| ClientMessage::PerformAction {
            session_id: self.session_id.clone(),
            combatant_id: actor.id,
            action,
        };

        if let Err(rejection) = self.channel.dispatch(&player, request(decision)).await {
            tracing::warn!(
                combatant = %actor.id,
                code = %rejection.code,
                "Autopilot action rejected; defending"
            );
            let _ = self.channel.dispatch(&player, request(BattleAction::Defend)).await;
        }
    }
}

fn print(message: &ServerMessage) -> Result<()> {
    println!("{}", serde_json::to_string(message)?);
    Ok(())
}
