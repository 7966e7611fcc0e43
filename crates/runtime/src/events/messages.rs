use battle_core::{
    ActionRecord, BattleAction, BattleOutcome, BattleSnapshot, CombatantId, RewardRecord,
    SessionId, SnapshotDiff,
};
use serde::{Deserialize, Serialize};

/// Inbound request from a connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    PerformAction {
        session_id: SessionId,
        combatant_id: CombatantId,
        action: BattleAction,
    },
    /// The client finished playing the last delta it received.
    AnimationComplete { session_id: SessionId },
}

impl ClientMessage {
    pub fn session_id(&self) -> &SessionId {
        match self {
            ClientMessage::PerformAction { session_id, .. }
            | ClientMessage::AnimationComplete { session_id } => session_id,
        }
    }
}

/// State carried by a [`ServerMessage::StateDelta`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum DeltaPayload {
    /// Full state; sent on subscription.
    Snapshot(Box<BattleSnapshot>),
    /// Changes since the previous delta.
    Diff(SnapshotDiff),
}

/// Outbound message broadcast to every subscriber of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    StateDelta {
        session_id: SessionId,
        /// Position in the session's delta stream; a snapshot carries the
        /// sequence of the last delta it already includes.
        seq: u64,
        payload: DeltaPayload,
        /// Log entry produced by the resolved step, if any.
        entry: Option<ActionRecord>,
    },
    Reward {
        session_id: SessionId,
        reward: RewardRecord,
    },
    SessionClosed {
        session_id: SessionId,
        outcome: Option<BattleOutcome>,
    },
}

impl ServerMessage {
    pub fn session_id(&self) -> &SessionId {
        match self {
            ServerMessage::StateDelta { session_id, .. }
            | ServerMessage::Reward { session_id, .. }
            | ServerMessage::SessionClosed { session_id, .. } => session_id,
        }
    }

    /// Folds a delta into a client-side view of the battle.
    ///
    /// Snapshots replace the view; diffs and their entry are applied on top.
    /// Other messages leave the view untouched.
    pub fn apply_to(&self, view: &mut BattleSnapshot) {
        if let ServerMessage::StateDelta { payload, entry, .. } = self {
            match payload {
                DeltaPayload::Snapshot(snapshot) => *view = (**snapshot).clone(),
                DeltaPayload::Diff(diff) => view.apply_delta(diff, entry.as_ref()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_use_snake_case_tags() {
        let json = r#"{
            "type": "perform_action",
            "session_id": "ABCD",
            "combatant_id": 1,
            "action": {"type": "attack", "target": 3}
        }"#;
        let message: ClientMessage = serde_json::from_str(json).unwrap();

        assert_eq!(
            message,
            ClientMessage::PerformAction {
                session_id: SessionId::new("ABCD"),
                combatant_id: CombatantId(1),
                action: BattleAction::attack(CombatantId(3)),
            }
        );

        let ack: ClientMessage =
            serde_json::from_str(r#"{"type": "animation_complete", "session_id": "ABCD"}"#)
                .unwrap();
        assert_eq!(ack.session_id().as_str(), "ABCD");
    }

    #[test]
    fn session_closed_encodes_outcome() {
        let message = ServerMessage::SessionClosed {
            session_id: SessionId::new("ABCD"),
            outcome: Some(BattleOutcome::Victory),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "session_closed");
        assert_eq!(value["outcome"], "victory");
    }

    #[test]
    fn cleared_turn_owner_survives_the_wire() {
        let diff = SnapshotDiff {
            turn_owner: Some(None),
            outcome: Some(Some(BattleOutcome::Defeat)),
            ..SnapshotDiff::default()
        };
        let message = ServerMessage::StateDelta {
            session_id: SessionId::new("ABCD"),
            seq: 9,
            payload: DeltaPayload::Diff(diff.clone()),
            entry: None,
        };

        let value = serde_json::to_value(&message).unwrap();
        let data = &value["payload"]["data"];
        assert!(data.get("turn_owner").is_some_and(|v| v.is_null()));
        assert!(data.get("turn_number").is_some_and(|v| v.is_null()));
        assert_eq!(data["outcome"], "defeat");

        let decoded: ServerMessage = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, message);

        let unchanged = serde_json::to_value(SnapshotDiff::default()).unwrap();
        assert!(unchanged.get("turn_owner").is_none());
    }
}
