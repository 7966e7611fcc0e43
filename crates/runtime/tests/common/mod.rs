#![allow(dead_code)]

use std::sync::Arc;

use battle_content::ContentFactory;
use battle_core::{
    ActionRecord, BattleAction, BattleSnapshot, BattleState, Class, CombatantId, PartyMember,
    PlayerId, SessionId,
};
use battle_runtime::{ClientMessage, RealtimeChannel, RuntimeConfig, ServerMessage, Subscription};

pub const WARRIOR: CombatantId = CombatantId(1);
/// First enemy id for a single-member party.
pub const DUMMY: CombatantId = CombatantId(2);

pub fn channel() -> RealtimeChannel {
    let env = ContentFactory::builtin().expect("built-in content");
    RealtimeChannel::new(Arc::new(env), RuntimeConfig::default())
}

pub fn player(name: &str) -> PlayerId {
    PlayerId::new(name)
}

pub fn warrior(owner: &str) -> Vec<PartyMember> {
    vec![PartyMember::new(WARRIOR, "Brann", Class::Warrior, owner)]
}

pub fn perform(session: &str, combatant: CombatantId, action: BattleAction) -> ClientMessage {
    ClientMessage::PerformAction {
        session_id: SessionId::new(session),
        combatant_id: combatant,
        action,
    }
}

pub fn ack(session: &str) -> ClientMessage {
    ClientMessage::AnimationComplete {
        session_id: SessionId::new(session),
    }
}

pub async fn next(subscription: &mut Subscription) -> ServerMessage {
    subscription
        .recv()
        .await
        .expect("subscriber kept up")
        .expect("session still broadcasting")
}

pub fn entry(message: &ServerMessage) -> Option<&ActionRecord> {
    match message {
        ServerMessage::StateDelta { entry, .. } => entry.as_ref(),
        _ => None,
    }
}

/// Creates a session, plays the intro and settles on the first player turn.
///
/// Returns the subscription and the client-side view folded from it.
pub async fn start(
    channel: &RealtimeChannel,
    session: &str,
    owner: &str,
    template: &str,
) -> (Subscription, BattleSnapshot) {
    channel
        .create_session_with_seed(session, &warrior(owner), template, 42)
        .await
        .expect("session created");

    let mut subscription = channel
        .subscribe(&SessionId::new(session))
        .await
        .expect("subscribed");
    let mut view = subscription.snapshot().clone();
    assert_eq!(view.state, BattleState::Intro);

    let owner = player(owner);
    channel.dispatch(&owner, ack(session)).await.unwrap();
    next(&mut subscription).await.apply_to(&mut view);
    channel.dispatch(&owner, ack(session)).await.unwrap();

    assert_eq!(view.state, BattleState::AwaitingAction);
    assert_eq!(view.turn_owner, Some(WARRIOR));
    (subscription, view)
}
