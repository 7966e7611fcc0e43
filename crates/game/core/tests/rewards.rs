mod common;

use battle_core::{
    BattleAction, BattleError, BattleOutcome, BattleState, Class, CombatantId, RewardResolver,
};
use common::{WARRIOR, autopilot, play, solo};

#[test]
fn rewards_are_granted_exactly_once() {
    let mut session = solo(Class::Warrior, "dummy");
    autopilot(&mut session, 10);
    assert_eq!(session.outcome(), Some(BattleOutcome::Victory));

    let first = RewardResolver::resolve(&mut session).unwrap();
    let second = RewardResolver::resolve(&mut session).unwrap();

    let record = first.expect("first call grants rewards");
    // Three ally turns against par 5: two spare turns
    assert_eq!(record.turns_taken, 3);
    assert_eq!(record.xp, 40);
    assert_eq!(record.gold, 12);
    assert_eq!(record.recipients, vec![WARRIOR]);
    assert_eq!(record.session_id.as_str(), "game-1");
    assert!(second.is_none());
    assert!(session.rewards_granted());
}

#[test]
fn running_battle_has_no_rewards() {
    let mut session = solo(Class::Warrior, "dummy");
    assert_eq!(
        RewardResolver::resolve(&mut session),
        Err(BattleError::NotTerminal {
            state: BattleState::AwaitingAction
        })
    );
    assert!(!session.rewards_granted());
}

#[test]
fn teardown_waits_for_rewards() {
    let mut session = solo(Class::Warrior, "dummy");
    autopilot(&mut session, 10);

    assert_eq!(session.teardown(), Err(BattleError::RewardsPending));
    RewardResolver::resolve(&mut session).unwrap();
    session.teardown().unwrap();
    assert_eq!(session.state(), BattleState::Idle);
    assert_eq!(session.outcome(), Some(BattleOutcome::Victory));
}

#[test]
fn defeat_produces_an_empty_record_once() {
    let mut session = solo(Class::Mage, "brute");
    let brute = CombatantId(2);
    for _ in 0..10 {
        if session.is_finished() {
            break;
        }
        play(&mut session, WARRIOR, BattleAction::attack(brute));
    }
    assert_eq!(session.state(), BattleState::Defeat);

    let record = RewardResolver::resolve(&mut session).unwrap().unwrap();
    assert_eq!((record.xp, record.gold), (0, 0));
    assert!(record.recipients.is_empty());
    assert_eq!(RewardResolver::resolve(&mut session), Ok(None));
}

#[test]
fn escaped_battle_grants_nothing() {
    let mut session = solo(Class::Warrior, "brute");
    session.submit_action(WARRIOR, BattleAction::Flee).unwrap();
    assert_eq!(RewardResolver::resolve(&mut session), Ok(None));
}
