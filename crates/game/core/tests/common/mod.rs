//! Shared fixtures for battle-core integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use battle_core::{
    Ability, AbilityCatalog, AbilityEffect, AbilityId, BattleAction, BattleConfig, BattleEnv,
    BattleSession, BattleState, Class, ClassCatalog, ClassProfile, CombatantId, EnemyBehavior,
    EnemyCatalog, EnemySpec, EnemyTemplate, PartyMember, StatusApplication,
    StatusEffectRegistry, StatusKind, TargetKind,
};

pub const WARRIOR: CombatantId = CombatantId(1);
pub const SECOND: CombatantId = CombatantId(2);

fn ids(names: &[&str]) -> Vec<AbilityId> {
    names.iter().map(|name| AbilityId::new(*name)).collect()
}

pub fn abilities() -> Vec<Ability> {
    vec![
        Ability::new("fireball", "Fireball", TargetKind::SingleEnemy)
            .restricted_to(Class::Mage)
            .costing(30)
            .with_cooldown(2)
            .with_effect(AbilityEffect::Damage { bonus: 10 })
            .with_effect(AbilityEffect::ApplyStatus(StatusApplication::new(
                StatusKind::Burn,
                3,
                2,
            ))),
        Ability::new("frost_bolt", "Frost Bolt", TargetKind::SingleEnemy)
            .restricted_to(Class::Mage)
            .costing(10)
            .with_effect(AbilityEffect::Damage { bonus: 2 })
            .with_effect(AbilityEffect::ApplyStatus(StatusApplication::new(
                StatusKind::Freeze,
                0,
                1,
            ))),
        Ability::new("cleave", "Cleave", TargetKind::AllEnemies)
            .restricted_to(Class::Warrior)
            .with_cooldown(2)
            .with_effect(AbilityEffect::Damage { bonus: 2 }),
        Ability::new("war_cry", "War Cry", TargetKind::SelfOnly)
            .restricted_to(Class::Warrior)
            .with_cooldown(2)
            .with_effect(AbilityEffect::ApplyStatus(StatusApplication::new(
                StatusKind::Buff,
                5,
                2,
            ))),
        Ability::new("venom", "Venom", TargetKind::SingleEnemy)
            .restricted_to(Class::Rogue)
            .costing(5)
            .with_effect(AbilityEffect::Damage { bonus: 0 })
            .with_effect(AbilityEffect::ApplyStatus(StatusApplication::new(
                StatusKind::Poison,
                3,
                3,
            ))),
        Ability::new("mend", "Mend", TargetKind::SingleAlly)
            .restricted_to(Class::Cleric)
            .costing(10)
            .with_effect(AbilityEffect::Heal { amount: 25 }),
        Ability::new("bite", "Bite", TargetKind::SingleEnemy)
            .costing(5)
            .with_effect(AbilityEffect::Damage { bonus: 6 }),
        Ability::new("lick_wounds", "Lick Wounds", TargetKind::SelfOnly)
            .costing(10)
            .with_effect(AbilityEffect::Heal { amount: 15 }),
        Ability::new("spit", "Spit", TargetKind::SingleEnemy).with_effect(
            AbilityEffect::ApplyStatus(StatusApplication::new(StatusKind::Poison, 2, 2)),
        ),
    ]
}

pub fn classes() -> Vec<ClassProfile> {
    vec![
        ClassProfile {
            class: Class::Warrior,
            hp: 100,
            mana: 10,
            power: 20,
            armor: 3,
            abilities: ids(&["cleave", "war_cry"]),
        },
        ClassProfile {
            class: Class::Mage,
            hp: 70,
            mana: 10,
            power: 8,
            armor: 0,
            abilities: ids(&["fireball", "frost_bolt"]),
        },
        ClassProfile {
            class: Class::Rogue,
            hp: 80,
            mana: 20,
            power: 12,
            armor: 1,
            abilities: ids(&["venom"]),
        },
        ClassProfile {
            class: Class::Cleric,
            hp: 75,
            mana: 40,
            power: 6,
            armor: 2,
            abilities: ids(&["mend"]),
        },
    ]
}

pub fn templates() -> Vec<EnemyTemplate> {
    vec![
        EnemyTemplate::new(
            "dummy",
            "Training Dummy",
            vec![EnemySpec::new("Dummy", 40, 5, 5)],
        )
        .with_rewards(30, 10, 5),
        EnemyTemplate::new("brute", "Brute", vec![EnemySpec::new("Brute", 60, 20, 0)])
            .with_rewards(50, 25, 6),
        EnemyTemplate::new(
            "pack",
            "Wolf Pack",
            vec![
                EnemySpec::new("Wolf", 15, 6, 0),
                EnemySpec::new("Wolf", 15, 6, 0),
            ],
        )
        .with_rewards(20, 8, 4),
        EnemyTemplate::new(
            "den",
            "Wolf Den",
            vec![
                EnemySpec::new("Alpha", 45, 9, 2)
                    .with_mana(20)
                    .with_abilities(ids(&["bite", "lick_wounds"])),
                EnemySpec::new("Howler", 30, 7, 1)
                    .with_mana(10)
                    .with_abilities(ids(&["bite"]))
                    .with_behavior(EnemyBehavior::Weighted {
                        attack: 50,
                        ability: 30,
                        defend: 20,
                    }),
            ],
        )
        .with_rewards(60, 30, 8),
        EnemyTemplate::new(
            "nest",
            "Spitter Nest",
            vec![
                EnemySpec::new("Spitter", 30, 4, 0)
                    .with_abilities(ids(&["spit"]))
                    .with_behavior(EnemyBehavior::Weighted {
                        attack: 0,
                        ability: 1,
                        defend: 0,
                    }),
            ],
        )
        .with_rewards(10, 5, 4),
    ]
}

pub fn env() -> Arc<BattleEnv> {
    let abilities = AbilityCatalog::new(abilities()).unwrap();
    let classes = ClassCatalog::new(classes(), &abilities).unwrap();
    let enemies = EnemyCatalog::new(templates(), &abilities).unwrap();
    Arc::new(BattleEnv::new(
        BattleConfig::default(),
        abilities,
        classes,
        enemies,
        StatusEffectRegistry::default(),
    ))
}

pub fn member(id: u32, class: Class, owner: &str) -> PartyMember {
    PartyMember::new(CombatantId(id), format!("{class}-{id}"), class, owner)
}

/// Creates a session and plays the intro so the first ally can act.
pub fn start(roster: &[PartyMember], template: &str, seed: u64) -> BattleSession {
    let mut session = BattleSession::from_catalog("game-1", roster, template, env(), seed).unwrap();
    session.complete_intro().unwrap();
    session.run_pending_turns();
    session
}

pub fn solo(class: Class, template: &str) -> BattleSession {
    start(&[member(1, class, "alice")], template, 7)
}

/// Submits an action, resolves the enemy turns that follow and settles.
pub fn play(session: &mut BattleSession, actor: CombatantId, action: BattleAction) {
    session.submit_action(actor, action).unwrap();
    session.run_pending_turns();
    session.settle();
}

/// Plays one ally turn: the turn owner attacks the first live enemy.
pub fn step(session: &mut BattleSession) {
    assert_eq!(session.state(), BattleState::AwaitingAction);
    let owner = session.turn_owner().unwrap();
    let target = session
        .combatants()
        .iter()
        .find(|c| !c.is_player() && c.in_rotation())
        .map(|c| c.id)
        .unwrap();
    play(session, owner, BattleAction::attack(target));
}

/// Drives a battle to the end with [`step`].
pub fn autopilot(session: &mut BattleSession, max_steps: usize) {
    for _ in 0..max_steps {
        if session.is_finished() {
            return;
        }
        step(session);
    }
    assert!(session.is_finished(), "battle did not finish within {max_steps} steps");
}
