use std::fs;
use std::sync::Arc;

use battle_content::ContentFactory;
use battle_core::{
    BattleAction, BattleSession, BattleState, Class, CombatantId, PartyMember, StackPolicy,
    StatusKind,
};
use tempfile::TempDir;

const ABILITIES: &str = r#"
#![enable(implicit_some)]
(abilities: [
    (id: "slam", name: "Slam", class_restriction: Warrior, mana_cost: 0, target: SingleEnemy, effects: [Damage(bonus: 5)]),
    (id: "spark", name: "Spark", class_restriction: Mage, mana_cost: 5, target: SingleEnemy, effects: [Damage(bonus: 3)]),
    (id: "sneak", name: "Sneak", class_restriction: Rogue, mana_cost: 0, target: SelfOnly, effects: [ApplyStatus((kind: Buff, magnitude: 2, turns: 2))]),
    (id: "pray", name: "Pray", class_restriction: Cleric, mana_cost: 5, target: SingleAlly, effects: [Heal(amount: 10)]),
])
"#;

const CLASSES: &str = r#"
(classes: [
    (class: Warrior, hp: 50, mana: 0, power: 10, armor: 2, abilities: ["slam"]),
    (class: Mage, hp: 30, mana: 20, power: 6, armor: 0, abilities: ["spark"]),
    (class: Rogue, hp: 40, mana: 0, power: 8, armor: 1, abilities: ["sneak"]),
    (class: Cleric, hp: 35, mana: 30, power: 5, armor: 1, abilities: ["pray"]),
])
"#;

const ENEMIES: &str = r#"
(templates: [
    (id: "slime", name: "Slime", enemies: [(name: "Slime", hp: 8, power: 3)], xp: 10, gold: 2, par_turns: 2),
])
"#;

fn write_pack(dir: &TempDir) {
    fs::write(dir.path().join("abilities.ron"), ABILITIES).unwrap();
    fs::write(dir.path().join("classes.ron"), CLASSES).unwrap();
    fs::write(dir.path().join("enemies.ron"), ENEMIES).unwrap();
}

#[test]
fn loads_directory_with_optional_files_missing() {
    let dir = TempDir::new().unwrap();
    write_pack(&dir);

    let env = ContentFactory::new(dir.path()).load_env().unwrap();

    assert_eq!(env.abilities().len(), 4);
    assert_eq!(env.classes().get(Class::Mage).hp, 30);
    assert_eq!(env.config().defend_divisor, 2);
    assert_eq!(
        env.statuses().rule(StatusKind::Poison).stack_policy,
        StackPolicy::Stack
    );
}

#[test]
fn config_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    write_pack(&dir);
    fs::write(dir.path().join("battle.toml"), "min_damage = 3\n").unwrap();

    let env = ContentFactory::new(dir.path()).load_env().unwrap();

    assert_eq!(env.config().min_damage, 3);
    assert_eq!(env.config().mana_regen_per_turn, 5);
}

#[test]
fn loaded_content_drives_a_battle() {
    let dir = TempDir::new().unwrap();
    write_pack(&dir);
    let env = Arc::new(ContentFactory::new(dir.path()).load_env().unwrap());

    let roster = [PartyMember::new(CombatantId(1), "Brann", Class::Warrior, "p1")];
    let mut session = BattleSession::from_catalog("s1", &roster, "slime", env, 7).unwrap();
    session.complete_intro().unwrap();

    let slime = CombatantId(2);
    let record = session
        .submit_action(CombatantId(1), BattleAction::ability("slam", Some(slime)))
        .unwrap();

    // 10 power + 5 bonus against 0 armor overkills the 8 HP slime
    assert_eq!(record.summary.total_damage(), 8);
    assert_eq!(session.state(), BattleState::Victory);
}

#[test]
fn unknown_kit_entry_names_the_file() {
    let dir = TempDir::new().unwrap();
    write_pack(&dir);
    fs::write(
        dir.path().join("enemies.ron"),
        r#"(templates: [(id: "slime", name: "Slime", enemies: [(name: "Slime", hp: 8, power: 3, abilities: ["acid"])])])"#,
    )
    .unwrap();

    let err = ContentFactory::new(dir.path()).load_env().unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("enemies.ron"), "{message}");
    assert!(message.contains("acid"), "{message}");
}

#[test]
fn malformed_ron_is_reported() {
    let dir = TempDir::new().unwrap();
    write_pack(&dir);
    fs::write(dir.path().join("classes.ron"), "(classes: [").unwrap();

    let err = ContentFactory::new(dir.path()).load_env().unwrap_err();
    assert!(err.to_string().contains("class profiles"));
}

#[test]
fn missing_required_file_fails() {
    let dir = TempDir::new().unwrap();
    let err = ContentFactory::new(dir.path()).load_env().unwrap_err();
    assert!(err.to_string().contains("abilities.ron"));
}
