/// Battle balance constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Lower bound for any damaging hit after armor.
    pub min_damage: u32,
    /// Incoming hit damage is divided by this while the defender is defending.
    pub defend_divisor: u32,
    /// Mana restored to the acting combatant at the end of each of its turns.
    pub mana_regen_per_turn: u32,
    /// Aggressive enemies try to heal themselves below this HP percentage.
    pub aggressive_heal_threshold_pct: u32,
    /// Bonus XP for every turn the party finishes under the template's par.
    pub xp_per_spare_turn: u32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const MAX_ABILITY_EFFECTS: usize = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MIN_DAMAGE: u32 = 1;
    pub const DEFAULT_DEFEND_DIVISOR: u32 = 2;
    pub const DEFAULT_MANA_REGEN_PER_TURN: u32 = 5;
    pub const DEFAULT_AGGRESSIVE_HEAL_THRESHOLD_PCT: u32 = 35;
    pub const DEFAULT_XP_PER_SPARE_TURN: u32 = 5;

    pub fn new() -> Self {
        Self {
            min_damage: Self::DEFAULT_MIN_DAMAGE,
            defend_divisor: Self::DEFAULT_DEFEND_DIVISOR,
            mana_regen_per_turn: Self::DEFAULT_MANA_REGEN_PER_TURN,
            aggressive_heal_threshold_pct: Self::DEFAULT_AGGRESSIVE_HEAL_THRESHOLD_PCT,
            xp_per_spare_turn: Self::DEFAULT_XP_PER_SPARE_TURN,
        }
    }

    pub fn with_mana_regen(mut self, mana_regen_per_turn: u32) -> Self {
        self.mana_regen_per_turn = mana_regen_per_turn;
        self
    }

    pub fn with_min_damage(mut self, min_damage: u32) -> Self {
        self.min_damage = min_damage;
        self
    }

    pub fn with_defend_divisor(mut self, defend_divisor: u32) -> Self {
        self.defend_divisor = defend_divisor.max(1);
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
