use bitflags::bitflags;

bitflags! {
    /// Tracks which fields of a [`Combatant`](crate::state::Combatant) changed
    /// between two snapshots.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatantFields: u8 {
        const HP        = 1 << 0;
        const MANA      = 1 << 1;
        const COOLDOWNS = 1 << 2;
        const STATUS    = 1 << 3;
        const DEFENDING = 1 << 4;
        const FLED      = 1 << 5;
    }
}
