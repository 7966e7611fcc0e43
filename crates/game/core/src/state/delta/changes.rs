use crate::state::{Combatant, CombatantId};

use super::bitmask::CombatantFields;

/// Changed fields of one combatant together with its new value.
///
/// Carrying the full value keeps applying a diff trivial on the client; the
/// bitmask tells the renderer what to animate.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantChanges {
    pub id: CombatantId,
    pub fields: CombatantFields,
    pub value: Combatant,
}

impl CombatantChanges {
    /// Compares two states of the same combatant.
    ///
    /// Returns `None` if no tracked field changed.
    pub(super) fn from_states(before: &Combatant, after: &Combatant) -> Option<Self> {
        debug_assert_eq!(
            before.id, after.id,
            "Cannot compare combatants with different IDs"
        );

        let mut fields = CombatantFields::empty();

        if before.hp != after.hp || before.hp_max != after.hp_max {
            fields |= CombatantFields::HP;
        }
        if before.mana != after.mana || before.mana_max != after.mana_max {
            fields |= CombatantFields::MANA;
        }
        if before.cooldowns != after.cooldowns {
            fields |= CombatantFields::COOLDOWNS;
        }
        if before.status != after.status {
            fields |= CombatantFields::STATUS;
        }
        if before.defending != after.defending {
            fields |= CombatantFields::DEFENDING;
        }
        if before.fled != after.fled {
            fields |= CombatantFields::FLED;
        }

        if fields.is_empty() {
            None
        } else {
            Some(Self {
                id: after.id,
                fields,
                value: after.clone(),
            })
        }
    }
}
