/// Lifecycle state of a battle session.
///
/// ```text
/// Idle -> Intro -> AwaitingAction <-> Resolving -> EnemyTurn -> ...
///                         \________________________/
///                                    |
///                           Victory | Defeat -> Idle
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleState {
    Idle,
    Intro,
    AwaitingAction,
    Resolving,
    EnemyTurn,
    Victory,
    Defeat,
}

impl BattleState {
    /// Victory or defeat; the session only waits for rewards and teardown.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

/// How a battle ended.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleOutcome {
    /// Every enemy reached zero HP.
    Victory,
    /// Every ally reached zero HP.
    Defeat,
    /// The last ally in rotation fled; no rewards are granted.
    Escaped,
}
