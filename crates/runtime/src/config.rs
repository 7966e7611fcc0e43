//! Runtime configuration shared by the channel and the session workers.

use std::str::FromStr;
use std::time::Duration;

use battle_core::BattleConfig;

use crate::api::{Result, RuntimeError};

/// Runtime configuration shared across the channel and workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Overrides the balance config shipped with the content when set.
    pub battle: Option<BattleConfig>,
    pub command_buffer_size: usize,
    pub broadcast_buffer_size: usize,
    /// How long a queued delta waits for `AnimationComplete`.
    pub animation_timeout: Duration,
    /// How long the intro plays before the first turn is handed out.
    pub intro_timeout: Duration,
    /// Inactivity before the turn owner defends automatically.
    pub idle_timeout: Duration,
}

impl RuntimeConfig {
    pub const ANIMATION_TIMEOUT_VAR: &'static str = "BATTLE_ANIMATION_TIMEOUT_MS";
    pub const INTRO_TIMEOUT_VAR: &'static str = "BATTLE_INTRO_TIMEOUT_MS";
    pub const IDLE_TIMEOUT_VAR: &'static str = "BATTLE_IDLE_TIMEOUT_MS";
    pub const COMMAND_BUFFER_VAR: &'static str = "BATTLE_COMMAND_BUFFER";
    pub const BROADCAST_BUFFER_VAR: &'static str = "BATTLE_BROADCAST_BUFFER";

    /// Defaults overridden by any `BATTLE_*` variables present in the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64>(&lookup, Self::ANIMATION_TIMEOUT_VAR)? {
            config.animation_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, Self::INTRO_TIMEOUT_VAR)? {
            config.intro_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, Self::IDLE_TIMEOUT_VAR)? {
            config.idle_timeout = Duration::from_millis(ms);
        }
        if let Some(size) = parse_var::<usize>(&lookup, Self::COMMAND_BUFFER_VAR)? {
            config.command_buffer_size = size;
        }
        if let Some(size) = parse_var::<usize>(&lookup, Self::BROADCAST_BUFFER_VAR)? {
            config.broadcast_buffer_size = size;
        }

        // Tokio channels panic on zero capacity
        if config.command_buffer_size == 0 {
            return Err(invalid(Self::COMMAND_BUFFER_VAR, "0"));
        }
        if config.broadcast_buffer_size == 0 {
            return Err(invalid(Self::BROADCAST_BUFFER_VAR, "0"));
        }

        Ok(config)
    }

    pub fn with_battle(mut self, battle: BattleConfig) -> Self {
        self.battle = Some(battle);
        self
    }

    pub fn with_animation_timeout(mut self, timeout: Duration) -> Self {
        self.animation_timeout = timeout;
        self
    }

    pub fn with_intro_timeout(mut self, timeout: Duration) -> Self {
        self.intro_timeout = timeout;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: None,
            command_buffer_size: 32,
            broadcast_buffer_size: 64,
            animation_timeout: Duration::from_secs(3),
            intro_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(30),
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(key, &raw)),
    }
}

fn invalid(key: &'static str, value: &str) -> RuntimeError {
    RuntimeError::InvalidConfig {
        key,
        value: value.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    #[test]
    fn defaults_without_variables() {
        let config = RuntimeConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.idle_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = RuntimeConfig::from_lookup(vars(&[
            ("BATTLE_ANIMATION_TIMEOUT_MS", "1500"),
            ("BATTLE_BROADCAST_BUFFER", " 128 "),
        ]))
        .unwrap();

        assert_eq!(config.animation_timeout, Duration::from_millis(1500));
        assert_eq!(config.broadcast_buffer_size, 128);
        assert_eq!(config.command_buffer_size, 32);
    }

    #[test]
    fn rejects_garbage_and_zero_buffers() {
        let err = RuntimeConfig::from_lookup(vars(&[("BATTLE_IDLE_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidConfig {
                key: "BATTLE_IDLE_TIMEOUT_MS",
                ..
            }
        ));

        assert!(RuntimeConfig::from_lookup(vars(&[("BATTLE_COMMAND_BUFFER", "0")])).is_err());
    }
}
