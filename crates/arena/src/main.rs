//! Headless battle driver.
//!
//! Composition root that loads content, starts a [`RealtimeChannel`] and
//! plays one battle with every party member on autopilot. Each wire message
//! is printed to stdout as one JSON line; logs go to stderr.
//!
//! # Environment
//!
//! - `ARENA_CONTENT_DIR`: read content from this directory instead of the
//!   built-in data
//! - `ARENA_SEED`: battle seed (default `7`)
//! - `ARENA_TEMPLATE`: enemy template id (default `goblin_scouts`)
//! - `BATTLE_*`: runtime timeouts and buffers, see [`RuntimeConfig`]
//! - `RUST_LOG`: log filter (default `info`)

mod autopilot;

use std::sync::Arc;

use anyhow::{Context, Result};
use battle_content::ContentFactory;
use battle_core::{BattleEnv, Class, CombatantId, PartyMember};
use battle_runtime::{RealtimeChannel, RuntimeConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::autopilot::Autopilot;

const SESSION_ID: &str = "ARENA";
const DEFAULT_SEED: u64 = 7;
const DEFAULT_TEMPLATE: &str = "goblin_scouts";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let env = load_content()?;
    let config = RuntimeConfig::from_env().context("invalid runtime configuration")?;
    let seed = read_seed()?;
    let template =
        std::env::var("ARENA_TEMPLATE").unwrap_or_else(|_| DEFAULT_TEMPLATE.to_owned());

    tracing::info!(seed, template = %template, "Starting arena battle");

    let channel = RealtimeChannel::new(Arc::new(env), config);
    channel
        .create_session_with_seed(SESSION_ID, &party(), &template, seed)
        .await
        .with_context(|| format!("failed to start battle against '{template}'"))?;

    let outcome = Autopilot::new(channel, SESSION_ID).run().await?;
    tracing::info!(outcome = ?outcome, "Arena battle finished");

    Ok(())
}

/// Logs to stderr so stdout carries only wire messages.
fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_content() -> Result<BattleEnv> {
    match std::env::var_os("ARENA_CONTENT_DIR") {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            tracing::info!(dir = %factory.data_dir().display(), "Loading content from disk");
            factory.load_env()
        }
        None => ContentFactory::builtin(),
    }
}

fn read_seed() -> Result<u64> {
    match std::env::var("ARENA_SEED") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("ARENA_SEED must be an unsigned integer, got '{raw}'")),
        Err(_) => Ok(DEFAULT_SEED),
    }
}

/// One member of each class, split between two players.
fn party() -> Vec<PartyMember> {
    vec![
        PartyMember::new(CombatantId(1), "Brann", Class::Warrior, "player-1"),
        PartyMember::new(CombatantId(2), "Ilsa", Class::Mage, "player-1"),
        PartyMember::new(CombatantId(3), "Vex", Class::Rogue, "player-2"),
        PartyMember::new(CombatantId(4), "Oda", Class::Cleric, "player-2"),
    ]
}
