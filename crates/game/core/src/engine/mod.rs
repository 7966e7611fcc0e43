//! Authoritative battle state machine.
//!
//! A [`BattleSession`] owns the combatants of one battle and is the only
//! place they are mutated. Every request is validated against the current
//! state before anything changes; accepted actions resolve synchronously and
//! the session then waits in [`BattleState::AwaitingAction`] for the next
//! player, or in [`BattleState::EnemyTurn`] until the caller drives pending
//! turns with [`BattleSession::run_pending_turns`].
//!
//! The session never sleeps or performs I/O. Pacing broadcasts for client
//! animations is the runtime's job; the session only exposes the
//! action-in-flight guard that the runtime clears with
//! [`BattleSession::settle`].

mod resolve;
mod setup;
mod turns;

pub use setup::SetupError;

use std::sync::Arc;

use resolve::Plan;

use crate::action::{ActionKind, ActionRecord, BattleAction, BattleError};
use crate::ai::{AiContext, EnemyAi};
use crate::env::BattleEnv;
use crate::roster::{EnemyTemplate, PartyMember};
use crate::state::{
    BattleOutcome, BattleSnapshot, BattleState, Combatant, CombatantId, SessionId,
};

/// One running battle.
#[derive(Clone, Debug)]
pub struct BattleSession {
    session_id: SessionId,
    env: Arc<BattleEnv>,
    template: EnemyTemplate,
    state: BattleState,
    combatants: Vec<Combatant>,
    turn_owner: Option<CombatantId>,
    turn_number: u32,
    ally_turns: u32,
    action_in_flight: bool,
    intro_in_progress: bool,
    rewards_granted: bool,
    outcome: Option<BattleOutcome>,
    seed: u64,
    log: Vec<ActionRecord>,
}

impl BattleSession {
    /// Creates a battle and starts its intro.
    ///
    /// The returned session is in [`BattleState::Intro`]; call
    /// [`complete_intro`](Self::complete_intro) once the intro has played.
    pub fn create(
        session_id: impl Into<SessionId>,
        roster: &[PartyMember],
        template: &EnemyTemplate,
        env: Arc<BattleEnv>,
        seed: u64,
    ) -> Result<Self, SetupError> {
        let combatants = setup::spawn_combatants(roster, template, &env)?;

        let mut session = Self {
            session_id: session_id.into(),
            env,
            template: template.clone(),
            state: BattleState::Idle,
            combatants,
            turn_owner: None,
            turn_number: 1,
            ally_turns: 0,
            action_in_flight: false,
            intro_in_progress: false,
            rewards_granted: false,
            outcome: None,
            seed,
            log: Vec::new(),
        };
        session.start_intro();
        Ok(session)
    }

    /// Like [`create`](Self::create), looking the template up in the catalog.
    pub fn from_catalog(
        session_id: impl Into<SessionId>,
        roster: &[PartyMember],
        template_id: &str,
        env: Arc<BattleEnv>,
        seed: u64,
    ) -> Result<Self, SetupError> {
        let template = env
            .enemies()
            .get(template_id)
            .cloned()
            .ok_or_else(|| SetupError::UnknownTemplate {
                template: template_id.to_owned(),
            })?;
        Self::create(session_id, roster, &template, env, seed)
    }

    fn start_intro(&mut self) {
        self.state = BattleState::Intro;
        self.intro_in_progress = true;
    }

    // ===== lifecycle =====

    /// Starts the intro sequence.
    ///
    /// A second call while an intro plays is rejected and leaves the running
    /// intro untouched.
    pub fn begin_intro(&mut self) -> Result<(), BattleError> {
        if self.intro_in_progress {
            return Err(BattleError::IntroInProgress);
        }
        if self.state != BattleState::Idle || self.outcome.is_some() {
            return Err(BattleError::BattleNotActive { state: self.state });
        }
        self.start_intro();
        Ok(())
    }

    /// Ends the intro and hands the first turn out.
    pub fn complete_intro(&mut self) -> Result<(), BattleError> {
        if self.state != BattleState::Intro {
            return Err(BattleError::BattleNotActive { state: self.state });
        }
        self.intro_in_progress = false;

        match self.first_in_rotation() {
            Some(idx) => self.enter_turn(idx),
            None => {
                if let Some(outcome) = self.terminal_outcome() {
                    self.finish(outcome);
                }
            }
        }
        Ok(())
    }

    /// Validates and resolves an action from a client.
    ///
    /// On success the action-in-flight guard is set until [`settle`](Self::settle).
    pub fn submit_action(
        &mut self,
        actor: CombatantId,
        action: BattleAction,
    ) -> Result<ActionRecord, BattleError> {
        let owner = self.ensure_accepting()?;
        let idx = self
            .index_of(actor)
            .ok_or(BattleError::UnknownCombatant { id: actor })?;
        if actor != owner {
            return Err(BattleError::NotYourTurn {
                actor,
                turn_owner: owner,
            });
        }

        let plan = self.validate(idx, &action)?;
        self.action_in_flight = true;
        Ok(self.resolve(idx, plan, false))
    }

    /// Resolves `Defend` for the current turn owner (idle timeout).
    pub fn submit_default_action(&mut self) -> Result<ActionRecord, BattleError> {
        self.ensure_accepting()?;
        let idx = self
            .owner_index()
            .ok_or(BattleError::BattleNotActive { state: self.state })?;

        self.action_in_flight = true;
        Ok(self.resolve(idx, Plan::untargeted(ActionKind::Defend), true))
    }

    /// Resolves one enemy turn or frozen skip, if one is pending.
    pub fn resolve_pending_turn(&mut self) -> Option<ActionRecord> {
        if !matches!(self.state, BattleState::EnemyTurn | BattleState::Resolving) {
            return None;
        }
        let idx = self.owner_index()?;
        let actor = &self.combatants[idx];

        if actor.is_frozen() {
            return Some(self.resolve(idx, Plan::untargeted(ActionKind::Skip), true));
        }
        if actor.is_player() {
            return None;
        }

        let decision = EnemyAi::decide(&AiContext::from_session(self), actor.id);
        let plan = self
            .validate(idx, &decision)
            .unwrap_or_else(|_| Plan::untargeted(ActionKind::Defend));
        Some(self.resolve(idx, plan, false))
    }

    /// Resolves pending turns until a player must act or the battle ends.
    pub fn run_pending_turns(&mut self) -> Vec<ActionRecord> {
        std::iter::from_fn(|| self.resolve_pending_turn()).collect()
    }

    /// Clears the action-in-flight guard once a resolution has been delivered.
    pub fn settle(&mut self) {
        self.action_in_flight = false;
    }

    /// Returns the session to `Idle` after rewards were resolved.
    pub fn teardown(&mut self) -> Result<(), BattleError> {
        match self.state {
            BattleState::Victory | BattleState::Defeat if !self.rewards_granted => {
                Err(BattleError::RewardsPending)
            }
            BattleState::Victory | BattleState::Defeat => {
                self.state = BattleState::Idle;
                self.turn_owner = None;
                self.action_in_flight = false;
                Ok(())
            }
            BattleState::Idle if self.outcome.is_some() => Ok(()),
            state => Err(BattleError::NotTerminal { state }),
        }
    }

    fn ensure_accepting(&self) -> Result<CombatantId, BattleError> {
        if self.action_in_flight {
            return Err(BattleError::ActionInFlight);
        }
        match (self.state, self.turn_owner) {
            (BattleState::AwaitingAction, Some(owner)) => Ok(owner),
            (state, _) => Err(BattleError::BattleNotActive { state }),
        }
    }

    pub(crate) fn mark_rewards_granted(&mut self) -> bool {
        !std::mem::replace(&mut self.rewards_granted, true)
    }

    // ===== queries =====

    /// Full immutable copy of the current state.
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            session_id: self.session_id.clone(),
            state: self.state,
            turn_owner: self.turn_owner,
            turn_number: self.turn_number,
            action_in_flight: self.action_in_flight,
            outcome: self.outcome,
            seed: self.seed,
            combatants: self.combatants.clone(),
            log: self.log.clone(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn turn_owner(&self) -> Option<CombatantId> {
        self.turn_owner
    }

    /// Number of the turn about to be played (1-based).
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Turns taken by party members so far.
    pub fn ally_turns(&self) -> u32 {
        self.ally_turns
    }

    pub fn is_action_in_flight(&self) -> bool {
        self.action_in_flight
    }

    pub fn is_intro_in_progress(&self) -> bool {
        self.intro_in_progress
    }

    pub fn rewards_granted(&self) -> bool {
        self.rewards_granted
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn env(&self) -> &BattleEnv {
        &self.env
    }

    pub fn template(&self) -> &EnemyTemplate {
        &self.template
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn log(&self) -> &[ActionRecord] {
        &self.log
    }

    pub(crate) fn index_of(&self, id: CombatantId) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }
}
