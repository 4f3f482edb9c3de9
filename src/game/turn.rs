//! Turn state machine.
//!
//! The controller alternates between the player phase and the enemy phase,
//! separated by an inter-turn delay that only paces presentation. Each call
//! to [`TurnController::step`] performs at most one decision.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::game::{apply, decide_action, Action, Effect, EntityId, Outcome, World, PLAYER_ID};

/// Which side is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The oracle-controlled player.
    Player,
    /// The computer-controlled enemies.
    Enemies,
}

/// Turn bookkeeping visible to renderers and the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Side currently acting (or about to act after the delay).
    pub active: Side,
    /// Actions left in the current phase.
    pub actions_remaining: u32,
    /// Full player/enemy cycles started, from 1.
    pub turn_number: u32,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The player is choosing actions.
    PlayerTurn,
    /// Enemies act one at a time in roster order.
    EnemyTurn,
    /// Pause between phases; `next` starts when the delay ends.
    InterTurnDelay {
        /// Side that acts after the delay.
        next: Side,
    },
    /// The fight is decided; no further decisions are made.
    Finished(Outcome),
}

/// What a single [`TurnController::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepEvent {
    /// A unit took an action.
    Acted {
        /// Acting unit.
        actor: EntityId,
        /// Action chosen.
        action: Action,
        /// What it changed.
        effect: Effect,
    },
    /// The active phase ended and the delay began.
    DelayStarted {
        /// Side that acts after the delay.
        next: Side,
    },
    /// The controller is in the inter-turn delay and needs `finish_delay`.
    Waiting,
    /// The fight is decided.
    Finished(Outcome),
}

/// Source of player actions.
///
/// Implementations must always produce an action; failures are reported as
/// [`Action::None`].
pub trait PlayerAgent {
    /// Choose the next player action given the world and the actions left.
    fn next_action(&mut self, world: &World, actions_left: u32) -> Action;
}

impl<F> PlayerAgent for F
where
    F: FnMut(&World, u32) -> Action,
{
    fn next_action(&mut self, world: &World, actions_left: u32) -> Action {
        self(world, actions_left)
    }
}

/// Drives turns for one session.
#[derive(Debug, Clone)]
pub struct TurnController {
    state: TurnState,
    phase: Phase,
    /// Enemies that have acted this enemy phase.
    acted: HashSet<EntityId>,
    player_actions: u32,
    enemy_pool: u32,
    actions_taken: u32,
}

impl TurnController {
    /// Start in the player phase of turn 1.
    #[must_use]
    pub fn new(player_actions: u32, enemy_pool: u32) -> Self {
        Self {
            state: TurnState {
                active: Side::Player,
                actions_remaining: player_actions,
                turn_number: 1,
            },
            phase: Phase::PlayerTurn,
            acted: HashSet::new(),
            player_actions,
            enemy_pool,
            actions_taken: 0,
        }
    }

    /// Current turn bookkeeping.
    #[must_use]
    pub const fn state(&self) -> TurnState {
        self.state
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Actions resolved so far, across both sides.
    #[must_use]
    pub const fn actions_taken(&self) -> u32 {
        self.actions_taken
    }

    /// Check if the controller is in the inter-turn delay.
    #[must_use]
    pub const fn in_delay(&self) -> bool {
        matches!(self.phase, Phase::InterTurnDelay { .. })
    }

    /// Outcome, once decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Advance by one decision point or phase transition.
    pub fn step(&mut self, world: &mut World, agent: &mut dyn PlayerAgent) -> StepEvent {
        match self.phase {
            Phase::Finished(outcome) => StepEvent::Finished(outcome),
            Phase::InterTurnDelay { .. } => StepEvent::Waiting,
            Phase::PlayerTurn => {
                if let Some(outcome) = self.check_outcome(world) {
                    return StepEvent::Finished(outcome);
                }
                if self.state.actions_remaining == 0 {
                    return self.begin_delay(Side::Enemies);
                }
                self.player_step(world, agent)
            }
            Phase::EnemyTurn => {
                if let Some(outcome) = self.check_outcome(world) {
                    return StepEvent::Finished(outcome);
                }
                self.enemy_step(world)
            }
        }
    }

    /// End the inter-turn delay and start the next phase.
    ///
    /// Returns `false` if the controller was not in the delay.
    pub fn finish_delay(&mut self, world: &World) -> bool {
        let Phase::InterTurnDelay { next } = self.phase else {
            return false;
        };

        match next {
            Side::Player => {
                self.state.turn_number += 1;
                self.state.actions_remaining = self.player_actions;
                self.phase = Phase::PlayerTurn;
                tracing::info!(turn = self.state.turn_number, "player turn");
            }
            Side::Enemies => {
                self.state.actions_remaining = self.enemy_pool;
                self.acted.clear();
                self.phase = Phase::EnemyTurn;
                tracing::debug!(turn = self.state.turn_number, "enemy turn");
            }
        }
        self.state.active = next;
        self.check_outcome(world);
        true
    }

    fn player_step(&mut self, world: &mut World, agent: &mut dyn PlayerAgent) -> StepEvent {
        let action = agent.next_action(world, self.state.actions_remaining);
        tracing::debug!(turn = self.state.turn_number, %action, "player decision");
        let effect = apply(world, PLAYER_ID, &action);
        self.consume();

        if action.is_none() || self.state.actions_remaining == 0 {
            self.begin_delay(Side::Enemies);
        }

        StepEvent::Acted {
            actor: PLAYER_ID,
            action,
            effect,
        }
    }

    fn enemy_step(&mut self, world: &mut World) -> StepEvent {
        let next = self.next_enemy(world);
        let Some(actor) = next.filter(|_| self.state.actions_remaining > 0) else {
            return self.end_enemy_phase();
        };

        let action = world
            .entity(actor)
            .map_or(Action::None, |me| decide_action(world, me));
        tracing::debug!(turn = self.state.turn_number, %actor, %action, "enemy decision");
        let effect = apply(world, actor, &action);
        self.acted.insert(actor);
        self.consume();

        if self.state.actions_remaining == 0 || self.next_enemy(world).is_none() {
            self.end_enemy_phase();
        }

        StepEvent::Acted {
            actor,
            action,
            effect,
        }
    }

    /// First living enemy in roster order that has not acted this phase.
    fn next_enemy(&self, world: &World) -> Option<EntityId> {
        world
            .living_enemies()
            .map(|e| e.id)
            .find(|id| !self.acted.contains(id))
    }

    fn end_enemy_phase(&mut self) -> StepEvent {
        self.acted.clear();
        self.begin_delay(Side::Player)
    }

    fn consume(&mut self) {
        self.state.actions_remaining = self.state.actions_remaining.saturating_sub(1);
        self.actions_taken += 1;
    }

    fn begin_delay(&mut self, next: Side) -> StepEvent {
        self.phase = Phase::InterTurnDelay { next };
        StepEvent::DelayStarted { next }
    }

    /// Move to `Finished` if the fight is decided.
    fn check_outcome(&mut self, world: &World) -> Option<Outcome> {
        let outcome = world.outcome()?;
        if !matches!(self.phase, Phase::Finished(_)) {
            tracing::info!(turn = self.state.turn_number, ?outcome, "session decided");
        }
        self.phase = Phase::Finished(outcome);
        Some(outcome)
    }
}
