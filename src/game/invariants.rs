//! World invariants - sanity checks that detect resolver bugs.
//!
//! These should never trigger after any sequence of resolved actions. Fuzz
//! targets and property tests call them after every step.

use std::collections::HashMap;

use crate::game::{World, PLAYER_ID};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut report = |message: String| violations.push(InvariantViolation { message });

    if world.entities().first().map(|e| e.id) != Some(PLAYER_ID) {
        report("player is not first in the registry".to_string());
    }

    let mut seen_ids = HashMap::new();
    let mut seen_cells = HashMap::new();

    for entity in world.entities() {
        if let Some(previous) = seen_ids.insert(entity.id, entity.label()) {
            report(format!("{} shares id {} with a {previous}", entity.label(), entity.id));
        }

        if entity.hp > entity.max_hp {
            report(format!(
                "{} {} has hp {} > max {}",
                entity.label(),
                entity.id,
                entity.hp,
                entity.max_hp
            ));
        }

        if !entity.is_alive() {
            continue;
        }

        if !world.map().in_bounds(entity.pos) {
            report(format!("{} {} is off the grid at {}", entity.label(), entity.id, entity.pos));
        } else if !world.map().is_walkable(entity.pos) {
            report(format!(
                "{} {} is alive on non-grass cell {}",
                entity.label(),
                entity.id,
                entity.pos
            ));
        }

        if let Some(other) = seen_cells.insert(entity.pos, entity.id) {
            report(format!("{} and {other} both stand on {}", entity.id, entity.pos));
        }
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(world: &World) {
    let violations = check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_world: &World) {}
