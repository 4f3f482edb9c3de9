//! Actions a unit can take on its turn.

use serde::{Deserialize, Serialize};

use crate::game::{Coord, EntityId, Offset};

/// A proposed action.
///
/// Produced by the enemy decision logic or decoded from an oracle response,
/// and consumed only by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step onto a grass cell.
    Move {
        /// Destination cell.
        dest: Coord,
    },
    /// Strike a unit.
    MeleeAttack {
        /// Target entity.
        target: EntityId,
        /// Damage dealt.
        damage: u32,
    },
    /// Shove a unit one offset away; pushing into water drowns it.
    MeleePush {
        /// Target entity.
        target: EntityId,
        /// Displacement applied to the target.
        direction: Offset,
    },
    /// Shoot a unit, gated on line of sight at resolution time.
    RangedAttack {
        /// Target entity.
        target: EntityId,
        /// Damage dealt.
        damage: u32,
    },
    /// Do nothing.
    None,
}

impl Action {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Action::Move { .. } => "move",
            Action::MeleeAttack { .. } => "melee_attack",
            Action::MeleePush { .. } => "melee_push",
            Action::RangedAttack { .. } => "range_attack",
            Action::None => "no_action",
        }
    }

    /// Check if this is the no-op action.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { dest } => write!(f, "move to {dest}"),
            Action::MeleeAttack { target, damage } => {
                write!(f, "melee attack {target} for {damage}")
            }
            Action::MeleePush { target, direction } => {
                write!(f, "push {target} by ({}, {})", direction.dx, direction.dy)
            }
            Action::RangedAttack { target, damage } => {
                write!(f, "ranged attack {target} for {damage}")
            }
            Action::None => write!(f, "no action"),
        }
    }
}
