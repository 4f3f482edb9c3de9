//! Action resolution.
//!
//! [`resolve`] validates an action against the live world and applies it.
//! [`apply`] is the turn-loop boundary: it logs failures and turns them into
//! no-ops, so a bad action never interrupts play.

use serde::{Deserialize, Serialize};

use crate::error::ResolutionError;
use crate::game::{has_los, Action, Coord, EntityId, Offset, Terrain, World};

/// State change produced by a successful action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// The actor stepped to a new cell.
    Moved {
        /// Previous cell.
        from: Coord,
        /// New cell.
        to: Coord,
    },
    /// A unit lost hit points.
    Damaged {
        /// Unit hit.
        target: EntityId,
        /// Hit points left.
        hp: u32,
    },
    /// A unit was shoved to a new cell.
    Pushed {
        /// Unit pushed.
        target: EntityId,
        /// Cell it landed on.
        to: Coord,
        /// Whether it landed in water and drowned.
        drowned: bool,
    },
    /// Nothing happened.
    Nothing,
}

/// Validate and apply `action` for `actor`.
///
/// # Errors
///
/// Returns a [`ResolutionError`] and leaves the world untouched when the
/// actor is dead or unknown, the target does not resolve to a living unit,
/// or the destination breaks the movement rules.
pub fn resolve(world: &mut World, actor: EntityId, action: &Action) -> Result<Effect, ResolutionError> {
    let actor_pos = match world.entity(actor) {
        Some(entity) if entity.is_alive() => entity.pos,
        Some(_) => return Err(ResolutionError::ActorDead(actor)),
        None => return Err(ResolutionError::UnknownEntity(actor)),
    };

    match *action {
        Action::Move { dest } => {
            check_destination(world, dest)?;
            if world.is_occupied(dest) {
                return Err(ResolutionError::Occupied(dest));
            }
            if let Some(entity) = world.entity_mut(actor) {
                entity.pos = dest;
            }
            Ok(Effect::Moved {
                from: actor_pos,
                to: dest,
            })
        }
        Action::MeleeAttack { target, damage } => {
            // Adjacency was established when the action was chosen.
            let hp = damage_target(world, target, damage)?;
            Ok(Effect::Damaged { target, hp })
        }
        Action::MeleePush { target, direction } => push(world, target, direction),
        Action::RangedAttack { target, damage } => {
            let target_pos = living_target(world, target)?;
            if !has_los(actor_pos, target_pos, world.map()) {
                return Err(ResolutionError::NoLineOfSight {
                    from: actor_pos,
                    to: target_pos,
                });
            }
            let hp = damage_target(world, target, damage)?;
            Ok(Effect::Damaged { target, hp })
        }
        Action::None => Ok(Effect::Nothing),
    }
}

/// Resolve an action at the turn-loop boundary.
///
/// Failures are logged and reported as [`Effect::Nothing`]; the caller still
/// counts the action as spent.
pub fn apply(world: &mut World, actor: EntityId, action: &Action) -> Effect {
    match resolve(world, actor, action) {
        Ok(effect) => {
            log_effect(world, actor, &effect);
            effect
        }
        Err(error) => {
            tracing::warn!(%actor, action = action.name(), %error, "action failed");
            Effect::Nothing
        }
    }
}

fn log_effect(world: &World, actor: EntityId, effect: &Effect) {
    let label = world.entity(actor).map_or("?", |e| e.label());
    match *effect {
        Effect::Moved { from, to } => {
            tracing::debug!(%actor, unit = label, %from, %to, "moved");
        }
        Effect::Damaged { target, hp } => {
            tracing::info!(%actor, unit = label, %target, hp, "hit");
        }
        Effect::Pushed { target, to, drowned } => {
            if drowned {
                tracing::info!(%actor, unit = label, %target, %to, "pushed into water and drowned");
            } else {
                tracing::info!(%actor, unit = label, %target, %to, "pushed");
            }
        }
        Effect::Nothing => {
            tracing::debug!(%actor, unit = label, "no action");
        }
    }
}

/// Reject destinations that are off the grid or not grass.
fn check_destination(world: &World, dest: Coord) -> Result<(), ResolutionError> {
    match world.map().terrain(dest) {
        None => Err(ResolutionError::OutOfBounds(dest)),
        Some(Terrain::Grass) => Ok(()),
        Some(terrain) => Err(ResolutionError::Blocked { at: dest, terrain }),
    }
}

/// Position of a living target.
fn living_target(world: &World, target: EntityId) -> Result<Coord, ResolutionError> {
    match world.entity(target) {
        Some(entity) if entity.is_alive() => Ok(entity.pos),
        Some(_) => Err(ResolutionError::TargetDead(target)),
        None => Err(ResolutionError::UnknownEntity(target)),
    }
}

fn damage_target(world: &mut World, target: EntityId, damage: u32) -> Result<u32, ResolutionError> {
    living_target(world, target)?;
    world
        .entity_mut(target)
        .map(|entity| entity.take_damage(damage))
        .ok_or(ResolutionError::UnknownEntity(target))
}

/// Shove a unit. Water always accepts the push and drowns the unit;
/// mountains and the grid edge reject it; grass must be free.
fn push(world: &mut World, target: EntityId, direction: Offset) -> Result<Effect, ResolutionError> {
    let from = living_target(world, target)?;
    let Some(dest) = from.offset(direction) else {
        return Err(ResolutionError::OutOfBounds(from.saturating_offset(direction)));
    };

    let drowned = match world.map().terrain(dest) {
        None => return Err(ResolutionError::OutOfBounds(dest)),
        Some(Terrain::Mountain) => {
            return Err(ResolutionError::Blocked {
                at: dest,
                terrain: Terrain::Mountain,
            });
        }
        Some(Terrain::Water) => true,
        Some(Terrain::Grass) => {
            if world.is_occupied(dest) {
                return Err(ResolutionError::Occupied(dest));
            }
            false
        }
    };

    if let Some(entity) = world.entity_mut(target) {
        entity.pos = dest;
        if drowned {
            entity.hp = 0;
        }
    }

    Ok(Effect::Pushed {
        target,
        to: dest,
        drowned,
    })
}
