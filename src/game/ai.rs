//! Decision logic for computer-controlled units.
//!
//! Decisions are pure: they read the world and return an [`Action`] without
//! touching any state.

use crate::game::{
    has_los, next_step_towards, Action, EnemyKind, Entity, Grid, Occupancy, World,
};

impl EnemyKind {
    /// Pick an action for `me` against `player`.
    ///
    /// `occupied` holds the cells of the player and every other living enemy.
    #[must_use]
    pub fn decide(self, me: &Entity, player: &Entity, grid: &Grid, occupied: &Occupancy) -> Action {
        let distance = me.pos.chebyshev(player.pos);

        let can_strike = match self {
            // In range but blocked falls through to movement.
            EnemyKind::Ranged => {
                distance <= self.attack_range() && has_los(me.pos, player.pos, grid)
            }
            EnemyKind::Melee => distance == self.attack_range(),
        };

        if can_strike {
            return match self {
                EnemyKind::Ranged => Action::RangedAttack {
                    target: player.id,
                    damage: self.damage(),
                },
                EnemyKind::Melee => Action::MeleeAttack {
                    target: player.id,
                    damage: self.damage(),
                },
            };
        }

        next_step_towards(me.pos, player.pos, grid, occupied)
            .map_or(Action::None, |dest| Action::Move { dest })
    }
}

/// Decide for a registered enemy, deriving occupancy from the world.
///
/// Returns [`Action::None`] for the player, dead units, or unknown entities.
#[must_use]
pub fn decide_action(world: &World, me: &Entity) -> Action {
    let Some(kind) = me.enemy_kind() else {
        return Action::None;
    };
    if !me.is_alive() {
        return Action::None;
    }

    let occupied = world.occupancy_excluding(me.id);
    kind.decide(me, world.player(), world.map(), &occupied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{resolve, Coord, EntityId, Terrain, PLAYER_ID};

    fn open_world() -> World {
        World::new(Grid::filled(6, 6, Terrain::Grass).unwrap(), Coord::new(0, 0), 5)
    }

    fn enemy(world: &World, id: EntityId) -> Entity {
        *world.entity(id).unwrap()
    }

    #[test]
    fn test_melee_approach_then_strike() {
        let mut world = open_world();
        let melee = world.spawn_enemy(EnemyKind::Melee, Coord::new(2, 0));

        let action = decide_action(&world, &enemy(&world, melee));
        assert_eq!(action, Action::Move { dest: Coord::new(1, 0) });

        resolve(&mut world, melee, &action).unwrap();
        assert_eq!(world.entity(melee).unwrap().pos.chebyshev(world.player().pos), 1);

        let action = decide_action(&world, &enemy(&world, melee));
        assert_eq!(
            action,
            Action::MeleeAttack {
                target: PLAYER_ID,
                damage: 2
            }
        );

        resolve(&mut world, melee, &action).unwrap();
        assert_eq!(world.player().hp, 3);
    }

    #[test]
    fn test_melee_strikes_diagonally() {
        let mut world = open_world();
        let melee = world.spawn_enemy(EnemyKind::Melee, Coord::new(1, 1));
        let action = decide_action(&world, &enemy(&world, melee));
        assert!(matches!(action, Action::MeleeAttack { .. }));
    }

    #[test]
    fn test_ranged_shoots_in_range() {
        let mut world = open_world();
        let ranged = world.spawn_enemy(EnemyKind::Ranged, Coord::new(2, 2));
        let action = decide_action(&world, &enemy(&world, ranged));
        assert_eq!(
            action,
            Action::RangedAttack {
                target: PLAYER_ID,
                damage: 1
            }
        );
    }

    #[test]
    fn test_ranged_moves_when_sight_blocked() {
        let mut world = open_world();
        world.map_mut().set(Coord::new(1, 0), Terrain::Mountain);
        let ranged = world.spawn_enemy(EnemyKind::Ranged, Coord::new(2, 0));

        let action = decide_action(&world, &enemy(&world, ranged));
        assert!(matches!(action, Action::Move { .. }), "got {action:?}");
        assert_eq!(action, Action::Move { dest: Coord::new(2, 1) });
    }

    #[test]
    fn test_ranged_out_of_range_approaches() {
        let mut world = open_world();
        let ranged = world.spawn_enemy(EnemyKind::Ranged, Coord::new(5, 0));
        let action = decide_action(&world, &enemy(&world, ranged));
        assert_eq!(action, Action::Move { dest: Coord::new(4, 0) });
    }

    #[test]
    fn test_no_path_yields_none() {
        let mut world = open_world();
        // Wall off the right half with water.
        for y in 0..6 {
            world.map_mut().set(Coord::new(3, y), Terrain::Water);
        }
        let melee = world.spawn_enemy(EnemyKind::Melee, Coord::new(5, 5));
        assert_eq!(decide_action(&world, &enemy(&world, melee)), Action::None);
    }

    #[test]
    fn test_other_enemies_block_path() {
        let mut world = open_world();
        world.spawn_enemy(EnemyKind::Ranged, Coord::new(1, 0));
        let melee = world.spawn_enemy(EnemyKind::Melee, Coord::new(2, 0));
        // (1,0) is held by the ranged unit, so the melee unit steps down first.
        let action = decide_action(&world, &enemy(&world, melee));
        assert_eq!(action, Action::Move { dest: Coord::new(2, 1) });
    }

    #[test]
    fn test_player_never_decides() {
        let world = open_world();
        assert_eq!(decide_action(&world, world.player()), Action::None);
    }
}
