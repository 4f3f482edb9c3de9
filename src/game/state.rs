//! World state: the grid plus the entity registry.

use serde::{Deserialize, Serialize};

use crate::game::{Coord, EnemyKind, Entity, EntityId, Grid, Occupancy, Role};

/// Which side has won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every enemy is down.
    PlayerWins,
    /// The player is down.
    EnemiesWin,
}

/// Identifier always assigned to the player.
pub const PLAYER_ID: EntityId = EntityId(0);

/// Complete simulation state.
///
/// The registry is a flat list in roster order: the player first, then
/// enemies in spawn order. Identifiers are never reused and entities are
/// never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// Terrain grid, fixed once the world is built.
    map: Grid,
    /// All entities, player first.
    entities: Vec<Entity>,
}

impl World {
    /// Create a world holding only the player.
    #[must_use]
    pub fn new(map: Grid, player_pos: Coord, player_hp: u32) -> Self {
        Self {
            map,
            entities: vec![Entity::new(PLAYER_ID, Role::Player, player_pos, player_hp)],
        }
    }

    /// The terrain grid.
    #[must_use]
    pub const fn map(&self) -> &Grid {
        &self.map
    }

    /// Mutable grid access for tests that reshape terrain after spawning.
    #[cfg(test)]
    pub(crate) fn map_mut(&mut self) -> &mut Grid {
        &mut self.map
    }

    /// Add an enemy at full health and return its identifier.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Coord) -> EntityId {
        #[allow(clippy::cast_possible_truncation)]
        let id = EntityId(self.entities.len() as u32);
        self.entities
            .push(Entity::new(id, Role::Enemy(kind), pos, kind.max_hp()));
        id
    }

    /// All entities in roster order, dead ones included.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Look up an entity by identifier.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Mutable lookup, reserved for the resolver.
    #[must_use]
    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// The player entity.
    #[must_use]
    pub fn player(&self) -> &Entity {
        // The player is inserted first by `new` and never removed.
        &self.entities[0]
    }

    /// All enemies in roster order, dead ones included.
    pub fn enemies(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.is_player())
    }

    /// Living enemies in roster order.
    pub fn living_enemies(&self) -> impl Iterator<Item = &Entity> {
        self.enemies().filter(|e| e.is_alive())
    }

    /// The living entity standing on a cell, if any.
    #[must_use]
    pub fn living_at(&self, coord: Coord) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.is_alive() && e.pos == coord)
    }

    /// Check if any living entity stands on a cell.
    #[must_use]
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.living_at(coord).is_some()
    }

    /// Cells held by every living entity except `exclude`.
    #[must_use]
    pub fn occupancy_excluding(&self, exclude: EntityId) -> Occupancy {
        self.entities
            .iter()
            .filter(|e| e.is_alive() && e.id != exclude)
            .map(|e| e.pos)
            .collect()
    }

    /// Win/loss state, if the fight is decided.
    ///
    /// A dead player takes precedence over a cleared board.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.player().is_alive() {
            return Some(Outcome::EnemiesWin);
        }
        if self.living_enemies().next().is_none() {
            return Some(Outcome::PlayerWins);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Terrain;

    fn create_test_world() -> World {
        let map = Grid::filled(6, 6, Terrain::Grass).unwrap();
        let mut world = World::new(map, Coord::new(0, 0), 5);
        world.spawn_enemy(EnemyKind::Ranged, Coord::new(3, 3));
        world.spawn_enemy(EnemyKind::Melee, Coord::new(5, 5));
        world
    }

    #[test]
    fn test_world_creation() {
        let world = create_test_world();
        assert_eq!(world.entities().len(), 3);
        assert_eq!(world.player().id, PLAYER_ID);
        assert_eq!(world.player().hp, 5);
        assert_eq!(world.living_enemies().count(), 2);
        assert_eq!(world.outcome(), None);
    }

    #[test]
    fn test_ids_follow_roster_order() {
        let world = create_test_world();
        let ids: Vec<u32> = world.enemies().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(world.entity(EntityId(2)).unwrap().enemy_kind(), Some(EnemyKind::Melee));
        assert!(world.entity(EntityId(9)).is_none());
    }

    #[test]
    fn test_occupancy_excludes_self_and_dead() {
        let mut world = create_test_world();
        world.entity_mut(EntityId(2)).unwrap().hp = 0;

        let occupied = world.occupancy_excluding(EntityId(1));
        assert!(occupied.contains(&Coord::new(0, 0)));
        assert!(!occupied.contains(&Coord::new(3, 3)));
        assert!(!occupied.contains(&Coord::new(5, 5)));
    }

    #[test]
    fn test_dead_entities_stay_registered() {
        let mut world = create_test_world();
        world.entity_mut(EntityId(1)).unwrap().hp = 0;
        assert_eq!(world.enemies().count(), 2);
        assert!(!world.is_occupied(Coord::new(3, 3)));
    }

    #[test]
    fn test_outcomes() {
        let mut world = create_test_world();
        for id in [EntityId(1), EntityId(2)] {
            world.entity_mut(id).unwrap().hp = 0;
        }
        assert_eq!(world.outcome(), Some(Outcome::PlayerWins));

        let mut world = create_test_world();
        world.entity_mut(PLAYER_ID).unwrap().hp = 0;
        assert_eq!(world.outcome(), Some(Outcome::EnemiesWin));
    }
}
