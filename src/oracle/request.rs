//! Request encoding.

use std::fmt::Write as _;

use crate::game::{Coord, EntityId, World};

/// A serialized world snapshot sent to the oracle.
///
/// Keeps the coordinate of every enemy listed in the request so that targets
/// named in the response can be mapped back to registry identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    text: String,
    targets: Vec<(Coord, EntityId)>,
}

impl OracleRequest {
    /// Encode the world for the player's next decision.
    ///
    /// The term has the shape
    /// `game_state(player(X,Y,HP),[enemy(Type,X,Y,HP),...],[[Row0],...],ActionsLeft,GridSize)`
    /// and lists only living enemies, in roster order.
    #[must_use]
    pub fn encode(world: &World, actions_left: u32) -> Self {
        let player = world.player();
        let mut text = String::with_capacity(128 + world.map().len() * 2);
        let mut targets = Vec::new();

        let _ = write!(
            text,
            "game_state(player({},{},{}),[",
            player.pos.x, player.pos.y, player.hp
        );

        for enemy in world.living_enemies() {
            let Some(kind) = enemy.enemy_kind() else {
                continue;
            };
            if !targets.is_empty() {
                text.push(',');
            }
            let _ = write!(
                text,
                "enemy({},{},{},{})",
                kind.wire_name(),
                enemy.pos.x,
                enemy.pos.y,
                enemy.hp
            );
            targets.push((enemy.pos, enemy.id));
        }

        text.push_str("],[");
        for (y, row) in world.map().rows().iter().enumerate() {
            if y > 0 {
                text.push(',');
            }
            text.push('[');
            for (x, code) in row.iter().enumerate() {
                if x > 0 {
                    text.push(',');
                }
                let _ = write!(text, "{code}");
            }
            text.push(']');
        }

        // The grid is square; width doubles as the size.
        let _ = write!(text, "],{},{})", actions_left, world.map().width());

        Self { text, targets }
    }

    /// The request term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Enemy listed at `coord` in this request, if any.
    #[must_use]
    pub fn target_at(&self, coord: Coord) -> Option<EntityId> {
        self.targets
            .iter()
            .find(|(pos, _)| *pos == coord)
            .map(|&(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EnemyKind, Grid, Terrain};

    #[test]
    fn test_encode_small_world() {
        let mut map = Grid::filled(3, 3, Terrain::Grass).unwrap();
        map.set(Coord::new(1, 0), Terrain::Mountain);
        map.set(Coord::new(2, 2), Terrain::Water);
        let mut world = World::new(map, Coord::new(0, 0), 5);
        world.spawn_enemy(EnemyKind::Ranged, Coord::new(2, 0));
        world.spawn_enemy(EnemyKind::Melee, Coord::new(1, 1));

        let request = OracleRequest::encode(&world, 2);
        assert_eq!(
            request.as_str(),
            "game_state(player(0,0,5),[enemy(range,2,0,3),enemy(melee,1,1,4)],\
             [[0,1,0],[0,0,0],[0,0,2]],2,3)"
        );
        assert_eq!(request.target_at(Coord::new(1, 1)), Some(EntityId(2)));
        assert_eq!(request.target_at(Coord::new(0, 0)), None);
    }

    #[test]
    fn test_dead_enemies_omitted() {
        let map = Grid::filled(2, 2, Terrain::Grass).unwrap();
        let mut world = World::new(map, Coord::new(0, 0), 3);
        let ranged = world.spawn_enemy(EnemyKind::Ranged, Coord::new(1, 0));
        world.spawn_enemy(EnemyKind::Melee, Coord::new(1, 1));
        world.entity_mut(ranged).unwrap().hp = 0;

        let request = OracleRequest::encode(&world, 1);
        assert_eq!(
            request.as_str(),
            "game_state(player(0,0,3),[enemy(melee,1,1,4)],[[0,0],[0,0]],1,2)"
        );
        assert_eq!(request.target_at(Coord::new(1, 0)), None);
    }
}
