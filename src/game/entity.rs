//! Units on the grid.

use serde::{Deserialize, Serialize};

use crate::game::Coord;

/// Stable identifier for an entity in the world registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Computer-controlled unit variants.
///
/// Each arm carries its own stats; decision logic lives in [`crate::game::ai`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Shoots the player from up to two cells away when it has line of sight.
    Ranged,
    /// Closes in and strikes adjacent players.
    Melee,
}

impl EnemyKind {
    /// Starting and maximum hit points.
    #[must_use]
    pub const fn max_hp(self) -> u32 {
        match self {
            EnemyKind::Ranged => 3,
            EnemyKind::Melee => 4,
        }
    }

    /// Chebyshev reach of the unit's attack.
    #[must_use]
    pub const fn attack_range(self) -> u32 {
        match self {
            EnemyKind::Ranged => 2,
            EnemyKind::Melee => 1,
        }
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            EnemyKind::Ranged => 1,
            EnemyKind::Melee => 2,
        }
    }

    /// Type atom used in the oracle request.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            EnemyKind::Ranged => "range",
            EnemyKind::Melee => "melee",
        }
    }
}

/// Which side of the fight an entity is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The oracle-controlled unit.
    Player,
    /// A computer-controlled unit.
    Enemy(EnemyKind),
}

/// A unit in the world registry.
///
/// Dead entities stay in the registry with `hp == 0` so renderers can still
/// show where they fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Registry key.
    pub id: EntityId,
    /// Side and variant.
    pub role: Role,
    /// Current cell.
    pub pos: Coord,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
}

impl Entity {
    /// Create an entity at full health.
    #[must_use]
    pub const fn new(id: EntityId, role: Role, pos: Coord, max_hp: u32) -> Self {
        Self {
            id,
            role,
            pos,
            hp: max_hp,
            max_hp,
        }
    }

    /// Alive means hp above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Check if this is the player unit.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.role, Role::Player)
    }

    /// Enemy variant, if this is an enemy.
    #[must_use]
    pub const fn enemy_kind(&self) -> Option<EnemyKind> {
        match self.role {
            Role::Enemy(kind) => Some(kind),
            Role::Player => None,
        }
    }

    /// Subtract damage, flooring at zero. Returns the remaining hp.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        self.hp = self.hp.saturating_sub(damage);
        self.hp
    }

    /// Short label for logs and renderers.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.role {
            Role::Player => "player",
            Role::Enemy(EnemyKind::Ranged) => "ranged",
            Role::Enemy(EnemyKind::Melee) => "melee",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_stats() {
        assert_eq!(EnemyKind::Ranged.max_hp(), 3);
        assert_eq!(EnemyKind::Ranged.attack_range(), 2);
        assert_eq!(EnemyKind::Ranged.damage(), 1);
        assert_eq!(EnemyKind::Melee.max_hp(), 4);
        assert_eq!(EnemyKind::Melee.damage(), 2);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut e = Entity::new(EntityId(1), Role::Enemy(EnemyKind::Melee), Coord::new(0, 0), 4);
        assert_eq!(e.take_damage(3), 1);
        assert!(e.is_alive());
        assert_eq!(e.take_damage(7), 0);
        assert!(!e.is_alive());
    }

    #[test]
    fn test_enemy_kind_serde_names() {
        let json = serde_json::to_string(&[EnemyKind::Ranged, EnemyKind::Melee]).unwrap();
        assert_eq!(json, r#"["ranged","melee"]"#);
    }
}
