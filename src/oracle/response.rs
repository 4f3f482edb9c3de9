//! Response parsing.
//!
//! Grammar (exactly one term, optional trailing `.`):
//!
//! ```text
//! move(X, Y)
//! melee_attack(EX, EY, Damage)
//! melee_push(EX, EY, DX, DY)
//! range_attack(EX, EY, Damage)
//! no_action
//! ```

use crate::error::OracleError;
use crate::game::{Action, Coord, Offset};
use crate::oracle::OracleRequest;

/// A syntactically valid response, before targets are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseTerm {
    /// `move(X, Y)`
    Move(Coord),
    /// `melee_attack(EX, EY, Damage)`
    MeleeAttack {
        /// Target cell in the request snapshot.
        at: Coord,
        /// Damage dealt.
        damage: u32,
    },
    /// `melee_push(EX, EY, DX, DY)`
    MeleePush {
        /// Target cell in the request snapshot.
        at: Coord,
        /// Push offset.
        direction: Offset,
    },
    /// `range_attack(EX, EY, Damage)`
    RangeAttack {
        /// Target cell in the request snapshot.
        at: Coord,
        /// Damage dealt.
        damage: u32,
    },
    /// `no_action`
    NoAction,
}

impl ResponseTerm {
    /// Parse one response term.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Empty`] for blank input and
    /// [`OracleError::Malformed`] for anything outside the grammar.
    pub fn parse(input: &str) -> Result<Self, OracleError> {
        let term = input.trim();
        let term = term.strip_suffix('.').unwrap_or(term).trim_end();
        if term.is_empty() {
            return Err(OracleError::Empty);
        }
        if term == "no_action" {
            return Ok(Self::NoAction);
        }

        let malformed = || OracleError::Malformed(input.trim().to_string());

        let (name, rest) = term.split_once('(').ok_or_else(malformed)?;
        let body = rest.strip_suffix(')').ok_or_else(malformed)?;
        let args: Vec<&str> = body.split(',').map(str::trim).collect();

        let int = |s: &str| s.parse::<i32>().map_err(|_| malformed());
        let amount = |s: &str| s.parse::<u32>().map_err(|_| malformed());

        match (name.trim_end(), args.as_slice()) {
            ("move", [x, y]) => Ok(Self::Move(Coord::new(int(x)?, int(y)?))),
            ("melee_attack", [x, y, damage]) => Ok(Self::MeleeAttack {
                at: Coord::new(int(x)?, int(y)?),
                damage: amount(damage)?,
            }),
            ("melee_push", [x, y, dx, dy]) => Ok(Self::MeleePush {
                at: Coord::new(int(x)?, int(y)?),
                direction: Offset::new(int(dx)?, int(dy)?),
            }),
            ("range_attack", [x, y, damage]) => Ok(Self::RangeAttack {
                at: Coord::new(int(x)?, int(y)?),
                damage: amount(damage)?,
            }),
            _ => Err(malformed()),
        }
    }

    /// Map target cells back to identifiers using the request snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::NoTargetAt`] if a targeted cell held no
    /// enemy when the request was made.
    pub fn into_action(self, request: &OracleRequest) -> Result<Action, OracleError> {
        let target = |at: Coord| request.target_at(at).ok_or(OracleError::NoTargetAt(at));

        Ok(match self {
            Self::Move(dest) => Action::Move { dest },
            Self::MeleeAttack { at, damage } => Action::MeleeAttack {
                target: target(at)?,
                damage,
            },
            Self::MeleePush { at, direction } => Action::MeleePush {
                target: target(at)?,
                direction,
            },
            Self::RangeAttack { at, damage } => Action::RangedAttack {
                target: target(at)?,
                damage,
            },
            Self::NoAction => Action::None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EnemyKind, EntityId, Grid, Terrain, World};

    #[test]
    fn test_parse_each_form() {
        let cases = [
            ("move(3,4)", ResponseTerm::Move(Coord::new(3, 4))),
            (
                "melee_attack(2, 3, 2)",
                ResponseTerm::MeleeAttack {
                    at: Coord::new(2, 3),
                    damage: 2,
                },
            ),
            (
                "melee_push(1,1,-1,0)",
                ResponseTerm::MeleePush {
                    at: Coord::new(1, 1),
                    direction: Offset::new(-1, 0),
                },
            ),
            (
                "range_attack(0,5,1)",
                ResponseTerm::RangeAttack {
                    at: Coord::new(0, 5),
                    damage: 1,
                },
            ),
            ("no_action", ResponseTerm::NoAction),
            ("  move(1,2).\n", ResponseTerm::Move(Coord::new(1, 2))),
            ("no_action .", ResponseTerm::NoAction),
        ];

        for (input, expected) in cases {
            assert_eq!(ResponseTerm::parse(input).unwrap(), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_rejects_outside_grammar() {
        for input in [
            "foo(1,2)",
            "move(1)",
            "move(1,2,3)",
            "move(a,b)",
            "move(1,2",
            "melee_attack(1,2,-3)",
            "range_attack(1,2)",
            "Move(1,2)",
            "no_action(1)",
            "move((1),2)",
            "move(1,2) move(3,4)",
        ] {
            assert!(
                matches!(ResponseTerm::parse(input), Err(OracleError::Malformed(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_blank() {
        assert!(matches!(ResponseTerm::parse(""), Err(OracleError::Empty)));
        assert!(matches!(ResponseTerm::parse("  .  "), Err(OracleError::Empty)));
    }

    #[test]
    fn test_targets_resolve_through_snapshot() {
        let map = Grid::filled(6, 6, Terrain::Grass).unwrap();
        let mut world = World::new(map, Coord::new(0, 0), 5);
        world.spawn_enemy(EnemyKind::Ranged, Coord::new(3, 3));
        world.spawn_enemy(EnemyKind::Melee, Coord::new(1, 0));
        let request = OracleRequest::encode(&world, 2);

        let action = ResponseTerm::parse("melee_attack(1,0,2)")
            .unwrap()
            .into_action(&request)
            .unwrap();
        assert_eq!(
            action,
            Action::MeleeAttack {
                target: EntityId(2),
                damage: 2
            }
        );

        let err = ResponseTerm::parse("range_attack(4,4,1)")
            .unwrap()
            .into_action(&request)
            .unwrap_err();
        assert!(matches!(err, OracleError::NoTargetAt(c) if c == Coord::new(4, 4)));
    }
}
