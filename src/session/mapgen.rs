//! Seeded map generation.
//!
//! Terrain is drawn per cell, then repaired in two passes: enough grass to
//! meet the walkable ratio, then corridors carved until every grass cell is
//! reachable from every other.

// Ratio math converts between cell counts and floats
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use std::collections::{HashSet, VecDeque};

use rand::Rng;

use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::game::{Coord, Grid, Terrain};

/// Draws before [`random_walkable_position`] falls back to a scan.
const PLACEMENT_ATTEMPTS: usize = 100;

/// Generate a grid for `config`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for a zero-sized grid and
/// [`ConfigError::NoWalkableCell`] if no grass survives generation.
pub fn generate<R: Rng + ?Sized>(config: &SessionConfig, rng: &mut R) -> Result<Grid, ConfigError> {
    let size = config.grid_size;
    let mut grid = Grid::filled(size, size, Terrain::Grass)
        .ok_or_else(|| ConfigError::Invalid(format!("grid_size {size} is empty")))?;

    let grass = config.terrain.grass;
    let mountain = grass + config.terrain.mountain;
    for idx in 0..grid.len() {
        let roll: f64 = rng.r#gen();
        let terrain = if roll < grass {
            Terrain::Grass
        } else if roll < mountain {
            Terrain::Mountain
        } else {
            Terrain::Water
        };
        grid.set(grid.coord_of(idx), terrain);
    }

    enforce_walkable_ratio(&mut grid, config.min_walkable_ratio);
    connect(&mut grid);

    if grid.walkable_count() == 0 {
        return Err(ConfigError::NoWalkableCell);
    }

    tracing::debug!(
        size,
        walkable = grid.walkable_count(),
        "map generated"
    );
    Ok(grid)
}

/// Convert non-grass cells to grass in row-major order until at least
/// `ceil(cells * ratio)` cells are grass.
pub fn enforce_walkable_ratio(grid: &mut Grid, ratio: f64) {
    let total = grid.len();
    let required = ((total as f64) * ratio).ceil().clamp(0.0, total as f64) as usize;
    let mut walkable = grid.walkable_count();

    for idx in 0..total {
        if walkable >= required {
            break;
        }
        let coord = grid.coord_of(idx);
        if !grid.is_walkable(coord) {
            grid.set(coord, Terrain::Grass);
            walkable += 1;
        }
    }
}

/// Carve corridors until all grass cells form one 4-connected region.
///
/// The region grows from the first grass cell in row-major order. Each
/// isolated grass cell is joined from the nearest reachable cell (Manhattan
/// distance, first in row-major order on ties) by stepping along x first and
/// then along y, turning every cell on the way into grass.
pub fn connect(grid: &mut Grid) {
    let Some(seed) = grid.iter().find(|(_, t)| t.is_walkable()).map(|(c, _)| c) else {
        return;
    };
    let mut reachable = flood_fill(grid, seed);

    for idx in 0..grid.len() {
        let target = grid.coord_of(idx);
        if !grid.is_walkable(target) || reachable[idx] {
            continue;
        }

        let Some(start) = nearest_reachable(grid, &reachable, target) else {
            continue;
        };
        tracing::trace!(%start, %target, "carving corridor");

        let mut current = start;
        while current != target {
            if current.x != target.x {
                current.x += (target.x - current.x).signum();
            } else {
                current.y += (target.y - current.y).signum();
            }
            grid.set(current, Terrain::Grass);
        }

        // The corridor may have joined other isolated pockets too.
        reachable = flood_fill(grid, seed);
    }
}

/// Check whether every grass cell is reachable from every other.
#[must_use]
pub fn is_connected(grid: &Grid) -> bool {
    let Some(seed) = grid.iter().find(|(_, t)| t.is_walkable()).map(|(c, _)| c) else {
        return true;
    };
    let reachable = flood_fill(grid, seed);
    grid.iter()
        .enumerate()
        .all(|(idx, (_, terrain))| !terrain.is_walkable() || reachable[idx])
}

/// Pick a random grass cell not in `excluding`.
///
/// Tries a bounded number of uniform draws, then scans in row-major order,
/// and finally returns the origin if no cell qualifies.
pub fn random_walkable_position<R: Rng + ?Sized>(
    grid: &Grid,
    excluding: &HashSet<Coord>,
    rng: &mut R,
) -> Coord {
    let usable = |coord: Coord| grid.is_walkable(coord) && !excluding.contains(&coord);

    for _ in 0..PLACEMENT_ATTEMPTS {
        let coord = Coord::new(
            rng.gen_range(0..i32::from(grid.width())),
            rng.gen_range(0..i32::from(grid.height())),
        );
        if usable(coord) {
            return coord;
        }
    }

    grid.iter()
        .map(|(coord, _)| coord)
        .find(|&coord| usable(coord))
        .unwrap_or_else(|| {
            tracing::warn!("no free walkable cell, placing at origin");
            Coord::new(0, 0)
        })
}

/// Grass cells 4-connected to `start`, indexed row-major.
fn flood_fill(grid: &Grid, start: Coord) -> Vec<bool> {
    let mut reachable = vec![false; grid.len()];
    let Some(idx) = grid.index_of(start).filter(|_| grid.is_walkable(start)) else {
        return reachable;
    };
    reachable[idx] = true;

    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for neighbor in cell.orthogonal() {
            let Some(idx) = grid.index_of(neighbor) else {
                continue;
            };
            if !reachable[idx] && grid.is_walkable(neighbor) {
                reachable[idx] = true;
                queue.push_back(neighbor);
            }
        }
    }

    reachable
}

fn nearest_reachable(grid: &Grid, reachable: &[bool], target: Coord) -> Option<Coord> {
    reachable
        .iter()
        .enumerate()
        .filter(|&(_, &r)| r)
        .map(|(idx, _)| grid.coord_of(idx))
        .min_by_key(|coord| coord.manhattan(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainWeights;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::game::Terrain::{Grass as G, Mountain as M, Water as W};

    #[test]
    fn test_deterministic_for_seed() {
        let config = SessionConfig::default();
        let a = generate(&config, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = generate(&config, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_guarantees_over_many_seeds() {
        let config = SessionConfig::default();
        for seed in 0..200 {
            let grid = generate(&config, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            assert!(grid.walkable_count() * 10 >= grid.len() * 7, "seed {seed}");
            assert!(is_connected(&grid), "seed {seed}");
        }
    }

    #[test]
    fn test_hostile_weights_still_playable() {
        let config = SessionConfig {
            grid_size: 10,
            terrain: TerrainWeights {
                grass: 0.2,
                mountain: 0.4,
            },
            ..SessionConfig::default()
        };
        let grid = generate(&config, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert!(grid.walkable_count() >= 70);
        assert!(is_connected(&grid));
    }

    #[test]
    fn test_ratio_fills_row_major() {
        let mut grid = Grid::from_rows(&[vec![M, W], vec![M, G]]).unwrap();
        enforce_walkable_ratio(&mut grid, 0.70);
        // ceil(4 * 0.7) = 3 grass cells, converted from the top-left.
        assert_eq!(grid.rows(), vec![vec![0, 0], vec![1, 0]]);
    }

    #[test]
    fn test_connect_carves_x_then_y() {
        let mut grid = Grid::from_rows(&[
            vec![G, M, M],
            vec![M, M, M],
            vec![M, M, G],
        ])
        .unwrap();
        connect(&mut grid);
        assert!(is_connected(&grid));
        // From (0,0): x first along the top row, then down the right column.
        assert_eq!(grid.rows(), vec![vec![0, 0, 0], vec![1, 1, 0], vec![1, 1, 0]]);
    }

    #[test]
    fn test_connect_picks_nearest_reachable() {
        let mut grid = Grid::from_rows(&[
            vec![G, G, G, G],
            vec![W, W, W, G],
            vec![W, W, W, W],
            vec![G, W, W, W],
        ])
        .unwrap();
        connect(&mut grid);
        assert!(is_connected(&grid));
        // (0,3) is nearest to (0,0): the corridor runs straight down column 0.
        assert_eq!(grid.terrain(Coord::new(0, 1)), Some(G));
        assert_eq!(grid.terrain(Coord::new(0, 2)), Some(G));
        assert_eq!(grid.walkable_count(), 8);
    }

    #[test]
    fn test_all_blocked_is_an_error() {
        let config = SessionConfig {
            terrain: TerrainWeights {
                grass: 0.0,
                mountain: 1.0,
            },
            min_walkable_ratio: 0.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            generate(&config, &mut ChaCha8Rng::seed_from_u64(1)),
            Err(ConfigError::NoWalkableCell)
        ));
    }

    #[test]
    fn test_random_position_respects_exclusion() {
        let grid = Grid::from_rows(&[vec![G, M], vec![W, G]]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let excluding: HashSet<Coord> = [Coord::new(0, 0)].into_iter().collect();
        for _ in 0..20 {
            assert_eq!(random_walkable_position(&grid, &excluding, &mut rng), Coord::new(1, 1));
        }
    }

    #[test]
    fn test_random_position_last_resort() {
        let grid = Grid::filled(2, 2, M).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            random_walkable_position(&grid, &HashSet::new(), &mut rng),
            Coord::new(0, 0)
        );
    }
}
