//! Grid pathfinding for unit movement.
//!
//! Movement is 4-directional over grass. Occupied cells are supplied by the
//! caller and change between decisions, so nothing here is cached.

use std::collections::{HashSet, VecDeque};

use crate::game::{Coord, Grid};

/// Cells currently held by other living units.
pub type Occupancy = HashSet<Coord>;

/// First step of a shortest 4-directional path from `start` to `target`.
///
/// A cell is traversable when it is grass and not occupied; the target cell
/// is exempt from the occupancy check so units can close on an occupied
/// target. Neighbours expand in the fixed order down, up, right, left, which
/// makes ties between equal-length paths deterministic.
///
/// Returns `None` when `start == target` or no path exists.
#[must_use]
pub fn next_step_towards(
    start: Coord,
    target: Coord,
    grid: &Grid,
    occupied: &Occupancy,
) -> Option<Coord> {
    if start == target {
        return None;
    }

    let mut visited = vec![false; grid.len()];
    if let Some(idx) = grid.index_of(start) {
        visited[idx] = true;
    }

    // Each entry carries the first step taken from `start` to reach it.
    let mut queue: VecDeque<(Coord, Option<Coord>)> = VecDeque::new();
    queue.push_back((start, None));

    while let Some((cell, first_step)) = queue.pop_front() {
        for neighbor in cell.orthogonal() {
            let Some(idx) = grid.index_of(neighbor) else {
                continue;
            };
            if visited[idx] || !grid.is_walkable(neighbor) {
                continue;
            }
            if neighbor != target && occupied.contains(&neighbor) {
                continue;
            }

            let step = first_step.unwrap_or(neighbor);
            if neighbor == target {
                return Some(step);
            }

            visited[idx] = true;
            queue.push_back((neighbor, Some(step)));
        }
    }

    None
}

/// Single orthogonal step that increases Chebyshev distance from `threat`.
///
/// Candidates must be grass and unoccupied. The first neighbour (in the order
/// down, up, right, left) achieving the largest increase wins; `None` if no
/// neighbour improves on the current distance.
#[must_use]
pub fn step_away_from(
    start: Coord,
    threat: Coord,
    grid: &Grid,
    occupied: &Occupancy,
) -> Option<Coord> {
    let mut best_distance = start.chebyshev(threat);
    let mut best = None;

    for neighbor in start.orthogonal() {
        if !grid.is_walkable(neighbor) || occupied.contains(&neighbor) {
            continue;
        }

        let distance = neighbor.chebyshev(threat);
        if distance > best_distance {
            best_distance = distance;
            best = Some(neighbor);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Terrain;

    fn open(size: u16) -> Grid {
        Grid::filled(size, size, Terrain::Grass).unwrap()
    }

    #[test]
    fn test_straight_line() {
        let grid = open(6);
        let step = next_step_towards(Coord::new(2, 0), Coord::new(0, 0), &grid, &Occupancy::new());
        assert_eq!(step, Some(Coord::new(1, 0)));
    }

    #[test]
    fn test_same_cell() {
        let grid = open(6);
        let c = Coord::new(3, 3);
        assert_eq!(next_step_towards(c, c, &grid, &Occupancy::new()), None);
    }

    #[test]
    fn test_occupied_target_is_reachable() {
        let grid = open(6);
        let target = Coord::new(0, 0);
        let occupied: Occupancy = [target].into_iter().collect();
        let step = next_step_towards(Coord::new(0, 2), target, &grid, &occupied);
        assert_eq!(step, Some(Coord::new(0, 1)));
    }

    #[test]
    fn test_routes_around_obstacles() {
        let mut grid = open(6);
        grid.set(Coord::new(1, 0), Terrain::Mountain);
        // Down is expanded first, so the detour goes through (2,1).
        let step = next_step_towards(Coord::new(2, 0), Coord::new(0, 0), &grid, &Occupancy::new());
        assert_eq!(step, Some(Coord::new(2, 1)));
    }

    #[test]
    fn test_occupied_cells_block() {
        let grid = open(3);
        // Wall of units across the middle row.
        let occupied: Occupancy = [Coord::new(0, 1), Coord::new(1, 1), Coord::new(2, 1)]
            .into_iter()
            .collect();
        let step = next_step_towards(Coord::new(1, 0), Coord::new(1, 2), &grid, &occupied);
        assert_eq!(step, None);
    }

    #[test]
    fn test_water_blocks() {
        let mut grid = open(3);
        for x in 0..3 {
            grid.set(Coord::new(x, 1), Terrain::Water);
        }
        let step = next_step_towards(Coord::new(0, 0), Coord::new(0, 2), &grid, &Occupancy::new());
        assert_eq!(step, None);
    }

    #[test]
    fn test_tie_break_prefers_down() {
        let grid = open(6);
        // Both (2,3) and (3,2) start shortest paths to (3,3).
        let step = next_step_towards(Coord::new(2, 2), Coord::new(3, 3), &grid, &Occupancy::new());
        assert_eq!(step, Some(Coord::new(2, 3)));
    }

    #[test]
    fn test_deterministic() {
        let mut grid = open(6);
        grid.set(Coord::new(3, 3), Terrain::Mountain);
        grid.set(Coord::new(2, 4), Terrain::Water);
        let occupied: Occupancy = [Coord::new(4, 4)].into_iter().collect();
        let first = next_step_towards(Coord::new(0, 5), Coord::new(5, 0), &grid, &occupied);
        for _ in 0..10 {
            assert_eq!(
                next_step_towards(Coord::new(0, 5), Coord::new(5, 0), &grid, &occupied),
                first
            );
        }
    }

    #[test]
    fn test_step_away_increases_distance() {
        let grid = open(6);
        let step = step_away_from(Coord::new(2, 2), Coord::new(2, 1), &grid, &Occupancy::new());
        // Down moves from distance 1 to 2; it is also first in order.
        assert_eq!(step, Some(Coord::new(2, 3)));
    }

    #[test]
    fn test_step_away_picks_largest_increase() {
        let grid = open(6);
        // Threat at (1,0). From (1,1): down -> dist 2, right -> dist 1, left -> dist 1.
        let step = step_away_from(Coord::new(1, 1), Coord::new(1, 0), &grid, &Occupancy::new());
        assert_eq!(step, Some(Coord::new(1, 2)));
    }

    #[test]
    fn test_step_away_cornered() {
        let grid = open(3);
        let occupied: Occupancy = [Coord::new(0, 1)].into_iter().collect();
        // At (0,0) with threat at (2,2): right (1,0) keeps distance 2, down is occupied.
        let step = step_away_from(Coord::new(0, 0), Coord::new(2, 2), &grid, &occupied);
        assert_eq!(step, None);
    }
}
