//! Monster pursuit: follow a capped path search, or shuffle greedily.

use lantern_core::Point;
use lantern_paths::PathSearch;
use lantern_rl::GridIndex;

/// What a pursuing monster does this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pursuit {
    /// First step of a found path.
    Path(Point),
    /// No usable path; step to the free neighbour closest to the goal.
    Greedy(Point),
    /// Nowhere to go.
    Stay,
}

impl Pursuit {
    pub fn target(self) -> Option<Point> {
        match self {
            Pursuit::Path(p) | Pursuit::Greedy(p) => Some(p),
            Pursuit::Stay => None,
        }
    }
}

/// Decide the next move from `from` toward `goal`.
///
/// When the search finds no path within `cap` expansions, or the path is
/// empty because `goal` is adjacent, the monster falls back to
/// [`greedy_step`]. The greedy step can lead away from the goal in a dead
/// end; that is accepted.
pub fn next_step(
    search: &mut PathSearch,
    grid: &GridIndex,
    from: Point,
    goal: Point,
    cap: usize,
) -> Pursuit {
    match search.best_first_path(grid, from, goal, Some(cap)) {
        Some(path) if !path.is_empty() => Pursuit::Path(path[0]),
        _ => greedy_step(grid, from, goal).map_or(Pursuit::Stay, Pursuit::Greedy),
    }
}

/// The traversable neighbour of `from` nearest to `goal` in straight-line
/// distance. Ties go to the first in up, down, left, right order.
pub fn greedy_step(grid: &GridIndex, from: Point, goal: Point) -> Option<Point> {
    let tile = grid.at(from)?;
    grid.neighbors(tile)
        .filter(|n| grid.is_traversable(n))
        .min_by_key(|n| n.pos.distance_squared(goal))
        .map(|n| n.pos)
}

#[cfg(test)]
mod tests {
    use lantern_core::{ActorId, MapId, Tile, TileId};

    use super::*;

    /// Builds a grid from rows of `.` (floor) and `#` (wall); row 0 is y = 0.
    fn grid(rows: &[&str]) -> GridIndex {
        let mut tiles = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                tiles.push(Tile {
                    id: TileId(tiles.len() as u64 + 1),
                    map: MapId(1),
                    pos: Point::new(x as i32, y as i32),
                    is_wall: c == '#',
                });
            }
        }
        GridIndex::build(tiles).unwrap()
    }

    #[test]
    fn follows_the_path() {
        let g = grid(&[".....", ".###.", "....."]);
        let mut search = PathSearch::new();
        let step = next_step(&mut search, &g, Point::new(0, 1), Point::new(4, 1), 500);
        assert!(matches!(step, Pursuit::Path(p) if p == Point::new(0, 0) || p == Point::new(0, 2)));
    }

    #[test]
    fn adjacent_goal_falls_back_to_greedy() {
        let mut g = grid(&["...", "...", "..."]);
        let player = g.get(1, 1).unwrap().id;
        g.set_tile(ActorId(0), player).unwrap();
        let mut search = PathSearch::new();
        // the player's own tile is occupied, so the monster sidles next to it
        let step = next_step(&mut search, &g, Point::new(1, 0), Point::new(1, 1), 500);
        assert_eq!(step, Pursuit::Greedy(Point::new(0, 0)));
    }

    #[test]
    fn exhausted_cap_falls_back_to_greedy() {
        let g = grid(&["..........", "..........", ".........."]);
        let mut search = PathSearch::new();
        let step = next_step(&mut search, &g, Point::new(0, 1), Point::new(9, 1), 1);
        assert_eq!(step, Pursuit::Greedy(Point::new(1, 1)));
    }

    #[test]
    fn boxed_in_monster_stays() {
        let g = grid(&["###", "#.#", "###", "..."]);
        let mut search = PathSearch::new();
        let step = next_step(&mut search, &g, Point::new(1, 1), Point::new(0, 3), 500);
        assert_eq!(step, Pursuit::Stay);
        assert_eq!(step.target(), None);
    }

    #[test]
    fn greedy_may_back_away_in_a_dead_end() {
        // goal sits behind the wall; the only free neighbour is farther away
        let g = grid(&["#####", "#..##", "###.."]);
        let from = Point::new(2, 1);
        assert_eq!(greedy_step(&g, from, Point::new(4, 1)), Some(Point::new(1, 1)));
    }
}
