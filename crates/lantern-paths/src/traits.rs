use lantern_core::Point;

use crate::distance::squared_euclidean;

/// Minimal graph interface for searches: neighbour enumeration and
/// traversability, both keyed by position.
///
/// Nodes are identified by their [`Point`]; any graph whose nodes carry a
/// unique position can implement this, not only tile grids.
pub trait Pather {
    /// Append neighbours of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);

    /// Whether a walker may currently enter `p`.
    fn traversable(&self, p: Point) -> bool;
}

/// Pather usable by [`PathSearch::best_first_path`](crate::PathSearch::best_first_path).
pub trait BestFirstPather: Pather {
    /// Heuristic estimate of the remaining cost from `from` to `to`.
    ///
    /// Defaults to the squared Euclidean distance. It is not admissible, so
    /// the search is greedy rather than guaranteed-optimal.
    fn estimate(&self, from: Point, to: Point) -> i32 {
        squared_euclidean(from, to)
    }
}
