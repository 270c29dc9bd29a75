//! Path searches for the lantern cavern crawler.
//!
//! - **Best-first search** with a squared-distance heuristic and an
//!   expansion cap ([`PathSearch::best_first_path`]), used for monster
//!   pursuit.
//! - **BFS** unweighted distance maps ([`PathSearch::bfs_map`]), used for
//!   reachability checks and level population.
//!
//! Searches run through [`PathSearch`], which owns and reuses its caches.
//! Graphs are described by the [`Pather`] / [`BestFirstPather`] traits, so
//! the same search serves the tile grid and any other positioned graph.

mod bfs;
mod distance;
mod search;
mod traits;

pub use distance::{manhattan, squared_euclidean};
pub use search::{PathNode, PathSearch, find_path};
pub use traits::{BestFirstPather, Pather};
