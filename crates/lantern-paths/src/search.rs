use std::collections::{BinaryHeap, HashMap, VecDeque};

use lantern_core::Point;

use crate::traits::BestFirstPather;

/// A position with an associated cost, returned from distance-map queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pub pos: Point,
    pub cost: i32,
}

// ---------------------------------------------------------------------------
// Internal node for the best-first open list
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
pub(crate) struct Node {
    pub(crate) g: i32,
    pub(crate) parent: Option<Point>,
}

/// Open-list entry ordered by `f`, then by discovery order.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) pos: Point,
    pub(crate) f: i32,
    pub(crate) seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first, and among
        // equal f the entry discovered first.
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// PathSearch
// ---------------------------------------------------------------------------

/// Reusable search state for best-first paths and breadth-first maps.
///
/// `PathSearch` owns the node tables, open list and scratch buffers, so
/// repeated queries at tick rate reuse their allocations. Every query resets
/// the state it uses; nothing carries over between calls.
#[derive(Default)]
pub struct PathSearch {
    // best-first caches
    pub(crate) nodes: HashMap<Point, Node>,
    pub(crate) open: BinaryHeap<NodeRef>,
    pub(crate) expansions: usize,
    // BFS caches
    pub(crate) bfs_map: HashMap<Point, i32>,
    pub(crate) bfs_queue: VecDeque<Point>,
    pub(crate) bfs_results: Vec<PathNode>,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<Point>,
}

impl PathSearch {
    pub fn new() -> Self {
        Self {
            nbuf: Vec::with_capacity(4),
            ..Self::default()
        }
    }

    /// Number of nodes expanded by the last [`best_first_path`](Self::best_first_path).
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Compute a route from `from` to `to` with a best-first search.
    ///
    /// Each step costs 1 and nodes are ranked by `g + estimate`. The open
    /// node with the smallest rank is expanded next, ties going to the node
    /// discovered first. A neighbour is entered when it is traversable or is
    /// the goal itself, so an occupied goal can still be reached.
    ///
    /// Returns:
    /// - `Some(steps)`: the positions after `from`, ending at `to`;
    /// - `Some(vec![])`: `to` is `from` or adjacent to it, nothing to walk;
    /// - `None`: the goal is unreachable, or `cap` expansions ran out first.
    pub fn best_first_path<P: BestFirstPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
        cap: Option<usize>,
    ) -> Option<Vec<Point>> {
        self.nodes.clear();
        self.open.clear();
        self.expansions = 0;

        let mut seq = 0u64;
        self.nodes.insert(from, Node { g: 0, parent: None });
        self.open.push(NodeRef {
            pos: from,
            f: 0,
            seq,
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            if cap.is_some_and(|cap| self.expansions >= cap) {
                log::debug!(
                    "path search {from} -> {to} gave up after {} expansions",
                    self.expansions
                );
                break 'search false;
            }
            let Some(current) = self.open.pop() else {
                break 'search false;
            };
            self.expansions += 1;

            let cp = current.pos;
            if cp == to {
                break 'search true;
            }

            let current_g = self.nodes.get(&cp).map_or(0, |n| n.g);

            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                // Already open or closed: first discovery wins.
                if self.nodes.contains_key(&np) {
                    continue;
                }
                if np != to && !pather.traversable(np) {
                    continue;
                }
                let g = current_g + 1;
                seq += 1;
                self.nodes.insert(np, Node { g, parent: Some(cp) });
                self.open.push(NodeRef {
                    pos: np,
                    f: g.saturating_add(pather.estimate(np, to)),
                    seq,
                });
            }
        };

        self.nbuf = nbuf;

        if !found {
            return None;
        }

        // Reconstruct path.
        let mut path = Vec::new();
        let mut cur = Some(to);
        while let Some(p) = cur {
            path.push(p);
            cur = self.nodes.get(&p).and_then(|n| n.parent);
        }
        if path.len() <= 2 {
            return Some(Vec::new());
        }
        path.reverse();
        path.remove(0);
        Some(path)
    }
}

/// One-shot convenience around [`PathSearch::best_first_path`].
pub fn find_path<P: BestFirstPather>(
    pather: &P,
    from: Point,
    to: Point,
    cap: Option<usize>,
) -> Option<Vec<Point>> {
    PathSearch::new().best_first_path(pather, from, to, cap)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use lantern_core::Direction;

    use super::*;
    use crate::traits::Pather;

    /// Rectangular test grid `[0, w) x [0, h)` with blocked cells.
    pub(crate) struct TestGrid {
        pub(crate) w: i32,
        pub(crate) h: i32,
        pub(crate) blocked: HashSet<Point>,
    }

    impl TestGrid {
        pub(crate) fn open(w: i32, h: i32) -> Self {
            Self {
                w,
                h,
                blocked: HashSet::new(),
            }
        }

        pub(crate) fn with_blocked(w: i32, h: i32, blocked: &[Point]) -> Self {
            Self {
                w,
                h,
                blocked: blocked.iter().copied().collect(),
            }
        }

        fn contains(&self, p: Point) -> bool {
            p.x >= 0 && p.y >= 0 && p.x < self.w && p.y < self.h
        }
    }

    impl Pather for TestGrid {
        fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
            for dir in Direction::ALL {
                let n = p.step(dir);
                if self.contains(n) {
                    buf.push(n);
                }
            }
        }

        fn traversable(&self, p: Point) -> bool {
            self.contains(p) && !self.blocked.contains(&p)
        }
    }

    impl BestFirstPather for TestGrid {}

    fn assert_contiguous(from: Point, path: &[Point]) {
        let mut prev = from;
        for &p in path {
            assert_eq!(crate::manhattan(prev, p), 1, "{prev} -> {p} is not a step");
            prev = p;
        }
    }

    #[test]
    fn open_grid_path_is_manhattan_optimal() {
        let grid = TestGrid::open(5, 5);
        let from = Point::new(0, 0);
        let to = Point::new(4, 4);
        let path = find_path(&grid, from, to, Some(1000)).expect("path");
        assert_eq!(path.len(), 8);
        assert_eq!(path.last(), Some(&to));
        assert!(!path.contains(&from));
        assert_contiguous(from, &path);
    }

    #[test]
    fn adjacent_goal_yields_empty_path() {
        let grid = TestGrid::open(5, 5);
        let path = find_path(&grid, Point::new(0, 0), Point::new(0, 1), Some(1000));
        assert_eq!(path, Some(vec![]));
    }

    #[test]
    fn goal_equal_to_start_yields_empty_path() {
        let grid = TestGrid::open(3, 3);
        let p = Point::new(1, 1);
        assert_eq!(find_path(&grid, p, p, None), Some(vec![]));
    }

    #[test]
    fn walled_in_goal_is_unreachable() {
        let goal = Point::new(3, 3);
        let grid = TestGrid::with_blocked(
            7,
            7,
            &[
                Point::new(3, 2),
                Point::new(3, 4),
                Point::new(2, 3),
                Point::new(4, 3),
            ],
        );
        assert_eq!(find_path(&grid, Point::new(0, 0), goal, Some(1000)), None);
    }

    #[test]
    fn cap_stops_search_on_large_grid() {
        let grid = TestGrid::open(200, 200);
        let mut search = PathSearch::new();
        let path = search.best_first_path(&grid, Point::new(0, 0), Point::new(199, 199), Some(1));
        assert_eq!(path, None);
        assert_eq!(search.expansions(), 1);
    }

    #[test]
    fn non_traversable_goal_is_still_reached() {
        let goal = Point::new(2, 2);
        let grid = TestGrid::with_blocked(5, 5, &[goal]);
        let path = find_path(&grid, Point::new(0, 0), goal, None).expect("path");
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn path_detours_around_wall() {
        let wall: Vec<Point> = (0..4).map(|y| Point::new(3, y)).collect();
        let grid = TestGrid::with_blocked(7, 5, &wall);
        let from = Point::new(0, 0);
        let to = Point::new(6, 0);
        let path = find_path(&grid, from, to, Some(1000)).expect("path");
        assert_eq!(path.len(), 14);
        assert!(path.iter().all(|p| !wall.contains(p)));
        assert!(path.contains(&Point::new(3, 4)));
        assert_contiguous(from, &path);
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let grid = TestGrid::with_blocked(9, 9, &[Point::new(4, 4), Point::new(4, 5)]);
        let mut search = PathSearch::new();
        let a = search.best_first_path(&grid, Point::new(0, 4), Point::new(8, 4), None);
        let b = search.best_first_path(&grid, Point::new(0, 4), Point::new(8, 4), None);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    /// A tiny non-grid graph: a ring of four nodes with a broken link.
    struct Ring {
        links: HashMap<Point, Vec<Point>>,
    }

    impl Pather for Ring {
        fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
            if let Some(ns) = self.links.get(&p) {
                buf.extend_from_slice(ns);
            }
        }

        fn traversable(&self, _p: Point) -> bool {
            true
        }
    }

    impl BestFirstPather for Ring {}

    #[test]
    fn works_on_arbitrary_graphs() {
        let a = Point::new(0, 0);
        let b = Point::new(10, 0);
        let c = Point::new(10, 10);
        let d = Point::new(0, 10);
        let ring = Ring {
            links: HashMap::from([
                (a, vec![b]),
                (b, vec![a, c]),
                (c, vec![b, d]),
                (d, vec![c]),
            ]),
        };
        assert_eq!(find_path(&ring, a, d, None), Some(vec![b, c, d]));
        assert_eq!(find_path(&ring, d, Point::new(5, 5), None), None);
    }
}
