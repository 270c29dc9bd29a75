use lantern_core::Point;

use crate::PathSearch;
use crate::search::PathNode;
use crate::traits::Pather;

impl PathSearch {
    /// Compute a multi-source breadth-first distance map.
    ///
    /// Each step has cost 1 and only traversable neighbours are entered;
    /// sources are always included at cost 0. Expansion stops when the
    /// distance exceeds `max_dist`. Returns all reached nodes in visiting
    /// order.
    pub fn bfs_map<P: Pather>(
        &mut self,
        pather: &P,
        sources: &[Point],
        max_dist: i32,
    ) -> &[PathNode] {
        self.bfs_map.clear();
        self.bfs_queue.clear();
        self.bfs_results.clear();

        for &src in sources {
            if self.bfs_map.contains_key(&src) {
                continue;
            }
            self.bfs_map.insert(src, 0);
            self.bfs_queue.push_back(src);
            self.bfs_results.push(PathNode { pos: src, cost: 0 });
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);

        while let Some(cp) = self.bfs_queue.pop_front() {
            let current_dist = self.bfs_map.get(&cp).copied().unwrap_or(0);
            let nd = current_dist + 1;
            if nd > max_dist {
                continue;
            }

            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                if self.bfs_map.contains_key(&np) || !pather.traversable(np) {
                    continue;
                }
                self.bfs_map.insert(np, nd);
                self.bfs_queue.push_back(np);
                self.bfs_results.push(PathNode { pos: np, cost: nd });
            }
        }

        self.nbuf = nbuf;
        &self.bfs_results
    }

    /// Query the distance at `p` from the last [`bfs_map`](Self::bfs_map) call.
    ///
    /// Returns `None` if `p` was not reached.
    pub fn bfs_at(&self, p: Point) -> Option<i32> {
        self.bfs_map.get(&p).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tests::TestGrid;

    #[test]
    fn distances_on_open_grid() {
        let grid = TestGrid::open(5, 5);
        let mut search = PathSearch::new();
        let reached = search.bfs_map(&grid, &[Point::new(0, 0)], i32::MAX).len();
        assert_eq!(reached, 25);
        assert_eq!(search.bfs_at(Point::new(0, 0)), Some(0));
        assert_eq!(search.bfs_at(Point::new(4, 4)), Some(8));
        assert_eq!(search.bfs_at(Point::new(5, 5)), None);
    }

    #[test]
    fn max_dist_limits_expansion() {
        let grid = TestGrid::open(10, 10);
        let mut search = PathSearch::new();
        let nodes = search.bfs_map(&grid, &[Point::new(5, 5)], 1);
        assert_eq!(nodes.len(), 5);
        assert!(nodes.iter().all(|n| n.cost <= 1));
    }

    #[test]
    fn blocked_cells_split_regions() {
        let wall: Vec<Point> = (0..5).map(|y| Point::new(2, y)).collect();
        let grid = TestGrid::with_blocked(5, 5, &wall);
        let mut search = PathSearch::new();
        search.bfs_map(&grid, &[Point::new(0, 0)], i32::MAX);
        assert_eq!(search.bfs_at(Point::new(1, 4)), Some(5));
        assert_eq!(search.bfs_at(Point::new(2, 0)), None);
        assert_eq!(search.bfs_at(Point::new(3, 0)), None);
    }

    #[test]
    fn multiple_sources_take_nearest() {
        let grid = TestGrid::open(7, 1);
        let mut search = PathSearch::new();
        search.bfs_map(&grid, &[Point::new(0, 0), Point::new(6, 0), Point::new(0, 0)], i32::MAX);
        assert_eq!(search.bfs_at(Point::new(3, 0)), Some(3));
        assert_eq!(search.bfs_at(Point::new(5, 0)), Some(1));
    }
}
