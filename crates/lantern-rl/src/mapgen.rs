//! Growth cave generation.
//!
//! A frontier spreads out from the origin one generation at a time. Each
//! frontier point is visited once and grows into floor on a coin flip;
//! grown points push their axis neighbours into the next generation. Two
//! boundary passes then close the cave: the first ring is added as floor,
//! the second becomes wall, so every floor tile has a tile on all four
//! sides.

use std::collections::{HashMap, HashSet};

use lantern_core::{Point, TileSpec};
use lantern_paths::Pather;
use rand::Rng;

/// Tunables of the growth generator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GrowthConfig {
    /// A frontier point grows when a uniform roll in `[0, 1)` is at least
    /// this value.
    pub threshold: f64,
    /// Grown-point budget of level 0.
    pub base_budget: usize,
    /// Budget added per level of depth.
    pub budget_per_level: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            base_budget: 1000,
            budget_per_level: 1000,
        }
    }
}

impl GrowthConfig {
    /// Grown-point budget for `level`.
    pub fn budget(&self, level: u32) -> usize {
        let level = usize::try_from(level).unwrap_or(usize::MAX);
        self.base_budget
            .saturating_add(self.budget_per_level.saturating_mul(level))
    }
}

/// A generated layout, ready to be persisted.
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub level: u32,
    /// Every tile of the layout: grown floor first, then the floor ring,
    /// then the walls.
    pub tiles: Vec<TileSpec>,
    /// Positions of the wall ring.
    pub walls: HashSet<Point>,
    lookup: HashMap<Point, bool>,
}

impl GeneratedLevel {
    fn new(level: u32, tiles: Vec<TileSpec>) -> Self {
        let walls = tiles.iter().filter(|t| t.is_wall).map(|t| t.pos).collect();
        let lookup = tiles.iter().map(|t| (t.pos, t.is_wall)).collect();
        Self {
            level,
            tiles,
            walls,
            lookup,
        }
    }

    /// Non-wall positions in layout order.
    pub fn floor(&self) -> impl Iterator<Item = Point> + '_ {
        self.tiles.iter().filter(|t| !t.is_wall).map(|t| t.pos)
    }

    pub fn floor_count(&self) -> usize {
        self.tiles.len() - self.walls.len()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.lookup.contains_key(&p)
    }

    pub fn is_floor(&self, p: Point) -> bool {
        self.lookup.get(&p) == Some(&false)
    }
}

impl Pather for GeneratedLevel {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(p.neighbors_4().into_iter().filter(|n| self.contains(*n)));
    }

    fn traversable(&self, p: Point) -> bool {
        self.is_floor(p)
    }
}

/// Axis neighbours of `points` missing from `occupied`, each listed once in
/// discovery order.
pub fn boundary(points: &[Point], occupied: &HashSet<Point>) -> Vec<Point> {
    let mut seen = HashSet::new();
    points
        .iter()
        .flat_map(|p| p.neighbors_4())
        .filter(|n| !occupied.contains(n) && seen.insert(*n))
        .collect()
}

/// Growth generator driven by an injectable random source.
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub config: GrowthConfig,
}

impl<R: Rng> MapGen<R> {
    pub fn new(config: GrowthConfig, rng: R) -> Self {
        Self { rng, config }
    }

    /// Grow a connected set of floor points around the origin.
    ///
    /// Points are returned in the order they grew; the first is always the
    /// origin. Growth stops when the frontier dies out or the level's budget
    /// is reached. Within a generation, the last candidate always grows if
    /// nothing else in that generation has fed the next frontier.
    pub fn grow(&mut self, level: u32) -> Vec<Point> {
        let budget = self.config.budget(level).max(1);
        let mut grown: Vec<Point> = Vec::new();
        let mut visited: HashSet<Point> = HashSet::new();
        let mut frontier = vec![Point::ZERO];

        while !frontier.is_empty() && grown.len() < budget {
            let mut queued = HashSet::new();
            let candidates: Vec<Point> = frontier
                .drain(..)
                .filter(|p| !visited.contains(p) && queued.insert(*p))
                .collect();
            let mut next = Vec::new();

            for (i, &p) in candidates.iter().enumerate() {
                if grown.len() >= budget {
                    break;
                }
                visited.insert(p);
                let roll: f64 = self.rng.random();
                let last = i + 1 == candidates.len();
                let grows = roll >= self.config.threshold
                    || grown.is_empty()
                    || (last && next.is_empty());
                if !grows {
                    continue;
                }
                grown.push(p);
                next.extend(p.neighbors_4().into_iter().filter(|n| !visited.contains(n)));
            }
            frontier = next;
        }
        grown
    }

    /// Grow a cave for `level` and close it with a floor ring and a wall
    /// ring.
    pub fn generate_level(&mut self, level: u32) -> GeneratedLevel {
        let grown = self.grow(level);
        let mut occupied: HashSet<Point> = grown.iter().copied().collect();

        let ring = boundary(&grown, &occupied);
        occupied.extend(ring.iter().copied());
        let mut open = grown.clone();
        open.extend_from_slice(&ring);

        let walls = boundary(&open, &occupied);

        let mut tiles: Vec<TileSpec> = open.into_iter().map(TileSpec::floor).collect();
        tiles.extend(walls.into_iter().map(TileSpec::wall));
        let generated = GeneratedLevel::new(level, tiles);
        log::debug!(
            "level {level}: grew {} points, {} floor tiles, {} walls",
            grown.len(),
            generated.floor_count(),
            generated.walls.len()
        );
        generated
    }
}
