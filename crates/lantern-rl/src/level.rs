//! Level population: entrance, exit, oil and monster spawn spots.

use std::collections::HashSet;

use lantern_core::Point;
use lantern_paths::PathSearch;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::mapgen::GeneratedLevel;

/// How densely a level is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopulateConfig {
    pub monsters_base: usize,
    pub monsters_per_level: usize,
    pub oil_base: usize,
    pub oil_per_level: usize,
    /// Minimum walking distance between entrance and exit.
    pub min_exit_distance: i32,
    /// Monsters never spawn this close (in steps) to the entrance.
    pub spawn_clearance: i32,
}

impl Default for PopulateConfig {
    fn default() -> Self {
        Self {
            monsters_base: 10,
            monsters_per_level: 0,
            oil_base: 12,
            oil_per_level: 2,
            min_exit_distance: 20,
            spawn_clearance: 5,
        }
    }
}

impl PopulateConfig {
    pub fn monsters(&self, level: u32) -> usize {
        scaled(self.monsters_base, self.monsters_per_level, level)
    }

    pub fn oil(&self, level: u32) -> usize {
        scaled(self.oil_base, self.oil_per_level, level)
    }
}

fn scaled(base: usize, per_level: usize, level: u32) -> usize {
    let level = usize::try_from(level).unwrap_or(usize::MAX);
    base.saturating_add(per_level.saturating_mul(level))
}

/// Where things go on a freshly generated level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPlan {
    pub entrance: Point,
    pub exit: Point,
    pub oil: Vec<Point>,
    pub monsters: Vec<Point>,
}

/// Choose spots for the entrance, the exit, oil and monsters.
///
/// The exit is reachable from the entrance, never the entrance itself, and
/// at least `min_exit_distance` steps away when the cave allows it,
/// otherwise as far as possible. Oil and monsters take distinct floor tiles other than the
/// entrance and exit; counts shrink when floor runs out. Returns `None`
/// when the level has no floor.
pub fn plan_level<R: Rng + ?Sized>(
    level: &GeneratedLevel,
    config: &PopulateConfig,
    rng: &mut R,
) -> Option<LevelPlan> {
    let floor: Vec<Point> = level.floor().collect();
    let entrance = *floor.choose(rng)?;

    let mut search = PathSearch::new();
    let reached = search.bfs_map(level, &[entrance], i32::MAX).to_vec();
    let farthest = reached.iter().map(|n| n.cost).max().unwrap_or(0);
    let wanted = config.min_exit_distance.min(farthest);
    let exit_spots: Vec<Point> = reached
        .iter()
        .filter(|n| n.cost >= wanted && n.pos != entrance)
        .map(|n| n.pos)
        .collect();
    let exit = exit_spots.choose(rng).copied().unwrap_or(entrance);

    let mut free: Vec<Point> = floor
        .iter()
        .copied()
        .filter(|&p| p != entrance && p != exit)
        .collect();
    free.shuffle(rng);

    let monster_count = config.monsters(level.level);
    let mut monsters = Vec::with_capacity(monster_count);
    let mut taken = HashSet::new();
    for &p in &free {
        if monsters.len() >= monster_count {
            break;
        }
        if search.bfs_at(p).is_some_and(|d| d <= config.spawn_clearance) {
            continue;
        }
        monsters.push(p);
        taken.insert(p);
    }

    let oil: Vec<Point> = free
        .iter()
        .copied()
        .filter(|p| !taken.contains(p))
        .take(config.oil(level.level))
        .collect();

    log::debug!(
        "level {}: entrance {entrance}, exit {exit} ({} steps), {} monsters, {} oil",
        level.level,
        search.bfs_at(exit).unwrap_or(0),
        monsters.len(),
        oil.len()
    );
    Some(LevelPlan {
        entrance,
        exit,
        oil,
        monsters,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::mapgen::{GrowthConfig, MapGen};

    fn cave(seed: u64, budget: usize) -> GeneratedLevel {
        let cfg = GrowthConfig {
            base_budget: budget,
            budget_per_level: 0,
            ..GrowthConfig::default()
        };
        MapGen::new(cfg, StdRng::seed_from_u64(seed)).generate_level(1)
    }

    #[test]
    fn counts_scale_with_level() {
        let cfg = PopulateConfig::default();
        assert_eq!(cfg.monsters(4), 10);
        assert_eq!(cfg.oil(0), 12);
        assert_eq!(cfg.oil(3), 18);
    }

    #[test]
    fn plan_uses_distinct_floor_tiles() {
        let level = cave(11, 600);
        let mut rng = StdRng::seed_from_u64(5);
        let plan = plan_level(&level, &PopulateConfig::default(), &mut rng).unwrap();

        let mut all = vec![plan.entrance, plan.exit];
        all.extend(&plan.oil);
        all.extend(&plan.monsters);
        let unique: HashSet<Point> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
        assert!(all.iter().all(|p| level.is_floor(*p)));
        assert_eq!(plan.oil.len(), 14);
    }

    #[test]
    fn exit_is_far_enough_and_monsters_keep_clear() {
        let level = cave(21, 800);
        let cfg = PopulateConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let plan = plan_level(&level, &cfg, &mut rng).unwrap();

        let mut search = PathSearch::new();
        let nodes = search.bfs_map(&level, &[plan.entrance], i32::MAX);
        let farthest = nodes.iter().map(|n| n.cost).max().unwrap();
        let exit_dist = search.bfs_at(plan.exit).unwrap();
        assert!(exit_dist >= cfg.min_exit_distance.min(farthest));
        for m in &plan.monsters {
            assert!(search.bfs_at(*m).is_none_or(|d| d > cfg.spawn_clearance));
        }
    }

    #[test]
    fn exit_never_lands_on_the_entrance() {
        let level = cave(3, 40);
        for min_exit_distance in [-3, 0, 1] {
            let cfg = PopulateConfig {
                min_exit_distance,
                ..PopulateConfig::default()
            };
            for seed in 0..20 {
                let plan = plan_level(&level, &cfg, &mut StdRng::seed_from_u64(seed)).unwrap();
                assert_ne!(plan.entrance, plan.exit, "seed {seed}, distance {min_exit_distance}");
            }
        }
    }

    #[test]
    fn tiny_cave_shrinks_counts() {
        // a single grown point: five floor tiles in a plus shape
        let level = cave(0, 1);
        let cfg = PopulateConfig {
            spawn_clearance: 0,
            ..PopulateConfig::default()
        };
        let plan = plan_level(&level, &cfg, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_ne!(plan.entrance, plan.exit);
        assert_eq!(plan.monsters.len() + plan.oil.len(), 3);
    }
}
