//! A running game: one active level, the player, the monsters and the clock.

use lantern_core::{ActorId, Direction, ExitId, ItemKind, MapId, Point, Tile, TileId};
use lantern_paths::PathSearch;
use lantern_rl::{FieldOfView, GridIndex, LevelPlan, MapGen, TileStore, plan_level};
use rand::Rng;

use crate::config::GameConfig;
use crate::error::SessionError;
use crate::lantern::Lantern;
use crate::pursuit::{self, Pursuit};
use crate::schedule::{Schedule, Tick};

/// The player always uses this actor id.
pub const PLAYER: ActorId = ActorId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Playing,
    /// Every tile around the player is blocked.
    Surrounded,
    /// The player arrived on the final level.
    Finished,
}

/// Result of a player move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The target tile is missing, a wall, occupied, or the game is over.
    Blocked,
    Moved { to: Point, refueled: bool },
    /// The player stands on the stairs; call [`Session::descend`].
    ReachedExit { exit: ExitId, refueled: bool },
}

/// Something that happened while the clock advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    Lantern { radius: f64, surrounded: bool },
    Monster { actor: ActorId, moved_to: Option<Point> },
}

/// What a session needs to be rebuilt from the store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedSession {
    pub level: u32,
    pub map: MapId,
    pub player_tile: TileId,
    pub monster_tiles: Vec<TileId>,
    pub radius: f64,
}

pub struct Session<S: TileStore, R: Rng> {
    config: GameConfig,
    store: S,
    rng: R,
    level: u32,
    map: MapId,
    grid: GridIndex,
    lantern: Lantern,
    monsters: Vec<ActorId>,
    schedule: Schedule<Tick>,
    search: PathSearch,
    fov: FieldOfView,
    clock: u64,
    status: Status,
}

impl<S: TileStore, R: Rng> Session<S, R> {
    /// Start a game on a freshly generated level 0.
    pub fn new_game(config: GameConfig, store: S, rng: R) -> Result<Self, SessionError> {
        config.validate()?;
        let lantern = Lantern::new(&config);
        let mut session = Self {
            config,
            store,
            rng,
            level: 0,
            map: MapId(0),
            grid: GridIndex::default(),
            lantern,
            monsters: Vec::new(),
            schedule: Schedule::new(),
            search: PathSearch::new(),
            fov: FieldOfView::new(),
            clock: 0,
            status: Status::Playing,
        };
        session.enter_level(0)?;
        Ok(session)
    }

    /// Rebuild a session from tiles already in `store`.
    ///
    /// Occupancy and attachments are not persisted; they are rebuilt here.
    pub fn resume(
        config: GameConfig,
        store: S,
        rng: R,
        saved: &SavedSession,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let lantern = Lantern::with_radius(&config, saved.radius);
        let mut grid = GridIndex::build(store.load_tiles(saved.map)?)?;
        grid.setup_attachments(&store)?;
        grid.set_tile(PLAYER, saved.player_tile)?;

        let mut monsters = Vec::with_capacity(saved.monster_tiles.len());
        for (i, &tile) in saved.monster_tiles.iter().enumerate() {
            let actor = ActorId(i as u64 + 1);
            grid.set_tile(actor, tile)?;
            monsters.push(actor);
        }

        let status = if saved.level >= config.final_level {
            Status::Finished
        } else {
            Status::Playing
        };
        let mut session = Self {
            config,
            store,
            rng,
            level: saved.level,
            map: saved.map,
            grid,
            lantern,
            monsters,
            schedule: Schedule::new(),
            search: PathSearch::new(),
            fov: FieldOfView::new(),
            clock: 0,
            status,
        };
        session.reschedule();
        log::debug!("resumed level {} on {}", session.level, session.map);
        Ok(session)
    }

    /// Everything needed to [`resume`](Self::resume) later.
    pub fn snapshot(&self) -> Result<SavedSession, SessionError> {
        let player_tile = self.player_tile()?.id;
        let monster_tiles = self
            .monsters
            .iter()
            .filter_map(|&m| self.grid.actor_tile(m).map(|t| t.id))
            .collect();
        Ok(SavedSession {
            level: self.level,
            map: self.map,
            player_tile,
            monster_tiles,
            radius: self.lantern.radius(),
        })
    }

    /// Leave through the exit under the player and generate the next level.
    ///
    /// The exit is linked to the new level's entrance. Arriving on the
    /// final level ends the game. Fails with [`SessionError::NotAtExit`]
    /// unless the player stands on stairs of a game still being played.
    pub fn descend(&mut self) -> Result<(), SessionError> {
        if self.status != Status::Playing {
            return Err(SessionError::NotAtExit);
        }
        let here = self.player_tile()?.id;
        let mut exit = self.grid.exit(here).copied().ok_or(SessionError::NotAtExit)?;
        self.enter_level(self.level + 1)?;

        exit.to_map = Some(self.map);
        exit.to_tile = Some(self.player_tile()?.id);
        self.store.update_exit(exit)?;
        Ok(())
    }

    fn enter_level(&mut self, level: u32) -> Result<(), SessionError> {
        let generated =
            MapGen::new(self.config.growth.clone(), &mut self.rng).generate_level(level);
        let plan = plan_level(&generated, &self.config.populate, &mut self.rng)
            .ok_or(SessionError::NoFloor { level })?;

        let map = self.store.create_map()?;
        let tiles = self.store.create_tiles(map, &generated.tiles)?;
        let mut grid = GridIndex::build(tiles)?;
        let is_final = level >= self.config.final_level;
        self.furnish(map, &grid, &plan, is_final)?;
        grid.setup_attachments(&self.store)?;

        let entrance = tile_id(&grid, plan.entrance)?;
        grid.set_tile(PLAYER, entrance)?;
        let mut monsters = Vec::with_capacity(plan.monsters.len());
        for (i, &p) in plan.monsters.iter().enumerate() {
            let actor = ActorId(i as u64 + 1);
            grid.set_tile(actor, tile_id(&grid, p)?)?;
            monsters.push(actor);
        }

        self.level = level;
        self.map = map;
        self.grid = grid;
        self.monsters = monsters;
        self.status = if is_final {
            Status::Finished
        } else {
            Status::Playing
        };
        self.reschedule();
        log::debug!(
            "entered level {level} on {map}: {} tiles, {} monsters",
            self.grid.len(),
            self.monsters.len()
        );
        Ok(())
    }

    /// Persist the exit and oil of `plan`. The final level has no stairs;
    /// the everlasting lamp waits where they would be.
    fn furnish(
        &mut self,
        map: MapId,
        grid: &GridIndex,
        plan: &LevelPlan,
        is_final: bool,
    ) -> Result<(), SessionError> {
        let exit_tile = tile_id(grid, plan.exit)?;
        if is_final {
            self.store.create_item(exit_tile, ItemKind::EverlastingLamp)?;
        } else {
            self.store.create_exit(map, exit_tile)?;
        }
        for &p in &plan.oil {
            self.store.create_item(tile_id(grid, p)?, ItemKind::Oil)?;
        }
        Ok(())
    }

    fn reschedule(&mut self) {
        self.schedule.clear();
        self.schedule.push(Tick::Lantern, self.clock + self.config.lantern_ms);
        for i in 0..self.monsters.len() {
            let actor = self.monsters[i];
            let due = self.clock + self.monster_cadence();
            self.schedule.push(Tick::Monster(actor), due);
        }
    }

    fn monster_cadence(&mut self) -> u64 {
        self.rng
            .random_range(self.config.monster_min_ms..self.config.monster_max_ms)
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn map(&self) -> MapId {
        self.map
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn lantern(&self) -> &Lantern {
        &self.lantern
    }

    pub fn monsters(&self) -> &[ActorId] {
        &self.monsters
    }

    /// Milliseconds since the session started or resumed.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// How often the embedding application should redraw.
    pub fn render_interval(&self) -> u64 {
        self.config.render_ms
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.config.final_level
    }

    pub fn player_tile(&self) -> Result<&Tile, SessionError> {
        self.grid.actor_tile(PLAYER).ok_or(SessionError::NoPlayer)
    }

    // -------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------

    /// Try to step the player one tile in `dir`.
    ///
    /// Oil on the first item slot of the target is burnt into the lantern.
    /// Leaving an item-free tile behind drops a breadcrumb on the new tile.
    pub fn move_player(&mut self, dir: Direction) -> Result<MoveOutcome, SessionError> {
        if self.status != Status::Playing {
            return Ok(MoveOutcome::Blocked);
        }
        let from = self.player_tile()?.pos;
        let Some(target) = self.grid.at(from.step(dir)).copied() else {
            return Ok(MoveOutcome::Blocked);
        };
        if !self.grid.is_traversable(&target) {
            return Ok(MoveOutcome::Blocked);
        }
        self.grid.set_tile(PLAYER, target.id)?;

        let mut refueled = false;
        let first = self.grid.items(target.id).first().copied();
        if let Some(item) = first.filter(|i| i.kind == ItemKind::Oil) {
            self.store.delete_item(item.id)?;
            self.refetch_items(target.id);
            self.lantern.refuel();
            refueled = true;
        }

        if let Some(exit) = self.grid.exit(target.id) {
            return Ok(MoveOutcome::ReachedExit {
                exit: exit.id,
                refueled,
            });
        }

        if self.grid.items(target.id).is_empty() {
            self.store.create_item(target.id, ItemKind::Breadcrumb)?;
            self.refetch_items(target.id);
        }
        Ok(MoveOutcome::Moved {
            to: target.pos,
            refueled,
        })
    }

    fn refetch_items(&mut self, tile: TileId) {
        if let Err(err) = self.grid.refetch_items(tile, &self.store) {
            log::warn!("could not reload items of {tile}: {err}");
        }
    }

    /// Let `actor` take one step toward the player.
    pub fn step_monster(&mut self, actor: ActorId) -> Result<Option<Point>, SessionError> {
        let from = self
            .grid
            .actor_tile(actor)
            .ok_or(lantern_rl::GridError::UnknownActor(actor))?
            .pos;
        let goal = self.player_tile()?.pos;
        let cap = self.config.path_cap;
        let step = pursuit::next_step(&mut self.search, &self.grid, from, goal, cap);
        let Some(to) = step.target() else {
            return Ok(None);
        };
        let tile = tile_id(&self.grid, to)?;
        self.grid.set_tile(actor, tile)?;
        if matches!(step, Pursuit::Greedy(_)) {
            log::trace!("{actor} shuffles greedily to {to}");
        }
        Ok(Some(to))
    }

    /// Burn the lantern once and check whether the player is hemmed in.
    pub fn lantern_tick(&mut self) -> Result<TickEvent, SessionError> {
        let radius = self.lantern.tick();
        let tile = *self.player_tile()?;
        let surrounded = self.grid.neighbors(&tile).all(|n| !self.grid.is_traversable(n));
        if surrounded && self.status == Status::Playing {
            log::debug!("player surrounded at {}", tile.pos);
            self.status = Status::Surrounded;
        }
        Ok(TickEvent::Lantern { radius, surrounded })
    }

    /// Advance the clock by `elapsed_ms`, firing every tick that falls due.
    ///
    /// Stops firing as soon as the game is no longer being played.
    pub fn advance(&mut self, elapsed_ms: u64) -> Result<Vec<TickEvent>, SessionError> {
        self.clock += elapsed_ms;
        let mut events = Vec::new();
        while self.status == Status::Playing {
            let Some((due, tick)) = self.schedule.pop_due(self.clock) else {
                break;
            };
            log::trace!("tick {tick:?} due at {due}ms");
            match tick {
                Tick::Lantern => {
                    events.push(self.lantern_tick()?);
                    self.schedule.push(Tick::Lantern, due + self.config.lantern_ms);
                }
                Tick::Monster(actor) => {
                    let moved_to = self.step_monster(actor)?;
                    events.push(TickEvent::Monster { actor, moved_to });
                    let next = due + self.monster_cadence();
                    self.schedule.push(Tick::Monster(actor), next);
                }
            }
        }
        Ok(events)
    }

    /// Tiles lit and in sight of the player.
    ///
    /// Missing and non-traversable tiles block sight, so monsters hide what
    /// stands behind them. Results farther than the lantern radius are
    /// dropped.
    pub fn visible_tiles(&mut self) -> Result<Vec<Point>, SessionError> {
        let origin = self.player_tile()?.pos;
        let grid = &self.grid;
        let lantern = self.lantern;
        let seen = self.fov.compute(
            origin,
            |p| grid.at(p).is_none_or(|t| !grid.is_traversable(t)),
            lantern.fov_depth(),
        );
        Ok(seen.iter().copied().filter(|&p| lantern.lights(origin, p)).collect())
    }
}

fn tile_id(grid: &GridIndex, p: Point) -> Result<TileId, SessionError> {
    grid.at(p).map(|t| t.id).ok_or(SessionError::NoTileAt(p))
}
