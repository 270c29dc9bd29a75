//! Coordinate index, adjacency and occupancy over the tiles of one map.
//!
//! [`GridIndex`] owns the active map's tiles in an arena. Adjacency is
//! stored as arena slots, occupancy as a parallel slot table keyed by
//! arena position, and cached exits/items live in an [`Attachments`] value.
//! Callers address tiles by position or [`TileId`] and only ever borrow them.

use std::collections::{HashMap, HashSet};

use lantern_core::{ActorId, Direction, Exit, Item, Point, Tile, TileId};
use lantern_paths::{BestFirstPather, Pather};

use crate::attachments::Attachments;
use crate::error::{GridError, StoreError};
use crate::store::TileStore;

#[derive(Debug, Default)]
pub struct GridIndex {
    tiles: Vec<Tile>,
    by_pos: HashMap<Point, usize>,
    by_id: HashMap<TileId, usize>,
    // arena slots of the up, down, left, right neighbours
    links: Vec<[Option<usize>; 4]>,
    occupants: Vec<Option<ActorId>>,
    actors: HashMap<ActorId, usize>,
    attachments: Attachments,
}

impl GridIndex {
    /// Index a batch of tiles and link every pair of axis neighbours.
    pub fn build(tiles: impl IntoIterator<Item = Tile>) -> Result<Self, GridError> {
        let mut grid = Self::default();
        grid.extend(tiles)?;
        Ok(grid)
    }

    /// Add tiles to the index, linking them to each other and to the tiles
    /// already present.
    ///
    /// Positions and ids must be new to the index and unique within the
    /// batch. On error the index is left unchanged.
    pub fn extend(&mut self, tiles: impl IntoIterator<Item = Tile>) -> Result<(), GridError> {
        let tiles: Vec<Tile> = tiles.into_iter().collect();
        let mut fresh_pos = HashSet::with_capacity(tiles.len());
        let mut fresh_ids = HashSet::with_capacity(tiles.len());
        for t in &tiles {
            if self.by_pos.contains_key(&t.pos) || !fresh_pos.insert(t.pos) {
                return Err(GridError::DuplicateTile(t.pos));
            }
            if self.by_id.contains_key(&t.id) || !fresh_ids.insert(t.id) {
                return Err(GridError::DuplicateId(t.id));
            }
        }

        let start = self.tiles.len();
        for t in tiles {
            let slot = self.tiles.len();
            self.by_pos.insert(t.pos, slot);
            self.by_id.insert(t.id, slot);
            self.tiles.push(t);
            self.links.push([None; 4]);
            self.occupants.push(None);
        }

        for slot in start..self.tiles.len() {
            let pos = self.tiles[slot].pos;
            for dir in Direction::ALL {
                if let Some(&other) = self.by_pos.get(&pos.step(dir)) {
                    self.links[slot][dir.index()] = Some(other);
                    self.links[other][dir.opposite().index()] = Some(slot);
                }
            }
        }
        log::debug!(
            "grid index holds {} tiles ({} added)",
            self.tiles.len(),
            self.tiles.len() - start
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tiles in insertion order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The tile at `(x, y)`, if any.
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.at(Point::new(x, y))
    }

    pub fn at(&self, p: Point) -> Option<&Tile> {
        self.by_pos.get(&p).map(|&slot| &self.tiles[slot])
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.by_id.get(&id).map(|&slot| &self.tiles[slot])
    }

    fn slot(&self, id: TileId) -> Result<usize, GridError> {
        self.by_id.get(&id).copied().ok_or(GridError::UnknownTile(id))
    }

    /// The adjacent tile of `tile` in direction `dir`.
    pub fn neighbor(&self, tile: &Tile, dir: Direction) -> Option<&Tile> {
        let slot = *self.by_id.get(&tile.id)?;
        self.links[slot][dir.index()].map(|n| &self.tiles[n])
    }

    /// Existing axis neighbours of `tile` in up, down, left, right order.
    ///
    /// A tile that is not in the index has no neighbours.
    pub fn neighbors(&self, tile: &Tile) -> impl Iterator<Item = &Tile> + '_ {
        let links = self.by_id.get(&tile.id).map_or([None; 4], |&s| self.links[s]);
        links.into_iter().flatten().map(move |n| &self.tiles[n])
    }

    /// Whether an actor may step onto `tile`: not a wall and not claimed.
    pub fn is_traversable(&self, tile: &Tile) -> bool {
        !tile.is_wall && self.occupant(tile.id).is_none()
    }

    /// The actor currently claiming `tile`.
    pub fn occupant(&self, tile: TileId) -> Option<ActorId> {
        self.by_id.get(&tile).and_then(|&slot| self.occupants[slot])
    }

    pub fn actor_tile(&self, actor: ActorId) -> Option<&Tile> {
        self.actors.get(&actor).map(|&slot| &self.tiles[slot])
    }

    /// Actors on the grid with their tiles, in no particular order.
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &Tile)> + '_ {
        self.actors.iter().map(move |(&a, &slot)| (a, &self.tiles[slot]))
    }

    /// Move `actor` onto `tile`, releasing the tile it held before.
    ///
    /// Returns the previously held tile. Fails without changing anything if
    /// another actor already claims `tile`. Walls are not checked here.
    pub fn set_tile(&mut self, actor: ActorId, tile: TileId) -> Result<Option<TileId>, GridError> {
        let slot = self.slot(tile)?;
        match self.occupants[slot] {
            Some(by) if by == actor => return Ok(Some(tile)),
            Some(by) => return Err(GridError::Occupied { tile, by }),
            None => {}
        }
        let previous = self.actors.insert(actor, slot);
        if let Some(prev) = previous {
            self.occupants[prev] = None;
        }
        self.occupants[slot] = Some(actor);
        Ok(previous.map(|prev| self.tiles[prev].id))
    }

    /// Take `actor` off the grid, freeing its tile.
    pub fn remove_actor(&mut self, actor: ActorId) -> Result<TileId, GridError> {
        let slot = self
            .actors
            .remove(&actor)
            .ok_or(GridError::UnknownActor(actor))?;
        self.occupants[slot] = None;
        Ok(self.tiles[slot].id)
    }

    pub fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    /// Forget the cached exit and items of `tile` until they are refetched.
    pub fn invalidate(&mut self, tile: TileId) {
        self.attachments.invalidate(tile);
    }

    /// Cached exit of `tile`.
    pub fn exit(&self, tile: TileId) -> Option<&Exit> {
        self.attachments.exit(tile)
    }

    /// Cached items of `tile`.
    pub fn items(&self, tile: TileId) -> &[Item] {
        self.attachments.items(tile)
    }

    /// Load exits and items of every indexed tile from `store`.
    pub fn setup_attachments<S: TileStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<(), StoreError> {
        let mut cache = Attachments::new();
        for t in &self.tiles {
            cache.populate_exit(t.id, store.exit_at(t.id)?);
            cache.populate_items(t.id, store.items_at(t.id)?);
        }
        self.attachments = cache;
        Ok(())
    }

    /// Drop the cached items of `tile` and reload them from `store`.
    ///
    /// On a store failure the tile is left invalidated, so it reads as empty
    /// rather than stale.
    pub fn refetch_items<S: TileStore + ?Sized>(
        &mut self,
        tile: TileId,
        store: &S,
    ) -> Result<&[Item], StoreError> {
        self.attachments.populate_items(tile, Vec::new());
        let items = store.items_at(tile)?;
        self.attachments.populate_items(tile, items);
        Ok(self.attachments.items(tile))
    }

    /// Drop and reload the cached exit of `tile`.
    pub fn refetch_exit<S: TileStore + ?Sized>(
        &mut self,
        tile: TileId,
        store: &S,
    ) -> Result<Option<&Exit>, StoreError> {
        self.attachments.populate_exit(tile, None);
        let exit = store.exit_at(tile)?;
        self.attachments.populate_exit(tile, exit);
        Ok(self.attachments.exit(tile))
    }
}

impl Pather for GridIndex {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        if let Some(&slot) = self.by_pos.get(&p) {
            buf.extend(self.links[slot].iter().flatten().map(|&n| self.tiles[n].pos));
        }
    }

    fn traversable(&self, p: Point) -> bool {
        self.at(p).is_some_and(|t| self.is_traversable(t))
    }
}

impl BestFirstPather for GridIndex {}
