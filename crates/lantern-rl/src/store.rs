//! The storage collaborator seam.
//!
//! Tiles, exits and items are persisted by an external store. The core only
//! needs batch creation, loading by map, and the few per-tile queries used
//! by the attachment cache. Occupancy is runtime state and never stored.

use std::collections::{BTreeMap, HashMap};

use lantern_core::{Exit, ExitId, Item, ItemId, ItemKind, MapId, Tile, TileId, TileSpec};

use crate::error::StoreError;

/// Row storage for maps, tiles, exits and items.
pub trait TileStore {
    /// Register a new, empty map segment.
    fn create_map(&mut self) -> Result<MapId, StoreError>;

    /// Persist a generated layout. Returns the stored tiles in `specs` order.
    fn create_tiles(&mut self, map: MapId, specs: &[TileSpec]) -> Result<Vec<Tile>, StoreError>;

    /// All tiles of `map`.
    fn load_tiles(&self, map: MapId) -> Result<Vec<Tile>, StoreError>;

    /// The exit leaving from `tile`, if any.
    fn exit_at(&self, tile: TileId) -> Result<Option<Exit>, StoreError>;

    /// Create an exit on `tile` whose destination is not generated yet.
    fn create_exit(&mut self, map: MapId, tile: TileId) -> Result<Exit, StoreError>;

    /// Overwrite an existing exit, typically to link its destination.
    fn update_exit(&mut self, exit: Exit) -> Result<(), StoreError>;

    /// Items lying on `tile`, oldest first.
    fn items_at(&self, tile: TileId) -> Result<Vec<Item>, StoreError>;

    fn create_item(&mut self, tile: TileId, kind: ItemKind) -> Result<Item, StoreError>;

    fn delete_item(&mut self, id: ItemId) -> Result<(), StoreError>;
}

/// In-memory [`TileStore`] used by tests and local sessions.
///
/// Ids come from a single counter shared by every record type.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    next_id: u64,
    maps: HashMap<MapId, Vec<TileId>>,
    tiles: HashMap<TileId, Tile>,
    exits: BTreeMap<ExitId, Exit>,
    items: BTreeMap<ItemId, Item>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_tile(&self, tile: TileId) -> Result<&Tile, StoreError> {
        self.tiles.get(&tile).ok_or(StoreError::MissingTile(tile))
    }
}

impl TileStore for MemoryStore {
    fn create_map(&mut self) -> Result<MapId, StoreError> {
        let id = MapId(self.next());
        self.maps.insert(id, Vec::new());
        Ok(id)
    }

    fn create_tiles(&mut self, map: MapId, specs: &[TileSpec]) -> Result<Vec<Tile>, StoreError> {
        if !self.maps.contains_key(&map) {
            return Err(StoreError::MissingMap(map));
        }
        let mut created = Vec::with_capacity(specs.len());
        for spec in specs {
            let tile = Tile {
                id: TileId(self.next()),
                map,
                pos: spec.pos,
                is_wall: spec.is_wall,
            };
            self.tiles.insert(tile.id, tile);
            created.push(tile);
        }
        if let Some(ids) = self.maps.get_mut(&map) {
            ids.extend(created.iter().map(|t| t.id));
        }
        Ok(created)
    }

    fn load_tiles(&self, map: MapId) -> Result<Vec<Tile>, StoreError> {
        let ids = self.maps.get(&map).ok_or(StoreError::MissingMap(map))?;
        ids.iter()
            .map(|id| self.check_tile(*id).copied())
            .collect()
    }

    fn exit_at(&self, tile: TileId) -> Result<Option<Exit>, StoreError> {
        self.check_tile(tile)?;
        Ok(self.exits.values().find(|e| e.from_tile == tile).copied())
    }

    fn create_exit(&mut self, map: MapId, tile: TileId) -> Result<Exit, StoreError> {
        if !self.maps.contains_key(&map) {
            return Err(StoreError::MissingMap(map));
        }
        self.check_tile(tile)?;
        let exit = Exit {
            id: ExitId(self.next()),
            from_map: map,
            from_tile: tile,
            to_map: None,
            to_tile: None,
        };
        self.exits.insert(exit.id, exit);
        Ok(exit)
    }

    fn update_exit(&mut self, exit: Exit) -> Result<(), StoreError> {
        let slot = self
            .exits
            .get_mut(&exit.id)
            .ok_or(StoreError::MissingExit(exit.id))?;
        *slot = exit;
        Ok(())
    }

    fn items_at(&self, tile: TileId) -> Result<Vec<Item>, StoreError> {
        self.check_tile(tile)?;
        Ok(self.items.values().filter(|i| i.tile == tile).copied().collect())
    }

    fn create_item(&mut self, tile: TileId, kind: ItemKind) -> Result<Item, StoreError> {
        self.check_tile(tile)?;
        let item = Item {
            id: ItemId(self.next()),
            kind,
            tile,
        };
        self.items.insert(item.id, item);
        Ok(item)
    }

    fn delete_item(&mut self, id: ItemId) -> Result<(), StoreError> {
        self.items
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::MissingItem(id))
    }
}

#[cfg(test)]
mod tests {
    use lantern_core::Point;

    use super::*;

    fn store_with_tiles() -> (MemoryStore, MapId, Vec<Tile>) {
        let mut store = MemoryStore::new();
        let map = store.create_map().unwrap();
        let tiles = store
            .create_tiles(
                map,
                &[TileSpec::floor(Point::new(0, 0)), TileSpec::wall(Point::new(1, 0))],
            )
            .unwrap();
        (store, map, tiles)
    }

    #[test]
    fn tiles_round_trip_through_map() {
        let (store, map, tiles) = store_with_tiles();
        assert_eq!(store.load_tiles(map).unwrap(), tiles);
        assert!(tiles[1].is_wall);
        assert_eq!(store.load_tiles(MapId(999)), Err(StoreError::MissingMap(MapId(999))));
    }

    #[test]
    fn items_are_listed_per_tile_and_deleted() {
        let (mut store, _, tiles) = store_with_tiles();
        let oil = store.create_item(tiles[0].id, ItemKind::Oil).unwrap();
        let crumb = store.create_item(tiles[0].id, ItemKind::Breadcrumb).unwrap();
        assert_eq!(store.items_at(tiles[0].id).unwrap(), vec![oil, crumb]);
        assert!(store.items_at(tiles[1].id).unwrap().is_empty());

        store.delete_item(oil.id).unwrap();
        assert_eq!(store.items_at(tiles[0].id).unwrap(), vec![crumb]);
        assert_eq!(store.delete_item(oil.id), Err(StoreError::MissingItem(oil.id)));
    }

    #[test]
    fn exits_are_created_unlinked_then_updated() {
        let (mut store, map, tiles) = store_with_tiles();
        let mut exit = store.create_exit(map, tiles[0].id).unwrap();
        assert_eq!(exit.to_map, None);

        exit.to_map = Some(MapId(42));
        store.update_exit(exit).unwrap();
        assert_eq!(store.exit_at(tiles[0].id).unwrap(), Some(exit));
        assert_eq!(store.exit_at(tiles[1].id).unwrap(), None);
    }

    #[test]
    fn unknown_tile_is_reported() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.create_item(TileId(5), ItemKind::Oil),
            Err(StoreError::MissingTile(TileId(5)))
        );
    }
}
