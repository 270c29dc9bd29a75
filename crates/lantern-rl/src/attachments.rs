//! Per-tile cache of exits and items.
//!
//! The cache is an explicit value: entries are written with the `populate_*`
//! methods and dropped with [`Attachments::invalidate`]. Readers never touch
//! storage, so an unpopulated tile simply reports nothing attached.

use std::collections::HashMap;

use lantern_core::{Exit, Item, ItemKind, TileId};

#[derive(Debug, Default, Clone)]
pub struct Attachments {
    exits: HashMap<TileId, Exit>,
    items: HashMap<TileId, Vec<Item>>,
}

impl Attachments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the exit on `tile`, or its absence.
    pub fn populate_exit(&mut self, tile: TileId, exit: Option<Exit>) {
        match exit {
            Some(exit) => {
                self.exits.insert(tile, exit);
            }
            None => {
                self.exits.remove(&tile);
            }
        }
    }

    /// Replace the cached item list of `tile`.
    pub fn populate_items(&mut self, tile: TileId, items: Vec<Item>) {
        if items.is_empty() {
            self.items.remove(&tile);
        } else {
            self.items.insert(tile, items);
        }
    }

    /// Forget everything cached for `tile`.
    pub fn invalidate(&mut self, tile: TileId) {
        self.exits.remove(&tile);
        self.items.remove(&tile);
    }

    pub fn exit(&self, tile: TileId) -> Option<&Exit> {
        self.exits.get(&tile)
    }

    pub fn items(&self, tile: TileId) -> &[Item] {
        self.items.get(&tile).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First cached item of `kind` on `tile`.
    pub fn find_item(&self, tile: TileId, kind: ItemKind) -> Option<&Item> {
        self.items(tile).iter().find(|i| i.kind == kind)
    }

    /// Tiles with a cached exit.
    pub fn exit_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.exits.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use lantern_core::{ExitId, ItemId, MapId};

    use super::*;

    fn oil(id: u64, tile: TileId) -> Item {
        Item {
            id: ItemId(id),
            kind: ItemKind::Oil,
            tile,
        }
    }

    #[test]
    fn unpopulated_tile_has_nothing_attached() {
        let cache = Attachments::new();
        assert!(cache.exit(TileId(1)).is_none());
        assert!(cache.items(TileId(1)).is_empty());
    }

    #[test]
    fn populate_then_invalidate() {
        let t = TileId(3);
        let exit = Exit {
            id: ExitId(10),
            from_map: MapId(1),
            from_tile: t,
            to_map: None,
            to_tile: None,
        };
        let mut cache = Attachments::new();
        cache.populate_exit(t, Some(exit));
        cache.populate_items(t, vec![oil(11, t)]);
        assert_eq!(cache.exit(t), Some(&exit));
        assert_eq!(cache.find_item(t, ItemKind::Oil).map(|i| i.id), Some(ItemId(11)));
        assert!(cache.find_item(t, ItemKind::Breadcrumb).is_none());

        cache.invalidate(t);
        assert!(cache.exit(t).is_none());
        assert!(cache.items(t).is_empty());
    }

    #[test]
    fn repopulating_replaces_items() {
        let t = TileId(3);
        let mut cache = Attachments::new();
        cache.populate_items(t, vec![oil(1, t), oil(2, t)]);
        cache.populate_items(t, vec![oil(2, t)]);
        assert_eq!(cache.items(t).len(), 1);
        cache.populate_items(t, Vec::new());
        assert!(cache.items(t).is_empty());
    }
}
