//! Persisted record types: maps, tiles, exits and items.
//!
//! These are the rows exchanged with the storage collaborator. Runtime-only
//! state (occupancy, cached attachments) never appears here.

use std::fmt;

use crate::geom::Point;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of one generated map segment (one dungeon level).
    MapId,
    "map"
);
id_type!(
    /// Storage identifier of a tile row.
    TileId,
    "tile"
);
id_type!(
    /// Identifier of an actor (player or monster) claiming tiles.
    ActorId,
    "actor"
);
id_type!(
    /// Storage identifier of an item row.
    ItemId,
    "item"
);
id_type!(
    /// Storage identifier of an exit row.
    ExitId,
    "exit"
);

/// A tile as produced by generation, before storage assigns an id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSpec {
    pub pos: Point,
    pub is_wall: bool,
}

impl TileSpec {
    pub const fn floor(pos: Point) -> Self {
        Self { pos, is_wall: false }
    }

    pub const fn wall(pos: Point) -> Self {
        Self { pos, is_wall: true }
    }
}

/// A stored tile. `(map, pos)` and `is_wall` never change after creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub id: TileId,
    pub map: MapId,
    pub pos: Point,
    pub is_wall: bool,
}

impl Tile {
    #[inline]
    pub const fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub const fn y(&self) -> i32 {
        self.pos.y
    }

    /// Euclidean distance between two tiles.
    pub fn distance_to(&self, other: &Tile) -> f64 {
        self.pos.distance(other.pos)
    }
}

/// Stairs leading from a tile of one map down to the next map.
///
/// The destination is unknown until the next level has been generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exit {
    pub id: ExitId,
    pub from_map: MapId,
    pub from_tile: TileId,
    pub to_map: Option<MapId>,
    pub to_tile: Option<TileId>,
}

/// Kinds of items lying on the cavern floor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    /// Lamp oil; refuels the lantern when walked over.
    Oil,
    /// Trail marker left behind by the player.
    Breadcrumb,
    /// The prize said to wait on the deepest level.
    EverlastingLamp,
}

/// An item lying on a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub tile: TileId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(TileId(7).to_string(), "tile#7");
        assert_eq!(ActorId(0).to_string(), "actor#0");
        assert_eq!(MapId(3).to_string(), "map#3");
    }

    #[test]
    fn tile_distance() {
        let a = Tile {
            id: TileId(1),
            map: MapId(1),
            pos: Point::new(0, 0),
            is_wall: false,
        };
        let b = Tile {
            id: TileId(2),
            pos: Point::new(0, 2),
            ..a
        };
        assert!((a.distance_to(&b) - 2.0).abs() < f64::EPSILON);
        assert_eq!((b.x(), b.y()), (0, 2));
    }

    #[test]
    fn spec_constructors() {
        assert!(TileSpec::wall(Point::ZERO).is_wall);
        assert!(!TileSpec::floor(Point::ZERO).is_wall);
    }
}
