//! **lantern-core**: shared types for the lantern cavern crawler.
//!
//! This crate provides the geometry primitives and the persisted record
//! types (tiles, exits, items) used by the search, generation and session
//! crates.

pub mod geom;
pub mod tile;

pub use geom::{Direction, Point};
pub use tile::{ActorId, Exit, ExitId, Item, ItemId, ItemKind, MapId, Tile, TileId, TileSpec};
