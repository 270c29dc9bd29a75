use lantern_core::{ActorId, ExitId, ItemId, MapId, Point, TileId};
use thiserror::Error;

/// Failures of [`GridIndex`](crate::GridIndex) mutations.
///
/// Lookups never fail; a missing tile is an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("{0} is not in the active grid")]
    UnknownTile(TileId),
    #[error("{tile} is already claimed by {by}")]
    Occupied { tile: TileId, by: ActorId },
    #[error("{0} is not placed on the grid")]
    UnknownActor(ActorId),
    #[error("two tiles share position {0}")]
    DuplicateTile(Point),
    #[error("{0} is indexed twice")]
    DuplicateId(TileId),
}

/// Failures reported by a [`TileStore`](crate::TileStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} does not exist")]
    MissingMap(MapId),
    #[error("{0} does not exist")]
    MissingTile(TileId),
    #[error("{0} does not exist")]
    MissingItem(ItemId),
    #[error("{0} does not exist")]
    MissingExit(ExitId),
    #[error("storage backend: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_record() {
        let err = GridError::Occupied {
            tile: TileId(4),
            by: ActorId(2),
        };
        assert_eq!(err.to_string(), "tile#4 is already claimed by actor#2");
        assert_eq!(StoreError::MissingItem(ItemId(9)).to_string(), "item#9 does not exist");
    }
}
