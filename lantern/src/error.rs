use lantern_core::Point;
use lantern_rl::{GridError, StoreError};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("level {level} was generated without floor")]
    NoFloor { level: u32 },
    #[error("the player is not on the map")]
    NoPlayer,
    #[error("no tile at {0}")]
    NoTileAt(Point),
    #[error("the player is not standing on an exit")]
    NotAtExit,
}
