//! **lantern**: descend into the dark with a lantern that keeps burning
//! down.
//!
//! A [`Session`] owns one active level: it generates and persists the cave
//! through a [`TileStore`](lantern_rl::TileStore), tracks the player and
//! monsters on a [`GridIndex`](lantern_rl::GridIndex), and advances the
//! lantern and monster ticks on a [`Schedule`]. Rendering and input belong
//! to the embedding application, which calls [`Session::move_player`],
//! [`Session::advance`] and [`Session::visible_tiles`].

pub mod config;
pub mod error;
pub mod lantern;
pub mod pursuit;
pub mod schedule;
pub mod session;

pub use config::{ConfigError, GameConfig};
pub use error::SessionError;
pub use lantern::Lantern;
pub use pursuit::{Pursuit, greedy_step, next_step};
pub use schedule::{Schedule, Tick};
pub use session::{MoveOutcome, PLAYER, SavedSession, Session, Status, TickEvent};
