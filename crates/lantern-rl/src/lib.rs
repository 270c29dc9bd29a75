//! Cavern machinery for lantern: generation, the tile index and vision.
//!
//! - [`MapGen`] grows an enclosed cave around the origin, and
//!   [`plan_level`] places the entrance, exit, oil and monsters on it.
//! - [`GridIndex`] owns the active map's tiles with their adjacency,
//!   occupancy and cached attachments.
//! - [`compute_fov`] and [`FieldOfView`] run symmetric shadowcasting with
//!   exact slopes.
//! - [`TileStore`] is the seam to whatever persists tiles; [`MemoryStore`]
//!   keeps them in memory.

pub mod attachments;
pub mod error;
pub mod fov;
pub mod grid;
pub mod level;
pub mod mapgen;
pub mod store;

pub use attachments::Attachments;
pub use error::{GridError, StoreError};
pub use fov::{
    FieldOfView, FovFailure, FovReport, Quadrant, Slope, compute_fov, try_compute_fov, visible_set,
};
pub use grid::GridIndex;
pub use level::{LevelPlan, PopulateConfig, plan_level};
pub use mapgen::{GeneratedLevel, GrowthConfig, MapGen};
pub use store::{MemoryStore, TileStore};
