//! The player's lantern: a view radius that burns down and is refuelled.

use lantern_core::Point;

use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lantern {
    radius: f64,
    decay: f64,
    refuel: f64,
}

impl Lantern {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_radius(config, config.start_radius)
    }

    pub fn with_radius(config: &GameConfig, radius: f64) -> Self {
        Self {
            radius: radius.max(0.0),
            decay: config.radius_decay,
            refuel: config.oil_refuel,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Burn one tick of oil. The radius never drops below zero.
    pub fn tick(&mut self) -> f64 {
        self.radius = (self.radius - self.decay).max(0.0);
        self.radius
    }

    /// Pour in one flask of oil.
    pub fn refuel(&mut self) -> f64 {
        self.radius += self.refuel;
        self.radius
    }

    pub fn is_out(&self) -> bool {
        self.radius <= 0.0
    }

    /// Shadowcasting depth covering the lit disc; at least 1.
    pub fn fov_depth(&self) -> i32 {
        // radius is finite and non-negative; saturating cast
        (self.radius.ceil() as i32).max(1)
    }

    /// Whether `to` lies inside the lit disc around `from`.
    pub fn lights(&self, from: Point, to: Point) -> bool {
        from.distance(to) <= self.radius
    }
}
