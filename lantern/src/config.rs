//! Game configuration.
//!
//! Every field has a default matching the shipped game; a partial JSON
//! document can override any subset of them when the `serde` feature is on.

use lantern_rl::{GrowthConfig, PopulateConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[cfg(feature = "serde")]
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Lantern view radius when a game starts.
    pub start_radius: f64,
    /// Radius lost on every lantern tick.
    pub radius_decay: f64,
    /// Radius gained per oil flask.
    pub oil_refuel: f64,
    /// Expansion cap of a monster's path search.
    pub path_cap: usize,
    pub render_ms: u64,
    pub lantern_ms: u64,
    /// Monster cadences are drawn from `[monster_min_ms, monster_max_ms)`.
    pub monster_min_ms: u64,
    pub monster_max_ms: u64,
    /// Index of the last level; arriving there ends the game.
    pub final_level: u32,
    pub growth: GrowthConfig,
    pub populate: PopulateConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_radius: 10.0,
            radius_decay: 0.1,
            oil_refuel: 2.0,
            path_cap: 500,
            render_ms: 50,
            lantern_ms: 250,
            monster_min_ms: 500,
            monster_max_ms: 1000,
            final_level: 6,
            growth: GrowthConfig::default(),
            populate: PopulateConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.start_radius.is_finite() && self.start_radius > 0.0) {
            return Err(invalid("start_radius", "must be a positive number"));
        }
        if !(self.radius_decay.is_finite() && self.radius_decay >= 0.0) {
            return Err(invalid("radius_decay", "must not be negative"));
        }
        if !(self.oil_refuel.is_finite() && self.oil_refuel >= 0.0) {
            return Err(invalid("oil_refuel", "must not be negative"));
        }
        if self.path_cap == 0 {
            return Err(invalid("path_cap", "must allow at least one expansion"));
        }
        if self.render_ms == 0 {
            return Err(invalid("render_ms", "must be non-zero"));
        }
        if self.lantern_ms == 0 {
            return Err(invalid("lantern_ms", "must be non-zero"));
        }
        if self.monster_min_ms == 0 || self.monster_min_ms >= self.monster_max_ms {
            return Err(invalid(
                "monster_min_ms",
                format!(
                    "need 0 < min < max, got {}..{}",
                    self.monster_min_ms, self.monster_max_ms
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.growth.threshold) {
            return Err(invalid("growth.threshold", "must lie in [0, 1]"));
        }
        if self.growth.base_budget == 0 {
            return Err(invalid("growth.base_budget", "must be at least 1"));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON document and validate it.
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg =
            GameConfig::from_json(r#"{"path_cap": 50, "growth": {"base_budget": 200}}"#).unwrap();
        assert_eq!(cfg.path_cap, 50);
        assert_eq!(cfg.growth.base_budget, 200);
        assert_eq!(cfg.growth.budget_per_level, 1000);
        assert_eq!(cfg.lantern_ms, 250);
    }

    #[test]
    fn invalid_json_values_are_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{"path_cap": 0}"#),
            Err(ConfigError::Invalid { field: "path_cap", .. })
        ));
        assert!(matches!(
            GameConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
