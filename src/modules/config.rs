//! Game configuration
//!
//! Every field has a default, so a config file only needs to name what it
//! changes. Values are in virtual pixels (1024x768 board) and seconds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::modules::error::ConfigError;
use crate::modules::perturb::PerturbationTable;

/// Environment variable the window binary reads a config path from.
pub const CONFIG_ENV: &str = "PLINKO_CONFIG";

/// Peg pyramid and exit slot geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of peg rows; row r holds 3 + r pegs
    pub rows: u32,
    /// Horizontal distance between neighbouring pegs
    pub peg_spacing: f32,
    /// Vertical distance between rows
    pub row_spacing: f32,
    pub center_x: f32,
    /// y of the top row
    pub start_y: f32,
    pub peg_radius: f32,
    pub peg_restitution: f32,
    pub exit_width: f32,
    pub exit_height: f32,
    /// Distance from the bottom row down to the exit box centers
    pub exit_offset_y: f32,
    /// Payout multiplier per exit box, left to right
    pub multipliers: Vec<f64>,
    pub ground_height: f32,
    /// Horizontal distance from the outermost peg of each row out to the
    /// side rail's center line
    pub rail_gap: f32,
    pub rail_thickness: f32,
}

impl BoardConfig {
    /// Eight rows, nine slots
    pub fn eight_rows() -> Self {
        Self {
            rows: 8,
            peg_spacing: 70.0,
            row_spacing: 75.0,
            center_x: 512.0,
            start_y: 100.0,
            peg_radius: 6.0,
            peg_restitution: 0.3,
            exit_width: 60.0,
            exit_height: 20.0,
            exit_offset_y: 25.0,
            multipliers: vec![13.0, 3.0, 1.3, 0.7, 0.4, 0.7, 1.3, 3.0, 13.0],
            ground_height: 40.0,
            rail_gap: 28.0,
            rail_thickness: 10.0,
        }
    }

    /// Ten rows, eleven slots, tighter spacing so it still fits the screen
    pub fn ten_rows() -> Self {
        Self {
            rows: 10,
            peg_spacing: 60.0,
            row_spacing: 55.0,
            start_y: 90.0,
            exit_width: 50.0,
            rail_gap: 24.0,
            multipliers: vec![21.0, 7.5, 3.0, 0.9, 0.22, 0.16, 0.22, 0.9, 3.0, 7.5, 21.0],
            ..Self::eight_rows()
        }
    }

    /// One exit box under every gap of the bottom row
    pub fn exit_count(&self) -> usize {
        self.rows as usize + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::NoRows);
        }
        for (name, value) in [
            ("peg_spacing", self.peg_spacing),
            ("row_spacing", self.row_spacing),
            ("peg_radius", self.peg_radius),
            ("exit_width", self.exit_width),
            ("exit_height", self.exit_height),
            ("ground_height", self.ground_height),
            ("rail_gap", self.rail_gap),
            ("rail_thickness", self.rail_thickness),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive(name));
            }
        }

        let m = &self.multipliers;
        if m.len() != self.exit_count() {
            return Err(ConfigError::MultiplierCount {
                multipliers: m.len(),
                exits: self.exit_count(),
            });
        }
        if let Some(index) = m.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::BadMultiplier { index });
        }
        let n = m.len();
        for i in 0..n / 2 {
            if m[i] != m[n - 1 - i] {
                return Err(ConfigError::Asymmetric { index: i });
            }
        }
        // Left half including the center; symmetry covers the right half
        for i in 1..n.div_ceil(2) {
            if m[i] > m[i - 1] {
                return Err(ConfigError::NotEdgeHeavy { index: i });
            }
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::eight_rows()
    }
}

/// Ball body settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Balls spawn at (board center, spawn_y)
    pub spawn_y: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 12.0,
            restitution: 0.3,
            friction: 0.2,
            spawn_y: 20.0,
        }
    }
}

/// Horizontal gravity jitter applied every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerturbationConfig {
    pub table: PerturbationTable,
    /// Base horizontal acceleration, px/s², before the tier multiplier
    pub base_strength: f32,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            table: PerturbationTable::ThreeTier,
            base_strength: 1.0,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub ball: BallConfig,
    pub perturbation: PerturbationConfig,
    /// false = counting-only variant, balls carry no wager
    pub wagering: bool,
    pub starting_balance: f64,
    /// Prefilled into the wager field
    pub default_wager: f64,
    /// Downward gravity, px/s²
    pub gravity_y: f32,
    pub world_width: f32,
    pub world_height: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            ball: BallConfig::default(),
            perturbation: PerturbationConfig::default(),
            wagering: true,
            starting_balance: 1000.0,
            default_wager: 10.0,
            gravity_y: 500.0,
            world_width: 1024.0,
            world_height: 768.0,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        if !(self.ball.radius > 0.0) {
            return Err(ConfigError::NonPositive("ball.radius"));
        }
        if !(self.world_width > 0.0) {
            return Err(ConfigError::NonPositive("world_width"));
        }
        if !(self.world_height > 0.0) {
            return Err(ConfigError::NonPositive("world_height"));
        }
        if !self.starting_balance.is_finite() || self.starting_balance < 0.0 {
            return Err(ConfigError::StartingBalance);
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Config named by `PLINKO_CONFIG`, or the validated defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => {
                log::info!("Loading config from {path}");
                Self::from_json_file(path)
            }
            _ => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// y of the ground body's center
    pub fn ground_y(&self) -> f32 {
        self.world_height - self.board.ground_height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        GameConfig::default().validate().unwrap();
        BoardConfig::ten_rows().validate().unwrap();
    }

    #[test]
    fn test_multiplier_count_mismatch() {
        let mut board = BoardConfig::default();
        board.multipliers.pop();
        assert!(matches!(
            board.validate(),
            Err(ConfigError::MultiplierCount { multipliers: 8, exits: 9 })
        ));
    }

    #[test]
    fn test_asymmetric_table_rejected() {
        let mut board = BoardConfig::default();
        board.multipliers[0] = 12.0;
        assert!(matches!(board.validate(), Err(ConfigError::Asymmetric { index: 0 })));
    }

    #[test]
    fn test_center_heavy_table_rejected() {
        let mut board = BoardConfig::default();
        board.multipliers = vec![1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        assert!(matches!(board.validate(), Err(ConfigError::NotEdgeHeavy { index: 1 })));
    }

    #[test]
    fn test_zero_rows_rejected() {
        let board = BoardConfig {
            rows: 0,
            multipliers: vec![1.0],
            ..BoardConfig::default()
        };
        assert!(matches!(board.validate(), Err(ConfigError::NoRows)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "starting_balance": 30.0, "wagering": false }"#).unwrap();
        assert_eq!(config.starting_balance, 30.0);
        assert!(!config.wagering);
        assert_eq!(config.board, BoardConfig::default());
    }

    #[test]
    fn test_json_with_bad_table_fails() {
        let err = GameConfig::from_json(r#"{ "board": { "rows": 2, "multipliers": [1.0, 2.0] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MultiplierCount { .. }));
    }

    #[test]
    fn test_negative_balance_rejected() {
        let config = GameConfig {
            starting_balance: -1.0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::StartingBalance)));
    }
}
