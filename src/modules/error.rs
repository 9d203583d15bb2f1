//! Error types for configuration, wagering and display wiring.

use thiserror::Error;

/// Why a launch was refused. Shown to the player, nothing else changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WagerError {
    #[error("Wager \"{0}\" is not a number")]
    NotANumber(String),

    #[error("Wager must be greater than zero (got {0})")]
    NotPositive(f64),

    #[error("Wager {wager:.2} exceeds balance {balance:.2}")]
    ExceedsBalance { wager: f64, balance: f64 },
}

/// Board or game configuration that cannot be used. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Board needs at least one row of pegs")]
    NoRows,

    #[error("Multiplier table has {multipliers} entries but the board has {exits} exit boxes")]
    MultiplierCount { multipliers: usize, exits: usize },

    #[error("Multiplier table is not symmetric at slot {index}")]
    Asymmetric { index: usize },

    #[error("Multiplier table must not increase towards the center (slot {index})")]
    NotEdgeHeavy { index: usize },

    #[error("Multiplier at slot {index} is negative or not finite")]
    BadMultiplier { index: usize },

    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("Starting balance must be finite and not negative")]
    StartingBalance,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// HUD label slots did not line up with the board.
#[derive(Debug, Error)]
pub enum HudError {
    #[error("HUD has {labels} exit labels but the board has {exits} exit boxes")]
    LabelMismatch { labels: usize, exits: usize },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum PlinkoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wager(#[from] WagerError),

    #[error(transparent)]
    Hud(#[from] HudError),
}

pub type Result<T> = std::result::Result<T, PlinkoError>;
