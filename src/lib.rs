//! Plinko: balls drop through a peg pyramid into multiplier slots.
//!
//! - `modules::layout`: peg pyramid and exit slots
//! - `modules::physics`: physics seam and the Rapier world
//! - `modules::game`: event queue, handlers, ball lifecycle
//! - `modules::session`: balance and hit counters
//! - `modules::headless`: windowless batch drops

pub mod modules;

pub use modules::config::GameConfig;
pub use modules::error::{ConfigError, PlinkoError, WagerError};
pub use modules::game::Game;

use wasm_bindgen::prelude::*;

use crate::modules::headless::{BatchSpec, run_batch};

/// Drop `balls` balls with the default board and return the report as JSON
#[wasm_bindgen]
pub fn simulate_report_json(balls: u32, seed: u64) -> String {
    let spec = BatchSpec {
        balls_per_run: balls,
        runs: 1,
        seed,
        ..BatchSpec::default()
    };
    match run_batch(&GameConfig::default(), &spec) {
        Ok(report) => serde_json::to_string(&report)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string()),
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_report_json() {
        let json = simulate_report_json(2, 3);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["balls"], 2);
        assert_eq!(value["multipliers"].as_array().map(|a| a.len()), Some(9));
    }
}
