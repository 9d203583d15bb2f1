//! Events fed to the game and what came out of handling them.

use crate::modules::error::WagerError;
use crate::modules::physics::CollisionPair;
use crate::modules::session::{BallId, Settlement};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player asked for a ball, with the wager field's text
    Launch { wager: Option<String> },
    /// One simulation tick
    Tick,
    /// Collision-start pairs reported by one physics step
    Collisions(Vec<CollisionPair>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Spawned { ball: BallId, wager: Option<f64> },
    Rejected(WagerError),
    Settled(Settlement),
}

impl Feedback {
    /// Whether the session changed
    pub fn mutates(&self) -> bool {
        !matches!(self, Feedback::Rejected(_))
    }
}
