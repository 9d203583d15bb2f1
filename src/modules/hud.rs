//! On-screen text, regenerated from session state after every change.

use macroquad::prelude::Vec2;

use crate::modules::error::HudError;
use crate::modules::layout::BoardLayout;
use crate::modules::session::{Outcome, Session};

/// Gap between an exit box and its counter label
const LABEL_GAP: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ExitLabel {
    /// Top-left corner of the text, in board coordinates
    pub anchor: Vec2,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub hits: String,
    /// None in the counting-only variant
    pub balance: Option<String>,
    pub last: Option<String>,
    pub exits: Vec<ExitLabel>,
}

/// Share of all hits. Nothing has landed yet -> "(—)"
pub fn percentage_text(count: u64, total: u64) -> String {
    if total == 0 {
        "(—)".to_string()
    } else {
        format!("({:.2}%)", count as f64 / total as f64 * 100.0)
    }
}

pub fn exit_text(count: u64, total: u64) -> String {
    format!("{count}\n{}", percentage_text(count, total))
}

pub fn hits_text(total: u64) -> String {
    format!("Ball Hits: {total}")
}

pub fn balance_text(balance: f64) -> String {
    format!("Balance: {balance:.2}")
}

impl Hud {
    /// One label per exit box. Fails if the session does not track the
    /// same number of exits as the board has.
    pub fn bind(layout: &BoardLayout, session: &Session, wagering: bool) -> Result<Self, HudError> {
        if layout.exits.len() != session.exit_hits().len() {
            return Err(HudError::LabelMismatch {
                labels: layout.exits.len(),
                exits: session.exit_hits().len(),
            });
        }
        let exits = layout
            .exits
            .iter()
            .map(|exit| ExitLabel {
                anchor: Vec2::new(
                    exit.pos.x - exit.size.x / 2.0,
                    exit.pos.y + exit.size.y / 2.0 + LABEL_GAP,
                ),
                text: String::new(),
            })
            .collect();
        let mut hud = Self {
            hits: String::new(),
            balance: wagering.then(String::new),
            last: None,
            exits,
        };
        hud.refresh(session);
        Ok(hud)
    }

    pub fn refresh(&mut self, session: &Session) {
        let total = session.total_hits();
        self.hits = hits_text(total);
        if let Some(balance) = self.balance.as_mut() {
            *balance = balance_text(session.balance());
        }
        for (label, count) in self.exits.iter_mut().zip(session.exit_hits()) {
            label.text = exit_text(*count, total);
        }
        self.last = session.last_settlement().map(|s| match s.outcome {
            Outcome::Exit { index, multiplier } => match s.wager {
                Some(_) => format!("Last: slot {} x{multiplier} paid {:.2}", index + 1, s.payout),
                None => format!("Last: slot {} x{multiplier}", index + 1),
            },
            Outcome::Ground => "Last: missed the slots".to_string(),
        });
    }
}
