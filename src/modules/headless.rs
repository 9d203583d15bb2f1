//! Headless batch drops
//!
//! Runs whole games without a window and reports how the balls spread over
//! the exit slots. Independent runs are seeded `seed, seed + 1, ...` and run
//! in parallel on native targets.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::modules::config::GameConfig;
use crate::modules::error::Result;
use crate::modules::events::Feedback;
use crate::modules::game::Game;

/// How to drop
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSpec {
    pub balls_per_run: u32,
    pub runs: u32,
    pub seed: u64,
    /// Ticks between launches
    pub drop_interval: u32,
    /// Give up on balls still bouncing after this many ticks
    pub max_ticks: u32,
}

impl Default for BatchSpec {
    fn default() -> Self {
        Self {
            balls_per_run: 100,
            runs: 1,
            seed: 0,
            drop_interval: 15,
            max_ticks: 60 * 60 * 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropReport {
    pub runs: u32,
    pub balls: u64,
    pub total_hits: u64,
    pub ground_hits: u64,
    /// Balls still live when the tick budget ran out
    pub unsettled: u64,
    pub multipliers: Vec<f64>,
    pub exit_hits: Vec<u64>,
    /// Percent of total hits per slot
    pub exit_share: Vec<f64>,
    pub wagered: f64,
    pub paid: f64,
    /// paid / wagered, None when nothing was wagered
    pub rtp: Option<f64>,
}

impl DropReport {
    fn empty(multipliers: Vec<f64>) -> Self {
        Self {
            runs: 0,
            balls: 0,
            total_hits: 0,
            ground_hits: 0,
            unsettled: 0,
            exit_hits: vec![0; multipliers.len()],
            exit_share: vec![0.0; multipliers.len()],
            multipliers,
            wagered: 0.0,
            paid: 0.0,
            rtp: None,
        }
    }

    fn merge(&mut self, other: &DropReport) {
        self.runs += other.runs;
        self.balls += other.balls;
        self.total_hits += other.total_hits;
        self.ground_hits += other.ground_hits;
        self.unsettled += other.unsettled;
        for (mine, theirs) in self.exit_hits.iter_mut().zip(&other.exit_hits) {
            *mine += theirs;
        }
        self.wagered += other.wagered;
        self.paid += other.paid;
        self.finish();
    }

    fn finish(&mut self) {
        let total = self.total_hits;
        self.exit_share = self
            .exit_hits
            .iter()
            .map(|&n| if total == 0 { 0.0 } else { n as f64 / total as f64 * 100.0 })
            .collect();
        self.rtp = (self.wagered > 0.0).then(|| self.paid / self.wagered);
    }
}

/// One game from an empty board until every ball settled or time ran out
pub fn run_once(config: &GameConfig, balls: u32, seed: u64, spec: &BatchSpec) -> Result<DropReport> {
    let mut config = config.clone();
    let wager = config.wagering.then_some(config.default_wager);
    if let Some(w) = wager {
        // Enough to pay for every drop up front
        config.starting_balance = config.starting_balance.max(w * balls as f64);
    }
    let starting_balance = config.starting_balance;
    let mut game = Game::with_rapier(config, seed)?;

    let wager_text = wager.map(|w| w.to_string());
    let interval = spec.drop_interval.max(1);
    let mut launched = 0;
    let mut rejected = 0;
    let mut ticks = 0;
    while ticks < spec.max_ticks && (launched < balls || game.session().live_count() > 0) {
        if launched < balls && ticks % interval == 0 {
            game.launch(wager_text.clone());
            launched += 1;
        }
        rejected += game
            .tick()
            .iter()
            .filter(|f| matches!(f, Feedback::Rejected(_)))
            .count() as u64;
        ticks += 1;
    }
    if rejected > 0 {
        log::warn!("Run {seed}: {rejected} launches rejected");
    }

    let session = game.session();
    let mut report = DropReport {
        runs: 1,
        balls: launched as u64 - rejected,
        total_hits: session.total_hits(),
        ground_hits: session.ground_hits(),
        unsettled: session.live_count() as u64,
        multipliers: game.layout().exits.iter().map(|e| e.multiplier).collect(),
        exit_hits: session.exit_hits().to_vec(),
        exit_share: Vec::new(),
        wagered: session.total_wagered(),
        paid: session.total_paid(),
        rtp: None,
    };
    report.finish();
    log::debug!(
        "Run {seed}: {} hits in {ticks} ticks, balance {:.2} -> {:.2}",
        report.total_hits,
        starting_balance,
        session.balance()
    );
    Ok(report)
}

/// All runs of a batch, merged
pub fn run_batch(config: &GameConfig, spec: &BatchSpec) -> Result<DropReport> {
    config.validate()?;
    let one = |i: u32| run_once(config, spec.balls_per_run, spec.seed.wrapping_add(i as u64), spec);

    #[cfg(not(target_arch = "wasm32"))]
    let reports = (0..spec.runs).into_par_iter().map(one).collect::<Result<Vec<_>>>()?;

    #[cfg(target_arch = "wasm32")]
    let reports = (0..spec.runs).map(one).collect::<Result<Vec<_>>>()?;

    let mut merged = DropReport::empty(config.board.multipliers.clone());
    for report in &reports {
        merged.merge(report);
    }
    merged.finish();
    log::info!(
        "Batch done: {} runs, {} balls, {} settled",
        merged.runs,
        merged.balls,
        merged.total_hits
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::config::BoardConfig;
    use approx::assert_relative_eq;

    fn quick() -> BatchSpec {
        BatchSpec {
            balls_per_run: 4,
            runs: 2,
            seed: 11,
            drop_interval: 30,
            max_ticks: 6000,
        }
    }

    #[test]
    fn test_merge_sums_counts() {
        let mut a = DropReport::empty(vec![2.0, 1.0, 2.0]);
        let mut b = DropReport::empty(vec![2.0, 1.0, 2.0]);
        a.runs = 1;
        a.balls = 2;
        a.total_hits = 2;
        a.exit_hits = vec![1, 1, 0];
        a.wagered = 20.0;
        a.paid = 30.0;
        b.runs = 1;
        b.balls = 2;
        b.total_hits = 2;
        b.exit_hits = vec![0, 1, 1];
        b.wagered = 20.0;
        b.paid = 30.0;

        let mut merged = DropReport::empty(vec![2.0, 1.0, 2.0]);
        merged.merge(&a);
        merged.merge(&b);
        assert_eq!(merged.runs, 2);
        assert_eq!(merged.exit_hits, vec![1, 2, 1]);
        assert_relative_eq!(merged.exit_share[1], 50.0);
        assert_relative_eq!(merged.rtp.unwrap(), 1.5);
    }

    #[test]
    fn test_no_wager_no_rtp() {
        let mut r = DropReport::empty(vec![1.0]);
        r.finish();
        assert_eq!(r.rtp, None);
        assert_eq!(r.exit_share, vec![0.0]);
    }

    #[test]
    fn test_batch_accounts_for_every_ball() {
        let report = run_batch(&GameConfig::default(), &quick()).unwrap();
        assert_eq!(report.runs, 2);
        assert_eq!(report.balls, 8);
        assert_eq!(report.total_hits + report.unsettled, 8);
        let exits: u64 = report.exit_hits.iter().sum();
        assert_eq!(exits + report.ground_hits, report.total_hits);
        assert_relative_eq!(report.wagered, 80.0);
    }

    #[test]
    fn test_most_balls_land_in_slots() {
        let spec = BatchSpec {
            balls_per_run: 25,
            runs: 2,
            seed: 3,
            drop_interval: 20,
            max_ticks: 12_000,
        };
        for board in [BoardConfig::eight_rows(), BoardConfig::ten_rows()] {
            let config = GameConfig {
                board,
                ..GameConfig::default()
            };
            let report = run_batch(&config, &spec).unwrap();
            assert_eq!(report.unsettled, 0);
            assert_eq!(report.total_hits, 50);
            let exits: u64 = report.exit_hits.iter().sum();
            assert!(
                exits * 10 >= report.total_hits * 9,
                "{exits} of {} in slots, {} on the ground",
                report.total_hits,
                report.ground_hits
            );
            assert!(report.rtp.is_some_and(|rtp| rtp > 0.1));
        }
    }

    #[test]
    fn test_batch_is_reproducible() {
        let config = GameConfig {
            wagering: false,
            ..GameConfig::default()
        };
        let a = run_batch(&config, &quick()).unwrap();
        let b = run_batch(&config, &quick()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rtp, None);
    }

    #[test]
    fn test_report_serializes() {
        let mut r = DropReport::empty(vec![3.0, 1.0, 3.0]);
        r.finish();
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"exit_hits\":[0,0,0]"));
    }
}
