//! Session state: balance, hit counters and the live-ball set.

use std::collections::BTreeMap;

/// Identifies a ball for its whole life, in the session and the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BallId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallPhase {
    /// Created this tick, not yet stepped
    Spawned,
    InFlight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveBall {
    pub id: BallId,
    pub wager: Option<f64>,
    pub phase: BallPhase,
}

/// Where a ball came to rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Ground,
    Exit { index: usize, multiplier: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub ball: BallId,
    pub wager: Option<f64>,
    pub outcome: Outcome,
    /// Amount credited back, 0 for ground hits and unwagered balls
    pub payout: f64,
}

#[derive(Debug, Clone)]
pub struct Session {
    balance: f64,
    total_hits: u64,
    ground_hits: u64,
    exit_hits: Vec<u64>,
    live: BTreeMap<BallId, LiveBall>,
    next_id: u32,
    total_wagered: f64,
    total_paid: f64,
    last_settlement: Option<Settlement>,
}

impl Session {
    pub fn new(starting_balance: f64, exit_count: usize) -> Self {
        Self {
            balance: starting_balance,
            total_hits: 0,
            ground_hits: 0,
            exit_hits: vec![0; exit_count],
            live: BTreeMap::new(),
            next_id: 0,
            total_wagered: 0.0,
            total_paid: 0.0,
            last_settlement: None,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn ground_hits(&self) -> u64 {
        self.ground_hits
    }

    pub fn exit_hits(&self) -> &[u64] {
        &self.exit_hits
    }

    pub fn total_wagered(&self) -> f64 {
        self.total_wagered
    }

    pub fn total_paid(&self) -> f64 {
        self.total_paid
    }

    pub fn last_settlement(&self) -> Option<&Settlement> {
        self.last_settlement.as_ref()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: BallId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_balls(&self) -> impl Iterator<Item = &LiveBall> {
        self.live.values()
    }

    /// Register a new ball and debit its wager. The wager must already be
    /// validated against the balance.
    pub fn open_ball(&mut self, wager: Option<f64>) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        if let Some(w) = wager {
            debug_assert!(w > 0.0 && w <= self.balance);
            self.balance -= w;
            self.total_wagered += w;
        }
        self.live.insert(
            id,
            LiveBall {
                id,
                wager,
                phase: BallPhase::Spawned,
            },
        );
        id
    }

    /// Balls spawned before this tick are now moving
    pub fn mark_in_flight(&mut self) {
        for ball in self.live.values_mut() {
            ball.phase = BallPhase::InFlight;
        }
    }

    /// Ball hit the ground. None if it was already settled.
    pub fn settle_ground(&mut self, id: BallId) -> Option<Settlement> {
        let ball = self.live.remove(&id)?;
        self.total_hits += 1;
        self.ground_hits += 1;
        Some(self.finish(Settlement {
            ball: id,
            wager: ball.wager,
            outcome: Outcome::Ground,
            payout: 0.0,
        }))
    }

    /// Ball landed in exit `index`. None if it was already settled or the
    /// slot does not exist.
    pub fn settle_exit(&mut self, id: BallId, index: usize, multiplier: f64) -> Option<Settlement> {
        if index >= self.exit_hits.len() {
            return None;
        }
        let ball = self.live.remove(&id)?;
        let payout = ball.wager.map_or(0.0, |w| w * multiplier);
        self.balance += payout;
        self.total_paid += payout;
        self.total_hits += 1;
        self.exit_hits[index] += 1;
        Some(self.finish(Settlement {
            ball: id,
            wager: ball.wager,
            outcome: Outcome::Exit { index, multiplier },
            payout,
        }))
    }

    fn finish(&mut self, settlement: Settlement) -> Settlement {
        self.last_settlement = Some(settlement.clone());
        settlement
    }
}
