//! Game loop core
//!
//! All input, tick and collision handling goes through one event queue.
//! Handlers are registered per event kind and run in registration order;
//! collision handlers each walk the whole batch. A handler only settles a
//! ball that is still live, so repeated pairs in one batch are ignored.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::modules::config::GameConfig;
use crate::modules::error::Result;
use crate::modules::events::{Feedback, GameEvent};
use crate::modules::hud::Hud;
use crate::modules::layout::{BoardLayout, build_layout};
use crate::modules::perturb::horizontal_gravity;
use crate::modules::physics::{BodyTag, CollisionPair, PhysicsWorld, RapierWorld};
use crate::modules::session::{Session, Settlement};
use crate::modules::wager::parse_wager;

pub type LaunchHandler<W> = fn(&mut Game<W>, Option<&str>) -> Feedback;
pub type TickHandler<W> = fn(&mut Game<W>);
pub type CollisionHandler<W> = fn(&mut Game<W>, &CollisionPair) -> Option<Settlement>;

/// Handler registrations, one list per event kind
pub struct Handlers<W: PhysicsWorld> {
    launch: Vec<LaunchHandler<W>>,
    tick: Vec<TickHandler<W>>,
    collision: Vec<CollisionHandler<W>>,
}

impl<W: PhysicsWorld> Handlers<W> {
    pub fn empty() -> Self {
        Self {
            launch: Vec::new(),
            tick: Vec::new(),
            collision: Vec::new(),
        }
    }

    /// Spawn on launch; jitter gravity then step on tick; exit settlement
    /// before ground settlement on collisions
    pub fn standard() -> Self {
        let mut handlers = Self::empty();
        handlers
            .on_launch(spawn_ball)
            .on_tick(perturb_gravity)
            .on_tick(step_world)
            .on_collision(settle_at_exit)
            .on_collision(settle_on_ground);
        handlers
    }

    pub fn on_launch(&mut self, handler: LaunchHandler<W>) -> &mut Self {
        self.launch.push(handler);
        self
    }

    pub fn on_tick(&mut self, handler: TickHandler<W>) -> &mut Self {
        self.tick.push(handler);
        self
    }

    pub fn on_collision(&mut self, handler: CollisionHandler<W>) -> &mut Self {
        self.collision.push(handler);
        self
    }
}

pub struct Game<W: PhysicsWorld> {
    config: GameConfig,
    layout: BoardLayout,
    session: Session,
    world: W,
    rng: Pcg32,
    hud: Hud,
    handlers: Handlers<W>,
    queue: VecDeque<GameEvent>,
}

impl Game<RapierWorld> {
    /// Build the board and its Rapier world from a validated config
    pub fn with_rapier(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let layout = build_layout(&config)?;
        let world = RapierWorld::new(&config, &layout);
        Self::new(config, layout, world, seed)
    }
}

impl<W: PhysicsWorld> Game<W> {
    pub fn new(config: GameConfig, layout: BoardLayout, world: W, seed: u64) -> Result<Self> {
        let session = Session::new(config.starting_balance, layout.exits.len());
        let hud = Hud::bind(&layout, &session, config.wagering)?;
        log::info!(
            "Board ready: {} pegs, {} exits, balance {:.2}",
            layout.pegs.len(),
            layout.exits.len(),
            session.balance()
        );
        Ok(Self {
            config,
            layout,
            session,
            world,
            rng: Pcg32::seed_from_u64(seed),
            hud,
            handlers: Handlers::standard(),
            queue: VecDeque::new(),
        })
    }

    pub fn with_handlers(mut self, handlers: Handlers<W>) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn push(&mut self, event: GameEvent) {
        self.queue.push_back(event);
    }

    /// Queue a launch; handled on the next dispatch
    pub fn launch(&mut self, wager: Option<String>) {
        self.push(GameEvent::Launch { wager });
    }

    /// Queue a tick and drain everything pending
    pub fn tick(&mut self) -> Vec<Feedback> {
        self.push(GameEvent::Tick);
        self.dispatch()
    }

    /// Drain the queue, including events handlers enqueue along the way
    pub fn dispatch(&mut self) -> Vec<Feedback> {
        let mut feedback = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            match event {
                GameEvent::Launch { wager } => {
                    for i in 0..self.handlers.launch.len() {
                        let handler = self.handlers.launch[i];
                        let result = handler(self, wager.as_deref());
                        self.record(&mut feedback, result);
                    }
                }
                GameEvent::Tick => {
                    for i in 0..self.handlers.tick.len() {
                        let handler = self.handlers.tick[i];
                        handler(self);
                    }
                }
                GameEvent::Collisions(pairs) => {
                    for i in 0..self.handlers.collision.len() {
                        let handler = self.handlers.collision[i];
                        for pair in &pairs {
                            if let Some(settlement) = handler(self, pair) {
                                self.record(&mut feedback, Feedback::Settled(settlement));
                            }
                        }
                    }
                }
            }
        }
        feedback
    }

    fn record(&mut self, feedback: &mut Vec<Feedback>, item: Feedback) {
        if item.mutates() {
            self.hud.refresh(&self.session);
        }
        feedback.push(item);
    }

    /// Remove a settled ball from the world right after the session let go of it
    fn release(&mut self, settlement: Settlement) -> Settlement {
        if !self.world.remove_ball(settlement.ball) {
            log::warn!("Ball {:?} settled but was not in the physics world", settlement.ball);
        }
        log::debug!(
            "Ball {:?} settled: {:?}, payout {:.2}",
            settlement.ball,
            settlement.outcome,
            settlement.payout
        );
        settlement
    }
}

/// Validate the wager, debit it and drop a ball from the top
pub fn spawn_ball<W: PhysicsWorld>(game: &mut Game<W>, input: Option<&str>) -> Feedback {
    let wager = if game.config.wagering {
        match parse_wager(input.unwrap_or(""), game.session.balance()) {
            Ok(wager) => Some(wager),
            Err(err) => {
                log::info!("Launch rejected: {err}");
                return Feedback::Rejected(err);
            }
        }
    } else {
        None
    };

    let ball = game.session.open_ball(wager);
    game.world.add_ball(ball, game.layout.spawn);
    log::debug!("Ball {ball:?} spawned, wager {wager:?}, balance {:.2}", game.session.balance());
    Feedback::Spawned { ball, wager }
}

/// Redraw the engine-wide horizontal gravity while balls are falling
pub fn perturb_gravity<W: PhysicsWorld>(game: &mut Game<W>) {
    if game.session.live_count() == 0 {
        return;
    }
    let x = horizontal_gravity(&game.config.perturbation, &mut game.rng);
    game.world.set_horizontal_gravity(x);
}

/// Advance the physics world and queue its collision batch
pub fn step_world<W: PhysicsWorld>(game: &mut Game<W>) {
    let pairs = game.world.step();
    game.session.mark_in_flight();
    if !pairs.is_empty() {
        game.push(GameEvent::Collisions(pairs));
    }
}

/// Ball touched an exit box: pay out and remove it
pub fn settle_at_exit<W: PhysicsWorld>(game: &mut Game<W>, pair: &CollisionPair) -> Option<Settlement> {
    let Some((ball, BodyTag::Exit(index))) = pair.ball_against() else {
        return None;
    };
    let multiplier = game.layout.exits.get(index)?.multiplier;
    let settlement = game.session.settle_exit(ball, index, multiplier)?;
    Some(game.release(settlement))
}

/// Ball touched the ground: count it and remove it
pub fn settle_on_ground<W: PhysicsWorld>(game: &mut Game<W>, pair: &CollisionPair) -> Option<Settlement> {
    let Some((ball, BodyTag::Ground)) = pair.ball_against() else {
        return None;
    };
    let settlement = game.session.settle_ground(ball)?;
    Some(game.release(settlement))
}
