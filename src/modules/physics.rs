//! Physics world seam and its Rapier implementation
//!
//! The game only talks to `PhysicsWorld`: add/remove balls, set the
//! horizontal gravity, step and read back collision-start pairs tagged with
//! what each body is. `RapierWorld` owns every body of the board.

use std::collections::HashMap;

use macroquad::prelude::Vec2;
use parking_lot::Mutex;
// Import Rapier2D physics engine - provides 2D rigid body physics simulation
use rapier2d::prelude::*;

use crate::modules::config::{BallConfig, GameConfig};
use crate::modules::layout::BoardLayout;
use crate::modules::session::BallId;

/// Balls never collide with each other
pub const BALL_GROUP: Group = Group::GROUP_1;
/// Pegs never collide with each other
pub const PEG_GROUP: Group = Group::GROUP_2;

/// Balls this far below the world bottom count as having hit the ground
const ESCAPE_MARGIN: f32 = 200.0;

/// What a collider belongs to, stored in its `user_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    Peg(usize),
    Ground,
    Exit(usize),
    Rail(usize),
    Ball(BallId),
}

impl BodyTag {
    const PEG: u128 = 1;
    const GROUND: u128 = 2;
    const EXIT: u128 = 3;
    const BALL: u128 = 4;
    const RAIL: u128 = 5;

    /// Kind in the high 64 bits, index in the low 64. Zero means untagged.
    pub fn to_user_data(self) -> u128 {
        let (kind, payload) = match self {
            BodyTag::Peg(i) => (Self::PEG, i as u128),
            BodyTag::Ground => (Self::GROUND, 0),
            BodyTag::Exit(i) => (Self::EXIT, i as u128),
            BodyTag::Rail(i) => (Self::RAIL, i as u128),
            BodyTag::Ball(id) => (Self::BALL, id.0 as u128),
        };
        (kind << 64) | payload
    }

    pub fn from_user_data(data: u128) -> Option<Self> {
        let payload = (data & u64::MAX as u128) as u64;
        match data >> 64 {
            Self::PEG => Some(BodyTag::Peg(payload as usize)),
            Self::GROUND => Some(BodyTag::Ground),
            Self::EXIT => Some(BodyTag::Exit(payload as usize)),
            Self::RAIL => Some(BodyTag::Rail(payload as usize)),
            Self::BALL => u32::try_from(payload).ok().map(|id| BodyTag::Ball(BallId(id))),
            _ => None,
        }
    }
}

/// Two bodies that started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: BodyTag,
    pub b: BodyTag,
}

impl CollisionPair {
    pub fn new(a: BodyTag, b: BodyTag) -> Self {
        Self { a, b }
    }

    /// The ball in this pair and what it touched, in either order
    pub fn ball_against(&self) -> Option<(BallId, BodyTag)> {
        match (self.a, self.b) {
            (BodyTag::Ball(_), BodyTag::Ball(_)) => None,
            (BodyTag::Ball(id), other) | (other, BodyTag::Ball(id)) => Some((id, other)),
            _ => None,
        }
    }
}

/// What the game needs from a physics engine
pub trait PhysicsWorld {
    /// Insert a dynamic ball at `pos`
    fn add_ball(&mut self, id: BallId, pos: Vec2);
    /// Remove a ball. false if it was not in the world.
    fn remove_ball(&mut self, id: BallId) -> bool;
    fn has_ball(&self, id: BallId) -> bool;
    fn ball_count(&self) -> usize;
    fn gravity(&self) -> Vec2;
    /// Engine-wide, applies to every ball from the next step on
    fn set_horizontal_gravity(&mut self, x: f32);
    /// Advance one tick and return the collision-start pairs of that tick
    fn step(&mut self) -> Vec<CollisionPair>;
}

/// Collects collision-start events while the pipeline steps
#[derive(Default)]
struct CollisionCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventHandler for CollisionCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if event.started() {
            self.started.lock().push((event.collider1(), event.collider2()));
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    collector: CollisionCollector,
    balls: HashMap<BallId, RigidBodyHandle>,
    ball: BallConfig,
    escape_y: f32,
}

impl RapierWorld {
    /// Build the static board: ground, pegs and exit boxes
    pub fn new(config: &GameConfig, layout: &BoardLayout) -> Self {
        let mut world = Self {
            // Positive Y points down in screen coordinates
            gravity: vector![0.0, config.gravity_y],
            integration_params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            collector: CollisionCollector::default(),
            balls: HashMap::new(),
            ball: config.ball.clone(),
            escape_y: config.world_height + ESCAPE_MARGIN,
        };

        // ---------------- Ground ------------------------------------------
        let ground = &layout.ground;
        let collider = ColliderBuilder::cuboid(ground.size.x / 2.0, ground.size.y / 2.0)
            .friction(0.4)
            .user_data(BodyTag::Ground.to_user_data())
            .build();
        world.insert_fixed(ground.pos, 0.0, collider);

        // ---------------- Pegs --------------------------------------------
        let peg_groups = InteractionGroups::new(PEG_GROUP, Group::ALL.difference(PEG_GROUP));
        for (i, peg) in layout.pegs.iter().enumerate() {
            let collider = ColliderBuilder::ball(peg.radius)
                .restitution(peg.restitution)
                .collision_groups(peg_groups)
                .user_data(BodyTag::Peg(i).to_user_data())
                .build();
            world.insert_fixed(peg.pos, 0.0, collider);
        }

        // ---------------- Exit boxes --------------------------------------
        for exit in &layout.exits {
            let collider = ColliderBuilder::cuboid(exit.size.x / 2.0, exit.size.y / 2.0)
                .user_data(BodyTag::Exit(exit.index).to_user_data())
                .build();
            world.insert_fixed(exit.pos, 0.0, collider);
        }

        // ---------------- Side rails --------------------------------------
        for (i, rail) in layout.rails.iter().enumerate() {
            let collider = ColliderBuilder::cuboid(rail.length() / 2.0, rail.thickness / 2.0)
                .friction(0.0)
                .user_data(BodyTag::Rail(i).to_user_data())
                .build();
            world.insert_fixed(rail.center(), rail.angle(), collider);
        }

        world
    }

    fn insert_fixed(&mut self, pos: Vec2, angle: f32, collider: Collider) {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![pos.x, pos.y])
            .rotation(angle)
            .build();
        let handle = self.bodies.insert(body);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
    }

    fn tag_of(&self, handle: ColliderHandle) -> Option<BodyTag> {
        self.colliders
            .get(handle)
            .and_then(|c| BodyTag::from_user_data(c.user_data))
    }

    pub fn bodies(&self) -> &RigidBodySet {
        &self.bodies
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    pub fn ball_position(&self, id: BallId) -> Option<Vec2> {
        let handle = self.balls.get(&id)?;
        let pos = self.bodies.get(*handle)?.translation();
        Some(Vec2::new(pos.x, pos.y))
    }
}

impl PhysicsWorld for RapierWorld {
    fn add_ball(&mut self, id: BallId, pos: Vec2) {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![pos.x, pos.y])
            .linvel(vector![0.0, 0.0])
            .build();
        let collider = ColliderBuilder::ball(self.ball.radius)
            .restitution(self.ball.restitution)
            .friction(self.ball.friction)
            .collision_groups(InteractionGroups::new(BALL_GROUP, Group::ALL.difference(BALL_GROUP)))
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(BodyTag::Ball(id).to_user_data())
            .build();
        let handle = self.bodies.insert(body);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        self.balls.insert(id, handle);
    }

    fn remove_ball(&mut self, id: BallId) -> bool {
        let Some(handle) = self.balls.remove(&id) else {
            return false;
        };
        self.bodies
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn has_ball(&self, id: BallId) -> bool {
        self.balls.contains_key(&id)
    }

    fn ball_count(&self) -> usize {
        self.balls.len()
    }

    fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    fn set_horizontal_gravity(&mut self, x: f32) {
        self.gravity.x = x;
    }

    fn step(&mut self) -> Vec<CollisionPair> {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &self.collector,
        );

        let started = std::mem::take(&mut *self.collector.started.lock());
        let mut pairs: Vec<CollisionPair> = started
            .into_iter()
            .filter_map(|(h1, h2)| Some(CollisionPair::new(self.tag_of(h1)?, self.tag_of(h2)?)))
            .collect();

        // A ball that slipped past the board edges never touches the ground
        // body; report it as a ground hit so it still gets settled
        let mut escaped: Vec<BallId> = self
            .balls
            .iter()
            .filter(|(_, handle)| {
                self.bodies
                    .get(**handle)
                    .is_some_and(|b| b.translation().y > self.escape_y)
            })
            .map(|(id, _)| *id)
            .collect();
        escaped.sort();
        pairs.extend(
            escaped
                .into_iter()
                .map(|id| CollisionPair::new(BodyTag::Ball(id), BodyTag::Ground)),
        );
        pairs
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::config::BoardConfig;
    use crate::modules::layout::build_layout;

    #[test]
    fn test_tag_user_data() {
        for tag in [
            BodyTag::Peg(51),
            BodyTag::Ground,
            BodyTag::Exit(8),
            BodyTag::Rail(1),
            BodyTag::Ball(BallId(7)),
        ] {
            assert_eq!(BodyTag::from_user_data(tag.to_user_data()), Some(tag));
        }
        assert_eq!(BodyTag::from_user_data(0), None);
    }

    #[test]
    fn test_ball_against_either_order() {
        let id = BallId(3);
        let p = CollisionPair::new(BodyTag::Exit(2), BodyTag::Ball(id));
        assert_eq!(p.ball_against(), Some((id, BodyTag::Exit(2))));
        let p = CollisionPair::new(BodyTag::Ball(id), BodyTag::Ground);
        assert_eq!(p.ball_against(), Some((id, BodyTag::Ground)));
        let p = CollisionPair::new(BodyTag::Peg(0), BodyTag::Ground);
        assert_eq!(p.ball_against(), None);
    }

    #[test]
    fn test_rapier_world_builds_board() {
        let config = GameConfig::default();
        let layout = build_layout(&config).unwrap();
        let world = RapierWorld::new(&config, &layout);
        // ground + pegs + exits + rails
        assert_eq!(
            world.bodies().len(),
            1 + layout.pegs.len() + layout.exits.len() + layout.rails.len()
        );
        assert_eq!(world.ball_count(), 0);
        assert_eq!(world.gravity(), Vec2::new(0.0, 500.0));
    }

    /// Drop one ball from the real spawn point and follow it down
    fn drop_from_spawn(config: &GameConfig) -> (Option<BodyTag>, f32, f32) {
        let layout = build_layout(config).unwrap();
        let mut world = RapierWorld::new(config, &layout);
        let id = BallId(0);
        world.add_ball(id, layout.spawn);
        assert!(world.has_ball(id));

        let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
        for _ in 0..3000 {
            let hit = world.step().into_iter().find_map(|p| match p.ball_against() {
                Some((ball, tag @ (BodyTag::Ground | BodyTag::Exit(_)))) if ball == id => Some(tag),
                _ => None,
            });
            if let Some(pos) = world.ball_position(id) {
                min_x = min_x.min(pos.x);
                max_x = max_x.max(pos.x);
            }
            if hit.is_some() {
                assert!(world.remove_ball(id));
                assert!(!world.remove_ball(id));
                assert_eq!(world.ball_count(), 0);
                return (hit, min_x, max_x);
            }
        }
        (None, min_x, max_x)
    }

    #[test]
    fn test_ball_from_spawn_lands_in_an_exit() {
        for board in [BoardConfig::eight_rows(), BoardConfig::ten_rows()] {
            let config = GameConfig {
                board,
                ..GameConfig::default()
            };
            let layout = build_layout(&config).unwrap();
            let (landed, min_x, max_x) = drop_from_spawn(&config);
            assert!(
                matches!(landed, Some(BodyTag::Exit(_))),
                "ball ended on {landed:?} after x in {min_x}..{max_x}"
            );
            // Never left the channel between the rails
            assert!(min_x > layout.rails[0].to.x, "ball escaped left to {min_x}");
            assert!(max_x < layout.rails[1].to.x, "ball escaped right to {max_x}");
        }
    }

    #[test]
    fn test_ball_position_only_for_live_balls() {
        let config = GameConfig::default();
        let layout = build_layout(&config).unwrap();
        let mut world = RapierWorld::new(&config, &layout);
        let id = BallId(4);
        assert_eq!(world.ball_position(id), None);
        world.add_ball(id, layout.spawn);
        assert_eq!(world.ball_position(id), Some(layout.spawn));
        world.remove_ball(id);
        assert_eq!(world.ball_position(id), None);
    }

    #[test]
    fn test_horizontal_gravity_is_settable() {
        let config = GameConfig::default();
        let layout = build_layout(&config).unwrap();
        let mut world = RapierWorld::new(&config, &layout);
        world.set_horizontal_gravity(-3.5);
        assert_eq!(world.gravity(), Vec2::new(-3.5, 500.0));
    }
}
