//! Claw carriage and hook actuator
//!
//! Owns the horizontal carriage position and the vertical hook travel. The
//! state machine only issues commands (`set_move`, `begin_drop`,
//! `begin_lift`) and reads status; motion happens in [`Grabber::step`].

use glam::{Vec2, Vec3};

use crate::config::MachineConfig;
use crate::physics::{BodyCategory, BodyDesc, BodyId, PhysicsWorld};

/// Maximum candidates returned by one clamp overlap query
pub const OVERLAP_CAPACITY: usize = 8;

/// Sway spring stiffness (1/s²)
const SWAY_STIFFNESS: f32 = 12.0;
/// Sway damping (1/s)
const SWAY_DAMPING: f32 = 2.0;
/// Sway angle limit (radians)
const MAX_SWAY: f32 = 0.5;

/// Float tolerance for "at rest" checks
const HEIGHT_EPS: f32 = 0.0005;

/// Motion parameters taken from the machine config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabberTuning {
    pub horizontal_speed: f32,
    pub drop_speed: f32,
    pub lift_speed: f32,
    pub max_drop_depth: f32,
    pub rest_height: f32,
    pub swinginess: f32,
    pub travel_bounds: Vec2,
}

impl GrabberTuning {
    pub fn from_config(config: &MachineConfig) -> Self {
        Self {
            horizontal_speed: config.horizontal_speed,
            drop_speed: config.drop_speed,
            lift_speed: config.lift_speed,
            max_drop_depth: config.max_drop_depth,
            rest_height: config.rest_height,
            swinginess: config.swinginess,
            travel_bounds: config.travel_bounds,
        }
    }

    /// Lowest hook height
    pub fn floor_height(&self) -> f32 {
        self.rest_height - self.max_drop_depth
    }
}

/// Physical claw actuator
#[derive(Debug, Clone)]
pub struct Grabber {
    pub tuning: GrabberTuning,
    origin: Vec3,
    /// Carriage XZ offset from the origin
    carriage: Vec2,
    velocity: Vec2,
    /// Hook tip height above the origin
    height: f32,
    move_intent: Vec2,
    dropping: bool,
    lifting: bool,
    sway: f32,
    sway_vel: f32,
    hook: BodyId,
}

impl Grabber {
    /// Spawn the hook body at rest above the origin
    pub fn new(world: &mut dyn PhysicsWorld, tuning: GrabberTuning, origin: Vec3) -> Self {
        let hook = world.spawn(BodyDesc {
            category: BodyCategory::Hook,
            position: origin + Vec3::Y * tuning.rest_height,
            yaw: 0.0,
            half_extents: Vec3::splat(0.05),
            mass: 5.0,
            kinematic: true,
        });
        Self {
            tuning,
            origin,
            carriage: Vec2::ZERO,
            velocity: Vec2::ZERO,
            height: tuning.rest_height,
            move_intent: Vec2::ZERO,
            dropping: false,
            lifting: false,
            sway: 0.0,
            sway_vel: 0.0,
            hook,
        }
    }

    /// Store the horizontal intent; applied on the next step
    pub fn set_move(&mut self, intent: Vec2) {
        self.move_intent = intent;
    }

    pub fn begin_drop(&mut self) {
        self.dropping = true;
        self.lifting = false;
    }

    pub fn begin_lift(&mut self) {
        self.dropping = false;
        self.lifting = true;
    }

    pub fn hook(&self) -> BodyId {
        self.hook
    }

    pub fn move_intent(&self) -> Vec2 {
        self.move_intent
    }

    pub fn carriage(&self) -> Vec2 {
        self.carriage
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Cosmetic swing angle (radians)
    pub fn sway(&self) -> f32 {
        self.sway
    }

    pub fn is_dropping(&self) -> bool {
        self.dropping
    }

    pub fn is_lifting(&self) -> bool {
        self.lifting
    }

    pub fn at_rest(&self) -> bool {
        (self.height - self.tuning.rest_height).abs() <= HEIGHT_EPS
    }

    pub fn at_depth(&self) -> bool {
        self.height <= self.tuning.floor_height() + HEIGHT_EPS
    }

    /// World position of the hook tip
    pub fn hook_tip(&self) -> Vec3 {
        self.origin + Vec3::new(self.carriage.x, self.height, self.carriage.y)
    }

    /// Advance carriage, sway, and hook travel by one fixed step
    pub fn step(&mut self, world: &mut dyn PhysicsWorld, dt: f32) {
        let t = self.tuning;

        self.velocity = self.move_intent * t.horizontal_speed;
        let bounds = t.travel_bounds;
        self.carriage = (self.carriage + self.velocity * dt).clamp(-bounds, bounds);

        // Sideways input kicks the hook like a pendulum
        let sway_accel = -self.move_intent.x * t.swinginess
            - self.sway * SWAY_STIFFNESS
            - self.sway_vel * SWAY_DAMPING;
        self.sway_vel += sway_accel * dt;
        self.sway = (self.sway + self.sway_vel * dt).clamp(-MAX_SWAY, MAX_SWAY);
        if !self.sway.is_finite() || !self.sway_vel.is_finite() {
            self.sway = 0.0;
            self.sway_vel = 0.0;
        }

        if self.dropping {
            self.height = (self.height - t.drop_speed * dt).max(t.floor_height());
        } else if self.lifting {
            self.height = (self.height + t.lift_speed * dt).min(t.rest_height);
            if self.at_rest() {
                self.height = t.rest_height;
                self.lifting = false;
            }
        }

        world.set_position(self.hook, self.hook_tip());
    }

    /// Prize bodies inside the capture sphere around the hook tip
    pub fn overlap_prizes(
        &self,
        world: &dyn PhysicsWorld,
        radius: f32,
        out: &mut [BodyId; OVERLAP_CAPACITY],
    ) -> usize {
        world.overlap_sphere(self.hook_tip(), radius, BodyCategory::Prize, out)
    }

    /// Despawn the hook body
    pub fn remove(self, world: &mut dyn PhysicsWorld) {
        world.despawn(self.hook);
    }
}
