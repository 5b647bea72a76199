//! Physics contract
//!
//! The claw core never integrates rigid bodies itself. It only needs the
//! handful of per-tick operations below, each with instantaneous effect.
//! [`SimpleWorld`] is a small reference implementation used by the binary and
//! the tests; a real engine binding implements [`PhysicsWorld`] instead.

pub mod world;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use world::SimpleWorld;

/// Opaque handle to a body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Opaque handle to a joint in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JointId(pub u32);

/// Collision category used to filter overlap queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyCategory {
    Prize,
    Hook,
    Scenery,
}

/// Everything needed to spawn a box body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub category: BodyCategory,
    pub position: Vec3,
    /// Rotation about the vertical axis (radians)
    pub yaw: f32,
    pub half_extents: Vec3,
    pub mass: f32,
    /// Kinematic bodies are moved only by `set_position`
    pub kinematic: bool,
}

/// Break thresholds for a physical joint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    pub break_force: f32,
    pub break_torque: f32,
}

/// Operations the claw core needs from a physics engine
pub trait PhysicsWorld {
    fn spawn(&mut self, desc: BodyDesc) -> BodyId;

    /// Removes the body and any joints or children attached to it
    fn despawn(&mut self, body: BodyId);

    fn position(&self, body: BodyId) -> Option<Vec3>;

    /// Teleport (kinematic move)
    fn set_position(&mut self, body: BodyId, position: Vec3);

    fn set_velocity(&mut self, body: BodyId, velocity: Vec3);

    fn mass(&self, body: BodyId) -> Option<f32>;

    /// Fill `out` with bodies of `category` touching the sphere, in scan
    /// order. Returns how many slots were written; a full buffer means there
    /// may be more.
    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        category: BodyCategory,
        out: &mut [BodyId],
    ) -> usize;

    /// Closest point on the body's surface to `point`
    fn closest_point(&self, body: BodyId, point: Vec3) -> Option<Vec3>;

    /// Make `body` ride with `parent`, keeping its world position.
    /// `None` detaches it again.
    fn set_parent(&mut self, body: BodyId, parent: Option<BodyId>);

    /// Frozen bodies have zero velocity, no gravity and are kinematic
    fn set_frozen(&mut self, body: BodyId, frozen: bool);

    fn attach_joint(&mut self, body: BodyId, anchor: BodyId, limits: JointLimits) -> JointId;

    fn detach_joint(&mut self, joint: JointId);

    /// False once the joint broke or was detached
    fn joint_intact(&self, joint: JointId) -> bool;

    fn step(&mut self, dt: f32);
}
