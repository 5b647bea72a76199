//! Grip strategies: how the hook holds a captured body
//!
//! Both strategies share the same open/close gating. A grip only attaches
//! while closed and empty, and opening it always lets go.
//!
//! - [`HardGrip`] parents the body to the hook and freezes it.
//! - [`JointGrip`] hangs the body from a breakable joint. The joint can snap
//!   at any tick, so owners must call [`Grip::sync`] every step to learn
//!   about the release.

use std::fmt::Debug;

use glam::Vec3;

use super::grabber::OVERLAP_CAPACITY;
use crate::config::GripMode;
use crate::physics::{BodyCategory, BodyId, JointId, JointLimits, PhysicsWorld};

/// Capability shared by every grab mechanism
pub trait Grip: Debug {
    /// Take hold of `body`. Fails while open or already holding.
    fn attach(&mut self, world: &mut dyn PhysicsWorld, hook: BodyId, body: BodyId) -> bool;

    /// Let go and restore the body's physics. Returns the released body.
    fn release(&mut self, world: &mut dyn PhysicsWorld) -> Option<BodyId>;

    fn held(&self) -> Option<BodyId>;

    fn is_holding(&self) -> bool {
        self.held().is_some()
    }

    fn is_open(&self) -> bool;

    /// Opening while holding releases the body
    fn set_open(&mut self, world: &mut dyn PhysicsWorld, open: bool);

    /// Detect a release that happened inside the physics world. Returns the
    /// body that was lost, if any.
    fn sync(&mut self, world: &dyn PhysicsWorld) -> Option<BodyId>;
}

/// Build the grip selected by configuration
pub fn from_mode(mode: GripMode) -> Box<dyn Grip> {
    match mode.joint_limits() {
        None => Box::new(HardGrip::new()),
        Some(limits) => Box::new(JointGrip::new(limits)),
    }
}

/// Nearest prize body within `radius` of `center` that is light enough
///
/// Distance is measured to the body's closest surface point; on a tie the
/// first body in scan order wins.
pub fn nearest_eligible(
    world: &dyn PhysicsWorld,
    center: Vec3,
    radius: f32,
    max_mass: f32,
    exclude: BodyId,
) -> Option<BodyId> {
    let mut hits = [BodyId(0); OVERLAP_CAPACITY];
    let count = world.overlap_sphere(center, radius, BodyCategory::Prize, &mut hits);

    let mut best: Option<(BodyId, f32)> = None;
    for &body in &hits[..count] {
        if body == exclude {
            continue;
        }
        if world.mass(body).is_none_or(|m| m > max_mass) {
            continue;
        }
        let Some(point) = world.closest_point(body, center) else {
            continue;
        };
        let dist = point.distance_squared(center);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((body, dist));
        }
    }
    best.map(|(body, _)| body)
}

/// Close-range grab used by the simple hook: pick the nearest eligible body
/// and attach it
pub fn try_attach_nearest(
    grip: &mut dyn Grip,
    world: &mut dyn PhysicsWorld,
    hook: BodyId,
    radius: f32,
    max_mass: f32,
) -> Option<BodyId> {
    if grip.is_open() || grip.is_holding() {
        return None;
    }
    let center = world.position(hook)?;
    let body = nearest_eligible(world, center, radius, max_mass, hook)?;
    grip.attach(world, hook, body).then_some(body)
}

/// Parent + freeze
#[derive(Debug, Clone)]
pub struct HardGrip {
    open: bool,
    held: Option<BodyId>,
}

impl Default for HardGrip {
    fn default() -> Self {
        Self::new()
    }
}

impl HardGrip {
    pub fn new() -> Self {
        Self {
            open: true,
            held: None,
        }
    }
}

impl Grip for HardGrip {
    fn attach(&mut self, world: &mut dyn PhysicsWorld, hook: BodyId, body: BodyId) -> bool {
        if self.open || self.held.is_some() || body == hook {
            return false;
        }
        world.set_velocity(body, Vec3::ZERO);
        world.set_frozen(body, true);
        world.set_parent(body, Some(hook));
        self.held = Some(body);
        true
    }

    fn release(&mut self, world: &mut dyn PhysicsWorld) -> Option<BodyId> {
        let body = self.held.take()?;
        world.set_parent(body, None);
        world.set_frozen(body, false);
        Some(body)
    }

    fn held(&self) -> Option<BodyId> {
        self.held
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_open(&mut self, world: &mut dyn PhysicsWorld, open: bool) {
        self.open = open;
        if open {
            self.release(world);
        }
    }

    fn sync(&mut self, world: &dyn PhysicsWorld) -> Option<BodyId> {
        // A despawned body can't be held
        let body = self.held?;
        if world.position(body).is_none() {
            self.held = None;
            return Some(body);
        }
        None
    }
}

/// Breakable physical joint
#[derive(Debug, Clone)]
pub struct JointGrip {
    pub limits: JointLimits,
    open: bool,
    held: Option<(BodyId, JointId)>,
}

impl JointGrip {
    pub fn new(limits: JointLimits) -> Self {
        Self {
            limits,
            open: true,
            held: None,
        }
    }
}

impl Grip for JointGrip {
    fn attach(&mut self, world: &mut dyn PhysicsWorld, hook: BodyId, body: BodyId) -> bool {
        if self.open || self.held.is_some() || body == hook {
            return false;
        }
        world.set_velocity(body, Vec3::ZERO);
        let joint = world.attach_joint(body, hook, self.limits);
        if !world.joint_intact(joint) {
            return false;
        }
        self.held = Some((body, joint));
        true
    }

    fn release(&mut self, world: &mut dyn PhysicsWorld) -> Option<BodyId> {
        let (body, joint) = self.held.take()?;
        world.detach_joint(joint);
        Some(body)
    }

    fn held(&self) -> Option<BodyId> {
        self.held.map(|(body, _)| body)
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_open(&mut self, world: &mut dyn PhysicsWorld, open: bool) {
        self.open = open;
        if open {
            self.release(world);
        }
    }

    fn sync(&mut self, world: &dyn PhysicsWorld) -> Option<BodyId> {
        let (body, joint) = self.held?;
        if world.joint_intact(joint) {
            return None;
        }
        log::info!("Grip joint on {:?} snapped", body);
        self.held = None;
        Some(body)
    }
}
