//! Minimal reference physics world
//!
//! Boxes fall under gravity onto a floor plane and stop dead. There is no
//! body-body collision response; that is enough to settle a pit of prizes,
//! carry them on a hook and drop them again. Bounding boxes are axis aligned
//! (yaw is stored for the renderer but ignored by queries).

use glam::Vec3;

use super::{BodyCategory, BodyDesc, BodyId, JointId, JointLimits, PhysicsWorld};

/// Default gravity (units/s²)
pub const GRAVITY: f32 = 9.81;

#[derive(Debug, Clone)]
struct Body {
    id: BodyId,
    category: BodyCategory,
    position: Vec3,
    velocity: Vec3,
    yaw: f32,
    half_extents: Vec3,
    mass: f32,
    base_kinematic: bool,
    kinematic: bool,
    gravity: bool,
    /// Parent body and offset from it
    parent: Option<(BodyId, Vec3)>,
}

impl Body {
    fn min(&self) -> Vec3 {
        self.position - self.half_extents
    }

    fn max(&self) -> Vec3 {
        self.position + self.half_extents
    }

    fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min(), self.max())
    }
}

#[derive(Debug, Clone)]
struct Joint {
    id: JointId,
    body: BodyId,
    anchor: BodyId,
    offset: Vec3,
    limits: JointLimits,
}

/// Reference implementation of [`PhysicsWorld`]
#[derive(Debug, Clone)]
pub struct SimpleWorld {
    /// Sorted by id for deterministic scans
    bodies: Vec<Body>,
    joints: Vec<Joint>,
    pub gravity: f32,
    pub floor_y: f32,
    next_body: u32,
    next_joint: u32,
}

impl Default for SimpleWorld {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl SimpleWorld {
    pub fn new(floor_y: f32) -> Self {
        Self {
            bodies: Vec::new(),
            joints: Vec::new(),
            gravity: GRAVITY,
            floor_y,
            next_body: 1,
            next_joint: 1,
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn contains(&self, body: BodyId) -> bool {
        self.index(body).is_some()
    }

    pub fn velocity(&self, body: BodyId) -> Option<Vec3> {
        self.get(body).map(|b| b.velocity)
    }

    pub fn yaw(&self, body: BodyId) -> Option<f32> {
        self.get(body).map(|b| b.yaw)
    }

    pub fn parent(&self, body: BodyId) -> Option<BodyId> {
        self.get(body).and_then(|b| b.parent.map(|(p, _)| p))
    }

    pub fn is_frozen(&self, body: BodyId) -> bool {
        self.get(body).is_some_and(|b| b.kinematic && !b.gravity)
    }

    fn index(&self, body: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&body, |b| b.id).ok()
    }

    fn get(&self, body: BodyId) -> Option<&Body> {
        self.index(body).map(|i| &self.bodies[i])
    }

    fn get_mut(&mut self, body: BodyId) -> Option<&mut Body> {
        let index = self.index(body)?;
        Some(&mut self.bodies[index])
    }

    fn is_jointed(&self, body: BodyId) -> bool {
        self.joints.iter().any(|j| j.body == body)
    }

    fn integrate(&mut self, dt: f32) {
        let jointed: Vec<BodyId> = self.joints.iter().map(|j| j.body).collect();
        for body in &mut self.bodies {
            if body.parent.is_some() || jointed.contains(&body.id) {
                continue;
            }
            if body.gravity && !body.kinematic {
                body.velocity.y -= self.gravity * dt;
            }
            body.position += body.velocity * dt;

            if !body.kinematic {
                let floor = self.floor_y + body.half_extents.y;
                if body.position.y < floor {
                    body.position.y = floor;
                    body.velocity = Vec3::ZERO;
                }
            }
        }
    }

    fn follow_parents(&mut self) {
        for i in 0..self.bodies.len() {
            let Some((parent, offset)) = self.bodies[i].parent else {
                continue;
            };
            match self.get(parent).map(|p| p.position) {
                Some(anchor) => self.bodies[i].position = anchor + offset,
                None => self.bodies[i].parent = None,
            }
        }
    }

    fn solve_joints(&mut self, dt: f32) {
        let gravity = Vec3::new(0.0, self.gravity, 0.0);
        let mut broken = Vec::new();
        let mut carried = Vec::new();

        for joint in &self.joints {
            let (Some(anchor), Some(body)) = (self.get(joint.anchor), self.get(joint.body)) else {
                broken.push(joint.id);
                continue;
            };
            let target = anchor.position + joint.offset;
            let required_vel = (target - body.position) / dt;
            let accel = (required_vel - body.velocity) / dt;
            let force = body.mass * (accel + gravity).length();
            let torque = force * joint.offset.length();

            if force > joint.limits.break_force || torque > joint.limits.break_torque {
                log::debug!(
                    "Joint {:?} broke (force {:.1}, torque {:.1})",
                    joint.id,
                    force,
                    torque
                );
                broken.push(joint.id);
                continue;
            }

            carried.push((joint.body, target, required_vel));
        }

        self.joints.retain(|j| !broken.contains(&j.id));
        for (id, position, velocity) in carried {
            if let Some(body) = self.get_mut(id) {
                body.position = position;
                body.velocity = velocity;
            }
        }
    }
}

impl PhysicsWorld for SimpleWorld {
    fn spawn(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.bodies.push(Body {
            id,
            category: desc.category,
            position: desc.position,
            velocity: Vec3::ZERO,
            yaw: desc.yaw,
            half_extents: desc.half_extents,
            mass: desc.mass,
            base_kinematic: desc.kinematic,
            kinematic: desc.kinematic,
            gravity: !desc.kinematic,
            parent: None,
        });
        id
    }

    fn despawn(&mut self, body: BodyId) {
        let Some(index) = self.index(body) else {
            return;
        };
        self.bodies.remove(index);
        self.joints.retain(|j| j.body != body && j.anchor != body);
        for child in &mut self.bodies {
            if child.parent.is_some_and(|(p, _)| p == body) {
                child.parent = None;
            }
        }
    }

    fn position(&self, body: BodyId) -> Option<Vec3> {
        self.get(body).map(|b| b.position)
    }

    fn set_position(&mut self, body: BodyId, position: Vec3) {
        if let Some(b) = self.get_mut(body) {
            b.position = position;
        }
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec3) {
        if let Some(b) = self.get_mut(body) {
            b.velocity = velocity;
        }
    }

    fn mass(&self, body: BodyId) -> Option<f32> {
        self.get(body).map(|b| b.mass)
    }

    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        category: BodyCategory,
        out: &mut [BodyId],
    ) -> usize {
        let mut count = 0;
        for body in &self.bodies {
            if count == out.len() {
                break;
            }
            if body.category != category {
                continue;
            }
            if body.closest_point(center).distance_squared(center) <= radius * radius {
                out[count] = body.id;
                count += 1;
            }
        }
        count
    }

    fn closest_point(&self, body: BodyId, point: Vec3) -> Option<Vec3> {
        self.get(body).map(|b| b.closest_point(point))
    }

    fn set_parent(&mut self, body: BodyId, parent: Option<BodyId>) {
        let link = match parent {
            Some(parent) if parent != body => {
                let (Some(anchor), Some(pos)) = (self.position(parent), self.position(body)) else {
                    return;
                };
                Some((parent, pos - anchor))
            }
            Some(_) => return,
            None => None,
        };
        if let Some(b) = self.get_mut(body) {
            b.parent = link;
        }
    }

    fn set_frozen(&mut self, body: BodyId, frozen: bool) {
        if let Some(b) = self.get_mut(body) {
            if frozen {
                b.velocity = Vec3::ZERO;
                b.gravity = false;
                b.kinematic = true;
            } else {
                b.kinematic = b.base_kinematic;
                b.gravity = !b.base_kinematic;
            }
        }
    }

    fn attach_joint(&mut self, body: BodyId, anchor: BodyId, limits: JointLimits) -> JointId {
        let id = JointId(self.next_joint);
        self.next_joint += 1;

        if let (Some(a), Some(b)) = (self.position(anchor), self.position(body)) {
            if !self.is_jointed(body) && body != anchor {
                self.set_velocity(body, Vec3::ZERO);
                self.joints.push(Joint {
                    id,
                    body,
                    anchor,
                    offset: b - a,
                    limits,
                });
            }
        }
        id
    }

    fn detach_joint(&mut self, joint: JointId) {
        self.joints.retain(|j| j.id != joint);
    }

    fn joint_intact(&self, joint: JointId) -> bool {
        self.joints.iter().any(|j| j.id == joint)
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integrate(dt);
        self.follow_parents();
        self.solve_joints(dt);
    }
}
