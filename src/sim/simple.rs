//! Free-moving hook variant
//!
//! The hook follows a head position in XZ every step. A single drop command
//! runs the whole descend, settle, close and ascend sequence; the head is
//! locked until the hook is back home.

use glam::{Vec2, Vec3};

use super::grip::{self, Grip};
use crate::config::SimpleClawConfig;
use crate::error::ConfigError;
use crate::physics::{BodyCategory, BodyDesc, BodyId, PhysicsWorld};

const HEIGHT_EPS: f32 = 0.0005;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimplePhase {
    Idle,
    Descending,
    Settling { remaining: f32 },
    Ascending,
}

/// Notable outcomes of a [`SimpleClaw::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleEvent {
    Grabbed(BodyId),
    Missed,
    /// The grip let go on its own
    Lost(BodyId),
    Home,
}

#[derive(Debug)]
pub struct SimpleClaw {
    config: SimpleClawConfig,
    /// Head position and hook home height
    home: Vec3,
    head: Vec2,
    hook: BodyId,
    hook_y: f32,
    phase: SimplePhase,
    move_input: Vec2,
    grip: Box<dyn Grip>,
}

impl SimpleClaw {
    /// Spawn the kinematic hook at `home`
    pub fn new(
        world: &mut dyn PhysicsWorld,
        config: SimpleClawConfig,
        home: Vec3,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let hook = world.spawn(BodyDesc {
            category: BodyCategory::Hook,
            position: home,
            yaw: 0.0,
            half_extents: Vec3::splat(0.05),
            mass: 5.0,
            kinematic: true,
        });
        Ok(Self {
            grip: grip::from_mode(config.grip),
            config,
            home,
            head: Vec2::new(home.x, home.z),
            hook,
            hook_y: home.y,
            phase: SimplePhase::Idle,
            move_input: Vec2::ZERO,
        })
    }

    pub fn phase(&self) -> SimplePhase {
        self.phase
    }

    pub fn hook(&self) -> BodyId {
        self.hook
    }

    /// Head XZ
    pub fn head(&self) -> Vec2 {
        self.head
    }

    pub fn hook_height(&self) -> f32 {
        self.hook_y
    }

    pub fn grip(&self) -> &dyn Grip {
        self.grip.as_ref()
    }

    pub fn hook_at_home(&self) -> bool {
        (self.hook_y - self.home.y).abs() <= HEIGHT_EPS
    }

    /// Mid-sequence or hook away from home
    pub fn is_locked(&self) -> bool {
        self.phase != SimplePhase::Idle || !self.hook_at_home()
    }

    /// Raw stick direction; any non-zero input moves at full speed
    pub fn set_move(&mut self, input: Vec2) {
        self.move_input = input;
    }

    /// Start the drop sequence; ignored while locked
    pub fn drop(&mut self, world: &mut dyn PhysicsWorld) -> bool {
        if self.is_locked() {
            return false;
        }
        self.grip.set_open(world, true);
        self.phase = SimplePhase::Descending;
        true
    }

    /// Let go of whatever is held
    pub fn release(&mut self, world: &mut dyn PhysicsWorld) -> Option<BodyId> {
        self.grip.release(world)
    }

    pub fn step(&mut self, world: &mut dyn PhysicsWorld, dt: f32) -> Option<SimpleEvent> {
        let mut event = self.grip.sync(world).map(SimpleEvent::Lost);
        let c = self.config;
        let bottom = self.home.y - c.drop_distance;

        match self.phase {
            SimplePhase::Idle => {
                if !self.is_locked() {
                    self.move_head(dt);
                }
            }
            SimplePhase::Descending => {
                self.hook_y = (self.hook_y - c.descend_speed * dt).max(bottom);
                if self.hook_y <= bottom + HEIGHT_EPS {
                    self.phase = SimplePhase::Settling {
                        remaining: c.settle_pause,
                    };
                }
            }
            SimplePhase::Settling { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = SimplePhase::Settling { remaining };
                } else {
                    self.grip.set_open(world, false);
                    let grabbed = grip::try_attach_nearest(
                        self.grip.as_mut(),
                        world,
                        self.hook,
                        c.grab_radius,
                        c.max_carry_mass,
                    );
                    event = Some(grabbed.map_or(SimpleEvent::Missed, SimpleEvent::Grabbed));
                    self.phase = SimplePhase::Ascending;
                }
            }
            SimplePhase::Ascending => {
                self.hook_y = (self.hook_y + c.ascend_speed * dt).min(self.home.y);
                if self.hook_y >= self.home.y - HEIGHT_EPS {
                    self.hook_y = self.home.y;
                    self.phase = SimplePhase::Idle;
                    event = event.or(Some(SimpleEvent::Home));
                }
            }
        }

        world.set_position(self.hook, Vec3::new(self.head.x, self.hook_y, self.head.y));
        event
    }

    /// Despawn the hook, dropping anything held
    pub fn remove(mut self, world: &mut dyn PhysicsWorld) {
        self.grip.release(world);
        world.despawn(self.hook);
    }

    fn move_head(&mut self, dt: f32) {
        let dir = self.move_input.normalize_or_zero();
        self.head += dir * self.config.move_speed * dt;
        if self.config.clamp_inside_bounds {
            let center = Vec2::new(self.home.x, self.home.z);
            let bounds = self.config.xz_bounds;
            self.head = self.head.clamp(center - bounds, center + bounds);
        }
    }
}
