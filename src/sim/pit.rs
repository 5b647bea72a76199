//! Prize pit: the live prize bodies of one machine

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;

use crate::loot::{LootTable, PrizeDefinition};
use crate::physics::{BodyCategory, BodyDesc, BodyId, PhysicsWorld};

/// A spawned prize body tagged with its definition
#[derive(Debug, Clone)]
pub struct PrizeInstance {
    pub body: BodyId,
    pub definition: Arc<PrizeDefinition>,
}

/// Outcome of a fill pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    pub spawned: u32,
    /// Rolls that gave no prize or a prize without a body
    pub skipped: u32,
}

/// Bounded volume holding spawnable prize instances
#[derive(Debug, Clone)]
pub struct Pit {
    /// Centre of the pit floor
    pub center: Vec3,
    pub size: Vec3,
    /// In spawn order
    instances: Vec<PrizeInstance>,
}

impl Pit {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            size,
            instances: Vec::new(),
        }
    }

    /// Roll `count` prizes and drop them in at random spots
    ///
    /// Each prize spawns half the pit height above the centre and falls into
    /// place. Empty rolls and body-less prizes are skipped, not retried.
    pub fn fill<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        world: &mut dyn PhysicsWorld,
        table: &LootTable,
        count: u32,
    ) -> FillReport {
        let mut report = FillReport::default();
        for _ in 0..count {
            let Some(definition) = table.roll(rng).filter(|d| d.body.is_some()).cloned() else {
                report.skipped += 1;
                continue;
            };
            let position = Vec3::new(
                self.center.x + (rng.random::<f32>() - 0.5) * self.size.x,
                self.center.y + self.size.y * 0.5,
                self.center.z + (rng.random::<f32>() - 0.5) * self.size.z,
            );
            let yaw = rng.random::<f32>() * std::f32::consts::TAU;
            if self.insert(world, definition, position, yaw).is_some() {
                report.spawned += 1;
            }
        }
        log::debug!(
            "Pit fill from {}: {} spawned, {} skipped",
            table.id,
            report.spawned,
            report.skipped
        );
        report
    }

    /// Spawn one prize at an exact position
    ///
    /// Returns `None` if the definition has no body template.
    pub fn insert(
        &mut self,
        world: &mut dyn PhysicsWorld,
        definition: Arc<PrizeDefinition>,
        position: Vec3,
        yaw: f32,
    ) -> Option<BodyId> {
        let template = definition.body?;
        let body = world.spawn(BodyDesc {
            category: BodyCategory::Prize,
            position,
            yaw,
            half_extents: template.half_extents,
            mass: template.mass,
            kinematic: false,
        });
        self.instances.push(PrizeInstance { body, definition });
        Some(body)
    }

    /// Stop tracking a prize (the caller decides whether to despawn it)
    pub fn take(&mut self, body: BodyId) -> Option<PrizeInstance> {
        let index = self.instances.iter().position(|p| p.body == body)?;
        Some(self.instances.remove(index))
    }

    pub fn definition(&self, body: BodyId) -> Option<&Arc<PrizeDefinition>> {
        self.instances
            .iter()
            .find(|p| p.body == body)
            .map(|p| &p.definition)
    }

    pub fn contains(&self, body: BodyId) -> bool {
        self.instances.iter().any(|p| p.body == body)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrizeInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Despawn every prize
    pub fn clear(&mut self, world: &mut dyn PhysicsWorld) {
        for prize in self.instances.drain(..) {
            world.despawn(prize.body);
        }
    }
}
