//! Prize chute: pays out tickets for prizes that land in it

use std::sync::Arc;

use glam::Vec3;

use super::pit::Pit;
use crate::economy::EconomyLedger;
use crate::loot::PrizeDefinition;
use crate::physics::PhysicsWorld;

/// Axis-aligned collection volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryZone {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl DeliveryZone {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let d = (point - self.center).abs();
        d.cmple(self.half_extents).all()
    }

    /// Remove every pit prize whose centre is inside the zone
    ///
    /// Each one is despawned and its ticket reward added to the ledger.
    /// Returns the collected definitions in pit order.
    pub fn collect(
        &self,
        world: &mut dyn PhysicsWorld,
        pit: &mut Pit,
        economy: &mut EconomyLedger,
    ) -> Vec<Arc<PrizeDefinition>> {
        let inside: Vec<_> = pit
            .iter()
            .filter(|p| world.position(p.body).is_some_and(|pos| self.contains(pos)))
            .map(|p| p.body)
            .collect();

        let mut collected = Vec::with_capacity(inside.len());
        for body in inside {
            let Some(prize) = pit.take(body) else {
                continue;
            };
            world.despawn(body);
            let tickets = prize.definition.ticket_reward;
            if tickets > 0 {
                if let Err(err) = economy.add_tickets(i64::from(tickets)) {
                    log::error!("Chute payout for {} failed: {err}", prize.definition.id);
                }
            }
            log::info!("Chute collected {} (+{}T)", prize.definition.id, tickets);
            collected.push(prize.definition);
        }
        collected
    }
}
