//! Claw machine play cycle
//!
//! Positioning → Dropping → Clamping → Lifting → Resolving → Positioning.
//! Everything advances from [`ClawMachine::tick`] on the fixed timestep:
//! inputs first (each transition runs its entry action immediately), then
//! timers, then the grabber motion. Ledgers and the physics world are passed
//! in through [`TickContext`] so several machines can share them.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::grabber::{Grabber, GrabberTuning, OVERLAP_CAPACITY};
use super::grip::{self, Grip};
use super::pit::Pit;
use super::state::{MachineEvent, PlayState, RngState, TickInput};
use crate::config::{Catalog, MachineConfig};
use crate::economy::EconomyLedger;
use crate::error::{ConfigError, LedgerError};
use crate::inventory::InventoryLedger;
use crate::loot::LootTable;
use crate::physics::{BodyId, PhysicsWorld};

/// Random spread added to the clamp strength per candidate
const CLAMP_JITTER: f32 = 0.1;

/// Shared collaborators for one machine tick
pub struct TickContext<'a> {
    pub world: &'a mut dyn PhysicsWorld,
    pub economy: &'a mut EconomyLedger,
    pub inventory: &'a mut InventoryLedger,
}

/// One claw machine: grabber, pit, and play-cycle state
#[derive(Debug)]
pub struct ClawMachine {
    config: MachineConfig,
    loot: LootTable,
    state: PlayState,
    grabber: Grabber,
    grip: Box<dyn Grip>,
    pit: Pit,
    rng: Pcg32,
    /// Dead-zoned stick value
    player_move: Vec2,
    drift: Vec2,
    drift_timer: f32,
    resolve_timer: f32,
    plays: u64,
    catches: u64,
    events: Vec<MachineEvent>,
}

impl ClawMachine {
    /// Spawn the hook; the pit is filled on the first tick
    pub fn new(
        world: &mut dyn PhysicsWorld,
        config: MachineConfig,
        loot: LootTable,
        rng: RngState,
    ) -> Self {
        let grabber = Grabber::new(world, GrabberTuning::from_config(&config), config.origin);
        let pit = Pit::new(config.origin, config.pit_bounds);
        Self {
            grip: grip::from_mode(config.grip),
            config,
            loot,
            state: PlayState::Idle,
            grabber,
            pit,
            rng: rng.to_rng(),
            player_move: Vec2::ZERO,
            drift: Vec2::ZERO,
            drift_timer: 0.0,
            resolve_timer: 0.0,
            plays: 0,
            catches: 0,
            events: Vec::new(),
        }
    }

    /// Validate `config` and resolve its loot table from the catalog
    pub fn from_config(
        world: &mut dyn PhysicsWorld,
        catalog: &Catalog,
        config: &MachineConfig,
        rng: RngState,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let loot = catalog
            .loot_table(&config.loot_table)
            .map_err(|err| match err {
                ConfigError::MissingLootTable(table) => ConfigError::UnknownLootTable {
                    table,
                    machine: config.machine_id.clone(),
                },
                other => other,
            })?;
        Ok(Self::new(world, config.clone(), loot, rng))
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn grabber(&self) -> &Grabber {
        &self.grabber
    }

    pub fn grip(&self) -> &dyn Grip {
        self.grip.as_ref()
    }

    pub fn pit(&self) -> &Pit {
        &self.pit
    }

    pub fn pit_mut(&mut self) -> &mut Pit {
        &mut self.pit
    }

    /// Plays paid for so far
    pub fn plays(&self) -> u64 {
        self.plays
    }

    /// Prizes paid out so far
    pub fn catches(&self) -> u64 {
        self.catches
    }

    /// Take queued display notifications (oldest first)
    pub fn drain_events(&mut self) -> Vec<MachineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether both play costs can be paid from the ledger
    pub fn can_afford_play(&self, economy: &EconomyLedger) -> bool {
        economy.can_afford(
            u64::from(self.config.credit_cost),
            u64::from(self.config.ticket_cost),
        )
    }

    /// Advance the machine by one fixed step
    pub fn tick(&mut self, ctx: &mut TickContext, input: &TickInput, dt: f32) {
        if self.state == PlayState::Idle {
            self.start(ctx);
        }

        if let Some(axis) = input.move_axis {
            self.handle_move(axis);
        }
        if input.drop {
            self.handle_drop(ctx);
        }
        if input.clamp {
            self.handle_clamp(ctx);
        }
        if input.cancel {
            // Reserved
        }

        match self.state {
            PlayState::Positioning => self.update_drift(dt),
            PlayState::Lifting => {
                self.resolve_timer -= dt;
                if self.resolve_timer <= 0.0 {
                    self.resolve(ctx);
                }
            }
            _ => {}
        }

        self.grabber.step(ctx.world, dt);

        if let Some(lost) = self.grip.sync(ctx.world) {
            let prize_id = self
                .pit
                .definition(lost)
                .map(|d| d.id.clone())
                .unwrap_or_default();
            log::info!("{}: prize {} slipped out of the claw", self.config.machine_id, prize_id);
            self.events.push(MachineEvent::PrizeDropped { prize_id });
            self.hint("Dropped it!");
        }
    }

    /// Despawn the hook and every pit prize
    pub fn remove(mut self, world: &mut dyn PhysicsWorld) {
        self.grip.release(world);
        self.pit.clear(world);
        self.grabber.remove(world);
    }

    fn start(&mut self, ctx: &mut TickContext) {
        self.events
            .push(MachineEvent::MachineName(self.config.display_name.clone()));
        self.events
            .push(MachineEvent::CreditsChanged(ctx.economy.credits()));
        self.events
            .push(MachineEvent::TicketsChanged(ctx.economy.tickets()));

        let report = self.pit.fill(
            &mut self.rng,
            ctx.world,
            &self.loot,
            self.config.pit_initial_items,
        );
        log::info!(
            "{} ready: {} prizes in the pit ({} empty rolls)",
            self.config.machine_id,
            report.spawned,
            report.skipped
        );

        self.set_state(PlayState::Positioning);
        self.hint("Move the claw, then Drop and Clamp at the right moment.");
    }

    fn handle_move(&mut self, axis: Vec2) {
        if self.state != PlayState::Positioning {
            return;
        }
        self.player_move = if axis.length() < self.config.horizontal_dead_zone {
            Vec2::ZERO
        } else {
            axis
        };
        self.apply_move();
    }

    fn update_drift(&mut self, dt: f32) {
        self.drift_timer -= dt;
        if self.drift_timer > 0.0 {
            return;
        }
        self.drift_timer = self.config.drift_interval;
        let half = self.config.drift * 0.5;
        self.drift = Vec2::new(
            signed_unit(&mut self.rng) * half,
            signed_unit(&mut self.rng) * half,
        );
        self.apply_move();
    }

    /// Drift and player input are independent and summed
    fn apply_move(&mut self) {
        self.grabber.set_move(self.drift + self.player_move);
    }

    fn handle_drop(&mut self, ctx: &mut TickContext) {
        if self.state != PlayState::Positioning {
            return;
        }
        if !self.can_afford_play(ctx.economy) {
            log::debug!("{}: play rejected, cannot afford", self.config.machine_id);
            self.hint("Not enough credits/tickets!");
            return;
        }

        let credit_cost = i64::from(self.config.credit_cost);
        let ticket_cost = i64::from(self.config.ticket_cost);
        if credit_cost > 0 {
            ledger_ok(ctx.economy.spend_credits(credit_cost));
        }
        if ticket_cost > 0 {
            ledger_ok(ctx.economy.spend_tickets(ticket_cost));
        }
        self.events
            .push(MachineEvent::CreditsChanged(ctx.economy.credits()));
        self.events
            .push(MachineEvent::TicketsChanged(ctx.economy.tickets()));
        self.plays += 1;

        self.set_state(PlayState::Dropping);
        self.grip.set_open(ctx.world, true);
        self.grabber.set_move(Vec2::ZERO);
        self.grabber.begin_drop();
        self.hint("Dropping... press Clamp at the right time!");
    }

    fn handle_clamp(&mut self, ctx: &mut TickContext) {
        if self.state != PlayState::Dropping {
            return;
        }
        self.set_state(PlayState::Clamping);

        let target = self.roll_capture(ctx.world);
        self.grip.set_open(ctx.world, false);

        let hook = self.grabber.hook();
        let captured = target.filter(|&body| self.grip.attach(ctx.world, hook, body));
        match captured.and_then(|body| self.pit.definition(body)) {
            Some(definition) => {
                let name = definition.display_name.clone();
                log::info!("{}: clamped {}", self.config.machine_id, definition.id);
                self.hint(&format!("Got: {name}! Lifting..."));
            }
            None => {
                log::info!("{}: clamp missed", self.config.machine_id);
                self.hint("Missed! Lifting...");
            }
        }

        self.set_state(PlayState::Lifting);
        self.grabber.begin_lift();
        self.resolve_timer = self.config.resolve_delay;
    }

    /// Single overlap query, first candidate whose roll succeeds wins
    fn roll_capture(&mut self, world: &dyn PhysicsWorld) -> Option<BodyId> {
        let mut hits = [BodyId(0); OVERLAP_CAPACITY];
        let count = self
            .grabber
            .overlap_prizes(world, self.config.capture_radius, &mut hits);
        if count == OVERLAP_CAPACITY {
            log::debug!("{}: capture query hit its capacity", self.config.machine_id);
        }

        for &body in &hits[..count] {
            if !self.pit.contains(body) {
                continue;
            }
            let jitter = self.rng.random::<f32>() * 2.0 * CLAMP_JITTER - CLAMP_JITTER;
            let chance = (self.config.clamp_strength + jitter).clamp(0.0, 1.0);
            if self.rng.random::<f32>() <= chance {
                return Some(body);
            }
        }
        None
    }

    fn resolve(&mut self, ctx: &mut TickContext) {
        self.set_state(PlayState::Resolving);

        let carried = self
            .grip
            .release(ctx.world)
            .and_then(|body| self.pit.take(body));
        if let Some(prize) = carried {
            ctx.world.despawn(prize.body);
            let def = prize.definition;

            let newly_owned = ctx.inventory.add(&def.id);
            let (credits, tickets) = if self.config.reward_policy.pays(newly_owned) {
                (def.credit_reward, def.ticket_reward)
            } else {
                (0, 0)
            };
            if credits > 0 {
                ledger_ok(ctx.economy.add_credits(i64::from(credits)));
            }
            if tickets > 0 {
                ledger_ok(ctx.economy.add_tickets(i64::from(tickets)));
            }
            self.catches += 1;
            log::info!(
                "{}: collected {} (+{}C, +{}T, new: {})",
                self.config.machine_id,
                def.id,
                credits,
                tickets,
                newly_owned
            );

            self.events
                .push(MachineEvent::CreditsChanged(ctx.economy.credits()));
            self.events
                .push(MachineEvent::TicketsChanged(ctx.economy.tickets()));
            self.events.push(MachineEvent::PrizeCollected {
                prize_id: def.id.clone(),
                newly_owned,
                credits,
                tickets,
            });
            self.hint(&format!(
                "Collected {}! (+{}C, +{}T)",
                def.display_name, credits, tickets
            ));
        }

        if self.config.refill_after_play {
            self.pit.fill(&mut self.rng, ctx.world, &self.loot, 1);
        }

        self.set_state(PlayState::Positioning);
    }

    fn set_state(&mut self, state: PlayState) {
        log::debug!(
            "{}: {} -> {}",
            self.config.machine_id,
            self.state.as_str(),
            state.as_str()
        );
        self.state = state;
        self.events.push(MachineEvent::StateChanged(state));

        if state == PlayState::Positioning {
            self.player_move = Vec2::ZERO;
            self.drift = Vec2::ZERO;
            self.drift_timer = 0.0;
        }
    }

    fn hint(&mut self, text: &str) {
        self.events.push(MachineEvent::Hint(text.to_string()));
    }
}

/// Uniform value in [-1, 1)
fn signed_unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * 2.0 - 1.0
}

fn ledger_ok<T>(result: Result<T, LedgerError>) {
    if let Err(err) = result {
        log::error!("Ledger rejected update: {err}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec3;

    use super::*;
    use crate::consts::SIM_DT;
    use crate::config::{GripMode, RewardPolicy};
    use crate::loot::{BodyTemplate, LootEntry, PrizeDefinition};
    use crate::physics::SimpleWorld;

    struct Rig {
        world: SimpleWorld,
        economy: EconomyLedger,
        inventory: InventoryLedger,
        machine: ClawMachine,
    }

    impl Rig {
        fn new(config: MachineConfig, loot: LootTable, credits: i64, tickets: i64) -> Self {
            let mut world = SimpleWorld::new(0.0);
            let machine = ClawMachine::new(&mut world, config, loot, RngState::new(1337));
            Self {
                world,
                economy: EconomyLedger::new(credits, tickets),
                inventory: InventoryLedger::new(),
                machine,
            }
        }

        fn tick(&mut self, input: TickInput) {
            let mut ctx = TickContext {
                world: &mut self.world,
                economy: &mut self.economy,
                inventory: &mut self.inventory,
            };
            self.machine.tick(&mut ctx, &input, SIM_DT);
            self.world.step(SIM_DT);
        }

        fn run(&mut self, seconds: f32) {
            let ticks = (seconds / SIM_DT).ceil() as u32;
            for _ in 0..ticks {
                self.tick(TickInput::default());
            }
        }

        fn drop_claw(&mut self) {
            self.tick(TickInput {
                drop: true,
                ..Default::default()
            });
        }

        fn clamp_claw(&mut self) {
            self.tick(TickInput {
                clamp: true,
                ..Default::default()
            });
        }

        /// Drop, wait for the hook to bottom out, clamp, wait for the payout
        fn play(&mut self) {
            self.drop_claw();
            self.run(1.5);
            self.clamp_claw();
            self.run(1.1);
        }

        fn stack_prizes(&mut self, prize: &Arc<PrizeDefinition>, count: usize) {
            for _ in 0..count {
                self.machine.pit_mut().insert(
                    &mut self.world,
                    Arc::clone(prize),
                    Vec3::new(0.0, 0.15, 0.0),
                    0.0,
                );
            }
        }
    }

    fn calm_config() -> MachineConfig {
        MachineConfig {
            drift: 0.0,
            refill_after_play: false,
            ..MachineConfig::default()
        }
    }

    fn prize(id: &str, credits: u32, tickets: u32) -> Arc<PrizeDefinition> {
        Arc::new(PrizeDefinition {
            id: id.to_string(),
            display_name: id.to_string(),
            description: String::new(),
            credit_reward: credits,
            ticket_reward: tickets,
            body: Some(BodyTemplate::default()),
        })
    }

    fn collected(events: &[MachineEvent]) -> Vec<&MachineEvent> {
        events
            .iter()
            .filter(|e| matches!(e, MachineEvent::PrizeCollected { .. }))
            .collect()
    }

    #[test]
    fn test_from_config_names_machine_in_errors() {
        let mut world = SimpleWorld::new(0.0);
        let catalog = Catalog::demo();
        let config = MachineConfig {
            machine_id: "orphan".to_string(),
            loot_table: "missing".to_string(),
            ..MachineConfig::default()
        };
        let err = ClawMachine::from_config(&mut world, &catalog, &config, RngState::new(1))
            .unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::UnknownLootTable { table, machine } if table == "missing" && machine == "orphan"
        ));
        assert_eq!(
            err.to_string(),
            "unknown loot table `missing` referenced by machine `orphan`"
        );

        let config = MachineConfig {
            display_name: "Second".to_string(),
            credit_cost: 3,
            ..MachineConfig::default()
        };
        let machine =
            ClawMachine::from_config(&mut world, &catalog, &config, RngState::new(1)).unwrap();
        assert_eq!(machine.config().display_name, "Second");
        assert_eq!(machine.config().credit_cost, 3);
    }

    #[test]
    fn test_first_tick_sets_up_machine() {
        let loot = LootTable::new(
            "t",
            vec![LootEntry {
                prize: prize("duck", 0, 1),
                weight: 1.0,
            }],
        );
        let mut rig = Rig::new(MachineConfig::default(), loot, 3, 4);
        assert_eq!(rig.machine.state(), PlayState::Idle);

        rig.tick(TickInput::default());
        assert_eq!(rig.machine.state(), PlayState::Positioning);
        assert_eq!(rig.machine.pit().len(), 15);

        let events = rig.machine.drain_events();
        assert_eq!(
            &events[..3],
            &[
                MachineEvent::MachineName("Free Clumsy Machine".to_string()),
                MachineEvent::CreditsChanged(3),
                MachineEvent::TicketsChanged(4),
            ]
        );
        assert!(events.contains(&MachineEvent::StateChanged(PlayState::Positioning)));
    }

    #[test]
    fn test_unaffordable_drop_changes_nothing() {
        let config = MachineConfig {
            credit_cost: 2,
            ..calm_config()
        };
        let mut rig = Rig::new(config, LootTable::default(), 1, 0);
        rig.tick(TickInput::default());
        rig.machine.drain_events();

        rig.drop_claw();
        assert_eq!(rig.machine.state(), PlayState::Positioning);
        assert_eq!(rig.economy.credits(), 1);
        assert_eq!(rig.machine.plays(), 0);
        assert!(rig
            .machine
            .drain_events()
            .contains(&MachineEvent::Hint("Not enough credits/tickets!".to_string())));
    }

    #[test]
    fn test_ticket_cost_checked_independently() {
        let config = MachineConfig {
            credit_cost: 1,
            ticket_cost: 1,
            ..calm_config()
        };
        let mut rig = Rig::new(config, LootTable::default(), 10, 0);
        rig.tick(TickInput::default());
        rig.drop_claw();
        assert_eq!(rig.machine.state(), PlayState::Positioning);
        assert_eq!(rig.economy.credits(), 10);
    }

    #[test]
    fn test_affordable_drop_charges_exact_cost() {
        let config = MachineConfig {
            credit_cost: 1,
            ticket_cost: 2,
            ..calm_config()
        };
        let mut rig = Rig::new(config, LootTable::default(), 5, 5);
        rig.tick(TickInput::default());
        rig.drop_claw();
        assert_eq!(rig.machine.state(), PlayState::Dropping);
        assert_eq!(rig.economy.credits(), 4);
        assert_eq!(rig.economy.tickets(), 3);
        assert!(rig.machine.grabber().is_dropping());
    }

    #[test]
    fn test_triggers_outside_their_state_are_ignored() {
        let mut rig = Rig::new(calm_config(), LootTable::default(), 0, 0);
        rig.tick(TickInput::default());

        rig.clamp_claw();
        assert_eq!(rig.machine.state(), PlayState::Positioning);

        rig.drop_claw();
        assert_eq!(rig.machine.state(), PlayState::Dropping);
        rig.drop_claw();
        assert_eq!(rig.machine.state(), PlayState::Dropping);
        assert_eq!(rig.machine.plays(), 1);

        rig.tick(TickInput {
            cancel: true,
            ..Default::default()
        });
        assert_eq!(rig.machine.state(), PlayState::Dropping);

        rig.tick(TickInput {
            move_axis: Some(Vec2::X),
            ..Default::default()
        });
        assert_eq!(rig.machine.grabber().move_intent(), Vec2::ZERO);
    }

    #[test]
    fn test_dead_zone_and_drift_sum() {
        let config = MachineConfig {
            drift: 0.0,
            horizontal_dead_zone: 0.2,
            ..MachineConfig::default()
        };
        let mut rig = Rig::new(config, LootTable::default(), 0, 0);
        rig.tick(TickInput {
            move_axis: Some(Vec2::new(0.1, 0.1)),
            ..Default::default()
        });
        assert_eq!(rig.machine.grabber().move_intent(), Vec2::ZERO);

        rig.tick(TickInput {
            move_axis: Some(Vec2::new(0.5, 0.0)),
            ..Default::default()
        });
        assert_eq!(rig.machine.grabber().move_intent(), Vec2::new(0.5, 0.0));

        // Drift resampling keeps the player component
        let config = MachineConfig {
            drift: 1.0,
            horizontal_dead_zone: 0.0,
            ..MachineConfig::default()
        };
        let mut rig = Rig::new(config, LootTable::default(), 0, 0);
        rig.tick(TickInput {
            move_axis: Some(Vec2::new(0.5, 0.0)),
            ..Default::default()
        });
        rig.run(1.0);
        let intent = rig.machine.grabber().move_intent();
        assert!((intent.x - 0.5).abs() <= 0.5);
        assert!(intent.y.abs() <= 0.5);
        assert!(intent.x >= 0.0);
    }

    #[test]
    fn test_empty_clamp_resolves_without_payout() {
        let mut rig = Rig::new(calm_config(), LootTable::default(), 5, 5);
        rig.tick(TickInput::default());
        rig.machine.drain_events();

        rig.drop_claw();
        rig.run(1.5);
        rig.clamp_claw();
        assert_eq!(rig.machine.state(), PlayState::Lifting);
        assert!(!rig.machine.grip().is_holding());

        rig.run(0.9);
        assert_eq!(rig.machine.state(), PlayState::Lifting);
        rig.run(0.2);
        assert_eq!(rig.machine.state(), PlayState::Positioning);

        assert_eq!(rig.economy.credits(), 5);
        assert_eq!(rig.economy.tickets(), 5);
        assert!(rig.inventory.is_empty());
        let events = rig.machine.drain_events();
        assert!(collected(&events).is_empty());
        assert!(events.contains(&MachineEvent::Hint("Missed! Lifting...".to_string())));
    }

    #[test]
    fn test_capture_pays_once_and_removes_prize() {
        let mut rig = Rig::new(
            MachineConfig {
                clamp_strength: 1.0,
                credit_cost: 1,
                ..calm_config()
            },
            LootTable::default(),
            5,
            0,
        );
        let bear = prize("bear", 3, 7);
        rig.tick(TickInput::default());
        rig.stack_prizes(&bear, 8);
        rig.machine.drain_events();

        rig.drop_claw();
        rig.run(1.5);
        rig.clamp_claw();
        let held = rig.machine.grip().held().expect("a stacked prize is caught");
        assert_eq!(rig.world.parent(held), Some(rig.machine.grabber().hook()));

        rig.run(1.1);
        assert_eq!(rig.machine.state(), PlayState::Positioning);
        assert_eq!(rig.economy.credits(), 5 - 1 + 3);
        assert_eq!(rig.economy.tickets(), 7);
        assert!(rig.inventory.has("bear"));
        assert_eq!(rig.machine.pit().len(), 7);
        assert!(!rig.world.contains(held));
        assert_eq!(rig.machine.catches(), 1);

        let events = rig.machine.drain_events();
        assert_eq!(
            collected(&events),
            vec![&MachineEvent::PrizeCollected {
                prize_id: "bear".to_string(),
                newly_owned: true,
                credits: 3,
                tickets: 7,
            }]
        );
    }

    #[test]
    fn test_repeat_catch_reward_policy() {
        for (policy, expected_credits) in [
            (RewardPolicy::EveryCatch, 4),
            (RewardPolicy::FirstCatchOnly, 2),
        ] {
            let mut rig = Rig::new(
                MachineConfig {
                    clamp_strength: 1.0,
                    reward_policy: policy,
                    ..calm_config()
                },
                LootTable::default(),
                0,
                0,
            );
            let bear = prize("bear", 2, 0);
            rig.tick(TickInput::default());
            rig.stack_prizes(&bear, 16);

            rig.play();
            rig.play();
            assert_eq!(rig.machine.catches(), 2, "{policy:?}");
            assert_eq!(rig.economy.credits(), expected_credits, "{policy:?}");
            assert_eq!(rig.inventory.len(), 1);
        }
    }

    #[test]
    fn test_snapped_joint_loses_prize() {
        let mut rig = Rig::new(
            MachineConfig {
                clamp_strength: 1.0,
                grip: GripMode::BreakableJoint {
                    break_force: 1.0,
                    break_torque: 1.0,
                },
                ..calm_config()
            },
            LootTable::default(),
            0,
            0,
        );
        let bear = prize("bear", 5, 5);
        rig.tick(TickInput::default());
        rig.stack_prizes(&bear, 8);
        rig.machine.drain_events();

        rig.drop_claw();
        rig.run(1.5);
        rig.clamp_claw();
        assert!(rig.machine.grip().is_holding());
        rig.run(1.1);

        assert_eq!(rig.machine.state(), PlayState::Positioning);
        assert_eq!(rig.economy.credits(), 0);
        assert!(rig.inventory.is_empty());
        assert_eq!(rig.machine.pit().len(), 8);
        let events = rig.machine.drain_events();
        assert!(events.contains(&MachineEvent::PrizeDropped {
            prize_id: "bear".to_string()
        }));
        assert!(collected(&events).is_empty());
    }

    #[test]
    fn test_refill_after_play() {
        let loot = LootTable::new(
            "t",
            vec![LootEntry {
                prize: prize("duck", 0, 0),
                weight: 1.0,
            }],
        );
        let config = MachineConfig {
            pit_initial_items: 2,
            drift: 0.0,
            clamp_strength: 0.0,
            ..MachineConfig::default()
        };
        let mut rig = Rig::new(config, loot, 0, 0);
        rig.tick(TickInput::default());
        let before = rig.machine.pit().len() + rig.machine.catches() as usize;
        rig.play();
        assert_eq!(
            rig.machine.pit().len() + rig.machine.catches() as usize,
            before + 1
        );
    }

    #[test]
    fn test_clamp_query_runs_once_per_cycle() {
        let mut rig = Rig::new(
            MachineConfig {
                clamp_strength: 1.0,
                ..calm_config()
            },
            LootTable::default(),
            0,
            0,
        );
        rig.tick(TickInput::default());
        rig.drop_claw();
        rig.run(1.5);
        rig.clamp_claw();
        assert_eq!(rig.machine.state(), PlayState::Lifting);

        // A prize appearing under the hook after the clamp is never considered
        let bear = prize("bear", 1, 1);
        rig.stack_prizes(&bear, 4);
        rig.clamp_claw();
        rig.run(1.1);
        assert!(!rig.machine.grip().is_holding());
        assert_eq!(rig.machine.catches(), 0);
    }
}
