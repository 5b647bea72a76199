//! Arcade driver: a physics world, one shared session, and its machines
//!
//! Frame time goes into an accumulator that is drained in fixed `SIM_DT`
//! steps. Each step ticks every machine in order against the shared ledgers,
//! then steps the world, then clears the one-shot inputs.

use crate::config::{Catalog, SessionSettings};
use crate::consts::{MAX_SUBSTEPS, MAX_FRAME_DT, SIM_DT};
use crate::economy::EconomyLedger;
use crate::error::ConfigError;
use crate::inventory::{CollectionDef, CollectionProgress, InventoryLedger};
use crate::physics::PhysicsWorld;
use crate::sim::{ClawMachine, MachineEvent, RngState, TickContext, TickInput};

/// Player-wide state shared by every machine
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub economy: EconomyLedger,
    pub inventory: InventoryLedger,
}

impl Session {
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            economy: EconomyLedger::new(settings.starting_credits, settings.starting_tickets),
            inventory: InventoryLedger::new(),
        }
    }
}

/// A machine notification tagged with the machine index
#[derive(Debug, Clone, PartialEq)]
pub struct ArcadeEvent {
    pub machine: usize,
    pub event: MachineEvent,
}

pub struct Arcade<W: PhysicsWorld> {
    world: W,
    session: Session,
    machines: Vec<ClawMachine>,
    inputs: Vec<TickInput>,
    collections: Vec<CollectionDef>,
    accumulator: f32,
    ticks: u64,
    events: Vec<ArcadeEvent>,
}

impl<W: PhysicsWorld> Arcade<W> {
    /// Build every catalog machine in order, each with its own RNG stream
    pub fn from_catalog(mut world: W, catalog: &Catalog) -> Result<Self, ConfigError> {
        catalog.validate()?;
        let seed = catalog.session.seed;

        let mut machines = Vec::with_capacity(catalog.machines.len());
        for (index, config) in catalog.machines.iter().enumerate() {
            let rng = RngState::with_stream(seed, index as u64);
            machines.push(ClawMachine::from_config(&mut world, catalog, config, rng)?);
        }
        log::info!(
            "Arcade initialized with seed {} and {} machines",
            seed,
            machines.len()
        );

        Ok(Self {
            world,
            session: Session::new(&catalog.session),
            inputs: vec![TickInput::default(); machines.len()],
            machines,
            collections: catalog.collections.clone(),
            accumulator: 0.0,
            ticks: 0,
            events: Vec::new(),
        })
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn machines(&self) -> &[ClawMachine] {
        &self.machines
    }

    pub fn machine(&self, index: usize) -> Option<&ClawMachine> {
        self.machines.get(index)
    }

    pub fn machine_index(&self, machine_id: &str) -> Option<usize> {
        self.machines
            .iter()
            .position(|m| m.config().machine_id == machine_id)
    }

    /// Pending input for a machine; one-shot triggers clear after the next step
    pub fn input_mut(&mut self, machine: usize) -> Option<&mut TickInput> {
        self.inputs.get_mut(machine)
    }

    /// Fixed steps run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time in seconds
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 * f64::from(SIM_DT)
    }

    pub fn collection_progress(&self) -> Vec<(&CollectionDef, CollectionProgress)> {
        self.collections
            .iter()
            .map(|c| (c, self.session.inventory.progress(c)))
            .collect()
    }

    /// Run the fixed steps owed for `frame_dt`; returns how many ran
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.4}s of simulation backlog", self.accumulator);
            self.accumulator %= SIM_DT;
        }
        substeps
    }

    /// One fixed step
    pub fn step(&mut self) {
        for (index, machine) in self.machines.iter_mut().enumerate() {
            let mut ctx = TickContext {
                world: &mut self.world,
                economy: &mut self.session.economy,
                inventory: &mut self.session.inventory,
            };
            machine.tick(&mut ctx, &self.inputs[index], SIM_DT);
            self.events
                .extend(machine.drain_events().into_iter().map(|event| ArcadeEvent {
                    machine: index,
                    event,
                }));
        }

        self.world.step(SIM_DT);

        // Clear one-shot inputs after processing
        for input in &mut self.inputs {
            input.clear_triggers();
        }
        self.ticks += 1;
    }

    /// Take queued notifications from all machines (oldest first)
    pub fn drain_events(&mut self) -> Vec<ArcadeEvent> {
        std::mem::take(&mut self.events)
    }
}
