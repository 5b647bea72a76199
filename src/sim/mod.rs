//! Deterministic claw machine simulation
//!
//! All gameplay logic lives here. Everything runs on the fixed timestep with
//! seeded RNG and a stable body scan order, so the same inputs and seed give
//! the same session. No rendering or platform dependencies.

pub mod delivery;
pub mod grabber;
pub mod grip;
pub mod machine;
pub mod pit;
pub mod simple;
pub mod state;

pub use delivery::DeliveryZone;
pub use grabber::{Grabber, GrabberTuning, OVERLAP_CAPACITY};
pub use grip::{Grip, HardGrip, JointGrip, nearest_eligible, try_attach_nearest};
pub use machine::{ClawMachine, TickContext};
pub use pit::{FillReport, Pit, PrizeInstance};
pub use simple::{SimpleClaw, SimpleEvent, SimplePhase};
pub use state::{MachineEvent, PlayState, RngState, TickInput};
