//! Claw Arcade - claw machine runtime core
//!
//! Core modules:
//! - `sim`: Deterministic play cycle (grabber, grip, pit, state machine)
//! - `physics`: Physics contract plus a small reference world
//! - `economy` / `inventory`: Session ledgers shared by all machines
//! - `loot`: Weighted prize tables
//! - `config`: Data-driven machine tuning and content catalog
//! - `arcade`: Fixed-timestep driver tying it together

pub mod arcade;
pub mod config;
pub mod economy;
pub mod error;
pub mod inventory;
pub mod loot;
pub mod physics;
pub mod sim;

pub use arcade::{Arcade, ArcadeEvent, Session};
pub use config::{Catalog, GripMode, MachineConfig, RewardPolicy, SimpleClawConfig};
pub use economy::{BalanceChange, EconomyLedger};
pub use error::{ConfigError, LedgerError};
pub use inventory::{CollectionDef, CollectionProgress, InventoryLedger};
pub use loot::{LootEntry, LootTable, PrizeDefinition};
pub use physics::{PhysicsWorld, SimpleWorld};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
