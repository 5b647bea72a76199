//! Authored content and machine tuning
//!
//! Everything here is loaded once (JSON via serde), validated, and then read
//! only by the simulation. Defaults match the "free clumsy machine" preset.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::inventory::CollectionDef;
use crate::loot::{BodyTemplate, LootEntry, LootTable, PrizeDefinition};
use crate::physics::JointLimits;

/// How a captured prize is held by the hook
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GripMode {
    /// Parent the prize to the hook and freeze it
    #[default]
    HardAttach,
    /// Hang the prize from a joint that may snap under load
    BreakableJoint { break_force: f32, break_torque: f32 },
}

impl GripMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GripMode::HardAttach => "hard_attach",
            GripMode::BreakableJoint { .. } => "breakable_joint",
        }
    }

    pub fn joint_limits(&self) -> Option<JointLimits> {
        match *self {
            GripMode::HardAttach => None,
            GripMode::BreakableJoint {
                break_force,
                break_torque,
            } => Some(JointLimits {
                break_force,
                break_torque,
            }),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limits) = self.joint_limits() {
            for (field, value) in [
                ("grip.break_force", limits.break_force),
                ("grip.break_torque", limits.break_torque),
            ] {
                if !(value > 0.0) {
                    return Err(ConfigError::OutOfRange { field, value });
                }
            }
        }
        Ok(())
    }
}

/// Whether a repeat catch of an owned prize still pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RewardPolicy {
    /// Currency on every successful catch; inventory only tracks completion
    #[default]
    EveryCatch,
    /// Currency only the first time a prize id enters the inventory
    FirstCatchOnly,
}

impl RewardPolicy {
    pub fn pays(&self, newly_owned: bool) -> bool {
        match self {
            RewardPolicy::EveryCatch => true,
            RewardPolicy::FirstCatchOnly => newly_owned,
        }
    }
}

/// Per-machine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    // === Identity ===
    pub machine_id: String,
    pub display_name: String,

    // === Economy ===
    pub credit_cost: u32,
    pub ticket_cost: u32,
    pub reward_policy: RewardPolicy,

    // === Control fidelity ===
    /// Player input shorter than this is ignored
    pub horizontal_dead_zone: f32,
    /// Drift per axis is uniform in ±drift/2
    pub drift: f32,
    /// Seconds between drift resamples
    pub drift_interval: f32,
    pub swinginess: f32,
    /// Base capture probability per candidate
    pub clamp_strength: f32,

    // === Motion ===
    pub horizontal_speed: f32,
    pub drop_speed: f32,
    pub lift_speed: f32,
    pub max_drop_depth: f32,
    /// Hook tip height above `origin` at rest
    pub rest_height: f32,
    /// Carriage half travel in X/Z around `origin`
    pub travel_bounds: Vec2,
    /// Machine centre at pit floor level
    pub origin: Vec3,

    // === Grab ===
    pub capture_radius: f32,
    /// Seconds spent lifting before the outcome resolves
    pub resolve_delay: f32,
    pub grip: GripMode,

    // === Loot ===
    pub loot_table: String,
    pub pit_initial_items: u32,
    pub pit_bounds: Vec3,
    pub refill_after_play: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            machine_id: "free_machine".to_string(),
            display_name: "Free Clumsy Machine".to_string(),

            credit_cost: 0,
            ticket_cost: 0,
            reward_policy: RewardPolicy::EveryCatch,

            horizontal_dead_zone: 0.15,
            drift: 0.35,
            drift_interval: 0.35,
            swinginess: 0.6,
            clamp_strength: 0.25,

            horizontal_speed: 2.0,
            drop_speed: 1.5,
            lift_speed: 1.2,
            max_drop_depth: 2.0,
            rest_height: 2.2,
            travel_bounds: Vec2::new(2.0, 2.0),
            origin: Vec3::ZERO,

            capture_radius: 0.25,
            resolve_delay: 1.0,
            grip: GripMode::HardAttach,

            loot_table: "starter".to_string(),
            pit_initial_items: 15,
            pit_bounds: Vec3::new(4.0, 2.0, 4.0),
            refill_after_play: true,
        }
    }
}

impl MachineConfig {
    /// Check ranges the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.machine_id.trim().is_empty() {
            return Err(ConfigError::EmptyId { kind: "machine" });
        }

        let unit = [
            ("horizontal_dead_zone", self.horizontal_dead_zone),
            ("drift", self.drift),
            ("swinginess", self.swinginess),
            ("clamp_strength", self.clamp_strength),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let non_negative = [
            ("horizontal_speed", self.horizontal_speed),
            ("drop_speed", self.drop_speed),
            ("lift_speed", self.lift_speed),
            ("max_drop_depth", self.max_drop_depth),
            ("capture_radius", self.capture_radius),
            ("resolve_delay", self.resolve_delay),
            ("travel_bounds.x", self.travel_bounds.x),
            ("travel_bounds.y", self.travel_bounds.y),
            ("pit_bounds.x", self.pit_bounds.x),
            ("pit_bounds.y", self.pit_bounds.y),
            ("pit_bounds.z", self.pit_bounds.z),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if !(self.drift_interval > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "drift_interval",
                value: self.drift_interval,
            });
        }
        if self.pit_initial_items == 0 {
            return Err(ConfigError::OutOfRange {
                field: "pit_initial_items",
                value: 0.0,
            });
        }
        self.grip.validate()
    }
}

/// Tuning for the free-moving hook variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleClawConfig {
    /// Head speed (units/s)
    pub move_speed: f32,
    /// Head half travel in X/Z around the origin
    pub xz_bounds: Vec2,
    pub clamp_inside_bounds: bool,
    /// Hook travel below its home height
    pub drop_distance: f32,
    pub descend_speed: f32,
    pub ascend_speed: f32,
    /// Pause at the bottom before closing (seconds)
    pub settle_pause: f32,
    pub grab_radius: f32,
    /// Heavier bodies are ignored by the grip
    pub max_carry_mass: f32,
    pub grip: GripMode,
}

impl Default for SimpleClawConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            xz_bounds: Vec2::new(6.0, 6.0),
            clamp_inside_bounds: true,
            drop_distance: 3.0,
            descend_speed: 3.5,
            ascend_speed: 4.5,
            settle_pause: 0.1,
            grab_radius: 0.45,
            max_carry_mass: 5.0,
            grip: GripMode::HardAttach,
        }
    }
}

impl SimpleClawConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("move_speed", self.move_speed),
            ("xz_bounds.x", self.xz_bounds.x),
            ("xz_bounds.y", self.xz_bounds.y),
            ("drop_distance", self.drop_distance),
            ("settle_pause", self.settle_pause),
            ("grab_radius", self.grab_radius),
            ("max_carry_mass", self.max_carry_mass),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("descend_speed", self.descend_speed),
            ("ascend_speed", self.ascend_speed),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        self.grip.validate()
    }
}

/// Starting state for a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub seed: u64,
    pub starting_credits: i64,
    pub starting_tickets: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            seed: 1337,
            starting_credits: 0,
            starting_tickets: 0,
        }
    }
}

/// Loot table as authored: prize ids plus weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTableDef {
    pub id: String,
    #[serde(default)]
    pub entries: Vec<LootRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootRow {
    pub prize: String,
    pub weight: f32,
}

/// All authored content for an arcade
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub session: SessionSettings,
    pub prizes: Vec<PrizeDefinition>,
    pub loot_tables: Vec<LootTableDef>,
    pub machines: Vec<MachineConfig>,
    pub collections: Vec<CollectionDef>,
}

impl Catalog {
    /// Parse and validate a JSON catalog
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        log::info!(
            "Loaded catalog from {}: {} prizes, {} machines",
            path.display(),
            catalog.prizes.len(),
            catalog.machines.len()
        );
        Ok(catalog)
    }

    /// Check ids and cross references
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = BTreeSet::new();
        for prize in &self.prizes {
            if prize.id.trim().is_empty() {
                return Err(ConfigError::EmptyId { kind: "prize" });
            }
            if !ids.insert(prize.id.as_str()) {
                return Err(ConfigError::DuplicatePrize(prize.id.clone()));
            }
        }

        let mut table_ids = BTreeSet::new();
        for table in &self.loot_tables {
            if !table_ids.insert(table.id.as_str()) {
                return Err(ConfigError::DuplicateId {
                    kind: "loot table",
                    id: table.id.clone(),
                });
            }
            for row in &table.entries {
                if !ids.contains(row.prize.as_str()) {
                    return Err(ConfigError::UnknownPrize {
                        prize: row.prize.clone(),
                        by: table.id.clone(),
                    });
                }
                if row.weight < 0.0 {
                    log::warn!(
                        "Loot table {} gives {} a negative weight; it will never drop",
                        table.id,
                        row.prize
                    );
                }
            }
        }

        let mut machine_ids = BTreeSet::new();
        for machine in &self.machines {
            machine.validate()?;
            if !machine_ids.insert(machine.machine_id.as_str()) {
                return Err(ConfigError::DuplicateId {
                    kind: "machine",
                    id: machine.machine_id.clone(),
                });
            }
            if !table_ids.contains(machine.loot_table.as_str()) {
                return Err(ConfigError::UnknownLootTable {
                    table: machine.loot_table.clone(),
                    machine: machine.machine_id.clone(),
                });
            }
        }

        let mut collection_ids = BTreeSet::new();
        for collection in &self.collections {
            if !collection_ids.insert(collection.id.as_str()) {
                return Err(ConfigError::DuplicateId {
                    kind: "collection",
                    id: collection.id.clone(),
                });
            }
            for item in &collection.items {
                if !ids.contains(item.as_str()) {
                    return Err(ConfigError::UnknownPrize {
                        prize: item.clone(),
                        by: collection.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn prize(&self, id: &str) -> Option<&PrizeDefinition> {
        self.prizes.iter().find(|p| p.id == id)
    }

    /// Resolve a loot table into shared prize definitions
    pub fn loot_table(&self, id: &str) -> Result<LootTable, ConfigError> {
        let def = self
            .loot_tables
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ConfigError::MissingLootTable(id.to_string()))?;

        let entries = def
            .entries
            .iter()
            .map(|row| {
                self.prize(&row.prize)
                    .map(|prize| LootEntry {
                        prize: Arc::new(prize.clone()),
                        weight: row.weight,
                    })
                    .ok_or_else(|| ConfigError::UnknownPrize {
                        prize: row.prize.clone(),
                        by: def.id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LootTable::new(def.id.clone(), entries))
    }

    /// Built-in content used by the binary and tests
    pub fn demo() -> Self {
        let prize = |id: &str, name: &str, credits: u32, tickets: u32, mass: f32| {
            PrizeDefinition {
                id: id.to_string(),
                display_name: name.to_string(),
                description: String::new(),
                credit_reward: credits,
                ticket_reward: tickets,
                body: Some(BodyTemplate {
                    half_extents: Vec3::splat(0.15),
                    mass,
                }),
            }
        };
        let row = |prize: &str, weight: f32| LootRow {
            prize: prize.to_string(),
            weight,
        };

        Self {
            session: SessionSettings {
                starting_credits: 10,
                ..SessionSettings::default()
            },
            prizes: vec![
                prize("rubber_duck", "Rubber Duck", 0, 2, 0.5),
                prize("plush_bear", "Plush Bear", 1, 5, 1.0),
                prize("robot", "Wind-up Robot", 2, 10, 2.0),
                prize("golden_cat", "Golden Lucky Cat", 5, 25, 4.0),
            ],
            loot_tables: vec![LootTableDef {
                id: "starter".to_string(),
                entries: vec![
                    row("rubber_duck", 50.0),
                    row("plush_bear", 30.0),
                    row("robot", 15.0),
                    row("golden_cat", 5.0),
                ],
            }],
            machines: vec![
                MachineConfig::default(),
                MachineConfig {
                    machine_id: "joint_machine".to_string(),
                    display_name: "Wobbly Premium Machine".to_string(),
                    credit_cost: 1,
                    clamp_strength: 0.6,
                    drift: 0.1,
                    origin: Vec3::new(10.0, 0.0, 0.0),
                    grip: GripMode::BreakableJoint {
                        break_force: 400.0,
                        break_torque: 150.0,
                    },
                    ..MachineConfig::default()
                },
            ],
            collections: vec![CollectionDef {
                id: "starter_collection".to_string(),
                display_name: "Starter Collection".to_string(),
                items: vec![
                    "rubber_duck".to_string(),
                    "plush_bear".to_string(),
                    "robot".to_string(),
                    "golden_cat".to_string(),
                ],
            }],
        }
    }
}
