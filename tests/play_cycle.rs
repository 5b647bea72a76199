//! End-to-end play cycles against the reference physics world.

use std::sync::Arc;

use claw_arcade::config::{Catalog, MachineConfig, SimpleClawConfig};
use claw_arcade::consts::SIM_DT;
use claw_arcade::loot::{BodyTemplate, LootTable, PrizeDefinition};
use claw_arcade::physics::{PhysicsWorld, SimpleWorld};
use claw_arcade::sim::{
    ClawMachine, DeliveryZone, MachineEvent, Pit, PlayState, RngState, SimpleClaw, SimpleEvent,
    TickContext, TickInput,
};
use claw_arcade::{Arcade, ArcadeEvent, EconomyLedger, InventoryLedger};
use glam::{Vec2, Vec3};

struct Table {
    world: SimpleWorld,
    economy: EconomyLedger,
    inventory: InventoryLedger,
    machine: ClawMachine,
    events: Vec<MachineEvent>,
}

impl Table {
    fn new(config: MachineConfig, loot: LootTable, credits: i64) -> Self {
        let mut world = SimpleWorld::new(0.0);
        let machine = ClawMachine::new(&mut world, config, loot, RngState::new(7));
        Self {
            world,
            economy: EconomyLedger::new(credits, 0),
            inventory: InventoryLedger::new(),
            machine,
            events: Vec::new(),
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
        self.events.extend(self.machine.drain_events());
    }

    fn idle(&mut self, seconds: f32) {
        for _ in 0..(seconds / SIM_DT).ceil() as u32 {
            self.tick(TickInput::default());
        }
    }

    fn play(&mut self) {
        self.tick(TickInput {
            drop: true,
            ..Default::default()
        });
        self.idle(1.5);
        self.tick(TickInput {
            clamp: true,
            ..Default::default()
        });
        self.idle(1.2);
    }
}

fn starter_loot() -> LootTable {
    let catalog = Catalog::demo();
    catalog.loot_table("starter").unwrap()
}

#[test]
fn three_paid_plays_account_for_every_credit() {
    let config = MachineConfig {
        credit_cost: 1,
        clamp_strength: 0.9,
        ..MachineConfig::default()
    };
    let mut table = Table::new(config, starter_loot(), 5);
    table.idle(1.0);

    for _ in 0..3 {
        table.play();
        assert_eq!(table.machine.state(), PlayState::Positioning);
    }

    let (won_credits, won_tickets, caught) = table.events.iter().fold(
        (0u64, 0u64, 0u64),
        |(c, t, n), event| match event {
            MachineEvent::PrizeCollected {
                credits, tickets, ..
            } => (c + u64::from(*credits), t + u64::from(*tickets), n + 1),
            _ => (c, t, n),
        },
    );
    assert_eq!(table.machine.plays(), 3);
    assert_eq!(table.machine.catches(), caught);
    assert_eq!(table.economy.credits(), 5 - 3 + won_credits);
    assert_eq!(table.economy.tickets(), won_tickets);

    // The last balance notification matches the ledger
    let last_credits = table.events.iter().rev().find_map(|e| match e {
        MachineEvent::CreditsChanged(c) => Some(*c),
        _ => None,
    });
    assert_eq!(last_credits, Some(table.economy.credits()));
}

#[test]
fn broke_player_cannot_start() {
    let config = MachineConfig {
        credit_cost: 1,
        ..MachineConfig::default()
    };
    let mut table = Table::new(config, starter_loot(), 0);
    table.idle(0.5);
    table.tick(TickInput {
        drop: true,
        ..Default::default()
    });
    table.idle(3.0);

    assert_eq!(table.machine.state(), PlayState::Positioning);
    assert_eq!(table.economy.credits(), 0);
    assert_eq!(table.machine.plays(), 0);
    assert!(
        table
            .events
            .contains(&MachineEvent::Hint("Not enough credits/tickets!".to_string()))
    );
}

#[test]
fn clamping_thin_air_changes_no_balance() {
    let config = MachineConfig {
        pit_initial_items: 0,
        refill_after_play: false,
        ..MachineConfig::default()
    };
    let mut table = Table::new(config, starter_loot(), 2);
    table.idle(0.5);
    table.play();

    assert_eq!(table.machine.state(), PlayState::Positioning);
    assert_eq!(table.economy.credits(), 2);
    assert_eq!(table.economy.tickets(), 0);
    assert!(table.inventory.is_empty());
    assert!(
        !table
            .events
            .iter()
            .any(|e| matches!(e, MachineEvent::PrizeCollected { .. }))
    );

    let states: Vec<PlayState> = table
        .events
        .iter()
        .filter_map(|e| match e {
            MachineEvent::StateChanged(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![
            PlayState::Positioning,
            PlayState::Dropping,
            PlayState::Clamping,
            PlayState::Lifting,
            PlayState::Resolving,
            PlayState::Positioning,
        ]
    );
}

fn scripted_session() -> (Vec<ArcadeEvent>, u64, u64, Vec<Vec3>) {
    let mut arcade = Arcade::from_catalog(SimpleWorld::new(0.0), &Catalog::demo()).unwrap();
    let mut events = Vec::new();
    let frame = 1.0 / 60.0;
    let run = |arcade: &mut Arcade<SimpleWorld>, seconds: f32, events: &mut Vec<ArcadeEvent>| {
        for _ in 0..(seconds / frame).round() as u32 {
            arcade.update(frame);
            events.extend(arcade.drain_events());
        }
    };

    run(&mut arcade, 0.5, &mut events);
    for machine in [0, 1, 1, 0] {
        let input = arcade.input_mut(machine).unwrap();
        input.move_axis = Some(Vec2::new(0.5, -0.5));
        run(&mut arcade, 0.3, &mut events);
        let input = arcade.input_mut(machine).unwrap();
        input.move_axis = Some(Vec2::ZERO);
        input.drop = true;
        run(&mut arcade, 1.4, &mut events);
        arcade.input_mut(machine).unwrap().clamp = true;
        run(&mut arcade, 1.3, &mut events);
    }

    let positions = arcade
        .machines()
        .iter()
        .flat_map(|m| m.pit().iter().map(|p| p.body).collect::<Vec<_>>())
        .filter_map(|body| arcade.world().position(body))
        .collect();
    let session = arcade.session();
    (
        events,
        session.economy.credits(),
        session.economy.tickets(),
        positions,
    )
}

#[test]
fn same_seed_same_session() {
    let a = scripted_session();
    let b = scripted_session();
    assert!(!a.0.is_empty());
    assert_eq!(a, b);
}

#[test]
fn json_catalog_drives_an_arcade() {
    let json = r#"{
        "session": { "seed": 42, "starting_credits": 3 },
        "prizes": [
            { "id": "yoyo", "display_name": "Yo-yo", "credit_reward": 1, "ticket_reward": 3,
              "body": { "half_extents": [0.1, 0.1, 0.1], "mass": 0.3 } }
        ],
        "loot_tables": [ { "id": "only_yoyos", "entries": [ { "prize": "yoyo", "weight": 1.0 } ] } ],
        "machines": [
            { "machine_id": "yoyo_box", "display_name": "Yo-yo Box", "credit_cost": 1,
              "loot_table": "only_yoyos", "pit_initial_items": 6 }
        ]
    }"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    let mut arcade = Arcade::from_catalog(SimpleWorld::new(0.0), &catalog).unwrap();
    arcade.step();

    let machine = arcade.machine(0).unwrap();
    assert_eq!(machine.pit().len(), 6);
    assert!(machine.pit().iter().all(|p| p.definition.id == "yoyo"));
    assert!(arcade.drain_events().contains(&ArcadeEvent {
        machine: 0,
        event: MachineEvent::CreditsChanged(3),
    }));

    arcade.input_mut(0).unwrap().drop = true;
    arcade.step();
    assert_eq!(arcade.session().economy.credits(), 2);
}

#[test]
fn simple_claw_carries_prize_to_the_chute() {
    let mut world = SimpleWorld::new(0.0);
    let mut economy = EconomyLedger::new(0, 0);
    let mut pit = Pit::new(Vec3::ZERO, Vec3::new(4.0, 1.0, 4.0));
    let duck = Arc::new(PrizeDefinition {
        id: "rubber_duck".to_string(),
        display_name: "Rubber Duck".to_string(),
        description: String::new(),
        credit_reward: 0,
        ticket_reward: 2,
        body: Some(BodyTemplate::default()),
    });
    let body = pit
        .insert(&mut world, duck, Vec3::new(0.0, 0.15, 0.0), 0.0)
        .unwrap();
    let chute = DeliveryZone::new(Vec3::new(3.0, 0.5, 0.0), Vec3::new(0.5, 0.5, 0.5));
    let mut claw = SimpleClaw::new(
        &mut world,
        SimpleClawConfig::default(),
        Vec3::new(0.0, 3.0, 0.0),
    )
    .unwrap();

    let step = |claw: &mut SimpleClaw, world: &mut SimpleWorld, seconds: f32| {
        let mut events = Vec::new();
        for _ in 0..(seconds / SIM_DT).ceil() as u32 {
            events.extend(claw.step(world, SIM_DT));
            world.step(SIM_DT);
        }
        events
    };

    assert!(claw.drop(&mut world));
    let events = step(&mut claw, &mut world, 2.5);
    assert!(events.contains(&SimpleEvent::Grabbed(body)));

    claw.set_move(Vec2::X);
    step(&mut claw, &mut world, 0.6);
    claw.set_move(Vec2::ZERO);
    assert!((claw.head().x - 3.0).abs() < 0.05);

    assert_eq!(claw.release(&mut world), Some(body));
    step(&mut claw, &mut world, 2.0);

    let collected = chute.collect(&mut world, &mut pit, &mut economy);
    assert_eq!(collected.len(), 1);
    assert_eq!(economy.tickets(), 2);
    assert!(pit.is_empty());
    assert!(world.position(body).is_none());
}
