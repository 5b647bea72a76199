//! Claw Arcade entry point
//!
//! Runs a scripted headless session against the reference physics world.
//! Pass a catalog JSON path to play custom content; otherwise the built-in
//! demo catalog is used.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use claw_arcade::config::Catalog;
    use claw_arcade::physics::SimpleWorld;
    use claw_arcade::sim::{MachineEvent, PlayState};
    use claw_arcade::{Arcade, ArcadeEvent, ConfigError};
    use glam::Vec2;

    /// Display frame rate driving the accumulator
    const FRAME_DT: f32 = 1.0 / 60.0;
    const PLAYS_PER_MACHINE: usize = 3;

    pub fn run() -> Result<(), ConfigError> {
        let catalog = match std::env::args().nth(1) {
            Some(path) => Catalog::load(path)?,
            None => Catalog::demo(),
        };
        let mut arcade = Arcade::from_catalog(SimpleWorld::new(0.0), &catalog)?;

        // Let every machine fill its pit
        run_for(&mut arcade, 1.0);

        for machine in 0..arcade.machines().len() {
            for play in 0..PLAYS_PER_MACHINE {
                let aim = Vec2::new(if play % 2 == 0 { 0.6 } else { -0.6 }, 0.3);
                if let Some(input) = arcade.input_mut(machine) {
                    input.move_axis = Some(aim);
                }
                run_for(&mut arcade, 0.4);
                if let Some(input) = arcade.input_mut(machine) {
                    input.move_axis = Some(Vec2::ZERO);
                    input.drop = true;
                }
                run_for(&mut arcade, 1.5);

                let dropping = arcade
                    .machine(machine)
                    .is_some_and(|m| m.state() == PlayState::Dropping);
                if !dropping {
                    log::warn!("Machine {} did not start a play, skipping", machine);
                    break;
                }
                if let Some(input) = arcade.input_mut(machine) {
                    input.clamp = true;
                }
                run_for(&mut arcade, 1.5);
            }
        }

        let session = arcade.session();
        println!(
            "Session over after {:.1}s: {} credits, {} tickets",
            arcade.elapsed(),
            session.economy.credits(),
            session.economy.tickets()
        );
        for m in arcade.machines() {
            println!(
                "  {}: {} plays, {} prizes",
                m.config().display_name,
                m.plays(),
                m.catches()
            );
        }
        let owned: Vec<&str> = session.inventory.owned().collect();
        println!("  owned: {}", owned.join(", "));
        for (collection, progress) in arcade.collection_progress() {
            println!(
                "  {}: {}/{}{}",
                collection.display_name,
                progress.owned,
                progress.total,
                if progress.is_complete() { " (complete)" } else { "" }
            );
        }
        Ok(())
    }

    fn run_for(arcade: &mut Arcade<SimpleWorld>, seconds: f32) {
        let frames = (seconds / FRAME_DT).round() as u32;
        for _ in 0..frames {
            arcade.update(FRAME_DT);
            for ArcadeEvent { machine, event } in arcade.drain_events() {
                report(machine, &event);
            }
        }
    }

    fn report(machine: usize, event: &MachineEvent) {
        match event {
            MachineEvent::Hint(text) => log::info!("[{}] {}", machine, text),
            MachineEvent::PrizeCollected {
                prize_id,
                newly_owned,
                ..
            } => log::info!(
                "[{}] Collected {}{}",
                machine,
                prize_id,
                if *newly_owned { " (new!)" } else { "" }
            ),
            MachineEvent::PrizeDropped { prize_id } => {
                log::info!("[{}] Lost {} on the way up", machine, prize_id)
            }
            other => log::debug!("[{}] {:?}", machine, other),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Claw Arcade (native) starting...");

    if let Err(e) = native::run() {
        log::error!("Failed to run session: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by the host
}
