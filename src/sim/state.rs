//! Play-cycle state, per-tick input, and display events

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Phase of one claw machine's play cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayState {
    /// Not started; the first tick runs setup
    #[default]
    Idle,
    /// Player steers the carriage, drift applies
    Positioning,
    /// Hook descending, waiting for the clamp trigger
    Dropping,
    /// Capture roll (transient, resolves within the same tick)
    Clamping,
    /// Hook rising while the resolve timer runs
    Lifting,
    /// Payout (transient)
    Resolving,
}

impl PlayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayState::Idle => "Idle",
            PlayState::Positioning => "Positioning",
            PlayState::Dropping => "Dropping",
            PlayState::Clamping => "Clamping",
            PlayState::Lifting => "Lifting",
            PlayState::Resolving => "Resolving",
        }
    }
}

/// Input for a single tick
///
/// `move_axis` is the latest stick value when it changed; the edge triggers
/// are one-shot and cleared by the driver after each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub move_axis: Option<Vec2>,
    pub drop: bool,
    pub clamp: bool,
    /// Reserved, currently ignored
    pub cancel: bool,
}

impl TickInput {
    /// Clear edge-triggered events, keeping nothing for the next tick
    pub fn clear_triggers(&mut self) {
        self.move_axis = None;
        self.drop = false;
        self.clamp = false;
        self.cancel = false;
    }
}

/// Notification for the HUD side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MachineEvent {
    MachineName(String),
    CreditsChanged(u64),
    TicketsChanged(u64),
    Hint(String),
    StateChanged(PlayState),
    PrizeCollected {
        prize_id: String,
        newly_owned: bool,
        credits: u32,
        tickets: u32,
    },
    /// The grip lost its prize before the payout
    PrizeDropped { prize_id: String },
}

/// Seed material for a machine's random source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Separate stream per machine so machines sharing a session seed differ
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RngState::new(99).to_rng();
        let mut b = RngState::new(99).to_rng();
        for _ in 0..16 {
            assert_eq!(a.random::<u32>(), b.random::<u32>());
        }
    }

    #[test]
    fn test_streams_differ() {
        let mut a = RngState::with_stream(99, 0).to_rng();
        let mut b = RngState::with_stream(99, 1).to_rng();
        let xs: Vec<u32> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_clear_triggers() {
        let mut input = TickInput {
            move_axis: Some(Vec2::X),
            drop: true,
            clamp: true,
            cancel: true,
        };
        input.clear_triggers();
        assert_eq!(input, TickInput::default());
    }
}
