//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;

use taixiu_engine::config::GameConfig;
use taixiu_engine::engine::{Engine, TickOutcome};
use taixiu_engine::rng::RandomSource;

/// Serves queued die faces for `[1, 6]` draws and `min` for everything else.
#[derive(Debug, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
}

impl ScriptedDice {
    pub fn with_rolls(rolls: &[[u8; 3]]) -> Self {
        let mut s = Self::default();
        for roll in rolls {
            s.faces.extend(roll.iter().map(|&d| u32::from(d)));
        }
        s
    }
}

impl RandomSource for ScriptedDice {
    fn random_int(&mut self, min: u32, max: u32) -> u32 {
        if (min, max) != (1, 6) {
            return min;
        }
        self.faces.pop_front().unwrap_or(min)
    }
}

pub fn engine_with_rolls(rolls: &[[u8; 3]]) -> Engine<ScriptedDice> {
    Engine::with_rng(GameConfig::default(), ScriptedDice::with_rolls(rolls)).expect("engine")
}

/// Ticks until the countdown stops reporting `Counting`.
pub fn run_out_clock<R: RandomSource>(engine: &mut Engine<R>) -> TickOutcome {
    loop {
        match engine.tick().expect("tick") {
            TickOutcome::Counting { .. } => continue,
            other => return other,
        }
    }
}
