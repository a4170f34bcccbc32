//! Headless game loop.
//!
//! Drives levels frame by frame at the configured fixed `frame_step`,
//! asking a `Controller` for input each frame. A lost or timed-out level is
//! replayed from a fresh parse until `max_attempts` is used up.

use log::{debug, info, warn};
use rand::RngCore;

use crate::config::GameConfig;
use crate::domain::ai;
use crate::domain::rules::Status;
use super::level::Level;
use super::pack::LevelDef;
use super::parser::LevelParser;
use super::step::{step, FrameInput};

/// Source of per-frame input.
pub trait Controller {
    fn input(&mut self, level: &Level) -> FrameInput;
}

impl<F> Controller for F
where
    F: FnMut(&Level) -> FrameInput,
{
    fn input(&mut self, level: &Level) -> FrameInput {
        self(level)
    }
}

/// Never presses anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Idle;

impl Controller for Idle {
    fn input(&mut self, _level: &Level) -> FrameInput {
        FrameInput::default()
    }
}

/// Walks and jumps toward the nearest coin.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoinSeeker;

impl Controller for CoinSeeker {
    fn input(&mut self, level: &Level) -> FrameInput {
        let Some(player) = level.player() else { return FrameInput::default() };
        let (dx, jump) = ai::seek_coin(player, level.actors(), level.grid());
        FrameInput { left: dx < 0, right: dx > 0, up: jump }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelOutcome {
    Won,
    Lost,
    /// Frame budget ran out before the level was decided.
    TimedOut,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RunOutcome {
    Won,
    GaveUp { level: usize, name: String },
}

// ══════════════════════════════════════════════════════════════
// Loop
// ══════════════════════════════════════════════════════════════

/// Run one level until it is finished or the frame budget is spent.
pub fn play_level(level: &mut Level, config: &GameConfig, controller: &mut dyn Controller) -> LevelOutcome {
    let frame_step = config.timing.frame_step;
    for frame in 0..config.timing.max_frames_per_attempt {
        if level.is_finished() {
            break;
        }
        let input = controller.input(level);
        for event in step(level, frame_step, input, config) {
            debug!("frame {frame}: {event:?}");
        }
    }

    match level.status() {
        Status::Won => LevelOutcome::Won,
        Status::Lost => LevelOutcome::Lost,
        Status::InProgress => LevelOutcome::TimedOut,
    }
}

/// Play `levels` in order. Each level gets up to `config.max_attempts`
/// tries; the first level that is never won ends the run.
pub fn run_game(
    levels: &[LevelDef],
    parser: &LevelParser,
    config: &GameConfig,
    rng: &mut dyn RngCore,
    controller: &mut dyn Controller,
) -> RunOutcome {
    'levels: for (index, def) in levels.iter().enumerate() {
        for attempt in 1..=config.max_attempts {
            let mut level = parser.parse(def.rows.as_slice(), rng);
            if level.player().is_none() {
                warn!("level {:?} has no player", def.name);
            }
            let outcome = play_level(&mut level, config, controller);
            info!("level {} {:?}, attempt {attempt}: {outcome:?}", index + 1, def.name);
            if outcome == LevelOutcome::Won {
                continue 'levels;
            }
        }
        return RunOutcome::GaveUp { level: index, name: def.name.clone() };
    }
    RunOutcome::Won
}
