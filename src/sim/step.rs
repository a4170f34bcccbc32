//! The step function: advances a level by one frame.
//!
//! A frame's elapsed time is capped, then split into sub-steps. Each
//! sub-step runs, in order:
//!   1. Actor updates (every live actor except the player)
//!   2. Player motion: horizontal, then vertical (grid probes)
//!   3. Grid probe at the player's resting box
//!   4. Actor-overlap probe (`actor_at(player)`)
//!   5. Finish-delay countdown once the level is decided
//!
//! Steps 2/3 and 4 are two separate paths into `player_touched`: lava is
//! only ever seen by the grid probe, fireballs and coins only by the
//! overlap probe.

use log::debug;

use crate::config::{GameConfig, PlayerConfig};
use crate::domain::entity::{ActorId, ActorKind, ActorTag, FireballKind};
use crate::domain::rules::{Contact, Status, Transition};
use crate::domain::vector::Vector;
use super::event::GameEvent;
use super::level::Level;

/// Remaining time below this is float noise, not another sub-step.
const TIME_EPSILON: f64 = 1e-9;
/// Upper bound on sub-steps per frame. Past it the slices grow instead.
pub const MAX_SUB_STEPS: u32 = 10_000;

/// Abstract player intent for one frame. Where it comes from (keyboard,
/// script, replay) is the caller's business.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(level: &mut Level, time: f64, input: FrameInput, config: &GameConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();
    // NaN fails this too; `f64::min` would otherwise swallow it.
    if !(time > TIME_EPSILON) {
        return events;
    }
    let total = time.min(config.timing.max_frame_step);

    // Equal slices, counted up front: subtracting a tiny slice from the
    // remaining time need not make progress in f64.
    let slice = config.timing.sub_step;
    let count = if slice > 0.0 {
        (total / slice - TIME_EPSILON).ceil().clamp(1.0, MAX_SUB_STEPS as f64) as u32
    } else {
        1
    };
    let dt = total / count as f64;
    for _ in 0..count {
        sub_step(level, dt, input, &config.player, &mut events);
    }
    events
}

fn sub_step(level: &mut Level, dt: f64, input: FrameInput, player: &PlayerConfig, events: &mut Vec<GameEvent>) {
    move_actors(level, dt, events);
    move_player(level, dt, input, player, events);
    resolve_grid_contact(level, events);
    resolve_actor_contact(level, events);
    level.tick_finish_delay();
}

// ══════════════════════════════════════════════════════════════
// Actors
// ══════════════════════════════════════════════════════════════

fn move_actors(level: &mut Level, dt: f64, events: &mut Vec<GameEvent>) {
    let player = level.player_id();
    // Snapshot ids: a removal later in the tick must not disturb this pass.
    let ids: Vec<ActorId> = level.actors().iter()
        .map(|a| a.id)
        .filter(|&id| Some(id) != player)
        .collect();

    for id in ids {
        let Some(actor) = level.actor(id) else { continue };
        let acted = actor.act(dt, level.grid());
        if let Some(on) = acted.hit {
            match acted.next.kind {
                ActorKind::Fireball { kind: FireballKind::Rain, .. } => {
                    events.push(GameEvent::FireRainReset { id });
                }
                _ => events.push(GameEvent::FireballBounced { id, on }),
            }
        }
        level.replace_actor(acted.next);
    }
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn move_player(level: &mut Level, dt: f64, input: FrameInput, cfg: &PlayerConfig, events: &mut Vec<GameEvent>) {
    let Some(mut player) = level.player().cloned() else { return };

    // Horizontal: no momentum, speed follows input directly.
    let mut x_speed = 0.0;
    if input.left { x_speed -= cfg.speed; }
    if input.right { x_speed += cfg.speed; }
    let target = player.pos.plus(Vector::new(x_speed * dt, 0.0));
    match level.obstacle_at(target, player.size) {
        Some(tag) => touch(level, tag.into(), None, events),
        None => player.pos = target,
    }

    // Vertical: gravity accumulates; landing either stops or bounces into a jump.
    let mut y_speed = player.speed.y + cfg.gravity * dt;
    let target = player.pos.plus(Vector::new(0.0, y_speed * dt));
    match level.obstacle_at(target, player.size) {
        Some(tag) => {
            touch(level, tag.into(), None, events);
            y_speed = if input.up && y_speed > 0.0 { -cfg.jump_speed } else { 0.0 };
        }
        None => player.pos = target,
    }

    player.speed = Vector::new(x_speed, y_speed);
    level.replace_actor(player);
}

/// The box the player rests in can itself be an obstacle (spawned in lava,
/// or lava reached without a blocked move).
fn resolve_grid_contact(level: &mut Level, events: &mut Vec<GameEvent>) {
    let tag = match level.player() {
        Some(p) => level.obstacle_at(p.pos, p.size),
        None => return,
    };
    if let Some(tag) = tag {
        touch(level, tag.into(), None, events);
    }
}

fn resolve_actor_contact(level: &mut Level, events: &mut Vec<GameEvent>) {
    let hit = level.player()
        .and_then(|p| level.actor_at(p))
        .map(|a| (a.tag(), a.id));
    if let Some((tag, id)) = hit {
        touch(level, tag.into(), Some(id), events);
    }
}

fn touch(level: &mut Level, contact: Contact, actor: Option<ActorId>, events: &mut Vec<GameEvent>) {
    match level.player_touched(contact, actor) {
        Transition::Ignore => {}
        Transition::Lose => {
            debug!("player killed by {contact}");
            events.push(GameEvent::PlayerKilled { by: contact });
            events.push(GameEvent::LevelLost);
        }
        Transition::CollectCoin => {
            if let Some(id) = actor {
                let remaining = level.count_actors(ActorTag::Coin);
                events.push(GameEvent::CoinCollected { id, remaining });
            }
            if level.status() == Status::Won {
                events.push(GameEvent::LevelWon);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Actor;
    use crate::domain::physics::Grid;
    use crate::domain::tile::Obstacle;
    use crate::sim::parser::LevelParser;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const FRAME: f64 = 1.0 / 60.0;

    fn parse(plan: &[&str]) -> Level {
        LevelParser::default().parse(plan, &mut Pcg32::seed_from_u64(1))
    }

    fn run(level: &mut Level, frames: usize, input: FrameInput) -> Vec<GameEvent> {
        let cfg = GameConfig::default();
        let mut events = vec![];
        for _ in 0..frames {
            events.extend(step(level, FRAME, input, &cfg));
        }
        events
    }

    const RIGHT: FrameInput = FrameInput { left: false, right: true, up: false };
    const IDLE: FrameInput = FrameInput { left: false, right: false, up: false };

    #[test]
    fn walking_into_coin_wins() {
        let mut level = parse(&["   ", "@o ", "xxx"]);
        let events = run(&mut level, 10, RIGHT);
        assert_eq!(level.status(), Status::Won);
        assert_eq!(level.count_actors(ActorTag::Coin), 0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::CoinCollected { remaining: 0, .. })));
        assert!(events.contains(&GameEvent::LevelWon));
    }

    #[test]
    fn falling_into_lava_loses_via_grid_probe() {
        let mut level = parse(&["   ", "@  ", "!!!"]);
        let events = run(&mut level, 1, IDLE);
        assert_eq!(level.status(), Status::Lost);
        assert_eq!(events[0], GameEvent::PlayerKilled { by: Contact::Obstacle(Obstacle::Lava) });
        assert!(events.contains(&GameEvent::LevelLost));
    }

    #[test]
    fn fireball_overlap_loses_via_actor_probe() {
        let grid = Grid::from_rows(&["   ", "   ", "xxx"]);
        let player = Actor::player(Vector::new(0.0, 1.0)).unwrap();
        let fireball = Actor::fireball(Vector::new(0.5, 1.0), Vector::ZERO).unwrap();
        let mut level = Level::new(grid, vec![player, fireball]);
        let events = run(&mut level, 1, IDLE);
        assert_eq!(level.status(), Status::Lost);
        assert!(events.contains(&GameEvent::PlayerKilled { by: Contact::Actor(ActorTag::Fireball) }));
    }

    #[test]
    fn spawning_inside_lava_loses() {
        let grid = Grid::from_rows(&["   ", "   ", " ! ", "xxx"]);
        // Player box covers rows 1 and 2 of column 1, lava included.
        let player = Actor::player(Vector::new(1.0, 1.5)).unwrap();
        let mut level = Level::new(grid, vec![player]);
        run(&mut level, 1, IDLE);
        assert_eq!(level.status(), Status::Lost);
    }

    #[test]
    fn finish_waits_one_extra_sub_step() {
        let mut level = parse(&["   ", "@  ", "!!!"]);
        run(&mut level, 1, IDLE);
        assert_eq!(level.status(), Status::Lost);
        assert_eq!(level.finish_delay, 0);
        assert!(!level.is_finished());
        run(&mut level, 1, IDLE);
        assert!(level.is_finished());
    }

    #[test]
    fn walls_block_walking() {
        let mut level = parse(&["    ", "@x  ", "xxxx"]);
        run(&mut level, 20, RIGHT);
        let p = level.player().unwrap();
        assert!(p.right() <= 1.0, "player walked into the wall: {:?}", p.pos);
        assert_eq!(level.status(), Status::InProgress);
    }

    #[test]
    fn standing_on_floor_does_not_sink() {
        let mut level = parse(&["   ", "@  ", "xxx"]);
        run(&mut level, 30, IDLE);
        let p = level.player().unwrap();
        assert_eq!(p.pos, Vector::new(0.0, 0.5));
        assert_eq!(p.speed, Vector::ZERO);
    }

    #[test]
    fn up_on_ground_jumps() {
        let mut level = parse(&["   ", "   ", "@  ", "xxx"]);
        let up = FrameInput { up: true, ..IDLE };
        run(&mut level, 2, up);
        let p = level.player().unwrap();
        assert!(p.pos.y < 1.5, "player did not leave the ground: {:?}", p.pos);
        assert!(p.speed.y < 0.0);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut level = parse(&["          ", "=         "]);
        let before = level.actors()[0].pos;
        step(&mut level, 10.0, IDLE, &GameConfig::default());
        let after = level.actors()[0].pos;
        // 0.1 s at 2 cells/s
        assert!((after.x - before.x - 0.2).abs() < 1e-9);
    }

    #[test]
    fn tiny_sub_step_still_finishes() {
        let mut level = parse(&["          ", "=         "]);
        let mut cfg = GameConfig::default();
        cfg.timing.sub_step = 1e-20;
        let before = level.actors()[0].pos;
        step(&mut level, 0.1, IDLE, &cfg);
        let after = level.actors()[0].pos;
        // Capped at MAX_SUB_STEPS slices, same distance covered.
        assert!((after.x - before.x - 0.2).abs() < 1e-9);
    }

    #[test]
    fn huge_frame_cap_is_bounded() {
        let mut level = parse(&["   ", "=  "]);
        let mut cfg = GameConfig::default();
        cfg.timing.max_frame_step = 1e12;
        step(&mut level, 1e12, IDLE, &cfg);
        // MAX_SUB_STEPS slices of 1e8 s: every move leaves the grid, so the
        // fireball bounces in place.
        assert_eq!(level.actors()[0].pos, Vector::new(0.0, 1.0));
    }

    #[test]
    fn nan_time_does_nothing() {
        let mut level = parse(&["   ", "@  ", "!!!"]);
        assert!(step(&mut level, f64::NAN, IDLE, &GameConfig::default()).is_empty());
        assert_eq!(level.status(), Status::InProgress);
    }

    #[test]
    fn zero_time_does_nothing() {
        let mut level = parse(&["   ", "@  ", "!!!"]);
        assert!(step(&mut level, 0.0, IDLE, &GameConfig::default()).is_empty());
        assert!(step(&mut level, -1.0, IDLE, &GameConfig::default()).is_empty());
        assert_eq!(level.status(), Status::InProgress);
    }

    #[test]
    fn bounce_and_rain_events() {
        let mut level = parse(&["=x", "  ", "v ", "x "]);
        let events = run(&mut level, 1, IDLE);
        assert!(events.iter().any(|e| matches!(e, GameEvent::FireballBounced { on: Obstacle::Wall, .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::FireRainReset { .. })));
    }

    #[test]
    fn collecting_one_of_many_coins_keeps_level_running() {
        let mut level = parse(&["      ", "@o   o", "xxxxxx"]);
        let events = run(&mut level, 10, RIGHT);
        assert_eq!(level.status(), Status::InProgress);
        assert_eq!(level.count_actors(ActorTag::Coin), 1);
        assert!(events.iter().any(|e| matches!(e, GameEvent::CoinCollected { remaining: 1, .. })));
        assert!(!events.contains(&GameEvent::LevelWon));
    }

    #[test]
    fn level_without_player_still_animates() {
        let mut level = parse(&["   ", "=  "]);
        run(&mut level, 5, RIGHT);
        assert!(level.actors()[0].pos.x > 0.0);
        assert_eq!(level.status(), Status::InProgress);
    }
}
