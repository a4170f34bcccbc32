//! Actors: Player, Coin and the Fireball family.
//!
//! The set of variants is closed. Behaviour is dispatched on `ActorKind`
//! and every update returns the actor's next state instead of mutating a
//! shared level: the caller decides when to write it back.

use std::f64::consts::TAU;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{SimError, SimResult};

use super::physics::ObstacleMap;
use super::tile::Obstacle;
use super::vector::Vector;

/// Identity of an actor. Clones share it: a clone is the same actor at a
/// later point in time, not a new one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ActorId(u32);

static NEXT_ACTOR_ID: AtomicU32 = AtomicU32::new(1);

impl ActorId {
    fn fresh() -> Self {
        ActorId(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse type tag used for collision response and `no_more_actors`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ActorTag {
    Actor,
    Player,
    Coin,
    Fireball,
}

impl ActorTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ActorTag::Actor => "actor",
            ActorTag::Player => "player",
            ActorTag::Coin => "coin",
            ActorTag::Fireball => "fireball",
        }
    }
}

impl fmt::Display for ActorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FireballKind {
    /// Arbitrary speed given at construction.
    Free,
    Horizontal,
    Vertical,
    /// Falls and restarts from its spawn point instead of bouncing.
    Rain,
}

/// Phase-driven bobbing of a coin around its resting position.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Spring {
    pub start_pos: Vector,
    pub phase: f64,
    pub speed: f64,
    pub dist: f64,
}

pub const SPRING_SPEED: f64 = 8.0;
pub const SPRING_DIST: f64 = 0.07;

impl Spring {
    pub fn new(start_pos: Vector, phase: f64) -> Self {
        Spring { start_pos, phase, speed: SPRING_SPEED, dist: SPRING_DIST }
    }

    /// Advance the phase by `time` seconds.
    pub fn advance(self, time: f64) -> Self {
        Spring { phase: self.phase + self.speed * time, ..self }
    }

    pub fn offset(&self) -> Vector {
        Vector::new(0.0, self.phase.sin() * self.dist)
    }

    pub fn position(&self) -> Vector {
        self.start_pos.plus(self.offset())
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ActorKind {
    /// Plain actor with a no-op update.
    Plain,
    /// Moved by the step function, never by `act`.
    Player,
    Coin(Spring),
    Fireball { kind: FireballKind, start_pos: Vector },
}

pub const PLAYER_OFFSET: Vector = Vector::new(0.0, -0.5);
pub const PLAYER_SIZE: Vector = Vector::new(0.8, 1.5);
pub const COIN_OFFSET: Vector = Vector::new(0.2, 0.1);
pub const COIN_SIZE: Vector = Vector::new(0.6, 0.6);
pub const HORIZONTAL_FIREBALL_SPEED: Vector = Vector::new(2.0, 0.0);
pub const VERTICAL_FIREBALL_SPEED: Vector = Vector::new(0.0, 2.0);
pub const FIRE_RAIN_SPEED: Vector = Vector::new(0.0, 3.0);

#[derive(Clone, PartialEq, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub pos: Vector,
    pub size: Vector,
    pub speed: Vector,
    pub kind: ActorKind,
}

/// Result of one `act` call: the next state plus the obstacle that
/// stopped the move, if any.
#[derive(Clone, Debug)]
pub struct Acted {
    pub next: Actor,
    pub hit: Option<Obstacle>,
}

/// Plain unit box at the origin, at rest.
impl Default for Actor {
    fn default() -> Self {
        Actor { id: ActorId::fresh(), pos: Vector::ZERO, size: Vector::ONE, speed: Vector::ZERO, kind: ActorKind::Plain }
    }
}

impl Actor {
    /// Plain actor. Positions and speeds must be finite, sizes finite and
    /// non-negative.
    pub fn new(pos: Vector, size: Vector, speed: Vector) -> SimResult<Self> {
        Actor::with_kind(pos, size, speed, ActorKind::Plain)
    }

    fn with_kind(pos: Vector, size: Vector, speed: Vector, kind: ActorKind) -> SimResult<Self> {
        if !pos.is_finite() {
            return Err(SimError::InvalidArgument(format!("position {pos:?} is not finite")));
        }
        if !speed.is_finite() {
            return Err(SimError::InvalidArgument(format!("speed {speed:?} is not finite")));
        }
        if !size.is_finite() || size.x < 0.0 || size.y < 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "size {size:?} must be finite and non-negative"
            )));
        }
        Ok(Actor { id: ActorId::fresh(), pos, size, speed, kind })
    }

    pub fn player(pos: Vector) -> SimResult<Self> {
        Actor::with_kind(pos.plus(PLAYER_OFFSET), PLAYER_SIZE, Vector::ZERO, ActorKind::Player)
    }

    /// Coin centred in its tile. `phase` seeds the bobbing so coins on the
    /// same level drift out of sync; see `Actor::coin_random`.
    pub fn coin(pos: Vector, phase: f64) -> SimResult<Self> {
        if !phase.is_finite() {
            return Err(SimError::InvalidArgument(format!("coin phase {phase} is not finite")));
        }
        let start = pos.plus(COIN_OFFSET);
        Actor::with_kind(start, COIN_SIZE, Vector::ZERO, ActorKind::Coin(Spring::new(start, phase)))
    }

    /// Coin with a phase drawn uniformly from `[0, 2π)`.
    pub fn coin_random(pos: Vector, rng: &mut dyn rand::RngCore) -> SimResult<Self> {
        use rand::Rng;
        let phase = rng.random::<f64>() * TAU;
        Actor::coin(pos, phase)
    }

    pub fn fireball(pos: Vector, speed: Vector) -> SimResult<Self> {
        Actor::fireball_of(FireballKind::Free, pos, speed)
    }

    pub fn horizontal_fireball(pos: Vector) -> SimResult<Self> {
        Actor::fireball_of(FireballKind::Horizontal, pos, HORIZONTAL_FIREBALL_SPEED)
    }

    pub fn vertical_fireball(pos: Vector) -> SimResult<Self> {
        Actor::fireball_of(FireballKind::Vertical, pos, VERTICAL_FIREBALL_SPEED)
    }

    pub fn fire_rain(pos: Vector) -> SimResult<Self> {
        Actor::fireball_of(FireballKind::Rain, pos, FIRE_RAIN_SPEED)
    }

    fn fireball_of(kind: FireballKind, pos: Vector, speed: Vector) -> SimResult<Self> {
        Actor::with_kind(pos, Vector::ONE, speed, ActorKind::Fireball { kind, start_pos: pos })
    }

    // ── Bounds ──

    pub fn left(&self) -> f64 {
        self.pos.x
    }

    pub fn top(&self) -> f64 {
        self.pos.y
    }

    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.y
    }

    pub fn tag(&self) -> ActorTag {
        match self.kind {
            ActorKind::Plain => ActorTag::Actor,
            ActorKind::Player => ActorTag::Player,
            ActorKind::Coin(_) => ActorTag::Coin,
            ActorKind::Fireball { .. } => ActorTag::Fireball,
        }
    }

    /// Strict overlap of the half-open boxes. Touching edges do not
    /// intersect, and an actor never intersects itself.
    pub fn is_intersect(&self, other: &Actor) -> bool {
        if other.id == self.id {
            return false;
        }
        other.left() < self.right()
            && other.right() > self.left()
            && other.top() < self.bottom()
            && other.bottom() > self.top()
    }

    // ── Behaviour ──

    /// Where a fireball would be after `time` seconds of free flight.
    pub fn next_position(&self, time: f64) -> Vector {
        self.pos.plus(self.speed.times(time))
    }

    /// Next state after `time` seconds. Only fireballs consult the terrain.
    pub fn act(&self, time: f64, map: &dyn ObstacleMap) -> Acted {
        match self.kind {
            ActorKind::Plain | ActorKind::Player => Acted { next: self.clone(), hit: None },
            ActorKind::Coin(spring) => {
                let spring = spring.advance(time);
                let next = Actor { pos: spring.position(), kind: ActorKind::Coin(spring), ..self.clone() };
                Acted { next, hit: None }
            }
            ActorKind::Fireball { .. } => {
                let next_pos = self.next_position(time);
                match map.obstacle_at(next_pos, self.size) {
                    Some(tag) => Acted { next: self.on_obstacle(), hit: Some(tag) },
                    None => Acted { next: Actor { pos: next_pos, ..self.clone() }, hit: None },
                }
            }
        }
    }

    /// Response to a blocked move: rain restarts from its spawn point,
    /// every other fireball reverses its speed in place.
    pub fn on_obstacle(&self) -> Actor {
        match self.kind {
            ActorKind::Fireball { kind: FireballKind::Rain, start_pos } => {
                Actor { pos: start_pos, ..self.clone() }
            }
            ActorKind::Fireball { .. } => Actor { speed: self.speed.times(-1.0), ..self.clone() },
            _ => self.clone(),
        }
    }
}
