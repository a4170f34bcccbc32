//! Plan text → Level.
//!
//! ## Plan legend (standard dictionary)
//!   'x' = Wall        '!' = Lava
//!   '@' = Player      'o' = Coin
//!   '=' = Horizontal fireball
//!   '|' = Vertical fireball
//!   'v' = Fire rain
//!   anything else = empty
//!
//! Obstacle symbols are fixed; actor symbols come from the dictionary the
//! parser is built with. Symbols the dictionary does not know are skipped
//! without error, and so is any factory that refuses to build its actor.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use rand::RngCore;

use crate::domain::entity::Actor;
use crate::domain::physics::Grid;
use crate::domain::tile::{obstacle_from_symbol, Obstacle};
use crate::domain::vector::Vector;
use crate::error::SimResult;

use super::level::{Level, DEFAULT_FINISH_DELAY};

/// Builds an actor at an integer grid position. Factories that need
/// randomness draw it from the injected source.
pub type ActorFactory = fn(Vector, &mut dyn RngCore) -> SimResult<Actor>;

/// Named actor kinds, used to build dictionaries from configuration.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Spawn {
    Player,
    Coin,
    HorizontalFireball,
    VerticalFireball,
    FireRain,
}

impl Spawn {
    pub fn from_name(name: &str) -> Option<Spawn> {
        match name {
            "player" => Some(Spawn::Player),
            "coin" => Some(Spawn::Coin),
            "fireball-horizontal" => Some(Spawn::HorizontalFireball),
            "fireball-vertical" => Some(Spawn::VerticalFireball),
            "fire-rain" => Some(Spawn::FireRain),
            _ => None,
        }
    }

    pub fn factory(self) -> ActorFactory {
        match self {
            Spawn::Player => spawn_player,
            Spawn::Coin => Actor::coin_random,
            Spawn::HorizontalFireball => spawn_horizontal_fireball,
            Spawn::VerticalFireball => spawn_vertical_fireball,
            Spawn::FireRain => spawn_fire_rain,
        }
    }
}

fn spawn_player(pos: Vector, _rng: &mut dyn RngCore) -> SimResult<Actor> {
    Actor::player(pos)
}

fn spawn_horizontal_fireball(pos: Vector, _rng: &mut dyn RngCore) -> SimResult<Actor> {
    Actor::horizontal_fireball(pos)
}

fn spawn_vertical_fireball(pos: Vector, _rng: &mut dyn RngCore) -> SimResult<Actor> {
    Actor::vertical_fireball(pos)
}

fn spawn_fire_rain(pos: Vector, _rng: &mut dyn RngCore) -> SimResult<Actor> {
    Actor::fire_rain(pos)
}

/// The dictionary every level of the base game is parsed with.
pub fn standard_dictionary() -> HashMap<char, ActorFactory> {
    [
        ('@', Spawn::Player),
        ('o', Spawn::Coin),
        ('=', Spawn::HorizontalFireball),
        ('|', Spawn::VerticalFireball),
        ('v', Spawn::FireRain),
    ]
    .into_iter()
    .map(|(ch, spawn)| (ch, spawn.factory()))
    .collect()
}

#[derive(Clone)]
pub struct LevelParser {
    dictionary: HashMap<char, ActorFactory>,
    finish_delay: i32,
}

impl fmt::Debug for LevelParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut symbols: Vec<char> = self.dictionary.keys().copied().collect();
        symbols.sort_unstable();
        f.debug_struct("LevelParser")
            .field("symbols", &symbols)
            .field("finish_delay", &self.finish_delay)
            .finish()
    }
}

impl Default for LevelParser {
    fn default() -> Self {
        LevelParser::new(standard_dictionary())
    }
}

impl LevelParser {
    pub fn new(dictionary: HashMap<char, ActorFactory>) -> Self {
        LevelParser { dictionary, finish_delay: DEFAULT_FINISH_DELAY }
    }

    /// Standard dictionary with `overrides` layered on top. Override keys
    /// must be a single character and values a known kind name; anything
    /// else is skipped with a warning.
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut dictionary = standard_dictionary();
        for (key, name) in overrides {
            let mut chars = key.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    warn!("symbol {key:?} is not a single character, skipped");
                    continue;
                }
            };
            match Spawn::from_name(name) {
                Some(spawn) => {
                    dictionary.insert(symbol, spawn.factory());
                }
                None => warn!("unknown actor kind {name:?} for symbol {symbol:?}, skipped"),
            }
        }
        LevelParser::new(dictionary)
    }

    pub fn with_finish_delay(mut self, delay: i32) -> Self {
        self.finish_delay = delay;
        self
    }

    pub fn actor_from_symbol(&self, symbol: char) -> Option<ActorFactory> {
        self.dictionary.get(&symbol).copied()
    }

    pub fn obstacle_from_symbol(&self, symbol: char) -> Option<Obstacle> {
        obstacle_from_symbol(symbol)
    }

    pub fn create_grid<S: AsRef<str>>(&self, plan: &[S]) -> Grid {
        Grid::from_rows(plan)
    }

    /// Actors in discovery order: row by row, left to right.
    pub fn create_actors<S: AsRef<str>>(&self, plan: &[S], rng: &mut dyn RngCore) -> Vec<Actor> {
        let mut actors = vec![];
        for (y, row) in plan.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                let Some(factory) = self.actor_from_symbol(ch) else { continue };
                match factory(Vector::new(x as f64, y as f64), rng) {
                    Ok(actor) => actors.push(actor),
                    Err(e) => debug!("skipping {ch:?} at ({x}, {y}): {e}"),
                }
            }
        }
        actors
    }

    pub fn parse<S: AsRef<str>>(&self, plan: &[S], rng: &mut dyn RngCore) -> Level {
        Level::new(self.create_grid(plan), self.create_actors(plan, rng))
            .with_finish_delay(self.finish_delay)
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
