//! Lava Runner simulation core.
//!
//! A level is a grid of static obstacles (walls, lava) plus a set of moving
//! actors (the player, coins, fireballs). `sim::parser` builds a `Level`
//! from a text plan, `sim::step` advances it, and `sim::runner` plays whole
//! level packs headless.

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use domain::entity::{Actor, ActorId, ActorKind, ActorTag};
pub use domain::rules::Status;
pub use domain::vector::Vector;
pub use error::{SimError, SimResult};
pub use sim::level::Level;
pub use sim::parser::LevelParser;
pub use sim::step::{step, FrameInput};
