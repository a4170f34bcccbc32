//! Events emitted during a simulation step.
//! The presentation layer consumes these for animation/sound.

use crate::domain::entity::ActorId;
use crate::domain::rules::Contact;
use crate::domain::tile::Obstacle;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    CoinCollected { id: ActorId, remaining: usize },
    PlayerKilled { by: Contact },
    FireballBounced { id: ActorId, on: Obstacle },
    FireRainReset { id: ActorId },
    LevelWon,
    LevelLost,
}
