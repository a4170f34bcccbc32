//! Win / lose rules, truth-table driven.
//!
//! Pure functions: they decide what a contact means, the Level applies it.
//!
//! ## Contact Truth Table
//! ┌───────────────────────┬──────────────────────────────────────┐
//! │ Contact               │ Effect (status = InProgress only)    │
//! ├───────────────────────┼──────────────────────────────────────┤
//! │ Lava (grid)           │ Lost                                 │
//! │ Fireball (actor)      │ Lost                                 │
//! │ Coin (actor)          │ remove coin; Won when none remain    │
//! │ Wall / Player / Actor │ nothing                              │
//! └───────────────────────┴──────────────────────────────────────┘
//!
//! Once status has left `InProgress` every contact is ignored: the first
//! terminal transition wins.

use std::fmt;

use super::entity::ActorTag;
use super::tile::Obstacle;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Status {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::InProgress
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::InProgress => "in progress",
            Status::Won => "won",
            Status::Lost => "lost",
        })
    }
}

/// What the player touched: a grid obstacle or another actor's tag.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    Obstacle(Obstacle),
    Actor(ActorTag),
}

impl From<Obstacle> for Contact {
    fn from(o: Obstacle) -> Self {
        Contact::Obstacle(o)
    }
}

impl From<ActorTag> for Contact {
    fn from(t: ActorTag) -> Self {
        Contact::Actor(t)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contact::Obstacle(o) => fmt::Display::fmt(o, f),
            Contact::Actor(t) => fmt::Display::fmt(t, f),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transition {
    /// Contact ignored: harmless, or the level is already decided.
    Ignore,
    Lose,
    CollectCoin,
}

pub fn transition(status: Status, contact: Contact) -> Transition {
    if status.is_terminal() {
        return Transition::Ignore;
    }
    match contact {
        Contact::Obstacle(o) if o.is_lethal() => Transition::Lose,
        Contact::Obstacle(_) => Transition::Ignore,
        Contact::Actor(ActorTag::Fireball) => Transition::Lose,
        Contact::Actor(ActorTag::Coin) => Transition::CollectCoin,
        Contact::Actor(ActorTag::Player | ActorTag::Actor) => Transition::Ignore,
    }
}
