//! Level: the static obstacle grid plus the live actor set.
//!
//! ## Ownership
//!
//! The Level is owned by whoever runs the tick loop. Actors only ever see
//! the grid through `ObstacleMap`; their next state is written back by id
//! with `replace_actor`. The only other mutations are the sanctioned ones:
//! `remove_actor` and `player_touched`.
//!
//! ## Status
//!
//! `status` starts `InProgress` and moves one way, to `Won` or `Lost`.
//! After that the loop keeps running for `finish_delay` more ticks, then
//! `is_finished()` turns true.

use log::{debug, info};

use crate::domain::entity::{Actor, ActorId, ActorTag};
use crate::domain::physics::{Grid, ObstacleMap};
use crate::domain::rules::{self, Contact, Status, Transition};
use crate::domain::tile::Obstacle;
use crate::domain::vector::Vector;

pub const DEFAULT_FINISH_DELAY: i32 = 1;

#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    /// Parse order. `actor_at` returns the first match in this order.
    actors: Vec<Actor>,
    /// First player-kind actor at construction; never re-derived.
    player: Option<ActorId>,
    status: Status,
    /// Ticks left to run once the level is decided. Counted down by the
    /// loop through `tick_finish_delay`.
    pub finish_delay: i32,
}

impl Level {
    pub fn new(grid: Grid, actors: Vec<Actor>) -> Self {
        let player = actors.iter().find(|a| a.tag() == ActorTag::Player).map(|a| a.id);
        Level {
            grid,
            actors,
            player,
            status: Status::InProgress,
            finish_delay: DEFAULT_FINISH_DELAY,
        }
    }

    pub fn with_finish_delay(mut self, delay: i32) -> Self {
        self.finish_delay = delay;
        self
    }

    // ── Read access ──

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn player_id(&self) -> Option<ActorId> {
        self.player
    }

    pub fn player(&self) -> Option<&Actor> {
        self.player.and_then(|id| self.actor(id))
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal() && self.finish_delay < 0
    }

    // ── Spatial queries ──

    /// First actor, in stored order, whose box strictly overlaps `actor`.
    /// `actor` itself is never returned.
    pub fn actor_at(&self, actor: &Actor) -> Option<&Actor> {
        self.actors.iter().find(|a| a.is_intersect(actor))
    }

    pub fn obstacle_at(&self, pos: Vector, size: Vector) -> Option<Obstacle> {
        self.grid.obstacle_at(pos, size)
    }

    pub fn no_more_actors(&self, tag: ActorTag) -> bool {
        !self.actors.iter().any(|a| a.tag() == tag)
    }

    pub fn count_actors(&self, tag: ActorTag) -> usize {
        self.actors.iter().filter(|a| a.tag() == tag).count()
    }

    // ── Mutation ──

    /// Write back an actor's next state. Unknown ids (already removed) are
    /// dropped silently.
    pub fn replace_actor(&mut self, next: Actor) {
        if let Some(slot) = self.actors.iter_mut().find(|a| a.id == next.id) {
            *slot = next;
        }
    }

    /// Remove the first actor with this identity. Returns it, or `None`
    /// when it was not present.
    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let idx = self.actors.iter().position(|a| a.id == id)?;
        Some(self.actors.remove(idx))
    }

    /// Apply a player contact to the state machine. Returns what actually
    /// happened, which is `Ignore` once the level is decided.
    pub fn player_touched(&mut self, contact: impl Into<Contact>, actor: Option<ActorId>) -> Transition {
        let contact = contact.into();
        let outcome = rules::transition(self.status, contact);
        match outcome {
            Transition::Ignore => {}
            Transition::Lose => {
                self.status = Status::Lost;
                info!("level lost: player touched {contact}");
            }
            Transition::CollectCoin => {
                if let Some(id) = actor {
                    if self.remove_actor(id).is_some() {
                        debug!("coin {id} collected, {} left", self.count_actors(ActorTag::Coin));
                    }
                }
                if self.no_more_actors(ActorTag::Coin) {
                    self.status = Status::Won;
                    info!("level won: all coins collected");
                }
            }
        }
        outcome
    }

    /// One tick of the finish countdown. No-op while the level is undecided.
    pub fn tick_finish_delay(&mut self) {
        if self.status.is_terminal() {
            self.finish_delay -= 1;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }

    fn open_grid(w: usize, h: usize) -> Grid {
        Grid::from_rows(vec![" ".repeat(w); h].as_slice())
    }

    fn level_with(actors: Vec<Actor>) -> Level {
        Level::new(open_grid(10, 10), actors)
    }

    #[test]
    fn dimensions_come_from_grid() {
        let level = Level::new(Grid::from_rows(&["xx", "xxxxx", "x"]), vec![]);
        assert_eq!(level.width(), 5);
        assert_eq!(level.height(), 3);
        assert_eq!(level.status(), Status::InProgress);
        assert_eq!(level.finish_delay, 1);
        assert!(level.player().is_none());
    }

    #[test]
    fn first_player_is_remembered() {
        let p1 = Actor::player(v(1.0, 1.0)).unwrap();
        let p2 = Actor::player(v(5.0, 1.0)).unwrap();
        let id = p1.id;
        let level = level_with(vec![Actor::coin(v(0.0, 0.0), 0.0).unwrap(), p1, p2]);
        assert_eq!(level.player_id(), Some(id));
    }

    #[test]
    fn actor_at_returns_first_overlap_in_order() {
        let probe = Actor::new(v(0.0, 0.0), v(2.0, 2.0), Vector::ZERO).unwrap();
        let far = Actor::new(v(8.0, 8.0), Vector::ONE, Vector::ZERO).unwrap();
        let a = Actor::new(v(1.0, 1.0), Vector::ONE, Vector::ZERO).unwrap();
        let b = Actor::new(v(0.5, 0.5), Vector::ONE, Vector::ZERO).unwrap();
        let a_id = a.id;
        let level = level_with(vec![far, a, b]);
        assert_eq!(level.actor_at(&probe).map(|x| x.id), Some(a_id));
    }

    #[test]
    fn actor_at_skips_the_probe_itself() {
        let p = Actor::player(v(1.0, 1.0)).unwrap();
        let level = level_with(vec![p.clone()]);
        assert!(level.actor_at(&p).is_none());
        assert!(level.actor_at(level.player().unwrap()).is_none());
    }

    #[test]
    fn actor_at_ignores_touching_edges() {
        let probe = Actor::new(v(0.0, 0.0), Vector::ONE, Vector::ZERO).unwrap();
        let next_door = Actor::new(v(1.0, 0.0), Vector::ONE, Vector::ZERO).unwrap();
        let level = level_with(vec![next_door]);
        assert!(level.actor_at(&probe).is_none());
    }

    #[test]
    fn obstacle_at_delegates_to_grid() {
        let level = Level::new(open_grid(3, 3), vec![]);
        assert_eq!(level.obstacle_at(v(-1.0, 0.0), Vector::ONE), Some(Obstacle::Wall));
        assert_eq!(level.obstacle_at(v(0.0, 3.0), Vector::ONE), Some(Obstacle::Lava));
        assert_eq!(level.obstacle_at(v(1.0, 1.0), Vector::ONE), None);
    }

    #[test]
    fn remove_actor_by_identity() {
        let a = Actor::coin(v(0.0, 0.0), 0.0).unwrap();
        let b = Actor::coin(v(0.0, 0.0), 0.0).unwrap();
        let (a_id, b_id) = (a.id, b.id);
        let mut level = level_with(vec![a, b]);
        assert!(level.remove_actor(b_id).is_some());
        assert_eq!(level.actors().len(), 1);
        assert_eq!(level.actors()[0].id, a_id);
        // absent: no-op
        assert!(level.remove_actor(b_id).is_none());
        assert_eq!(level.actors().len(), 1);
    }

    #[test]
    fn no_more_actors_by_tag() {
        let level = level_with(vec![Actor::horizontal_fireball(v(1.0, 1.0)).unwrap()]);
        assert!(level.no_more_actors(ActorTag::Coin));
        assert!(!level.no_more_actors(ActorTag::Fireball));
        assert!(Level::new(Grid::default(), vec![]).no_more_actors(ActorTag::Player));
    }

    #[test]
    fn last_coin_wins() {
        let coin = Actor::coin(v(2.0, 2.0), 0.0).unwrap();
        let id = coin.id;
        let mut level = level_with(vec![Actor::player(v(0.0, 1.0)).unwrap(), coin]);
        let t = level.player_touched(ActorTag::Coin, Some(id));
        assert_eq!(t, Transition::CollectCoin);
        assert!(level.actor(id).is_none());
        assert_eq!(level.status(), Status::Won);
    }

    #[test]
    fn coin_with_others_left_keeps_playing() {
        let c1 = Actor::coin(v(2.0, 2.0), 0.0).unwrap();
        let c2 = Actor::coin(v(4.0, 2.0), 1.0).unwrap();
        let id = c1.id;
        let mut level = level_with(vec![c1, c2]);
        level.player_touched(ActorTag::Coin, Some(id));
        assert_eq!(level.status(), Status::InProgress);
        assert_eq!(level.count_actors(ActorTag::Coin), 1);
    }

    #[test]
    fn lava_and_fireball_lose() {
        let mut level = level_with(vec![]);
        level.player_touched(Obstacle::Lava, None);
        assert_eq!(level.status(), Status::Lost);

        let f = Actor::horizontal_fireball(v(1.0, 1.0)).unwrap();
        let id = f.id;
        let mut level = level_with(vec![f]);
        level.player_touched(ActorTag::Fireball, Some(id));
        assert_eq!(level.status(), Status::Lost);
        // the fireball is not consumed
        assert!(level.actor(id).is_some());
    }

    #[test]
    fn wall_changes_nothing() {
        let mut level = level_with(vec![]);
        assert_eq!(level.player_touched(Obstacle::Wall, None), Transition::Ignore);
        assert_eq!(level.status(), Status::InProgress);
    }

    #[test]
    fn first_terminal_transition_wins() {
        let coin = Actor::coin(v(2.0, 2.0), 0.0).unwrap();
        let id = coin.id;
        let mut level = level_with(vec![coin]);
        level.player_touched(Obstacle::Lava, None);
        assert_eq!(level.status(), Status::Lost);

        // Collecting the last coin afterwards neither wins nor removes it.
        assert_eq!(level.player_touched(ActorTag::Coin, Some(id)), Transition::Ignore);
        assert_eq!(level.status(), Status::Lost);
        assert!(level.actor(id).is_some());
    }

    #[test]
    fn won_level_ignores_lava() {
        let coin = Actor::coin(v(2.0, 2.0), 0.0).unwrap();
        let id = coin.id;
        let mut level = level_with(vec![coin]);
        level.player_touched(ActorTag::Coin, Some(id));
        level.player_touched(Obstacle::Lava, None);
        level.player_touched(ActorTag::Fireball, None);
        assert_eq!(level.status(), Status::Won);
    }

    #[test]
    fn finish_waits_for_delay() {
        let mut level = level_with(vec![]);
        level.tick_finish_delay();
        assert_eq!(level.finish_delay, 1, "no countdown while in progress");

        level.player_touched(Obstacle::Lava, None);
        assert!(!level.is_finished());
        level.tick_finish_delay();
        assert_eq!(level.finish_delay, 0);
        assert!(!level.is_finished());
        level.tick_finish_delay();
        assert!(level.is_finished());
    }

    #[test]
    fn replace_actor_writes_back_by_id() {
        let f = Actor::horizontal_fireball(v(1.0, 1.0)).unwrap();
        let mut level = level_with(vec![f.clone()]);
        let moved = Actor { pos: v(3.0, 1.0), ..f };
        level.replace_actor(moved);
        assert_eq!(level.actors()[0].pos, v(3.0, 1.0));
    }
}
