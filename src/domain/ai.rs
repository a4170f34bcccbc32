//! Autopilot: steers the player toward the nearest coin.
//!
//! Greedy, no pathfinding. Each frame it picks the closest coin, walks
//! toward it and jumps when:
//!   - the coin is above the player's head
//!   - a wall blocks the next step
//!   - the next cell down is lava
//!
//! Good enough to clear simple plans headless; it is not a solver.

use super::entity::{Actor, ActorTag};
use super::physics::ObstacleMap;
use super::tile::Obstacle;
use super::vector::Vector;

/// Horizontal distance under which the player counts as lined up.
const ALIGN_EPSILON: f64 = 0.25;
/// How far ahead a wall is probed.
const LOOKAHEAD: f64 = 0.2;

/// Direction to walk (-1, 0, 1) and whether to jump.
pub fn seek_coin(player: &Actor, actors: &[Actor], map: &dyn ObstacleMap) -> (i32, bool) {
    let Some(coin) = nearest(player, actors, ActorTag::Coin) else { return (0, false) };

    let (px, _) = center(player);
    let (cx, _) = center(coin);

    let dx = if cx - px > ALIGN_EPSILON {
        1
    } else if px - cx > ALIGN_EPSILON {
        -1
    } else {
        0
    };

    let coin_above = coin.bottom() < player.top() + 0.5 && (cx - px).abs() < 2.0;
    let mut jump = coin_above;
    if dx != 0 {
        let step = dx as f64;
        let ahead = player.pos.plus(Vector::new(step * LOOKAHEAD, 0.0));
        let wall_ahead = map.obstacle_at(ahead, player.size) == Some(Obstacle::Wall);
        let below_next = player.pos.plus(Vector::new(step, 1.0));
        let lava_ahead = map.obstacle_at(below_next, player.size) == Some(Obstacle::Lava);
        jump |= wall_ahead || lava_ahead;
    }

    (dx, jump)
}

fn center(a: &Actor) -> (f64, f64) {
    (a.pos.x + a.size.x / 2.0, a.pos.y + a.size.y / 2.0)
}

fn nearest<'a>(from: &Actor, actors: &'a [Actor], tag: ActorTag) -> Option<&'a Actor> {
    let (fx, fy) = center(from);
    actors.iter()
        .filter(|a| a.tag() == tag)
        .min_by(|a, b| {
            let da = distance_sq(center(a), (fx, fy));
            let db = distance_sq(center(b), (fx, fy));
            da.total_cmp(&db)
        })
}

fn distance_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)
}
