//! Static obstacle tags baked into the level grid.
//! An empty (passable) cell is `None` wherever a cell is stored as
//! `Option<Obstacle>`, so "no obstacle" never collides with a real tag.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Obstacle {
    Wall,
    Lava,
}

impl Obstacle {
    /// Does touching this obstacle kill the player?
    pub fn is_lethal(self) -> bool {
        matches!(self, Obstacle::Lava)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Obstacle::Wall => "wall",
            Obstacle::Lava => "lava",
        }
    }
}

impl fmt::Display for Obstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plan symbol → obstacle. Anything but `x` and `!` is passable.
pub fn obstacle_from_symbol(symbol: char) -> Option<Obstacle> {
    match symbol {
        'x' => Some(Obstacle::Wall),
        '!' => Some(Obstacle::Lava),
        _ => None,
    }
}
