//! Player state management.

use crate::game::{Coord, MapId};

/// Where a player stands: a coordinate and the map it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Coordinate on the occupied map.
    pub coord: Coord,
    /// Which map the coordinate refers to.
    pub map: MapId,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(coord: Coord, map: MapId) -> Self {
        Self { coord, map }
    }

    /// A position on the primary map.
    #[must_use]
    pub const fn primary(x: u16, y: u16) -> Self {
        Self::new(Coord::new(x, y), MapId::Primary)
    }

    /// A position on the secondary map.
    #[must_use]
    pub const fn secondary(x: u16, y: u16) -> Self {
        Self::new(Coord::new(x, y), MapId::Secondary)
    }
}

/// State for a single player.
///
/// Keeps a shadow copy of the position it had at the start of the current
/// tick; the session compares the two to decide whether anything must be
/// transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    /// Glyph drawn for this player.
    pub glyph: char,
    position: Position,
    previous: Position,
}

impl Player {
    /// Create a new player standing at `start`.
    #[must_use]
    pub const fn new(glyph: char, start: Position) -> Self {
        Self {
            glyph,
            position: start,
            previous: start,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Position at the start of the current tick.
    #[must_use]
    pub const fn previous(&self) -> Position {
        self.previous
    }

    /// Record the current position as the tick's starting point.
    pub fn snapshot(&mut self) {
        self.previous = self.position;
    }

    /// Move to a new position.
    pub fn place(&mut self, position: Position) {
        self.position = position;
    }

    /// Whether the position differs from the snapshot.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.position != self.previous
    }
}
