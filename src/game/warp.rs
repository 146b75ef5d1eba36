//! Warp transitions between the two maps.

use serde::{Deserialize, Serialize};

use crate::game::{Coord, MapId, Position};

/// The two fixed landing points of the map pair.
///
/// Every warp cell leads to the same place: whichever warp a player crosses,
/// it lands on the anchor of the map it is entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpTable {
    /// Landing point when entering the secondary map.
    pub to_secondary: Coord,
    /// Landing point when entering the primary map.
    pub to_primary: Coord,
}

impl Default for WarpTable {
    fn default() -> Self {
        Self {
            to_secondary: Coord::new(2, 2),
            to_primary: Coord::new(37, 17),
        }
    }
}

impl WarpTable {
    /// Anchor for the map being entered.
    #[must_use]
    pub const fn anchor(&self, entering: MapId) -> Coord {
        match entering {
            MapId::Primary => self.to_primary,
            MapId::Secondary => self.to_secondary,
        }
    }

    /// Position after warping away from `from`.
    #[must_use]
    pub const fn transition(&self, from: MapId) -> Position {
        let entering = from.toggled();
        Position::new(self.anchor(entering), entering)
    }
}
