//! Session configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::game::{CellType, Coord, GridMap, MapId, MapPair, WarpTable};

/// Settings both peers must agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tick period in milliseconds.
    pub tick_ms: u64,
    /// Glyph of the authoritative peer's player.
    pub authority_glyph: char,
    /// Glyph of the mirror peer's player.
    pub mirror_glyph: char,
    /// Start of the authoritative peer's player on the primary map.
    pub authority_start: Coord,
    /// Start of the mirror peer's player on the primary map.
    pub mirror_start: Coord,
    /// Warp landing points.
    pub warps: WarpTable,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            authority_glyph: 'O',
            mirror_glyph: 'X',
            authority_start: Coord::new(1, 1),
            mirror_start: Coord::new(38, 18),
            warps: WarpTable::default(),
        }
    }
}

impl SessionConfig {
    /// Tick period as a duration.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Read a JSON config file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let config_err = |message: String| SessionError::Config {
            path: path.display().to_string(),
            message,
        };
        let text = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| config_err(e.to_string()))
    }

    /// Check that every start and warp anchor is a standable interior cell.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSetup`] naming the first problem found.
    pub fn validate(&self, maps: &MapPair) -> Result<(), SessionError> {
        if self.tick_ms == 0 {
            return Err(SessionError::InvalidSetup {
                reason: "tick period must be non-zero".to_string(),
            });
        }
        check_standable(maps.get(MapId::Primary), self.authority_start, "authority start")?;
        check_standable(maps.get(MapId::Primary), self.mirror_start, "mirror start")?;
        check_standable(
            maps.get(MapId::Secondary),
            self.warps.to_secondary,
            "secondary warp anchor",
        )?;
        check_standable(
            maps.get(MapId::Primary),
            self.warps.to_primary,
            "primary warp anchor",
        )?;
        Ok(())
    }
}

fn check_standable(map: &GridMap, coord: Coord, what: &str) -> Result<(), SessionError> {
    if !map.is_interior(coord) {
        return Err(SessionError::InvalidSetup {
            reason: format!(
                "{what} {coord} is outside the {}x{} interior",
                map.width(),
                map.height()
            ),
        });
    }
    let cell = map.cell_at(coord);
    if matches!(cell, CellType::Wall | CellType::JumpableWall) {
        return Err(SessionError::InvalidSetup {
            reason: format!("{what} {coord} is a {cell:?}"),
        });
    }
    Ok(())
}
