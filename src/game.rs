//! Game layer for Warptag.
//!
//! Implements the rules both peers share:
//! - Grid maps with walls, jumpable walls and warp cells
//! - Players and their per-tick snapshots
//! - Key classification into step and jump moves
//! - Movement and warp resolution

mod input;
mod map;
mod mapfile;
mod movement;
mod player;
mod warp;

pub use input::{Action, Direction, KeyCode, Move, MoveKind};
pub use map::{CellType, Coord, GridMap, MapId, MapPair};
pub use mapfile::{GridError, MAX_DIMENSION, load_map, parse_map};
pub use movement::{resolve, resolve_jump, resolve_step};
pub use player::{Player, Position};
pub use warp::WarpTable;
