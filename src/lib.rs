// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Warptag: a two-peer real-time chase game over two linked grid maps.
//!
//! One peer is authoritative: it resolves movement for both players and
//! pushes the resulting positions. The other peer mirrors that state and
//! forwards its raw keys. Stepping onto a warp cell moves a player to the
//! fixed anchor on the other map. The game ends when both players share a
//! cell: the authoritative side wins and the mirror side loses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Session (tick loop, roles)        │
//! ├──────────────────┬──────────────────┤
//! │  Game rules      │  Sync protocol   │
//! │  (maps, moves)   │  (frames, TCP)   │
//! └──────────────────┴──────────────────┘
//! ```

pub mod error;
pub mod game;
pub mod protocol;
pub mod session;

pub use error::{ChannelError, SessionError};

// Re-export key types at crate root for convenience
pub use game::{CellType, Coord, GridMap, KeyCode, MapId, MapPair, Player, Position};
pub use protocol::{Message, SyncChannel, TcpChannel};
pub use session::{GameSession, Outcome, Role, SessionConfig, Ticker};
