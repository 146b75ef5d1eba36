//! Messages exchanged between the two peers.

use crate::game::{KeyCode, Position};

/// Full state of both players, from the sender's point of view.
///
/// The authoritative peer is the sender; for the receiving mirror, `sender`
/// is its opponent and `receiver` is itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateFrame {
    /// The sending peer's own player.
    pub sender: Position,
    /// The receiving peer's player.
    pub receiver: Position,
}

/// A protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Authoritative to mirror: positions of both players.
    FullState(StateFrame),
    /// Mirror to authoritative: a raw key press.
    KeyPress(KeyCode),
    /// Either direction: the sender is leaving.
    Quit,
}

/// Which fixed-width frame a peer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// [`Message::FullState`] frames, read by the mirror.
    State,
    /// [`Message::KeyPress`] frames, read by the authoritative peer.
    Key,
}

impl FrameKind {
    /// Frame length in bytes, terminator included.
    #[must_use]
    pub const fn frame_len(self) -> usize {
        match self {
            FrameKind::State => super::codec::STATE_FRAME_LEN,
            FrameKind::Key => super::codec::KEY_FRAME_LEN,
        }
    }
}
