//! Synchronization protocol between the authoritative and mirror peers.
//!
//! The authoritative peer computes movement for both players and pushes
//! [`Message::FullState`] whenever something changed. The mirror only
//! forwards raw keys as [`Message::KeyPress`] and applies whatever state it
//! receives. Either side may replace a message with [`Message::Quit`].

pub mod codec;
mod channel;
mod message;

pub use channel::{SyncChannel, TcpChannel};
pub use message::{FrameKind, Message, StateFrame};
