//! Fixed-width text codec for protocol frames.
//!
//! Frames are NUL-terminated ASCII in a fixed-size buffer, with no length
//! prefix and no checksum:
//!
//! - state frame (33 bytes): six right-aligned 3-wide decimal fields,
//!   `sender.x sender.y receiver.x receiver.y sender.primary receiver.primary`
//! - key frame (5 bytes): the key code in decimal
//! - quit: the text `quit`
//!
//! Decoding never fails. A field that cannot be scanned stays at zero, and
//! so do all fields after it. A zero x coordinate is therefore ambiguous:
//! it may be a real value or a sign that nothing usable arrived.

use std::fmt::Write as _;

use crate::game::{Coord, KeyCode, MapId, Position};
use crate::protocol::{FrameKind, Message, StateFrame};

/// Four 8-byte slots plus terminator.
pub const STATE_FRAME_LEN: usize = 8 + 8 + 8 + 8 + 1;

/// Four digits plus terminator.
pub const KEY_FRAME_LEN: usize = 4 + 1;

/// Text of the quit sentinel.
pub const QUIT_TEXT: &str = "quit";

/// Width of each numeric field when decoding.
const FIELD_WIDTH: usize = 3;

/// Largest key code that fits a key frame field.
pub const MAX_WIRE_KEY: u16 = 999;

/// Encode a message into its frame.
///
/// State frames are padded to [`STATE_FRAME_LEN`] and key frames to
/// [`KEY_FRAME_LEN`]; the quit sentinel is sent as `quit` plus terminator.
#[must_use]
pub fn encode(msg: &Message) -> Vec<u8> {
    let (mut text, frame_len) = match msg {
        Message::FullState(frame) => {
            let mut text = String::with_capacity(STATE_FRAME_LEN);
            let fields = [
                frame.sender.coord.x,
                frame.sender.coord.y,
                frame.receiver.coord.x,
                frame.receiver.coord.y,
                u16::from(frame.sender.map.is_primary()),
                u16::from(frame.receiver.map.is_primary()),
            ];
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    text.push(' ');
                }
                let _ = write!(text, "{field:3}");
            }
            (text, STATE_FRAME_LEN)
        }
        Message::KeyPress(key) => (key.0.to_string(), KEY_FRAME_LEN),
        Message::Quit => (QUIT_TEXT.to_string(), QUIT_TEXT.len() + 1),
    };

    text.truncate(frame_len - 1);
    let mut bytes = text.into_bytes();
    bytes.resize(frame_len, 0);
    bytes
}

/// Decode one frame read by a peer expecting `expect` frames.
#[must_use]
pub fn decode(bytes: &[u8], expect: FrameKind) -> Message {
    let text = frame_text(bytes);
    if text == QUIT_TEXT {
        return Message::Quit;
    }
    match expect {
        FrameKind::State => Message::FullState(decode_state(&text)),
        FrameKind::Key => Message::KeyPress(decode_key(&text)),
    }
}

/// Text up to the first terminator.
fn frame_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn decode_state(text: &str) -> StateFrame {
    let [sx, sy, rx, ry, s_primary, r_primary] = scan_fields::<6>(text);
    StateFrame {
        sender: Position::new(
            Coord::new(wire_coord(sx), wire_coord(sy)),
            MapId::from_primary_flag(s_primary != 0),
        ),
        receiver: Position::new(
            Coord::new(wire_coord(rx), wire_coord(ry)),
            MapId::from_primary_flag(r_primary != 0),
        ),
    }
}

fn decode_key(text: &str) -> KeyCode {
    let [code] = scan_fields::<1>(text);
    KeyCode(u16::try_from(code).unwrap_or(0))
}

fn wire_coord(value: i32) -> u16 {
    u16::try_from(value).unwrap_or(0)
}

/// Scan up to `N` whitespace-separated integers, each at most
/// [`FIELD_WIDTH`] characters wide (sign included). Scanning stops at the
/// first field that does not start with a digit.
fn scan_fields<const N: usize>(text: &str) -> [i32; N] {
    let mut out = [0; N];
    let mut rest = text.trim_start().as_bytes();

    for slot in &mut out {
        let mut len = 0;
        let mut negative = false;
        if let Some(&sign @ (b'+' | b'-')) = rest.first() {
            negative = sign == b'-';
            len = 1;
        }
        let digits_start = len;
        while len < FIELD_WIDTH && rest.get(len).is_some_and(u8::is_ascii_digit) {
            len += 1;
        }
        if len == digits_start {
            break;
        }

        let value = rest[digits_start..len]
            .iter()
            .fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0'));
        *slot = if negative { -value } else { value };

        rest = &rest[len..];
        let skip = rest
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(rest.len());
        rest = &rest[skip..];
    }
    out
}
