//! Key codes and their classification into moves.
//!
//! Key codes keep the curses numbering so that both peers agree on what a
//! forwarded key means. Each direction has two keys: a step key (`i`, `j`,
//! `k`, `l`) and a jump key (the arrow keys).

use serde::{Deserialize, Serialize};

/// A raw key code as captured locally or forwarded by the mirror peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// Step up.
    pub const STEP_UP: Self = Self(b'i' as u16);
    /// Step left.
    pub const STEP_LEFT: Self = Self(b'j' as u16);
    /// Step down.
    pub const STEP_DOWN: Self = Self(b'k' as u16);
    /// Step right.
    pub const STEP_RIGHT: Self = Self(b'l' as u16);
    /// Jump down (curses `KEY_DOWN`).
    pub const JUMP_DOWN: Self = Self(258);
    /// Jump up (curses `KEY_UP`).
    pub const JUMP_UP: Self = Self(259);
    /// Jump left (curses `KEY_LEFT`).
    pub const JUMP_LEFT: Self = Self(260);
    /// Jump right (curses `KEY_RIGHT`).
    pub const JUMP_RIGHT: Self = Self(261);
    /// Immediate local quit.
    pub const QUIT: Self = Self(b'q' as u16);

    /// Key code for a printable character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        u16::try_from(u32::from(c)).ok().map(Self)
    }

    /// Classify the key.
    #[must_use]
    pub const fn action(self) -> Action {
        match self {
            Self::STEP_UP => Action::Move(Move::step(Direction::Up)),
            Self::STEP_DOWN => Action::Move(Move::step(Direction::Down)),
            Self::STEP_LEFT => Action::Move(Move::step(Direction::Left)),
            Self::STEP_RIGHT => Action::Move(Move::step(Direction::Right)),
            Self::JUMP_UP => Action::Move(Move::jump(Direction::Up)),
            Self::JUMP_DOWN => Action::Move(Move::jump(Direction::Down)),
            Self::JUMP_LEFT => Action::Move(Move::jump(Direction::Left)),
            Self::JUMP_RIGHT => Action::Move(Move::jump(Direction::Right)),
            Self::QUIT => Action::Quit,
            _ => Action::None,
        }
    }
}

/// One of the four grid directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// All directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// How far a move tries to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Ordinary one-cell move, may trigger a warp.
    Step,
    /// Two-cell vault over a jumpable wall.
    Jump,
}

/// A direction crossed with a move kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Where to go.
    pub direction: Direction,
    /// Step or jump.
    pub kind: MoveKind,
}

impl Move {
    /// A step move.
    #[must_use]
    pub const fn step(direction: Direction) -> Self {
        Self {
            direction,
            kind: MoveKind::Step,
        }
    }

    /// A jump move.
    #[must_use]
    pub const fn jump(direction: Direction) -> Self {
        Self {
            direction,
            kind: MoveKind::Jump,
        }
    }
}

/// What a key asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Attempt a move.
    Move(Move),
    /// Leave the session.
    Quit,
    /// Key has no meaning.
    None,
}
