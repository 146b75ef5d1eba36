//! Fixed-rate tick scheduler.
//!
//! Keyboard and network input arrive as [`InputEvent`]s on one queue. Each
//! tick is a single window of the configured period: the scheduler collects
//! events until the window closes, keeps the first keystroke and discards
//! the rest, and hands at most one remote message to the session. Remote
//! messages beyond the first stay queued for later ticks.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::game::KeyCode;
use crate::protocol::Message;

/// Something that happened between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A local key press.
    Key(KeyCode),
    /// A frame from the peer.
    Remote(Message),
    /// The peer connection ended.
    Disconnected,
}

/// Input handed to the session for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    /// Local key captured this tick.
    pub key: Option<KeyCode>,
    /// Peer message delivered this tick.
    pub message: Option<Message>,
}

impl TickInput {
    /// Whether nothing arrived.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.key.is_none() && self.message.is_none()
    }
}

/// Turns the event queue into one [`TickInput`] per period.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    events: Receiver<InputEvent>,
    backlog: VecDeque<Message>,
    disconnected: bool,
    discarded_keys: u64,
}

impl Ticker {
    /// Create a scheduler reading from `events`.
    #[must_use]
    pub fn new(period: Duration, events: Receiver<InputEvent>) -> Self {
        Self {
            period,
            events,
            backlog: VecDeque::new(),
            disconnected: false,
            discarded_keys: 0,
        }
    }

    /// Create a scheduler together with the sender its producers use.
    #[must_use]
    pub fn with_sender(period: Duration) -> (Sender<InputEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(period, rx))
    }

    /// Tick period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Keystrokes dropped so far because another key won their window.
    #[must_use]
    pub const fn discarded_keys(&self) -> u64 {
        self.discarded_keys
    }

    /// Block for one full window and return what arrived.
    ///
    /// Never returns before the window has elapsed. Once the peer is gone
    /// and no queued message is left, every tick delivers
    /// [`Message::Quit`].
    pub fn next_tick(&mut self) -> TickInput {
        let deadline = Instant::now() + self.period;
        let mut keys = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.events.recv_timeout(remaining) {
                Ok(InputEvent::Key(key)) => keys.push(key),
                Ok(InputEvent::Remote(msg)) => self.backlog.push_back(msg),
                Ok(InputEvent::Disconnected) => self.disconnected = true,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    thread::sleep(remaining);
                    break;
                }
            }
        }

        let key = self.discard_stray_keys(&keys);
        let message = self
            .backlog
            .pop_front()
            .or_else(|| self.disconnected.then_some(Message::Quit));

        TickInput { key, message }
    }

    /// Keep the first keystroke of the window, drop the backlog behind it.
    fn discard_stray_keys(&mut self, keys: &[KeyCode]) -> Option<KeyCode> {
        let (first, rest) = keys.split_first()?;
        if !rest.is_empty() {
            self.discarded_keys += u64::try_from(rest.len()).unwrap_or(u64::MAX);
            debug!(discarded = rest.len(), "dropping keystrokes buffered during the tick");
        }
        Some(*first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use crate::protocol::StateFrame;

    const PERIOD: Duration = Duration::from_millis(20);

    fn state(x: u16) -> Message {
        Message::FullState(StateFrame {
            sender: Position::primary(x, 1),
            receiver: Position::primary(1, 1),
        })
    }

    #[test]
    fn test_idle_tick_waits_full_period() {
        let (_tx, mut ticker) = Ticker::with_sender(PERIOD);
        let start = Instant::now();
        let input = ticker.next_tick();
        assert!(input.is_idle());
        assert!(start.elapsed() >= PERIOD);
    }

    #[test]
    fn test_first_key_wins_window() {
        let (tx, mut ticker) = Ticker::with_sender(PERIOD);
        tx.send(InputEvent::Key(KeyCode::STEP_UP)).unwrap();
        tx.send(InputEvent::Key(KeyCode::STEP_DOWN)).unwrap();
        tx.send(InputEvent::Key(KeyCode::STEP_LEFT)).unwrap();

        let input = ticker.next_tick();
        assert_eq!(input.key, Some(KeyCode::STEP_UP));
        assert_eq!(ticker.discarded_keys(), 2);

        // The backlog is gone, not deferred.
        assert!(ticker.next_tick().is_idle());
    }

    #[test]
    fn test_remote_messages_are_queued_across_ticks() {
        let (tx, mut ticker) = Ticker::with_sender(PERIOD);
        tx.send(InputEvent::Remote(state(3))).unwrap();
        tx.send(InputEvent::Remote(state(4))).unwrap();

        assert_eq!(ticker.next_tick().message, Some(state(3)));
        assert_eq!(ticker.next_tick().message, Some(state(4)));
        assert_eq!(ticker.next_tick().message, None);
    }

    #[test]
    fn test_disconnect_becomes_quit_after_backlog() {
        let (tx, mut ticker) = Ticker::with_sender(PERIOD);
        tx.send(InputEvent::Remote(state(3))).unwrap();
        tx.send(InputEvent::Disconnected).unwrap();

        assert_eq!(ticker.next_tick().message, Some(state(3)));
        assert_eq!(ticker.next_tick().message, Some(Message::Quit));
    }

    #[test]
    fn test_dropped_producers_keep_cadence() {
        let (tx, mut ticker) = Ticker::with_sender(PERIOD);
        drop(tx);
        let start = Instant::now();
        assert!(ticker.next_tick().is_idle());
        assert!(start.elapsed() >= PERIOD);
    }
}
