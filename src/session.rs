//! Game sessions.
//!
//! A [`GameSession`] owns both maps, both players and the outbound channel.
//! It runs in one of two roles:
//!
//! - [`Role::Authoritative`] resolves movement for both players, from its
//!   own keys and the keys the mirror forwards, and sends
//!   [`Message::FullState`] whenever a position changed.
//! - [`Role::Mirror`] never resolves movement. It applies received state
//!   and forwards its own keys.
//!
//! ```text
//! Running ──► Finished(Won | Lost | Quit) ──► Closed
//! ```
//!
//! A catch is checked before quit, so a catch on the same tick as a quit
//! still counts. Leaving `Running` by any path sends one best-effort
//! [`Message::Quit`] and closes the channel.

mod config;
mod ticker;

pub use config::SessionConfig;
pub use ticker::{InputEvent, TickInput, Ticker};

use tracing::{debug, info, trace, warn};

use crate::error::SessionError;
use crate::game::{Action, KeyCode, MapId, MapPair, Player, Position, WarpTable, resolve};
use crate::protocol::{FrameKind, Message, StateFrame, SyncChannel, codec};

/// Which half of the protocol a peer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Computes movement for both players.
    Authoritative,
    /// Applies state computed by the other peer.
    Mirror,
}

impl Role {
    /// Frames this role reads from the peer.
    #[must_use]
    pub const fn inbound(self) -> FrameKind {
        match self {
            Role::Authoritative => FrameKind::Key,
            Role::Mirror => FrameKind::State,
        }
    }
}

/// Who ended a session by quitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitSource {
    /// The local quit key.
    Local,
    /// A quit notice or disconnect from the peer.
    Remote,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Authoritative side: the two players met.
    Won,
    /// Mirror side: the two players met.
    Lost,
    /// Someone quit first.
    Quit(QuitSource),
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ticks are being processed.
    Running,
    /// The loop has ended; the channel is still open.
    Finished(Outcome),
    /// The quit notice was sent and the channel released.
    Closed(Outcome),
}

/// One peer's view of a game.
#[derive(Debug)]
pub struct GameSession<C: SyncChannel> {
    role: Role,
    maps: MapPair,
    warps: WarpTable,
    me: Player,
    peer: Player,
    channel: C,
    state: SessionState,
    tick: u64,
}

impl<C: SyncChannel> GameSession<C> {
    /// Set up a session after validating `config` against `maps`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSetup`] if a start or anchor is not a
    /// standable interior cell.
    pub fn new(
        role: Role,
        maps: MapPair,
        config: &SessionConfig,
        channel: C,
    ) -> Result<Self, SessionError> {
        config.validate(&maps)?;

        let authority = Player::new(
            config.authority_glyph,
            Position::new(config.authority_start, MapId::Primary),
        );
        let mirror = Player::new(
            config.mirror_glyph,
            Position::new(config.mirror_start, MapId::Primary),
        );
        let (me, peer) = match role {
            Role::Authoritative => (authority, mirror),
            Role::Mirror => (mirror, authority),
        };

        info!(?role, me = ?me.position(), peer = ?peer.position(), "session ready");
        Ok(Self {
            role,
            maps,
            warps: config.warps,
            me,
            peer,
            channel,
            state: SessionState::Running,
            tick: 0,
        })
    }

    /// This peer's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The local player.
    #[must_use]
    pub const fn me(&self) -> &Player {
        &self.me
    }

    /// The opponent.
    #[must_use]
    pub const fn peer(&self) -> &Player {
        &self.peer
    }

    /// Both maps.
    #[must_use]
    pub const fn maps(&self) -> &MapPair {
        &self.maps
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Ticks processed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The outbound channel.
    #[must_use]
    pub const fn channel(&self) -> &C {
        &self.channel
    }

    /// Whether both players stand on the same cell of the same map.
    #[must_use]
    pub fn caught(&self) -> bool {
        self.me.position() == self.peer.position()
    }

    /// Process one tick of input.
    ///
    /// Returns the outcome on the tick the session finishes, `None` while it
    /// keeps running. Once finished, further calls return the same outcome
    /// without doing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if sending to the peer fails.
    pub fn step(&mut self, input: TickInput) -> Result<Option<Outcome>, SessionError> {
        match self.state {
            SessionState::Running => {}
            SessionState::Finished(outcome) | SessionState::Closed(outcome) => {
                return Ok(Some(outcome));
            }
        }
        self.tick += 1;
        trace!(tick = self.tick, ?input, "tick");

        match self.role {
            Role::Authoritative => self.step_authoritative(input),
            Role::Mirror => self.step_mirror(input),
        }
    }

    fn step_authoritative(&mut self, input: TickInput) -> Result<Option<Outcome>, SessionError> {
        if self.caught() {
            return Ok(Some(self.finish(Outcome::Won)));
        }
        if let Some(source) = quit_source(&input) {
            return Ok(Some(self.finish(Outcome::Quit(source))));
        }

        self.me.snapshot();
        self.peer.snapshot();

        if let Some(key) = input.key {
            let next = self.resolve_key(self.me.position(), key);
            self.me.place(next);
        }
        match input.message {
            Some(Message::KeyPress(key)) => {
                let next = self.resolve_key(self.peer.position(), key);
                self.peer.place(next);
            }
            Some(other) => debug!(?other, "ignoring unexpected message"),
            None => {}
        }

        if self.me.has_moved() || self.peer.has_moved() {
            let frame = StateFrame {
                sender: self.me.position(),
                receiver: self.peer.position(),
            };
            self.channel.send(&Message::FullState(frame))?;
        }

        if self.caught() {
            return Ok(Some(self.finish(Outcome::Won)));
        }
        Ok(None)
    }

    fn step_mirror(&mut self, input: TickInput) -> Result<Option<Outcome>, SessionError> {
        if self.caught() {
            return Ok(Some(self.finish(Outcome::Lost)));
        }
        if let Some(source) = quit_source(&input) {
            return Ok(Some(self.finish(Outcome::Quit(source))));
        }

        self.me.snapshot();
        self.peer.snapshot();

        match input.message {
            Some(Message::FullState(frame)) => self.apply_state(frame),
            Some(other) => debug!(?other, "ignoring unexpected message"),
            None => {}
        }

        if self.caught() {
            return Ok(Some(self.finish(Outcome::Lost)));
        }

        if let Some(key) = input.key {
            if key.0 > codec::MAX_WIRE_KEY {
                debug!(?key, "key code does not fit a key frame");
            } else {
                self.channel.send(&Message::KeyPress(key))?;
            }
        }
        Ok(None)
    }

    /// Zero doubles as "nothing usable arrived" for the local x coordinate,
    /// so such frames are skipped even when zero was meant.
    fn apply_state(&mut self, frame: StateFrame) {
        if frame.receiver.coord.x == 0 {
            debug!(?frame, "state frame with zero x; treating as no update");
            return;
        }
        self.me.place(frame.receiver);
        self.peer.place(frame.sender);
    }

    fn resolve_key(&self, at: Position, key: KeyCode) -> Position {
        match key.action() {
            Action::Move(mv) => resolve(self.maps.get(at.map), &self.warps, at, mv),
            Action::Quit | Action::None => at,
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        info!(?outcome, tick = self.tick, "session finished");
        self.state = SessionState::Finished(outcome);
        outcome
    }

    /// Run ticks until the session finishes, then close it.
    ///
    /// `on_tick` sees the session once before the first tick and after
    /// every tick, including the last one.
    ///
    /// # Errors
    ///
    /// Returns an error if sending to the peer fails. The session is closed
    /// either way.
    pub fn run<F>(&mut self, ticker: &mut Ticker, mut on_tick: F) -> Result<Outcome, SessionError>
    where
        F: FnMut(&Self),
    {
        on_tick(&*self);
        let result = loop {
            let input = ticker.next_tick();
            match self.step(input) {
                Ok(Some(outcome)) => {
                    on_tick(&*self);
                    break Ok(outcome);
                }
                Ok(None) => on_tick(&*self),
                Err(e) => break Err(e),
            }
        };
        self.close();
        result
    }

    /// Send the quit notice once and release the channel.
    ///
    /// A session that never finished is closed as a local quit.
    pub fn close(&mut self) {
        let outcome = match self.state {
            SessionState::Closed(_) => return,
            SessionState::Finished(outcome) => outcome,
            SessionState::Running => Outcome::Quit(QuitSource::Local),
        };
        if let Err(e) = self.channel.send(&Message::Quit) {
            warn!(error = %e, "could not notify peer");
        }
        self.channel.close();
        self.state = SessionState::Closed(outcome);
    }
}

impl<C: SyncChannel> Drop for GameSession<C> {
    fn drop(&mut self) {
        self.close();
    }
}

fn quit_source(input: &TickInput) -> Option<QuitSource> {
    if input.key.is_some_and(|k| k.action() == Action::Quit) {
        Some(QuitSource::Local)
    } else if input.message == Some(Message::Quit) {
        Some(QuitSource::Remote)
    } else {
        None
    }
}
