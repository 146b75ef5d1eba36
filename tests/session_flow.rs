//! End-to-end session scenarios: two peers exchanging real protocol
//! messages, first over an in-memory link and then over TCP loopback.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)] // Test code can use unwrap

use std::cell::RefCell;
use std::collections::VecDeque;
use std::net::TcpListener;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use warptag::error::ChannelError;
use warptag::game::{CellType, Coord, GridMap, MapPair, Position};
use warptag::protocol::{Message, StateFrame, SyncChannel, TcpChannel};
use warptag::session::{
    GameSession, Outcome, QuitSource, Role, SessionConfig, SessionState, TickInput, Ticker,
};
use warptag::KeyCode;

type Queue = Rc<RefCell<VecDeque<Message>>>;

/// One direction of an in-memory link.
#[derive(Debug)]
struct Pipe {
    out: Queue,
    sent: usize,
    closed: bool,
}

impl SyncChannel for Pipe {
    fn send(&mut self, msg: &Message) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.sent += 1;
        self.out.borrow_mut().push_back(*msg);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

struct Match {
    host: GameSession<Pipe>,
    guest: GameSession<Pipe>,
    to_host: Queue,
    to_guest: Queue,
}

impl Match {
    fn new(maps: &MapPair, config: &SessionConfig) -> Self {
        let to_host: Queue = Rc::default();
        let to_guest: Queue = Rc::default();
        let pipe = |out: &Queue| Pipe {
            out: Rc::clone(out),
            sent: 0,
            closed: false,
        };
        let host =
            GameSession::new(Role::Authoritative, maps.clone(), config, pipe(&to_guest)).unwrap();
        let guest = GameSession::new(Role::Mirror, maps.clone(), config, pipe(&to_host)).unwrap();
        Self {
            host,
            guest,
            to_host,
            to_guest,
        }
    }

    fn standard() -> Self {
        Self::new(&standard_maps(), &SessionConfig::default())
    }

    /// One tick on each side. The host goes first, so its frames reach the
    /// guest within the same tick and the guest's arrive one tick later.
    fn tick(
        &mut self,
        host_key: Option<KeyCode>,
        guest_key: Option<KeyCode>,
    ) -> (Option<Outcome>, Option<Outcome>) {
        let host_msg = self.to_host.borrow_mut().pop_front();
        let host = self
            .host
            .step(TickInput {
                key: host_key,
                message: host_msg,
            })
            .unwrap();
        let guest_msg = self.to_guest.borrow_mut().pop_front();
        let guest = self
            .guest
            .step(TickInput {
                key: guest_key,
                message: guest_msg,
            })
            .unwrap();
        (host, guest)
    }

    fn in_sync(&self) -> bool {
        self.host.me().position() == self.guest.peer().position()
            && self.host.peer().position() == self.guest.me().position()
    }
}

fn standard_maps() -> MapPair {
    MapPair::new(
        GridMap::walled(40, 20).unwrap(),
        GridMap::walled(40, 10).unwrap(),
    )
}

#[test]
fn test_idle_ticks_exchange_nothing() {
    let mut m = Match::standard();
    for _ in 0..10 {
        assert_eq!(m.tick(None, None), (None, None));
    }
    assert_eq!(m.host.channel().sent, 0);
    assert_eq!(m.guest.channel().sent, 0);
    assert_eq!(m.host.me().position(), Position::primary(1, 1));
    assert_eq!(m.guest.me().position(), Position::primary(38, 18));
    assert!(m.in_sync());
}

#[test]
fn test_guest_key_moves_guest_on_both_sides() {
    let mut m = Match::standard();
    m.tick(None, Some(KeyCode::STEP_UP));
    // Only forwarded so far; the guest never moves itself.
    assert_eq!(m.guest.me().position(), Position::primary(38, 18));

    m.tick(None, None);
    assert_eq!(m.host.peer().position(), Position::primary(38, 17));
    assert_eq!(m.guest.me().position(), Position::primary(38, 17));
    assert!(m.in_sync());
}

#[test]
fn test_blocked_moves_are_suppressed() {
    let mut m = Match::standard();
    m.tick(Some(KeyCode::STEP_UP), None);
    m.tick(Some(KeyCode::JUMP_LEFT), None);
    assert_eq!(m.host.channel().sent, 0);

    m.tick(Some(KeyCode::STEP_DOWN), None);
    assert_eq!(m.host.channel().sent, 1);
    assert!(m.in_sync());
}

#[test]
fn test_unknown_keys_are_forwarded_but_inert() {
    let mut m = Match::standard();
    m.tick(None, KeyCode::from_char('z'));
    assert_eq!(m.guest.channel().sent, 1);
    m.tick(None, None);
    assert_eq!(m.host.channel().sent, 0);
    assert_eq!(m.host.peer().position(), Position::primary(38, 18));
}

#[test]
fn test_catch_is_win_and_loss() {
    let config = SessionConfig {
        mirror_start: Coord::new(3, 1),
        ..SessionConfig::default()
    };
    let mut m = Match::new(&standard_maps(), &config);

    m.tick(None, Some(KeyCode::STEP_LEFT));
    // Both land on (2, 1) in the same tick; the final state reaches the
    // guest before anything else.
    let (host, guest) = m.tick(Some(KeyCode::STEP_RIGHT), None);
    assert_eq!(host, Some(Outcome::Won));
    assert_eq!(guest, Some(Outcome::Lost));
    assert_eq!(m.guest.me().position(), Position::primary(2, 1));

    m.host.close();
    m.guest.close();
    assert_eq!(m.to_guest.borrow().back(), Some(&Message::Quit));
    assert_eq!(m.to_host.borrow().back(), Some(&Message::Quit));
}

#[test]
fn test_guest_quit_reaches_host() {
    let mut m = Match::standard();
    let (_, guest) = m.tick(None, Some(KeyCode::QUIT));
    assert_eq!(guest, Some(Outcome::Quit(QuitSource::Local)));
    m.guest.close();
    assert_eq!(m.to_host.borrow().len(), 1);

    let (host, _) = m.tick(None, None);
    assert_eq!(host, Some(Outcome::Quit(QuitSource::Remote)));
    m.host.close();
    assert!(matches!(m.host.state(), SessionState::Closed(_)));
}

#[test]
fn test_warp_round_trip_stays_in_sync() {
    let mut maps = standard_maps();
    maps.primary.set(Coord::new(38, 17), CellType::Warp);
    maps.secondary.set(Coord::new(2, 1), CellType::Warp);
    let mut m = Match::new(&maps, &SessionConfig::default());

    m.tick(None, Some(KeyCode::STEP_UP));
    m.tick(None, None);
    assert_eq!(m.guest.me().position(), Position::secondary(2, 2));

    m.tick(None, Some(KeyCode::STEP_UP));
    m.tick(None, None);
    assert_eq!(m.guest.me().position(), Position::primary(37, 17));
    assert!(m.in_sync());
}

#[test]
fn test_zero_x_state_is_ignored() {
    let mut m = Match::standard();
    m.to_guest.borrow_mut().push_back(Message::FullState(StateFrame {
        sender: Position::primary(9, 9),
        receiver: Position::primary(0, 4),
    }));
    m.tick(None, None);
    assert_eq!(m.guest.me().position(), Position::primary(38, 18));
    assert_eq!(m.guest.peer().position(), Position::primary(1, 1));
}

/// Tick until a peer message arrives, then apply it.
fn tick_until_message<C: SyncChannel>(
    session: &mut GameSession<C>,
    ticker: &mut Ticker,
) -> Option<Outcome> {
    for _ in 0..100 {
        let input = ticker.next_tick();
        if input.message.is_some() {
            return session.step(input).unwrap();
        }
    }
    panic!("no message from peer");
}

#[test]
fn test_tcp_loopback_session() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let acceptor = thread::spawn(move || TcpChannel::accept_from(&listener).unwrap());
    let guest_channel = TcpChannel::connect(addr).unwrap();
    let host_channel = acceptor.join().unwrap();

    let period = Duration::from_millis(10);
    let (host_events, mut host_ticker) = Ticker::with_sender(period);
    let (guest_events, mut guest_ticker) = Ticker::with_sender(period);
    host_channel
        .spawn_reader(Role::Authoritative.inbound(), host_events)
        .unwrap();
    guest_channel
        .spawn_reader(Role::Mirror.inbound(), guest_events)
        .unwrap();

    let config = SessionConfig::default();
    let mut host =
        GameSession::new(Role::Authoritative, standard_maps(), &config, host_channel).unwrap();
    let mut guest = GameSession::new(Role::Mirror, standard_maps(), &config, guest_channel).unwrap();

    let input = TickInput {
        key: Some(KeyCode::JUMP_UP),
        message: None,
    };
    guest.step(input).unwrap();
    assert_eq!(tick_until_message(&mut host, &mut host_ticker), None);
    // Jump keys travel intact; there is nothing to vault over.
    assert_eq!(host.peer().position(), Position::primary(38, 18));

    guest
        .step(TickInput {
            key: Some(KeyCode::STEP_LEFT),
            message: None,
        })
        .unwrap();
    tick_until_message(&mut host, &mut host_ticker);
    assert_eq!(host.peer().position(), Position::primary(37, 18));

    tick_until_message(&mut guest, &mut guest_ticker);
    assert_eq!(guest.me().position(), Position::primary(37, 18));
    assert_eq!(guest.peer().position(), Position::primary(1, 1));

    drop(host);
    assert_eq!(
        tick_until_message(&mut guest, &mut guest_ticker),
        Some(Outcome::Quit(QuitSource::Remote))
    );
}
