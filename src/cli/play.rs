//! Host and join commands: run one interactive game.

use super::CliError;
use super::terminal::{self, TerminalGuard};
use crossterm::event::{self, Event};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};
use warptag::game::load_map;
use warptag::session::InputEvent;
use warptag::{GameSession, MapPair, Role, SessionConfig, TcpChannel, Ticker};

const KEY_POLL: Duration = Duration::from_millis(20);

/// Settings shared by `host` and `join`.
#[derive(Debug, Clone)]
pub(crate) struct PlayOptions {
    /// Primary map file.
    pub(crate) primary_map: PathBuf,
    /// Secondary map file.
    pub(crate) secondary_map: PathBuf,
    /// Optional JSON session config.
    pub(crate) config: Option<PathBuf>,
    /// Tick period override in milliseconds.
    pub(crate) tick_ms: Option<u64>,
    /// How long the end screen stays up.
    pub(crate) linger: Duration,
}

impl PlayOptions {
    fn load(&self) -> Result<(SessionConfig, MapPair), CliError> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }

        let maps = MapPair::new(load_map(&self.primary_map)?, load_map(&self.secondary_map)?);
        config.validate(&maps)?;
        Ok((config, maps))
    }
}

/// Execute the host command: wait for one peer and run the chaser side.
///
/// # Errors
///
/// Returns an error if a map or config is unusable or the peer cannot be
/// reached.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn host(port: u16, options: PlayOptions) -> Result<(), CliError> {
    let (config, maps) = options.load()?;
    println!("Waiting for a player on port {port}...");
    let channel = TcpChannel::accept(("0.0.0.0", port))?;
    println!("Player joined from {}", channel.peer_addr());
    play(Role::Authoritative, channel, maps, &config, options.linger)
}

/// Execute the join command: connect to a host and run the runner side.
///
/// # Errors
///
/// Returns an error if a map or config is unusable or the host cannot be
/// reached.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn join(addr: String, options: PlayOptions) -> Result<(), CliError> {
    let (config, maps) = options.load()?;
    let channel = TcpChannel::connect(addr.as_str())?;
    play(Role::Mirror, channel, maps, &config, options.linger)
}

fn play(
    role: Role,
    channel: TcpChannel,
    maps: MapPair,
    config: &SessionConfig,
    linger: Duration,
) -> Result<(), CliError> {
    let (events, mut ticker) = Ticker::with_sender(config.tick_period());
    let _reader = channel.spawn_reader(role.inbound(), events.clone())?;
    let mut session = GameSession::new(role, maps, config, channel)?;

    let mut screen = TerminalGuard::enter()?;
    let stop = Arc::new(AtomicBool::new(false));
    let keyboard = spawn_keyboard(events, Arc::clone(&stop))?;

    let mut draw_failed = false;
    let result = session.run(&mut ticker, |s| {
        if let Err(e) = screen.draw_session(s)
            && !draw_failed
        {
            warn!(error = %e, "drawing failed");
            draw_failed = true;
        }
    });

    stop.store(true, Ordering::Relaxed);
    if keyboard.join().is_err() {
        warn!("keyboard thread panicked");
    }

    let outcome = result?;
    info!(?outcome, "game over");
    screen.draw_end(outcome)?;
    thread::sleep(linger);
    drop(screen);

    println!("{}", terminal::farewell(outcome));
    Ok(())
}

/// Forward key presses to the scheduler until `stop` is set or the
/// scheduler is gone.
fn spawn_keyboard(
    events: Sender<InputEvent>,
    stop: Arc<AtomicBool>,
) -> Result<JoinHandle<()>, CliError> {
    let handle = thread::Builder::new()
        .name("warptag-keyboard".to_string())
        .spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                match event::poll(KEY_POLL) {
                    Ok(false) => {}
                    Ok(true) => {
                        let Ok(Event::Key(key)) = event::read() else {
                            continue;
                        };
                        if let Some(code) = terminal::translate_key(&key)
                            && events.send(InputEvent::Key(code)).is_err()
                        {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "keyboard polling failed");
                        return;
                    }
                }
            }
        })?;
    Ok(handle)
}
