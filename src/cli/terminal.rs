//! Terminal frontend: the game screen and key translation.

use super::CliError;
use crossterm::{
    cursor::{Hide, Show},
    event::{KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io::{Stdout, stdout};
use warptag::game::{CellType, Coord, GridMap, MapId};
use warptag::protocol::SyncChannel;
use warptag::session::QuitSource;
use warptag::{GameSession, KeyCode, Outcome, Player, Role};

/// Owns the terminal for the lifetime of a game and restores it on drop.
pub(crate) struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl std::fmt::Debug for TerminalGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalGuard").finish_non_exhaustive()
    }
}

impl TerminalGuard {
    /// Switch to raw mode and the alternate screen.
    pub(crate) fn enter() -> Result<Self, CliError> {
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, Show);
                Err(e.into())
            }
        }
    }

    /// Draw both maps and the status line.
    pub(crate) fn draw_session<C: SyncChannel>(
        &mut self,
        session: &GameSession<C>,
    ) -> Result<(), CliError> {
        self.terminal.draw(|f| render_session(f, session))?;
        Ok(())
    }

    /// Draw the end screen.
    pub(crate) fn draw_end(&mut self, outcome: Outcome) -> Result<(), CliError> {
        self.terminal.draw(|f| render_end(f, outcome))?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show);
    }
}

/// Translate a terminal key event into a game key code.
///
/// Arrows become the jump codes, characters map to themselves and Ctrl-C
/// becomes the quit key. Releases and everything else are ignored.
pub(crate) fn translate_key(event: &KeyEvent) -> Option<KeyCode> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    match event.code {
        TermKey::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyCode::QUIT)
        }
        TermKey::Char(c) => KeyCode::from_char(c),
        TermKey::Up => Some(KeyCode::JUMP_UP),
        TermKey::Down => Some(KeyCode::JUMP_DOWN),
        TermKey::Left => Some(KeyCode::JUMP_LEFT),
        TermKey::Right => Some(KeyCode::JUMP_RIGHT),
        _ => None,
    }
}

/// Headline of the end screen.
pub(crate) const fn banner(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Won => "You Win",
        Outcome::Lost => "You Lose",
        Outcome::Quit(_) => "QUIT",
    }
}

const FAREWELL: &str = "Thank you for playing!!";

fn render_session<C: SyncChannel>(f: &mut Frame, session: &GameSession<C>) {
    let maps = session.maps();
    let pane_height = maps.primary.height().max(maps.secondary.height()) + 2;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(pane_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(maps.primary.width() + 2),
            Constraint::Length(maps.secondary.width() + 2),
            Constraint::Min(0),
        ])
        .split(rows[0]);

    render_pane(f, panes[0], " Main ", &maps.primary, MapId::Primary, session);
    render_pane(f, panes[1], " Sub ", &maps.secondary, MapId::Secondary, session);
    render_status(f, rows[1], session);
}

fn render_pane<C: SyncChannel>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    grid: &GridMap,
    id: MapId,
    session: &GameSession<C>,
) {
    let lines = pane_lines(grid, id, session.me(), session.peer());
    let pane = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(pane, area);
}

/// One styled line per map row, with the peer drawn first and the local
/// player over it.
fn pane_lines(grid: &GridMap, id: MapId, me: &Player, peer: &Player) -> Vec<Line<'static>> {
    let me_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let peer_style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);

    (0..grid.height())
        .map(|y| {
            let spans: Vec<Span<'static>> = (0..grid.width())
                .map(|x| {
                    let coord = Coord::new(x, y);
                    let here = |p: &Player| p.position().map == id && p.position().coord == coord;
                    if here(me) {
                        Span::styled(me.glyph.to_string(), me_style)
                    } else if here(peer) {
                        Span::styled(peer.glyph.to_string(), peer_style)
                    } else {
                        cell_span(grid.cell_at(coord))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn cell_span(cell: CellType) -> Span<'static> {
    let color = match cell {
        CellType::Empty => Color::Reset,
        CellType::Wall => Color::Gray,
        CellType::Warp => Color::Magenta,
        CellType::JumpableWall => Color::DarkGray,
    };
    Span::styled(cell.symbol().to_string(), Style::default().fg(color))
}

fn render_status<C: SyncChannel>(f: &mut Frame, area: Rect, session: &GameSession<C>) {
    let role = match session.role() {
        Role::Authoritative => "host (chaser)",
        Role::Mirror => "guest (runner)",
    };
    let status = format!(
        " {role} | you {} | tick {} | [i/j/k/l] step  [arrows] jump  [q] quit ",
        session.me().glyph,
        session.tick()
    );
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Cyan)),
        area,
    );
}

fn render_end(f: &mut Frame, outcome: Outcome) {
    let detail = match outcome {
        Outcome::Quit(QuitSource::Local) => "you left the game",
        Outcome::Quit(QuitSource::Remote) => "your opponent left the game",
        Outcome::Won | Outcome::Lost => "",
    };
    let lines = vec![
        Line::from(Span::styled(
            banner(outcome),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(detail),
        Line::from(""),
        Line::from(FAREWELL),
    ];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(f.area());

    let end = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(end, rows[1]);
}

/// Final line printed after the terminal is restored.
pub(crate) fn farewell(outcome: Outcome) -> String {
    format!("{} - {FAREWELL}", banner(outcome))
}
