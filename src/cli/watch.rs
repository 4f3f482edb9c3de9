//! Watch command implementation - Interactive TUI viewer.

// CLI watch uses intentional casts for display and timing
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use super::output::{describe_event, winner_name};
use super::{CliError, OracleArgs, SessionArgs};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use skirmish::game::{EnemyKind, Role, StepEvent};
use skirmish::replay::{cell_glyph, status_line};
use skirmish::{Coord, Entity, InputEvent, ProcessOracle, Session};
use std::collections::VecDeque;
use std::io::stdout;
use std::time::{Duration, Instant};

/// Lines kept in the event log panel.
const LOG_CAPACITY: usize = 200;

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the oracle cannot be started or the TUI fails.
pub(crate) fn execute(
    oracle: &OracleArgs,
    session_args: &SessionArgs,
    speed: Option<u64>,
) -> Result<(), CliError> {
    let config = session_args.load_config()?;
    let seed = session_args.seed();
    let process = oracle.spawn()?;
    let session = Session::new(config, seed, process)?;

    let speed = speed.map_or_else(|| session.turn_delay(), Duration::from_millis);
    run_tui(App::new(session, speed))
}

/// App state for the TUI.
struct App {
    session: Session<ProcessOracle>,
    speed: Duration,
    /// When the current inter-turn delay began.
    delay_since: Option<Instant>,
    /// Whether the end of the fight has been logged.
    announced: bool,
    log: VecDeque<String>,
}

impl App {
    fn new(session: Session<ProcessOracle>, speed: Duration) -> Self {
        let mut app = Self {
            session,
            speed,
            delay_since: None,
            announced: false,
            log: VecDeque::with_capacity(LOG_CAPACITY),
        };
        app.push_log(format!("session started (seed {})", app.session.seed()));
        app
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    fn turn_cap_reached(&self) -> bool {
        self.session.snapshot().turn.turn_number > self.session.config().max_turns
    }

    fn is_over(&self) -> bool {
        self.session.snapshot().is_game_over() || self.turn_cap_reached()
    }

    /// Advance by at most one decision or phase transition.
    fn tick(&mut self) {
        if self.is_over() {
            if !self.announced {
                let winner = self.session.snapshot().outcome;
                self.push_log(format!("== {} ==", winner_name(winner)));
                self.announced = true;
            }
            return;
        }

        if self.session.in_delay() {
            let since = *self.delay_since.get_or_insert_with(Instant::now);
            if since.elapsed() >= self.speed && self.session.finish_delay() {
                self.delay_since = None;
            }
            return;
        }

        let event = self.session.step();
        if matches!(event, StepEvent::Finished(_)) {
            self.announced = true;
        }
        if let Some(line) = describe_event(&event, self.session.world()) {
            self.push_log(line);
        }
    }

    fn toggle_pause(&mut self) {
        match self.session.handle_input(InputEvent::TogglePause) {
            Ok(true) => {}
            Ok(false) => self.push_log("pause only works between phases".to_string()),
            Err(e) => self.push_log(format!("error: {e}")),
        }
    }

    fn restart(&mut self) {
        match self.session.handle_input(InputEvent::Restart) {
            Ok(_) => {
                self.log.clear();
                self.delay_since = None;
                self.announced = false;
                self.push_log(format!("session restarted (seed {})", self.session.seed()));
            }
            Err(e) => self.push_log(format!("restart failed: {e}")),
        }
    }

    fn increase_speed(&mut self) {
        self.speed = self.speed.saturating_sub(Duration::from_millis(100));
    }

    fn decrease_speed(&mut self) {
        self.speed = (self.speed + Duration::from_millis(100)).min(Duration::from_secs(5));
    }
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<(), CliError> {
    while !app.session.should_quit() {
        terminal.draw(|f| ui(f, app))?;

        app.tick();

        // Handle input with timeout
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    let _ = app.session.handle_input(InputEvent::Quit);
                }
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Char('r') => app.restart(),
                KeyCode::Char('+' | '=') => app.increase_speed(),
                KeyCode::Char('-') => app.decrease_speed(),
                _ => {}
            }
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(4)])
        .split(main_chunks[1]);

    render_map(f, main_chunks[0], app);
    render_units(f, side_chunks[0], app);
    render_log(f, side_chunks[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.session.snapshot();
    let status = if app.turn_cap_reached() && !snapshot.is_game_over() {
        "turn cap reached".to_string()
    } else {
        status_line(&snapshot)
    };

    let title = format!(
        " Skirmish | {} | Seed: {} | Delay: {}ms ",
        status,
        app.session.seed(),
        app.speed.as_millis()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.session.snapshot();
    let map = snapshot.world.map();

    // Two columns per cell; clip to what fits
    let visible_width = (usize::from(area.width).saturating_sub(2) / 2).min(usize::from(map.width()));
    let visible_height = usize::from(area.height).saturating_sub(2).min(usize::from(map.height()));

    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    for y in 0..visible_height {
        let mut spans = Vec::with_capacity(visible_width);
        for x in 0..visible_width {
            let glyph = cell_glyph(&snapshot, Coord::new(x as i32, y as i32));
            spans.push(Span::styled(format!("{glyph} "), Style::default().fg(glyph_color(glyph))));
        }
        lines.push(Line::from(spans));
    }

    let map_widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Map "));

    f.render_widget(map_widget, area);
}

const fn glyph_color(glyph: char) -> Color {
    match glyph {
        '@' => Color::Cyan,
        'r' => Color::Red,
        'm' => Color::LightRed,
        '^' => Color::Gray,
        '~' => Color::Blue,
        '.' => Color::Green,
        _ => Color::DarkGray,
    }
}

fn unit_color(entity: &Entity) -> Color {
    if !entity.is_alive() {
        return Color::DarkGray;
    }
    match entity.role {
        Role::Player => Color::Cyan,
        Role::Enemy(EnemyKind::Ranged) => Color::Red,
        Role::Enemy(EnemyKind::Melee) => Color::LightRed,
    }
}

fn render_units(f: &mut Frame, area: Rect, app: &App) {
    let world = app.session.world();
    let mut lines = Vec::with_capacity(world.entities().len());

    for entity in world.entities() {
        let status = if entity.is_alive() { "" } else { " [DOWN]" };
        let filled = entity.hp.min(entity.max_hp) as usize;
        let empty = entity.max_hp.saturating_sub(entity.hp) as usize;

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<7} {} ", entity.label(), entity.id),
                Style::default().fg(unit_color(entity)).add_modifier(Modifier::BOLD),
            ),
            Span::styled("#".repeat(filled), Style::default().fg(Color::Green)),
            Span::styled("-".repeat(empty), Style::default().fg(Color::DarkGray)),
            Span::raw(format!(" {}/{} at {}{status}", entity.hp, entity.max_hp, entity.pos)),
        ]));
    }

    let units_widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Units "));

    f.render_widget(units_widget, area);
}

fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let visible = usize::from(area.height).saturating_sub(2);
    let skip = app.log.len().saturating_sub(visible);
    let lines: Vec<Line> = app.log.iter().skip(skip).map(|l| Line::from(l.as_str())).collect();

    let log_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Events "))
        .wrap(Wrap { trim: false });

    f.render_widget(log_widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.is_over() {
        " [q] Quit  [r] Restart "
    } else {
        " [q] Quit  [Space] Pause (between phases)  [+/-] Speed  [r] Restart "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
