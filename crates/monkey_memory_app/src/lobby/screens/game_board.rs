//! Game screen: difficulty choice, the 6×3 board and the result panel.

use crossterm::event::{KeyCode, KeyEvent};
use monkey_memory::{
    BOARD_COLUMNS, BOARD_ROWS, Cell, Difficulty, GameEvent, GameSession, Phase, SequenceSource,
    ShuffledSequences,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::{GameDriver, ProfileService};

/// Key that picks `cell` directly: `a` for cell 1 through `r` for cell 18.
pub fn cell_key(cell: Cell) -> char {
    char::from(b'a' + cell.number() - 1)
}

fn cell_for_key(key: char) -> Option<Cell> {
    let key = key.to_ascii_lowercase();
    if !key.is_ascii_lowercase() {
        return None;
    }
    Cell::new(key as u8 - b'a' + 1).ok()
}

/// State for the game screen.
#[derive(Debug)]
pub struct GameBoardScreen<S = ShuffledSequences> {
    driver: GameDriver<S>,
    cursor: Cell,
}

impl<S: SequenceSource> GameBoardScreen<S> {
    /// Creates the screen around a driver, preselecting `difficulty`.
    #[instrument(skip(driver))]
    pub fn new(mut driver: GameDriver<S>, difficulty: Difficulty) -> Self {
        driver.handle(GameEvent::SelectDifficulty(difficulty));
        Self {
            driver,
            cursor: Cell::FIRST,
        }
    }

    /// Returns the live session.
    pub fn session(&self) -> &GameSession {
        self.driver.session()
    }

    /// Feeds expired reveal timers into the game. Called once per frame.
    pub fn tick(&mut self) {
        if self.driver.poll_reveal() {
            debug!(phase = %self.session().phase(), "Reveal finished");
        }
    }

    /// Abandons the session, cancelling any pending reveal.
    pub fn leave(&mut self) {
        self.driver.handle(GameEvent::Reset);
    }

    fn cycle_difficulty(&mut self, forward: bool) {
        let all: Vec<Difficulty> = Difficulty::iter().collect();
        let current = self.session().difficulty();
        let idx = all.iter().position(|d| *d == current).unwrap_or(0);
        let next = if forward {
            (idx + 1) % all.len()
        } else {
            (idx + all.len() - 1) % all.len()
        };
        self.driver.handle(GameEvent::SelectDifficulty(all[next]));
    }

    fn move_cursor(&mut self, rows: i16, columns: i16) {
        let row = (i16::from(self.cursor.row()) + rows).rem_euclid(i16::from(BOARD_ROWS));
        let column =
            (i16::from(self.cursor.column()) + columns).rem_euclid(i16::from(BOARD_COLUMNS));
        if let (Ok(row), Ok(column)) = (u8::try_from(row), u8::try_from(column))
            && let Some(cell) = Cell::at(row, column)
        {
            self.cursor = cell;
        }
    }

    fn handle_waiting(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('1') => self
                .driver
                .handle(GameEvent::SelectDifficulty(Difficulty::Easy)),
            KeyCode::Char('2') => self
                .driver
                .handle(GameEvent::SelectDifficulty(Difficulty::Medium)),
            KeyCode::Char('3') => self
                .driver
                .handle(GameEvent::SelectDifficulty(Difficulty::Hard)),
            KeyCode::Left | KeyCode::Up => self.cycle_difficulty(false),
            KeyCode::Right | KeyCode::Down => self.cycle_difficulty(true),
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
                self.driver.handle(GameEvent::Start)
            }
            _ => {}
        }
    }

    fn handle_playing(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.driver.handle(GameEvent::CellClicked(self.cursor))
            }
            KeyCode::Char(c) => {
                if let Some(cell) = cell_for_key(c) {
                    self.cursor = cell;
                    self.driver.handle(GameEvent::CellClicked(cell));
                }
            }
            _ => {}
        }
    }

    fn handle_finished(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('p') | KeyCode::Char('P') => self.driver.handle(GameEvent::Start),
            KeyCode::Char('c') | KeyCode::Char('C') => self.driver.handle(GameEvent::Reset),
            _ => {}
        }
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        let session = self.session();
        let (entered, required) = session.progress();
        match session.phase() {
            Phase::Waiting => {
                let mut lines = vec![Line::from("Choose Difficulty")];
                lines.extend(Difficulty::iter().enumerate().map(|(i, d)| {
                    let marker = if d == session.difficulty() { ">" } else { " " };
                    Line::from(format!("{} {}. {}", marker, i + 1, d.label()))
                }));
                lines
            }
            Phase::Showing => vec![
                Line::from("Memorize the sequence!"),
                Line::from("Watch the highlighted cells carefully..."),
            ],
            Phase::Playing => vec![
                Line::from("Now pick the cells in the same order!"),
                Line::from(format!(
                    "Score: {} | Progress: {}/{}",
                    session.score(),
                    entered,
                    required
                )),
            ],
            Phase::Finished => vec![
                Line::from("Game Over!"),
                Line::from(format!("Final Score: {}", session.score())),
                Line::from(format!("Difficulty: {}", session.difficulty())),
                Line::from(format!(
                    "Duration: {}s",
                    session.duration_seconds().unwrap_or(0)
                )),
            ],
        }
    }

    fn cell_style(&self, cell: Cell) -> Style {
        let session = self.session();
        let base = if session.is_highlighted(cell) {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else if session.is_selected(cell) {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        if session.phase() == Phase::Playing && cell == self.cursor {
            base.add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            base
        }
    }

    fn render_board(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, u32::from(BOARD_ROWS)); usize::from(BOARD_ROWS)])
            .split(area);
        for (row_idx, row_area) in rows.iter().enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(
                    vec![Constraint::Ratio(1, u32::from(BOARD_COLUMNS)); usize::from(BOARD_COLUMNS)],
                )
                .split(*row_area);
            for (col_idx, cell_area) in columns.iter().enumerate() {
                let (Ok(row), Ok(column)) = (u8::try_from(row_idx), u8::try_from(col_idx)) else {
                    continue;
                };
                let Some(cell) = Cell::at(row, column) else {
                    continue;
                };
                let widget = Paragraph::new(format!("{}", cell))
                    .style(self.cell_style(cell))
                    .alignment(Alignment::Center)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(format!("{}", cell_key(cell))),
                    );
                frame.render_widget(widget, *cell_area);
            }
        }
    }
}

impl<S: SequenceSource> Screen for GameBoardScreen<S> {
    fn render(&self, frame: &mut Frame, _profile_service: &ProfileService) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Min(12),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("Memory Game")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let status_color = match self.session().phase() {
            Phase::Finished => Color::Magenta,
            Phase::Showing => Color::Yellow,
            _ => Color::Green,
        };
        let status = Paragraph::new(self.header_lines())
            .style(Style::default().fg(status_color))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, chunks[1]);

        self.render_board(frame, chunks[2]);

        let help_text = match self.session().phase() {
            Phase::Waiting => "1/2/3 or ←→: Difficulty | Enter/s: Start | Esc: Back",
            Phase::Showing => "Memorize... | Esc: Back",
            Phase::Playing => "Arrows + Enter/Space or a..r: Pick cell | Esc: Back",
            Phase::Finished => "p: Play again | c: Change difficulty | Esc: Back",
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);
    }

    #[instrument(skip(self, key, _profile_service), fields(phase = %self.session().phase()))]
    fn handle_key(&mut self, key: KeyEvent, _profile_service: &ProfileService) -> ScreenTransition {
        if key.code == KeyCode::Esc {
            self.leave();
            return ScreenTransition::GoToMainLobby;
        }
        match self.session().phase() {
            Phase::Waiting => self.handle_waiting(key.code),
            Phase::Showing => {}
            Phase::Playing => self.handle_playing(key.code),
            Phase::Finished => self.handle_finished(key.code),
        }
        ScreenTransition::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_keys_cover_the_board() {
        assert_eq!(cell_for_key('a'), Cell::new(1).ok());
        assert_eq!(cell_for_key('R'), Cell::new(18).ok());
        assert_eq!(cell_for_key('s'), None);
        assert_eq!(cell_for_key('1'), None);
        for cell in Cell::all() {
            assert_eq!(cell_for_key(cell_key(cell)), Some(cell));
        }
    }
}
