//! Personal statistics screen.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell as TableCell, Paragraph, Row, Sparkline, Table},
};
use tracing::{info, instrument};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::stats::{TREND_LENGTH, score_improvement};
use crate::{GameScore, ProfileService, User, UserStats};

/// State for the personal statistics screen.
///
/// Data is loaded by the controller before the screen is shown.
#[derive(Debug, Getters)]
pub struct StatsViewScreen {
    current_user: User,
    stats: Option<UserStats>,
    history: Vec<GameScore>,
}

impl StatsViewScreen {
    /// Creates the screen from already loaded data; `history` is oldest first.
    #[instrument(skip_all, fields(user_id = current_user.id(), games = history.len()))]
    pub fn new(current_user: User, stats: Option<UserStats>, history: Vec<GameScore>) -> Self {
        info!("StatsViewScreen initialized");
        Self {
            current_user,
            stats,
            history,
        }
    }

    /// Message describing the change over the recent games.
    pub fn improvement_message(&self) -> String {
        if self.history.len() < 2 {
            return "Play a few more games to see your progress.".to_string();
        }
        match score_improvement(&self.history) {
            delta if delta > 0 => format!("You improved by {} over your recent games!", delta),
            delta if delta < 0 => format!(
                "Down {} over your recent games. Keep practising!",
                delta.abs()
            ),
            _ => "Holding steady over your recent games.".to_string(),
        }
    }
}

impl Screen for StatsViewScreen {
    fn render(&self, frame: &mut Frame, _profile_service: &ProfileService) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new(format!(
            "Personal Statistics: {}",
            self.current_user.display_name()
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let summary_text = match &self.stats {
            Some(stats) => format!(
                "Best: {}   Median: {:.1}   Average: {:.1}   Games: {}",
                stats.best_score, stats.median_score, stats.average_score, stats.total_games
            ),
            None => "No statistics available".to_string(),
        };
        let summary = Paragraph::new(summary_text)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Summary"));
        frame.render_widget(summary, chunks[1]);

        let trend: Vec<u64> = self
            .stats
            .as_ref()
            .map(|s| {
                s.score_trend
                    .iter()
                    .map(|v| u64::try_from(*v).unwrap_or(0))
                    .collect()
            })
            .unwrap_or_default();
        let sparkline = Sparkline::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Trend (last {} games)", TREND_LENGTH)),
            )
            .data(&trend)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(sparkline, chunks[2]);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(vec![
            TableCell::from("Date").style(bold),
            TableCell::from("Score").style(bold),
            TableCell::from("Difficulty").style(bold),
            TableCell::from("Duration").style(bold),
        ])
        .style(Style::default().fg(Color::Yellow));

        let rows: Vec<Row> = self
            .history
            .iter()
            .rev()
            .take(10)
            .map(|game| {
                Row::new(vec![
                    TableCell::from(game.created_at().format("%Y-%m-%d %H:%M").to_string()),
                    TableCell::from(game.score().to_string()),
                    TableCell::from(game.difficulty().as_str()),
                    TableCell::from(format!("{}s", game.game_duration())),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(15),
                Constraint::Percentage(25),
                Constraint::Percentage(20),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Recent Games (10 most recent)"),
        );
        frame.render_widget(table, chunks[3]);

        let improvement = Paragraph::new(self.improvement_message())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(improvement, chunks[4]);

        let help = Paragraph::new("Esc / b: Back to Lobby | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[5]);
    }

    #[instrument(skip(self, key, _profile_service))]
    fn handle_key(&mut self, key: KeyEvent, _profile_service: &ProfileService) -> ScreenTransition {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => {
                ScreenTransition::GoToMainLobby
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
