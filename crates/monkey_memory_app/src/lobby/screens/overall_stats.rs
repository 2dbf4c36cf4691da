//! Overall statistics screen: everyone's numbers and how the player compares.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};
use tracing::{info, instrument};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::stats::{estimate_percentile, memory_verdict};
use crate::{OverallStats, ProfileService, UserStats};

/// State for the overall statistics screen.
#[derive(Debug, Getters)]
pub struct OverallStatsScreen {
    overall: Option<OverallStats>,
    mine: Option<UserStats>,
}

impl OverallStatsScreen {
    /// Creates the screen; `mine` is `None` for guests.
    #[instrument(skip_all, fields(loaded = overall.is_some(), signed_in = mine.is_some()))]
    pub fn new(overall: Option<OverallStats>, mine: Option<UserStats>) -> Self {
        info!("OverallStatsScreen initialized");
        Self { overall, mine }
    }

    /// Comparison lines between the player and everyone.
    pub fn comparison_lines(&self) -> Vec<String> {
        let (Some(overall), Some(mine)) = (&self.overall, &self.mine) else {
            return vec!["Sign in to compare yourself with other players.".to_string()];
        };
        if mine.total_games == 0 {
            return vec!["Play a game to see how you compare.".to_string()];
        }
        let mut lines = vec![format!(
            "Your average: {:.1}   Global average: {:.1}   Your best: {}",
            mine.average_score, overall.global_average_score, mine.best_score
        )];
        if let Some(percentile) =
            estimate_percentile(mine.average_score, overall.global_average_score)
        {
            lines.push(format!(
                "You remember more than roughly {:.0}% of players.",
                percentile
            ));
        }
        lines.push(memory_verdict(mine.average_score).to_string());
        lines
    }
}

impl Screen for OverallStatsScreen {
    fn render(&self, frame: &mut Frame, _profile_service: &ProfileService) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("Overall Statistics")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let global_text = match &self.overall {
            Some(o) => format!(
                "Players: {}   Best: {}   Average: {:.1}   Median: {:.1}",
                o.total_users, o.global_best_score, o.global_average_score, o.global_median_score
            ),
            None => "Overall statistics are unavailable".to_string(),
        };
        let global = Paragraph::new(global_text)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Everyone"));
        frame.render_widget(global, chunks[1]);

        let comparison: Vec<Line> = self.comparison_lines().into_iter().map(Line::from).collect();
        let comparison = Paragraph::new(comparison)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("You vs. everyone"));
        frame.render_widget(comparison, chunks[2]);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[3]);

        if let Some(overall) = &self.overall {
            let buckets: Vec<Bar> = overall
                .score_distribution
                .iter()
                .map(|b| {
                    Bar::default()
                        .label(Line::from(b.score_range.clone()))
                        .value(u64::try_from(b.count).unwrap_or(0))
                })
                .collect();
            let distribution = BarChart::default()
                .block(Block::default().borders(Borders::ALL).title("Score distribution"))
                .data(BarGroup::default().bars(&buckets))
                .bar_width(5)
                .bar_gap(1)
                .bar_style(Style::default().fg(Color::Yellow));
            frame.render_widget(distribution, charts[0]);

            let days: Vec<Bar> = overall
                .recent_activity
                .iter()
                .map(|d| {
                    Bar::default()
                        .label(Line::from(d.date.format("%m-%d").to_string()))
                        .value(u64::try_from(d.games_played).unwrap_or(0))
                })
                .collect();
            let activity = BarChart::default()
                .block(Block::default().borders(Borders::ALL).title("Games per day"))
                .data(BarGroup::default().bars(&days))
                .bar_width(5)
                .bar_gap(1)
                .bar_style(Style::default().fg(Color::Magenta));
            frame.render_widget(activity, charts[1]);
        }

        let help = Paragraph::new("Esc / b: Back to Lobby | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn overall(average: f64) -> OverallStats {
        OverallStats {
            total_users: 2,
            global_best_score: 9,
            global_average_score: average,
            global_median_score: average,
            score_distribution: Vec::new(),
            recent_activity: Vec::new(),
        }
    }

    fn mine(average: f64, games: i64) -> UserStats {
        UserStats {
            user_id: 1,
            best_score: 9,
            median_score: average,
            average_score: average,
            total_games: games,
            score_trend: Vec::new(),
        }
    }

    #[test]
    fn guest_is_asked_to_sign_in() {
        let screen = OverallStatsScreen::new(Some(overall(5.0)), None);
        assert_eq!(screen.comparison_lines().len(), 1);
        assert!(screen.comparison_lines()[0].contains("Sign in"));
    }

    #[test]
    fn comparison_includes_percentile_and_verdict() {
        let screen = OverallStatsScreen::new(Some(overall(5.0)), Some(mine(7.5, 4)));
        let lines = screen.comparison_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("75%"));
        assert!(lines[2].starts_with("Human"));
    }

    #[test]
    fn no_percentile_without_global_average() {
        let screen = OverallStatsScreen::new(Some(overall(0.0)), Some(mine(3.0, 1)));
        let lines = screen.comparison_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Monkey"));
    }
}
