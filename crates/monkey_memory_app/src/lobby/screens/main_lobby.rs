//! Main lobby screen, the hub after profile selection.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::{ProfileService, User, UserStats};

/// Menu options available in the main lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LobbyOption {
    Play,
    PersonalStats,
    OverallStats,
    ChangeProfile,
    Quit,
}

impl LobbyOption {
    fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::PersonalStats => "Personal Statistics",
            Self::OverallStats => "Overall Statistics",
            Self::ChangeProfile => "Change Profile",
            Self::Quit => "Quit",
        }
    }

    /// Options offered to a signed-in user or a guest.
    fn for_user(signed_in: bool) -> &'static [LobbyOption] {
        if signed_in {
            &[
                Self::Play,
                Self::PersonalStats,
                Self::OverallStats,
                Self::ChangeProfile,
                Self::Quit,
            ]
        } else {
            &[Self::Play, Self::OverallStats, Self::ChangeProfile, Self::Quit]
        }
    }
}

/// State for the main lobby screen. `current_user` is `None` for a guest.
///
/// `stats` are loaded by the caller from whichever stats backend is active.
#[derive(Debug, Getters)]
pub struct MainLobbyScreen {
    current_user: Option<User>,
    stats: Option<UserStats>,
    list_state: ListState,
}

impl MainLobbyScreen {
    /// Creates a new main lobby screen.
    #[instrument(skip(current_user, stats))]
    pub fn new(current_user: Option<User>, stats: Option<UserStats>) -> Self {
        debug!(
            user_id = current_user.as_ref().map(|u| *u.id()),
            has_stats = stats.is_some(),
            "Initializing MainLobbyScreen"
        );
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            current_user,
            stats,
            list_state,
        }
    }

    /// Text for the profile bar.
    pub fn profile_line(&self) -> String {
        match (&self.current_user, &self.stats) {
            (Some(user), Some(stats)) if stats.total_games > 0 => format!(
                "Player: {}   Best: {}   Average: {:.1}   Games: {}",
                user.display_name(),
                stats.best_score,
                stats.average_score,
                stats.total_games
            ),
            (Some(user), _) => format!("Player: {}", user.display_name()),
            (None, _) => "Playing as guest: scores are not saved".to_string(),
        }
    }

    fn options(&self) -> &'static [LobbyOption] {
        LobbyOption::for_user(self.current_user.is_some())
    }

    fn select_previous(&mut self) {
        let count = self.options().len();
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => count - 1,
        };
        self.list_state.select(Some(i));
    }

    fn select_next(&mut self) {
        let count = self.options().len();
        let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
        self.list_state.select(Some(i));
    }

    fn selected_option(&self) -> LobbyOption {
        let options = self.options();
        let idx = self.list_state.selected().unwrap_or(0);
        options[idx.min(options.len() - 1)]
    }
}

impl Screen for MainLobbyScreen {
    fn render(&self, frame: &mut Frame, _profile_service: &ProfileService) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("Monkey Memory Lobby")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let profile_bar = Paragraph::new(self.profile_line())
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(profile_bar, chunks[1]);

        let items: Vec<ListItem> = self
            .options()
            .iter()
            .map(|opt| ListItem::new(opt.label()))
            .collect();
        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut list_state = self.list_state;
        frame.render_stateful_widget(menu, chunks[2], &mut list_state);

        let help = Paragraph::new("↑↓: Navigate | Enter: Select | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);
    }

    #[instrument(skip(self, key, _profile_service))]
    fn handle_key(&mut self, key: KeyEvent, _profile_service: &ProfileService) -> ScreenTransition {
        match key.code {
            KeyCode::Up => {
                self.select_previous();
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                self.select_next();
                ScreenTransition::Stay
            }
            KeyCode::Enter => {
                let option = self.selected_option();
                info!(option = ?option, "Lobby option selected");
                match option {
                    LobbyOption::Play => ScreenTransition::GoToGame,
                    LobbyOption::PersonalStats => ScreenTransition::GoToStatsView,
                    LobbyOption::OverallStats => ScreenTransition::GoToOverallStats,
                    LobbyOption::ChangeProfile => ScreenTransition::GoToProfileSelect,
                    LobbyOption::Quit => ScreenTransition::Quit,
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
