//! Profile selection screen.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument, warn};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::{ProfileService, User};

/// State for the profile selection screen.
#[derive(Debug, Getters)]
pub struct ProfileSelectScreen {
    users: Vec<User>,
    list_state: ListState,
    new_name_input: String,
    input_mode: bool,
    error_message: Option<String>,
    selected: Option<User>,
}

impl ProfileSelectScreen {
    /// Creates a new profile select screen, loading existing users.
    #[instrument(skip(profile_service))]
    pub fn new(profile_service: &ProfileService) -> Self {
        let (users, error_message) = match profile_service.repository().list_users() {
            Ok(users) => (users, None),
            Err(e) => {
                warn!(error = %e, "Could not load profiles");
                (Vec::new(), Some("Could not load profiles".to_string()))
            }
        };
        info!(user_count = users.len(), "ProfileSelectScreen initialized");
        let mut list_state = ListState::default();
        if !users.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            users,
            list_state,
            new_name_input: String::new(),
            input_mode: false,
            error_message,
            selected: None,
        }
    }

    /// Takes the confirmed profile, if the user picked or created one.
    pub fn take_selected(&mut self) -> Option<User> {
        self.selected.take()
    }

    fn move_selection(&mut self, forward: bool) {
        let count = self.users.len();
        if count == 0 {
            return;
        }
        let next = match (self.list_state.selected(), forward) {
            (Some(i), true) => (i + 1) % count,
            (Some(0) | None, false) => count - 1,
            (Some(i), false) => i - 1,
            (None, true) => 0,
        };
        self.list_state.select(Some(next));
    }

    fn confirm_selection(&mut self) -> bool {
        let Some(user) = self
            .list_state
            .selected()
            .and_then(|idx| self.users.get(idx))
        else {
            return false;
        };
        info!(user_id = user.id(), display_name = %user.display_name(), "Profile selected");
        self.selected = Some(user.clone());
        true
    }

    #[instrument(skip(self, profile_service))]
    fn create_profile(&mut self, profile_service: &ProfileService) -> bool {
        let name = self.new_name_input.trim().to_string();
        if name.is_empty() {
            self.error_message = Some("Name cannot be empty".to_string());
            return false;
        }

        match profile_service.get_or_create_user(name) {
            Ok(user) => {
                debug!(user_id = user.id(), "Profile ready");
                self.new_name_input.clear();
                self.input_mode = false;
                self.error_message = None;
                self.selected = Some(user);
                true
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to create profile: {}", e.message));
                false
            }
        }
    }
}

impl Screen for ProfileSelectScreen {
    fn render(&self, frame: &mut Frame, _profile_service: &ProfileService) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("Monkey Memory: who is playing?")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = self
            .users
            .iter()
            .map(|u| ListItem::new(u.display_name().as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Profiles"))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut list_state = self.list_state;
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let (input_title, input_style) = if self.input_mode {
            (
                "New Profile Name (Enter to confirm, Esc to cancel)",
                Style::default().fg(Color::White),
            )
        } else {
            ("Press 'n' to create a new profile", Style::default().fg(Color::DarkGray))
        };
        let input = Paragraph::new(self.new_name_input.as_str())
            .style(input_style)
            .block(Block::default().borders(Borders::ALL).title(input_title));
        frame.render_widget(input, chunks[2]);

        let error = Paragraph::new(self.error_message.as_deref().unwrap_or(""))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(error, chunks[3]);

        let help_text = if self.input_mode {
            "Type name | Enter: Confirm | Esc: Cancel"
        } else {
            "↑↓: Select | Enter: Confirm | n: New | g: Guest | q: Quit"
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, profile_service))]
    fn handle_key(&mut self, key: KeyEvent, profile_service: &ProfileService) -> ScreenTransition {
        if self.input_mode {
            match key.code {
                KeyCode::Char(c) => self.new_name_input.push(c),
                KeyCode::Backspace => {
                    self.new_name_input.pop();
                }
                KeyCode::Enter if self.create_profile(profile_service) => {
                    return ScreenTransition::GoToMainLobby;
                }
                KeyCode::Esc => {
                    self.input_mode = false;
                    self.new_name_input.clear();
                    self.error_message = None;
                }
                _ => {}
            }
            return ScreenTransition::Stay;
        }

        match key.code {
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Enter if self.confirm_selection() => return ScreenTransition::GoToMainLobby,
            KeyCode::Enter if self.users.is_empty() => self.input_mode = true,
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.input_mode = true;
                self.error_message = None;
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                info!("Continuing as guest");
                return ScreenTransition::PlayAsGuest;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return ScreenTransition::Quit,
            _ => {}
        }
        ScreenTransition::Stay
    }
}
