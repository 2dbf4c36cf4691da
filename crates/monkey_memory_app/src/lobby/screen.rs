//! Screen trait and transition type for the lobby state machine.

use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::ProfileService;

/// The result of handling an input event on a screen.
///
/// Screens return this from [`Screen::handle_key`] to drive the
/// [`LobbyController`](crate::LobbyController) state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Stay on the current screen.
    Stay,
    /// Navigate to the profile selection screen.
    GoToProfileSelect,
    /// Navigate to the main lobby screen.
    GoToMainLobby,
    /// Sign out and continue to the lobby as a guest.
    PlayAsGuest,
    /// Open the game board.
    GoToGame,
    /// Navigate to the personal statistics of the current user.
    GoToStatsView,
    /// Navigate to the statistics across all players.
    GoToOverallStats,
    /// Exit the lobby application cleanly.
    Quit,
}

/// Trait implemented by each screen in the lobby state machine.
///
/// Each screen owns its own state, renders its UI, and handles key events.
/// The controller calls these methods in the event loop.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame, profile_service: &ProfileService);

    /// Handles a key event and returns the resulting [`ScreenTransition`].
    fn handle_key(&mut self, key: KeyEvent, profile_service: &ProfileService) -> ScreenTransition;
}
