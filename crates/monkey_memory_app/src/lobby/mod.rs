//! Lobby system: multi-screen TUI with profiles, the game board and statistics.

mod controller;
mod screen;
mod screens;

pub use controller::LobbyController;
pub use screen::{Screen, ScreenTransition};
pub use screens::{
    GameBoardScreen, MainLobbyScreen, OverallStatsScreen, ProfileSelectScreen, StatsViewScreen,
};
