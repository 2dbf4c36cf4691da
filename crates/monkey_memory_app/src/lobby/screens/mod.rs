//! Screen implementations for the lobby state machine.

mod game_board;
mod main_lobby;
mod overall_stats;
mod profile_select;
mod stats_view;

pub use game_board::GameBoardScreen;
pub use main_lobby::MainLobbyScreen;
pub use overall_stats::OverallStatsScreen;
pub use profile_select::ProfileSelectScreen;
pub use stats_view::StatsViewScreen;
