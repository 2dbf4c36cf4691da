//! Lobby controller: the state machine driving the multi-screen TUI.

use std::sync::Arc;

use crossterm::event::{self, Event, KeyEventKind};
use derive_getters::Getters;
use monkey_memory::{GameEngine, SharedIdentity};
use ratatui::{Terminal, backend::Backend};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, instrument, warn};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::lobby::screens::{
    GameBoardScreen, MainLobbyScreen, OverallStatsScreen, ProfileSelectScreen, StatsViewScreen,
};
use crate::{AppConfig, GameDriver, ProfileService, ResultDispatcher, StatsBackend, User};

/// Active screen in the lobby state machine.
#[derive(Debug)]
enum ActiveScreen {
    ProfileSelect(ProfileSelectScreen),
    MainLobby(MainLobbyScreen),
    Game(Box<GameBoardScreen>),
    StatsView(StatsViewScreen),
    OverallStats(OverallStatsScreen),
}

impl ActiveScreen {
    fn as_screen(&self) -> &dyn Screen {
        match self {
            Self::ProfileSelect(s) => s,
            Self::MainLobby(s) => s,
            Self::Game(s) => &**s,
            Self::StatsView(s) => s,
            Self::OverallStats(s) => s,
        }
    }

    fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            Self::ProfileSelect(s) => s,
            Self::MainLobby(s) => s,
            Self::Game(s) => &mut **s,
            Self::StatsView(s) => s,
            Self::OverallStats(s) => s,
        }
    }
}

/// Controller that drives the lobby state machine.
///
/// Call [`LobbyController::run`] to start the event loop.
#[derive(Debug, Getters)]
pub struct LobbyController {
    profile_service: ProfileService,
    backend: Arc<dyn StatsBackend>,
    identity: SharedIdentity,
    config: AppConfig,
    current_user: Option<User>,
}

impl LobbyController {
    /// Creates a new lobby controller.
    #[instrument(skip_all)]
    pub fn new(
        profile_service: ProfileService,
        backend: Arc<dyn StatsBackend>,
        identity: SharedIdentity,
        config: AppConfig,
    ) -> Self {
        info!(backend = ?backend, "Creating LobbyController");
        Self {
            profile_service,
            backend,
            identity,
            config,
            current_user: None,
        }
    }

    /// Runs the lobby event loop until the user quits.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend + std::io::Write>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting lobby event loop");

        let mut screen =
            ActiveScreen::ProfileSelect(ProfileSelectScreen::new(&self.profile_service));

        loop {
            if let ActiveScreen::Game(game) = &mut screen {
                game.tick();
            }

            terminal.draw(|f| screen.as_screen().render(f, &self.profile_service))?;

            // Short poll keeps reveal timers responsive.
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
            {
                // Skip key release events (crossterm fires both press and release).
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                let transition = screen
                    .as_screen_mut()
                    .handle_key(key, &self.profile_service);

                screen = match self.apply_transition(transition, screen).await {
                    Some(next) => next,
                    None => {
                        info!("Lobby quitting");
                        return Ok(());
                    }
                };
            }

            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Applies a screen transition, returning the next screen or `None` to quit.
    #[instrument(skip(self, current))]
    async fn apply_transition(
        &mut self,
        transition: ScreenTransition,
        mut current: ActiveScreen,
    ) -> Option<ActiveScreen> {
        debug!(transition = ?transition, "Applying screen transition");
        match transition {
            ScreenTransition::Stay => Some(current),

            ScreenTransition::GoToProfileSelect => {
                info!("Navigating to ProfileSelect");
                Some(ActiveScreen::ProfileSelect(ProfileSelectScreen::new(
                    &self.profile_service,
                )))
            }

            ScreenTransition::PlayAsGuest => {
                self.current_user = None;
                self.identity.sign_out();
                Some(ActiveScreen::MainLobby(MainLobbyScreen::new(None, None)))
            }

            ScreenTransition::GoToMainLobby => {
                if let ActiveScreen::ProfileSelect(s) = &mut current
                    && let Some(user) = s.take_selected()
                {
                    self.identity.sign_in(*user.id());
                    self.current_user = Some(user);
                }
                info!(
                    user_id = self.current_user.as_ref().map(|u| *u.id()),
                    "Navigating to MainLobby"
                );
                Some(ActiveScreen::MainLobby(self.main_lobby().await))
            }

            ScreenTransition::GoToGame => {
                info!("Navigating to Game");
                Some(ActiveScreen::Game(Box::new(self.game_screen())))
            }

            ScreenTransition::GoToStatsView => {
                let Some(user) = self.current_user.clone() else {
                    warn!("No user for StatsView, staying in MainLobby");
                    return Some(current);
                };
                info!(user_id = user.id(), "Navigating to StatsView");
                let (stats, history) = tokio::join!(
                    self.backend.user_stats(*user.id()),
                    self.backend.user_scores(*user.id())
                );
                let stats = stats
                    .inspect_err(|e| warn!(error = %e, "Could not load user stats"))
                    .ok();
                let history = history
                    .inspect_err(|e| warn!(error = %e, "Could not load game history"))
                    .unwrap_or_default();
                Some(ActiveScreen::StatsView(StatsViewScreen::new(
                    user, stats, history,
                )))
            }

            ScreenTransition::GoToOverallStats => {
                info!("Navigating to OverallStats");
                let overall = self
                    .backend
                    .overall_stats()
                    .await
                    .inspect_err(|e| warn!(error = %e, "Could not load overall stats"))
                    .ok();
                let mine = match &self.current_user {
                    Some(user) => self
                        .backend
                        .user_stats(*user.id())
                        .await
                        .inspect_err(|e| warn!(error = %e, "Could not load user stats"))
                        .ok(),
                    None => None,
                };
                Some(ActiveScreen::OverallStats(OverallStatsScreen::new(
                    overall, mine,
                )))
            }

            ScreenTransition::Quit => {
                if let ActiveScreen::Game(game) = &mut current {
                    game.leave();
                }
                None
            }
        }
    }

    /// Builds the lobby for the current user, loading their stats from the backend.
    async fn main_lobby(&self) -> MainLobbyScreen {
        let stats = match &self.current_user {
            Some(user) => self
                .backend
                .user_stats(*user.id())
                .await
                .inspect_err(|e| warn!(error = %e, "Could not load lobby stats"))
                .ok(),
            None => None,
        };
        MainLobbyScreen::new(self.current_user.clone(), stats)
    }

    /// Builds a fresh game screen wired to the shared identity and backend.
    fn game_screen(&self) -> GameBoardScreen {
        let engine = GameEngine::new(Arc::new(self.identity.clone()))
            .with_reveal_duration(self.config.reveal_duration());
        let driver = GameDriver::new(engine, ResultDispatcher::new(Arc::clone(&self.backend)));
        GameBoardScreen::new(driver, *self.config.default_difficulty())
    }
}
