//! Tests for effect execution: reveal timers, result dispatch and the driver.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use monkey_memory::{
    Cell, Difficulty, Effect, GameEngine, GameEvent, GameResult, ManualClock, Phase,
    RevealTicket, SharedIdentity, ShuffledSequences,
};
use monkey_memory_app::{
    BackendError, GameDriver, GameRepository, GameScore, LocalStatsBackend, OverallStats,
    ProfileService, ResultDispatcher, RevealScheduler, StatsBackend, UserStats,
};

/// Backend that remembers submissions, or rejects all of them.
#[derive(Debug, Default)]
struct RecordingBackend {
    fail: bool,
    submitted: Mutex<Vec<GameResult>>,
}

impl RecordingBackend {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn submitted(&self) -> Vec<GameResult> {
        self.submitted.lock().expect("poisoned").clone()
    }
}

#[async_trait::async_trait]
impl StatsBackend for RecordingBackend {
    async fn submit_score(&self, result: GameResult) -> Result<GameScore, BackendError> {
        if self.fail {
            return Err(BackendError::rejected(503, "unavailable"));
        }
        self.submitted.lock().expect("poisoned").push(result.clone());
        Ok(GameScore::new(
            1,
            *result.user_id(),
            *result.score() as i32,
            *result.game_duration() as i32,
            result.difficulty().as_str().to_string(),
            result.created_at().naive_utc(),
        ))
    }

    async fn user_scores(&self, _user_id: i32) -> Result<Vec<GameScore>, BackendError> {
        Ok(Vec::new())
    }

    async fn user_stats(&self, _user_id: i32) -> Result<UserStats, BackendError> {
        Err(BackendError::new("not supported"))
    }

    async fn overall_stats(&self) -> Result<OverallStats, BackendError> {
        Err(BackendError::new("not supported"))
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
        .expect("Invalid timestamp")
        .with_timezone(&Utc)
}

fn sample_result() -> GameResult {
    GameResult::new(42, 2, 13, Difficulty::Easy, epoch())
}

fn engine(identity: SharedIdentity, reveal_ms: u64) -> GameEngine {
    GameEngine::with_parts(
        ShuffledSequences::seeded(99),
        Arc::new(ManualClock::new(epoch())),
        Arc::new(identity),
    )
    .with_reveal_duration(Duration::from_millis(reveal_ms))
}

fn reveal_ticket(effects: &[Effect]) -> RevealTicket {
    match effects {
        [Effect::ScheduleReveal { ticket, .. }] => *ticket,
        other => panic!("expected a single ScheduleReveal, got {other:?}"),
    }
}

/// Polls until `check` holds or a second has passed.
async fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}

#[tokio::test]
async fn test_scheduler_delivers_only_latest_ticket() {
    let mut game = engine(SharedIdentity::new(), 10);
    let first = reveal_ticket(&game.start_game());
    game.reset_to_setup();
    let second = reveal_ticket(&game.start_game());
    assert_ne!(first, second);

    let mut scheduler = RevealScheduler::new();
    scheduler.schedule(first, Duration::from_millis(20));
    scheduler.schedule(second, Duration::from_millis(20));

    let delivered = tokio::time::timeout(Duration::from_secs(2), scheduler.next())
        .await
        .expect("Timed out");
    assert_eq!(delivered, Some(second));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(scheduler.try_next(), None);
    assert!(!scheduler.is_pending());
}

#[tokio::test]
async fn test_cancelled_timer_never_fires() {
    let mut game = engine(SharedIdentity::new(), 10);
    let ticket = reveal_ticket(&game.start_game());

    let mut scheduler = RevealScheduler::new();
    scheduler.schedule(ticket, Duration::from_millis(30));
    assert!(scheduler.is_pending());
    scheduler.cancel();

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(scheduler.try_next(), None);
}

#[tokio::test]
async fn test_dispatcher_delivers_snapshot() {
    let backend = Arc::new(RecordingBackend::default());
    let dispatcher = ResultDispatcher::new(backend.clone());

    dispatcher
        .dispatch(sample_result())
        .await
        .expect("Dispatch task panicked");

    assert_eq!(backend.submitted(), vec![sample_result()]);
}

#[tokio::test]
async fn test_dispatcher_swallows_backend_failure() {
    let dispatcher = ResultDispatcher::new(Arc::new(RecordingBackend::failing()));
    let outcome = dispatcher.dispatch(sample_result()).await;
    assert!(outcome.is_ok(), "A failed submission must not panic the task");
}

#[tokio::test]
async fn test_driver_plays_a_round_and_submits_on_failure() {
    let identity = SharedIdentity::new();
    identity.sign_in(42);
    let backend = Arc::new(RecordingBackend::default());
    let mut driver = GameDriver::new(
        engine(identity, 10),
        ResultDispatcher::new(backend.clone()),
    );

    driver.handle(GameEvent::Start);
    assert_eq!(driver.session().phase(), Phase::Showing);

    let fired = tokio::time::timeout(Duration::from_secs(2), driver.wait_reveal())
        .await
        .expect("Reveal never fired");
    assert!(fired);
    assert_eq!(driver.session().phase(), Phase::Playing);

    let sequence = driver.session().sequence().clone();
    let first = sequence.get(0).expect("Empty sequence");
    let wrong = Cell::all()
        .find(|c| Some(*c) != sequence.get(1))
        .expect("Board has other cells");

    driver.handle(GameEvent::CellClicked(first));
    driver.handle(GameEvent::CellClicked(wrong));
    assert_eq!(driver.session().phase(), Phase::Finished);
    assert_eq!(driver.session().score(), 1);

    assert!(eventually(|| backend.submitted().len() == 1).await);
    let submitted = &backend.submitted()[0];
    assert_eq!(*submitted.user_id(), 42);
    assert_eq!(*submitted.score(), 1);
    assert_eq!(*submitted.difficulty(), Difficulty::Easy);
}

#[tokio::test]
async fn test_driver_reset_cancels_reveal() {
    let backend = Arc::new(RecordingBackend::default());
    let mut driver = GameDriver::new(
        engine(SharedIdentity::new(), 30),
        ResultDispatcher::new(backend.clone()),
    );

    driver.handle(GameEvent::Start);
    driver.handle(GameEvent::Reset);
    assert_eq!(driver.session().phase(), Phase::Waiting);

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(!driver.poll_reveal());
    assert_eq!(driver.session().phase(), Phase::Waiting);
}

#[tokio::test]
async fn test_wait_reveal_returns_when_nothing_scheduled() {
    let mut driver = GameDriver::new(
        engine(SharedIdentity::new(), 10),
        ResultDispatcher::new(Arc::new(RecordingBackend::default())),
    );

    let fired = tokio::time::timeout(Duration::from_secs(1), driver.wait_reveal())
        .await
        .expect("Waited on an empty scheduler");
    assert!(!fired);

    driver.handle(GameEvent::Start);
    driver.handle(GameEvent::Reset);
    let fired = tokio::time::timeout(Duration::from_secs(1), driver.wait_reveal())
        .await
        .expect("Waited on a cancelled reveal");
    assert!(!fired);
    assert_eq!(driver.session().phase(), Phase::Waiting);
}

#[tokio::test]
async fn test_scheduler_next_returns_delivered_ticket_after_timer_finishes() {
    let mut game = engine(SharedIdentity::new(), 10);
    let ticket = reveal_ticket(&game.start_game());

    let mut scheduler = RevealScheduler::new();
    scheduler.schedule(ticket, Duration::from_millis(5));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!scheduler.is_pending());
    assert_eq!(scheduler.next().await, Some(ticket));
    assert_eq!(scheduler.next().await, None);
}

#[tokio::test]
async fn test_guest_game_submits_nothing() {
    let backend = Arc::new(RecordingBackend::default());
    let mut driver = GameDriver::new(
        engine(SharedIdentity::new(), 10),
        ResultDispatcher::new(backend.clone()),
    );

    driver.handle(GameEvent::Start);
    tokio::time::timeout(Duration::from_secs(2), driver.wait_reveal())
        .await
        .expect("Reveal never fired");
    let wrong = Cell::all()
        .find(|c| Some(*c) != driver.session().sequence().get(0))
        .expect("Board has other cells");
    driver.handle(GameEvent::CellClicked(wrong));

    assert_eq!(driver.session().phase(), Phase::Finished);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(backend.submitted().is_empty());
}

#[tokio::test]
async fn test_local_backend_records_and_aggregates() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let repo = GameRepository::open(db_file.path().to_str().expect("Invalid path").to_string())
        .expect("Failed to open repository");
    let profiles = ProfileService::new(repo);
    let user = profiles
        .get_or_create_user("Nia".to_string())
        .expect("Create failed");
    let backend = LocalStatsBackend::new(profiles);

    for score in [3, 5] {
        backend
            .submit_score(GameResult::new(*user.id(), score, 9, Difficulty::Hard, Utc::now()))
            .await
            .expect("Submit failed");
    }

    let stats = backend.user_stats(*user.id()).await.expect("Stats failed");
    assert_eq!(stats.total_games, 2);
    assert_eq!(stats.best_score, 5);
    assert_eq!(stats.median_score, 4.0);

    let scores = backend.user_scores(*user.id()).await.expect("Scores failed");
    assert_eq!(scores.len(), 2);

    let overall = backend.overall_stats().await.expect("Overall failed");
    assert_eq!(overall.total_users, 1);
    assert_eq!(overall.recent_activity.last().map(|d| d.games_played), Some(2));
}
