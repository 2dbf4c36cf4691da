//! Tests for database repository and profile service operations.

use chrono::{DateTime, NaiveDate, Utc};
use tempfile::NamedTempFile;

use monkey_memory::{Difficulty, GameResult};
use monkey_memory_app::{GameRepository, NewGameScore, ProfileService};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::open(db_path).expect("Failed to open repository");
    (db_file, repo)
}

fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .expect("Invalid timestamp")
        .with_timezone(&Utc)
}

fn result(user_id: i32, score: u32, difficulty: Difficulty, timestamp: &str) -> GameResult {
    GameResult::new(user_id, score, 20, difficulty, at(timestamp))
}

#[test]
fn test_create_user() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user("Alice".to_string()).expect("Create failed");
    assert_eq!(user.display_name(), "Alice");
    assert!(*user.id() > 0);
}

#[test]
fn test_duplicate_name_is_a_conflict() {
    let (_db, repo) = setup_test_db();
    repo.create_user("Bob".to_string()).expect("First create failed");
    let err = repo
        .create_user("Bob".to_string())
        .expect_err("Duplicate name should fail");
    assert!(err.is_conflict());
}

#[test]
fn test_get_user_by_id_and_name() {
    let (_db, repo) = setup_test_db();
    let carol = repo.create_user("Carol".to_string()).expect("Create failed");

    let by_id = repo.get_user(*carol.id()).expect("Query failed");
    assert_eq!(by_id.as_ref(), Some(&carol));

    let by_name = repo.get_user_by_name("Carol").expect("Query failed");
    assert_eq!(by_name, Some(carol));

    assert!(repo.get_user_by_name("Nobody").expect("Query failed").is_none());
    assert!(repo.get_user(9999).expect("Query failed").is_none());
}

#[test]
fn test_list_and_count_users() {
    let (_db, repo) = setup_test_db();
    assert_eq!(repo.count_users().expect("Count failed"), 0);
    for name in ["Dana", "Eli", "Fay"] {
        repo.create_user(name.to_string()).expect("Create failed");
    }
    let names: Vec<String> = repo
        .list_users()
        .expect("List failed")
        .iter()
        .map(|u| u.display_name().clone())
        .collect();
    assert_eq!(names, vec!["Dana", "Eli", "Fay"]);
    assert_eq!(repo.count_users().expect("Count failed"), 3);
}

#[test]
fn test_open_is_idempotent() {
    let (db, repo) = setup_test_db();
    repo.create_user("Gus".to_string()).expect("Create failed");
    let reopened = GameRepository::open(repo.db_path().to_string()).expect("Reopen failed");
    assert_eq!(reopened.count_users().expect("Count failed"), 1);
    drop(db);
}

#[test]
fn test_record_score_round_trips() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user("Hana".to_string()).expect("Create failed");
    let stored = repo
        .record_score(NewGameScore::from(&result(
            *user.id(),
            7,
            Difficulty::Medium,
            "2024-03-01T09:30:00Z",
        )))
        .expect("Record failed");

    assert!(*stored.id() > 0);
    assert_eq!(*stored.user_id(), *user.id());
    assert_eq!(*stored.score(), 7);
    assert_eq!(*stored.game_duration(), 20);
    assert_eq!(stored.parse_difficulty().expect("Bad difficulty"), Difficulty::Medium);
    assert_eq!(*stored.created_at(), at("2024-03-01T09:30:00Z").naive_utc());
}

#[test]
fn test_user_scores_are_chronological_and_isolated() {
    let (_db, repo) = setup_test_db();
    let ida = repo.create_user("Ida".to_string()).expect("Create failed");
    let jon = repo.create_user("Jon".to_string()).expect("Create failed");

    for (score, ts) in [
        (5, "2024-03-03T10:00:00Z"),
        (3, "2024-03-01T10:00:00Z"),
        (4, "2024-03-02T10:00:00Z"),
    ] {
        repo.record_score(NewGameScore::from(&result(*ida.id(), score, Difficulty::Easy, ts)))
            .expect("Record failed");
    }
    repo.record_score(NewGameScore::from(&result(
        *jon.id(),
        9,
        Difficulty::Hard,
        "2024-03-02T11:00:00Z",
    )))
    .expect("Record failed");

    let ida_scores: Vec<i32> = repo
        .get_user_scores(*ida.id())
        .expect("Query failed")
        .iter()
        .map(|s| *s.score())
        .collect();
    assert_eq!(ida_scores, vec![3, 4, 5]);
    assert_eq!(repo.all_scores().expect("Query failed").len(), 4);
}

#[test]
fn test_profile_service_get_or_create() {
    let (_db, repo) = setup_test_db();
    let service = ProfileService::new(repo);
    let first = service
        .get_or_create_user("Kim".to_string())
        .expect("Create failed");
    let second = service
        .get_or_create_user("Kim".to_string())
        .expect("Lookup failed");
    assert_eq!(first.id(), second.id());
    assert_eq!(service.repository().count_users().expect("Count failed"), 1);
}

#[test]
fn test_profile_service_stats() {
    let (_db, repo) = setup_test_db();
    let service = ProfileService::new(repo);
    let lee = service.get_or_create_user("Lee".to_string()).expect("Create failed");
    let max = service.get_or_create_user("Max".to_string()).expect("Create failed");

    for (score, ts) in [(4, "2024-03-08T10:00:00Z"), (8, "2024-03-09T10:00:00Z")] {
        service
            .record_result(&result(*lee.id(), score, Difficulty::Easy, ts))
            .expect("Record failed");
    }
    service
        .record_result(&result(*max.id(), 12, Difficulty::Hard, "2024-03-09T12:00:00Z"))
        .expect("Record failed");

    let lee_stats = service.user_stats(*lee.id()).expect("Stats failed");
    assert_eq!(lee_stats.best_score, 8);
    assert_eq!(lee_stats.average_score, 6.0);
    assert_eq!(lee_stats.score_trend, vec![4, 8]);
    assert_eq!(service.history(*lee.id()).expect("History failed").len(), 2);

    let today = NaiveDate::from_ymd_opt(2024, 3, 9).expect("Invalid date");
    let overall = service.overall_stats(today).expect("Overall failed");
    assert_eq!(overall.total_users, 2);
    assert_eq!(overall.global_best_score, 12);
    assert_eq!(overall.global_average_score, 8.0);
    let last_two: Vec<i64> = overall.recent_activity[5..]
        .iter()
        .map(|d| d.games_played)
        .collect();
    assert_eq!(last_two, vec![1, 2]);
    let twelve_plus = overall
        .score_distribution
        .iter()
        .find(|b| b.score_range == "12+")
        .expect("Missing bucket");
    assert_eq!(twelve_plus.count, 1);
}
