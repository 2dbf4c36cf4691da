//! Database repository for user profiles and game scores.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbErrorKind, GameScore, NewGameScore, User, models::NewUser, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for user and score operations.
///
/// Holds only the database path; each operation opens its own connection,
/// so the repository is cheap to clone and move onto blocking threads.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a repository for an existing, already migrated database.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating GameRepository");
        Self { db_path }
    }

    /// Opens the database at `db_path`, creating the file and applying any
    /// pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repository = Self::new(db_path);
        repository.run_migrations()?;
        Ok(repository)
    }

    /// Returns the database path.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            DbError::new(DbErrorKind::Migration, format!("Migration failed: {}", e))
        })?;
        info!(applied = applied.len(), "Migrations up to date");
        Ok(())
    }

    /// Creates a new user profile.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] with [`DbErrorKind::Conflict`] if the display name
    /// is already taken, or another [`DbError`] on database failure.
    #[instrument(skip(self))]
    pub fn create_user(&self, display_name: String) -> Result<User, DbError> {
        debug!(display_name = %display_name, "Creating user");
        let mut conn = self.connection()?;

        let user = diesel::insert_into(schema::users::table)
            .values(&NewUser::new(display_name))
            .returning(User::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = user.id(), display_name = %user.display_name(), "User created");
        Ok(user)
    }

    /// Gets a user by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user(&self, user_id: i32) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = schema::users::table
            .find(user_id)
            .first::<User>(&mut conn)
            .optional()?;
        debug!(found = user.is_some(), "User lookup by id");
        Ok(user)
    }

    /// Gets a user by display name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_name(&self, display_name: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = schema::users::table
            .filter(schema::users::display_name.eq(display_name))
            .first::<User>(&mut conn)
            .optional()?;
        debug!(found = user.is_some(), "User lookup by name");
        Ok(user)
    }

    /// Lists all user profiles in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<User>, DbError> {
        let mut conn = self.connection()?;
        let users = schema::users::table
            .order((schema::users::created_at.asc(), schema::users::id.asc()))
            .load::<User>(&mut conn)?;
        info!(count = users.len(), "Users loaded");
        Ok(users)
    }

    /// Counts user profiles.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count_users(&self) -> Result<i64, DbError> {
        let mut conn = self.connection()?;
        let count = schema::users::table.count().get_result(&mut conn)?;
        Ok(count)
    }

    /// Records a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, score), fields(user_id = score.user_id(), score = score.score()))]
    pub fn record_score(&self, score: NewGameScore) -> Result<GameScore, DbError> {
        let mut conn = self.connection()?;

        let recorded = diesel::insert_into(schema::game_scores::table)
            .values(&score)
            .returning(GameScore::as_returning())
            .get_result(&mut conn)?;

        info!(
            score_id = recorded.id(),
            user_id = recorded.user_id(),
            score = recorded.score(),
            difficulty = %recorded.difficulty(),
            "Game score recorded"
        );
        Ok(recorded)
    }

    /// Gets every score of a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_scores(&self, user_id: i32) -> Result<Vec<GameScore>, DbError> {
        let mut conn = self.connection()?;
        let scores = schema::game_scores::table
            .filter(schema::game_scores::user_id.eq(user_id))
            .order((
                schema::game_scores::created_at.asc(),
                schema::game_scores::id.asc(),
            ))
            .load::<GameScore>(&mut conn)?;
        info!(user_id, count = scores.len(), "User scores loaded");
        Ok(scores)
    }

    /// Gets every recorded score, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn all_scores(&self) -> Result<Vec<GameScore>, DbError> {
        let mut conn = self.connection()?;
        let scores = schema::game_scores::table
            .order((
                schema::game_scores::created_at.asc(),
                schema::game_scores::id.asc(),
            ))
            .load::<GameScore>(&mut conn)?;
        debug!(count = scores.len(), "All scores loaded");
        Ok(scores)
    }
}
