//! Monkey Memory - terminal sequence-recall game.

#![warn(missing_docs)]

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use monkey_memory::SharedIdentity;
use monkey_memory_app::{
    AppConfig, Cli, Command, GameRepository, LobbyController, LocalStatsBackend, ProfileService,
    RestStatsClient, StatsBackend, stats,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,monkey_memory=debug,monkey_memory_app=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db_path) = cli.db_path.clone() {
        config = config.with_db_path(db_path);
    }
    if let Some(api_url) = cli.api_url.clone() {
        config = config.with_api_url(Some(api_url));
    }

    match cli.command() {
        Command::Play { reveal_ms } => {
            if let Some(reveal_ms) = reveal_ms {
                config = config.with_reveal_ms(reveal_ms);
            }
            run_play(config).await
        }
        Command::Stats { user, json } => {
            init_stderr_tracing();
            print_user_stats(&config, &user, json).await
        }
        Command::Overall { json } => {
            init_stderr_tracing();
            print_overall_stats(&config, json).await
        }
        Command::Users => {
            init_stderr_tracing();
            list_users(&config)
        }
        Command::AddUser { name } => {
            init_stderr_tracing();
            add_user(&config, name)
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .try_init();
}

/// Opens the profile store, applying migrations.
fn open_profiles(config: &AppConfig) -> Result<ProfileService> {
    let repository = GameRepository::open(config.db_path().clone())
        .with_context(|| format!("opening database {}", config.db_path()))?;
    Ok(ProfileService::new(repository))
}

/// Chooses the remote API when configured, local storage otherwise.
fn stats_backend(config: &AppConfig, profiles: &ProfileService) -> Arc<dyn StatsBackend> {
    match config.api_url() {
        Some(url) => {
            info!(api_url = %url, "Using remote stats backend");
            Arc::new(RestStatsClient::new(url))
        }
        None => {
            info!(db_path = %config.db_path(), "Using local stats backend");
            Arc::new(LocalStatsBackend::new(profiles.clone()))
        }
    }
}

/// Runs the terminal UI.
#[instrument(skip_all)]
async fn run_play(config: AppConfig) -> Result<()> {
    // Log to a file so output does not corrupt the terminal.
    let log_file = std::fs::File::create(config.log_file())
        .with_context(|| format!("creating log file {}", config.log_file()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!("Starting Monkey Memory");

    let profiles = open_profiles(&config)?;
    let backend = stats_backend(&config, &profiles);
    let mut controller =
        LobbyController::new(profiles, backend, SharedIdentity::new(), config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = controller.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "Lobby exited with error");
    }
    result
}

#[instrument(skip(config))]
async fn print_user_stats(config: &AppConfig, name: &str, json: bool) -> Result<()> {
    let profiles = open_profiles(config)?;
    let user = profiles
        .repository()
        .get_user_by_name(name)?
        .with_context(|| format!("no profile named '{}'", name))?;
    let backend = stats_backend(config, &profiles);

    let (user_stats, history) =
        tokio::join!(backend.user_stats(*user.id()), backend.user_scores(*user.id()));
    let user_stats = user_stats?;
    let history = history?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user_stats)?);
        return Ok(());
    }

    println!("Statistics for {}", user.display_name());
    println!("  Best score:    {}", user_stats.best_score);
    println!("  Median score:  {:.1}", user_stats.median_score);
    println!("  Average score: {:.1}", user_stats.average_score);
    println!("  Games played:  {}", user_stats.total_games);
    println!("  Trend:         {:?}", user_stats.score_trend);
    println!(
        "  Improvement:   {:+}",
        stats::score_improvement(&history)
    );
    println!("Recent games:");
    for game in history.iter().rev().take(10) {
        println!(
            "  {}  score {:>2}  {:<6}  {}s",
            game.created_at().format("%Y-%m-%d %H:%M"),
            game.score(),
            game.difficulty(),
            game.game_duration()
        );
    }
    Ok(())
}

#[instrument(skip(config))]
async fn print_overall_stats(config: &AppConfig, json: bool) -> Result<()> {
    let profiles = open_profiles(config)?;
    let overall = stats_backend(config, &profiles).overall_stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&overall)?);
        return Ok(());
    }

    println!("Players:        {}", overall.total_users);
    println!("Best score:     {}", overall.global_best_score);
    println!("Average score:  {:.1}", overall.global_average_score);
    println!("Median score:   {:.1}", overall.global_median_score);
    println!("Distribution:");
    for bucket in &overall.score_distribution {
        println!("  {:>5}  {}", bucket.score_range, bucket.count);
    }
    println!("Recent activity:");
    for day in &overall.recent_activity {
        println!("  {}  {}", day.date, day.games_played);
    }
    Ok(())
}

#[instrument(skip(config))]
fn list_users(config: &AppConfig) -> Result<()> {
    let profiles = open_profiles(config)?;
    for user in profiles.repository().list_users()? {
        println!("{:>4}  {}", user.id(), user.display_name());
    }
    Ok(())
}

#[instrument(skip(config))]
fn add_user(config: &AppConfig, name: String) -> Result<()> {
    let profiles = open_profiles(config)?;
    match profiles.repository().create_user(name.clone()) {
        Ok(user) => {
            println!("Created profile {} (id {})", user.display_name(), user.id());
            Ok(())
        }
        Err(e) if e.is_conflict() => anyhow::bail!("a profile named '{}' already exists", name),
        Err(e) => Err(e.into()),
    }
}
