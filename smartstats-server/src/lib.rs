use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use smartstats_persistence::{GameRepository, RosterRepository, TeamRepository};
use tokio::sync::Mutex;
use warp::Filter;

use crate::analyzer::ScoresheetAnalyzer;
use crate::config::Config;
use crate::rate_limiter::RateLimiter;

pub mod analyzer;
pub mod config;
pub mod error;
pub mod handlers;
pub mod rate_limiter;

/// Largest JSON body accepted; games may carry a base64 scoresheet image
pub const JSON_BODY_LIMIT: u64 = 50 * 1024 * 1024;

// Room for the notes field and multipart framing on top of the photo
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Everything the analyze endpoint needs besides the stores
pub struct AnalyzeService {
    pub analyzer: ScoresheetAnalyzer,
    pub limiter: Mutex<RateLimiter>,
    pub config: Config,
}

impl AnalyzeService {
    pub fn new(config: Config) -> Self {
        Self {
            analyzer: ScoresheetAnalyzer::new(
                config.anthropic_base_url.clone(),
                config.anthropic_model.clone(),
            ),
            limiter: Mutex::new(RateLimiter::new(
                config.analyze_rate_limit,
                Duration::from_secs(config.analyze_refill_seconds),
            )),
            config,
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub teams: Arc<TeamRepository>,
    pub roster: Arc<RosterRepository>,
    pub games: Arc<GameRepository>,
    pub analyze: Arc<AnalyzeService>,
}

impl AppServices {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            teams: Arc::new(TeamRepository::new(db.clone())),
            roster: Arc::new(RosterRepository::new(db.clone())),
            games: Arc::new(GameRepository::new(db)),
            analyze: Arc::new(AnalyzeService::new(config)),
        }
    }
}

pub fn create_routes(
    services: AppServices,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let max_upload_bytes = services.analyze.config.max_upload_bytes;

    // Clone for filters
    let teams_filter = warp::any().map({
        let teams = services.teams.clone();
        move || teams.clone()
    });

    let roster_filter = warp::any().map({
        let roster = services.roster.clone();
        move || roster.clone()
    });

    let games_filter = warp::any().map({
        let games = services.games.clone();
        move || games.clone()
    });

    let analyze_filter = warp::any().map({
        let analyze = services.analyze.clone();
        move || analyze.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Teams
    let list_teams = warp::path!("api" / "teams")
        .and(warp::get())
        .and(teams_filter.clone())
        .and_then(handlers::list_teams);

    let create_team = warp::path!("api" / "teams")
        .and(warp::post())
        .and(json_body())
        .and(teams_filter.clone())
        .and_then(handlers::create_team);

    let rename_team = warp::path!("api" / "teams" / String)
        .and(warp::put())
        .and(json_body())
        .and(teams_filter.clone())
        .and_then(handlers::rename_team);

    let delete_team = warp::path!("api" / "teams" / String)
        .and(warp::delete())
        .and(teams_filter.clone())
        .and_then(handlers::delete_team);

    let teams = list_teams.or(create_team).or(rename_team).or(delete_team);

    // Roster
    let list_roster = warp::path!("api" / "teams" / String / "roster")
        .and(warp::get())
        .and(teams_filter.clone())
        .and(roster_filter.clone())
        .and_then(handlers::list_roster);

    let add_player = warp::path!("api" / "teams" / String / "roster")
        .and(warp::post())
        .and(json_body())
        .and(teams_filter.clone())
        .and(roster_filter.clone())
        .and_then(handlers::add_player);

    let update_player = warp::path!("api" / "teams" / String / "roster" / String)
        .and(warp::put())
        .and(json_body())
        .and(teams_filter.clone())
        .and(roster_filter.clone())
        .and_then(handlers::update_player);

    let delete_player = warp::path!("api" / "teams" / String / "roster" / String)
        .and(warp::delete())
        .and(teams_filter.clone())
        .and(roster_filter.clone())
        .and_then(handlers::delete_player);

    let roster = list_roster
        .or(add_player)
        .or(update_player)
        .or(delete_player);

    // Games
    let list_games = warp::path!("api" / "teams" / String / "games")
        .and(warp::get())
        .and(teams_filter.clone())
        .and(games_filter.clone())
        .and_then(handlers::list_games);

    let submit_game = warp::path!("api" / "teams" / String / "games")
        .and(warp::post())
        .and(json_body())
        .and(teams_filter.clone())
        .and(games_filter.clone())
        .and_then(handlers::submit_game);

    let attribute_players = warp::path!("api" / "teams" / String / "games" / "attribute")
        .and(warp::post())
        .and(json_body())
        .and(teams_filter.clone())
        .and(roster_filter.clone())
        .and_then(handlers::attribute_players);

    let get_game = warp::path!("api" / "teams" / String / "games" / String)
        .and(warp::get())
        .and(teams_filter.clone())
        .and(games_filter.clone())
        .and_then(handlers::get_game);

    let update_game = warp::path!("api" / "teams" / String / "games" / String)
        .and(warp::put())
        .and(json_body())
        .and(teams_filter.clone())
        .and(games_filter.clone())
        .and_then(handlers::update_game);

    let delete_game = warp::path!("api" / "teams" / String / "games" / String)
        .and(warp::delete())
        .and(teams_filter.clone())
        .and(games_filter.clone())
        .and_then(handlers::delete_game);

    let export_game = warp::path!("api" / "teams" / String / "games" / String / "export.csv")
        .and(warp::get())
        .and(warp::query::<handlers::GameExportQuery>())
        .and(teams_filter.clone())
        .and(games_filter.clone())
        .and_then(handlers::export_game_csv);

    let games = list_games
        .or(submit_game)
        .or(attribute_players)
        .or(get_game)
        .or(update_game)
        .or(delete_game)
        .or(export_game);

    // Season stats and lineup
    let stats = warp::path!("api" / "teams" / String / "stats")
        .and(warp::get())
        .and(warp::query::<handlers::StatsQuery>())
        .and(teams_filter.clone())
        .and(games_filter.clone())
        .and_then(handlers::get_stats);

    let export_stats = warp::path!("api" / "teams" / String / "stats" / "export.csv")
        .and(warp::get())
        .and(teams_filter.clone())
        .and(games_filter.clone())
        .and_then(handlers::export_stats_csv);

    let lineup = warp::path!("api" / "teams" / String / "lineup")
        .and(warp::get())
        .and(teams_filter.clone())
        .and(games_filter.clone())
        .and_then(handlers::get_lineup);

    // Scoresheet analysis
    let analyze = warp::path!("api" / "teams" / String / "analyze")
        .and(warp::post())
        .and(warp::header::optional::<String>("x-api-key"))
        .and(warp::multipart::form().max_length(max_upload_bytes + MULTIPART_OVERHEAD_BYTES))
        .and(teams_filter.clone())
        .and(roster_filter.clone())
        .and(analyze_filter.clone())
        .and_then(handlers::analyze_scoresheet);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "x-api-key"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    health
        .or(teams)
        .or(roster)
        .or(games)
        .or(stats)
        .or(export_stats)
        .or(lineup)
        .or(analyze)
        .recover(error::handle_rejection)
        .with(cors)
        .with(warp::log("smartstats"))
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(JSON_BODY_LIMIT).and(warp::body::json())
}

/// Serves the built frontend, falling back to `index.html` for client-side routes
pub fn static_routes(
    dir: PathBuf,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let index = dir.join("index.html");
    warp::get().and(warp::fs::dir(dir).or(warp::fs::file(index)))
}
