use std::sync::Arc;

use chrono::Utc;
use futures_util::{TryStreamExt, pin_mut};
use serde::Deserialize;
use smartstats_core::export::{game_stats_csv, season_stats_csv};
use smartstats_core::{
    LineupBuilder, RosterMatcher, SortDirection, SortKey, StatsAggregator, name_slug,
    sort_season_stats,
};
use smartstats_persistence::{GameRepository, RosterRepository, TeamRepository};
use smartstats_types::{
    GameSubmission, GameUpdate, NewPlayer, PlayerGameStats, PlayerPatch, Side, TeamId, TeamName,
};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::hyper::body::Buf;
use warp::multipart::{FormData, Part};
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::AnalyzeService;
use crate::analyzer::{AnalyzeError, ScoresheetImage};
use crate::error::{ApiRejection, error_reply};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    sort: Option<String>,
    order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GameExportQuery {
    #[serde(default)]
    side: Side,
}

fn json_reply<T: serde::Serialize>(value: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(value), status).into_response()
}

fn no_content() -> Response {
    warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT).into_response()
}

fn csv_reply(body: String, filename: &str) -> Response {
    let reply = warp::reply::with_header(body, "content-type", "text/csv; charset=utf-8");
    warp::reply::with_header(
        reply,
        "content-disposition",
        format!("attachment; filename=\"{}\"", filename),
    )
    .into_response()
}

/// Slug reduced to characters that are safe inside a quoted header value
fn filename_part(text: &str) -> String {
    name_slug(text)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiRejection> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiRejection::bad_request(format!("Invalid {} ID format", what)))
}

/// Parses a team id from the path and checks the team exists
async fn resolve_team(teams: &TeamRepository, raw: &str) -> Result<TeamId, ApiRejection> {
    let team_id = parse_id(raw, "team")?;
    match teams.exists(team_id).await {
        Ok(true) => Ok(team_id),
        Ok(false) => Err(ApiRejection::not_found("Team not found")),
        Err(err) => Err(ApiRejection::internal("Failed to load team", err)),
    }
}

fn required_name(name: &str, message: &str) -> Result<String, ApiRejection> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiRejection::bad_request(message));
    }
    Ok(name.to_string())
}

// Teams

pub async fn list_teams(teams: Arc<TeamRepository>) -> Result<Response, Rejection> {
    let list = teams
        .list_or_create_default()
        .await
        .map_err(|e| ApiRejection::internal("Failed to fetch teams", e))?;
    Ok(json_reply(&list, StatusCode::OK))
}

pub async fn create_team(
    body: TeamName,
    teams: Arc<TeamRepository>,
) -> Result<Response, Rejection> {
    let name = required_name(&body.name, "Team name is required")?;
    let team = teams
        .create(&name)
        .await
        .map_err(|e| ApiRejection::internal("Failed to create team", e))?;
    Ok(json_reply(&team, StatusCode::CREATED))
}

pub async fn rename_team(
    team_id: String,
    body: TeamName,
    teams: Arc<TeamRepository>,
) -> Result<Response, Rejection> {
    let team_id = parse_id(&team_id, "team")?;
    let name = required_name(&body.name, "Team name is required")?;
    match teams.rename(team_id, &name).await {
        Ok(Some(team)) => Ok(json_reply(&team, StatusCode::OK)),
        Ok(None) => Err(ApiRejection::not_found("Team not found").into()),
        Err(e) => Err(ApiRejection::internal("Failed to rename team", e).into()),
    }
}

pub async fn delete_team(
    team_id: String,
    teams: Arc<TeamRepository>,
) -> Result<Response, Rejection> {
    let team_id = parse_id(&team_id, "team")?;
    teams
        .delete(team_id)
        .await
        .map_err(|e| ApiRejection::internal("Failed to delete team", e))?;
    Ok(no_content())
}

// Roster

pub async fn list_roster(
    team_id: String,
    teams: Arc<TeamRepository>,
    roster: Arc<RosterRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let players = roster
        .list(team_id)
        .await
        .map_err(|e| ApiRejection::internal("Failed to fetch roster", e))?;
    Ok(json_reply(&players, StatusCode::OK))
}

pub async fn add_player(
    team_id: String,
    body: NewPlayer,
    teams: Arc<TeamRepository>,
    roster: Arc<RosterRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    required_name(&body.first_name, "firstName is required")?;
    let player = roster
        .add(team_id, body)
        .await
        .map_err(|e| ApiRejection::internal("Failed to add player", e))?;
    Ok(json_reply(&player, StatusCode::CREATED))
}

pub async fn update_player(
    team_id: String,
    player_id: String,
    patch: PlayerPatch,
    teams: Arc<TeamRepository>,
    roster: Arc<RosterRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let player_id = parse_id(&player_id, "player")?;
    if let Some(first_name) = &patch.first_name {
        required_name(first_name, "firstName cannot be empty")?;
    }
    match roster.update(team_id, player_id, patch).await {
        Ok(Some(player)) => Ok(json_reply(&player, StatusCode::OK)),
        Ok(None) => Err(ApiRejection::not_found("Player not found").into()),
        Err(e) => Err(ApiRejection::internal("Failed to update player", e).into()),
    }
}

pub async fn delete_player(
    team_id: String,
    player_id: String,
    teams: Arc<TeamRepository>,
    roster: Arc<RosterRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let player_id = parse_id(&player_id, "player")?;
    roster
        .delete(team_id, player_id)
        .await
        .map_err(|e| ApiRejection::internal("Failed to delete player", e))?;
    Ok(no_content())
}

/// Stamps roster ids onto analyzed batting lines
pub async fn attribute_players(
    team_id: String,
    players: Vec<PlayerGameStats>,
    teams: Arc<TeamRepository>,
    roster: Arc<RosterRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let roster = roster
        .list(team_id)
        .await
        .map_err(|e| ApiRejection::internal("Failed to fetch roster", e))?;
    let attributed = RosterMatcher::new(&roster).attribute(players);
    Ok(json_reply(&attributed, StatusCode::OK))
}

// Games

pub async fn list_games(
    team_id: String,
    teams: Arc<TeamRepository>,
    games: Arc<GameRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let summaries = games
        .list_summaries(team_id)
        .await
        .map_err(|e| ApiRejection::internal("Failed to fetch games", e))?;
    Ok(json_reply(&summaries, StatusCode::OK))
}

pub async fn get_game(
    team_id: String,
    game_id: String,
    teams: Arc<TeamRepository>,
    games: Arc<GameRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let game_id = parse_id(&game_id, "game")?;
    match games.find_by_id(team_id, game_id).await {
        Ok(Some(game)) => Ok(json_reply(&game, StatusCode::OK)),
        Ok(None) => Err(ApiRejection::not_found("Game not found").into()),
        Err(e) => Err(ApiRejection::internal("Failed to fetch game", e).into()),
    }
}

/// 201 when the submission starts a new game, 200 when it merged into one
pub async fn submit_game(
    team_id: String,
    submission: GameSubmission,
    teams: Arc<TeamRepository>,
    games: Arc<GameRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let now = Utc::now();
    let outcome = games
        .submit(team_id, submission, now.date_naive(), now)
        .await
        .map_err(|e| ApiRejection::internal("Failed to save game", e))?;

    let status = if outcome.was_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(json_reply(outcome.game(), status))
}

pub async fn update_game(
    team_id: String,
    game_id: String,
    update: GameUpdate,
    teams: Arc<TeamRepository>,
    games: Arc<GameRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let game_id = parse_id(&game_id, "game")?;
    match games.update(team_id, game_id, update).await {
        Ok(Some(game)) => Ok(json_reply(&game, StatusCode::OK)),
        Ok(None) => Err(ApiRejection::not_found("Game not found").into()),
        Err(e) => Err(ApiRejection::internal("Failed to update game", e).into()),
    }
}

pub async fn delete_game(
    team_id: String,
    game_id: String,
    teams: Arc<TeamRepository>,
    games: Arc<GameRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let game_id = parse_id(&game_id, "game")?;
    games
        .delete(team_id, game_id)
        .await
        .map_err(|e| ApiRejection::internal("Failed to delete game", e))?;
    Ok(no_content())
}

pub async fn export_game_csv(
    team_id: String,
    game_id: String,
    query: GameExportQuery,
    teams: Arc<TeamRepository>,
    games: Arc<GameRepository>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;
    let game_id = parse_id(&game_id, "game")?;
    let game = games
        .find_by_id(team_id, game_id)
        .await
        .map_err(|e| ApiRejection::internal("Failed to fetch game", e))?
        .ok_or_else(|| ApiRejection::not_found("Game not found"))?;

    let stats = match query.side {
        Side::Home => game.player_stats.as_slice(),
        Side::Away => game.opponent_stats.as_deref().unwrap_or_default(),
    };
    let body = game_stats_csv(stats)
        .map_err(|e| ApiRejection::internal("Failed to export game", e))?;

    let filename = format!("game-{}-{}.csv", game.date, filename_part(&game.opponent));
    Ok(csv_reply(body, &filename))
}

// Season

async fn season_stats(
    teams: &TeamRepository,
    games: &GameRepository,
    team_id: &str,
) -> Result<Vec<smartstats_types::SeasonPlayerStats>, ApiRejection> {
    let team_id = resolve_team(teams, team_id).await?;
    let games = games
        .list(team_id)
        .await
        .map_err(|e| ApiRejection::internal("Failed to fetch games", e))?;
    Ok(StatsAggregator::aggregate(&games))
}

/// Season totals, sorted by `sort` (default AVG) in `order` (default desc)
pub async fn get_stats(
    team_id: String,
    query: StatsQuery,
    teams: Arc<TeamRepository>,
    games: Arc<GameRepository>,
) -> Result<Response, Rejection> {
    let key = match query.sort.as_deref() {
        Some(sort) => sort.parse::<SortKey>().map_err(ApiRejection::bad_request)?,
        None => SortKey::Avg,
    };
    let direction = match query.order.as_deref() {
        Some(order) => order
            .parse::<SortDirection>()
            .map_err(ApiRejection::bad_request)?,
        None => SortDirection::Desc,
    };

    let mut stats = season_stats(&teams, &games, &team_id).await?;
    sort_season_stats(&mut stats, key, direction);
    Ok(json_reply(&stats, StatusCode::OK))
}

pub async fn export_stats_csv(
    team_id: String,
    teams: Arc<TeamRepository>,
    games: Arc<GameRepository>,
) -> Result<Response, Rejection> {
    let mut stats = season_stats(&teams, &games, &team_id).await?;
    sort_season_stats(&mut stats, SortKey::Avg, SortDirection::Desc);
    let body = season_stats_csv(&stats)
        .map_err(|e| ApiRejection::internal("Failed to export stats", e))?;
    Ok(csv_reply(body, "season-stats.csv"))
}

pub async fn get_lineup(
    team_id: String,
    teams: Arc<TeamRepository>,
    games: Arc<GameRepository>,
) -> Result<Response, Rejection> {
    let stats = season_stats(&teams, &games, &team_id).await?;
    let lineup = LineupBuilder::recommend(&stats);
    Ok(json_reply(&lineup, StatusCode::OK))
}

// Analysis

struct UploadedPhoto {
    data: Vec<u8>,
    media_type: String,
}

#[derive(Default)]
struct ScoresheetUpload {
    photo: Option<UploadedPhoto>,
    notes: String,
}

async fn read_part(part: Part) -> Result<Vec<u8>, warp::Error> {
    part.stream()
        .try_fold(Vec::new(), |mut data, mut chunk| async move {
            while chunk.has_remaining() {
                let slice = chunk.chunk();
                let len = slice.len();
                data.extend_from_slice(slice);
                chunk.advance(len);
            }
            Ok(data)
        })
        .await
}

async fn read_upload(form: FormData) -> Result<ScoresheetUpload, warp::Error> {
    let mut upload = ScoresheetUpload::default();
    pin_mut!(form);

    while let Some(part) = form.try_next().await? {
        let name = part.name().to_string();
        match name.as_str() {
            "photo" => {
                let media_type = part
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = read_part(part).await?;
                upload.photo = Some(UploadedPhoto { data, media_type });
            }
            "notes" => {
                let data = read_part(part).await?;
                upload.notes = String::from_utf8_lossy(&data).into_owned();
            }
            _ => {}
        }
    }

    Ok(upload)
}

fn analyze_rejection(err: AnalyzeError) -> ApiRejection {
    if err.is_client_error() {
        return ApiRejection::bad_request(err.to_string());
    }
    tracing::error!("Scoresheet analysis failed: {}", err);
    ApiRejection::new(StatusCode::BAD_GATEWAY, err.to_string())
}

/// Reads an uploaded scoresheet photo with the vision model
pub async fn analyze_scoresheet(
    team_id: String,
    api_key_header: Option<String>,
    form: FormData,
    teams: Arc<TeamRepository>,
    roster: Arc<RosterRepository>,
    analyze: Arc<AnalyzeService>,
) -> Result<Response, Rejection> {
    let team_id = resolve_team(&teams, &team_id).await?;

    let upload = read_upload(form).await.map_err(|e| {
        tracing::warn!("Failed to read scoresheet upload: {}", e);
        ApiRejection::bad_request("Invalid upload")
    })?;
    let photo = upload
        .photo
        .ok_or_else(|| ApiRejection::bad_request("No photo uploaded"))?;
    // The multipart cap leaves room for form overhead; the photo itself must fit
    if photo.data.len() as u64 > analyze.config.max_upload_bytes {
        return Err(ApiRejection::new(StatusCode::PAYLOAD_TOO_LARGE, "Upload too large").into());
    }
    let api_key = analyze
        .config
        .resolve_api_key(api_key_header)
        .ok_or_else(|| analyze_rejection(AnalyzeError::MissingApiKey))?;

    if !analyze.limiter.lock().await.check_rate_limit() {
        return Ok(error_reply(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many analysis requests, try again shortly",
        ));
    }

    let roster = roster
        .list(team_id)
        .await
        .map_err(|e| ApiRejection::internal("Failed to fetch roster", e))?;
    let image = ScoresheetImage {
        data: &photo.data,
        media_type: &photo.media_type,
    };
    let analysis = analyze
        .analyzer
        .analyze(&api_key, image, &roster, &upload.notes)
        .await
        .map_err(analyze_rejection)?;

    Ok(json_reply(&analysis, StatusCode::OK))
}
