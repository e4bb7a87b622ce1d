
use smartstats_server::create_routes;
use smartstats_types::{Game, GameSummary, LineupSlot, Player, SeasonPlayerStats, Team};
use test_helpers::*;
use warp::http::StatusCode;

#[tokio::test]
async fn test_team_list_creates_default_once() {
    let app = create_routes(setup_services(test_config()).await);

    let first: Vec<Team> = parse_json(&get(&app, "/api/teams").await);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "My Team");

    let second: Vec<Team> = parse_json(&get(&app, "/api/teams").await);
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_team_create_rename_delete() {
    let app = create_routes(setup_services(test_config()).await);
    let team = create_team(&app, "  Hoofddorp Pioneers ").await;
    assert_eq!(team.name, "Hoofddorp Pioneers");

    let blank = send_json(&app, "POST", "/api/teams", &serde_json::json!({ "name": " " })).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&blank), "Team name is required");

    let path = format!("/api/teams/{}", team.id);
    let renamed = send_json(&app, "PUT", &path, &serde_json::json!({ "name": "Pioneers" })).await;
    assert_eq!(renamed.status(), StatusCode::OK);
    assert_eq!(parse_json::<Team>(&renamed).name, "Pioneers");

    let missing = format!("/api/teams/{}", uuid::Uuid::new_v4());
    let response = send_json(&app, "PUT", &missing, &serde_json::json!({ "name": "x" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(delete(&app, &path).await.status(), StatusCode::NO_CONTENT);
    let roster = get(&app, &format!("{}/roster", path)).await;
    assert_eq!(roster.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(&roster), "Team not found");
}

#[tokio::test]
async fn test_invalid_team_id_is_bad_request() {
    let app = create_routes(setup_services(test_config()).await);

    let response = get(&app, "/api/teams/not-a-uuid/games").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&response), "Invalid team ID format");
}

#[tokio::test]
async fn test_roster_crud() {
    let app = create_routes(setup_services(test_config()).await);
    let team = create_team(&app, "Pioneers").await;
    let roster_path = format!("/api/teams/{}/roster", team.id);

    let created = send_json(
        &app,
        "POST",
        &roster_path,
        &serde_json::json!({ "firstName": "Albert", "lastName": "van Asten", "number": "12" }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let albert: Player = parse_json(&created);
    assert_eq!(albert.full_name(), "Albert van Asten");

    let missing_name = send_json(&app, "POST", &roster_path, &serde_json::json!({ "lastName": "X" })).await;
    assert_eq!(missing_name.status(), StatusCode::BAD_REQUEST);

    let blank_name = send_json(&app, "POST", &roster_path, &serde_json::json!({ "firstName": "  " })).await;
    assert_eq!(blank_name.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&blank_name), "firstName is required");

    let player_path = format!("{}/{}", roster_path, albert.id);
    let updated = send_json(&app, "PUT", &player_path, &serde_json::json!({ "position": "SS" })).await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Player = parse_json(&updated);
    assert_eq!(updated.id, albert.id);
    assert_eq!(updated.position.as_deref(), Some("SS"));
    assert_eq!(updated.number.as_deref(), Some("12"));

    let unknown = format!("{}/{}", roster_path, uuid::Uuid::new_v4());
    let response = send_json(&app, "PUT", &unknown, &serde_json::json!({ "position": "C" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(&response), "Player not found");

    assert_eq!(delete(&app, &player_path).await.status(), StatusCode::NO_CONTENT);
    // Deleting again is not an error
    assert_eq!(delete(&app, &player_path).await.status(), StatusCode::NO_CONTENT);

    let roster: Vec<Player> = parse_json(&get(&app, &roster_path).await);
    assert!(roster.is_empty());
}

#[tokio::test]
async fn test_rosters_are_scoped_per_team() {
    let app = create_routes(setup_services(test_config()).await);
    let pioneers = create_team(&app, "Pioneers").await;
    let storks = create_team(&app, "Storks").await;

    send_json(
        &app,
        "POST",
        &format!("/api/teams/{}/roster", pioneers.id),
        &serde_json::json!({ "firstName": "Albert" }),
    )
    .await;

    let storks_roster: Vec<Player> =
        parse_json(&get(&app, &format!("/api/teams/{}/roster", storks.id)).await);
    assert!(storks_roster.is_empty());
}

#[tokio::test]
async fn test_home_and_away_submissions_merge() {
    let app = create_routes(setup_services(test_config()).await);
    let team = create_team(&app, "Pioneers").await;
    let games_path = format!("/api/teams/{}/games", team.id);

    let mut home = submission(
        "2025-04-12",
        "Storks",
        "home",
        vec![batter("Albert", 1, 3, 2, 1)],
    );
    home["notes"] = "Home sheet".into();
    home["rawImageBase64"] = "aW1hZ2U=".into();
    let created = send_json(&app, "POST", &games_path, &home).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Game = parse_json(&created);
    assert_eq!(created.player_stats[0].rates.avg, 0.667);
    assert!(created.opponent_stats.is_none());

    let mut away = submission(
        "2025-04-12",
        "storks",
        "away",
        vec![batter("Visitor", 1, 4, 1, 0)],
    );
    away["notes"] = "Away sheet".into();
    away["score"] = "7-4".into();
    let merged = send_json(&app, "POST", &games_path, &away).await;
    assert_eq!(merged.status(), StatusCode::OK);
    let merged: Game = parse_json(&merged);

    assert_eq!(merged.id, created.id);
    assert_eq!(merged.opponent, "Storks");
    assert_eq!(merged.notes, "Home sheet | Away sheet");
    assert_eq!(merged.score.as_deref(), Some("7-4"));
    assert_eq!(merged.player_stats.len(), 1);
    assert_eq!(merged.opponent_stats.as_ref().map(Vec::len), Some(1));

    let list: Vec<GameSummary> = parse_json(&get(&app, &games_path).await);
    assert_eq!(list.len(), 1);
    let raw: serde_json::Value = parse_json(&get(&app, &games_path).await);
    assert!(raw[0].get("rawImageBase64").is_none());

    let full: Game = parse_json(&get(&app, &format!("{}/{}", games_path, created.id)).await);
    assert_eq!(full.raw_image_base64.as_deref(), Some("aW1hZ2U="));
}

#[tokio::test]
async fn test_game_update_and_delete() {
    let app = create_routes(setup_services(test_config()).await);
    let team = create_team(&app, "Pioneers").await;
    let games_path = format!("/api/teams/{}/games", team.id);

    let game: Game = parse_json(
        &send_json(
            &app,
            "POST",
            &games_path,
            &submission("2025-04-12", "Storks", "home", vec![batter("Albert", 1, 3, 1, 0)]),
        )
        .await,
    );
    let game_path = format!("{}/{}", games_path, game.id);

    let update = serde_json::json!({
        "notes": "Corrected",
        "playerStats": [batter("Albert", 1, 4, 2, 0)],
    });
    let updated = send_json(&app, "PUT", &game_path, &update).await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Game = parse_json(&updated);
    assert_eq!(updated.notes, "Corrected");
    assert_eq!(updated.player_stats[0].rates.avg, 0.5);

    let missing = format!("{}/{}", games_path, uuid::Uuid::new_v4());
    assert_eq!(get(&app, &missing).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        send_json(&app, "PUT", &missing, &update).await.status(),
        StatusCode::NOT_FOUND
    );

    assert_eq!(delete(&app, &game_path).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &game_path).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_games_are_scoped_per_team() {
    let app = create_routes(setup_services(test_config()).await);
    let pioneers = create_team(&app, "Pioneers").await;
    let storks = create_team(&app, "Storks").await;

    let game: Game = parse_json(
        &send_json(
            &app,
            "POST",
            &format!("/api/teams/{}/games", pioneers.id),
            &submission("2025-04-12", "Storks", "home", vec![batter("Albert", 1, 3, 1, 0)]),
        )
        .await,
    );

    let other_team = get(&app, &format!("/api/teams/{}/games/{}", storks.id, game.id)).await;
    assert_eq!(other_team.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_season_stats_sorting() {
    let app = create_routes(setup_services(test_config()).await);
    let team = create_team(&app, "Pioneers").await;
    let games_path = format!("/api/teams/{}/games", team.id);

    send_json(
        &app,
        "POST",
        &games_path,
        &submission(
            "2025-04-12",
            "Storks",
            "home",
            vec![batter("Albert", 1, 0, 0, 2), batter("Berend", 2, 4, 1, 0)],
        ),
    )
    .await;
    send_json(
        &app,
        "POST",
        &games_path,
        &submission("2025-04-19", "Herons", "home", vec![batter("Albert", 1, 4, 2, 0)]),
    )
    .await;

    let stats_path = format!("/api/teams/{}/stats", team.id);
    let stats: Vec<SeasonPlayerStats> = parse_json(&get(&app, &stats_path).await);
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].player_name, "Albert");
    assert_eq!(stats[0].games, 2);
    assert_eq!(stats[0].rates.avg, 0.5);
    assert_eq!(stats[0].rates.obp, 0.667);
    assert_eq!(stats[1].player_name, "Berend");

    let by_name: Vec<SeasonPlayerStats> =
        parse_json(&get(&app, &format!("{}?sort=playerName&order=desc", stats_path)).await);
    assert_eq!(by_name[0].player_name, "Berend");

    let bad = get(&app, &format!("{}?sort=ERA", stats_path)).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&bad), "Unknown sort field: ERA");
}

#[tokio::test]
async fn test_csv_exports() {
    let app = create_routes(setup_services(test_config()).await);
    let team = create_team(&app, "Pioneers").await;

    let game: Game = parse_json(
        &send_json(
            &app,
            "POST",
            &format!("/api/teams/{}/games", team.id),
            &submission(
                "2025-04-12",
                "Storks, Haarlem",
                "home",
                vec![batter("Albert", 1, 3, 2, 1)],
            ),
        )
        .await,
    );

    let season = get(&app, &format!("/api/teams/{}/stats/export.csv", team.id)).await;
    assert_eq!(season.status(), StatusCode::OK);
    assert_eq!(season.headers()["content-type"], "text/csv; charset=utf-8");
    let body = String::from_utf8(season.body().to_vec()).unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("Player,G,PA,AB,R,H,2B,3B,HR,BB,K,RBI,AVG,OBP,SLG"));
    assert_eq!(lines.next(), Some("Albert,1,4,3,0,2,0,0,0,1,0,0,0.667,0.750,0.667"));

    let game_csv = get(
        &app,
        &format!("/api/teams/{}/games/{}/export.csv", team.id, game.id),
    )
    .await;
    assert_eq!(game_csv.status(), StatusCode::OK);
    let disposition = game_csv.headers()["content-disposition"].to_str().unwrap();
    assert_eq!(disposition, "attachment; filename=\"game-2025-04-12-storks-haarlem.csv\"");
    let body = String::from_utf8(game_csv.body().to_vec()).unwrap();
    assert!(body.starts_with("Player,#,PA"));

    let away_csv = get(
        &app,
        &format!("/api/teams/{}/games/{}/export.csv?side=away", team.id, game.id),
    )
    .await;
    let body = String::from_utf8(away_csv.body().to_vec()).unwrap();
    assert_eq!(body.lines().count(), 1);
}

#[tokio::test]
async fn test_lineup_needs_nine_regulars() {
    let app = create_routes(setup_services(test_config()).await);
    let team = create_team(&app, "Pioneers").await;
    let lineup_path = format!("/api/teams/{}/lineup", team.id);

    let players: Vec<_> = (1..=8)
        .map(|i| batter(&format!("Player {}", i), i, 4, i % 4, 0))
        .collect();
    send_json(
        &app,
        "POST",
        &format!("/api/teams/{}/games", team.id),
        &submission("2025-04-12", "Storks", "home", players),
    )
    .await;

    let none: Option<Vec<LineupSlot>> = parse_json(&get(&app, &lineup_path).await);
    assert!(none.is_none());

    let players: Vec<_> = (1..=9)
        .map(|i| batter(&format!("Player {}", i), i, 4, i % 4, 0))
        .collect();
    send_json(
        &app,
        "POST",
        &format!("/api/teams/{}/games", team.id),
        &submission("2025-04-19", "Herons", "home", players),
    )
    .await;

    let lineup: Option<Vec<LineupSlot>> = parse_json(&get(&app, &lineup_path).await);
    let lineup = lineup.expect("nine eligible players");
    assert_eq!(lineup.len(), 9);
    assert_eq!(lineup[0].role, "Leadoff");
    assert_eq!(lineup[8].batting_order, 9);
}

#[tokio::test]
async fn test_attribute_players_to_roster() {
    let app = create_routes(setup_services(test_config()).await);
    let team = create_team(&app, "Pioneers").await;

    let albert: Player = parse_json(
        &send_json(
            &app,
            "POST",
            &format!("/api/teams/{}/roster", team.id),
            &serde_json::json!({ "firstName": "Albert", "lastName": "van Asten" }),
        )
        .await,
    );

    let players = vec![batter("VAN ASTEN Albert", 1, 3, 1, 0), batter("Piet  Jansen", 2, 3, 0, 0)];
    let response = send_json(
        &app,
        "POST",
        &format!("/api/teams/{}/games/attribute", team.id),
        &players,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let attributed: Vec<smartstats_types::PlayerGameStats> = parse_json(&response);
    assert_eq!(attributed[0].player_id, albert.id.to_string());
    assert_eq!(attributed[1].player_id, "piet-jansen");
    assert_eq!(attributed[1].player_name, "Piet  Jansen");
}

#[tokio::test]
async fn test_invalid_json_body_is_bad_request() {
    let app = create_routes(setup_services(test_config()).await);
    let team = create_team(&app, "Pioneers").await;

    let response = warp::test::request()
        .method("POST")
        .path(&format!("/api/teams/{}/games", team.id))
        .header("content-type", "application/json")
        .body(r#"{"playerStats": [{"playerName": "Albert", "AB": "three"}]}"#)
        .reply(&app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(&response).starts_with("Invalid request body"));
}
