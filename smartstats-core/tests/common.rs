use chrono::{NaiveDate, Utc};
use smartstats_core::GameMerge;
use smartstats_types::{BattingLine, Game, GameSubmission, PlayerGameStats, Side};

/// Creates a batting line with the counts that matter for rate tests
pub fn create_batter(id: &str, name: &str, line: BattingLine) -> PlayerGameStats {
    PlayerGameStats {
        player_id: id.to_string(),
        player_name: name.to_string(),
        line,
        ..Default::default()
    }
}

/// Creates a simple line of `ab` at-bats and `h` singles
pub fn create_simple_batter(id: &str, ab: i32, h: i32) -> PlayerGameStats {
    create_batter(
        id,
        id,
        BattingLine {
            pa: ab,
            ab,
            h,
            ..Default::default()
        },
    )
}

pub fn create_submission(date: &str, opponent: &str, side: Side, players: Vec<PlayerGameStats>) -> GameSubmission {
    GameSubmission {
        date: Some(date.to_string()),
        opponent: Some(opponent.to_string()),
        player_stats: players,
        side,
        ..Default::default()
    }
}

pub fn season_opening_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 12).unwrap()
}

/// Runs each submission through the merge rules, like the game store does
pub fn store_submissions(submissions: Vec<GameSubmission>) -> Vec<Game> {
    let mut games = Vec::new();
    for submission in submissions {
        GameMerge::submit(&mut games, submission, season_opening_day(), Utc::now());
    }
    games
}
