use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::PlayerGameStats;

pub type GameId = Uuid;

/// Which team a batting-stats submission describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Side {
    #[default]
    Home, // The team recording the game
    Away, // Their opponent
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Game {
    pub id: GameId,
    pub date: String, // YYYY-MM-DD
    pub opponent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub player_stats: Vec<PlayerGameStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_stats: Option<Vec<PlayerGameStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_image_base64: Option<String>,
    pub created_at: String, // ISO 8601 string
}

/// List view of a game, without the stored scoresheet image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameSummary {
    pub id: GameId,
    pub date: String,
    pub opponent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    pub notes: String,
    pub player_stats: Vec<PlayerGameStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_stats: Option<Vec<PlayerGameStats>>,
    pub created_at: String,
}

impl From<Game> for GameSummary {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            date: game.date,
            opponent: game.opponent,
            score: game.score,
            notes: game.notes,
            player_stats: game.player_stats,
            opponent_stats: game.opponent_stats,
            created_at: game.created_at,
        }
    }
}

/// One side's stats for a game, as posted after analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameSubmission {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub player_stats: Vec<PlayerGameStats>,
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub raw_image_base64: Option<String>,
}

/// Manual correction of a stored game. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameUpdate {
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub player_stats: Option<Vec<PlayerGameStats>>,
    #[serde(default)]
    pub opponent_stats: Option<Vec<PlayerGameStats>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_defaults() {
        let submission: GameSubmission = serde_json::from_str("{}").unwrap();
        assert_eq!(submission.side, Side::Home);
        assert!(submission.date.is_none());
        assert!(submission.notes.is_empty());
        assert!(submission.player_stats.is_empty());

        let away: GameSubmission = serde_json::from_str(r#"{"side": "away"}"#).unwrap();
        assert_eq!(away.side, Side::Away);
    }

    #[test]
    fn test_summary_drops_image() {
        let game = Game {
            id: Uuid::new_v4(),
            date: "2025-05-10".to_string(),
            opponent: "Pioniers".to_string(),
            score: Some("5-3".to_string()),
            notes: String::new(),
            player_stats: Vec::new(),
            opponent_stats: None,
            raw_image_base64: Some("aGVsbG8=".to_string()),
            created_at: "2025-05-10T12:00:00Z".to_string(),
        };
        let summary = GameSummary::from(game.clone());
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("rawImageBase64").is_none());
        assert_eq!(value["opponent"], "Pioniers");
        assert_eq!(summary.id, game.id);
    }
}
