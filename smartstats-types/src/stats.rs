use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Integer counting stats for one batting line. Missing fields read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BattingLine {
    #[serde(rename = "PA", default)]
    pub pa: i32,
    #[serde(rename = "AB", default)]
    pub ab: i32,
    #[serde(rename = "R", default)]
    pub r: i32,
    #[serde(rename = "H", default)]
    pub h: i32,
    #[serde(rename = "2B", default)]
    pub doubles: i32,
    #[serde(rename = "3B", default)]
    pub triples: i32,
    #[serde(rename = "HR", default)]
    pub hr: i32,
    #[serde(rename = "BB", default)]
    pub bb: i32,
    #[serde(rename = "K", default)]
    pub k: i32,
    #[serde(rename = "RBI", default)]
    pub rbi: i32,
}

impl BattingLine {
    /// Field-wise sum
    pub fn add(&mut self, other: &BattingLine) {
        self.pa += other.pa;
        self.ab += other.ab;
        self.r += other.r;
        self.h += other.h;
        self.doubles += other.doubles;
        self.triples += other.triples;
        self.hr += other.hr;
        self.bb += other.bb;
        self.k += other.k;
        self.rbi += other.rbi;
    }
}

/// Derived rates. Always computed from a [`BattingLine`], never edited directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateStats {
    #[serde(rename = "AVG", default)]
    pub avg: f64,
    #[serde(rename = "OBP", default)]
    pub obp: f64,
    #[serde(rename = "SLG", default)]
    pub slg: f64,
}

/// One player's batting line for a single game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlayerGameStats {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub batting_order: i32,
    #[serde(default)]
    pub is_substitute: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitute_for: Option<String>,
    #[serde(flatten)]
    pub line: BattingLine,
    #[serde(flatten)]
    pub rates: RateStats,
}

impl PlayerGameStats {
    /// Key used to identify the same player across games
    pub fn player_key(&self) -> &str {
        if self.player_id.is_empty() {
            &self.player_name
        } else {
            &self.player_id
        }
    }
}

/// Season-to-date totals for one player of one team
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SeasonPlayerStats {
    pub player_id: String,
    pub player_name: String,
    pub games: i32,
    #[serde(flatten)]
    pub line: BattingLine,
    #[serde(flatten)]
    pub rates: RateStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_game_stats_wire_names() {
        let json = r#"{
            "playerName": "Albert",
            "battingOrder": 3,
            "isSubstitute": false,
            "substituteFor": null,
            "PA": 4, "AB": 3, "R": 1, "H": 2,
            "2B": 1, "3B": 0, "HR": 0,
            "BB": 1, "K": 0, "RBI": 1,
            "AVG": 0.667, "OBP": 0.75, "SLG": 1.0
        }"#;
        let stats: PlayerGameStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.player_id, "");
        assert_eq!(stats.player_key(), "Albert");
        assert_eq!(stats.batting_order, 3);
        assert_eq!(stats.line.doubles, 1);
        assert_eq!(stats.line.rbi, 1);
        assert_eq!(stats.rates.obp, 0.75);

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["2B"], 1);
        assert_eq!(value["AB"], 3);
        assert!(value.get("substituteFor").is_none());
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let stats: PlayerGameStats =
            serde_json::from_str(r#"{"playerId": "p1", "playerName": "Piet", "H": 1}"#).unwrap();
        assert_eq!(stats.player_key(), "p1");
        assert_eq!(stats.line.h, 1);
        assert_eq!(stats.line.ab, 0);
        assert_eq!(stats.rates, RateStats::default());
    }

    #[test]
    fn test_non_numeric_count_is_rejected() {
        let result: Result<PlayerGameStats, _> =
            serde_json::from_str(r#"{"playerName": "Piet", "AB": "three"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_batting_line_add() {
        let mut total = BattingLine {
            ab: 3,
            h: 1,
            ..Default::default()
        };
        total.add(&BattingLine {
            ab: 4,
            h: 2,
            hr: 1,
            ..Default::default()
        });
        assert_eq!(total.ab, 7);
        assert_eq!(total.h, 3);
        assert_eq!(total.hr, 1);
    }
}
