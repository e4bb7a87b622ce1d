use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{PlayerGameStats, SeasonPlayerStats};

/// What the vision model read off a scoresheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoresheetAnalysis {
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub players: Vec<PlayerGameStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineupSlot {
    pub batting_order: i32,
    pub role: String,
    pub player: SeasonPlayerStats,
    pub justification: String,
}
