use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smartstats_types::SeasonPlayerStats;

/// Column a season table can be sorted by. Parsed from the wire field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PlayerName,
    PlayerId,
    Games,
    Pa,
    Ab,
    R,
    H,
    Doubles,
    Triples,
    Hr,
    Bb,
    K,
    Rbi,
    Avg,
    Obp,
    Slg,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "playerName" => SortKey::PlayerName,
            "playerId" => SortKey::PlayerId,
            "games" => SortKey::Games,
            "PA" => SortKey::Pa,
            "AB" => SortKey::Ab,
            "R" => SortKey::R,
            "H" => SortKey::H,
            "2B" => SortKey::Doubles,
            "3B" => SortKey::Triples,
            "HR" => SortKey::Hr,
            "BB" => SortKey::Bb,
            "K" => SortKey::K,
            "RBI" => SortKey::Rbi,
            "AVG" => SortKey::Avg,
            "OBP" => SortKey::Obp,
            "SLG" => SortKey::Slg,
            other => return Err(format!("Unknown sort field: {}", other)),
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

impl SortKey {
    fn compare(self, a: &SeasonPlayerStats, b: &SeasonPlayerStats) -> Ordering {
        match self {
            SortKey::PlayerName => compare_text(&a.player_name, &b.player_name),
            SortKey::PlayerId => compare_text(&a.player_id, &b.player_id),
            SortKey::Games => a.games.cmp(&b.games),
            SortKey::Pa => a.line.pa.cmp(&b.line.pa),
            SortKey::Ab => a.line.ab.cmp(&b.line.ab),
            SortKey::R => a.line.r.cmp(&b.line.r),
            SortKey::H => a.line.h.cmp(&b.line.h),
            SortKey::Doubles => a.line.doubles.cmp(&b.line.doubles),
            SortKey::Triples => a.line.triples.cmp(&b.line.triples),
            SortKey::Hr => a.line.hr.cmp(&b.line.hr),
            SortKey::Bb => a.line.bb.cmp(&b.line.bb),
            SortKey::K => a.line.k.cmp(&b.line.k),
            SortKey::Rbi => a.line.rbi.cmp(&b.line.rbi),
            SortKey::Avg => a.rates.avg.total_cmp(&b.rates.avg),
            SortKey::Obp => a.rates.obp.total_cmp(&b.rates.obp),
            SortKey::Slg => a.rates.slg.total_cmp(&b.rates.slg),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable sort: rows that compare equal keep their input order in both directions.
pub fn sort_season_stats(stats: &mut [SeasonPlayerStats], key: SortKey, direction: SortDirection) {
    match direction {
        SortDirection::Asc => stats.sort_by(|a, b| key.compare(a, b)),
        SortDirection::Desc => stats.sort_by(|a, b| key.compare(b, a)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartstats_types::{BattingLine, RateStats};

    fn row(name: &str, avg: f64, hr: i32) -> SeasonPlayerStats {
        SeasonPlayerStats {
            player_id: name.to_lowercase(),
            player_name: name.to_string(),
            games: 1,
            line: BattingLine {
                hr,
                ..Default::default()
            },
            rates: RateStats {
                avg,
                ..Default::default()
            },
        }
    }

    fn names(stats: &[SeasonPlayerStats]) -> Vec<&str> {
        stats.iter().map(|s| s.player_name.as_str()).collect()
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("AVG".parse::<SortKey>().unwrap(), SortKey::Avg);
        assert_eq!("2B".parse::<SortKey>().unwrap(), SortKey::Doubles);
        assert_eq!("playerName".parse::<SortKey>().unwrap(), SortKey::PlayerName);
        assert!("avg".parse::<SortKey>().is_err());
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_descending_keeps_tie_order() {
        let mut stats = vec![
            row("Albert", 0.250, 0),
            row("Berend", 0.400, 0),
            row("Cor", 0.250, 0),
            row("Dirk", 0.400, 0),
        ];
        sort_season_stats(&mut stats, SortKey::Avg, SortDirection::Desc);
        assert_eq!(names(&stats), vec!["Berend", "Dirk", "Albert", "Cor"]);
    }

    #[test]
    fn test_ascending_by_integer_field() {
        let mut stats = vec![row("Albert", 0.0, 3), row("Berend", 0.0, 1), row("Cor", 0.0, 1)];
        sort_season_stats(&mut stats, SortKey::Hr, SortDirection::Asc);
        assert_eq!(names(&stats), vec!["Berend", "Cor", "Albert"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let mut stats = vec![row("cor", 0.0, 0), row("Albert", 0.0, 0), row("berend", 0.0, 0)];
        sort_season_stats(&mut stats, SortKey::PlayerName, SortDirection::Asc);
        assert_eq!(names(&stats), vec!["Albert", "berend", "cor"]);
    }
}
