use std::collections::HashMap;

use smartstats_types::{Game, SeasonPlayerStats};

use crate::RateCalculator;

pub struct StatsAggregator;

impl StatsAggregator {
    /// Fold every game's `playerStats` into one season line per player.
    ///
    /// Players are keyed by `playerId`, or `playerName` when the id is empty.
    /// Opponent stats are never counted. Output keeps first-appearance order.
    pub fn aggregate(games: &[Game]) -> Vec<SeasonPlayerStats> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut season: Vec<SeasonPlayerStats> = Vec::new();

        for game in games {
            for ps in &game.player_stats {
                match index.get(ps.player_key()).copied() {
                    Some(i) => {
                        let existing = &mut season[i];
                        existing.games += 1;
                        existing.line.add(&ps.line);
                    }
                    None => {
                        index.insert(ps.player_key().to_string(), season.len());
                        season.push(SeasonPlayerStats {
                            player_id: ps.player_id.clone(),
                            player_name: ps.player_name.clone(),
                            games: 1,
                            line: ps.line,
                            rates: Default::default(),
                        });
                    }
                }
            }
        }

        for stats in season.iter_mut() {
            RateCalculator::recalculate_season(stats);
        }

        tracing::debug!(
            "Aggregated {} games into {} season lines",
            games.len(),
            season.len()
        );
        season
    }
}
