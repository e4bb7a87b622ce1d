use std::collections::HashSet;

use smartstats_types::{LineupSlot, SeasonPlayerStats};

use crate::RateCalculator;

pub const MIN_AT_BATS: i32 = 3;
pub const LINEUP_SIZE: usize = 9;

#[derive(Debug, Clone, Copy)]
enum Justify {
    Avg,
    Obp,
    Slg,
    Rbi,
}

#[derive(Debug, Clone, Copy)]
struct SlotWeights {
    avg: f64,
    obp: f64,
    slg: f64,
    hr_rate: f64,
    rbi_rate: f64,
}

struct SlotDef {
    role: &'static str,
    weights: SlotWeights,
    justify: Justify,
}

const fn weights(avg: f64, obp: f64, slg: f64, hr_rate: f64, rbi_rate: f64) -> SlotWeights {
    SlotWeights {
        avg,
        obp,
        slg,
        hr_rate,
        rbi_rate,
    }
}

const SLOTS: [SlotDef; LINEUP_SIZE] = [
    SlotDef { role: "Leadoff", weights: weights(0.3, 0.7, 0.0, 0.0, 0.0), justify: Justify::Obp },
    SlotDef { role: "Contact", weights: weights(0.5, 0.5, 0.0, 0.0, 0.0), justify: Justify::Avg },
    SlotDef { role: "Best Hitter", weights: weights(0.3, 0.3, 0.4, 0.0, 0.0), justify: Justify::Slg },
    SlotDef { role: "Cleanup", weights: weights(0.0, 0.0, 0.4, 0.3, 0.3), justify: Justify::Slg },
    SlotDef { role: "Secondary Power", weights: weights(0.0, 0.1, 0.4, 0.2, 0.3), justify: Justify::Rbi },
    SlotDef { role: "Balanced", weights: weights(0.25, 0.25, 0.25, 0.1, 0.15), justify: Justify::Avg },
    SlotDef { role: "7th", weights: weights(0.3, 0.3, 0.2, 0.1, 0.1), justify: Justify::Obp },
    SlotDef { role: "8th", weights: weights(0.3, 0.3, 0.2, 0.1, 0.1), justify: Justify::Avg },
    SlotDef { role: "9th", weights: weights(0.3, 0.3, 0.2, 0.1, 0.1), justify: Justify::Obp },
];

/// Greedy batting-order suggestion from season totals
pub struct LineupBuilder;

impl LineupBuilder {
    /// Fill the nine slots in order, each with the best unused eligible player.
    /// Returns `None` unless at least nine players have enough at-bats.
    pub fn recommend(season: &[SeasonPlayerStats]) -> Option<Vec<LineupSlot>> {
        let eligible: Vec<&SeasonPlayerStats> =
            season.iter().filter(|p| p.line.ab >= MIN_AT_BATS).collect();
        if eligible.len() < LINEUP_SIZE {
            tracing::debug!(
                "Only {} players with {}+ AB, no lineup suggestion",
                eligible.len(),
                MIN_AT_BATS
            );
            return None;
        }

        let mut used: HashSet<&str> = HashSet::new();
        let mut lineup = Vec::with_capacity(LINEUP_SIZE);

        for (i, slot) in SLOTS.iter().enumerate() {
            let mut best: Option<(&SeasonPlayerStats, f64)> = None;
            for player in &eligible {
                if used.contains(Self::key(player)) {
                    continue;
                }
                let score = Self::score(player, &slot.weights);
                if best.is_none_or(|(_, best_score)| score > best_score) {
                    best = Some((*player, score));
                }
            }

            let (player, _) = best?;
            used.insert(Self::key(player));
            lineup.push(LineupSlot {
                batting_order: i as i32 + 1,
                role: slot.role.to_string(),
                player: player.clone(),
                justification: Self::justification(player, slot.justify),
            });
        }

        Some(lineup)
    }

    fn key(player: &SeasonPlayerStats) -> &str {
        if player.player_id.is_empty() {
            &player.player_name
        } else {
            &player.player_id
        }
    }

    /// Weighted score on unrounded ratios, so near-ties the three-decimal
    /// rates hide still separate players.
    fn score(player: &SeasonPlayerStats, w: &SlotWeights) -> f64 {
        let line = &player.line;
        let avg = Self::raw_ratio(line.h, line.ab);
        let obp = Self::raw_ratio(line.h + line.bb, line.ab + line.bb);
        let slg = Self::raw_ratio(RateCalculator::total_bases(line), line.ab);
        let hr_rate = Self::raw_ratio(line.hr, line.ab);
        let rbi_rate = Self::raw_ratio(line.rbi, line.pa);
        w.avg * avg + w.obp * obp + w.slg * slg + w.hr_rate * hr_rate + w.rbi_rate * rbi_rate
    }

    fn raw_ratio(numerator: i32, denominator: i32) -> f64 {
        if denominator <= 0 {
            0.0
        } else {
            f64::from(numerator) / f64::from(denominator)
        }
    }

    fn justification(player: &SeasonPlayerStats, justify: Justify) -> String {
        match justify {
            Justify::Obp => format!("OBP {:.3}", player.rates.obp),
            Justify::Avg => format!("AVG {:.3}", player.rates.avg),
            Justify::Slg => format!("SLG {:.3}", player.rates.slg),
            Justify::Rbi => format!("{} RBI", player.line.rbi),
        }
    }
}
