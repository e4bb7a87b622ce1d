use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use smartstats_types::{Game, GameSubmission, GameUpdate, PlayerGameStats, Side};
use uuid::Uuid;

use crate::RateCalculator;

pub const NOTES_SEPARATOR: &str = " | ";
pub const UNKNOWN_OPPONENT: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new game was appended at this index
    Created(usize),
    /// The submission was folded into the existing game at this index
    Merged(usize),
}

impl MergeOutcome {
    pub fn index(self) -> usize {
        match self {
            MergeOutcome::Created(i) | MergeOutcome::Merged(i) => i,
        }
    }
}

/// Merge-by-natural-key rules for game submissions.
///
/// A team holds at most one game per (date, opponent) with the opponent compared
/// case-insensitively. Home and away submissions for the same game fill in the
/// two sides of one record.
pub struct GameMerge;

impl GameMerge {
    /// Date a submission is filed under. Missing or blank dates mean today.
    pub fn submission_date(submission: &GameSubmission, today: NaiveDate) -> String {
        match submission.date.as_deref().map(str::trim) {
            Some(date) if !date.is_empty() => date.to_string(),
            _ => today.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn submission_opponent(submission: &GameSubmission) -> String {
        match submission.opponent.as_deref().map(str::trim) {
            Some(opponent) if !opponent.is_empty() => opponent.to_string(),
            _ => UNKNOWN_OPPONENT.to_string(),
        }
    }

    pub fn is_same_game(game: &Game, date: &str, opponent: &str) -> bool {
        game.date == date && game.opponent.to_lowercase() == opponent.to_lowercase()
    }

    pub fn find_merge_target(games: &[Game], date: &str, opponent: &str) -> Option<usize> {
        games
            .iter()
            .position(|game| Self::is_same_game(game, date, opponent))
    }

    /// Fold a submission into `games`, either merging into the matching game or
    /// appending a new one.
    pub fn submit(
        games: &mut Vec<Game>,
        submission: GameSubmission,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> MergeOutcome {
        let date = Self::submission_date(&submission, today);
        let opponent = Self::submission_opponent(&submission);

        match Self::find_merge_target(games, &date, &opponent) {
            Some(index) => {
                Self::merge_into(&mut games[index], submission);
                MergeOutcome::Merged(index)
            }
            None => {
                let game = Self::new_game(submission, date, opponent, Uuid::new_v4(), now);
                games.push(game);
                MergeOutcome::Created(games.len() - 1)
            }
        }
    }

    /// Write the submission's side into `existing`. The other side is left as is.
    pub fn merge_into(existing: &mut Game, submission: GameSubmission) {
        let stats = Self::with_fresh_rates(submission.player_stats);
        match submission.side {
            Side::Home => existing.player_stats = stats,
            Side::Away => existing.opponent_stats = Some(stats),
        }

        if let Some(score) = submission.score.filter(|s| !s.is_empty()) {
            existing.score = Some(score);
        }

        if !submission.notes.is_empty() {
            existing.notes = Self::join_notes(&existing.notes, &submission.notes);
        }

        if existing.raw_image_base64.is_none() {
            existing.raw_image_base64 = submission.raw_image_base64;
        }
    }

    pub fn new_game(
        submission: GameSubmission,
        date: String,
        opponent: String,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Game {
        let stats = Self::with_fresh_rates(submission.player_stats);
        let (player_stats, opponent_stats) = match submission.side {
            Side::Home => (stats, None),
            Side::Away => (Vec::new(), Some(stats)),
        };

        Game {
            id,
            date,
            opponent,
            score: submission.score.filter(|s| !s.is_empty()),
            notes: submission.notes,
            player_stats,
            opponent_stats,
            raw_image_base64: submission.raw_image_base64,
            created_at: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    /// Apply a manual correction. Replaced stat lists get their rates recomputed.
    pub fn apply_update(game: &mut Game, update: GameUpdate) {
        if let Some(score) = update.score {
            game.score = if score.is_empty() { None } else { Some(score) };
        }
        if let Some(notes) = update.notes {
            game.notes = notes;
        }
        if let Some(stats) = update.player_stats {
            game.player_stats = Self::with_fresh_rates(stats);
        }
        if let Some(stats) = update.opponent_stats {
            game.opponent_stats = Some(Self::with_fresh_rates(stats));
        }
    }

    pub fn join_notes(existing: &str, addition: &str) -> String {
        [existing, addition]
            .iter()
            .filter(|note| !note.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(NOTES_SEPARATOR)
    }

    fn with_fresh_rates(mut stats: Vec<PlayerGameStats>) -> Vec<PlayerGameStats> {
        RateCalculator::recalculate_all(&mut stats);
        stats
    }
}
