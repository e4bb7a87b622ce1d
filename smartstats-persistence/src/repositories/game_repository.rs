use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use tokio::sync::Mutex;

use crate::entities::{games, prelude::*};
use smartstats_core::{GameMerge, MergeOutcome};
use smartstats_types::{
    Game, GameId, GameSubmission, GameSummary, GameUpdate, PlayerGameStats, TeamId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Game),
    Merged(Game),
}

impl SubmitOutcome {
    pub fn was_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_))
    }

    pub fn game(&self) -> &Game {
        match self {
            SubmitOutcome::Created(game) | SubmitOutcome::Merged(game) => game,
        }
    }

    pub fn into_game(self) -> Game {
        match self {
            SubmitOutcome::Created(game) | SubmitOutcome::Merged(game) => game,
        }
    }
}

/// Game storage. Every call is scoped to one team.
pub struct GameRepository {
    db: DatabaseConnection,
    // SQLite deferred transactions fail with SQLITE_BUSY instead of waiting
    // when two writers upgrade at once, so read-merge-write calls queue here.
    write_lock: Mutex<()>,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    fn model_to_game(model: games::Model) -> Result<Game> {
        let player_stats: Vec<PlayerGameStats> = serde_json::from_str(&model.player_stats)
            .with_context(|| format!("Corrupt player stats for game {}", model.id))?;
        let opponent_stats = match model.opponent_stats {
            Some(json) => Some(
                serde_json::from_str(&json)
                    .with_context(|| format!("Corrupt opponent stats for game {}", model.id))?,
            ),
            None => None,
        };

        Ok(Game {
            id: model.id,
            date: model.date,
            opponent: model.opponent,
            score: model.score,
            notes: model.notes,
            player_stats,
            opponent_stats,
            raw_image_base64: model.raw_image_base64,
            created_at: model.created_at,
        })
    }

    fn game_to_active_model(team_id: TeamId, game: &Game) -> Result<games::ActiveModel> {
        let opponent_stats = match &game.opponent_stats {
            Some(stats) => Some(serde_json::to_string(stats)?),
            None => None,
        };

        Ok(games::ActiveModel {
            id: ActiveValue::Set(game.id),
            team_id: ActiveValue::Set(team_id),
            date: ActiveValue::Set(game.date.clone()),
            opponent: ActiveValue::Set(game.opponent.clone()),
            score: ActiveValue::Set(game.score.clone()),
            notes: ActiveValue::Set(game.notes.clone()),
            player_stats: ActiveValue::Set(serde_json::to_string(&game.player_stats)?),
            opponent_stats: ActiveValue::Set(opponent_stats),
            raw_image_base64: ActiveValue::Set(game.raw_image_base64.clone()),
            created_at: ActiveValue::Set(game.created_at.clone()),
        })
    }

    async fn insert_game<C: ConnectionTrait>(conn: &C, team_id: TeamId, game: &Game) -> Result<()> {
        Games::insert(Self::game_to_active_model(team_id, game)?)
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }

    async fn save_game<C: ConnectionTrait>(conn: &C, team_id: TeamId, game: &Game) -> Result<()> {
        let mut model = Self::game_to_active_model(team_id, game)?;
        model.id = ActiveValue::Unchanged(game.id);
        model.team_id = ActiveValue::Unchanged(team_id);
        Games::update(model).exec(conn).await?;
        Ok(())
    }

    async fn find_model<C: ConnectionTrait>(
        conn: &C,
        team_id: TeamId,
        id: GameId,
    ) -> Result<Option<games::Model>> {
        let model = Games::find_by_id(id)
            .filter(games::Column::TeamId.eq(team_id))
            .one(conn)
            .await?;
        Ok(model)
    }

    /// All games of a team in the order they were first recorded
    pub async fn list(&self, team_id: TeamId) -> Result<Vec<Game>> {
        let models = Games::find()
            .filter(games::Column::TeamId.eq(team_id))
            .order_by_asc(games::Column::CreatedAt)
            .all(&self.db)
            .await?;
        models.into_iter().map(Self::model_to_game).collect()
    }

    pub async fn list_summaries(&self, team_id: TeamId) -> Result<Vec<GameSummary>> {
        let games = self.list(team_id).await?;
        Ok(games.into_iter().map(GameSummary::from).collect())
    }

    pub async fn find_by_id(&self, team_id: TeamId, id: GameId) -> Result<Option<Game>> {
        match Self::find_model(&self.db, team_id, id).await? {
            Some(model) => Ok(Some(Self::model_to_game(model)?)),
            None => Ok(None),
        }
    }

    /// Store one side of a game, merging into an existing record with the same
    /// date and opponent.
    ///
    /// Lookup, merge and write run in one transaction, and submissions through
    /// this repository take turns, so two sides of one game end up in a single
    /// record. There is no unique index on (team, date, opponent): a second
    /// process writing the same file is not covered and may see a busy error.
    pub async fn submit(
        &self,
        team_id: TeamId,
        submission: GameSubmission,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome> {
        let date = GameMerge::submission_date(&submission, today);
        let side = submission.side;

        let _guard = self.write_lock.lock().await;
        let txn = self.db.begin().await?;

        let same_day = Games::find()
            .filter(games::Column::TeamId.eq(team_id))
            .filter(games::Column::Date.eq(date.as_str()))
            .order_by_asc(games::Column::CreatedAt)
            .all(&txn)
            .await?;
        let mut candidates = same_day
            .into_iter()
            .map(Self::model_to_game)
            .collect::<Result<Vec<_>>>()?;

        let outcome = GameMerge::submit(&mut candidates, submission, today, now);
        let game = candidates.swap_remove(outcome.index());

        let result = match outcome {
            MergeOutcome::Created(_) => {
                Self::insert_game(&txn, team_id, &game).await?;
                tracing::info!(
                    "Created game {} vs {} on {} ({:?} side)",
                    game.id,
                    game.opponent,
                    game.date,
                    side
                );
                SubmitOutcome::Created(game)
            }
            MergeOutcome::Merged(_) => {
                Self::save_game(&txn, team_id, &game).await?;
                tracing::info!(
                    "Merged {:?} side into game {} vs {} on {}",
                    side,
                    game.id,
                    game.opponent,
                    game.date
                );
                SubmitOutcome::Merged(game)
            }
        };

        txn.commit().await?;
        Ok(result)
    }

    /// Apply a manual correction; rates of replaced stat lists are recomputed
    pub async fn update(
        &self,
        team_id: TeamId,
        id: GameId,
        update: GameUpdate,
    ) -> Result<Option<Game>> {
        let _guard = self.write_lock.lock().await;
        let txn = self.db.begin().await?;

        let Some(model) = Self::find_model(&txn, team_id, id).await? else {
            return Ok(None);
        };
        let mut game = Self::model_to_game(model)?;
        GameMerge::apply_update(&mut game, update);
        Self::save_game(&txn, team_id, &game).await?;

        txn.commit().await?;
        Ok(Some(game))
    }

    pub async fn delete(&self, team_id: TeamId, id: GameId) -> Result<bool> {
        let result = Games::delete_many()
            .filter(games::Column::TeamId.eq(team_id))
            .filter(games::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
