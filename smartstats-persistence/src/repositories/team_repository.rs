use anyhow::Result;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{games, players, prelude::*, teams};
use smartstats_types::{Team, TeamId};

pub const DEFAULT_TEAM_NAME: &str = "My Team";

pub struct TeamRepository {
    db: DatabaseConnection,
}

impl TeamRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_team(model: teams::Model) -> Team {
        Team {
            id: model.id,
            name: model.name,
        }
    }

    fn new_model(id: TeamId, name: &str) -> teams::ActiveModel {
        teams::ActiveModel {
            id: ActiveValue::Set(id),
            name: ActiveValue::Set(name.to_string()),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<Team>> {
        let teams = Teams::find()
            .order_by_asc(teams::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(teams.into_iter().map(Self::model_to_team).collect())
    }

    /// List teams, creating the default team first when there are none
    pub async fn list_or_create_default(&self) -> Result<Vec<Team>> {
        let txn = self.db.begin().await?;
        if Teams::find().count(&txn).await? == 0 {
            Teams::insert(Self::new_model(Uuid::new_v4(), DEFAULT_TEAM_NAME))
                .exec_without_returning(&txn)
                .await?;
            tracing::info!("No teams yet, created \"{}\"", DEFAULT_TEAM_NAME);
        }
        txn.commit().await?;

        self.list().await
    }

    pub async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>> {
        let team = Teams::find_by_id(id).one(&self.db).await?;
        Ok(team.map(Self::model_to_team))
    }

    pub async fn exists(&self, id: TeamId) -> Result<bool> {
        Ok(Teams::find_by_id(id).count(&self.db).await? > 0)
    }

    pub async fn create(&self, name: &str) -> Result<Team> {
        let id = Uuid::new_v4();
        Teams::insert(Self::new_model(id, name))
            .exec_without_returning(&self.db)
            .await?;

        Ok(Team {
            id,
            name: name.to_string(),
        })
    }

    pub async fn rename(&self, id: TeamId, name: &str) -> Result<Option<Team>> {
        let Some(team) = Teams::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let updated = teams::ActiveModel {
            id: ActiveValue::Unchanged(team.id),
            name: ActiveValue::Set(name.to_string()),
            created_at: ActiveValue::Unchanged(team.created_at),
        };
        let model = Teams::update(updated).exec(&self.db).await?;
        Ok(Some(Self::model_to_team(model)))
    }

    /// Delete a team together with its roster and games
    pub async fn delete(&self, id: TeamId) -> Result<bool> {
        let txn = self.db.begin().await?;

        let removed_players = Players::delete_many()
            .filter(players::Column::TeamId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let removed_games = Games::delete_many()
            .filter(games::Column::TeamId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let removed = Teams::delete_by_id(id).exec(&txn).await?.rows_affected > 0;

        txn.commit().await?;

        if removed {
            tracing::info!(
                "Deleted team {} with {} players and {} games",
                id,
                removed_players,
                removed_games
            );
        }
        Ok(removed)
    }
}
