use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::entities::{players, prelude::*};
use smartstats_types::{NewPlayer, Player, PlayerPatch, RosterPlayerId, TeamId};

/// Roster storage. Every call is scoped to one team.
pub struct RosterRepository {
    db: DatabaseConnection,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RosterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_player(model: players::Model) -> Player {
        Player {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            number: model.number,
            position: model.position,
        }
    }

    async fn find_model(
        &self,
        team_id: TeamId,
        id: RosterPlayerId,
    ) -> Result<Option<players::Model>> {
        let model = Players::find_by_id(id)
            .filter(players::Column::TeamId.eq(team_id))
            .one(&self.db)
            .await?;
        Ok(model)
    }

    pub async fn list(&self, team_id: TeamId) -> Result<Vec<Player>> {
        let roster = Players::find()
            .filter(players::Column::TeamId.eq(team_id))
            .order_by_asc(players::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(roster.into_iter().map(Self::model_to_player).collect())
    }

    pub async fn find_by_id(&self, team_id: TeamId, id: RosterPlayerId) -> Result<Option<Player>> {
        Ok(self.find_model(team_id, id).await?.map(Self::model_to_player))
    }

    pub async fn add(&self, team_id: TeamId, new_player: NewPlayer) -> Result<Player> {
        let player = Player {
            id: Uuid::new_v4(),
            first_name: new_player.first_name.trim().to_string(),
            last_name: non_empty(new_player.last_name),
            number: non_empty(new_player.number),
            position: non_empty(new_player.position),
        };

        let model = players::ActiveModel {
            id: ActiveValue::Set(player.id),
            team_id: ActiveValue::Set(team_id),
            first_name: ActiveValue::Set(player.first_name.clone()),
            last_name: ActiveValue::Set(player.last_name.clone()),
            number: ActiveValue::Set(player.number.clone()),
            position: ActiveValue::Set(player.position.clone()),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };
        Players::insert(model).exec_without_returning(&self.db).await?;

        tracing::debug!("Added {} to roster of team {}", player.full_name(), team_id);
        Ok(player)
    }

    /// Apply a partial update. The id never changes.
    pub async fn update(
        &self,
        team_id: TeamId,
        id: RosterPlayerId,
        patch: PlayerPatch,
    ) -> Result<Option<Player>> {
        let Some(model) = self.find_model(team_id, id).await? else {
            return Ok(None);
        };

        let mut active: players::ActiveModel = model.clone().into();
        if let Some(first_name) = patch.first_name.filter(|f| !f.trim().is_empty()) {
            active.first_name = ActiveValue::Set(first_name.trim().to_string());
        }
        if let Some(last_name) = patch.last_name {
            active.last_name = ActiveValue::Set(non_empty(Some(last_name)));
        }
        if let Some(number) = patch.number {
            active.number = ActiveValue::Set(non_empty(Some(number)));
        }
        if let Some(position) = patch.position {
            active.position = ActiveValue::Set(non_empty(Some(position)));
        }

        if !active.is_changed() {
            return Ok(Some(Self::model_to_player(model)));
        }

        let updated = active.update(&self.db).await?;
        Ok(Some(Self::model_to_player(updated)))
    }

    pub async fn delete(&self, team_id: TeamId, id: RosterPlayerId) -> Result<bool> {
        let result = Players::delete_many()
            .filter(players::Column::TeamId.eq(team_id))
            .filter(players::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::TeamRepository;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> (TeamRepository, RosterRepository) {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        (TeamRepository::new(db.clone()), RosterRepository::new(db))
    }

    fn new_player(first: &str, last: Option<&str>) -> NewPlayer {
        NewPlayer {
            first_name: first.to_string(),
            last_name: last.map(str::to_string),
            number: Some("7".to_string()),
            position: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_roster() {
        let (teams, roster) = setup_test_db().await;
        let team = teams.create("Pioniers").await.unwrap();

        let albert = roster.add(team.id, new_player("Albert", Some("van Asten"))).await.unwrap();
        let berend = roster.add(team.id, new_player("Berend", None)).await.unwrap();

        assert_eq!(albert.number.as_deref(), Some("7"));
        assert!(albert.position.is_none());

        let listed = roster.list(team.id).await.unwrap();
        assert_eq!(listed, vec![albert.clone(), berend]);
        assert_eq!(roster.find_by_id(team.id, albert.id).await.unwrap(), Some(albert));
    }

    #[tokio::test]
    async fn test_rosters_are_scoped_per_team() {
        let (teams, roster) = setup_test_db().await;
        let home = teams.create("Home").await.unwrap();
        let other = teams.create("Other").await.unwrap();

        let player = roster.add(home.id, new_player("Albert", None)).await.unwrap();

        assert!(roster.list(other.id).await.unwrap().is_empty());
        assert!(roster.find_by_id(other.id, player.id).await.unwrap().is_none());
        assert!(!roster.delete(other.id, player.id).await.unwrap());
        assert_eq!(roster.list(home.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (teams, roster) = setup_test_db().await;
        let team = teams.create("Pioniers").await.unwrap();
        let player = roster.add(team.id, new_player("Albert", Some("Asten"))).await.unwrap();

        let updated = roster
            .update(
                team.id,
                player.id,
                PlayerPatch {
                    last_name: Some("van Asten".to_string()),
                    position: Some("SS".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, player.id);
        assert_eq!(updated.first_name, "Albert");
        assert_eq!(updated.last_name.as_deref(), Some("van Asten"));
        assert_eq!(updated.number.as_deref(), Some("7"));
        assert_eq!(updated.position.as_deref(), Some("SS"));

        let missing = roster
            .update(team.id, Uuid::new_v4(), PlayerPatch::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_deleting_team_clears_roster() {
        let (teams, roster) = setup_test_db().await;
        let team = teams.create("Pioniers").await.unwrap();
        roster.add(team.id, new_player("Albert", None)).await.unwrap();

        teams.delete(team.id).await.unwrap();
        assert!(roster.list(team.id).await.unwrap().is_empty());
    }
}
