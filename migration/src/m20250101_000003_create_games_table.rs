use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_teams_table::Teams;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Games::TeamId).uuid().not_null())
                    .col(ColumnDef::new(Games::Date).string().not_null())
                    .col(ColumnDef::new(Games::Opponent).string().not_null())
                    .col(ColumnDef::new(Games::Score).string().null())
                    .col(ColumnDef::new(Games::Notes).text().not_null().default(""))
                    // Batting lines are stored as JSON arrays
                    .col(ColumnDef::new(Games::PlayerStats).text().not_null())
                    .col(ColumnDef::new(Games::OpponentStats).text().null())
                    .col(ColumnDef::new(Games::RawImageBase64).text().null())
                    .col(ColumnDef::new(Games::CreatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_team_id")
                            .from(Games::Table, Games::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural-key lookups when merging submissions
        manager
            .create_index(
                Index::create()
                    .name("idx_games_team_id_date")
                    .table(Games::Table)
                    .col(Games::TeamId)
                    .col(Games::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    TeamId,
    Date,
    Opponent,
    Score,
    Notes,
    PlayerStats,
    OpponentStats,
    RawImageBase64,
    CreatedAt,
}
