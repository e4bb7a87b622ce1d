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
                    .table(Players::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Players::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Players::TeamId).uuid().not_null())
                    .col(ColumnDef::new(Players::FirstName).string().not_null())
                    .col(ColumnDef::new(Players::LastName).string().null())
                    .col(ColumnDef::new(Players::Number).string().null())
                    .col(ColumnDef::new(Players::Position).string().null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_team_id")
                            .from(Players::Table, Players::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Roster lookups are always per team
        manager
            .create_index(
                Index::create()
                    .name("idx_players_team_id")
                    .table(Players::Table)
                    .col(Players::TeamId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    TeamId,
    FirstName,
    LastName,
    Number,
    Position,
    CreatedAt,
}
