use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Team::TeamId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Team::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Member::MemberId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Member::Username).string())
                    .col(ColumnDef::new(Member::Age).integer().not_null())
                    .col(ColumnDef::new(Member::TeamId).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_team")
                            .from(Member::Table, Member::TeamId)
                            .to(Team::Table, Team::TeamId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_member_team_id")
                    .table(Member::Table)
                    .col(Member::TeamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Hello::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hello::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hello::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Team {
    Table,
    TeamId,
    Name,
}

#[derive(DeriveIden)]
enum Member {
    Table,
    MemberId,
    Username,
    Age,
    TeamId,
}

#[derive(DeriveIden)]
enum Hello {
    Table,
    Id,
}
