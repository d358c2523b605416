use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Title::Table)
                    .if_not_exists()
                    .col(pk_auto(Title::Id))
                    .col(big_integer(Title::ShowId))
                    .col(string(Title::Title))
                    .col(string_null(Title::Director))
                    .col(string_null(Title::Cast))
                    .col(string_null(Title::Country))
                    .col(string_null(Title::DateAdded))
                    .col(integer(Title::ReleaseYear))
                    .col(string(Title::Rating))
                    .col(string(Title::Duration))
                    .col(string(Title::ListedIn))
                    .col(string(Title::Description))
                    .col(string(Title::Type))
                    .to_owned(),
            )
            .await?;

        // show_id carries no unique constraint: the source dataset may
        // contain duplicates and lookups take the first match.
        manager
            .create_index(
                Index::create()
                    .name("idx_title_show_id")
                    .table(Title::Table)
                    .col(Title::ShowId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_title_type")
                    .table(Title::Table)
                    .col(Title::Type)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Title::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Title {
    Table,
    Id,
    ShowId,
    Title,
    Director,
    Cast,
    Country,
    DateAdded,
    ReleaseYear,
    Rating,
    Duration,
    ListedIn,
    Description,
    Type,
}
