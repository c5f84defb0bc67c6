use sea_orm_migration::{prelude::*, sea_orm::DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(TaskItems::Table)
                    .col(pk_id_col(manager, TaskItems::Id))
                    .col(ColumnDef::new(TaskItems::Title).text().not_null())
                    .col(ColumnDef::new(TaskItems::Description).text())
                    .col(ColumnDef::new(TaskItems::Status).text().not_null())
                    .col(ColumnDef::new(TaskItems::AssignedUser).text().not_null())
                    .col(timestamp_col(TaskItems::CreatedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_task_items_created_date")
                    .table(TaskItems::Table)
                    .col(TaskItems::CreatedDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_task_items_created_date")
                    .table(TaskItems::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(TaskItems::Table).to_owned())
            .await?;
        Ok(())
    }
}

// SQLite only honours AUTOINCREMENT on an INTEGER primary key; without it a
// deleted max id can be handed out again.
fn pk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum TaskItems {
    Table,
    Id,
    Title,
    Description,
    Status,
    AssignedUser,
    CreatedDate,
}
