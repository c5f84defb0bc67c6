use sea_orm_migration::prelude::*;

mod m20250829000000_task_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250829000000_task_items::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};

    use super::*;

    #[tokio::test]
    async fn migrations_apply_and_roll_back_cleanly() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let manager = SchemaManager::new(&db);
        assert!(manager.has_table("task_items").await.unwrap());
        assert!(
            manager
                .has_index("task_items", "idx_task_items_created_date")
                .await
                .unwrap()
        );

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("task_items").await.unwrap());
    }

    #[tokio::test]
    async fn primary_key_uses_sqlite_autoincrement() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let row = db
            .query_one_raw(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'task_items'",
            ))
            .await
            .unwrap()
            .expect("task_items table definition");
        let sql: String = row.try_get("", "sql").unwrap();
        assert!(sql.to_uppercase().contains("AUTOINCREMENT"));
    }
}
