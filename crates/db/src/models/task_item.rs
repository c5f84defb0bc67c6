use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::entities::task_item;

/// A persisted task record as exchanged over the API.
///
/// `created_date` keeps an explicit offset so read paths can render the
/// stored UTC instant in local time without losing the instant itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    #[ts(type = "number")]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub assigned_user: String,
    pub created_date: DateTime<FixedOffset>,
}

/// Body of a create request. Any `id` sent by the caller is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    pub assigned_user: String,
    #[serde(default)]
    pub created_date: Option<DateTime<FixedOffset>>,
}

/// Body of a full replace. `createdDate` is not part of it: replacing a
/// record never moves its creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    pub assigned_user: String,
}

impl TaskItem {
    fn from_model(model: task_item::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            assigned_user: model.assigned_user,
            created_date: model.created_date.fixed_offset(),
        }
    }

    pub async fn find_all_newest_first<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = task_item::Entity::find()
            .order_by_desc(task_item::Column::CreatedDate)
            .order_by_desc(task_item::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = task_item::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateTaskItem) -> Result<Self, DbErr> {
        let created_date = data
            .created_date
            .map(|date| date.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        let active = task_item::ActiveModel {
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            status: Set(data.status.clone()),
            assigned_user: Set(data.assigned_user.clone()),
            created_date: Set(created_date),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    /// Overwrites the editable fields of an existing row. Returns `None` when
    /// no row has this id, including when it is deleted between the read and
    /// the write.
    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        data: &UpdateTaskItem,
    ) -> Result<Option<Self>, DbErr> {
        let Some(record) = task_item::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };
        Self::overwrite(db, record, data).await
    }

    async fn overwrite<C: ConnectionTrait>(
        db: &C,
        record: task_item::Model,
        data: &UpdateTaskItem,
    ) -> Result<Option<Self>, DbErr> {
        let mut active: task_item::ActiveModel = record.into();
        active.title = Set(data.title.clone());
        active.description = Set(data.description.clone());
        active.status = Set(data.status.clone());
        active.assigned_user = Set(data.assigned_user.clone());

        match active.update(db).await {
            Ok(updated) => Ok(Some(Self::from_model(updated))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Writes every column of `task` back to its row, including
    /// `created_date`. Fails with `RecordNotUpdated` if the row is gone.
    pub async fn save<C: ConnectionTrait>(db: &C, task: &TaskItem) -> Result<Self, DbErr> {
        let active = task_item::ActiveModel {
            id: Set(task.id),
            title: Set(task.title.clone()),
            description: Set(task.description.clone()),
            status: Set(task.status.clone()),
            assigned_user: Set(task.assigned_user.clone()),
            created_date: Set(task.created_date.with_timezone(&Utc)),
        };
        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        let result = task_item::Entity::delete_many()
            .filter(task_item::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    fn new_task(title: &str, created_date: Option<DateTime<FixedOffset>>) -> CreateTaskItem {
        CreateTaskItem {
            title: title.to_string(),
            description: Some("Some description".to_string()),
            status: "To Do".to_string(),
            assigned_user: "Nurse Kelly".to_string(),
            created_date,
        }
    }

    fn at(hour: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2025, 8, 30, hour, 0, 0)
            .unwrap()
            .fixed_offset()
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let db = setup_db().await;

        let first = TaskItem::create(&db, &new_task("First", None)).await.unwrap();
        let second = TaskItem::create(&db, &new_task("Second", None)).await.unwrap();

        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert_eq!(first.title, "First");
        assert_eq!(first.assigned_user, "Nurse Kelly");
    }

    #[tokio::test]
    async fn create_stores_offset_dates_as_the_same_instant() {
        let db = setup_db().await;
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2025, 8, 30, 14, 0, 0).unwrap();

        let created = TaskItem::create(&db, &new_task("Offset", Some(local)))
            .await
            .unwrap();

        assert_eq!(created.created_date, local);
        assert_eq!(created.created_date.offset().local_minus_utc(), 0);
    }

    #[tokio::test]
    async fn find_all_orders_newest_first() {
        let db = setup_db().await;
        TaskItem::create(&db, &new_task("Old", Some(at(8)))).await.unwrap();
        TaskItem::create(&db, &new_task("New", Some(at(12)))).await.unwrap();
        TaskItem::create(&db, &new_task("Middle", Some(at(10)))).await.unwrap();

        let titles: Vec<String> = TaskItem::find_all_newest_first(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|task| task.title)
            .collect();

        assert_eq!(titles, vec!["New", "Middle", "Old"]);
    }

    #[tokio::test]
    async fn update_keeps_created_date_and_reports_missing_rows() {
        let db = setup_db().await;
        let created = TaskItem::create(&db, &new_task("Old Task", Some(at(9))))
            .await
            .unwrap();

        let updated = TaskItem::update(
            &db,
            created.id,
            &UpdateTaskItem {
                title: "Updated Task".to_string(),
                description: None,
                status: "done".to_string(),
                assigned_user: "Dr. Adams".to_string(),
            },
        )
        .await
        .unwrap()
        .expect("task exists");

        assert_eq!(updated.title, "Updated Task");
        assert_eq!(updated.description, None);
        assert_eq!(updated.created_date, created.created_date);

        let missing = TaskItem::update(
            &db,
            created.id + 100,
            &UpdateTaskItem {
                title: "Nope".to_string(),
                description: None,
                status: "done".to_string(),
                assigned_user: "Nobody".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn save_fails_once_the_row_is_deleted() {
        let db = setup_db().await;
        let created = TaskItem::create(&db, &new_task("Ephemeral", None)).await.unwrap();

        assert_eq!(TaskItem::delete(&db, created.id).await.unwrap(), 1);
        assert_eq!(TaskItem::delete(&db, created.id).await.unwrap(), 0);

        let err = TaskItem::save(&db, &created).await.unwrap_err();
        assert!(matches!(err, DbErr::RecordNotUpdated));
    }

    #[tokio::test]
    async fn update_of_a_row_deleted_after_lookup_reports_missing() {
        let db = setup_db().await;
        let created = TaskItem::create(&db, &new_task("Stale", None)).await.unwrap();
        let stale = task_item::Entity::find_by_id(created.id)
            .one(&db)
            .await
            .unwrap()
            .expect("task exists");
        TaskItem::delete(&db, created.id).await.unwrap();

        let result = TaskItem::overwrite(
            &db,
            stale,
            &UpdateTaskItem {
                title: "Too late".to_string(),
                description: None,
                status: "done".to_string(),
                assigned_user: "Dr. Adams".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(result.is_none());
        assert!(TaskItem::find_by_id(&db, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let db = setup_db().await;
        let first = TaskItem::create(&db, &new_task("One", None)).await.unwrap();
        TaskItem::delete(&db, first.id).await.unwrap();

        let second = TaskItem::create(&db, &new_task("Two", None)).await.unwrap();
        assert!(second.id > first.id);
    }
}
