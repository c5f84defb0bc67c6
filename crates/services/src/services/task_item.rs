use chrono::Utc;
use db::{
    DBService, DbErr,
    models::task_item::{CreateTaskItem, TaskItem, UpdateTaskItem},
};
use thiserror::Error;

use super::{
    local_time::to_local,
    task_item_patch::{PatchError, TaskItemPatch},
};

#[derive(Debug, Error)]
pub enum TaskItemServiceError {
    #[error("Task item {0} not found")]
    NotFound(i64),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<PatchError> for TaskItemServiceError {
    fn from(err: PatchError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskItemServiceError>;

/// Reads and mutates task items on behalf of the HTTP layer.
///
/// Read paths (`list`, `get_by_id`) render `created_date` in local time.
/// Write paths return the record as persisted, in UTC.
#[derive(Clone)]
pub struct TaskItemService {
    db: DBService,
}

impl TaskItemService {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<TaskItem>> {
        let tasks = TaskItem::find_all_newest_first(&self.db.pool).await?;
        Ok(tasks.into_iter().map(localize).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<TaskItem> {
        TaskItem::find_by_id(&self.db.pool, id)
            .await?
            .map(localize)
            .ok_or(TaskItemServiceError::NotFound(id))
    }

    pub async fn create(&self, data: &CreateTaskItem) -> Result<TaskItem> {
        let task = TaskItem::create(&self.db.pool, data).await?;
        tracing::debug!(task_item_id = task.id, "Created task item '{}'", task.title);
        Ok(task)
    }

    /// Full replace of the editable fields. `created_date` is left as stored.
    pub async fn replace(&self, id: i64, data: &UpdateTaskItem) -> Result<TaskItem> {
        TaskItem::update(&self.db.pool, id, data)
            .await?
            .ok_or(TaskItemServiceError::NotFound(id))
    }

    /// Applies a validated patch and persists the result with a single write.
    pub async fn patch(&self, id: i64, patch: &TaskItemPatch) -> Result<TaskItem> {
        let mut task = TaskItem::find_by_id(&self.db.pool, id)
            .await?
            .ok_or(TaskItemServiceError::NotFound(id))?;

        if patch.is_empty() {
            return Ok(task);
        }

        patch.apply_to(&mut task);
        match TaskItem::save(&self.db.pool, &task).await {
            Ok(saved) => {
                tracing::debug!(
                    task_item_id = id,
                    edits = patch.edits().len(),
                    "Patched task item"
                );
                Ok(saved)
            }
            // Deleted between the read and the write.
            Err(DbErr::RecordNotUpdated) => Err(TaskItemServiceError::NotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let rows = TaskItem::delete(&self.db.pool, id).await?;
        if rows > 0 {
            tracing::debug!(task_item_id = id, "Deleted task item");
        }
        Ok(rows > 0)
    }
}

fn localize(mut task: TaskItem) -> TaskItem {
    task.created_date = to_local(task.created_date.with_timezone(&Utc));
    task
}
