use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Json as ResponseJson},
    routing::{MethodRouter, get},
};
use db::models::task_item::{CreateTaskItem, TaskItem, UpdateTaskItem};
use serde_json::Value;
use services::services::{task_item::TaskItemServiceError, task_item_patch::TaskItemPatch};

use crate::{AppState, error::ApiError};

/// Collection paths. The existing client addresses the collection as
/// `/TaskItems`; both spellings route to the same handlers.
const COLLECTION_PATHS: [&str; 2] = ["/taskitems", "/TaskItems"];

pub async fn get_task_items(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<TaskItem>>, ApiError> {
    let tasks = state.task_items().list().await?;
    Ok(ResponseJson(tasks))
}

pub async fn get_task_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ResponseJson<TaskItem>, ApiError> {
    let Path(id) = id?;
    let task = state.task_items().get_by_id(id).await?;
    Ok(ResponseJson(task))
}

pub async fn create_task_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskItem>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let task = state.task_items().create(&payload).await?;
    tracing::info!(task_item_id = task.id, "Created task item");

    let location = format!("/api/taskitems/{}", task.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        ResponseJson(task),
    ))
}

pub async fn update_task_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTaskItem>, JsonRejection>,
) -> Result<ResponseJson<TaskItem>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let task = state.task_items().replace(id, &payload).await?;
    Ok(ResponseJson(task))
}

pub async fn patch_task_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    document: Result<Json<Value>, JsonRejection>,
) -> Result<ResponseJson<TaskItem>, ApiError> {
    let Path(id) = id?;
    let Json(document) = document?;
    // Validate the whole document before touching the store.
    let patch = TaskItemPatch::from_value(document).map_err(TaskItemServiceError::from)?;
    let task = state.task_items().patch(id, &patch).await?;
    Ok(ResponseJson(task))
}

pub async fn delete_task_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    if state.task_items().delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(TaskItemServiceError::NotFound(id).into())
    }
}

fn collection_routes() -> MethodRouter<AppState> {
    get(get_task_items).post(create_task_item)
}

fn item_routes() -> MethodRouter<AppState> {
    get(get_task_item)
        .put(update_task_item)
        .patch(patch_task_item)
        .delete(delete_task_item)
}

pub fn router() -> Router<AppState> {
    COLLECTION_PATHS
        .iter()
        .fold(Router::new(), |router, collection| {
            router
                .route(collection, collection_routes())
                .route(&format!("{collection}/{{id}}"), item_routes())
        })
}
