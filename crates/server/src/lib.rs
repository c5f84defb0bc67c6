use db::DBService;
use services::services::task_item::TaskItemService;

pub mod error;
pub mod http;
pub mod routes;

/// Shared handler state. Holds the store handle explicitly; nothing in the
/// server reaches for a global connection.
#[derive(Clone)]
pub struct AppState {
    task_items: TaskItemService,
}

impl AppState {
    pub fn new(db: DBService) -> Self {
        Self {
            task_items: TaskItemService::new(db),
        }
    }

    pub fn task_items(&self) -> &TaskItemService {
        &self.task_items
    }
}
