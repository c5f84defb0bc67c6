pub mod frontend;
pub mod health;
pub mod task_items;
