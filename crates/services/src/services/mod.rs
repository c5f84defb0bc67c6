pub mod config;
pub mod local_time;
pub mod task_item;
pub mod task_item_patch;
