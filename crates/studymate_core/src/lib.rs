//! Core of the studymate study planner: the persisted task collection, the
//! derived task views, and the countdown study timer.

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod profile;
pub mod query;
pub mod reminders;
pub mod storage;
pub mod task_store;
pub mod ticker;
pub mod timer;

pub use error::AppError;
pub use task_store::TaskStore;
