//! String key-value persistence.
//!
//! The task collection lives under [`TASKS_KEY`] as one serialized JSON array;
//! profile fields live under their own keys as plain strings.

use crate::error::AppError;

pub mod json_store;
mod memory;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

pub const TASKS_KEY: &str = "tasks";
pub const USER_NAME_KEY: &str = "userName";
pub const USER_EMAIL_KEY: &str = "userEmail";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;

    fn remove(&mut self, key: &str) -> Result<(), AppError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        (**self).remove(key)
    }
}
