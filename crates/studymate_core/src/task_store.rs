use crate::error::AppError;
use crate::model::{Task, TaskDraft, TaskPatch};
use crate::storage::{KeyValueStore, TASKS_KEY};
use time::OffsetDateTime;

/// The canonical task collection, persisted under [`TASKS_KEY`].
///
/// Every mutation reads the whole collection, changes it and writes it back.
/// Writers inside one process are serialized by `&mut self`; separate
/// processes sharing the same backing store race and the last write wins.
/// A failed write is logged and returned, nothing is retried or rolled back.
#[derive(Debug)]
pub struct TaskStore<S> {
    store: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access for the other keys sharing the backing store, such as the profile.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Loads the collection, treating unreadable or unparsable data as empty.
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::warn!(error = %err, "task collection unreadable, using empty list");
                Vec::new()
            }
        }
    }

    /// Loads the collection, surfacing read and parse failures.
    pub fn try_load(&self) -> Result<Vec<Task>, AppError> {
        let Some(raw) = self.store.get(TASKS_KEY)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw)
            .map_err(|err| AppError::invalid_data(format!("stored tasks are invalid: {err}")))
    }

    pub fn get(&self, id: &str) -> Result<Task, AppError> {
        let id = require_id(id)?;
        self.try_load()?
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(id))
    }

    pub fn add(&mut self, draft: TaskDraft) -> Result<Task, AppError> {
        let mut tasks = self.try_load()?;
        let task = draft.into_task(next_id(&tasks))?;
        tasks.push(task.clone());
        self.save(&tasks)?;
        tracing::debug!(id = %task.id, title = %task.title, "task added");
        Ok(task)
    }

    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> Result<Task, AppError> {
        if patch.is_empty() {
            return Err(AppError::invalid_input("nothing to update"));
        }
        self.modify(id, |task| {
            *task = patch.apply_to(task)?;
            Ok(())
        })
    }

    pub fn delete(&mut self, id: &str) -> Result<Task, AppError> {
        let id = require_id(id)?;
        let mut tasks = self.try_load()?;
        let index = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(id))?;

        let removed = tasks.remove(index);
        self.save(&tasks)?;
        tracing::debug!(id = %removed.id, "task deleted");
        Ok(removed)
    }

    pub fn toggle_complete(&mut self, id: &str) -> Result<Task, AppError> {
        self.modify(id, |task| {
            task.completed = !task.completed;
            Ok(())
        })
    }

    /// Sets the completion flag; completing a finished task is a no-op write.
    pub fn mark_complete(&mut self, id: &str) -> Result<Task, AppError> {
        self.modify(id, |task| {
            task.completed = true;
            Ok(())
        })
    }

    fn modify<F>(&mut self, id: &str, change: F) -> Result<Task, AppError>
    where
        F: FnOnce(&mut Task) -> Result<(), AppError>,
    {
        let id = require_id(id)?;
        let mut tasks = self.try_load()?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(id))?;

        change(task)?;
        let updated = task.clone();
        self.save(&tasks)?;
        tracing::debug!(id = %updated.id, completed = updated.completed, "task updated");
        Ok(updated)
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), AppError> {
        let content =
            serde_json::to_string(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
        self.store.set(TASKS_KEY, &content).inspect_err(|err| {
            tracing::error!(error = %err, count = tasks.len(), "failed to save tasks");
        })
    }
}

fn require_id(id: &str) -> Result<&str, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    Ok(trimmed)
}

/// `task-<unix nanos>`, bumped past any id already in the collection.
fn next_id(tasks: &[Task]) -> String {
    let mut stamp = OffsetDateTime::now_utc().unix_timestamp_nanos();
    loop {
        let candidate = format!("task-{stamp}");
        if !tasks.iter().any(|task| task.id == candidate) {
            return candidate;
        }
        stamp += 1;
    }
}
