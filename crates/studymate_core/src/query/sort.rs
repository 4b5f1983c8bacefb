use crate::error::AppError;
use crate::model::Task;
use std::borrow::Borrow;
use std::cmp::Reverse;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Color,
    /// High first.
    Priority,
    /// Earliest first.
    DueDate,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "color" => Ok(Self::Color),
            "priority" => Ok(Self::Priority),
            "due-date" | "due_date" | "duedate" | "due" => Ok(Self::DueDate),
            other => Err(AppError::invalid_input(format!(
                "sort key must be color, priority or due-date (got '{other}')"
            ))),
        }
    }
}

/// Stable sort: ties keep their input order.
pub fn sort_tasks<T: Borrow<Task>>(tasks: &mut [T], key: SortKey) {
    match key {
        SortKey::Color => tasks.sort_by_cached_key(|task| task.borrow().color.to_ascii_lowercase()),
        SortKey::Priority => tasks.sort_by_key(|task| Reverse(task.borrow().priority.rank())),
        SortKey::DueDate => tasks.sort_by_key(|task| task.borrow().due_date),
    }
}
