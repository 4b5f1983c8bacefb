use crate::error::AppError;
use crate::model::Task;
use crate::notify::{Notice, Notifier};
use crate::query::local_offset;
use time::{OffsetDateTime, PrimitiveDateTime};

#[derive(Debug)]
pub struct ReminderOutcome {
    pub notified: Vec<Task>,
    pub failures: Vec<ReminderFailure>,
}

#[derive(Debug)]
pub struct ReminderFailure {
    pub task_id: String,
    pub error: AppError,
}

pub fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc().to_offset(local_offset());
    PrimitiveDateTime::new(now.date(), now.time())
}

/// Incomplete tasks due on `now`'s date whose reminder time has passed.
pub fn due_reminders(tasks: &[Task], now: PrimitiveDateTime) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| !task.completed && task.due_date == now.date())
        .filter(|task| task.reminder().is_some_and(|at| at <= now.time()))
        .collect()
}

/// Sends one notice per due reminder. A failing notice is recorded and the
/// remaining reminders are still sent.
pub fn notify_due_reminders(
    tasks: &[Task],
    now: PrimitiveDateTime,
    notifier: &dyn Notifier,
) -> ReminderOutcome {
    let mut notified = Vec::new();
    let mut failures = Vec::new();

    for task in due_reminders(tasks, now) {
        match notifier.notify(&Notice::reminder(task)) {
            Ok(()) => notified.push(task.clone()),
            Err(error) => {
                tracing::warn!(id = %task.id, error = %error, "reminder notification failed");
                failures.push(ReminderFailure {
                    task_id: task.id.clone(),
                    error,
                });
            }
        }
    }

    ReminderOutcome { notified, failures }
}
