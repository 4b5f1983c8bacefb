use crate::error::AppError;
use crate::model::Task;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

const DISABLE_ENV_VAR: &str = "STUDYMATE_DISABLE_NOTIFICATIONS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub summary: String,
    pub body: String,
}

impl Notice {
    pub fn reminder(task: &Task) -> Self {
        let when = task.reminder_time.as_deref().unwrap_or("today");
        Self {
            summary: format!("Reminder: {}", task.title),
            body: format!("{} task due today ({when})", task.subject),
        }
    }

    pub fn timer_finished() -> Self {
        Self {
            summary: "Well Done!".to_string(),
            body: "Your timer has finished.".to_string(),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: &Notice) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: &Notice) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn notifier_from_env() -> Result<Box<dyn Notifier>, AppError> {
    if std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier() {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidData(_) => {
                tracing::debug!(error = %err, "desktop notifications unavailable");
                Ok(Box::new(NoopNotifier))
            }
            other => Err(other),
        },
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::{Notice, NoopNotifier, Notifier};
    use crate::model::{Priority, Task};
    use time::macros::date;

    #[test]
    fn reminder_notice_names_task_and_time() {
        let task = Task {
            id: "task-1".to_string(),
            title: "Flashcards".to_string(),
            description: None,
            due_date: date!(2025 - 01 - 01),
            reminder_time: Some("18:00".to_string()),
            priority: Priority::Low,
            completed: false,
            subject: "Biology".to_string(),
            color: "#42A5F5".to_string(),
        };

        let notice = Notice::reminder(&task);
        assert_eq!(notice.summary, "Reminder: Flashcards");
        assert!(notice.body.contains("Biology"));
        assert!(notice.body.contains("18:00"));
    }

    #[test]
    fn noop_notifier_accepts_everything() {
        assert!(NoopNotifier.notify(&Notice::timer_finished()).is_ok());
    }
}
