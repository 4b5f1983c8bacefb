mod subject;
mod task;

pub use subject::{DEFAULT_COLOR, PALETTE, SUBJECTS, Subject, find_subject};
pub use task::{
    Priority, Task, TaskDraft, TaskPatch, format_due_date, normalize_color, normalize_reminder_time,
    parse_due_date,
};
