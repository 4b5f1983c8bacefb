use crate::error::AppError;
use crate::model::subject::{DEFAULT_COLOR, find_subject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, Time};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "due_date")]
    pub due_date: Date,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub subject: String,
    #[serde(default = "default_color")]
    pub color: String,
}

impl Task {
    /// Reminder as a time of day; `None` when unset or not `HH:MM`.
    pub fn reminder(&self) -> Option<Time> {
        self.reminder_time
            .as_deref()
            .and_then(|raw| Time::parse(raw.trim(), format_description!("[hour]:[minute]")).ok())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(AppError::invalid_input(format!(
                "priority must be low, medium or high (got '{other}')"
            ))),
        }
    }
}

/// Raw fields of the add-task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub reminder_time: Option<String>,
    pub priority: Priority,
    pub subject: Option<String>,
    pub color: Option<String>,
}

impl TaskDraft {
    /// Validates the draft and builds a pending task with the given id.
    ///
    /// Title, due date and subject are required; the error lists every
    /// missing field at once so nothing is saved partially.
    pub fn into_task(self, id: String) -> Result<Task, AppError> {
        let title = self.title.trim();
        let due_date = non_blank(self.due_date.as_deref());
        let subject = non_blank(self.subject.as_deref());

        let mut missing = Vec::new();
        if title.is_empty() {
            missing.push("title");
        }
        if due_date.is_none() {
            missing.push("due date");
        }
        if subject.is_none() {
            missing.push("subject");
        }
        if !missing.is_empty() {
            return Err(AppError::invalid_input(format!(
                "{} required",
                join_fields(&missing)
            )));
        }

        let due_date = parse_due_date(due_date.unwrap_or_default())?;
        let subject = canonical_subject(subject.unwrap_or_default())?;
        let reminder_time = match non_blank(self.reminder_time.as_deref()) {
            Some(raw) => Some(normalize_reminder_time(raw)?),
            None => None,
        };
        let color = match non_blank(self.color.as_deref()) {
            Some(raw) => normalize_color(raw)?,
            None => DEFAULT_COLOR.to_string(),
        };

        Ok(Task {
            id,
            title: title.to_string(),
            description: non_blank(self.description.as_deref()).map(str::to_string),
            due_date,
            reminder_time,
            priority: self.priority,
            completed: false,
            subject,
            color,
        })
    }
}

/// Partial edit. `None` leaves a field untouched; a blank description or
/// reminder clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub reminder_time: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub subject: Option<String>,
    pub color: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns the patched copy of `task`, or the first validation error.
    pub fn apply_to(&self, task: &Task) -> Result<Task, AppError> {
        let mut updated = task.clone();

        if let Some(title) = self.title.as_deref() {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(AppError::invalid_input("title is required"));
            }
            updated.title = trimmed.to_string();
        }
        if let Some(description) = self.description.as_deref() {
            updated.description = non_blank(Some(description)).map(str::to_string);
        }
        if let Some(due_date) = self.due_date.as_deref() {
            updated.due_date = parse_due_date(due_date)?;
        }
        if let Some(reminder) = self.reminder_time.as_deref() {
            updated.reminder_time = match non_blank(Some(reminder)) {
                Some(raw) => Some(normalize_reminder_time(raw)?),
                None => None,
            };
        }
        if let Some(priority) = self.priority {
            updated.priority = priority;
        }
        if let Some(completed) = self.completed {
            updated.completed = completed;
        }
        if let Some(subject) = self.subject.as_deref() {
            updated.subject = canonical_subject(subject)?;
        }
        if let Some(color) = self.color.as_deref() {
            updated.color = normalize_color(color)?;
        }

        Ok(updated)
    }
}

/// Parses a due date. A trailing time part (`2024-01-01T00:00:00Z`) is
/// dropped, the date portion must be `YYYY-MM-DD`.
pub fn parse_due_date(raw: &str) -> Result<Date, AppError> {
    let trimmed = raw.trim();
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    Date::parse(date_part, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::invalid_input(format!("due date must be YYYY-MM-DD (got '{trimmed}')")))
}

pub fn format_due_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Validates an `HH:MM` reminder and returns it zero-padded.
pub fn normalize_reminder_time(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let time = Time::parse(trimmed, format_description!("[hour]:[minute]"))
        .map_err(|_| AppError::invalid_input(format!("reminder time must be HH:MM (got '{trimmed}')")))?;
    Ok(format!("{:02}:{:02}", time.hour(), time.minute()))
}

/// Validates a `#RRGGBB` color and returns it upper-cased.
pub fn normalize_color(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let valid = trimmed.len() == 7
        && trimmed.starts_with('#')
        && trimmed[1..].chars().all(|ch| ch.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::invalid_input(format!(
            "color must be a #RRGGBB hex code (got '{trimmed}')"
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}

fn canonical_subject(raw: &str) -> Result<String, AppError> {
    find_subject(raw)
        .map(|subject| subject.name.to_string())
        .ok_or_else(|| AppError::invalid_input(format!("unknown subject '{}'", raw.trim())))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn join_fields(fields: &[&str]) -> String {
    match fields {
        [only] => format!("{only} is"),
        [first, second] => format!("{first} and {second} are"),
        [rest @ .., last] => format!("{}, and {last} are", rest.join(", ")),
        [] => String::new(),
    }
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}

mod due_date {
    use super::{format_due_date, parse_due_date};
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_due_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_due_date(&raw).map_err(|err| serde::de::Error::custom(err.message()))
    }
}
