use crate::error::AppError;
use crate::model::{Priority, Task};
use std::str::FromStr;
use time::Date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Incomplete => !task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "incomplete" | "pending" => Ok(Self::Incomplete),
            other => Err(AppError::invalid_input(format!(
                "status must be all, completed or incomplete (got '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl FromStr for PriorityFilter {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        raw.parse().map(Self::Only)
    }
}

/// Subject selection. An empty set behaves like `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubjectFilter {
    #[default]
    All,
    AnyOf(Vec<String>),
}

impl SubjectFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::AnyOf(subjects) => {
                subjects.is_empty() || subjects.iter().any(|subject| *subject == task.subject)
            }
        }
    }
}

/// Where a due date falls relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateBucket {
    Past,
    Today,
    Upcoming,
}

impl DateBucket {
    pub fn classify(due: Date, today: Date) -> Self {
        match due.cmp(&today) {
            std::cmp::Ordering::Less => Self::Past,
            std::cmp::Ordering::Equal => Self::Today,
            std::cmp::Ordering::Greater => Self::Upcoming,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    Only(DateBucket),
}

impl FromStr for DateFilter {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "past" => Ok(Self::Only(DateBucket::Past)),
            "today" => Ok(Self::Only(DateBucket::Today)),
            "upcoming" => Ok(Self::Only(DateBucket::Upcoming)),
            other => Err(AppError::invalid_input(format!(
                "date filter must be all, past, today or upcoming (got '{other}')"
            ))),
        }
    }
}

/// Filter pipeline: status, priority, subjects, due-date bucket, then title
/// search. Each stage narrows the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub subjects: SubjectFilter,
    pub date: DateFilter,
    pub search: String,
}

impl TaskFilter {
    pub fn apply<'a>(&self, tasks: &'a [Task], today: Date) -> Vec<&'a Task> {
        let query = self.search.trim().to_lowercase();

        tasks
            .iter()
            .filter(|task| self.status.matches(task))
            .filter(|task| match self.priority {
                PriorityFilter::All => true,
                PriorityFilter::Only(priority) => task.priority == priority,
            })
            .filter(|task| self.subjects.matches(task))
            .filter(|task| match self.date {
                DateFilter::All => true,
                DateFilter::Only(bucket) => DateBucket::classify(task.due_date, today) == bucket,
            })
            .filter(|task| query.is_empty() || task.title.to_lowercase().contains(&query))
            .collect()
    }
}

/// Past, today and upcoming sections of a task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule<'a> {
    pub past: Vec<&'a Task>,
    pub today: Vec<&'a Task>,
    pub upcoming: Vec<&'a Task>,
}

impl Schedule<'_> {
    pub fn len(&self) -> usize {
        self.past.len() + self.today.len() + self.upcoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn partition_by_bucket<'a, I>(tasks: I, today: Date) -> Schedule<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut schedule = Schedule::default();
    for task in tasks {
        match DateBucket::classify(task.due_date, today) {
            DateBucket::Past => schedule.past.push(task),
            DateBucket::Today => schedule.today.push(task),
            DateBucket::Upcoming => schedule.upcoming.push(task),
        }
    }
    schedule
}

/// Distinct subjects in first-seen order.
pub fn subjects_in_use(tasks: &[Task]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for task in tasks {
        if !task.subject.is_empty() && !seen.contains(&task.subject.as_str()) {
            seen.push(&task.subject);
        }
    }
    seen
}
