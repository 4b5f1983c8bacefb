use crate::error::AppError;
use crate::model::Task;
use std::str::FromStr;
use time::Date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupOrder {
    /// Buckets in the order their date is first encountered.
    Insertion,
    #[default]
    Chronological,
}

impl FromStr for GroupOrder {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "insertion" => Ok(Self::Insertion),
            "chronological" | "date" => Ok(Self::Chronological),
            other => Err(AppError::invalid_input(format!(
                "group order must be insertion or chronological (got '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup<'a> {
    pub date: Date,
    pub tasks: Vec<&'a Task>,
}

/// Buckets tasks by due date. Tasks keep their input order within a bucket.
pub fn group_by_due_date<'a, I>(tasks: I, order: GroupOrder) -> Vec<DateGroup<'a>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: Vec<DateGroup<'a>> = Vec::new();
    for task in tasks {
        match groups.iter_mut().find(|group| group.date == task.due_date) {
            Some(group) => group.tasks.push(task),
            None => groups.push(DateGroup {
                date: task.due_date,
                tasks: vec![task],
            }),
        }
    }

    if order == GroupOrder::Chronological {
        groups.sort_by_key(|group| group.date);
    }
    groups
}
