//! Derived views over the task collection. Everything here is pure and
//! recomputed from the canonical list on demand.

mod filter;
mod group;
mod sort;

pub use filter::{
    DateBucket, DateFilter, PriorityFilter, Schedule, StatusFilter, SubjectFilter, TaskFilter,
    partition_by_bucket, subjects_in_use,
};
pub use group::{DateGroup, GroupOrder, group_by_due_date};
pub use sort::{SortKey, sort_tasks};

use time::{Date, OffsetDateTime, UtcOffset};

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Current local date, the reference point for date buckets.
pub fn today_local() -> Date {
    OffsetDateTime::now_utc().to_offset(local_offset()).date()
}
