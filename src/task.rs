use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type TaskId = i32;
pub type CourseId = i32;
pub type StudentId = i32;

/// One whole-day unit of coursework within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Position within the course; unique per course.
    pub order: i32,
    #[serde(default)]
    pub description: String,
    /// Restricts the task to students enrolled with this scope (e.g. a
    /// grade level). `None` applies to everyone in the course.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_scope: Option<String>,
    #[serde(default)]
    pub is_graded: bool,
}

impl Task {
    pub fn new(id: TaskId, order: i32, description: impl Into<String>) -> Self {
        Self {
            id,
            order,
            description: description.into(),
            owner_scope: None,
            is_graded: false,
        }
    }

    pub fn graded(mut self) -> Self {
        self.is_graded = true;
        self
    }

    pub fn for_scope(mut self, scope: impl Into<String>) -> Self {
        self.owner_scope = Some(scope.into());
        self
    }

    pub fn applies_to(&self, scope: Option<&str>) -> bool {
        match self.owner_scope.as_deref() {
            None => true,
            Some(owner) => scope == Some(owner),
        }
    }
}

/// Evidence that a student finished a task on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub student_id: StudentId,
    pub task_id: TaskId,
    pub completed_date: NaiveDate,
}

impl CompletionRecord {
    pub fn new(student_id: StudentId, task_id: TaskId, completed_date: NaiveDate) -> Self {
        Self {
            student_id,
            task_id,
            completed_date,
        }
    }
}

/// Completion date per task for a single student. Duplicate records for
/// the same task collapse to the earliest date.
pub fn completion_dates<'a, I>(records: I) -> HashMap<TaskId, NaiveDate>
where
    I: IntoIterator<Item = &'a CompletionRecord>,
{
    let mut dates: HashMap<TaskId, NaiveDate> = HashMap::new();
    for record in records {
        dates
            .entry(record.task_id)
            .and_modify(|date| {
                if record.completed_date < *date {
                    *date = record.completed_date;
                }
            })
            .or_insert(record.completed_date);
    }
    dates
}
