use crate::session::Session;
use crate::task::{CompletionRecord, Task, TaskId, completion_dates};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome for one task of a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "snake_case")]
pub enum TaskPlacement {
    Completed(NaiveDate),
    Projected(NaiveDate),
    /// No school day was available for the task.
    Unplaced,
}

impl TaskPlacement {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TaskPlacement::Completed(date) | TaskPlacement::Projected(date) => Some(*date),
            TaskPlacement::Unplaced => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskPlacement::Completed(_))
    }

    pub fn is_projected(&self) -> bool {
        matches!(self, TaskPlacement::Projected(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPlacement::Completed(_) => "completed",
            TaskPlacement::Projected(_) => "projected",
            TaskPlacement::Unplaced => "unplaced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskForecast {
    pub task_id: TaskId,
    pub placement: TaskPlacement,
}

/// Per-task placements in the order the tasks were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub items: Vec<TaskForecast>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskForecast> {
        self.items.iter()
    }

    pub fn placement_for(&self, task_id: TaskId) -> Option<TaskPlacement> {
        self.items
            .iter()
            .find(|item| item.task_id == task_id)
            .map(|item| item.placement)
    }

    /// Task projected onto `date`, if any.
    pub fn projected_on(&self, date: NaiveDate) -> Option<TaskId> {
        self.items
            .iter()
            .find(|item| item.placement == TaskPlacement::Projected(date))
            .map(|item| item.task_id)
    }

    /// Resolved date of the final task: completed date, else projected
    /// date. `None` for an empty task list or an unplaced final task.
    pub fn last_forecast_date(&self) -> Option<NaiveDate> {
        self.items.last().and_then(|item| item.placement.date())
    }

    pub fn completed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.placement.is_completed())
            .count()
    }
}

/// Places an ordered task list onto the school days of a session.
///
/// Single forward pass: completed tasks keep their completion date, the
/// rest take successive school days starting from today (or the session
/// start when that is later). A day consumed by completed work is not
/// offered to a later task.
pub struct Forecaster<'a> {
    session: &'a Session,
    today: NaiveDate,
    include_upcoming: bool,
}

impl<'a> Forecaster<'a> {
    pub fn new(session: &'a Session, today: NaiveDate) -> Self {
        Self {
            session,
            today,
            include_upcoming: false,
        }
    }

    /// Also project tasks for a session that has not started yet, anchored
    /// on its first day.
    pub fn including_upcoming(mut self, include_upcoming: bool) -> Self {
        self.include_upcoming = include_upcoming;
        self
    }

    pub fn anchor(&self) -> NaiveDate {
        self.today.max(self.session.start_date)
    }

    /// Projections only make sense while the session is running.
    pub fn is_active(&self) -> bool {
        self.session.contains(self.today)
            || (self.include_upcoming && self.today < self.session.start_date)
    }

    pub fn execute(&self, tasks: &[Task], completed: &HashMap<TaskId, NaiveDate>) -> Forecast {
        let active = self.is_active();
        let mut cursor = self.session.first_school_day_on_or_after(self.anchor());
        let mut items = Vec::with_capacity(tasks.len());

        for task in tasks {
            let placement = if let Some(&done) = completed.get(&task.id) {
                if done == cursor {
                    cursor = self.session.next_school_day_after(cursor);
                }
                TaskPlacement::Completed(done)
            } else if active && self.session.is_school_day(cursor) {
                let date = cursor;
                cursor = self.session.next_school_day_after(cursor);
                TaskPlacement::Projected(date)
            } else {
                TaskPlacement::Unplaced
            };
            tracing::trace!(task_id = task.id, status = placement.as_str(), date = ?placement.date(), "placed task");
            items.push(TaskForecast {
                task_id: task.id,
                placement,
            });
        }

        let forecast = Forecast { items };
        tracing::debug!(
            tasks = forecast.len(),
            completed = forecast.completed_count(),
            active,
            last = ?forecast.last_forecast_date(),
            "forecast computed"
        );
        forecast
    }

    pub fn last_forecast_date(
        &self,
        tasks: &[Task],
        completed: &HashMap<TaskId, NaiveDate>,
    ) -> Option<NaiveDate> {
        self.execute(tasks, completed).last_forecast_date()
    }
}

/// Forecast `tasks` for one student's completion records.
pub fn forecast_tasks(
    tasks: &[Task],
    completions: &[CompletionRecord],
    session: &Session,
    today: NaiveDate,
) -> Forecast {
    let completed = completion_dates(completions);
    Forecaster::new(session, today).execute(tasks, &completed)
}

pub fn last_forecast_date(
    tasks: &[Task],
    completions: &[CompletionRecord],
    session: &Session,
    today: NaiveDate,
) -> Option<NaiveDate> {
    forecast_tasks(tasks, completions, session, today).last_forecast_date()
}
