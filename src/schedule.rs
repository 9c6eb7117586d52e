use crate::calculations::attendance::{AttendanceLedger, build_attendance_ledger};
use crate::calculations::forecast::{Forecast, Forecaster, TaskPlacement};
use crate::school::{Course, SchoolYear, Student};
use crate::session::{BreakDateKind, Session, WeekDate};
use crate::task::{CompletionRecord, CourseId, StudentId, Task, TaskId, completion_dates};
use crate::week::Week;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// What a course shows for one student on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayEntry {
    /// Tasks completed that day.
    Coursework { task_ids: Vec<TaskId> },
    /// Next incomplete task scheduled for that day.
    Due { task_id: TaskId },
    /// A school day with nothing left to schedule.
    NoTask,
    Break { date_kind: BreakDateKind },
    NoActivity,
}

impl DayEntry {
    pub fn due_task(&self) -> Option<TaskId> {
        match self {
            DayEntry::Due { task_id } => Some(*task_id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayEntry::Coursework { .. } => "coursework",
            DayEntry::Due { .. } => "due",
            DayEntry::NoTask => "no_task",
            DayEntry::Break { .. } => "break",
            DayEntry::NoActivity => "no_activity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDay {
    pub course_id: CourseId,
    pub entry: DayEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub courses: Vec<CourseDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedEntry {
    pub date: NaiveDate,
    pub entry: DayEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseWeek {
    pub course_id: CourseId,
    pub days: Vec<DatedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
    pub student_id: StudentId,
    pub week: Week,
    pub courses: Vec<CourseWeek>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub course_id: CourseId,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub graded_tasks: usize,
    pub completed_graded_tasks: usize,
    /// 0.0..=100.0; zero for a course with no tasks.
    pub percent_complete: f64,
    pub projected_finish: Option<NaiveDate>,
}

/// One student's view of one course, gathered once per query.
struct CourseContext {
    session: Session,
    tasks: Vec<Task>,
    completed: HashMap<TaskId, NaiveDate>,
    coursework_by_date: BTreeMap<NaiveDate, Vec<TaskId>>,
    forecast: Forecast,
    /// Projected placements in ascending date order.
    projected: Vec<(NaiveDate, TaskId)>,
}

impl CourseContext {
    fn coursework_on(&self, date: NaiveDate) -> Option<&Vec<TaskId>> {
        self.coursework_by_date.get(&date)
    }

    fn is_caught_up(&self) -> bool {
        self.forecast.completed_count() == self.forecast.len()
    }
}

/// Builds daily, weekly, forecast, progress and attendance views for a
/// school year from pre-fetched completion records. `today` is always
/// supplied by the caller.
pub struct ScheduleBuilder<'a> {
    school_year: &'a SchoolYear,
    completions: &'a [CompletionRecord],
    today: NaiveDate,
    include_upcoming: bool,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(
        school_year: &'a SchoolYear,
        completions: &'a [CompletionRecord],
        today: NaiveDate,
    ) -> Self {
        Self {
            school_year,
            completions,
            today,
            include_upcoming: false,
        }
    }

    /// Forecast courses of a school year that has not started yet.
    pub fn including_upcoming(mut self, include_upcoming: bool) -> Self {
        self.include_upcoming = include_upcoming;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn context(&self, student: &Student, course: &Course) -> CourseContext {
        let session = self.school_year.course_session(course);
        let tasks = student.tasks_for(course);
        let records: Vec<&CompletionRecord> = self
            .completions
            .iter()
            .filter(|record| record.student_id == student.id && course.has_task(record.task_id))
            .collect();

        let mut coursework_by_date: BTreeMap<NaiveDate, Vec<TaskId>> = BTreeMap::new();
        for record in &records {
            let day = coursework_by_date.entry(record.completed_date).or_default();
            if !day.contains(&record.task_id) {
                day.push(record.task_id);
            }
        }

        let completed = completion_dates(records);
        let forecast = Forecaster::new(&session, self.today)
            .including_upcoming(self.include_upcoming)
            .execute(&tasks, &completed);
        let projected = forecast
            .iter()
            .filter_map(|item| match item.placement {
                TaskPlacement::Projected(date) => Some((date, item.task_id)),
                _ => None,
            })
            .collect();

        CourseContext {
            session,
            tasks,
            completed,
            coursework_by_date,
            forecast,
            projected,
        }
    }

    /// First school day on or after `max(today, course start)` not already
    /// consumed by completed work.
    fn due_anchor(&self, context: &CourseContext) -> NaiveDate {
        let session = &context.session;
        let first = session.first_school_day_on_or_after(self.today.max(session.start_date));
        if context.coursework_on(first).is_some() {
            session.next_school_day_after(first)
        } else {
            first
        }
    }

    /// Incomplete task due on `date`: count the forecast's projected
    /// placements through `date` and take the one at `max(count - 1, 0)`
    /// when it lands on `date`.
    fn due_task_on(&self, context: &CourseContext, date: NaiveDate) -> Option<TaskId> {
        if !context.session.is_school_day(date) {
            return None;
        }
        let count = context
            .projected
            .iter()
            .take_while(|(projected, _)| *projected <= date)
            .count();
        match context.projected.get(count.saturating_sub(1)) {
            Some((projected, task_id)) if *projected == date => Some(*task_id),
            _ => None,
        }
    }

    /// The single day a weekly view shows due work on: the first projected
    /// placement not already showing coursework, or the due anchor once
    /// every task is complete.
    fn next_actionable_day(&self, context: &CourseContext) -> Option<NaiveDate> {
        let first_open = context
            .projected
            .iter()
            .map(|(date, _)| *date)
            .find(|date| context.coursework_on(*date).is_none());
        match first_open {
            Some(date) => Some(date),
            None if context.is_caught_up() => Some(self.due_anchor(context)),
            None => None,
        }
    }

    fn scheduled_entry(&self, context: &CourseContext, date: NaiveDate) -> DayEntry {
        match self.due_task_on(context, date) {
            Some(task_id) => DayEntry::Due { task_id },
            None if date >= self.today => DayEntry::NoTask,
            None => DayEntry::NoActivity,
        }
    }

    pub fn daily(&self, student: &Student, date: NaiveDate) -> DaySchedule {
        let mut courses = Vec::new();
        for course in self.school_year.courses_for(student) {
            let context = self.context(student, course);
            let entry = if let Some(task_ids) = context.coursework_on(date) {
                DayEntry::Coursework {
                    task_ids: task_ids.clone(),
                }
            } else if context.session.is_school_day(date) {
                self.scheduled_entry(&context, date)
            } else {
                continue;
            };
            courses.push(CourseDay {
                course_id: course.id,
                entry,
            });
        }

        DaySchedule {
            student_id: student.id,
            date,
            courses,
        }
    }

    pub fn daily_for_students(&self, students: &[Student], date: NaiveDate) -> Vec<DaySchedule> {
        students
            .iter()
            .map(|student| self.daily(student, date))
            .collect()
    }

    pub fn weekly(&self, student: &Student, week: Week) -> WeekSchedule {
        let mut courses = Vec::new();
        for course in self.school_year.courses_for(student) {
            let context = self.context(student, course);
            let days = week
                .dates()
                .into_iter()
                .map(|date| DatedEntry {
                    date,
                    entry: self.week_entry(&context, date),
                })
                .collect();
            courses.push(CourseWeek {
                course_id: course.id,
                days,
            });
        }

        WeekSchedule {
            student_id: student.id,
            week,
            courses,
        }
    }

    /// Coursework on any day; due work only on the next actionable day.
    fn week_entry(&self, context: &CourseContext, date: NaiveDate) -> DayEntry {
        let session = &context.session;
        if let Some(task_ids) = context.coursework_on(date) {
            return DayEntry::Coursework {
                task_ids: task_ids.clone(),
            };
        }
        if session.contains(date) && session.runs_on(date) {
            if let Some(date_kind) = session.break_date_kind(date) {
                return DayEntry::Break { date_kind };
            }
            if self.next_actionable_day(context) == Some(date) {
                return self.scheduled_entry(context, date);
            }
        }
        DayEntry::NoActivity
    }

    pub fn forecast(&self, student: &Student, course_id: CourseId) -> Forecast {
        let Some(course) = self
            .school_year
            .course(course_id)
            .filter(|_| student.is_enrolled_in(course_id))
        else {
            return Forecast::default();
        };
        self.context(student, course).forecast
    }

    pub fn last_forecast_date(&self, student: &Student, course_id: CourseId) -> Option<NaiveDate> {
        self.forecast(student, course_id).last_forecast_date()
    }

    pub fn progress(&self, student: &Student) -> Vec<CourseProgress> {
        self.school_year
            .courses_for(student)
            .map(|course| {
                let context = self.context(student, course);
                let forecast = &context.forecast;
                let total_tasks = context.tasks.len();
                let completed_tasks = forecast.completed_count();
                let graded: Vec<&Task> = context.tasks.iter().filter(|task| task.is_graded).collect();
                let completed_graded_tasks = graded
                    .iter()
                    .filter(|task| context.completed.contains_key(&task.id))
                    .count();
                let percent_complete = if total_tasks == 0 {
                    0.0
                } else {
                    completed_tasks as f64 * 100.0 / total_tasks as f64
                };
                CourseProgress {
                    course_id: course.id,
                    total_tasks,
                    completed_tasks,
                    graded_tasks: graded.len(),
                    completed_graded_tasks,
                    percent_complete,
                    projected_finish: forecast.last_forecast_date(),
                }
            })
            .collect()
    }

    /// Attendance over the school year through `min(range_end, today)`.
    /// Only completions of tasks in the year's courses count.
    pub fn attendance(&self, student: &Student, range_end: NaiveDate) -> AttendanceLedger {
        let completed_on = self
            .completions
            .iter()
            .filter(|record| {
                record.student_id == student.id && self.school_year.has_task(record.task_id)
            })
            .map(|record| record.completed_date);
        build_attendance_ledger(&self.school_year.session(), completed_on, range_end, self.today)
    }
}

/// The running days of `week` for a session, with break markers.
pub fn build_week_dates(session: &Session, week: &Week) -> Vec<WeekDate> {
    session.week_dates(week)
}

pub fn build_daily_schedule(
    school_year: &SchoolYear,
    student: &Student,
    completions: &[CompletionRecord],
    date: NaiveDate,
    today: NaiveDate,
) -> DaySchedule {
    ScheduleBuilder::new(school_year, completions, today).daily(student, date)
}

pub fn build_weekly_schedule(
    school_year: &SchoolYear,
    student: &Student,
    completions: &[CompletionRecord],
    week: Week,
    today: NaiveDate,
) -> WeekSchedule {
    ScheduleBuilder::new(school_year, completions, today).weekly(student, week)
}
