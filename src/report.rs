use crate::calculations::attendance::AttendanceLedger;
use crate::calculations::forecast::Forecast;
use crate::schedule::{CourseProgress, DayEntry, DaySchedule, WeekSchedule};
use crate::task::Task;
use chrono::{Datelike, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;

// 1970-01-01 counted from 0001-01-01 as day 1.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date_to_i32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn date_series(name: &'static str, dates: Vec<Option<i32>>) -> PolarsResult<Column> {
    Ok(Series::new(PlSmallStr::from_static(name), dates)
        .cast(&DataType::Date)?
        .into_column())
}

fn task_ids_label(task_ids: &[i32]) -> String {
    task_ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn entry_task_ids(entry: &DayEntry) -> String {
    match entry {
        DayEntry::Coursework { task_ids } => task_ids_label(task_ids),
        DayEntry::Due { task_id } => task_id.to_string(),
        _ => String::new(),
    }
}

/// One row per task: id, description, status and resolved date.
pub fn forecast_frame(forecast: &Forecast, tasks: &[Task]) -> PolarsResult<DataFrame> {
    let mut ids = Vec::with_capacity(forecast.len());
    let mut descriptions = Vec::with_capacity(forecast.len());
    let mut statuses = Vec::with_capacity(forecast.len());
    let mut dates = Vec::with_capacity(forecast.len());
    for item in forecast.iter() {
        ids.push(item.task_id);
        descriptions.push(
            tasks
                .iter()
                .find(|task| task.id == item.task_id)
                .map(|task| task.description.as_str())
                .unwrap_or(""),
        );
        statuses.push(item.placement.as_str());
        dates.push(item.placement.date().map(date_to_i32));
    }

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("task_id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("description"), descriptions).into_column(),
        Series::new(PlSmallStr::from_static("status"), statuses).into_column(),
        date_series("date", dates)?,
    ])
}

pub fn attendance_frame(ledger: &AttendanceLedger) -> PolarsResult<DataFrame> {
    let dates: Vec<Option<i32>> = ledger
        .entries
        .iter()
        .map(|entry| Some(date_to_i32(entry.date)))
        .collect();
    let school_days: Vec<bool> = ledger.entries.iter().map(|e| e.is_school_day).collect();
    let breaks: Vec<bool> = ledger.entries.iter().map(|e| e.is_break).collect();
    let attended: Vec<bool> = ledger.entries.iter().map(|e| e.attended).collect();

    DataFrame::new(vec![
        date_series("date", dates)?,
        Series::new(PlSmallStr::from_static("is_school_day"), school_days).into_column(),
        Series::new(PlSmallStr::from_static("is_break"), breaks).into_column(),
        Series::new(PlSmallStr::from_static("attended"), attended).into_column(),
    ])
}

pub fn day_frame(schedule: &DaySchedule) -> PolarsResult<DataFrame> {
    let course_ids: Vec<i32> = schedule.courses.iter().map(|c| c.course_id).collect();
    let entries: Vec<&str> = schedule.courses.iter().map(|c| c.entry.as_str()).collect();
    let task_ids: Vec<String> = schedule
        .courses
        .iter()
        .map(|c| entry_task_ids(&c.entry))
        .collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("course_id"), course_ids).into_column(),
        Series::new(PlSmallStr::from_static("entry"), entries).into_column(),
        Series::new(PlSmallStr::from_static("task_ids"), task_ids).into_column(),
    ])
}

/// Long format: one row per course and day of the week.
pub fn week_frame(schedule: &WeekSchedule) -> PolarsResult<DataFrame> {
    let mut course_ids = Vec::new();
    let mut dates = Vec::new();
    let mut entries = Vec::new();
    let mut task_ids = Vec::new();
    for course in &schedule.courses {
        for day in &course.days {
            course_ids.push(course.course_id);
            dates.push(Some(date_to_i32(day.date)));
            entries.push(day.entry.as_str());
            task_ids.push(entry_task_ids(&day.entry));
        }
    }

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("course_id"), course_ids).into_column(),
        date_series("date", dates)?,
        Series::new(PlSmallStr::from_static("entry"), entries).into_column(),
        Series::new(PlSmallStr::from_static("task_ids"), task_ids).into_column(),
    ])
}

pub fn progress_frame(progress: &[CourseProgress]) -> PolarsResult<DataFrame> {
    let course_ids: Vec<i32> = progress.iter().map(|p| p.course_id).collect();
    let totals: Vec<i64> = progress.iter().map(|p| p.total_tasks as i64).collect();
    let completed: Vec<i64> = progress.iter().map(|p| p.completed_tasks as i64).collect();
    let graded: Vec<i64> = progress.iter().map(|p| p.graded_tasks as i64).collect();
    let percent: Vec<f64> = progress.iter().map(|p| p.percent_complete).collect();
    let finish: Vec<Option<i32>> = progress
        .iter()
        .map(|p| p.projected_finish.map(date_to_i32))
        .collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("course_id"), course_ids).into_column(),
        Series::new(PlSmallStr::from_static("total_tasks"), totals).into_column(),
        Series::new(PlSmallStr::from_static("completed_tasks"), completed).into_column(),
        Series::new(PlSmallStr::from_static("graded_tasks"), graded).into_column(),
        Series::new(PlSmallStr::from_static("percent_complete"), percent).into_column(),
        date_series("projected_finish", finish)?,
    ])
}
