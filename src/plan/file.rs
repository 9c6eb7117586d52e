use super::{PlanError, PlanResult, SchoolPlan};
use crate::calculations::attendance::AttendanceLedger;
use crate::task::{CompletionRecord, StudentId, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &SchoolPlan, path: P) -> PlanResult<()> {
    super::validate_plan(plan)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, plan)?;
    Ok(())
}

/// Loads and validates a plan. Courses come back with tasks sorted by
/// `order`.
pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> PlanResult<SchoolPlan> {
    let file = File::open(path)?;
    let mut plan: SchoolPlan = serde_json::from_reader(file)?;
    super::validate_plan(&plan)?;
    for course in &mut plan.school_year.courses {
        course.tasks.sort_by_key(|task| task.order);
    }
    tracing::debug!(
        courses = plan.school_year.courses.len(),
        students = plan.students.len(),
        completions = plan.completions.len(),
        "plan loaded"
    );
    Ok(plan)
}

#[derive(Serialize, Deserialize)]
struct CompletionCsvRecord {
    student_id: StudentId,
    task_id: TaskId,
    completed_date: String,
}

impl From<&CompletionRecord> for CompletionCsvRecord {
    fn from(record: &CompletionRecord) -> Self {
        Self {
            student_id: record.student_id,
            task_id: record.task_id,
            completed_date: format_date(record.completed_date),
        }
    }
}

impl CompletionCsvRecord {
    fn into_record(self) -> PlanResult<CompletionRecord> {
        let completed_date = parse_date(&self.completed_date)?;
        Ok(CompletionRecord::new(
            self.student_id,
            self.task_id,
            completed_date,
        ))
    }
}

#[derive(Serialize)]
struct AttendanceCsvRecord {
    date: String,
    is_school_day: bool,
    is_break: bool,
    attended: bool,
}

pub fn save_completions_to_csv<P: AsRef<Path>>(
    records: &[CompletionRecord],
    path: P,
) -> PlanResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(CompletionCsvRecord::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_completions_from_csv<P: AsRef<Path>>(path: P) -> PlanResult<Vec<CompletionRecord>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize::<CompletionCsvRecord>() {
        records.push(row?.into_record()?);
    }
    Ok(records)
}

pub fn save_attendance_to_csv<P: AsRef<Path>>(
    ledger: &AttendanceLedger,
    path: P,
) -> PlanResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in &ledger.entries {
        writer.serialize(AttendanceCsvRecord {
            date: format_date(entry.date),
            is_school_day: entry.is_school_day,
            is_break: entry.is_break,
            attended: entry.attended,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> PlanResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PlanError::InvalidData(format!("invalid date '{input}': {e}")))
}
