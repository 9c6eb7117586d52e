use crate::plan_validation;
use crate::schedule::ScheduleBuilder;
use crate::school::{SchoolYear, Student};
use crate::task::{CompletionRecord, StudentId};
use chrono::NaiveDate;
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PlanError {
    Serialization(SerdeJsonError),
    DataFrame(PolarsError),
    Io(io::Error),
    Csv(csv::Error),
    InvalidData(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Serialization(err) => write!(f, "serialization error: {err}"),
            PlanError::DataFrame(err) => write!(f, "dataframe conversion error: {err}"),
            PlanError::Io(err) => write!(f, "io error: {err}"),
            PlanError::Csv(err) => write!(f, "csv error: {err}"),
            PlanError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<SerdeJsonError> for PlanError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<PolarsError> for PlanError {
    fn from(value: PolarsError) -> Self {
        Self::DataFrame(value)
    }
}

impl From<io::Error> for PlanError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for PlanError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PlanResult<T> = Result<T, PlanError>;

/// Everything the schedule engine needs for one household: the school
/// year with its courses, the students and their completion history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolPlan {
    pub school_year: SchoolYear,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub completions: Vec<CompletionRecord>,
}

impl SchoolPlan {
    pub fn new(school_year: SchoolYear) -> Self {
        Self {
            school_year,
            students: Vec::new(),
            completions: Vec::new(),
        }
    }

    pub fn student(&self, student_id: StudentId) -> Option<&Student> {
        self.students.iter().find(|student| student.id == student_id)
    }

    /// Adds records not already present; returns how many were new.
    pub fn add_completions<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = CompletionRecord>,
    {
        let mut added = 0;
        for record in records {
            if !self.completions.contains(&record) {
                self.completions.push(record);
                added += 1;
            }
        }
        added
    }

    pub fn completions_for(&self, student_id: StudentId) -> Vec<CompletionRecord> {
        self.completions
            .iter()
            .filter(|record| record.student_id == student_id)
            .cloned()
            .collect()
    }

    pub fn builder(&self, today: NaiveDate) -> ScheduleBuilder<'_> {
        ScheduleBuilder::new(&self.school_year, &self.completions, today)
    }
}

pub fn validate_plan(plan: &SchoolPlan) -> PlanResult<()> {
    plan_validation::validate_plan(plan).map_err(|err| {
        tracing::warn!(error = %err, "plan rejected");
        PlanError::InvalidData(err.to_string())
    })
}

pub mod file;

pub use file::{
    load_completions_from_csv, load_plan_from_json, save_attendance_to_csv,
    save_completions_to_csv, save_plan_to_json,
};
