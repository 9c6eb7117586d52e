use crate::plan::SchoolPlan;
use crate::school::{Course, SchoolYear};
use crate::task::TaskId;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct PlanValidationError {
    message: String,
}

impl PlanValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PlanValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PlanValidationError {}

pub fn validate_school_year(year: &SchoolYear) -> Result<(), PlanValidationError> {
    if year.start_date > year.end_date {
        return Err(PlanValidationError::new(format!(
            "school year start {} is after its end {}",
            year.start_date, year.end_date
        )));
    }

    let mut breaks: Vec<_> = year.breaks.iter().collect();
    breaks.sort_by_key(|school_break| school_break.start_date);
    for school_break in &breaks {
        if school_break.start_date > school_break.end_date {
            return Err(PlanValidationError::new(format!(
                "break starting {} ends before it starts ({})",
                school_break.start_date, school_break.end_date
            )));
        }
        if school_break.start_date < year.start_date || school_break.end_date > year.end_date {
            return Err(PlanValidationError::new(format!(
                "break {}..{} lies outside the school year {}..{}",
                school_break.start_date, school_break.end_date, year.start_date, year.end_date
            )));
        }
    }
    for pair in breaks.windows(2) {
        if pair[1].start_date <= pair[0].end_date {
            return Err(PlanValidationError::new(format!(
                "breaks {}..{} and {}..{} overlap",
                pair[0].start_date, pair[0].end_date, pair[1].start_date, pair[1].end_date
            )));
        }
    }

    let mut course_ids = HashSet::with_capacity(year.courses.len());
    let mut task_ids = HashSet::new();
    for course in &year.courses {
        if !course_ids.insert(course.id) {
            return Err(PlanValidationError::new(format!(
                "duplicate course id {}",
                course.id
            )));
        }
        if !year.days_of_week.is_superset_of(course.days_of_week) {
            return Err(PlanValidationError::new(format!(
                "course {} runs on {} but the school year only runs on {}",
                course.id,
                course.days_of_week.abbreviation(),
                year.days_of_week.abbreviation()
            )));
        }
        validate_course_tasks(course, &mut task_ids)?;
    }
    Ok(())
}

fn validate_course_tasks(
    course: &Course,
    task_ids: &mut HashSet<TaskId>,
) -> Result<(), PlanValidationError> {
    let mut orders = HashSet::with_capacity(course.tasks.len());
    for task in &course.tasks {
        if !task_ids.insert(task.id) {
            return Err(PlanValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        if !orders.insert(task.order) {
            return Err(PlanValidationError::new(format!(
                "course {} has more than one task with order {}",
                course.id, task.order
            )));
        }
    }
    Ok(())
}

pub fn validate_plan(plan: &SchoolPlan) -> Result<(), PlanValidationError> {
    validate_school_year(&plan.school_year)?;

    let mut student_ids = HashSet::with_capacity(plan.students.len());
    for student in &plan.students {
        if !student_ids.insert(student.id) {
            return Err(PlanValidationError::new(format!(
                "duplicate student id {}",
                student.id
            )));
        }
        for course_id in &student.course_ids {
            if plan.school_year.course(*course_id).is_none() {
                return Err(PlanValidationError::new(format!(
                    "student {} is enrolled in unknown course {}",
                    student.id, course_id
                )));
            }
        }
    }
    Ok(())
}
