use crate::days_of_week::DaysOfWeek;
use crate::session::{SchoolBreak, Session};
use crate::task::{CourseId, StudentId, Task, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub days_of_week: DaysOfWeek,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Course {
    pub fn new(id: CourseId, name: impl Into<String>, days_of_week: DaysOfWeek) -> Self {
        Self {
            id,
            name: name.into(),
            days_of_week,
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks<I>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = Task>,
    {
        self.tasks.extend(tasks);
        self
    }

    /// Tasks sorted by their `order`.
    pub fn ordered_tasks(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by_key(|task| task.order);
        tasks
    }

    pub fn has_task(&self, task_id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == task_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Enrollment scope such as a grade level; selects scoped tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default)]
    pub course_ids: Vec<CourseId>,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            scope: None,
            course_ids: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn enroll(mut self, course_id: CourseId) -> Self {
        if !self.course_ids.contains(&course_id) {
            self.course_ids.push(course_id);
        }
        self
    }

    pub fn is_enrolled_in(&self, course_id: CourseId) -> bool {
        self.course_ids.contains(&course_id)
    }

    /// The course's ordered tasks that apply to this student's scope.
    pub fn tasks_for(&self, course: &Course) -> Vec<Task> {
        course
            .ordered_tasks()
            .into_iter()
            .filter(|task| task.applies_to(self.scope.as_deref()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolYear {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_week: DaysOfWeek,
    #[serde(default)]
    pub breaks: Vec<SchoolBreak>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl SchoolYear {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, days_of_week: DaysOfWeek) -> Self {
        Self {
            start_date,
            end_date,
            days_of_week,
            breaks: Vec::new(),
            courses: Vec::new(),
        }
    }

    pub fn with_break(mut self, school_break: SchoolBreak) -> Self {
        self.breaks.push(school_break);
        self
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn session(&self) -> Session {
        Session::new(self.start_date, self.end_date, self.days_of_week)
            .with_breaks(self.breaks.iter().cloned())
    }

    /// The year's dates and breaks on the course's weekly pattern.
    pub fn course_session(&self, course: &Course) -> Session {
        Session::new(self.start_date, self.end_date, course.days_of_week)
            .with_breaks(self.breaks.iter().cloned())
    }

    /// Whether any course of the year carries `task_id`.
    pub fn has_task(&self, task_id: TaskId) -> bool {
        self.courses.iter().any(|course| course.has_task(task_id))
    }

    pub fn course(&self, course_id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == course_id)
    }

    /// Enrolled courses in the order the student lists them; unknown ids
    /// are skipped.
    pub fn courses_for<'a>(&'a self, student: &'a Student) -> impl Iterator<Item = &'a Course> + 'a {
        student
            .course_ids
            .iter()
            .filter_map(move |course_id| self.course(*course_id))
    }
}
