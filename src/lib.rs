pub mod calculations;
pub mod days_of_week;
pub mod plan;
pub(crate) mod plan_validation;
pub mod report;
pub mod schedule;
pub mod school;
pub mod session;
pub mod task;
pub mod week;

pub use calculations::attendance::{AttendanceEntry, AttendanceLedger, build_attendance_ledger};
pub use calculations::forecast::{
    Forecast, Forecaster, TaskForecast, TaskPlacement, forecast_tasks, last_forecast_date,
};
pub use days_of_week::{DaysOfWeek, DaysOfWeekError};
pub use plan::{
    PlanError, PlanResult, SchoolPlan, load_completions_from_csv, load_plan_from_json,
    save_attendance_to_csv, save_completions_to_csv, save_plan_to_json, validate_plan,
};
pub use schedule::{
    CourseDay, CourseProgress, CourseWeek, DatedEntry, DayEntry, DaySchedule, ScheduleBuilder,
    WeekSchedule, build_daily_schedule, build_week_dates, build_weekly_schedule,
};
pub use school::{Course, SchoolYear, Student};
pub use session::{BreakDateKind, SchoolBreak, Session, WeekDate};
pub use task::{CompletionRecord, CourseId, StudentId, Task, TaskId, completion_dates};
pub use week::Week;
