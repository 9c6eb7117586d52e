use chrono::NaiveDate;
use homeschool_schedule::{
    CompletionRecord, Course, DaysOfWeek, PlanError, SchoolBreak, SchoolPlan, SchoolYear, Student,
    Task, load_completions_from_csv, load_plan_from_json, save_attendance_to_csv,
    save_completions_to_csv, save_plan_to_json, validate_plan,
};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn mwf() -> DaysOfWeek {
    DaysOfWeek::MONDAY | DaysOfWeek::WEDNESDAY | DaysOfWeek::FRIDAY
}

fn build_sample_plan() -> SchoolPlan {
    let year = SchoolYear::new(d(2021, 3, 1), d(2021, 5, 28), mwf())
        .with_break(SchoolBreak::new(d(2021, 3, 15), d(2021, 3, 19)).with_description("Spring"))
        .with_course(Course::new(1, "Math", mwf()).with_tasks([
            Task::new(101, 1, "Place value"),
            Task::new(102, 2, "Addition"),
            Task::new(103, 3, "Unit test").graded(),
        ]))
        .with_course(
            Course::new(2, "Art", DaysOfWeek::FRIDAY)
                .with_tasks([Task::new(201, 1, "Colour wheel").for_scope("grade5")]),
        );

    let mut plan = SchoolPlan::new(year);
    plan.students.push(Student::new(1, "Ada").enroll(1).enroll(2));
    plan.students.push(Student::new(2, "Lin").with_scope("grade5").enroll(2));
    plan.add_completions([
        CompletionRecord::new(1, 101, d(2021, 3, 8)),
        CompletionRecord::new(2, 201, d(2021, 3, 12)),
    ]);
    plan
}

fn invalid_data(result: Result<(), PlanError>) -> String {
    match result {
        Err(PlanError::InvalidData(message)) => message,
        other => panic!("expected invalid data, got {other:?}"),
    }
}

#[test]
fn json_round_trip_preserves_plan() {
    let plan = build_sample_plan();
    let file = NamedTempFile::new().unwrap();
    save_plan_to_json(&plan, file.path()).unwrap();

    let loaded = load_plan_from_json(file.path()).unwrap();
    assert_eq!(loaded, plan);

    let raw = fs::read_to_string(file.path()).unwrap();
    assert!(raw.contains("\"days_of_week\": 42"));
    assert!(raw.contains("\"start_date\": \"2021-03-01\""));
    assert!(raw.contains("\"owner_scope\": \"grade5\""));
}

#[test]
fn load_sorts_tasks_by_order() {
    let mut plan = build_sample_plan();
    plan.school_year.courses[0].tasks.reverse();
    let file = NamedTempFile::new().unwrap();
    save_plan_to_json(&plan, file.path()).unwrap();

    let loaded = load_plan_from_json(file.path()).unwrap();
    let ids: Vec<i32> = loaded.school_year.courses[0]
        .tasks
        .iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(ids, vec![101, 102, 103]);
}

#[test]
fn load_accepts_minimal_hand_written_plan() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "school_year": {{
                "start_date": "2021-08-30",
                "end_date": "2022-05-27",
                "days_of_week": 62,
                "courses": [
                    {{ "id": 7, "name": "History", "days_of_week": 20,
                       "tasks": [ {{ "id": 1, "order": 1 }} ] }}
                ]
            }},
            "students": [ {{ "id": 1, "name": "Ada", "course_ids": [7] }} ]
        }}"#
    )
    .unwrap();

    let plan = load_plan_from_json(file.path()).unwrap();
    assert!(plan.completions.is_empty());
    assert!(plan.school_year.breaks.is_empty());
    let course = plan.school_year.course(7).unwrap();
    assert_eq!(course.days_of_week.abbreviation(), "TR");
    assert!(!course.tasks[0].is_graded);
    assert_eq!(plan.student(1).map(|s| s.name.as_str()), Some("Ada"));
}

#[test]
fn load_rejects_out_of_range_day_mask() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "school_year": {{ "start_date": "2021-08-30", "end_date": "2022-05-27",
              "days_of_week": 200 }} }}"#
    )
    .unwrap();
    assert!(matches!(
        load_plan_from_json(file.path()),
        Err(PlanError::Serialization(_))
    ));
}

#[test]
fn save_refuses_invalid_plans() {
    let mut plan = build_sample_plan();
    plan.school_year.end_date = d(2021, 2, 1);
    let file = NamedTempFile::new().unwrap();
    let err = save_plan_to_json(&plan, file.path()).unwrap_err();
    assert!(matches!(err, PlanError::InvalidData(_)));
    assert!(err.to_string().starts_with("invalid data:"));
}

#[test]
fn validation_rejects_bad_breaks() {
    let mut plan = build_sample_plan();
    plan.school_year.breaks.push(SchoolBreak::new(d(2021, 3, 18), d(2021, 3, 22)));
    assert!(invalid_data(validate_plan(&plan)).contains("overlap"));

    let mut plan = build_sample_plan();
    plan.school_year.breaks.push(SchoolBreak::new(d(2021, 6, 1), d(2021, 6, 4)));
    assert!(invalid_data(validate_plan(&plan)).contains("outside the school year"));

    let mut plan = build_sample_plan();
    plan.school_year.breaks.push(SchoolBreak::new(d(2021, 4, 9), d(2021, 4, 5)));
    assert!(invalid_data(validate_plan(&plan)).contains("ends before it starts"));
}

#[test]
fn validation_rejects_bad_courses() {
    let mut plan = build_sample_plan();
    plan.school_year.courses[1].days_of_week = DaysOfWeek::TUESDAY;
    assert!(invalid_data(validate_plan(&plan)).contains("runs on T"));

    let mut plan = build_sample_plan();
    plan.school_year.courses[1].id = 1;
    assert!(invalid_data(validate_plan(&plan)).contains("duplicate course id 1"));

    let mut plan = build_sample_plan();
    plan.school_year.courses[1].tasks.push(Task::new(101, 2, "Clash"));
    assert!(invalid_data(validate_plan(&plan)).contains("duplicate task id 101"));

    let mut plan = build_sample_plan();
    plan.school_year.courses[0].tasks.push(Task::new(104, 2, "Same slot"));
    assert!(invalid_data(validate_plan(&plan)).contains("order 2"));
}

#[test]
fn validation_rejects_bad_students() {
    let mut plan = build_sample_plan();
    plan.students.push(Student::new(1, "Twin"));
    assert!(invalid_data(validate_plan(&plan)).contains("duplicate student id 1"));

    let mut plan = build_sample_plan();
    plan.students[0] = Student::new(1, "Ada").enroll(9);
    assert!(invalid_data(validate_plan(&plan)).contains("unknown course 9"));

    assert!(validate_plan(&build_sample_plan()).is_ok());
}

#[test]
fn add_completions_skips_records_already_present() {
    let mut plan = build_sample_plan();
    let added = plan.add_completions([
        CompletionRecord::new(1, 101, d(2021, 3, 8)),
        CompletionRecord::new(1, 102, d(2021, 3, 10)),
    ]);
    assert_eq!(added, 1);
    assert_eq!(plan.completions.len(), 3);
    assert_eq!(plan.completions_for(1).len(), 2);
    assert_eq!(plan.completions_for(2).len(), 1);
}

#[test]
fn completions_csv_round_trip() {
    let plan = build_sample_plan();
    let file = NamedTempFile::new().unwrap();
    save_completions_to_csv(&plan.completions, file.path()).unwrap();

    let raw = fs::read_to_string(file.path()).unwrap();
    let mut lines = raw.lines();
    assert_eq!(lines.next(), Some("student_id,task_id,completed_date"));
    assert_eq!(lines.next(), Some("1,101,2021-03-08"));

    let loaded = load_completions_from_csv(file.path()).unwrap();
    assert_eq!(loaded, plan.completions);
}

#[test]
fn completions_csv_rejects_bad_dates() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "student_id,task_id,completed_date").unwrap();
    writeln!(file, "1,101,2021-13-40").unwrap();

    match load_completions_from_csv(file.path()) {
        Err(PlanError::InvalidData(message)) => {
            assert!(message.contains("invalid date '2021-13-40'"))
        }
        other => panic!("expected invalid date, got {other:?}"),
    }
}

#[test]
fn completions_csv_rejects_bad_rows() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "student_id,task_id,completed_date").unwrap();
    writeln!(file, "one,101,2021-03-08").unwrap();
    assert!(matches!(
        load_completions_from_csv(file.path()),
        Err(PlanError::Csv(_))
    ));
}

#[test]
fn missing_files_surface_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(load_plan_from_json(&missing), Err(PlanError::Io(_))));
}

#[test]
fn attendance_csv_lists_every_day() {
    let plan = build_sample_plan();
    let student = plan.student(1).unwrap();
    let ledger = plan.builder(d(2021, 3, 8)).attendance(student, d(2021, 5, 28));
    let file = NamedTempFile::new().unwrap();
    save_attendance_to_csv(&ledger, file.path()).unwrap();

    let raw = fs::read_to_string(file.path()).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines[0], "date,is_school_day,is_break,attended");
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[1], "2021-03-01,true,false,false");
    assert_eq!(lines[2], "2021-03-02,false,false,false");
    assert_eq!(lines[8], "2021-03-08,true,false,true");
}
