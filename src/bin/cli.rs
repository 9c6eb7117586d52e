use chrono::NaiveDate;
use homeschool_schedule::{
    DaysOfWeek, SchoolPlan, Student, Week, load_completions_from_csv, load_plan_from_json,
    report, save_attendance_to_csv, save_completions_to_csv, save_plan_to_json,
};
use polars::prelude::{AnyValue, DataFrame, PolarsResult};
use std::io::{self, Write};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => format!("{v:.1}"),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Date(days) => NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
            .map(|d| d.to_string())
            .unwrap_or_default(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, s) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(s);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(s.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(col_names.as_slice()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row.as_slice()));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_frame(frame: PolarsResult<DataFrame>) {
    match frame {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Report error: {}", e),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                                   Show this help\n  load <json_path>                       Load a school plan\n  save <json_path>                       Save the current plan\n  completions <csv_path>                 Import completion records\n  export completions <csv_path>          Export completion records\n  export attendance <student> <csv_path> Export a student's attendance ledger\n  today [YYYY-MM-DD]                     Show or set today's date\n  show                                   Summarize the plan\n  day <student> [YYYY-MM-DD]             Daily schedule (defaults to today)\n  week <student> [YYYY-MM-DD]            Weekly schedule for the week containing the date\n  forecast <student> <course>            Task forecast for a course\n  attendance <student> [YYYY-MM-DD]      Attendance through the date (defaults to year end)\n  progress <student>                     Course progress summary\n  days <mask>                            Describe a days-of-week mask\n  quit|exit                              Exit"
    );
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn initial_today() -> NaiveDate {
    std::env::var("HOMESCHOOL_TODAY")
        .ok()
        .and_then(|value| parse_date(value.trim()))
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}

fn require_plan(plan: &Option<SchoolPlan>) -> Option<&SchoolPlan> {
    if plan.is_none() {
        println!("No plan loaded. Use 'load <json_path>'.");
    }
    plan.as_ref()
}

fn find_student<'a>(plan: &'a SchoolPlan, id_s: Option<&str>) -> Option<&'a Student> {
    let Some(id_s) = id_s else {
        println!("Missing student id");
        return None;
    };
    let Ok(id) = id_s.parse::<i32>() else {
        println!("Invalid student id");
        return None;
    };
    let student = plan.student(id);
    if student.is_none() {
        println!("Student {id} not found.");
    }
    student
}

fn optional_date(date_s: Option<&str>, default: NaiveDate) -> Option<NaiveDate> {
    match date_s {
        None => Some(default),
        Some(s) => {
            let parsed = parse_date(s);
            if parsed.is_none() {
                println!("Invalid date (YYYY-MM-DD)");
            }
            parsed
        }
    }
}

fn print_plan(plan: &SchoolPlan, today: NaiveDate) {
    let year = &plan.school_year;
    println!("Today              : {}", today);
    println!("School year        : {} to {}", year.start_date, year.end_date);
    println!(
        "Runs on            : {} ({})",
        year.days_of_week.describe(),
        year.days_of_week.abbreviation()
    );
    for school_break in &year.breaks {
        println!(
            "Break              : {} to {} {}",
            school_break.start_date,
            school_break.end_date,
            school_break.description.as_deref().unwrap_or("")
        );
    }
    for course in &year.courses {
        println!(
            "Course {:<4}        : {} [{}] {} tasks",
            course.id,
            course.name,
            course.days_of_week.abbreviation(),
            course.tasks.len()
        );
    }
    for student in &plan.students {
        println!(
            "Student {:<4}       : {} courses={:?}",
            student.id, student.name, student.course_ids
        );
    }
    println!("Completion records : {}", plan.completions.len());
}

fn main() {
    init_tracing();

    let mut plan: Option<SchoolPlan> = None;
    let mut today = initial_today();

    println!("Homeschool Schedule (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "load" => match parts.next() {
                Some(path) => match load_plan_from_json(path) {
                    Ok(loaded) => {
                        println!("Plan loaded from {}", path);
                        plan = Some(loaded);
                    }
                    Err(e) => println!("Error loading plan: {}", e),
                },
                None => println!("Usage: load <json_path>"),
            },
            "save" => match (require_plan(&plan), parts.next()) {
                (Some(current), Some(path)) => match save_plan_to_json(current, path) {
                    Ok(()) => println!("Plan saved to {}", path),
                    Err(e) => println!("Error saving plan: {}", e),
                },
                (Some(_), None) => println!("Usage: save <json_path>"),
                _ => {}
            },
            "completions" => match (plan.as_mut(), parts.next()) {
                (Some(current), Some(path)) => match load_completions_from_csv(path) {
                    Ok(records) => {
                        let added = current.add_completions(records);
                        println!("Imported {added} completion records.");
                    }
                    Err(e) => println!("Error importing completions: {}", e),
                },
                (None, _) => println!("No plan loaded. Use 'load <json_path>'."),
                (Some(_), None) => println!("Usage: completions <csv_path>"),
            },
            "export" => {
                let Some(current) = require_plan(&plan) else {
                    continue;
                };
                match parts.next() {
                    Some("completions") => match parts.next() {
                        Some(path) => match save_completions_to_csv(&current.completions, path) {
                            Ok(()) => println!("Completions exported to {}", path),
                            Err(e) => println!("Error exporting completions: {}", e),
                        },
                        None => println!("Usage: export completions <csv_path>"),
                    },
                    Some("attendance") => {
                        let Some(student) = find_student(current, parts.next()) else {
                            continue;
                        };
                        let Some(path) = parts.next() else {
                            println!("Usage: export attendance <student> <csv_path>");
                            continue;
                        };
                        let ledger = current
                            .builder(today)
                            .attendance(student, current.school_year.end_date);
                        match save_attendance_to_csv(&ledger, path) {
                            Ok(()) => println!("Attendance exported to {}", path),
                            Err(e) => println!("Error exporting attendance: {}", e),
                        }
                    }
                    _ => println!("Usage: export <completions|attendance> ..."),
                }
            }
            "today" => match parts.next() {
                Some(date_s) => match parse_date(date_s) {
                    Some(date) => {
                        today = date;
                        println!("Today set to {}", today);
                    }
                    None => println!("Invalid date (YYYY-MM-DD)"),
                },
                None => println!("Today is {}", today),
            },
            "show" => {
                if let Some(current) = require_plan(&plan) {
                    print_plan(current, today);
                }
            }
            "day" => {
                let Some(current) = require_plan(&plan) else {
                    continue;
                };
                let Some(student) = find_student(current, parts.next()) else {
                    continue;
                };
                let Some(date) = optional_date(parts.next(), today) else {
                    continue;
                };
                let schedule = current.builder(today).daily(student, date);
                println!("Schedule for {} on {}", student.name, date);
                print_frame(report::day_frame(&schedule));
            }
            "week" => {
                let Some(current) = require_plan(&plan) else {
                    continue;
                };
                let Some(student) = find_student(current, parts.next()) else {
                    continue;
                };
                let Some(date) = optional_date(parts.next(), today) else {
                    continue;
                };
                let week = Week::containing(date);
                let schedule = current.builder(today).weekly(student, week);
                println!(
                    "Week of {} to {} for {}",
                    week.first_day(),
                    week.last_day(),
                    student.name
                );
                print_frame(report::week_frame(&schedule));
            }
            "forecast" => {
                let Some(current) = require_plan(&plan) else {
                    continue;
                };
                let Some(student) = find_student(current, parts.next()) else {
                    continue;
                };
                let Some(course) = parts
                    .next()
                    .and_then(|s| s.parse::<i32>().ok())
                    .and_then(|id| current.school_year.course(id))
                else {
                    println!("Usage: forecast <student> <course>");
                    continue;
                };
                let builder = current.builder(today);
                let forecast = builder.forecast(student, course.id);
                match forecast.last_forecast_date() {
                    Some(date) => println!("{}: last forecast date {}", course.name, date),
                    None => println!("{}: no forecast date", course.name),
                }
                print_frame(report::forecast_frame(&forecast, &course.tasks));
            }
            "attendance" => {
                let Some(current) = require_plan(&plan) else {
                    continue;
                };
                let Some(student) = find_student(current, parts.next()) else {
                    continue;
                };
                let Some(range_end) = optional_date(parts.next(), current.school_year.end_date)
                else {
                    continue;
                };
                let ledger = current.builder(today).attendance(student, range_end);
                println!(
                    "Attended {} of {} school days ({} break days)",
                    ledger.attended_days(),
                    ledger.school_days(),
                    ledger.break_days()
                );
                print_frame(report::attendance_frame(&ledger));
            }
            "progress" => {
                let Some(current) = require_plan(&plan) else {
                    continue;
                };
                let Some(student) = find_student(current, parts.next()) else {
                    continue;
                };
                let progress = current.builder(today).progress(student);
                print_frame(report::progress_frame(&progress));
            }
            "days" => match parts.next().map(|s| s.parse::<u8>()) {
                Some(Ok(bits)) => match DaysOfWeek::from_bits(bits) {
                    Ok(days) => println!("{} ({})", days.describe(), days.abbreviation()),
                    Err(e) => println!("Error: {}", e),
                },
                Some(Err(_)) => println!("Invalid mask"),
                None => println!("Usage: days <mask>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
