use chrono::{Datelike, NaiveDate, Weekday};
use homeschool_schedule::Week;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn week_runs_sunday_through_saturday() {
    // 2021-03-10 is a Wednesday
    let week = Week::containing(d(2021, 3, 10));
    assert_eq!(week.first_day(), d(2021, 3, 7));
    assert_eq!(week.last_day(), d(2021, 3, 13));
    assert_eq!(week.first_day().weekday(), Weekday::Sun);
    assert_eq!(week.last_day().weekday(), Weekday::Sat);
}

#[test]
fn week_boundaries_belong_to_their_own_week() {
    assert_eq!(Week::containing(d(2021, 3, 7)).first_day(), d(2021, 3, 7));
    assert_eq!(Week::containing(d(2021, 3, 13)).first_day(), d(2021, 3, 7));
    assert_eq!(Week::containing(d(2021, 3, 14)).first_day(), d(2021, 3, 14));
}

#[test]
fn week_spans_year_boundary() {
    // 2021-01-01 is a Friday
    let week = Week::containing(d(2021, 1, 1));
    assert_eq!(week.first_day(), d(2020, 12, 27));
    assert_eq!(week.last_day(), d(2021, 1, 2));
}

#[test]
fn dates_and_navigation() {
    let week = Week::containing(d(2021, 3, 10));
    let dates = week.dates();
    assert_eq!(dates.len(), 7);
    assert_eq!(dates[0], d(2021, 3, 7));
    assert_eq!(dates[6], d(2021, 3, 13));
    assert!(week.contains(d(2021, 3, 9)));
    assert!(!week.contains(d(2021, 3, 14)));

    assert_eq!(week.next().first_day(), d(2021, 3, 14));
    assert_eq!(week.previous().first_day(), d(2021, 2, 28));
    assert_eq!(week.next().previous(), week);
}

#[test]
fn weeks_at_the_calendar_limits_are_clamped() {
    let last = Week::containing(NaiveDate::MAX);
    assert!(last.contains(NaiveDate::MAX));
    assert_eq!(last.last_day(), NaiveDate::MAX);
    assert_eq!(last.next(), last);
    assert!(!last.dates().is_empty() && last.dates().len() <= 7);

    let first = Week::containing(NaiveDate::MIN);
    assert!(first.contains(NaiveDate::MIN));
    assert_eq!(first.first_day(), NaiveDate::MIN);
    assert_eq!(first.previous(), first);
    assert!(!first.dates().is_empty() && first.dates().len() <= 7);
}
