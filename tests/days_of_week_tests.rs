use chrono::{Datelike, Duration, NaiveDate, Weekday};
use homeschool_schedule::{DaysOfWeek, DaysOfWeekError};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn mwf() -> DaysOfWeek {
    DaysOfWeek::MONDAY | DaysOfWeek::WEDNESDAY | DaysOfWeek::FRIDAY
}

#[test]
fn flags_are_independent_powers_of_two() {
    let mut seen = 0u8;
    for weekday in ALL_DAYS {
        let bits = DaysOfWeek::flag(weekday).bits();
        assert_eq!(bits.count_ones(), 1);
        assert_eq!(seen & bits, 0);
        seen |= bits;
    }
    assert_eq!(seen, DaysOfWeek::ALL.bits());
    assert_eq!(mwf().bits(), 42);
}

#[test]
fn runs_on_checks_weekday_of_date() {
    let days = mwf();
    // 2021-03-08 is a Monday
    assert!(days.runs_on(d(2021, 3, 8)));
    assert!(!days.runs_on(d(2021, 3, 9)));
    assert!(days.runs_on(d(2021, 3, 10)));
    assert!(days.runs_on_weekday(Weekday::Fri));
    assert!(!days.runs_on_weekday(Weekday::Sun));
}

#[test]
fn describe_joins_day_names() {
    assert_eq!(mwf().describe(), "Monday, Wednesday, and Friday");
    assert_eq!(
        (DaysOfWeek::MONDAY | DaysOfWeek::WEDNESDAY).describe(),
        "Monday and Wednesday"
    );
    assert_eq!(DaysOfWeek::THURSDAY.describe(), "Thursday");
    assert_eq!(DaysOfWeek::NONE.describe(), "");
    assert_eq!(
        (DaysOfWeek::SUNDAY | DaysOfWeek::SATURDAY).to_string(),
        "Sunday and Saturday"
    );
}

#[test]
fn describe_is_empty_only_for_zero_mask() {
    for bits in 0..=127u8 {
        let days = DaysOfWeek::from_bits(bits).unwrap();
        assert_eq!(days.describe().is_empty(), bits == 0, "mask {bits}");
    }
}

#[test]
fn abbreviation_uses_day_codes() {
    assert_eq!(mwf().abbreviation(), "MWF");
    assert_eq!(
        (DaysOfWeek::TUESDAY | DaysOfWeek::THURSDAY).abbreviation(),
        "TR"
    );
    assert_eq!(DaysOfWeek::ALL.abbreviation(), "SuMTWRFSa");
    assert_eq!(DaysOfWeek::NONE.abbreviation(), "Not Running");
}

#[test]
fn next_running_day_is_strictly_later_and_running() {
    let start = d(2021, 3, 1);
    for bits in 1..=127u8 {
        let days = DaysOfWeek::from_bits(bits).unwrap();
        for offset in 0..7 {
            let date = start + Duration::days(offset);
            let next = days.next_running_day_after(date);
            assert!(next > date, "mask {bits} from {date}");
            assert!(next - date <= Duration::days(7));
            assert!(days.runs_on(next));

            let previous = days.previous_running_day_before(date);
            assert!(previous < date);
            assert!(days.runs_on(previous));
        }
    }
}

#[test]
fn stepping_a_full_cycle_lands_on_the_same_weekday() {
    let monday = d(2021, 3, 8);
    let mut date = monday;
    for _ in 0..7 {
        date = DaysOfWeek::MONDAY.next_running_day_after(date);
    }
    assert_eq!(date.weekday(), Weekday::Mon);
    assert_eq!(date, monday + Duration::days(49));

    let mut date = monday;
    for _ in 0..7 {
        date = DaysOfWeek::ALL.next_running_day_after(date);
    }
    assert_eq!(date, monday + Duration::days(7));

    // one step per running day covers exactly one week
    let days = mwf();
    let mut date = monday;
    for _ in 0..days.count() {
        date = days.next_running_day_after(date);
    }
    assert_eq!(date, monday + Duration::days(7));
}

#[test]
fn zero_mask_returns_input_date() {
    let date = d(2021, 3, 10);
    let none = DaysOfWeek::NONE;
    assert_eq!(none.next_running_day_after(date), date);
    assert_eq!(none.previous_running_day_before(date), date);
    assert_eq!(none.last_running_day_on_or_before(date), date);
    assert!(none.running_dates_within(d(2021, 3, 7), d(2021, 3, 13)).is_empty());
}

#[test]
fn previous_and_last_running_day() {
    let days = mwf();
    assert_eq!(days.previous_running_day_before(d(2021, 3, 8)), d(2021, 3, 5));
    assert_eq!(days.last_running_day_on_or_before(d(2021, 3, 10)), d(2021, 3, 10));
    // Saturday falls back to Friday
    assert_eq!(days.last_running_day_on_or_before(d(2021, 3, 13)), d(2021, 3, 12));
}

#[test]
fn running_dates_within_week() {
    let dates = mwf().running_dates_within(d(2021, 3, 7), d(2021, 3, 13));
    assert_eq!(dates, vec![d(2021, 3, 8), d(2021, 3, 10), d(2021, 3, 12)]);
}

#[test]
fn superset_matches_bitwise_definition() {
    for a in 0..=127u8 {
        let days_a = DaysOfWeek::from_bits(a).unwrap();
        assert!(days_a.is_superset_of(days_a));
        for b in 0..=127u8 {
            let days_b = DaysOfWeek::from_bits(b).unwrap();
            assert_eq!(days_a.is_superset_of(days_b), a & b == b);
        }
    }
    assert!(DaysOfWeek::ALL.is_superset_of(mwf()));
    assert!(!mwf().is_superset_of(DaysOfWeek::TUESDAY));
}

#[test]
fn weekday_sets_round_trip_through_mask() {
    for bits in 0..=127u8 {
        let original: Vec<Weekday> = ALL_DAYS
            .iter()
            .copied()
            .filter(|weekday| bits & (1 << weekday.num_days_from_sunday()) != 0)
            .collect();
        let days = DaysOfWeek::from_weekdays(original.clone());
        assert_eq!(days.bits(), bits);
        assert_eq!(days.weekdays(), original);
        for weekday in ALL_DAYS {
            assert_eq!(days.runs_on_weekday(weekday), original.contains(&weekday));
        }
    }
}

#[test]
fn masks_above_seven_bits_are_rejected() {
    assert_eq!(
        DaysOfWeek::from_bits(128),
        Err(DaysOfWeekError::OutOfRange(128))
    );
    assert!(DaysOfWeek::try_from(127u8).is_ok());
}

#[test]
fn serializes_as_integer_mask() {
    let json = serde_json::to_string(&mwf()).unwrap();
    assert_eq!(json, "42");
    let parsed: DaysOfWeek = serde_json::from_str("42").unwrap();
    assert_eq!(parsed, mwf());
    assert!(serde_json::from_str::<DaysOfWeek>("200").is_err());
}

#[test]
fn stepping_at_the_calendar_limits_returns_the_input() {
    assert_eq!(
        DaysOfWeek::ALL.next_running_day_after(NaiveDate::MAX),
        NaiveDate::MAX
    );
    assert_eq!(
        DaysOfWeek::ALL.previous_running_day_before(NaiveDate::MIN),
        NaiveDate::MIN
    );
    assert_eq!(
        DaysOfWeek::ALL.running_dates_within(NaiveDate::MAX, NaiveDate::MAX),
        vec![NaiveDate::MAX]
    );
}
