use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Weekly recurrence pattern stored as one independent flag per weekday.
///
/// Flags combine with `|`, so "Monday, Wednesday and Friday" is
/// `DaysOfWeek::MONDAY | DaysOfWeek::WEDNESDAY | DaysOfWeek::FRIDAY`.
/// Serialized as the integer mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DaysOfWeek(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysOfWeekError {
    OutOfRange(u8),
}

impl fmt::Display for DaysOfWeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysOfWeekError::OutOfRange(bits) => {
                write!(f, "days of week mask {bits} is outside 0..=127")
            }
        }
    }
}

impl std::error::Error for DaysOfWeekError {}

impl DaysOfWeek {
    pub const NONE: Self = Self(0);
    pub const SUNDAY: Self = Self(1 << 0);
    pub const MONDAY: Self = Self(1 << 1);
    pub const TUESDAY: Self = Self(1 << 2);
    pub const WEDNESDAY: Self = Self(1 << 3);
    pub const THURSDAY: Self = Self(1 << 4);
    pub const FRIDAY: Self = Self(1 << 5);
    pub const SATURDAY: Self = Self(1 << 6);
    pub const ALL: Self = Self(0b111_1111);

    const WEEKDAYS: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    const ABBREVIATIONS: [&'static str; 7] = ["Su", "M", "T", "W", "R", "F", "Sa"];

    const NOT_RUNNING: &'static str = "Not Running";

    pub fn from_bits(bits: u8) -> Result<Self, DaysOfWeekError> {
        if bits > Self::ALL.0 {
            return Err(DaysOfWeekError::OutOfRange(bits));
        }
        Ok(Self(bits))
    }

    pub fn from_weekdays<I>(weekdays: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        weekdays
            .into_iter()
            .fold(Self::NONE, |days, weekday| days | Self::flag(weekday))
    }

    pub fn flag(weekday: Weekday) -> Self {
        Self(1 << weekday.num_days_from_sunday())
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Active weekdays, Sunday first.
    pub fn weekdays(&self) -> Vec<Weekday> {
        Self::WEEKDAYS
            .iter()
            .copied()
            .filter(|weekday| self.runs_on_weekday(*weekday))
            .collect()
    }

    pub fn runs_on_weekday(&self, weekday: Weekday) -> bool {
        self.0 & Self::flag(weekday).0 != 0
    }

    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.runs_on_weekday(date.weekday())
    }

    /// Every day in `other` is also in `self`.
    pub fn is_superset_of(&self, other: DaysOfWeek) -> bool {
        self.0 & other.0 == other.0
    }

    /// Earliest running day strictly after `date`. A calendar with no
    /// running days, or no representable later day, hands `date` back
    /// unchanged.
    pub fn next_running_day_after(&self, date: NaiveDate) -> NaiveDate {
        if self.is_empty() {
            return date;
        }
        (1..=7)
            .filter_map(|offset| date.checked_add_days(Days::new(offset)))
            .find(|candidate| self.runs_on(*candidate))
            .unwrap_or(date)
    }

    /// Latest running day strictly before `date`, or `date` itself when no
    /// day runs.
    pub fn previous_running_day_before(&self, date: NaiveDate) -> NaiveDate {
        if self.is_empty() {
            return date;
        }
        (1..=7)
            .filter_map(|offset| date.checked_sub_days(Days::new(offset)))
            .find(|candidate| self.runs_on(*candidate))
            .unwrap_or(date)
    }

    pub fn last_running_day_on_or_before(&self, date: NaiveDate) -> NaiveDate {
        if self.runs_on(date) {
            date
        } else {
            self.previous_running_day_before(date)
        }
    }

    /// Running dates in `[start, end]`, ascending.
    pub fn running_dates_within(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.runs_on(current) {
                days.push(current);
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        days
    }

    /// Human readable list of the running days, e.g.
    /// "Monday, Wednesday, and Friday". Empty when nothing runs.
    pub fn describe(&self) -> String {
        let names: Vec<String> = self
            .weekdays()
            .into_iter()
            .map(|weekday| Self::day_name(weekday).to_string())
            .collect();

        match names.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => format!("{first} and {second}"),
            [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
        }
    }

    /// Compact day codes such as "MWF", or "Not Running".
    pub fn abbreviation(&self) -> String {
        if self.is_empty() {
            return Self::NOT_RUNNING.to_string();
        }
        Self::WEEKDAYS
            .iter()
            .zip(Self::ABBREVIATIONS)
            .filter(|(weekday, _)| self.runs_on_weekday(**weekday))
            .map(|(_, code)| code)
            .collect()
    }

    fn day_name(weekday: Weekday) -> &'static str {
        match weekday {
            Weekday::Sun => "Sunday",
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
        }
    }
}

impl BitOr for DaysOfWeek {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DaysOfWeek {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl TryFrom<u8> for DaysOfWeek {
    type Error = DaysOfWeekError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_bits(value)
    }
}

impl From<DaysOfWeek> for u8 {
    fn from(days: DaysOfWeek) -> Self {
        days.0
    }
}

impl fmt::Display for DaysOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
