use crate::days_of_week::DaysOfWeek;
use crate::week::Week;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A contiguous, inclusive span of days during which school is suspended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolBreak {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where a date falls inside a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakDateKind {
    SingleDay,
    Start,
    Middle,
    End,
}

impl SchoolBreak {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn date_kind(&self, date: NaiveDate) -> BreakDateKind {
        if self.start_date == self.end_date {
            BreakDateKind::SingleDay
        } else if date == self.start_date {
            BreakDateKind::Start
        } else if date == self.end_date {
            BreakDateKind::End
        } else {
            BreakDateKind::Middle
        }
    }
}

/// A running day inside a week, flagged when a break covers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDate {
    pub date: NaiveDate,
    pub is_break: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_kind: Option<BreakDateKind>,
}

/// A date-bounded schedule (school year or course) with its weekly
/// pattern and breaks. Answers whether a calendar date is a school day.
///
/// Bad data (start after end, breaks outside the range, no running days)
/// never panics or loops; day stepping is bounded by the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_week: DaysOfWeek,
    #[serde(default)]
    pub breaks: Vec<SchoolBreak>,
}

impl Session {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, days_of_week: DaysOfWeek) -> Self {
        Self {
            start_date,
            end_date,
            days_of_week,
            breaks: Vec::new(),
        }
    }

    pub fn with_breaks<I>(mut self, breaks: I) -> Self
    where
        I: IntoIterator<Item = SchoolBreak>,
    {
        self.breaks.extend(breaks);
        self
    }

    /// Same dates and breaks, different weekly pattern.
    pub fn with_days_of_week(&self, days_of_week: DaysOfWeek) -> Self {
        Self {
            days_of_week,
            ..self.clone()
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_break(&self, date: NaiveDate) -> bool {
        self.break_covering(date).is_some()
    }

    pub fn break_covering(&self, date: NaiveDate) -> Option<&SchoolBreak> {
        self.breaks.iter().find(|school_break| school_break.contains(date))
    }

    /// Position of `date` within the break covering it, if any.
    pub fn break_date_kind(&self, date: NaiveDate) -> Option<BreakDateKind> {
        self.break_covering(date)
            .map(|school_break| school_break.date_kind(date))
    }

    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.days_of_week.runs_on(date)
    }

    pub fn is_school_day(&self, date: NaiveDate) -> bool {
        self.contains(date) && self.runs_on(date) && !self.is_break(date)
    }

    /// Next school day strictly after `date`.
    ///
    /// When the range runs out, the first running day past `end_date` is
    /// returned, so callers can tell exhaustion apart with
    /// [`Session::is_school_day`]. With no running days `date` comes back.
    pub fn next_school_day_after(&self, date: NaiveDate) -> NaiveDate {
        let limit = (self.end_date - date).num_days().max(0) + 7;
        let mut current = date;
        for _ in 0..limit {
            let candidate = self.days_of_week.next_running_day_after(current);
            if candidate == current {
                tracing::debug!(%date, "no running days; school day search stays put");
                return date;
            }
            current = candidate;
            if current > self.end_date || self.is_school_day(current) {
                return current;
            }
        }
        date
    }

    /// Latest school day strictly before `date`. Mirrors
    /// [`Session::next_school_day_after`], bounded by `start_date`.
    pub fn previous_school_day_before(&self, date: NaiveDate) -> NaiveDate {
        let limit = (date - self.start_date).num_days().max(0) + 7;
        let mut current = date;
        for _ in 0..limit {
            let candidate = self.days_of_week.previous_running_day_before(current);
            if candidate == current {
                tracing::debug!(%date, "no running days; school day search stays put");
                return date;
            }
            current = candidate;
            if current < self.start_date || self.is_school_day(current) {
                return current;
            }
        }
        date
    }

    /// `date` when it is a school day, otherwise the next one.
    pub fn first_school_day_on_or_after(&self, date: NaiveDate) -> NaiveDate {
        if self.is_school_day(date) {
            date
        } else {
            self.next_school_day_after(date)
        }
    }

    /// School days in `[start, end]`, clipped to the session range.
    pub fn school_dates_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let start = start.max(self.start_date);
        let end = end.min(self.end_date);
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.is_school_day(current) {
                days.push(current);
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        days
    }

    pub fn school_days_between(&self, start: NaiveDate, end: NaiveDate) -> usize {
        self.school_dates_between(start, end).len()
    }

    /// The running days of `week`, each marked when a break covers it.
    pub fn week_dates(&self, week: &Week) -> Vec<WeekDate> {
        self.days_of_week
            .running_dates_within(week.first_day(), week.last_day())
            .into_iter()
            .map(|date| {
                let date_kind = self.break_date_kind(date);
                WeekDate {
                    date,
                    is_break: date_kind.is_some(),
                    date_kind,
                }
            })
            .collect()
    }

    /// Last school day in `week`, if any.
    pub fn last_school_day_in(&self, week: &Week) -> Option<NaiveDate> {
        week.dates()
            .into_iter()
            .rev()
            .find(|date| self.is_school_day(*date))
    }
}
