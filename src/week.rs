use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A Sunday through Saturday calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Week {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl Week {
    /// The week containing `date`. At the ends of the representable
    /// calendar the week is cut short at `NaiveDate::MIN`/`MAX`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_sunday());
        let first_day = date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
        let last_day = date
            .checked_add_days(Days::new(6 - offset))
            .unwrap_or(NaiveDate::MAX);
        Self {
            first_day,
            last_day,
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    /// The week's dates, Sunday first. Seven except at the calendar ends.
    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..7)
            .filter_map(|offset| self.first_day.checked_add_days(Days::new(offset)))
            .take_while(|date| *date <= self.last_day)
            .collect()
    }

    /// The following week, or this one when none is representable.
    pub fn next(&self) -> Self {
        self.last_day
            .succ_opt()
            .map(Self::containing)
            .unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        self.first_day
            .pred_opt()
            .map(Self::containing)
            .unwrap_or(*self)
    }
}
