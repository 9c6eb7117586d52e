use crate::session::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub date: NaiveDate,
    pub is_school_day: bool,
    pub is_break: bool,
    /// At least one completion record falls on this date.
    pub attended: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceLedger {
    pub entries: Vec<AttendanceEntry>,
}

impl AttendanceLedger {
    pub fn attended_days(&self) -> usize {
        self.entries.iter().filter(|entry| entry.attended).count()
    }

    pub fn school_days(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_school_day).count()
    }

    pub fn break_days(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_break).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classifies every date from the session start through
/// `min(range_end, today)`.
pub fn build_attendance_ledger<I>(
    session: &Session,
    completed_on: I,
    range_end: NaiveDate,
    today: NaiveDate,
) -> AttendanceLedger
where
    I: IntoIterator<Item = NaiveDate>,
{
    let attended: BTreeSet<NaiveDate> = completed_on.into_iter().collect();
    let end = range_end.min(today);
    let mut entries = Vec::new();
    let mut current = session.start_date;

    while current <= end {
        entries.push(AttendanceEntry {
            date: current,
            is_school_day: session.is_school_day(current),
            is_break: session.is_break(current),
            attended: attended.contains(&current),
        });
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    let ledger = AttendanceLedger { entries };
    tracing::debug!(
        days = ledger.entries.len(),
        attended = ledger.attended_days(),
        "attendance ledger built"
    );
    ledger
}
