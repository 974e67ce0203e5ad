//! Borrowing display state, derived on demand.
//!
//! Overdue is never persisted: it is a pure function of the record's status,
//! its due date, and a caller-supplied clock, so it can be recomputed on
//! every render and tested without touching wall-clock time.

use chrono::{DateTime, Utc};

use crate::models::{BorrowStatus, Borrowing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanState {
    Returned,
    Overdue,
    Borrowed,
}

impl LoanState {
    pub fn label(&self) -> &'static str {
        match self {
            LoanState::Returned => "Returned",
            LoanState::Overdue => "Overdue",
            LoanState::Borrowed => "Borrowed",
        }
    }
}

pub fn classify(borrowing: &Borrowing, now: DateTime<Utc>) -> LoanState {
    match borrowing.status {
        BorrowStatus::Returned => LoanState::Returned,
        BorrowStatus::Borrowed if borrowing.due_date < now => LoanState::Overdue,
        BorrowStatus::Borrowed => LoanState::Borrowed,
    }
}

/// Signed whole days until the due date, rounding up partial days (due in
/// 12 hours reads as "1 day", overdue by 12 hours as "0 days").
pub fn days_until_due(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    let ms = (due_date - now).num_milliseconds();
    let mut days = ms.div_euclid(DAY_MS);
    if ms.rem_euclid(DAY_MS) != 0 {
        days += 1;
    }
    days
}

pub fn due_label(due_date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match days_until_due(due_date, now) {
        d if d < 0 => format!("{} days overdue", -d),
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        d => format!("{} days remaining", d),
    }
}
