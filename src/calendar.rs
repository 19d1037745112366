// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Yearly recurrence arithmetic for anniversaries.

use chrono::{Datelike, NaiveDate};

/// The first yearly occurrence of `date`'s month and day on or after `today`.
///
/// A Feb 29 anniversary falls on Feb 28 in non-leap years.
pub fn next_occurrence(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    let this_year = in_year(date, today.year());
    if this_year >= today {
        this_year
    } else {
        in_year(date, today.year() + 1)
    }
}

/// Whole days from `today` until the next occurrence of `date` (0 if today).
pub fn days_until_next(date: NaiveDate, today: NaiveDate) -> i64 {
    (next_occurrence(date, today) - today).num_days()
}

fn in_year(date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), date.day() - 1))
        .unwrap_or(date)
}
