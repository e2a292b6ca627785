//! Day-keyed focus minute accumulator.
//!
//! # Invariants
//! - Stored totals are never negative; subtraction saturates at zero.
//! - Days that drop back to zero are removed from the map.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minutes of completed-task focus per calendar day.
///
/// Persisted as a JSON object `{"YYYY-MM-DD": minutes}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FocusLedger {
    minutes: BTreeMap<NaiveDate, u32>,
}

/// One entry of a trailing-days series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusDay {
    pub date: NaiveDate,
    /// Short weekday name used as the chart label.
    pub label: &'static str,
    pub minutes: u32,
}

impl FocusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `minutes` to `date` and returns the new total.
    pub fn add_minutes(&mut self, date: NaiveDate, minutes: u32) -> u32 {
        let total = self.minutes.entry(date).or_insert(0);
        *total = total.saturating_add(minutes);
        let total = *total;
        if total == 0 {
            self.minutes.remove(&date);
        }
        total
    }

    /// Subtracts `minutes` from `date`, clamping at zero. Returns the new total.
    pub fn remove_minutes(&mut self, date: NaiveDate, minutes: u32) -> u32 {
        let total = self.minutes_on(date).saturating_sub(minutes);
        if total == 0 {
            self.minutes.remove(&date);
        } else {
            self.minutes.insert(date, total);
        }
        total
    }

    pub fn minutes_on(&self, date: NaiveDate) -> u32 {
        self.minutes.get(&date).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.minutes.values().map(|m| u64::from(*m)).sum()
    }

    /// Recorded days in date order.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.minutes.iter().map(|(date, minutes)| (*date, *minutes))
    }

    /// The `n` calendar days ending at `today`, oldest first.
    ///
    /// Lazy and `Clone`: each clone walks the same window independently.
    /// Windows reaching past the first representable date are cut short
    /// at that date and still end at `today`.
    pub fn last_n_days(&self, today: NaiveDate, n: usize) -> FocusDays<'_> {
        let back = u64::try_from(n.saturating_sub(1)).unwrap_or(u64::MAX);
        let (next, remaining) = match today.checked_sub_days(Days::new(back)) {
            Some(start) => (start, n),
            None => {
                let span = today.signed_duration_since(NaiveDate::MIN).num_days();
                let available = usize::try_from(span).map_or(n, |days| days.saturating_add(1));
                (NaiveDate::MIN, available.min(n))
            }
        };
        FocusDays {
            ledger: self,
            next,
            remaining,
        }
    }
}

/// Iterator returned by [`FocusLedger::last_n_days`].
#[derive(Debug, Clone)]
pub struct FocusDays<'a> {
    ledger: &'a FocusLedger,
    next: NaiveDate,
    remaining: usize,
}

impl Iterator for FocusDays<'_> {
    type Item = FocusDay;

    fn next(&mut self) -> Option<FocusDay> {
        if self.remaining == 0 {
            return None;
        }
        let date = self.next;
        self.remaining -= 1;
        match date.succ_opt() {
            Some(next) => self.next = next,
            None => self.remaining = 0,
        }
        Some(FocusDay {
            date,
            label: weekday_label(date.weekday()),
            minutes: self.ledger.minutes_on(date),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for FocusDays<'_> {}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
