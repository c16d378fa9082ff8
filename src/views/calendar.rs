use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};

use crate::service::view_state::CalendarEntry;

/// Month view over the calendar projection of the cached events.
#[derive(Debug, Clone, Default)]
pub struct CalendarView {
    by_day: BTreeMap<NaiveDate, Vec<CalendarEntry>>,
    unscheduled: Vec<CalendarEntry>,
}

/// Accepts plain dates and anything with a leading `YYYY-MM-DD`.
pub fn parse_start(start: &str) -> Option<NaiveDate> {
    let day = start.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(month: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d").ok()
}

impl CalendarView {
    pub fn new(entries: Vec<CalendarEntry>) -> Self {
        let mut view = Self::default();
        for entry in entries {
            match entry.start.as_deref().and_then(parse_start) {
                Some(day) => view.by_day.entry(day).or_default().push(entry),
                None => view.unscheduled.push(entry),
            }
        }
        view
    }

    pub fn find(&self, event_id: i64) -> Option<&CalendarEntry> {
        self.by_day
            .values()
            .flatten()
            .chain(self.unscheduled.iter())
            .find(|entry| entry.id == event_id)
    }

    pub fn on(&self, day: NaiveDate) -> &[CalendarEntry] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn unscheduled(&self) -> &[CalendarEntry] {
        &self.unscheduled
    }

    /// A Sunday-first month grid; days with events are starred, followed by
    /// the agenda for that month.
    pub fn render_month(&self, first: NaiveDate) -> String {
        let first = first.with_day(1).unwrap_or(first);
        let next_month = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        };
        let days_in_month = next_month
            .map(|next| (next - first).num_days())
            .unwrap_or(31);

        let mut out = String::new();
        let _ = writeln!(out, "{}", first.format("%B %Y"));
        let _ = writeln!(out, " Su  Mo  Tu  We  Th  Fr  Sa");
        let offset = first.weekday().num_days_from_sunday() as usize;
        let mut column = 0;
        for _ in 0..offset {
            out.push_str("    ");
            column += 1;
        }
        for day in 1..=days_in_month {
            let date = first + chrono::Duration::days(day - 1);
            let marker = if self.by_day.contains_key(&date) { '*' } else { ' ' };
            let _ = write!(out, "{:>3}{}", day, marker);
            column += 1;
            if column == 7 {
                out.push('\n');
                column = 0;
            }
        }
        if column != 0 {
            out.push('\n');
        }

        let agenda: Vec<_> = self
            .by_day
            .range(first..first + chrono::Duration::days(days_in_month))
            .collect();
        if agenda.is_empty() {
            out.push_str("\nNo events this month\n");
        } else {
            out.push('\n');
            for (day, entries) in agenda {
                for entry in entries {
                    let _ = writeln!(out, "{}  #{} {}", day, entry.id, entry.title);
                }
            }
        }
        out
    }
}
