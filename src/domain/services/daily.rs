use crate::domain::model::{DailyCount, EventRecord, TimeWindow};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Events per calendar day, one entry for every day of the range.
///
/// Without an explicit `range` the span runs from the earliest to the latest
/// event date. Days with no events are reported with a zero count.
pub fn count_events_per_day(events: &[EventRecord], range: Option<TimeWindow>) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for event in events {
        let day = event.date();
        if range.is_some_and(|r| !r.contains(day)) {
            continue;
        }
        *per_day.entry(day).or_insert(0) += 1;
    }

    let span = match range {
        Some(r) => r,
        None => match (per_day.keys().next(), per_day.keys().next_back()) {
            (Some(first), Some(last)) => TimeWindow::new(*first, *last),
            _ => return Vec::new(),
        },
    };

    span.start
        .iter_days()
        .take_while(|day| *day <= span.end)
        .map(|date| DailyCount {
            date,
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}
