use crate::domain::model::{
    CalendarYear, EventRecord, HolyWeekWindows, TimeWindow, WindowCounts, YearCount,
};
use crate::domain::services::computus::compute_anchor_date;
use crate::utils::error::Result;
use chrono::Duration;
use std::ops::RangeInclusive;

/// Week before, holy week and week after for `year`.
///
/// The holy week runs from Palm Sunday (anchor - 7) to Holy Saturday
/// (anchor - 1). Easter Sunday itself opens the week after.
pub fn holy_week_windows(year: CalendarYear) -> Result<HolyWeekWindows> {
    let anchor = compute_anchor_date(year)?;

    let palm_sunday = anchor - Duration::days(7);
    let holy_saturday = anchor - Duration::days(1);
    let holy_week = TimeWindow::new(palm_sunday, holy_saturday);

    let week_before = TimeWindow::new(
        palm_sunday - Duration::days(7),
        palm_sunday - Duration::days(1),
    );
    let week_after = TimeWindow::new(
        holy_saturday + Duration::days(1),
        holy_saturday + Duration::days(7),
    );

    Ok(HolyWeekWindows {
        year,
        anchor,
        week_before,
        holy_week,
        week_after,
    })
}

fn count_in(window: &TimeWindow, events: &[EventRecord]) -> usize {
    events.iter().filter(|e| window.contains(e.date())).count()
}

pub fn compute_window_counts(year: CalendarYear, events: &[EventRecord]) -> Result<WindowCounts> {
    let windows = holy_week_windows(year)?;

    Ok(WindowCounts {
        year,
        before: count_in(&windows.week_before, events),
        during: count_in(&windows.holy_week, events),
        after: count_in(&windows.week_after, events),
    })
}

/// Events during the holy week of `year` only.
pub fn count_during_window(year: CalendarYear, events: &[EventRecord]) -> Result<usize> {
    let windows = holy_week_windows(year)?;
    Ok(count_in(&windows.holy_week, events))
}

/// Before/during/after counts for every year in `years`, ascending.
pub fn window_counts_for_years(
    years: RangeInclusive<CalendarYear>,
    events: &[EventRecord],
) -> Result<Vec<WindowCounts>> {
    years
        .map(|year| compute_window_counts(year, events))
        .collect()
}

pub fn during_counts_for_years(
    years: RangeInclusive<CalendarYear>,
    events: &[EventRecord],
) -> Result<Vec<YearCount>> {
    years
        .map(|year| {
            let count = count_during_window(year, events)?;
            tracing::debug!("Holy week {}: {} events", year, count);
            Ok(YearCount { year, count })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event_at(y: i32, m: u32, d: u32, h: u32, min: u32) -> EventRecord {
        EventRecord::new(None, date(y, m, d).and_hms_opt(h, min, 0).unwrap())
    }

    #[test]
    fn test_windows_for_2024() {
        let w = holy_week_windows(2024).unwrap();
        assert_eq!(w.anchor, date(2024, 3, 31));
        assert_eq!(w.holy_week, TimeWindow::new(date(2024, 3, 24), date(2024, 3, 30)));
        assert_eq!(w.week_before, TimeWindow::new(date(2024, 3, 17), date(2024, 3, 23)));
        assert_eq!(w.week_after, TimeWindow::new(date(2024, 3, 31), date(2024, 4, 6)));
    }

    #[test]
    fn test_counts_for_2024_scenario() {
        let events = vec![
            event_at(2024, 3, 24, 10, 0),
            event_at(2024, 3, 30, 23, 59),
            event_at(2024, 4, 1, 0, 0),
        ];
        let counts = compute_window_counts(2024, &events).unwrap();
        assert_eq!((counts.before, counts.during, counts.after), (0, 2, 1));
        assert_eq!(counts.year, 2024);
    }

    #[test]
    fn test_anchor_day_belongs_to_week_after() {
        let events = vec![event_at(2024, 3, 31, 0, 0)];
        let counts = compute_window_counts(2024, &events).unwrap();
        assert_eq!((counts.before, counts.during, counts.after), (0, 0, 1));
    }

    #[test]
    fn test_outer_boundaries_are_inclusive() {
        let events = vec![
            event_at(2024, 3, 17, 0, 0),
            event_at(2024, 3, 23, 23, 59),
            event_at(2024, 4, 6, 12, 0),
            // just outside
            event_at(2024, 3, 16, 23, 59),
            event_at(2024, 4, 7, 0, 0),
        ];
        let counts = compute_window_counts(2024, &events).unwrap();
        assert_eq!((counts.before, counts.during, counts.after), (2, 0, 1));
    }

    #[test]
    fn test_empty_events_count_zero() {
        let counts = compute_window_counts(2019, &[]).unwrap();
        assert_eq!((counts.before, counts.during, counts.after), (0, 0, 0));
        assert_eq!(count_during_window(2019, &[]).unwrap(), 0);
    }

    #[test]
    fn test_invalid_year_propagates() {
        assert!(matches!(
            compute_window_counts(1500, &[]),
            Err(EtlError::InvalidYear { year: 1500, .. })
        ));
        assert!(matches!(
            window_counts_for_years(1580..=1590, &[]),
            Err(EtlError::InvalidYear { year: 1580, .. })
        ));
    }

    #[test]
    fn test_multi_year_results_are_in_year_order() {
        let events = vec![event_at(2016, 3, 25, 8, 0), event_at(2023, 4, 3, 8, 0)];
        let series = during_counts_for_years(2010..=2024, &events).unwrap();
        assert_eq!(series.len(), 15);
        assert!(series.windows(2).all(|p| p[0].year + 1 == p[1].year));

        let by_year = |y: i32| series.iter().find(|c| c.year == y).unwrap().count;
        assert_eq!(by_year(2016), 1);
        assert_eq!(by_year(2023), 1);
        assert_eq!(by_year(2020), 0);
    }

    #[test]
    fn test_windows_are_contiguous_weeks() {
        for year in 1900..=2099 {
            let w = holy_week_windows(year).unwrap();
            for window in [w.week_before, w.holy_week, w.week_after] {
                assert_eq!(window.len_days(), 7);
            }
            assert_eq!(w.week_before.end + Duration::days(1), w.holy_week.start);
            assert_eq!(w.holy_week.end + Duration::days(1), w.week_after.start);
            assert_eq!(w.week_after.start, w.anchor);
        }
    }

    #[test]
    fn test_during_count_matches_window_counts() {
        let noon = date(2019, 3, 28).and_hms_opt(12, 0, 0).unwrap();
        let events: Vec<EventRecord> = (0..60)
            .map(|i| EventRecord::new(None, noon + Duration::days(i)))
            .collect();
        for year in [2018, 2019, 2020] {
            assert_eq!(
                count_during_window(year, &events).unwrap(),
                compute_window_counts(year, &events).unwrap().during
            );
        }
    }
}
