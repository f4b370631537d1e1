pub mod computus;
pub mod daily;
pub mod windows;

pub use computus::{compute_anchor_date, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};
pub use daily::count_events_per_day;
pub use windows::{
    compute_window_counts, count_during_window, during_counts_for_years, holy_week_windows,
    window_counts_for_years,
};
