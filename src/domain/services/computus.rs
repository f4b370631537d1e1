use crate::domain::model::CalendarYear;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;

/// First full year of the Gregorian calendar.
pub const MIN_SUPPORTED_YEAR: CalendarYear = 1583;
pub const MAX_SUPPORTED_YEAR: CalendarYear = 9999;

/// Easter Sunday of `year`, using the anonymous Gregorian computus.
///
/// Pure integer arithmetic over the 19-year Metonic cycle (`a`), the century
/// corrections (`b`..`g`), the epact (`h`) and the weekday offset (`l`). The
/// result always falls between March 22 and April 25.
///
/// Years outside [`MIN_SUPPORTED_YEAR`]..=[`MAX_SUPPORTED_YEAR`] are rejected
/// with [`EtlError::InvalidYear`]; the formula is meaningless before the
/// Gregorian reform.
pub fn compute_anchor_date(year: CalendarYear) -> Result<NaiveDate> {
    if !(MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year) {
        return Err(EtlError::InvalidYear {
            year,
            min: MIN_SUPPORTED_YEAR,
            max: MAX_SUPPORTED_YEAR,
        });
    }

    // year > 0 here, so `/` and `%` behave like floor division and modulo
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or(EtlError::InvalidYear {
        year,
        min: MIN_SUPPORTED_YEAR,
        max: MAX_SUPPORTED_YEAR,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_known_easter_dates() {
        assert_eq!(compute_anchor_date(2024).unwrap(), date(2024, 3, 31));
        assert_eq!(compute_anchor_date(2016).unwrap(), date(2016, 3, 27));
        assert_eq!(compute_anchor_date(2010).unwrap(), date(2010, 4, 4));
        assert_eq!(compute_anchor_date(2011).unwrap(), date(2011, 4, 24));
        assert_eq!(compute_anchor_date(2000).unwrap(), date(2000, 4, 23));
        assert_eq!(compute_anchor_date(2025).unwrap(), date(2025, 4, 20));
    }

    #[test]
    fn test_extreme_dates() {
        // earliest and latest possible Easter
        assert_eq!(compute_anchor_date(1818).unwrap(), date(1818, 3, 22));
        assert_eq!(compute_anchor_date(2285).unwrap(), date(2285, 3, 22));
        assert_eq!(compute_anchor_date(1943).unwrap(), date(1943, 4, 25));
        assert_eq!(compute_anchor_date(2038).unwrap(), date(2038, 4, 25));
    }

    #[test]
    fn test_anchor_is_a_sunday_between_march_22_and_april_25() {
        for year in 1900..=2099 {
            let anchor = compute_anchor_date(year).unwrap();
            assert!(anchor >= date(year, 3, 22) && anchor <= date(year, 4, 25), "{}", anchor);
            assert_eq!(anchor.weekday(), chrono::Weekday::Sun, "{}", anchor);
        }
    }

    #[test]
    fn test_supported_bounds() {
        assert_eq!(compute_anchor_date(1583).unwrap(), date(1583, 4, 10));
        assert_eq!(compute_anchor_date(9999).unwrap(), date(9999, 3, 28));
    }

    #[test]
    fn test_rejects_pre_gregorian_and_far_future_years() {
        for year in [-1, 0, 1000, 1582, 10_000] {
            match compute_anchor_date(year) {
                Err(EtlError::InvalidYear { year: y, min, max }) => {
                    assert_eq!(y, year);
                    assert_eq!(min, MIN_SUPPORTED_YEAR);
                    assert_eq!(max, MAX_SUPPORTED_YEAR);
                }
                other => panic!("expected InvalidYear for {}, got {:?}", year, other),
            }
        }
    }
}
