use crate::domain::model::{CalendarYear, TimeWindow};
use crate::domain::services::{MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};
use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EtlError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Both ends inside the supported Gregorian range and `start <= end`.
pub fn validate_year_span(field_name: &str, start: CalendarYear, end: CalendarYear) -> Result<()> {
    validate_range(field_name, start, MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR)?;
    validate_range(field_name, end, MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR)?;
    if start > end {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..={}", start, end),
            reason: "Start year must not be after end year".to_string(),
        });
    }
    Ok(())
}

pub fn validate_window(window: &TimeWindow) -> Result<()> {
    if window.start > window.end {
        return Err(EtlError::InvalidWindow {
            start: window.start,
            end: window.end,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input_path", "data/events.cat").is_ok());
        assert!(validate_path("input_path", "").is_err());
        assert!(validate_path("input_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_year_span() {
        assert!(validate_year_span("series_years", 2010, 2024).is_ok());
        assert!(validate_year_span("series_years", 2024, 2024).is_ok());
        assert!(validate_year_span("series_years", 2024, 2010).is_err());
        assert!(validate_year_span("series_years", 1500, 2010).is_err());
        assert!(validate_year_span("series_years", 2010, 10_000).is_err());
    }

    #[test]
    fn test_validate_window() {
        let a = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert!(validate_window(&TimeWindow::new(a, b)).is_ok());
        assert!(matches!(
            validate_window(&TimeWindow::new(b, a)),
            Err(EtlError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let missing: Option<i32> = None;
        assert_eq!(*validate_required_field("daily.start", &present).unwrap(), 3);
        assert!(matches!(
            validate_required_field("daily.start", &missing),
            Err(EtlError::MissingConfigError { .. })
        ));
    }
}
