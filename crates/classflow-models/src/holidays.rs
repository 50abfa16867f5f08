//! Holiday models and DTOs.
//!
//! Holidays are global: a session of any class that falls on a holiday date
//! is generated as cancelled.

use chrono::{DateTime, NaiveDate, Utc};
use classflow_core::serde::nullable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::ids::HolidayId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Holiday {
    pub id: HolidayId,
    pub date: NaiveDate,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateHolidayDto {
    #[schema(example = "2024-12-25")]
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateHolidayDto {
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkCreateHolidaysDto {
    #[validate(length(min = 1, max = 366), nested)]
    pub holidays: Vec<CreateHolidayDto>,
}

/// Result of a bulk insert. Dates that already exist are skipped.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkCreateHolidaysResponse {
    pub created: usize,
    pub skipped: usize,
    pub total: usize,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HolidayFilterParams {
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpcomingHolidaysParams {
    /// Defaults to 5, at most 50
    pub limit: Option<i64>,
}

impl UpcomingHolidaysParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(5).clamp(1, 50)
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "validate_range"))]
pub struct HolidayRangeParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn validate_range(params: &HolidayRangeParams) -> Result<(), ValidationError> {
    if params.end_date < params.start_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("end_date must not be before start_date".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_holiday_dto_validation() {
        let dto = CreateHolidayDto {
            date: date(2024, 12, 25),
            name: "Christmas".into(),
            description: None,
        };
        assert!(dto.validate().is_ok());

        let empty_name = CreateHolidayDto {
            name: String::new(),
            ..dto.clone()
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_bulk_requires_entries() {
        let empty = BulkCreateHolidaysDto { holidays: vec![] };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_range_params() {
        let ok = HolidayRangeParams {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 1),
        };
        assert!(ok.validate().is_ok());

        let inverted = HolidayRangeParams {
            start_date: date(2024, 2, 1),
            end_date: date(2024, 1, 1),
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_upcoming_limit_clamped() {
        assert_eq!(UpcomingHolidaysParams::default().limit(), 5);
        assert_eq!(UpcomingHolidaysParams { limit: Some(500) }.limit(), 50);
        assert_eq!(UpcomingHolidaysParams { limit: Some(0) }.limit(), 1);
    }
}
