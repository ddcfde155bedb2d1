use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{Validate, required};
use catalog_errors::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BannerError {
    #[error("start date '{0}' is not a YYYY-MM-DD date")]
    InvalidStartDate(String),
    #[error("end date '{0}' is not a YYYY-MM-DD date")]
    InvalidEndDate(String),
    #[error("start time '{0}' is not an HH:MM time")]
    InvalidStartTime(String),
    #[error("end time '{0}' is not an HH:MM time")]
    InvalidEndTime(String),
    #[error("end date is before start date")]
    EndsBeforeStart,
}

impl BannerError {
    pub fn field(&self) -> &'static str {
        match self {
            BannerError::InvalidStartDate(_) => "start_date",
            BannerError::InvalidEndDate(_) | BannerError::EndsBeforeStart => "end_date",
            BannerError::InvalidStartTime(_) => "start_time",
            BannerError::InvalidEndTime(_) => "end_time",
        }
    }
}

impl From<BannerError> for ValidationError {
    fn from(err: BannerError) -> Self { ValidationError::new(err.field(), err.to_string()) }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBannerCommand {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

/// Full replacement of a banner's attributes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateBannerCommand {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool { true }

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
}

fn parse_banner(
    name: String, start_date: String, end_date: String, start_time: String,
    end_time: String, is_active: bool,
) -> Result<BannerInput, ValidationError> {
    let name = required("name", name)?;
    let start = NaiveDate::parse_from_str(&start_date, DATE_FORMAT)
        .map_err(|_| BannerError::InvalidStartDate(start_date))?;
    let end = NaiveDate::parse_from_str(&end_date, DATE_FORMAT)
        .map_err(|_| BannerError::InvalidEndDate(end_date))?;
    let start_time = NaiveTime::parse_from_str(&start_time, TIME_FORMAT)
        .map_err(|_| BannerError::InvalidStartTime(start_time))?;
    let end_time = NaiveTime::parse_from_str(&end_time, TIME_FORMAT)
        .map_err(|_| BannerError::InvalidEndTime(end_time))?;

    if end < start {
        return Err(BannerError::EndsBeforeStart.into());
    }

    Ok(BannerInput {
        name,
        start_date: start,
        end_date: end,
        start_time,
        end_time,
        is_active,
    })
}

impl Validate for CreateBannerCommand {
    type Valid = BannerInput;

    fn validate(self) -> Result<BannerInput, ValidationError> {
        parse_banner(
            self.name,
            self.start_date,
            self.end_date,
            self.start_time,
            self.end_time,
            self.is_active,
        )
    }
}

impl Validate for UpdateBannerCommand {
    type Valid = BannerInput;

    fn validate(self) -> Result<BannerInput, ValidationError> {
        parse_banner(
            self.name,
            self.start_date,
            self.end_date,
            self.start_time,
            self.end_time,
            self.is_active,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(start_date: &str, start_time: &str) -> CreateBannerCommand {
        CreateBannerCommand {
            name: "Winter sale".into(),
            start_date: start_date.into(),
            end_date: "2024-01-31".into(),
            start_time: start_time.into(),
            end_time: "17:00".into(),
            is_active: true,
        }
    }

    #[test]
    fn test_valid_banner() {
        let input = command("2024-01-01", "09:00").validate().unwrap();

        assert_eq!(input.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(input.end_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(input.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(input.end_time, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn test_each_field_has_its_own_error() {
        let err = command("not-a-date", "09:00").validate().unwrap_err();
        assert_eq!(err.field, "start_date");

        let err = command("2024-01-01", "9 am").validate().unwrap_err();
        assert_eq!(err.field, "start_time");

        let mut cmd = command("2024-01-01", "09:00");
        cmd.end_date = "2024/01/31".into();
        assert_eq!(cmd.validate().unwrap_err().field, "end_date");

        let mut cmd = command("2024-01-01", "09:00");
        cmd.end_time = "25:00".into();
        assert_eq!(cmd.validate().unwrap_err().field, "end_time");
    }

    #[test]
    fn test_end_before_start() {
        let err = command("2024-02-01", "09:00").validate().unwrap_err();
        assert_eq!(err, ValidationError::from(BannerError::EndsBeforeStart));
    }

    #[test]
    fn test_blank_name() {
        let mut cmd = command("2024-01-01", "09:00");
        cmd.name = "   ".into();
        assert_eq!(cmd.validate().unwrap_err(), ValidationError::required("name"));
    }

    #[test]
    fn test_is_active_defaults_to_true() {
        let cmd: CreateBannerCommand = serde_json::from_str(
            r#"{"name":"a","start_date":"2024-01-01","end_date":"2024-01-02","start_time":"09:00","end_time":"10:00"}"#,
        )
        .unwrap();
        assert!(cmd.is_active);
    }
}
