use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{Validate, required};
use catalog_errors::ValidationError;

pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateReviewCommand {
    pub product_id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub comment: String,
    pub rating: i32,
}

/// Product and author of a review are fixed once it is written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReviewCommand {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    pub product_id: i64,
    pub user_id: i64,
    pub name: String,
    pub comment: String,
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewChanges {
    pub name: String,
    pub comment: String,
    pub rating: i32,
}

fn rating(value: i32) -> Result<i32, ValidationError> {
    if !RATING_RANGE.contains(&value) {
        return Err(ValidationError::new("rating", "must be between 1 and 5"));
    }
    Ok(value)
}

fn positive_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value < 1 {
        return Err(ValidationError::new(field, "must be a positive id"));
    }
    Ok(value)
}

impl Validate for CreateReviewCommand {
    type Valid = ReviewInput;

    fn validate(self) -> Result<ReviewInput, ValidationError> {
        Ok(ReviewInput {
            product_id: positive_id("product_id", self.product_id)?,
            user_id: positive_id("user_id", self.user_id)?,
            name: required("name", self.name)?,
            comment: self.comment.trim().to_string(),
            rating: rating(self.rating)?,
        })
    }
}

impl Validate for UpdateReviewCommand {
    type Valid = ReviewChanges;

    fn validate(self) -> Result<ReviewChanges, ValidationError> {
        Ok(ReviewChanges {
            name: required("name", self.name)?,
            comment: self.comment.trim().to_string(),
            rating: rating(self.rating)?,
        })
    }
}
