mod banner;
mod category;
mod review;
mod role;

pub use banner::{BannerError, BannerInput, CreateBannerCommand, UpdateBannerCommand};
use catalog_errors::ValidationError;
pub use category::{CategoryInput, CreateCategoryCommand, UpdateCategoryCommand, slugify};
pub use review::{CreateReviewCommand, ReviewChanges, ReviewInput, UpdateReviewCommand};
pub use role::{CreateRoleCommand, RoleInput, UpdateRoleCommand};

/// Turns raw request input into the typed value a repository accepts.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, ValidationError>;
}

pub(crate) fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(trimmed.to_string())
}
