use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{Validate, required};
use catalog_errors::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRoleCommand {
    pub role_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateRoleCommand {
    pub role_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInput {
    pub role_name: String,
}

fn role_input(role_name: String) -> Result<RoleInput, ValidationError> {
    let role_name = required("role_name", role_name)?;
    if role_name.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("role_name", "must be a single word"));
    }
    Ok(RoleInput { role_name })
}

impl Validate for CreateRoleCommand {
    type Valid = RoleInput;

    fn validate(self) -> Result<RoleInput, ValidationError> { role_input(self.role_name) }
}

impl Validate for UpdateRoleCommand {
    type Valid = RoleInput;

    fn validate(self) -> Result<RoleInput, ValidationError> { role_input(self.role_name) }
}
