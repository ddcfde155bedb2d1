use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{Validate, required};
use catalog_errors::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryCommand {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCategoryCommand {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
    pub slug: String,
}

/// Lowercase ASCII words joined by single dashes.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn category_input(name: String, description: String) -> Result<CategoryInput, ValidationError> {
    let name = required("name", name)?;
    let slug = slugify(&name);
    if slug.is_empty() {
        return Err(ValidationError::new("name", "must contain a letter or digit"));
    }

    Ok(CategoryInput {
        name,
        description: description.trim().to_string(),
        slug,
    })
}

impl Validate for CreateCategoryCommand {
    type Valid = CategoryInput;

    fn validate(self) -> Result<CategoryInput, ValidationError> {
        category_input(self.name, self.description)
    }
}

impl Validate for UpdateCategoryCommand {
    type Valid = CategoryInput;

    fn validate(self) -> Result<CategoryInput, ValidationError> {
        category_input(self.name, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Home & Garden"), "home-garden");
        assert_eq!(slugify("  Kids' Toys 2 "), "kids-toys-2");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_category_gets_slug() {
        let input = CreateCategoryCommand {
            name: " Home & Garden ".into(),
            description: "outdoor".into(),
        }
        .validate()
        .unwrap();

        assert_eq!(input.name, "Home & Garden");
        assert_eq!(input.slug, "home-garden");
    }

    #[test]
    fn test_name_without_slug_is_rejected() {
        let err = UpdateCategoryCommand {
            name: "!!".into(),
            description: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "name");
    }
}
