//! In-memory repositories and sample records for each catalog entity.

use catalog_commands::{BannerInput, CategoryInput, ReviewChanges, ReviewInput, RoleInput};
use catalog_models::{Banner, Category, Review, Role};
use chrono::{NaiveDate, NaiveTime, Utc};

use crate::InMemoryDao;

pub type BannerDao = InMemoryDao<Banner, BannerInput, BannerInput>;
pub type CategoryDao = InMemoryDao<Category, CategoryInput, CategoryInput>;
pub type RoleDao = InMemoryDao<Role, RoleInput, RoleInput>;
pub type ReviewDao = InMemoryDao<Review, ReviewInput, ReviewChanges>;

pub fn banner_dao() -> BannerDao {
    InMemoryDao::new(
        |id, input: BannerInput| {
            let mut banner = banner(id, &input.name);
            write_banner(&mut banner, input);
            banner
        },
        |banner, input| {
            write_banner(banner, input);
            banner.updated_at = Utc::now();
        },
    )
}

fn write_banner(banner: &mut Banner, input: BannerInput) {
    banner.name = input.name;
    banner.start_date = input.start_date;
    banner.end_date = input.end_date;
    banner.start_time = input.start_time;
    banner.end_time = input.end_time;
    banner.is_active = input.is_active;
}

/// An active January banner shown 09:00 to 17:00.
pub fn banner(id: i64, name: &str) -> Banner {
    let now = Utc::now();
    Banner {
        id,
        name: name.to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_default(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        is_active: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn category_dao() -> CategoryDao {
    InMemoryDao::new(
        |id, input: CategoryInput| {
            let now = Utc::now();
            Category {
                id,
                name: input.name,
                description: input.description,
                slug: input.slug,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            }
        },
        |category: &mut Category, input: CategoryInput| {
            category.name = input.name;
            category.description = input.description;
            category.slug = input.slug;
            category.updated_at = Utc::now();
        },
    )
}

pub fn role_dao() -> RoleDao {
    InMemoryDao::new(
        |id, input: RoleInput| role(id, &input.role_name),
        |role: &mut Role, input: RoleInput| {
            role.role_name = input.role_name;
            role.updated_at = Utc::now();
        },
    )
}

pub fn role(id: i64, role_name: &str) -> Role {
    let now = Utc::now();
    Role {
        id,
        role_name: role_name.to_string(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn review_dao() -> ReviewDao {
    InMemoryDao::new(
        |id, input: ReviewInput| {
            let mut review = review(id, input.product_id, input.rating);
            review.user_id = input.user_id;
            review.name = input.name;
            review.comment = input.comment;
            review
        },
        |review: &mut Review, changes: ReviewChanges| {
            review.name = changes.name;
            review.comment = changes.comment;
            review.rating = changes.rating;
            review.updated_at = Utc::now();
        },
    )
}

pub fn review(id: i64, product_id: i64, rating: i32) -> Review {
    let now = Utc::now();
    Review {
        id,
        product_id,
        user_id: 1,
        name: "reviewer".to_string(),
        comment: format!("review {id}"),
        rating,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}
