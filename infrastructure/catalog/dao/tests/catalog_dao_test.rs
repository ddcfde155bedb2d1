use catalog_commands::{BannerInput, ReviewChanges, ReviewInput, RoleInput};
use catalog_dao::{BannerDao, MIGRATIONS, ReviewDao, RoleDao};
use chrono::{NaiveDate, NaiveTime};
use dao_utils::DaoError;
use database_traits::{LifecycleDao, PageRequest, ParentScopedDao, UserRoleSource, total_of};
use sql_connection::SqlConnect;
use test_utils::postgres::TestPostgresContainer;

async fn setup() -> (TestPostgresContainer, SqlConnect) {
    let container = TestPostgresContainer::new(MIGRATIONS).await.unwrap();
    let db = SqlConnect::new(container.pool.clone());
    (container, db)
}

fn banner_input(name: &str) -> BannerInput {
    BannerInput {
        name: name.to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        is_active: true,
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_banner_lifecycle_statements() {
    let (_container, db) = setup().await;
    let dao = BannerDao::new(db);

    let first = dao.create(banner_input("Winter sale")).await.unwrap();
    let second = dao.create(banner_input("Spring sale")).await.unwrap();

    let trashed = dao.trash(first.id).await.unwrap();
    assert!(trashed.deleted_at.is_some());
    assert!(matches!(dao.trash(first.id).await, Err(DaoError::NotFound)));

    let page = PageRequest::default();
    let active = dao.find_active(&page).await.unwrap();
    let trashed_rows = dao.find_trashed(&page).await.unwrap();
    assert_eq!(active.iter().map(|row| row.item.id).collect::<Vec<_>>(), vec![second.id]);
    assert_eq!(total_of(&trashed_rows), 1);
    assert_eq!(total_of(&dao.find_all(&page).await.unwrap()), 2);

    let restored = dao.restore(first.id).await.unwrap();
    assert_eq!(restored.deleted_at, None);
    assert!(matches!(dao.restore(first.id).await, Err(DaoError::NotFound)));

    let updated = dao.update(second.id, banner_input("Summer sale")).await.unwrap();
    assert_eq!(updated.name, "Summer sale");
    assert_eq!(updated.deleted_at, None);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_search_paging_and_window_total() {
    let (_container, db) = setup().await;
    let dao = BannerDao::new(db);
    for i in 0..12 {
        dao.create(banner_input(&format!("Sale {i}"))).await.unwrap();
    }
    dao.create(banner_input("Clearance")).await.unwrap();

    let second_page = dao.find_all(&PageRequest::new(2, 5, "sale")).await.unwrap();

    assert_eq!(second_page.len(), 5);
    assert_eq!(total_of(&second_page), 12);
    assert!(dao.find_all(&PageRequest::new(9, 5, "")).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_bulk_restore_and_purge_counts() {
    let (_container, db) = setup().await;
    let dao = BannerDao::new(db);
    let ids: Vec<i64> = {
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            ids.push(dao.create(banner_input(name)).await.unwrap().id);
        }
        ids
    };
    for id in &ids {
        dao.trash(*id).await.unwrap();
    }

    assert_eq!(dao.restore_all().await.unwrap(), 3);
    assert_eq!(dao.restore_all().await.unwrap(), 0);

    dao.trash(ids[0]).await.unwrap();
    assert_eq!(dao.purge_all().await.unwrap(), 1);
    assert!(matches!(dao.find_by_id(ids[0]).await, Err(DaoError::NotFound)));

    assert!(matches!(dao.purge(ids[1]).await, Err(DaoError::NotFound)));
    assert!(dao.find_by_id(ids[1]).await.is_ok());

    dao.trash(ids[1]).await.unwrap();
    dao.purge(ids[1]).await.unwrap();
    assert!(matches!(dao.purge(ids[1]).await, Err(DaoError::NotFound)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_reviews_by_product() {
    let (_container, db) = setup().await;
    let dao = ReviewDao::new(db);
    let input = |product_id, comment: &str| ReviewInput {
        product_id,
        user_id: 1,
        name: "buyer".to_string(),
        comment: comment.to_string(),
        rating: 4,
    };

    let kept = dao.create(input(10, "solid")).await.unwrap();
    let hidden = dao.create(input(10, "meh")).await.unwrap();
    dao.create(input(11, "other product")).await.unwrap();
    dao.trash(hidden.id).await.unwrap();

    let rows = dao.find_by_parent(10, &PageRequest::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item.id, kept.id);

    let changed = dao
        .update(
            kept.id,
            ReviewChanges {
                name: "buyer".to_string(),
                comment: "great".to_string(),
                rating: 5,
            },
        )
        .await
        .unwrap();
    assert_eq!((changed.comment.as_str(), changed.rating), ("great", 5));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_role_names_for_user() {
    let (_container, db) = setup().await;
    let dao = RoleDao::new(db);
    let role = |name: &str| RoleInput {
        role_name: name.to_string(),
    };

    let seller = dao.create(role("seller")).await.unwrap();
    let admin = dao.create(role("admin")).await.unwrap();
    let retired = dao.create(role("retired")).await.unwrap();
    for id in [seller.id, admin.id, retired.id] {
        dao.assign_to_user(42, id).await.unwrap();
    }
    dao.assign_to_user(42, admin.id).await.unwrap();
    dao.trash(retired.id).await.unwrap();

    assert_eq!(dao.role_names_for_user(42).await.unwrap(), vec!["admin", "seller"]);
    assert!(dao.role_names_for_user(7).await.unwrap().is_empty());

    dao.revoke_from_user(42, admin.id).await.unwrap();
    assert_eq!(dao.role_names_for_user(42).await.unwrap(), vec!["seller"]);
}
