use database_traits::{LifecycleDao, PageRequest, ParentScopedDao, UserRoleSource, total_of};
use test_utils::{
    InMemoryUserRoles,
    fixtures::{banner, banner_dao, review, review_dao},
};

#[tokio::test]
async fn test_transitions_match_only_their_source_state() {
    let dao = banner_dao();
    dao.seed(banner(1, "Sale")).await;

    assert!(dao.restore(1).await.unwrap_err().is_not_found());
    assert!(dao.trash(1).await.unwrap().deleted_at.is_some());
    assert!(dao.trash(1).await.unwrap_err().is_not_found());
    assert!(dao.restore(1).await.unwrap().deleted_at.is_none());
}

#[tokio::test]
async fn test_purge_only_removes_trashed_rows() {
    let dao = banner_dao();
    dao.seed(banner(1, "Sale")).await;

    assert!(dao.purge(1).await.unwrap_err().is_not_found());
    assert!(dao.get(1).await.is_some());

    dao.trash(1).await.unwrap();
    dao.purge(1).await.unwrap();
    assert!(dao.get(1).await.is_none());
    assert!(dao.purge(1).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_listing_pages_and_counts() {
    let dao = banner_dao();
    for id in 1..=7 {
        dao.seed(banner(id, &format!("Banner {id}"))).await;
    }
    dao.trash(7).await.unwrap();

    let page = dao.find_active(&PageRequest::new(2, 4, "")).await.unwrap();
    assert_eq!(page.iter().map(|row| row.item.id).collect::<Vec<_>>(), vec![5, 6]);
    assert_eq!(total_of(&page), 6);

    let trashed = dao.find_trashed(&PageRequest::default()).await.unwrap();
    assert_eq!(total_of(&trashed), 1);
    assert_eq!(dao.reads(), 2);
}

#[tokio::test]
async fn test_unavailable_store_fails_every_call() {
    let dao = banner_dao();
    dao.seed(banner(1, "Sale")).await;
    dao.set_unavailable(true);

    assert!(!dao.find_by_id(1).await.unwrap_err().is_not_found());
    assert!(dao.find_all(&PageRequest::default()).await.is_err());
    assert!(dao.purge_all().await.is_err());
}

#[tokio::test]
async fn test_reviews_of_one_product() {
    let dao = review_dao();
    dao.seed(review(1, 10, 5)).await;
    dao.seed(review(2, 10, 2)).await;
    dao.seed(review(3, 20, 4)).await;
    dao.trash(2).await.unwrap();

    let rows = dao.find_by_parent(10, &PageRequest::default()).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item.id, 1);
}

#[tokio::test]
async fn test_user_roles_are_sorted() {
    let roles = InMemoryUserRoles::new();
    roles.assign(42, &["seller", "admin"]).await;

    assert_eq!(roles.role_names_for_user(42).await.unwrap(), vec!["admin", "seller"]);
    assert!(roles.role_names_for_user(1).await.unwrap().is_empty());
    assert_eq!(roles.lookups(), 2);
}
