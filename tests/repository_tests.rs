//! Repository integration tests over an in-memory database.

use chrono::{Duration, Utc};
use citadel::{
    error::AppError,
    models::user::Role,
    repository::{ResourceRepository, SessionRepository, StatsRepository, UserRepository},
};

mod common;
use common::{create_test_config, create_test_user, setup_test_db};

#[tokio::test]
async fn test_user_create_and_lookup() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = UserRepository::new(pool);

    let user = repo
        .create("wayne", "$argon2id$fake$hash", Role::Admin)
        .await
        .unwrap();
    assert_eq!(user.username, "wayne");
    assert_eq!(user.role, Role::Admin);
    assert!(user.is_active);
    assert!(user.last_login.is_none());

    let found = repo.find_by_username("wayne").await.unwrap();
    assert!(found.is_some());
    assert!(repo.find_by_username("joker").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = UserRepository::new(pool);

    repo.create("wayne", "hash1", Role::Admin).await.unwrap();
    let err = repo.create("wayne", "hash2", Role::Employee).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_deactivated_user_invisible_to_lookup() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = UserRepository::new(pool);

    repo.create("alfred", "hash", Role::Employee).await.unwrap();
    assert!(repo.deactivate("alfred").await.unwrap());

    // The lookup used by authentication only sees active accounts.
    assert!(repo.find_by_username("alfred").await.unwrap().is_none());
    assert!(repo.list_active().await.unwrap().is_empty());

    // Deactivating again changes nothing.
    assert!(!repo.deactivate("alfred").await.unwrap());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = SessionRepository::new(pool);

    let fp = "a".repeat(64);
    repo.register("wayne", &fp, Utc::now() + Duration::minutes(5))
        .await
        .unwrap();

    assert!(repo.is_valid(&fp).await.unwrap());
    assert!(!repo.is_valid(&"b".repeat(64)).await.unwrap());

    let session = repo.find(&fp).await.unwrap().expect("session should exist");
    assert_eq!(session.username, "wayne");
    assert!(session.expires_at > session.created_at);

    assert!(repo.revoke(&fp).await.unwrap());
    assert!(!repo.is_valid(&fp).await.unwrap());
    // Idempotent.
    assert!(!repo.revoke(&fp).await.unwrap());
}

#[tokio::test]
async fn test_expired_session_invalid_but_present_until_reaped() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = SessionRepository::new(pool);

    let fp = "c".repeat(64);
    repo.register("wayne", &fp, Utc::now() + Duration::milliseconds(100))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    // Expired rows read as invalid without being deleted by the read.
    assert!(!repo.is_valid(&fp).await.unwrap());
    assert_eq!(repo.count().await.unwrap(), 1);

    let reaped = repo.reap_expired().await.unwrap();
    assert_eq!(reaped, 1);
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_reap_leaves_live_sessions() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = SessionRepository::new(pool);

    repo.register("wayne", &"d".repeat(64), Utc::now() + Duration::minutes(5))
        .await
        .unwrap();
    repo.register("lucius", &"e".repeat(64), Utc::now() + Duration::milliseconds(50))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(150)).await;

    assert_eq!(repo.reap_expired().await.unwrap(), 1);
    assert_eq!(repo.count().await.unwrap(), 1);
    assert!(repo.is_valid(&"d".repeat(64)).await.unwrap());
}

#[tokio::test]
async fn test_resource_crud() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = ResourceRepository::new(pool);

    let created = repo
        .create("Batcomputer", Some("hardware"), Some("Mainframe"), "active", "wayne")
        .await
        .unwrap();
    assert_eq!(created.name, "Batcomputer");
    assert_eq!(created.created_by.as_deref(), Some("wayne"));

    let updated = repo
        .update(created.id, "Batcomputer Mk II", Some("hardware"), None, "maintenance")
        .await
        .unwrap()
        .expect("resource should exist");
    assert_eq!(updated.name, "Batcomputer Mk II");
    assert_eq!(updated.status, "maintenance");
    assert!(updated.updated_at >= created.updated_at);

    assert!(repo.update(9999, "x", None, None, "active").await.unwrap().is_none());

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_dashboard_stats_aggregation() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "wayne", "bat123", Role::Admin).await;
    create_test_user(&pool, "dick", "night1", Role::Employee).await;
    create_test_user(&pool, "alfred", "penny1", Role::Employee).await;

    let resources = ResourceRepository::new(pool.clone());
    resources
        .create("Batmobile", Some("vehicle"), None, "active", "wayne")
        .await
        .unwrap();
    resources
        .create("Batwing", Some("vehicle"), None, "maintenance", "wayne")
        .await
        .unwrap();
    resources
        .create("Batboat", Some("vehicle"), None, "active", "wayne")
        .await
        .unwrap();

    let stats = StatsRepository::new(pool).dashboard_stats().await.unwrap();

    assert_eq!(stats.total_resources, 3);
    assert_eq!(stats.resources_by_status.get("active"), Some(&2));
    assert_eq!(stats.resources_by_status.get("maintenance"), Some(&1));
    assert_eq!(stats.users_by_role.get("admin"), Some(&1));
    assert_eq!(stats.users_by_role.get("employee"), Some(&2));
    assert_eq!(stats.unresolved_alerts, 0);
}
