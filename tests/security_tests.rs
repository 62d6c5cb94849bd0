//! Security event logging and authorization gate tests.

use citadel::{
    error::AppError,
    models::{audit::SecurityEventType, auth::LoginRequest, user::Role},
    repository::{AlertRepository, AuditRepository, UserRepository},
};

mod common;
use common::{create_test_app_state, create_test_config, create_test_user, setup_test_db};

#[tokio::test]
async fn test_failed_login_writes_audit_and_alert() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(config, pool.clone());

    let _ = state
        .auth_service
        .login(
            LoginRequest {
                username: "joker".to_string(),
                password: "hahaha".to_string(),
            },
            Some("10.0.0.66"),
        )
        .await;

    let audit = AuditRepository::new(pool.clone());
    assert_eq!(audit.count_by_action("SECURITY_FAILED_LOGIN").await.unwrap(), 1);

    // Failed login is critical: it also raises a high alert.
    let alerts = AlertRepository::new(pool.clone());
    assert_eq!(alerts.count_unresolved().await.unwrap(), 1);

    let open = alerts.list(false).await.unwrap();
    assert_eq!(open[0].alert_type, "FAILED_LOGIN");
    assert_eq!(open[0].level, citadel::models::alert::AlertLevel::High);

    // The attempted username is preserved in the trail.
    let events = audit.list_recent(10).await.unwrap();
    assert_eq!(events[0].username, "joker");
    assert_eq!(events[0].ip_address.as_deref(), Some("10.0.0.66"));
}

#[tokio::test]
async fn test_successful_login_audits_without_alert() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    create_test_user(&pool, "wayne", "bat123", Role::Admin).await;
    let state = create_test_app_state(config, pool.clone());

    state
        .auth_service
        .login(
            LoginRequest {
                username: "wayne".to_string(),
                password: "bat123".to_string(),
            },
            None,
        )
        .await
        .unwrap();

    let audit = AuditRepository::new(pool.clone());
    assert_eq!(
        audit
            .count_by_action("SECURITY_SUCCESSFUL_LOGIN")
            .await
            .unwrap(),
        1
    );

    // Routine events never raise alerts.
    let alerts = AlertRepository::new(pool);
    assert_eq!(alerts.count_unresolved().await.unwrap(), 0);
}

#[tokio::test]
async fn test_authorization_denial_is_never_silent() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    create_test_user(&pool, "dick", "nightwing", Role::Employee).await;
    let state = create_test_app_state(config, pool.clone());

    let user = UserRepository::new(pool.clone())
        .find_by_username("dick")
        .await
        .unwrap()
        .unwrap();

    let err = state
        .permission_service
        .require_role(&user, &[Role::Admin, Role::Manager], Some("10.0.0.5"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // Exactly one audit row and one high alert per denial.
    let audit = AuditRepository::new(pool.clone());
    assert_eq!(
        audit
            .count_by_action("SECURITY_UNAUTHORIZED_ACCESS")
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        AlertRepository::new(pool).count_unresolved().await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_authorization_grant_leaves_no_trace() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    create_test_user(&pool, "lucius", "fox123", Role::Manager).await;
    let state = create_test_app_state(config, pool.clone());

    let user = UserRepository::new(pool.clone())
        .find_by_username("lucius")
        .await
        .unwrap()
        .unwrap();

    state
        .permission_service
        .require_role(&user, &[Role::Admin, Role::Manager], None)
        .await
        .unwrap();

    let audit = AuditRepository::new(pool.clone());
    assert_eq!(
        audit
            .count_by_action("SECURITY_UNAUTHORIZED_ACCESS")
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_critical_event_classification() {
    assert!(!SecurityEventType::SuccessfulLogin.is_critical());
    assert!(!SecurityEventType::Logout.is_critical());
    assert!(SecurityEventType::FailedLogin.is_critical());
    assert!(SecurityEventType::UnauthorizedAccess.is_critical());
    assert!(SecurityEventType::SuspiciousActivity.is_critical());
    assert!(SecurityEventType::RateLimitExceeded.is_critical());
}

#[tokio::test]
async fn test_alert_resolution_is_one_way() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(config, pool.clone());

    let id = state
        .security_service
        .raise_alert(
            "TEST_ALERT",
            "something happened",
            citadel::models::alert::AlertLevel::Medium,
        )
        .await
        .unwrap();

    let alerts = AlertRepository::new(pool);
    assert!(alerts.resolve(id, "wayne").await.unwrap());
    // Second resolution finds nothing to do.
    assert!(!alerts.resolve(id, "lucius").await.unwrap());

    let all = alerts.list(true).await.unwrap();
    assert_eq!(all[0].resolved_by.as_deref(), Some("wayne"));
    assert!(all[0].resolved_at.is_some());
}

#[tokio::test]
async fn test_logout_event_recorded() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    create_test_user(&pool, "wayne", "bat123", Role::Admin).await;
    let state = create_test_app_state(config, pool.clone());

    let response = state
        .auth_service
        .login(
            LoginRequest {
                username: "wayne".to_string(),
                password: "bat123".to_string(),
            },
            None,
        )
        .await
        .unwrap();

    state
        .auth_service
        .logout(&response.access_token, None)
        .await
        .unwrap();

    let audit = AuditRepository::new(pool);
    assert_eq!(audit.count_by_action("SECURITY_LOGOUT").await.unwrap(), 1);
}
