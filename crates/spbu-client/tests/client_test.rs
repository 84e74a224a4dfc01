//! Client tests against a live server on an ephemeral port.

use std::sync::Arc;

use spbu_auth::AuthConfig;
use spbu_client::{
    ClientConfig, ClientError, RecordingNotifier, SpbuClient, ToastLevel,
};
use spbu_core::models::adjustment::{AdjustmentTarget, AdjustmentType, CreateAdjustment};
use spbu_core::models::delivery::CreateDelivery;
use spbu_core::models::sale::CreateSale;
use spbu_core::models::station::CreateSpbu;
use spbu_core::models::user::CreateUser;
use spbu_core::repository::{StationRepository, UserRepository};
use spbu_core::workflow::ApprovalStatus;
use spbu_db::repository::{MemoryStationRepository, MemoryUserRepository};
use spbu_db::{DEMO_PASSWORD, Database, seed_demo};
use spbu_server::AppState;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let db = Database::new();
    seed_demo(&db, None).await.unwrap();
    serve(db).await
}

async fn serve(db: Database) -> String {
    let state = AppState::new(
        db,
        AuthConfig {
            jwt_secret: "client-test-secret".into(),
            ..Default::default()
        },
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(spbu_server::serve(listener, state));
    format!("http://{addr}")
}

async fn signed_in(base: &str, username: &str) -> (SpbuClient, RecordingNotifier) {
    let notifier = RecordingNotifier::new();
    let client =
        SpbuClient::with_notifier(&ClientConfig::new(base), Arc::new(notifier.clone())).unwrap();
    client.api.login(username, DEMO_PASSWORD).await.unwrap();
    (client, notifier)
}

fn fuel_gain() -> CreateAdjustment {
    CreateAdjustment {
        spbu_id: None,
        target: AdjustmentTarget::Fuel,
        tank_id: Some(5),
        adjustment_type: AdjustmentType::Gain,
        quantity: 100.0,
        description: "test".into(),
    }
}

#[tokio::test]
async fn created_adjustment_round_trips_as_pending() {
    let base = spawn_server().await;
    let (operator, toasts) = signed_in(&base, "operator").await;

    assert!(operator.adjustments.can_create());
    assert!(!operator.adjustments.can_decide());

    let created = operator.adjustments.create(fuel_gain()).await.unwrap();
    assert_eq!(toasts.last().unwrap().level, ToastLevel::Success);

    let listed = operator
        .adjustments
        .list(Some(ApprovalStatus::Pending))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    let adj = &listed[0];
    assert_eq!(adj.id, created.id);
    assert_eq!(adj.tank_id, Some(5));
    assert_eq!(adj.adjustment_type, AdjustmentType::Gain);
    assert_eq!(adj.quantity, 100.0);
    assert_eq!(adj.description, "test");
    assert_eq!(adj.approval.status, ApprovalStatus::Pending);
}

#[tokio::test]
async fn mutations_invalidate_cached_lists() {
    let base = spawn_server().await;
    let (operator, _) = signed_in(&base, "operator").await;
    let (admin, _) = signed_in(&base, "admin").await;

    let created = operator.adjustments.create(fuel_gain()).await.unwrap();
    assert_eq!(admin.adjustments.list(None).await.unwrap().len(), 1);
    let tanks_before = admin.resources.tanks().await.unwrap();

    admin.adjustments.approve(created.id).await.unwrap();

    let after = admin.adjustments.list(None).await.unwrap();
    assert_eq!(after[0].approval.status, ApprovalStatus::Approved);
    let tanks_after = admin.resources.tanks().await.unwrap();
    let stock = |tanks: &[spbu_core::models::tank::Tank]| {
        tanks.iter().find(|t| t.id == 5).unwrap().current_stock
    };
    assert_eq!(stock(&tanks_after) - stock(&tanks_before), 100.0);
}

#[tokio::test]
async fn gated_calls_never_reach_the_server() {
    let base = spawn_server().await;
    let (operator, toasts) = signed_in(&base, "operator").await;
    let (admin, _) = signed_in(&base, "admin").await;

    let err = admin.adjustments.create(fuel_gain()).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));

    let err = operator.adjustments.approve(1).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
    let toast = toasts.last().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.title, "Failed to approve adjustment");

    let mut invalid = fuel_gain();
    invalid.quantity = 0.0;
    let err = operator.adjustments.create(invalid).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn second_decision_surfaces_the_server_message() {
    let base = spawn_server().await;
    let (operator, _) = signed_in(&base, "operator").await;
    let (admin, toasts) = signed_in(&base, "admin").await;

    let created = operator
        .deliveries
        .create(CreateDelivery {
            spbu_id: None,
            tank_id: 2,
            supplier: "Pertamina".into(),
            volume: 1_000.0,
            delivery_order_number: "DO-42".into(),
        })
        .await
        .unwrap();
    assert_eq!(admin.deliveries.ready_for_confirmation().await.unwrap().len(), 1);

    admin.deliveries.approve(created.id).await.unwrap();
    assert_eq!(toasts.last().unwrap().message, "Delivery confirmed");
    assert!(admin.deliveries.ready_for_confirmation().await.unwrap().is_empty());

    let err = admin.deliveries.reject(created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    let toast = toasts.last().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, err.to_string());
}

#[tokio::test]
async fn revoked_session_is_cleared_on_401() {
    let base = spawn_server().await;
    let (operator, _) = signed_in(&base, "operator").await;

    let token = operator.auth().token().unwrap();
    let (other, _) = signed_in(&base, "operator").await;
    other.auth().sign_out();
    other.auth().sign_in(spbu_client::Session {
        token,
        user: operator.auth().current_user().unwrap(),
    });

    operator.api.logout().await.unwrap();
    assert!(!operator.auth().is_authenticated());

    let err = other.resources.tanks().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
    assert!(!other.auth().is_authenticated());
}

#[tokio::test]
async fn wrong_password_is_not_a_session_expiry() {
    let base = spawn_server().await;
    let client = SpbuClient::new(&ClientConfig::new(&base)).unwrap();
    let err = client.api.login("admin", "nope-nope").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!matches!(err, ClientError::SessionExpired));
    assert!(!client.auth().is_authenticated());
}

#[tokio::test]
async fn unreachable_server_reports_a_network_error() {
    let client = SpbuClient::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();
    let err = client.api.login("admin", DEMO_PASSWORD).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Network error. Please check your connection."
    );
}

#[tokio::test]
async fn sales_refresh_tank_stock() {
    let base = spawn_server().await;
    let (operator, _) = signed_in(&base, "operator").await;

    let before = operator.resources.tanks().await.unwrap();
    let sale = operator
        .resources
        .record_sale(CreateSale {
            spbu_id: None,
            tank_id: 1,
            volume: 10.0,
        })
        .await
        .unwrap();
    assert_eq!(sale.amount, 100_000);

    let after = operator.resources.tanks().await.unwrap();
    assert_eq!(before[0].current_stock - after[0].current_stock, 10.0);

    let price = operator.resources.current_price("Pertamax Turbo").await.unwrap();
    assert_eq!(price.price, 14_000);

    assert!(matches!(
        operator.resources.report_summary(None).await,
        Err(ClientError::Forbidden(_))
    ));
}

#[tokio::test]
async fn new_session_does_not_see_previous_users_cache() {
    let db = Database::new();
    seed_demo(&db, None).await.unwrap();
    let second = MemoryStationRepository::new(db.clone())
        .create(CreateSpbu {
            code: "34.401.02".into(),
            name: "SPBU Kedua".into(),
            address: "Jl. Sudirman No. 2".into(),
        })
        .await
        .unwrap();
    MemoryUserRepository::new(db.clone())
        .create(CreateUser {
            username: "admin2".into(),
            name: "Second Admin".into(),
            password: DEMO_PASSWORD.into(),
            roles: vec!["Admin".into()],
            spbu_id: Some(second.id),
        })
        .await
        .unwrap();
    let base = serve(db).await;

    let (client, _) = signed_in(&base, "operator").await;
    client.adjustments.create(fuel_gain()).await.unwrap();
    assert_eq!(client.adjustments.list(None).await.unwrap().len(), 1);
    assert!(!client.api.cache().is_empty());

    client.api.logout().await.unwrap();
    assert!(client.api.cache().is_empty());

    client.api.login("admin2", DEMO_PASSWORD).await.unwrap();
    assert!(client.adjustments.list(None).await.unwrap().is_empty());
    assert!(
        client
            .resources
            .tanks()
            .await
            .unwrap()
            .iter()
            .all(|t| t.spbu_id == second.id)
    );
}

#[tokio::test]
async fn login_over_an_existing_session_drops_cached_reads() {
    let base = spawn_server().await;
    let (client, _) = signed_in(&base, "operator").await;
    client.resources.tanks().await.unwrap();
    assert!(client.api.cache().contains("api/tanks"));

    client.api.login("admin", DEMO_PASSWORD).await.unwrap();
    assert!(client.api.cache().is_empty());
}

#[tokio::test]
async fn server_401_clears_cached_reads() {
    let base = spawn_server().await;
    let (operator, _) = signed_in(&base, "operator").await;
    let (other, _) = signed_in(&base, "operator").await;
    other.resources.tanks().await.unwrap();
    assert!(!other.api.cache().is_empty());

    // Revoke the token `other` is using.
    let token = other.auth().token().unwrap();
    operator.auth().sign_in(spbu_client::Session {
        token,
        user: other.auth().current_user().unwrap(),
    });
    operator.api.logout().await.unwrap();

    let err = other.deposits.list(None).await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
    assert!(other.api.cache().is_empty());
}

#[tokio::test]
async fn ready_for_confirmation_requires_a_session() {
    let base = spawn_server().await;
    let notifier = RecordingNotifier::new();
    let client =
        SpbuClient::with_notifier(&ClientConfig::new(&base), Arc::new(notifier.clone())).unwrap();

    let err = client.deliveries.ready_for_confirmation().await.unwrap_err();
    assert!(matches!(err, ClientError::NotSignedIn));
    assert_eq!(notifier.last().unwrap().level, ToastLevel::Error);
    assert!(client.api.cache().is_empty());
}
