//! End-to-end tests of the REST API over a real socket.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use spbu_auth::AuthConfig;
use spbu_db::{DEMO_PASSWORD, Database, seed_demo};
use spbu_server::AppState;
use tokio::net::TcpListener;

struct TestServer {
    base: String,
    http: Client,
}

impl TestServer {
    async fn spawn() -> Self {
        let db = Database::new();
        seed_demo(&db, None).await.unwrap();
        let config = AuthConfig {
            jwt_secret: "api-test-secret".into(),
            ..Default::default()
        };
        let state = AppState::new(db, config);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(spbu_server::serve(listener, state));
        Self {
            base: format!("http://{addr}"),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn login(&self, username: &str) -> String {
        let res = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": DEMO_PASSWORD }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn get(&self, token: &str, path: &str) -> (StatusCode, Value) {
        let res = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn post(&self, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn put(&self, token: &str, path: &str) -> (StatusCode, Value) {
        let res = self
            .http
            .put(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        (res.status(), res.json().await.unwrap())
    }
}

fn fuel_gain(quantity: f64) -> Value {
    json!({
        "type": "fuel",
        "tankId": 5,
        "adjustmentType": "gain",
        "quantity": quantity,
        "description": "Selisih stok"
    })
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::spawn().await;
    let res = server.http.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let server = TestServer::spawn().await;
    let mut messages = Vec::new();
    for (username, password) in [("operator", "wrong-password"), ("nobody", DEMO_PASSWORD)] {
        let res = server
            .http
            .post(server.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        messages.push(body["message"].as_str().unwrap().to_string());
    }
    assert_eq!(messages[0], messages[1]);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let server = TestServer::spawn().await;
    let res = server.http.get(server.url("/api/tanks")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].is_string());

    let (status, _) = server.get("not-a-jwt", "/api/tanks").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_reports_evaluated_permissions() {
    let server = TestServer::spawn().await;
    let token = server.login("operator").await;

    let (status, body) = server.get(&token, "/api/auth/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "operator");
    assert_eq!(body["data"]["permissions"]["adjustments"], "limited");
    assert_eq!(body["data"]["permissions"]["tanks"], "read-only");
    assert_eq!(body["data"]["permissions"]["users"], "none");
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let server = TestServer::spawn().await;
    let token = server.login("admin").await;

    let (status, body) = server.post(&token, "/api/auth/logout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (status, _) = server.get(&token, "/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn adjustment_round_trip() {
    let server = TestServer::spawn().await;
    let operator = server.login("operator").await;
    let admin = server.login("admin").await;

    let (status, created) = server
        .post(&operator, "/api/adjustments", fuel_gain(250.0))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["status"], "pending");
    assert_eq!(created["data"]["spbuId"], 1);
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, listed) = server
        .get(&operator, "/api/adjustments?status=pending")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["id"], id);

    let (status, approved) = server
        .put(&admin, &format!("/api/adjustments/{id}/approve"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["data"]["status"], "approved");

    let (_, tank) = server.get(&admin, "/api/tanks/5").await;
    assert_eq!(tank["data"]["currentStock"], 4_250.0);

    let (status, body) = server
        .put(&admin, &format!("/api/adjustments/{id}/reject"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("approved"));
}

#[tokio::test]
async fn creation_and_decision_rules_are_enforced() {
    let server = TestServer::spawn().await;
    let operator = server.login("operator").await;
    let admin = server.login("admin").await;

    let (status, _) = server
        .post(&admin, "/api/adjustments", fuel_gain(10.0))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, created) = server
        .post(&operator, "/api/adjustments", fuel_gain(10.0))
        .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let (status, _) = server
        .put(&operator, &format!("/api/adjustments/{id}/approve"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = server
        .post(&operator, "/api/adjustments", json!({ "type": "other", "quantity": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.get(&admin, "/api/adjustments/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delivery_confirmation_fills_the_tank() {
    let server = TestServer::spawn().await;
    let operator = server.login("operator").await;
    let admin = server.login("admin").await;

    let (status, created) = server
        .post(
            &operator,
            "/api/deliveries",
            json!({
                "tankId": 1,
                "supplier": "Pertamina Patra Niaga",
                "volume": 8000.0,
                "deliveryOrderNumber": "DO-0001"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_i64().unwrap();

    let (_, ready) = server
        .get(&admin, "/api/deliveries/ready-for-confirmation")
        .await;
    assert_eq!(ready["data"].as_array().unwrap().len(), 1);

    let (status, confirmed) = server
        .put(&admin, &format!("/api/deliveries/{id}/confirm"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["data"]["status"], "approved");

    let (_, tank) = server.get(&admin, "/api/tanks/1").await;
    assert_eq!(tank["data"]["currentStock"], 20_000.0);

    let (_, ready) = server
        .get(&admin, "/api/deliveries/ready-for-confirmation")
        .await;
    assert!(ready["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deposits_count_towards_the_report_once_approved() {
    let server = TestServer::spawn().await;
    let operator = server.login("operator").await;
    let admin = server.login("admin").await;

    let (status, created) = server
        .post(
            &operator,
            "/api/deposits",
            json!({ "amount": 5_000_000, "method": "cash", "depositDate": "2024-05-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_i64().unwrap();

    let (_, before) = server.get(&admin, "/api/reports/summary").await;
    assert_eq!(before["data"]["pendingDeposits"], 1);
    assert_eq!(before["data"]["approvedDepositAmount"], 0);

    server
        .put(&admin, &format!("/api/deposits/{id}/approve"))
        .await;
    let (_, after) = server.get(&admin, "/api/reports/summary").await;
    assert_eq!(after["data"]["pendingDeposits"], 0);
    assert_eq!(after["data"]["approvedDepositAmount"], 5_000_000);

    let (status, _) = server.get(&operator, "/api/reports/summary").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn sales_are_priced_and_listed() {
    let server = TestServer::spawn().await;
    let operator = server.login("operator").await;

    let (status, sale) = server
        .post(&operator, "/api/sales", json!({ "tankId": 1, "volume": 20.0 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["data"]["amount"], 200_000);

    let (_, sales) = server.get(&operator, "/api/sales").await;
    assert_eq!(sales["data"].as_array().unwrap().len(), 1);

    let (status, price) = server
        .get(&operator, "/api/prices/current?fuelType=Solar")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(price["data"]["price"], 6_800);
}

#[tokio::test]
async fn admins_may_only_add_operators_to_their_station() {
    let server = TestServer::spawn().await;
    let operator = server.login("operator").await;
    let admin = server.login("admin").await;

    let new_user = |username: &str, role: &str| {
        json!({
            "username": username,
            "name": "New User",
            "password": "long-enough-password",
            "roles": [role]
        })
    };

    let (status, _) = server
        .post(&operator, "/api/users", new_user("op2", "Operator"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = server
        .post(&admin, "/api/users", new_user("admin2", "Admin"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = server
        .post(&admin, "/api/users", new_user("op2", "Operator"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["spbuId"], 1);

    let (status, _) = server
        .post(&admin, "/api/users", new_user("op2", "Operator"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn operators_cannot_see_stations() {
    let server = TestServer::spawn().await;
    let operator = server.login("operator").await;
    let superadmin = server.login("superadmin").await;

    let (status, _) = server.get(&operator, "/api/spbu").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stations) = server.get(&superadmin, "/api/spbu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stations["data"][0]["code"], "34.401.01");
}
