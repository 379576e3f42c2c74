#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use amitherm_api::models::{FanSpeed, HeatingMode, Season, VentilationMode};
use amitherm_api::{ApiClient, ApiConfig, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let config = ApiConfig {
        host: server.uri(),
        username: "admin".into(),
        password: SecretString::from("test-password".to_string()),
        timeout: Duration::from_secs(5),
    };
    (server, ApiClient::new(config))
}

/// Mount the login/logout pair that every connection-scoped call performs.
async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({
            "username": "admin",
            "password": "test-password"
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn check_auth_accepts_valid_credentials() {
    let (server, client) = setup().await;
    mount_auth(&server).await;

    assert!(client.check_auth().await.unwrap());
}

#[tokio::test]
async fn check_auth_reports_rejected_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert!(!client.check_auth().await.unwrap());
}

#[tokio::test]
async fn fetch_propagates_login_rejection() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.fetch_overview().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Queries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_overview_parses_payload() {
    let (server, client) = setup().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperature": 21.4,
            "air_temperature": 20.1,
            "co2": 650.0,
            "season": "winter"
        })))
        .mount(&server)
        .await;

    let overview = client.fetch_overview().await.unwrap();
    assert_eq!(overview.temperature, Some(21.4));
    assert_eq!(overview.co2, Some(650.0));
    assert_eq!(overview.season, Season::Winter);
}

#[tokio::test]
async fn fetch_heating_parses_payload() {
    let (server, client) = setup().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/heating"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mode": "scheduled",
            "actual_temperature": 21.0,
            "set_temperature": 22.5
        })))
        .mount(&server)
        .await;

    let heating = client.fetch_heating().await.unwrap();
    assert_eq!(heating.heating_mode, HeatingMode::Scheduled);
    assert_eq!(heating.set_temperature, 22.5);
}

#[tokio::test]
async fn fetch_ventilation_parses_payload() {
    let (server, client) = setup().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/ventilation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mode": "auto",
            "speed": "medium",
            "air_temp_current": 19.5,
            "air_temp_setpoint": 21.0,
            "co2_setpoint": 800.0,
            "heating": false
        })))
        .mount(&server)
        .await;

    let ventilation = client.fetch_ventilation().await.unwrap();
    assert_eq!(ventilation.ventilation_mode, VentilationMode::Auto);
    assert_eq!(ventilation.ventilation_speed, FanSpeed::Medium);
    assert!(!ventilation.is_heating);
}

#[tokio::test]
async fn fetch_surfaces_malformed_payload() {
    let (server, client) = setup().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/heating"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.fetch_heating().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn set_ventilation_sends_mode_body() {
    let (server, client) = setup().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/ventilation/mode"))
        .and(body_json(json!({ "mode": "high" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_ventilation(VentilationMode::High)
        .await
        .unwrap();
}

#[tokio::test]
async fn set_heating_mode_sends_mode_body() {
    let (server, client) = setup().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/heating/mode"))
        .and(body_json(json!({ "mode": "comfort" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.set_heating_mode(HeatingMode::Comfort).await.unwrap();
}

#[tokio::test]
async fn set_target_co2_sends_value_body() {
    let (server, client) = setup().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/ventilation/co2"))
        .and(body_json(json!({ "value": 900.0 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.set_target_co2(900.0).await.unwrap();
}

#[tokio::test]
async fn command_rejection_maps_to_api_error() {
    let (server, client) = setup().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/season"))
        .respond_with(ResponseTemplate::new(500).set_body_string("relay fault"))
        .mount(&server)
        .await;

    let result = client.set_season(Season::Summer).await;
    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "relay fault");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
