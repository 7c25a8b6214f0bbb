//! # HTTP Server Integration Tests
//!
//! Drives the axum router in-process with `axum-test`.
//!
//! These tests verify:
//! - Defaults endpoint secret gating (prefill flag plus bearer token)
//! - Bearer-token protection of the provisioning endpoint
//! - Error bodies and status codes for validation and pipeline failures
//! - JSON 404 for unknown API routes and the SPA fallback for everything else
//! - API routes served behind a path prefix
//! - Health and metrics endpoints

#![cfg(unix)]

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{serial, valid_request, Workspace, FAILING_OC, FAKE_HELM, FAKE_OC, SUMMIT_TEMPLATE};
use hive_provisioner::config::{FieldDefaults, ProvisionerConfig, ServerConfig};
use hive_provisioner::observability::metrics;
use hive_provisioner::server::{router, AppState};
use hive_provisioner::Provisioner;
use serde_json::{json, Value};
use std::path::Path;

const TOKEN: &str = "s3cret-admin";

fn defaults() -> FieldDefaults {
    FieldDefaults::from_lookup(|key| match key {
        "BASE_DOMAIN" => Some("sandbox.example.com".to_string()),
        "AWS_SECRET_ACCESS_KEY" => Some("from-env-secret".to_string()),
        _ => None,
    })
}

fn server_with(provisioner: ProvisionerConfig, server: ServerConfig) -> TestServer {
    let state = AppState::new(Provisioner::new(provisioner), server, defaults());
    TestServer::new(router(state)).expect("build test server")
}

fn protected(static_dir: &Path) -> ServerConfig {
    ServerConfig {
        admin_token: Some(TOKEN.to_string()),
        static_dir: static_dir.to_path_buf(),
        ..ServerConfig::default()
    }
}

#[tokio::test]
async fn test_defaults_without_prefill_hide_secrets() {
    let ws = Workspace::new();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    let response = server.get("/api/defaults").authorization_bearer(TOKEN).await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["ok"], true);
    assert_eq!(body["includeSecrets"], false);
    assert_eq!(body["defaults"]["BASE_DOMAIN"], "sandbox.example.com");
    assert_eq!(body["defaults"]["ROADSHOW"], "roadshow");
    assert!(body["defaults"].get("AWS_SECRET_ACCESS_KEY").is_none());
    assert!(body["note"].as_str().unwrap().contains("not enabled"));
}

#[tokio::test]
async fn test_defaults_with_prefill_require_token() {
    let ws = Workspace::new();
    let config = ServerConfig {
        prefill_secrets: true,
        ..protected(ws.dir.path())
    };
    let server = server_with(ProvisionerConfig::default(), config);

    let anonymous: Value = server.get("/api/defaults").await.json();
    assert_eq!(anonymous["includeSecrets"], false);
    assert!(anonymous["note"].as_str().unwrap().contains("require ADMIN_TOKEN"));
    assert!(anonymous["defaults"].get("AWS_SECRET_ACCESS_KEY").is_none());

    let authorized: Value = server
        .get("/api/defaults/")
        .authorization_bearer(TOKEN)
        .await
        .json();
    assert_eq!(authorized["includeSecrets"], true);
    assert_eq!(authorized["defaults"]["AWS_SECRET_ACCESS_KEY"], "from-env-secret");
    assert_eq!(authorized["defaults"]["PULL_SECRET"], "");
    assert!(authorized.get("note").is_none());
}

#[tokio::test]
async fn test_configure_rejects_missing_or_wrong_token() {
    let ws = Workspace::new();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    let response = server
        .post("/api/configure-hive-tenants-roadshow")
        .json(&valid_request())
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "ok": false, "error": "Unauthorized" }));

    let response = server
        .post("/api/configure-hive-tenants-roadshow")
        .authorization_bearer("wrong")
        .json(&valid_request())
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_configure_empty_body_lists_every_missing_field() {
    let ws = Workspace::new();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    let response = server
        .post("/api/configure-hive-tenants-roadshow")
        .authorization_bearer(TOKEN)
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "ok": false,
        "error": "Missing required fields: AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, GUID, \
                  ROADSHOW, BASE_DOMAIN, PULL_SECRET, SSH_PUBLIC_KEY"
    }));
}

#[tokio::test]
async fn test_configure_rejects_non_object_body() {
    let ws = Workspace::new();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    let response = server
        .post("/api/configure-hive-tenants-roadshow")
        .authorization_bearer(TOKEN)
        .json(&json!(["GUID"]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_configure_invalid_pull_secret_is_bad_request() {
    let ws = Workspace::new();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    let mut request = valid_request();
    request["PULL_SECRET"] = json!("not-json");
    let response = server
        .post("/api/configure-hive-tenants-roadshow")
        .authorization_bearer(TOKEN)
        .json(&request)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("PULL_SECRET must be valid JSON"));
    assert!(!response.text().contains("not-json"));
}

#[tokio::test]
async fn test_configure_success_returns_oc_output() {
    let _guard = serial().await;
    let ws = Workspace::new();
    ws.write_template("summit", SUMMIT_TEMPLATE);
    let helm = ws.script("helm", FAKE_HELM);
    let oc = ws.script("oc", FAKE_OC);
    let server = server_with(ws.config(&helm, &oc), protected(ws.dir.path()));

    let response = server
        .post("/api/configure-hive-tenants-roadshow/")
        .authorization_bearer(TOKEN)
        .json(&valid_request())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["message"], "configure_hive_tenants_roadshow ran OK");
    assert!(body["ocStdout"]
        .as_str()
        .unwrap()
        .contains("baseDomain: sandbox.example.com"));
    assert_eq!(body["ocStderr"], "oc-args: apply -f -\n");
}

#[tokio::test]
async fn test_configure_apply_failure_returns_details() {
    let _guard = serial().await;
    let ws = Workspace::new();
    ws.write_template("summit", SUMMIT_TEMPLATE);
    let helm = ws.script("helm", FAKE_HELM);
    let oc = ws.script("oc", FAILING_OC);
    let server = server_with(ws.config(&helm, &oc), protected(ws.dir.path()));

    let response = server
        .post("/api/configure-hive-tenants-roadshow")
        .authorization_bearer(TOKEN)
        .json(&valid_request())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "oc apply failed");
    assert_eq!(body["details"]["helmExitCode"], 0);
    assert_eq!(body["details"]["ocExitCode"], 1);
    assert_eq!(
        body["details"]["ocStderr"],
        "error: admission webhook denied the request\n"
    );
}

#[tokio::test]
async fn test_configure_without_token_configured_is_open() {
    let ws = Workspace::new();
    let config = ServerConfig {
        static_dir: ws.dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let server = server_with(ProvisionerConfig::default(), config);

    // Reaches validation instead of the auth layer
    let response = server
        .post("/api/configure-hive-tenants-roadshow")
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let ws = Workspace::new();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    for path in ["/api", "/api/", "/api/unknown", "/api/defaults/extra", "/hive-ui/api/unknown"] {
        let response = server.get(path).await;
        response.assert_status_not_found();
        response.assert_json(&json!({ "ok": false, "error": "API route not found" }));
    }
}

#[tokio::test]
async fn test_non_api_paths_fall_back_to_index() {
    let ws = Workspace::new();
    std::fs::write(ws.dir.path().join("index.html"), "<html>hive</html>").unwrap();
    std::fs::write(ws.dir.path().join("app.js"), "console.log(1)").unwrap();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    let asset = server.get("/app.js").await;
    asset.assert_status_ok();
    asset.assert_text("console.log(1)");

    let deep_link = server.get("/clusters/summit").await;
    deep_link.assert_status_ok();
    deep_link.assert_text("<html>hive</html>");
}

#[tokio::test]
async fn test_health_and_metrics() {
    metrics::register_metrics().expect("register metrics");
    metrics::increment_runs_total();

    let ws = Workspace::new();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    let health = server.get("/healthz").await;
    health.assert_status_ok();
    health.assert_text("ok");

    let scrape = server.get("/metrics").await;
    scrape.assert_status_ok();
    assert!(scrape.text().contains("hive_provisioner_runs_total"));
}

#[tokio::test]
async fn test_wrong_method_on_api_route_is_json_404() {
    let ws = Workspace::new();
    std::fs::write(ws.dir.path().join("index.html"), "<html>spa</html>").unwrap();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    let response = server.post("/api/defaults").json(&json!({})).await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "ok": false, "error": "API route not found" }));

    // Unauthenticated: the method check comes before the token check
    let response = server.get("/api/configure-hive-tenants-roadshow").await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "ok": false, "error": "API route not found" }));
}

#[tokio::test]
async fn test_defaults_served_behind_sub_path() {
    let ws = Workspace::new();
    std::fs::write(ws.dir.path().join("index.html"), "<html>spa</html>").unwrap();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    for path in ["/hive-ui/api/defaults", "/hive-ui/api/defaults/", "/a/b/api/defaults"] {
        let response = server.get(path).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["ok"], true, "{path}");
        assert_eq!(body["defaults"]["BASE_DOMAIN"], "sandbox.example.com", "{path}");
    }

    // Non-API paths under the prefix still get the UI
    let page = server.get("/hive-ui/clusters").await;
    page.assert_status_ok();
    page.assert_text("<html>spa</html>");
}

#[tokio::test]
async fn test_configure_served_behind_sub_path() {
    let ws = Workspace::new();
    std::fs::write(ws.dir.path().join("index.html"), "<html>spa</html>").unwrap();
    let server = server_with(ProvisionerConfig::default(), protected(ws.dir.path()));

    let response = server
        .post("/hive-ui/api/configure-hive-tenants-roadshow")
        .json(&valid_request())
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "ok": false, "error": "Unauthorized" }));

    let response = server
        .post("/hive-ui/api/configure-hive-tenants-roadshow/")
        .authorization_bearer(TOKEN)
        .json(&json!({ "GUID": "abc12" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Missing required fields: AWS_ACCESS_KEY_ID"));
}

#[tokio::test]
async fn test_missing_template_error_hides_server_path() {
    let ws = Workspace::new();
    let server = server_with(
        ws.config(Path::new("/nonexistent/helm"), Path::new("/nonexistent/oc")),
        protected(ws.dir.path()),
    );

    let response = server
        .post("/api/configure-hive-tenants-roadshow")
        .authorization_bearer(TOKEN)
        .json(&valid_request())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "ok": false,
        "error": "install-config template summit-install-config.yaml not found"
    }));
    assert!(!response
        .text()
        .contains(&*ws.template_root().to_string_lossy()));
}
