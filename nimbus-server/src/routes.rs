//! Request routing for the NimbusKV HTTP API
//!
//! Routing is a pure function from (method, url, body) to a reply, so
//! the whole handler table is unit-testable without opening a socket.
//!
//! | Method | Path              | 200 body                      |
//! |--------|-------------------|-------------------------------|
//! | PUT    | `/database/{key}` | `{"key": .., "value": ..}`    |
//! | GET    | `/database/{key}` | `{"key": .., "value": ..}`    |
//! | DELETE | `/database/{key}` | `{"deleted_key": ..}`         |
//! | GET    | `/snapshot`       | `{"snapshot_csv": ..}`        |
//! | GET    | `/health`         | `OK`                          |
//!
//! Errors are JSON `{"error": ..}`: 400 for an empty key or malformed
//! body, 404 for an absent key or unknown path, 500 if the snapshot
//! export fails.

use nimbus_core::{KvError, SnapshotExporter, Store, Value};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::{error, warn};

/// Shared handler state: the store plus snapshot persistence settings
pub struct AppState {
    pub store: Store,
    /// If set, every snapshot export is also written here
    pub snapshot_persist: Option<PathBuf>,
}

/// A fully-formed HTTP reply
#[derive(Debug, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "error": message.into() }))
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
        }
    }
}

/// PUT request body: `{"value": <any JSON>}`
#[derive(Deserialize)]
struct PutBody {
    value: Value,
}

/// Route a request to its handler
pub fn handle(state: &AppState, method: &str, url: &str, body: &[u8]) -> Reply {
    let path = url.split('?').next().unwrap_or(url);

    if path == "/health" && method == "GET" {
        return Reply::text(200, "OK\n");
    }

    if path == "/snapshot" {
        return match method {
            "GET" => handle_snapshot(state),
            _ => Reply::error(405, "method not allowed"),
        };
    }

    if let Some(key) = database_key(path) {
        return match method {
            "PUT" => handle_put(state, key, body),
            "GET" => handle_get(state, key),
            "DELETE" => handle_delete(state, key),
            _ => Reply::error(405, "method not allowed"),
        };
    }

    Reply::error(404, "not found")
}

/// Extract the key from a `/database/{key}` path
///
/// `/database` and `/database/` both yield the empty key, which the
/// store rejects; the segment is otherwise taken verbatim (keys are
/// opaque strings).
fn database_key(path: &str) -> Option<&str> {
    if path == "/database" {
        return Some("");
    }
    path.strip_prefix("/database/")
}

fn kv_error_reply(err: KvError) -> Reply {
    match err {
        KvError::EmptyKey => Reply::error(400, err.to_string()),
        KvError::KeyNotFound => Reply::error(404, err.to_string()),
    }
}

fn handle_put(state: &AppState, key: &str, body: &[u8]) -> Reply {
    let parsed: PutBody = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(key, error = %e, "rejected malformed PUT body");
            return Reply::error(400, format!("invalid request body: {e}"));
        }
    };

    match state.store.put(key, parsed.value.clone()) {
        Ok(()) => Reply::json(200, json!({ "key": key, "value": parsed.value })),
        Err(e) => kv_error_reply(e),
    }
}

fn handle_get(state: &AppState, key: &str) -> Reply {
    match state.store.get(key) {
        Ok(value) => Reply::json(200, json!({ "key": key, "value": value })),
        Err(e) => kv_error_reply(e),
    }
}

fn handle_delete(state: &AppState, key: &str) -> Reply {
    match state.store.delete(key) {
        Ok(()) => Reply::json(200, json!({ "deleted_key": key })),
        Err(e) => kv_error_reply(e),
    }
}

fn handle_snapshot(state: &AppState) -> Reply {
    let csv = match SnapshotExporter::export(&state.store) {
        Ok(csv) => csv,
        Err(e) => {
            error!(error = %e, "snapshot export failed");
            return Reply::error(500, format!("snapshot failed: {e}"));
        }
    };

    if let Some(path) = &state.snapshot_persist {
        if let Err(e) = SnapshotExporter::write_to_path(&state.store, path) {
            error!(path = %path.display(), error = %e, "snapshot persistence failed");
            return Reply::error(500, format!("snapshot failed: {e}"));
        }
    }

    Reply::json(200, json!({ "snapshot_csv": csv }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState {
            store: Store::default(),
            snapshot_persist: None,
        }
    }

    fn body_json(reply: &Reply) -> serde_json::Value {
        serde_json::from_str(&reply.body).unwrap()
    }

    #[test]
    fn test_put_get_delete_cycle() {
        let state = state();

        let reply = handle(
            &state,
            "PUT",
            "/database/testkey",
            br#"{"value": {"num": 7, "text": "abc"}}"#,
        );
        assert_eq!(reply.status, 200);
        assert_eq!(
            body_json(&reply),
            json!({"key": "testkey", "value": {"num": 7, "text": "abc"}})
        );

        let reply = handle(&state, "GET", "/database/testkey", b"");
        assert_eq!(reply.status, 200);
        assert_eq!(body_json(&reply)["value"], json!({"num": 7, "text": "abc"}));

        let reply = handle(&state, "DELETE", "/database/testkey", b"");
        assert_eq!(reply.status, 200);
        assert_eq!(body_json(&reply), json!({"deleted_key": "testkey"}));

        let reply = handle(&state, "GET", "/database/testkey", b"");
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn test_get_missing_key_is_404() {
        let state = state();
        let reply = handle(&state, "GET", "/database/ghost", b"");
        assert_eq!(reply.status, 404);
        assert!(body_json(&reply)["error"].is_string());
    }

    #[test]
    fn test_delete_missing_key_is_404() {
        let state = state();
        assert_eq!(handle(&state, "DELETE", "/database/ghost", b"").status, 404);
    }

    #[test]
    fn test_empty_key_is_400() {
        let state = state();
        assert_eq!(
            handle(&state, "PUT", "/database/", br#"{"value": 1}"#).status,
            400
        );
        assert_eq!(handle(&state, "GET", "/database/", b"").status, 400);
        assert_eq!(handle(&state, "DELETE", "/database", b"").status, 400);
    }

    #[test]
    fn test_malformed_put_body_is_400() {
        let state = state();
        assert_eq!(handle(&state, "PUT", "/database/k", b"not json").status, 400);
        assert_eq!(
            handle(&state, "PUT", "/database/k", br#"{"wrong": 1}"#).status,
            400
        );
        // the invalid body must not create the key
        assert_eq!(handle(&state, "GET", "/database/k", b"").status, 404);
    }

    #[test]
    fn test_put_value_round_trips_through_response() {
        let state = state();
        let payload = br#"{"value": {"nested": {"float": 0.25, "list": [1, 2, 3], "map": {"a": 1}}}}"#;
        handle(&state, "PUT", "/database/k", payload);

        let reply = handle(&state, "GET", "/database/k", b"");
        assert_eq!(
            body_json(&reply)["value"],
            json!({"nested": {"float": 0.25, "list": [1, 2, 3], "map": {"a": 1}}})
        );
    }

    #[test]
    fn test_snapshot_contains_all_rows() {
        let state = state();
        for i in 0..10 {
            let body = format!(r#"{{"value": {{"id": {i}}}}}"#);
            handle(&state, "PUT", &format!("/database/test_{i}"), body.as_bytes());
        }

        let reply = handle(&state, "GET", "/snapshot", b"");
        assert_eq!(reply.status, 200);
        let csv = body_json(&reply)["snapshot_csv"].as_str().unwrap().to_string();
        assert!(csv.starts_with("key,value\n"));
        assert_eq!(csv.lines().count(), 11);
        assert!(csv.contains(r#"test_3,"{""id"":3}""#));
    }

    #[test]
    fn test_snapshot_persists_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.csv");
        let state = AppState {
            store: Store::default(),
            snapshot_persist: Some(path.clone()),
        };
        handle(&state, "PUT", "/database/k", br#"{"value": 1}"#);

        let reply = handle(&state, "GET", "/snapshot", b"");
        assert_eq!(reply.status, 200);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            body_json(&reply)["snapshot_csv"].as_str().unwrap()
        );
    }

    #[test]
    fn test_unknown_route_is_404() {
        let state = state();
        assert_eq!(handle(&state, "GET", "/nope", b"").status, 404);
    }

    #[test]
    fn test_wrong_method_is_405() {
        let state = state();
        assert_eq!(handle(&state, "POST", "/database/k", b"{}").status, 405);
        assert_eq!(handle(&state, "DELETE", "/snapshot", b"").status, 405);
    }

    #[test]
    fn test_health_route() {
        let state = state();
        let reply = handle(&state, "GET", "/health", b"");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, "OK\n");
    }

    #[test]
    fn test_query_string_is_ignored() {
        let state = state();
        handle(&state, "PUT", "/database/k?ts=1", br#"{"value": 5}"#);
        let reply = handle(&state, "GET", "/database/k", b"");
        assert_eq!(body_json(&reply)["value"], json!(5));
    }
}
