//! HTTP server for NimbusKV
//!
//! Binds a `tiny_http` server and drives it with a fixed pool of worker
//! threads. `tiny_http` allows concurrent `recv()` from many threads on
//! one listener, so each worker independently accepts, routes, and
//! responds; store operations never block across requests because every
//! core operation is bounded in-memory work.

use crate::routes::{self, AppState};
use anyhow::{anyhow, Result};
use std::io::Read;
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Response, Server};
use tracing::{error, info, warn};

/// Largest accepted request body (PUT values), in bytes
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Run the HTTP server until the process exits
///
/// Spawns `num_workers` worker threads sharing one listener and blocks
/// on them. Workers only exit if the listener itself fails.
pub fn run(state: Arc<AppState>, listen_addr: &str, num_workers: usize) -> Result<()> {
    let server =
        Arc::new(Server::http(listen_addr).map_err(|e| anyhow!("bind http at {listen_addr}: {e}"))?);
    info!(addr = listen_addr, workers = num_workers, "http server listening");

    let mut handles = Vec::with_capacity(num_workers);
    for worker_id in 0..num_workers {
        let server = Arc::clone(&server);
        let state = Arc::clone(&state);
        handles.push(
            thread::Builder::new()
                .name(format!("http-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, server, state))?,
        );
    }

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow!("http worker panicked"))?;
    }
    Ok(())
}

fn worker_loop(worker_id: usize, server: Arc<Server>, state: Arc<AppState>) {
    info!(worker_id, "worker started");
    loop {
        let mut request = match server.recv() {
            Ok(request) => request,
            Err(e) => {
                error!(worker_id, error = %e, "http recv failed, worker exiting");
                return;
            }
        };

        let method = request.method().as_str().to_string();
        let url = request.url().to_string();

        let mut body = Vec::new();
        if let Err(e) = request
            .as_reader()
            .take(MAX_BODY_BYTES as u64 + 1)
            .read_to_end(&mut body)
        {
            warn!(worker_id, %method, %url, error = %e, "failed to read request body");
            continue;
        }

        let reply = if body.len() > MAX_BODY_BYTES {
            warn!(worker_id, %method, %url, "request body too large");
            oversized_reply()
        } else {
            routes::handle(&state, &method, &url, &body)
        };

        let status = reply.status;
        let mut response = Response::from_string(reply.body).with_status_code(reply.status);
        if let Ok(ct) = Header::from_bytes(b"Content-Type".as_slice(), reply.content_type.as_bytes())
        {
            response = response.with_header(ct);
        }

        if let Err(e) = request.respond(response) {
            warn!(worker_id, %method, %url, error = %e, "failed to send response");
        } else if status >= 500 {
            warn!(worker_id, %method, %url, status, "request failed");
        }
    }
}

fn oversized_reply() -> routes::Reply {
    routes::Reply {
        status: 413,
        content_type: "application/json",
        body: r#"{"error":"request body too large"}"#.to_string(),
    }
}
