//! # SiteKit HTTP Server Implementation
//!
//! File: cli/src/commands/srv/server_logic.rs
//!
//! ## Overview
//!
//! Serves a guide/tracker site directory and the chatbot API:
//! - `POST /api/chat` with `{"message": "..."}` returns
//!   `{"response": "...", "matched": "<key>" | null}`
//! - `GET /api/knowledge` lists the knowledge base keys (for preset question buttons)
//! - every other path is a static file from the site directory
//!
//! ## Architecture
//!
//! 1. Find an available port, retrying upward if the requested one is taken
//! 2. Build the Axum router (API routes, static fallback, tracing and CORS layers)
//! 3. Serve until Ctrl+C or SIGTERM, then shut down gracefully
//!
use super::config::ServerConfig;
use super::utils;
use crate::chatbot::responder::KeywordResponder;
use crate::core::error::Result;
use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, warn, Level};

/// Shared, read-only state handed to the API handlers.
#[derive(Clone)]
struct AppState {
    responder: Arc<KeywordResponder>,
}

#[derive(Deserialize, Debug)]
struct ChatRequest {
    message: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ChatResponse {
    response: String,
    matched: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct KnowledgeResponse {
    keys: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ErrorResponse {
    error: String,
}

/// # Run HTTP Server (`run_server`)
///
/// Serves the site directory and the chat API until a shutdown signal arrives.
///
/// ## Process
///
/// 1. Finds a free port at or above `config.port` with `find_available_port`.
/// 2. Logs the site's pages and whether each is a guide or a tracker.
/// 3. Builds the router with `create_app`, sharing `responder` with the handlers.
/// 4. Prints the startup banner (directory, URLs, chat endpoint, CORS).
/// 5. Binds the listener and serves with graceful shutdown on `shutdown_signal`.
///
/// ## Arguments
///
/// * `config`: Effective server settings from `load_and_merge_config`.
/// * `responder`: Keyword responder answering `POST /api/chat`.
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` once the server has shut down cleanly.
///
/// ## Errors
///
/// Fails if no port is available within the allowed attempts, if binding the
/// listener fails, or if the server itself errors.
pub async fn run_server(config: ServerConfig, responder: Arc<KeywordResponder>) -> Result<()> {
    // Settle on the address first so the banner shows the real port.
    let max_port_attempts = 10;
    let addr = find_available_port(config.host, config.port, max_port_attempts).await?;

    utils::log_site_pages(&config.directory);
    let local_ip = utils::get_local_ip();
    let knowledge_entries = responder.knowledge().len();
    let app = create_app(&config, responder);

    println!("\n=================================================================");
    println!("📂 Serving site from:  {}", config.directory.display());
    println!("🌐 Local URL:          http://localhost:{}", addr.port());
    if local_ip != "localhost" {
        println!("🔗 Network URL:        http://{}:{}", local_ip, addr.port());
    }
    println!("⚙️  Binding to address: {}", addr);
    println!("💬 Chat endpoint:      POST /api/chat ({} entries)", knowledge_entries);
    println!("🔒 CORS enabled:       {}", config.enable_cors);
    println!("=================================================================\n");

    info!(
        "Starting server on {} for directory {}",
        addr,
        config.directory.display()
    );
    println!("Server starting! Press Ctrl+C to stop.");

    // Bind the TCP listener to the chosen address.
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    // Serve until Ctrl+C / SIGTERM; in-flight requests are allowed to finish.
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// # Handle Shutdown Signal (`shutdown_signal`)
///
/// Resolves when Ctrl+C or (on Unix) SIGTERM is received. Passed to
/// `with_graceful_shutdown` so open connections can drain.
///
/// If a handler cannot be installed its branch stays pending forever and the
/// other signal still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    // No SIGTERM outside Unix.
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port` and the following ports, up to `max_attempts` in total.
/// Each candidate is bound and released immediately.
///
/// ## Arguments
///
/// * `req_host`: Address to bind on.
/// * `start_port`: First port to try.
/// * `max_attempts`: Number of consecutive ports to try.
///
/// ## Returns
///
/// * `Result<SocketAddr>`: The first address that could be bound.
///
/// ## Errors
///
/// Fails when every attempt is taken or the port range is exhausted.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = current_port.checked_add(1).with_context(|| {
                    format!("Ran out of ports above {} on host {}", start_port, req_host)
                })?;
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// ## Process
///
/// 1. Picks a permissive or empty CORS layer from `config.enable_cors`.
/// 2. Sets up request tracing at `INFO`.
/// 3. Routes `/api/chat` and `/api/knowledge`; every other path falls
///    through to `ServeDir` over the site directory.
/// 4. Attaches the shared `AppState`.
///
/// ## Returns
///
/// * `Router`: Ready to serve; no I/O happens until it is polled.
fn create_app(config: &ServerConfig, responder: Arc<KeywordResponder>) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/knowledge", get(knowledge_handler))
        .fallback_service(ServeDir::new(&config.directory))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer),
        )
        .with_state(AppState { responder })
}

/// # Chat Endpoint (`POST /api/chat`)
///
/// ## Process
///
/// 1. Trims the message and rejects it if nothing is left.
/// 2. Looks up the longest matching key once and reuses it for both fields.
///
/// ## Returns
///
/// * `200 {"response": ..., "matched": key | null}` for any non-empty message;
///   unmatched messages get the configured fallback.
/// * `400 {"error": ...}` for empty or whitespace-only messages.
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let message = request.message.trim();
    if message.is_empty() {
        debug!("Rejecting empty chat message");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message must not be empty.".to_string(),
            }),
        ));
    }

    // `None` means fallback; `matched` stays null in that case.
    let found = state.responder.find_match(message);
    let response = ChatResponse {
        response: found
            .map_or(state.responder.fallback(), |m| m.response)
            .to_string(),
        matched: found.map(|m| m.key.to_string()),
    };
    debug!(matched = ?response.matched, "Answered chat message");
    Ok(Json(response))
}

/// `GET /api/knowledge`: keys in lookup order.
async fn knowledge_handler(State(state): State<AppState>) -> Json<KnowledgeResponse> {
    Json(KnowledgeResponse {
        keys: state
            .responder
            .knowledge()
            .entries()
            .iter()
            .map(|e| e.key().to_string())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::knowledge::KnowledgeBase;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;
    use tokio::fs;
    use tower::ServiceExt;

    fn test_app(dir: &TempDir) -> Router {
        let config = ServerConfig {
            port: 0,
            host: Ipv4Addr::LOCALHOST.into(),
            directory: dir.path().to_path_buf(),
            enable_cors: true,
        };
        let knowledge = KnowledgeBase::new([("oop in java", "R1"), ("java", "R2")]).unwrap();
        create_app(&config, Arc::new(KeywordResponder::new(knowledge, "fallback")))
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_find_available_port_start_is_free() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 50100;
        let addr = find_available_port(host, start_port, 5).await?;
        assert_eq!(addr.port(), start_port);
        assert_eq!(addr.ip(), host);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_start_occupied() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 51100;
        let _listener = TcpListener::bind(SocketAddr::new(host, start_port)).await?;

        let addr = find_available_port(host, start_port, 5).await?;
        assert!(addr.port() > start_port);
        assert!(addr.port() < start_port + 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_chat_endpoint_longest_match() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(chat_request(r#"{"message": "Tell me about OOP in Java"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ChatResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(
            body,
            ChatResponse {
                response: "R1".into(),
                matched: Some("oop in java".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_chat_endpoint_fallback() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(chat_request(r#"{"message": "random unrelated text"}"#))
            .await
            .unwrap();
        let body: ChatResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body.response, "fallback");
        assert_eq!(body.matched, None);
    }

    #[tokio::test]
    async fn test_chat_endpoint_rejects_empty_message() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(chat_request(r#"{"message": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(body.error.contains("must not be empty"));
    }

    #[tokio::test]
    async fn test_knowledge_endpoint_lists_keys_in_order() {
        let dir = TempDir::new().unwrap();
        let request = Request::builder()
            .uri("/api/knowledge")
            .body(Body::empty())
            .unwrap();
        let response = test_app(&dir).oneshot(request).await.unwrap();
        let body: KnowledgeResponse =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body.keys, vec!["oop in java", "java"]);
    }

    #[tokio::test]
    async fn test_static_files_are_served() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html>Guide</html>")
            .await
            .unwrap();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = test_app(&dir).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"<html>Guide</html>");

        let request = Request::builder()
            .uri("/missing.html")
            .body(Body::empty())
            .unwrap();
        let response = test_app(&dir).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shutdown_signal_creation() {
        let shutdown_future = shutdown_signal();
        drop(shutdown_future);
    }
}
