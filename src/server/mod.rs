//! HTTP server: routes, middleware and lifecycle
//!
//! ```text
//!   request ─► log ─► cors ─► bearer guard ─► /api/health
//!                                          └► /ws/gateway ─► playback task
//! ```

mod auth;
mod handlers;
mod logging;
mod socket;

pub use auth::{bearer_token, AuthGuard, API_PREFIX};
pub use handlers::NOT_A_WEBSOCKET;

use axum::{middleware, routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::{Clock, GatewaySequence, SystemClock};
use crate::health::HealthDocument;

pub const HEALTH_PATH: &str = "/api/health";
pub const GATEWAY_PATH: &str = "/ws/gateway";

/// Read-only state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub health: Arc<HealthDocument>,
    pub sequence: Arc<GatewaySequence>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Self {
        AppState {
            health: Arc::new(HealthDocument::build(&config.health)),
            sequence: Arc::new(GatewaySequence::from_config(&config.gateway)),
            clock,
        }
    }
}

/// Build the router for `config`, timing playback with `clock`
pub fn build_router(config: &Config, clock: Arc<dyn Clock>) -> Router {
    let state = AppState::new(config, clock);

    let mut guard = AuthGuard::new(config.auth.token.clone());
    if config.gateway.require_auth {
        guard = guard.protect(GATEWAY_PATH);
    }

    let mut app = Router::new()
        .route(HEALTH_PATH, get(handlers::health))
        .route(GATEWAY_PATH, get(handlers::gateway))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            Arc::new(guard),
            auth::require_bearer,
        ));

    if config.server.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.layer(middleware::from_fn(logging::log_request))
}

/// A bound, not yet running, mock server
pub struct Server {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl Server {
    /// Bind with the wall clock
    pub async fn bind(config: &Config) -> Result<Self> {
        Self::bind_with_clock(config, Arc::new(SystemClock)).await
    }

    pub async fn bind_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        info!("started on {}", local_addr.port());
        info!("Mock server listening on http://{}", local_addr);

        Ok(Server {
            listener,
            router: build_router(config, clock),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    /// Serve on a background task
    pub fn spawn(self) -> ServerHandle {
        let local_addr = self.local_addr;
        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(self.run_until(async {
            let _ = rx.await;
        }));

        ServerHandle {
            local_addr,
            shutdown: Some(tx),
            task,
        }
    }
}

/// A server running on a background task
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.local_addr, path)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.local_addr, path)
    }

    /// Stop accepting connections and wait for the task
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task
            .await
            .map_err(|e| Error::Socket(format!("server task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HealthShape, MissingArtifact};
    use crate::gateway::ManualClock;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use futures::{SinkExt, StreamExt};
    use std::time::Duration;
    use tokio_tungstenite::tungstenite::Message;
    use tower::ServiceExt;

    fn router(config: &Config) -> Router {
        build_router(config, Arc::new(ManualClock::new(chrono::Utc::now())))
    }

    async fn send_get(app: Router, path: &str, auth: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().uri(path);
        if let Some(auth) = auth {
            request = request.header(header::AUTHORIZATION, auth);
        }

        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_requires_token() {
        let app = router(&Config::default());

        let (status, body) = send_get(app.clone(), HEALTH_PATH, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Unauthorized");

        let (status, body) = send_get(app.clone(), HEALTH_PATH, Some("Bearer wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!body.contains("docker"));

        let (status, _) = send_get(app, HEALTH_PATH, Some("test_token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_health_plain() {
        let app = router(&Config::default());

        let (status, body) = send_get(app.clone(), HEALTH_PATH, Some("Bearer test_token")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""engine":"docker""#));

        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"]["containers"], serde_json::json!(["build", "build/ui"]));

        let (_, again) = send_get(app, HEALTH_PATH, Some("Bearer test_token")).await;
        assert_eq!(body, again);
    }

    #[tokio::test]
    async fn test_health_annotated() {
        let mut config = Config::default();
        config.health.shape = HealthShape::Annotated;

        let (status, body) = send_get(router(&config), HEALTH_PATH, Some("Bearer test_token")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""engine":{"data":"docker","hue":"yellow"}"#));
    }

    #[tokio::test]
    async fn test_unknown_routes() {
        let app = router(&Config::default());

        let (status, _) = send_get(app.clone(), "/api/missing", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send_get(app.clone(), "/api/missing", Some("Bearer test_token")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send_get(app, "/nowhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_gateway_without_upgrade() {
        let (status, body) = send_get(router(&Config::default()), GATEWAY_PATH, None).await;
        assert_eq!(status, StatusCode::UPGRADE_REQUIRED);
        assert_eq!(body, NOT_A_WEBSOCKET);
    }

    #[tokio::test]
    async fn test_gateway_auth_is_optional() {
        let mut config = Config::default();
        config.gateway.require_auth = true;

        let (status, _) = send_get(router(&config), GATEWAY_PATH, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    async fn send_preflight(app: Router) -> axum::response::Response {
        let request = Request::builder()
            .method("OPTIONS")
            .uri(HEALTH_PATH)
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = send_preflight(router(&Config::default())).await;
        assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_cors_disabled() {
        let mut config = Config::default();
        config.server.cors = false;

        let response = send_preflight(router(&config)).await;
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

        let (_, body) = send_get(router(&config), HEALTH_PATH, Some("Bearer test_token")).await;
        assert!(body.contains("docker"));
    }

    // ---- Over a real socket ----

    fn live_config(artifact: std::path::PathBuf, policy: MissingArtifact) -> Config {
        let mut config = Config::default();
        config.server.port = 0;
        config.gateway.artifact = artifact;
        config.gateway.warning_delay = Duration::from_millis(20);
        config.gateway.artifact_delay = Duration::from_millis(40);
        config.gateway.missing_artifact = policy;
        config
    }

    type Client = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn next_message(ws: &mut Client) -> Message {
        tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("websocket error")
    }

    fn json(message: &Message) -> serde_json::Value {
        match message {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_live_health() {
        let dir = tempfile::tempdir().unwrap();
        let config = live_config(dir.path().join("test.tgz"), MissingArtifact::Abort);
        let handle = Server::bind(&config).await.unwrap().spawn();

        let client = reqwest::Client::new();
        let ok = client
            .get(handle.http_url(HEALTH_PATH))
            .bearer_auth("test_token")
            .send()
            .await
            .unwrap();
        assert_eq!(ok.status(), reqwest::StatusCode::OK);
        assert_eq!(
            ok.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );
        let body: serde_json::Value = ok.json().await.unwrap();
        assert_eq!(body["engine"], "docker");

        let denied = client.get(handle.http_url(HEALTH_PATH)).send().await.unwrap();
        assert_eq!(denied.status(), reqwest::StatusCode::UNAUTHORIZED);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_live_gateway_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("test.tgz");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        std::fs::write(&artifact, &bytes).unwrap();

        let config = live_config(artifact, MissingArtifact::Abort);
        let handle = Server::bind(&config).await.unwrap().spawn();

        let (mut ws, _) = tokio_tungstenite::connect_async(handle.ws_url(GATEWAY_PATH))
            .await
            .unwrap();

        let first = json(&next_message(&mut ws).await);
        assert_eq!(first["level"], "success");
        assert_eq!(first["data"]["connected"], true);

        let second = json(&next_message(&mut ws).await);
        assert_eq!(second["level"], "warning");
        assert!(second["time"].as_i64().unwrap() >= first["time"].as_i64().unwrap());

        match next_message(&mut ws).await {
            Message::Binary(data) => assert_eq!(&data[..], bytes.as_slice()),
            other => panic!("expected binary frame, got {:?}", other),
        }

        let done = json(&next_message(&mut ws).await);
        assert_eq!(done["data"]["done"], true);

        // Client chatter gets no reply and the server keeps the socket open
        ws.send(Message::Text("log line from client".to_string().into())).await.unwrap();
        let silence = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
        assert!(silence.is_err(), "server sent {:?}", silence);

        ws.close(None).await.unwrap();
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_live_gateway_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = live_config(dir.path().join("absent.tgz"), MissingArtifact::Abort);
        let handle = Server::bind(&config).await.unwrap().spawn();

        let (mut ws, _) = tokio_tungstenite::connect_async(handle.ws_url(GATEWAY_PATH))
            .await
            .unwrap();

        assert_eq!(json(&next_message(&mut ws).await)["data"]["connected"], true);
        assert_eq!(json(&next_message(&mut ws).await)["level"], "warning");
        assert_eq!(json(&next_message(&mut ws).await)["level"], "error");
        assert!(matches!(next_message(&mut ws).await, Message::Close(_)));

        drop(ws);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_two_servers_side_by_side() {
        let dir = tempfile::tempdir().unwrap();
        let mut annotated = live_config(dir.path().join("a.tgz"), MissingArtifact::Skip);
        annotated.health.shape = HealthShape::Annotated;
        annotated.auth.token = secrecy::SecretString::from("other".to_string());
        let plain = live_config(dir.path().join("b.tgz"), MissingArtifact::Skip);

        let a = Server::bind(&annotated).await.unwrap().spawn();
        let b = Server::bind(&plain).await.unwrap().spawn();
        assert_ne!(a.local_addr(), b.local_addr());

        let client = reqwest::Client::new();
        let a_body: serde_json::Value = client
            .get(a.http_url(HEALTH_PATH))
            .bearer_auth("other")
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(a_body["engine"]["hue"], "yellow");

        let b_status = client
            .get(b.http_url(HEALTH_PATH))
            .bearer_auth("other")
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(b_status, reqwest::StatusCode::UNAUTHORIZED);

        a.shutdown().await.unwrap();
        b.shutdown().await.unwrap();
    }
}
