//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header, request::Parts},
    routing::{get, post},
};
use metrosync_shared::time::Clock;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServerConfig,
    domain::RoomRepository,
    metronome::MetronomeHub,
    usecase::{
        ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase, DispatchCommandUseCase,
        GetMetronomeStateUseCase, GetRoomUseCase,
    },
};

use super::{
    handler::{create_room, get_metronome_state, get_room, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Shared metronome server
///
/// Owns the `MetronomeHub` and wires every UseCase into the axum router.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     ServerConfig::default(),
///     Arc::new(InMemoryRoomRepository::new()),
///     Arc::new(SystemClock),
/// );
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    hub: Arc<MetronomeHub>,
    app_state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved server configuration
    /// * `repository` - Room persistence used by the REST endpoints
    /// * `clock` - Time source for metronome timestamps and room creation
    pub fn new(
        config: ServerConfig,
        repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // 1. Hub（ルームごとの状態・接続・同期タイマー）
        let hub = MetronomeHub::new(config.hub_config(), clock.clone());

        // 2. UseCases
        let app_state = Arc::new(AppState {
            config: config.clone(),
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(hub.clone())),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(hub.clone())),
            dispatch_command_usecase: Arc::new(DispatchCommandUseCase::new(hub.clone())),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(repository.clone(), clock)),
            get_room_usecase: Arc::new(GetRoomUseCase::new(repository)),
            get_metronome_state_usecase: Arc::new(GetMetronomeStateUseCase::new(hub.clone())),
        });

        Self {
            config,
            hub,
            app_state,
        }
    }

    pub fn hub(&self) -> Arc<MetronomeHub> {
        self.hub.clone()
    }

    /// Build the router with every endpoint and middleware attached
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws/{uuid}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .route("/room", post(create_room))
            .route("/room/{uuid}", get(get_room))
            .route("/room/{uuid}/metronome", get(get_metronome_state))
            .layer(cors_layer(&self.config))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Metronome server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws/{{room}}?userId={{user}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(
        self,
        listener: tokio::net::TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        // 残っている同期タイマーを全て止める
        self.hub.shutdown();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// An empty allow-list answers every origin with `*` and no credentials;
/// a configured list echoes matching origins and allows credentials.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("baggage"),
            header::CONTENT_TYPE,
            HeaderName::from_static("sentry-trace"),
            header::AUTHORIZATION,
        ])
        .expose_headers([header::CONTENT_LENGTH]);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(AllowOrigin::any());
    }

    let config = config.clone();
    layer
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                origin
                    .to_str()
                    .map(|origin| config.is_origin_allowed(origin))
                    .unwrap_or(false)
            },
        ))
        .allow_credentials(true)
}
