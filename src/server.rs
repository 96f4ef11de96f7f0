mod handlers;
mod responses;

pub use handlers::crls::{ReadCrlQuery, WriteCrlRequest};
pub use responses::ErrorBody;

use std::sync::Arc;

use axum::{Router, http::Method, routing::get};
use color_eyre::eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::pki::crl::CrlRegistry;
use crate::storage::Storage;
use handlers::crls::{delete_crl, read_crl, read_crl_by_serial, write_crl};
use handlers::health::health_check;

#[derive(Debug, Clone)]
pub struct ServerConfig<'a> {
    pub host: &'a str,
    pub port: u16,
}

pub struct AppState<S: Storage> {
    pub registry: Arc<CrlRegistry<S>>,
}

impl<S: Storage> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

pub struct Server {
    router: Router,
    listener: TcpListener,
}

impl Server {
    /// Builds the router and binds the listener.
    ///
    /// The registry must already be populated: every route answers from the
    /// in-memory index.
    pub async fn new<S: Storage>(
        registry: Arc<CrlRegistry<S>>,
        config: ServerConfig<'_>,
    ) -> Result<Self> {
        let trace_layer =
            TraceLayer::new_for_http().make_span_with(|request: &'_ axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("request", method = %request.method(), uri)
            });

        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_headers(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

        let state = AppState { registry };

        let router = Router::new()
            .route("/health", get(health_check::<S>))
            .route("/crls", get(read_crl_by_serial::<S>))
            .route(
                "/crls/{name}",
                get(read_crl::<S>)
                    .post(write_crl::<S>)
                    .put(write_crl::<S>)
                    .delete(delete_crl::<S>),
            )
            .layer(cors_layer)
            .layer(trace_layer)
            .with_state(state);

        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Binding TCP listener on {addr}"))?;

        Ok(Self { router, listener })
    }

    /// The port the listener is bound to
    pub fn port(&self) -> Result<u16> {
        let addr = self
            .listener
            .local_addr()
            .context("Getting local address")?;
        Ok(addr.port())
    }

    pub async fn run(self) -> Result<()> {
        let addr = self.listener.local_addr()?;
        tracing::info!("Server listening on http://{addr}");
        axum::serve(self.listener, self.router)
            .await
            .context("Running server")?;
        Ok(())
    }
}
