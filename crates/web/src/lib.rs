pub use crate::common::RouteResult;

use std::{env, net::SocketAddr};

use axum::{extract::FromRef, Router};
use database::SqliteDatabase;
use railway::client::Client;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;

const DEFAULT_WEB_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Clone, FromRef)]
pub struct WebState {
    pub railway_client: Client<SqliteDatabase>,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub address: String,
}

impl WebConfig {
    /// Reads `WEB_ADDRESS`, falling back to `0.0.0.0:8080`.
    pub fn from_env() -> Self {
        Self {
            address: env::var("WEB_ADDRESS").unwrap_or_else(|_| DEFAULT_WEB_ADDRESS.to_owned()),
        }
    }
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback(common::route_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

pub async fn start_web_server(state: WebState, config: WebConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.address).await?;
    let local_address: SocketAddr = listener.local_addr()?;
    log::info!("listening on http://{}", local_address);

    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}
