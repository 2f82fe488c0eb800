use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use server_api::{submit_info, submit_uncategorized_update, ApiContext};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        healthz_route, submit_info_route, submit_uncategorized_update_route, ProcessingResult,
        SubmitInfoRequest, UncategorizedUpdate,
    },
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, CliOverrides};

#[derive(Parser, Debug)]
#[command(name = "note-categorizer-server", about = "Note Categorizer web backend")]
struct Args {
    /// Port to listen on; overrides the config file and environment.
    #[arg(short, long)]
    port: Option<u16>,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
    /// Listen on 127.0.0.1 regardless of the configured host.
    #[arg(short, long)]
    localhost: bool,
    /// Config file to read instead of ./server.toml.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = load_settings(
        args.config.as_deref(),
        &CliOverrides {
            port: args.port,
            verbose: args.verbose,
            localhost: args.localhost,
        },
    )?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState {
        api: ApiContext::new(),
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr = settings.socket_addr()?;
    info!(%addr, "server listening");
    for route in routes() {
        info!(url = %format!("http://{addr}{route}"), "route available");
    }
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn routes() -> [&'static str; 3] {
    [
        healthz_route(),
        submit_info_route(),
        submit_uncategorized_update_route(),
    ]
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route(healthz_route(), get(healthz))
        .route(submit_info_route(), post(http_submit_info))
        .route(
            submit_uncategorized_update_route(),
            post(http_submit_uncategorized_update),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_submit_info(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitInfoRequest>,
) -> Result<Json<ProcessingResult>, (StatusCode, Json<ApiError>)> {
    submit_info(&state.api, req)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_submit_uncategorized_update(
    State(state): State<Arc<AppState>>,
    Json(update): Json<UncategorizedUpdate>,
) -> Result<Json<ProcessingResult>, (StatusCode, Json<ApiError>)> {
    submit_uncategorized_update(&state.api, update)
        .await
        .map(Json)
        .map_err(error_response)
}

fn error_response(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
