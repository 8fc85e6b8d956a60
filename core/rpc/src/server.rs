use std::future::Future;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use distributor::Distributor;
use distributor_types::{
    parse_checkpoint_n_segment,
    DistributorError,
    LogId,
    WitnessId,
    HTTP_GET_LOGS,
    HTTP_GET_WITNESSES,
};
use prometheus::TextEncoder;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::RpcConfig;
use crate::error::RpcError;

/// Largest request body accepted. Checkpoints are small.
const MAX_BODY_SIZE: usize = 16 * 1024;

/// Build the HTTP API over the distributor.
pub fn router(distributor: Distributor, config: &RpcConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route(HTTP_GET_LOGS, get(get_logs))
        .route(HTTP_GET_WITNESSES, get(get_witnesses))
        .route(
            &format!("{HTTP_GET_LOGS}/:log_id/:checkpoint"),
            get(get_checkpoint_n),
        )
        .route(
            &format!("{HTTP_GET_LOGS}/:log_id/byWitness/:witness_id/checkpoint"),
            get(get_checkpoint_witness).put(distribute),
        );
    if config.export_metrics {
        app = app.route("/metrics", get(metrics));
    }
    app.layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(distributor)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("failed to run http server")
}

/// Bind the configured address and serve the API until `shutdown` resolves.
pub async fn spawn_rpc_server<F>(
    config: RpcConfig,
    distributor: Distributor,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("Distributor listening on {}", config.listen);
    serve(listener, router(distributor, &config), shutdown).await
}

async fn health() -> &'static str {
    "OK"
}

async fn metrics() -> Result<String, (StatusCode, String)> {
    TextEncoder::new()
        .encode_to_string(&prometheus::gather())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn get_logs(State(distributor): State<Distributor>) -> Json<Vec<LogId>> {
    Json(distributor.get_logs())
}

async fn get_witnesses(State(distributor): State<Distributor>) -> Json<Vec<WitnessId>> {
    Json(distributor.get_witnesses())
}

async fn get_checkpoint_n(
    State(distributor): State<Distributor>,
    Path((log_id, checkpoint)): Path<(String, String)>,
) -> Result<Response, RpcError> {
    let n = parse_checkpoint_n_segment(&checkpoint).ok_or_else(|| {
        DistributorError::NotFound(format!("no such resource {checkpoint:?}"))
    })?;
    let log_id = LogId::from(log_id);
    let note = blocking(move || distributor.get_checkpoint_n(&log_id, n)).await?;
    Ok(note_response(note))
}

async fn get_checkpoint_witness(
    State(distributor): State<Distributor>,
    Path((log_id, witness_id)): Path<(String, String)>,
) -> Result<Response, RpcError> {
    let log_id = LogId::from(log_id);
    let witness_id = WitnessId::from(witness_id);
    let note =
        blocking(move || distributor.get_checkpoint_witness(&log_id, &witness_id)).await?;
    Ok(note_response(note))
}

async fn distribute(
    State(distributor): State<Distributor>,
    Path((log_id, witness_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<(), RpcError> {
    let log_id = LogId::from(log_id);
    let witness_id = WitnessId::from(witness_id);
    blocking(move || distributor.distribute(&log_id, &witness_id, &body)).await?;
    Ok(())
}

/// Run a database call on the blocking thread pool.
async fn blocking<T, F>(f: F) -> Result<T, RpcError>
where
    F: FnOnce() -> distributor_types::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DistributorError::Internal(format!("database task failed: {e}")))?;
    Ok(result?)
}

fn note_response(note: Vec<u8>) -> Response {
    ([(CONTENT_TYPE, "text/plain; charset=utf-8")], note).into_response()
}
