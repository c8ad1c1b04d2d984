//! REST API endpoints for the stats service
//!
//! Every handler answers with a JSON body. Store failures are mapped to their HTTP
//! status in [`ServiceError::status`]; filter rejections (unknown route, malformed body,
//! missing query) are turned into the same error body by [`handle_rejection`].

use crate::error::{ServiceError, ServiceResult};
use crate::timing::OperationTimer;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use stats_store::{StatsEngine, SymbolStats, SymbolStore};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection};

/// Upper bound on request bodies
pub const MAX_BODY_BYTES: u64 = 8 * 1024 * 1024;

/// Batch submission body
#[derive(Debug, Serialize, Deserialize)]
pub struct AddBatchRequest {
    pub symbol: String,
    /// Raw JSON text per element. Non-numeric and out-of-range elements still reach the
    /// store's value validation instead of failing body parsing.
    pub values: Vec<Box<RawValue>>,
}

/// `?symbol=` query parameters
#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    pub symbol: String,
}

/// Plain acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Symbol listing
#[derive(Debug, Serialize, Deserialize)]
pub struct SymbolsResponse {
    pub symbols: Vec<String>,
}

type JsonReply = WithStatus<Json>;

fn reply<T: Serialize>(result: ServiceResult<T>) -> JsonReply {
    match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), StatusCode::OK),
        Err(e) => error_reply(&e),
    }
}

fn error_reply(error: &ServiceError) -> JsonReply {
    let status = error.status();
    if status.is_server_error() {
        warn!("Request failed: {}", error);
    } else {
        debug!("Request rejected: {}", error);
    }
    warp::reply::with_status(warp::reply::json(&error.to_response()), status)
}

fn message(text: String) -> MessageResponse {
    MessageResponse { message: text }
}

/// Non-numeric elements become NaN and out-of-range numbers become infinite, both of
/// which the store rejects as invalid values
fn numeric_values(raw: &[Box<RawValue>]) -> Vec<f64> {
    raw.iter().map(|v| v.get().trim().parse::<f64>().unwrap_or(f64::NAN)).collect()
}

/// Path segments arrive percent-encoded
fn decode_segment(raw: &str) -> ServiceResult<String> {
    urlencoding::decode(raw)
        .map(|symbol| symbol.into_owned())
        .map_err(|e| ServiceError::BadRequest(format!("symbol is not valid UTF-8: {}", e)))
}

fn remove_symbol(store: &SymbolStore, symbol: &str) -> ServiceResult<MessageResponse> {
    store.delete_symbol(symbol)?;
    Ok(message(format!("Symbol {} deleted", symbol)))
}

/// Append a batch of prices to a symbol
pub async fn add_batch(
    request: AddBatchRequest,
    store: Arc<SymbolStore>,
) -> Result<impl warp::Reply, Rejection> {
    let _timer = OperationTimer::start("add_batch");
    let values = numeric_values(&request.values);

    let result = store.add_batch(&request.symbol, &values).map(|receipt| {
        message(format!(
            "Successfully added {} values for symbol '{}'",
            receipt.accepted, receipt.symbol
        ))
    });
    Ok(reply(result.map_err(ServiceError::from)))
}

/// Statistics over a symbol's full history
pub async fn get_stats(
    query: SymbolQuery,
    store: Arc<SymbolStore>,
) -> Result<impl warp::Reply, Rejection> {
    let _timer = OperationTimer::start("get_stats");
    let result: ServiceResult<SymbolStats> =
        StatsEngine::new(&store).compute_stats(&query.symbol).map_err(ServiceError::from);
    Ok(reply(result))
}

pub async fn get_symbols(store: Arc<SymbolStore>) -> Result<impl warp::Reply, Rejection> {
    let _timer = OperationTimer::start("get_symbols");
    Ok(reply(Ok(SymbolsResponse { symbols: store.get_symbols() })))
}

/// `DELETE /delete_symbol/{symbol}`
pub async fn delete_symbol(
    segment: String,
    store: Arc<SymbolStore>,
) -> Result<impl warp::Reply, Rejection> {
    let _timer = OperationTimer::start("delete_symbol");
    let result = decode_segment(&segment).and_then(|symbol| remove_symbol(&store, &symbol));
    Ok(reply(result))
}

/// `DELETE /delete_symbol?symbol=`, the only form that can name the empty symbol
pub async fn delete_symbol_by_query(
    query: SymbolQuery,
    store: Arc<SymbolStore>,
) -> Result<impl warp::Reply, Rejection> {
    let _timer = OperationTimer::start("delete_symbol");
    Ok(reply(remove_symbol(&store, &query.symbol)))
}

pub async fn clear_db(store: Arc<SymbolStore>) -> Result<impl warp::Reply, Rejection> {
    let _timer = OperationTimer::start("clear_db");
    let removed = store.clear();
    debug!("Cleared {} symbols", removed);
    Ok(reply(Ok(message("Database cleared".to_string()))))
}

/// Map filter rejections onto the JSON error body
pub async fn handle_rejection(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let error = if err.is_not_found() {
        ServiceError::NotFound("no such route".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        ServiceError::BadRequest(e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        ServiceError::BadRequest(e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        ServiceError::BadRequest(format!("request body exceeds {} bytes", MAX_BODY_BYTES))
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        ServiceError::BadRequest("content-length header required".to_string())
    } else if let Some(e) = err.find::<warp::reject::UnsupportedMediaType>() {
        ServiceError::BadRequest(e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ServiceError::MethodNotAllowed
    } else {
        ServiceError::Internal(format!("unhandled rejection: {:?}", err))
    };

    Ok(error_reply(&error))
}

fn with_store(
    store: Arc<SymbolStore>,
) -> impl Filter<Extract = (Arc<SymbolStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

/// Create REST API routes
pub fn create_routes(
    store: Arc<SymbolStore>,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // Batch ingestion
    let add_batch_route = warp::path("add_batch")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_store(store.clone()))
        .and_then(add_batch);

    // Stats for one symbol
    let stats_route = warp::path("stats")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<SymbolQuery>())
        .and(with_store(store.clone()))
        .and_then(get_stats);

    let symbols_route = warp::path("symbols")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(get_symbols);

    let delete_route = warp::path("delete_symbol")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_store(store.clone()))
        .and_then(delete_symbol);

    let delete_query_route = warp::path("delete_symbol")
        .and(warp::path::end())
        .and(warp::delete())
        .and(warp::query::<SymbolQuery>())
        .and(with_store(store.clone()))
        .and_then(delete_symbol_by_query);

    let clear_route = warp::path("clear_db")
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_store(store.clone()))
        .and_then(clear_db);

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(store))
        .map(|store: Arc<SymbolStore>| {
            warp::reply::json(&serde_json::json!({
                "status": "healthy",
                "version": stats_store::VERSION,
                "symbols": store.len(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        });

    add_batch_route
        .or(stats_route)
        .or(symbols_route)
        .or(delete_route)
        .or(delete_query_route)
        .or(clear_route)
        .or(health)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "DELETE", "OPTIONS"]),
        )
        .recover(handle_rejection)
}
