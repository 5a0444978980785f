/// HTTP form API: one POST route per entry point plus a schema listing
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use ledgerline_common::{Error, Result};
use ledgerline_core::entry::{find, ENTRY_POINTS};
use ledgerline_core::{ArgSpec, EntryPoint, OutputKind, Product, Settings};
use ledgerline_ethereum::run;

/// State shared by the handlers; read-only after startup
#[derive(Debug, Clone)]
pub struct AppState {
    /// Settings every submission resolves its connection from
    pub settings: Arc<Settings>,

    /// Decimals applied to every product instead of the configured ones
    pub decimals_override: Option<u32>,
}

impl AppState {
    pub fn new(settings: Settings, decimals_override: Option<u32>) -> Self {
        Self {
            settings: Arc::new(settings),
            decimals_override,
        }
    }
}

/// Form submission body
#[derive(Debug, Default, Deserialize)]
pub struct InvokeRequest {
    /// Argument values keyed by argument name
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// Schema of one entry point, as a form frontend needs it
#[derive(Debug, Serialize)]
struct EntrySchema {
    product: &'static str,
    command: &'static str,
    method: &'static str,
    about: &'static str,
    requires_signer: bool,
    args: &'static [ArgSpec],
    output: OutputKind,
}

impl From<&EntryPoint> for EntrySchema {
    fn from(entry: &EntryPoint) -> Self {
        Self {
            product: entry.product.as_str(),
            command: entry.command,
            method: entry.method,
            about: entry.about,
            requires_signer: entry.requires_signer,
            args: entry.args,
            output: entry.output,
        }
    }
}

/// API Error type
#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invocation(Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invocation(err) => {
                let status = match err {
                    Error::Validation(_) => StatusCode::BAD_REQUEST,
                    Error::RemoteCall(_) | Error::Network(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.kind(), err.to_string())
            }
        };

        (status, Json(json!({ "ok": false, "kind": kind, "message": message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Invocation(err)
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/entries", get(list_entries))
        .route("/api/:product/:command", post(invoke))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn start_http_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::network(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("API server listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::network(format!("Server error: {}", e)))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_entries() -> impl IntoResponse {
    let entries: Vec<EntrySchema> = ENTRY_POINTS.iter().map(EntrySchema::from).collect();
    Json(entries)
}

async fn invoke(
    State(state): State<AppState>,
    Path((product, command)): Path<(String, String)>,
    request: std::result::Result<Json<InvokeRequest>, JsonRejection>,
) -> std::result::Result<Json<Value>, ApiError> {
    let entry = product
        .parse::<Product>()
        .ok()
        .and_then(|product| find(product, &command))
        .ok_or_else(|| ApiError::NotFound(format!("no entry point {} {}", product, command)))?;

    let Json(request) = request
        .map_err(|rejection| Error::validation(format!("invalid request body: {}", rejection.body_text())))?;
    let raw = form_arguments(entry, request.args)?;
    let outcome = run(&state.settings, entry, &raw, state.decimals_override)
        .await
        .map_err(|err| {
            warn!(entry = %entry.qualified_name(), kind = err.kind(), "invocation failed: {}", err);
            err
        })?;

    let mut body = outcome.to_json();
    body["ok"] = json!(true);
    Ok(Json(body))
}

/// Order named form values by the entry's argument list. Blank and absent
/// values stay `None` so the entry reports them together.
fn form_arguments(entry: &EntryPoint, mut values: Map<String, Value>) -> Result<Vec<Option<String>>> {
    let raw = entry
        .args
        .iter()
        .map(|spec| match values.remove(spec.name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(Error::validation(format!(
                "argument {} must be a string, number or boolean, got {}",
                spec.name, other
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(unknown) = values.keys().next() {
        return Err(Error::validation(format!(
            "{} has no argument named {}",
            entry.qualified_name(),
            unknown
        )));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_form_arguments_follow_entry_order() {
        let entry = find(Product::Token, "transfer-from").unwrap();
        let raw = form_arguments(
            entry,
            args(json!({ "amount": 2.5, "to": "0xb", "from": "0xa" })),
        )
        .unwrap();
        assert_eq!(
            raw,
            vec![Some("0xa".to_string()), Some("0xb".to_string()), Some("2.5".to_string())]
        );
    }

    #[test]
    fn test_form_arguments_leave_missing_values_empty() {
        let entry = find(Product::Deposit, "get-deposit").unwrap();
        let raw = form_arguments(entry, args(json!({ "index": null }))).unwrap();
        assert_eq!(raw, vec![None, None]);
    }

    #[test]
    fn test_form_arguments_reject_unknown_and_nested_values() {
        let entry = find(Product::CreditCard, "freeze-card").unwrap();
        assert!(matches!(
            form_arguments(entry, args(json!({ "card_id": 1, "reason": "lost" }))),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            form_arguments(entry, args(json!({ "card_id": [1] }))),
            Err(Error::Validation(_))
        ));
    }
}
