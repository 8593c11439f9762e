//! HTTP surface: the `/check` endpoint.
//!
//! Every request gets a 200 with a JSON envelope and a fixed set of headers.
//! Bad parameters, engine failures and panics inside a check all end up as
//! error envelopes.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_DISPOSITION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use registry_check_lib::{CheckResponse, DomainChecker};
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Path the endpoint is served on.
pub const CHECK_PATH: &str = "/check";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const GENERIC_FAILURE_BODY: &str = r#"{"status":"error","reason":"Invalid request"}"#;

/// Name of the request parameter carrying the domain.
const DOMAIN_PARAM: &str = "domain";

/// Decoded parameters from a query string or form body, in request order.
type Params = Vec<(String, String)>;

/// First value of the `domain` parameter; later repeats are ignored.
fn first_domain(params: Params) -> Option<String> {
    params
        .into_iter()
        .find(|(name, _)| name == DOMAIN_PARAM)
        .map(|(_, value)| value)
}

/// Build the router with request tracing.
pub fn router(checker: DomainChecker) -> Router {
    Router::new()
        .route(CHECK_PATH, get(check_query).post(check_form))
        .layer(TraceLayer::new_for_http())
        .with_state(checker)
}

async fn check_query(
    State(checker): State<DomainChecker>,
    query: Result<Query<Params>, QueryRejection>,
) -> Response {
    let domain = query.ok().and_then(|Query(params)| first_domain(params));
    respond(checker, domain).await
}

async fn check_form(
    State(checker): State<DomainChecker>,
    query: Result<Query<Params>, QueryRejection>,
    form: Result<Form<Params>, FormRejection>,
) -> Response {
    // Query string first, then the form body
    let domain = query
        .ok()
        .and_then(|Query(params)| first_domain(params))
        .or_else(|| form.ok().and_then(|Form(params)| first_domain(params)));
    respond(checker, domain).await
}

/// Run the check off the async workers and render the envelope.
async fn respond(checker: DomainChecker, domain: Option<String>) -> Response {
    let envelope =
        match tokio::task::spawn_blocking(move || checker.check(domain.as_deref())).await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Unknown error");
                CheckResponse::generic_failure()
            }
        };

    envelope_response(&envelope)
}

fn envelope_response(envelope: &CheckResponse) -> Response {
    let body = envelope.to_json().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to serialize response envelope");
        GENERIC_FAILURE_BODY.to_string()
    });

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, JSON_CONTENT_TYPE),
            (CONTENT_DISPOSITION, "attachment"),
            (X_CONTENT_TYPE_OPTIONS, "nosniff"),
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        body,
    )
        .into_response()
}

/// Serve the endpoint on `address` until Ctrl+C or SIGTERM.
pub async fn serve(
    address: SocketAddr,
    checker: DomainChecker,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(address).await?;

    info!(
        address = %address,
        client_id = %checker.config().client_id,
        zones = ?checker.config().zones,
        "Starting HTTP server on http://{address}"
    );

    axum::serve(listener, router(checker))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
