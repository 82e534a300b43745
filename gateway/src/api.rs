//! # HTTP API
//!
//! The axum router fronting the gateway. Clients sign in with base64
//! credential material; the gateway re-binds its ledger session and signs
//! subsequent transactions with the new identity.
//!
//! ## Endpoints
//!
//! | Method | Path              | Description                           |
//! |--------|-------------------|---------------------------------------|
//! | GET    | `/health`         | Liveness probe                        |
//! | GET    | `/identity`       | Active identity summary               |
//! | POST   | `/wallet_sign_in` | Replace the active identity           |
//!
//! ## Error mapping
//!
//! Credential and signing failures are the client's fault and map to 4xx;
//! store or transport unavailability is ours and maps to 5xx. The split is
//! deliberate: a bad key should never page an operator.

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use aerotrust_protocol::identity::{EnrollmentError, EnrollmentRequest, Identity};
use aerotrust_protocol::session::{Session, SessionError};
use aerotrust_protocol::wallet::{StoreError, WalletError};

use crate::fabric::PeerConnector;
use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The gateway's reported version string.
    pub version: String,
    /// The process-wide identity/transport binding.
    pub session: Arc<Session<PeerConnector>>,
    /// Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/identity", get(identity_handler))
        .route("/wallet_sign_in", post(sign_in_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Error Mapping
// ---------------------------------------------------------------------------

/// An API failure with its HTTP classification.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<EnrollmentError> for ApiError {
    fn from(e: EnrollmentError) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        let status = match &e {
            // The client sent credentials we cannot use.
            SessionError::Key(_) => StatusCode::BAD_REQUEST,
            SessionError::Wallet(WalletError::CorruptEntry { .. }) => StatusCode::BAD_REQUEST,
            SessionError::Wallet(WalletError::Store(StoreError::NotFound(_))) => {
                StatusCode::BAD_REQUEST
            }
            SessionError::NoActiveIdentity => StatusCode::CONFLICT,
            // Our side: storage or peer plumbing is down.
            SessionError::Wallet(WalletError::Store(StoreError::Unavailable(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SessionError::Transport(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Response payload for `POST /wallet_sign_in`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// MSP the session is now bound to.
    pub msp_id: String,
}

/// Response payload for `GET /identity`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityResponse {
    /// Whether an identity is currently bound.
    pub bound: bool,
    /// The bound identity's MSP, when present.
    pub msp_id: Option<String>,
    /// Gateway version string.
    pub version: String,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Liveness probe.
async fn health_handler() -> &'static str {
    "ok"
}

/// Reports the currently bound identity, if any.
async fn identity_handler(State(state): State<AppState>) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        bound: state.session.is_bound(),
        msp_id: state.session.msp_id(),
        version: state.version.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Decodes the sign-in payload and re-binds the session to the new
/// identity. A rejected payload changes nothing; a mid-rebind failure
/// leaves the session unbound (and is reported as such).
async fn sign_in_handler(
    State(state): State<AppState>,
    Json(request): Json<EnrollmentRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    state.metrics.sign_ins_total.inc();

    let result = sign_in(&state, request);
    match &result {
        Ok(_) => state
            .metrics
            .identity_bound
            .set(state.session.is_bound() as i64),
        Err(e) => {
            state.metrics.sign_in_failures_total.inc();
            state
                .metrics
                .identity_bound
                .set(state.session.is_bound() as i64);
            tracing::warn!(error = %e.message, "sign-in rejected");
        }
    }
    result
}

fn sign_in(state: &AppState, request: EnrollmentRequest) -> Result<Json<SignInResponse>, ApiError> {
    let identity = Identity::from(request.into_identity()?);
    let msp_id = identity.msp_id().to_string();

    state.session.rebind(identity)?;

    tracing::info!(msp_id = %msp_id, "session re-bound to new identity");
    Ok(Json(SignInResponse {
        message: "reconnected to ledger gateway with new identity".to_string(),
        msp_id,
    }))
}
