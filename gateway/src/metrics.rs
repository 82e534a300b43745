//! # Prometheus Metrics
//!
//! Operational metrics for the gateway, scraped at `/metrics` on the
//! configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so
//! they do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the gateway.
///
/// Clone-friendly (wraps `Arc` internally via prometheus handles) so it can
/// be shared across request handlers.
#[derive(Clone)]
pub struct GatewayMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Total sign-in attempts, successful or not.
    pub sign_ins_total: IntCounter,
    /// Sign-in attempts rejected (bad payload, bad key, transport failure).
    pub sign_in_failures_total: IntCounter,
    /// 1 when an identity is bound, 0 otherwise.
    pub identity_bound: IntGauge,
}

impl GatewayMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("aerotrust".into()), None)
            .expect("failed to create prometheus registry");

        let sign_ins_total = IntCounter::new(
            "sign_ins_total",
            "Total wallet sign-in attempts, successful or not",
        )
        .expect("metric creation");
        registry
            .register(Box::new(sign_ins_total.clone()))
            .expect("metric registration");

        let sign_in_failures_total = IntCounter::new(
            "sign_in_failures_total",
            "Sign-in attempts rejected for bad credentials or transport failures",
        )
        .expect("metric creation");
        registry
            .register(Box::new(sign_in_failures_total.clone()))
            .expect("metric registration");

        let identity_bound = IntGauge::new(
            "identity_bound",
            "Whether an identity is currently bound to the session (0 or 1)",
        )
        .expect("metric creation");
        registry
            .register(Box::new(identity_bound.clone()))
            .expect("metric registration");

        Self {
            registry,
            sign_ins_total,
            sign_in_failures_total,
            identity_bound,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("prometheus output is valid utf-8"))
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<GatewayMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails (should never happen in practice).
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
