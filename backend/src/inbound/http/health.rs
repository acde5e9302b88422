//! Liveness and readiness probes for orchestrators and load balancers, plus an
//! aggregate report for operators.
//!
//! Readiness additionally pings the persistence backend so a lost database
//! connection takes the instance out of rotation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::PersistenceProbe;

/// Shared readiness and liveness flags plus the persistence probe.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    probe: Arc<dyn PersistenceProbe>,
}

impl HealthState {
    /// Start live but not ready.
    pub fn new(probe: Arc<dyn PersistenceProbe>) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            probe,
        }
    }

    /// Mark the service as ready once start-up has completed.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness checks so orchestrators notice a drain early.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Ready flag set and the backing store answers.
    pub async fn check_ready(&self) -> bool {
        if !self.is_ready() {
            return false;
        }
        match self.probe.ping().await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "readiness probe failed");
                false
            }
        }
    }

    /// Run every dependency check and summarise the result.
    pub async fn report(&self) -> HealthReport {
        let database = match self.probe.ping().await {
            Ok(()) => CheckReport::healthy(),
            Err(error) => {
                warn!(%error, "database health check failed");
                CheckReport::unhealthy("database connection failed")
            }
        };
        let checks = BTreeMap::from([("database".to_owned(), database)]);
        let status = if checks
            .values()
            .all(|check| check.status == CheckStatus::Healthy)
        {
            CheckStatus::Healthy
        } else {
            CheckStatus::Unhealthy
        };
        HealthReport {
            status,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            checks,
        }
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Healthy,
    Unhealthy,
}

/// One dependency's status and, on failure, a short reason.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckReport {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckReport {
    fn healthy() -> Self {
        Self {
            status: CheckStatus::Healthy,
            message: None,
        }
    }

    fn unhealthy(message: &str) -> Self {
        Self {
            status: CheckStatus::Unhealthy,
            message: Some(message.to_owned()),
        }
    }
}

/// Aggregate health of the service and its dependencies.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthReport {
    /// Unhealthy when any check is.
    pub status: CheckStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    /// Per-dependency results keyed by name, e.g. `database`.
    pub checks: BTreeMap<String, CheckReport>,
}

/// Aggregate health report. Returns 200 when every check passes; 503 with the
/// same body otherwise.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "All checks pass", body = HealthReport),
        (status = 503, description = "At least one check failed", body = HealthReport)
    )
)]
#[get("/health")]
pub async fn health(state: web::Data<HealthState>) -> HttpResponse {
    let report = state.report().await;
    let mut response = match report.status {
        CheckStatus::Healthy => HttpResponse::Ok(),
        CheckStatus::Unhealthy => HttpResponse::ServiceUnavailable(),
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(report)
}

/// Readiness probe. Returns 200 when the server has started and the database
/// answers; 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is starting or persistence is unavailable")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.check_ready().await)
}

/// Liveness probe. Returns 200 until the process is marked unhealthy.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPersistenceProbe, ProbeError};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    fn probe(answer: Result<(), ProbeError>) -> Arc<dyn PersistenceProbe> {
        let mut probe = MockPersistenceProbe::new();
        probe.expect_ping().returning(move || answer.clone());
        Arc::new(probe)
    }

    async fn call(state: web::Data<HealthState>, uri: &str) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(health)
                .service(ready)
                .service(live),
        )
        .await;
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
            .await
    }

    #[rstest]
    #[case(false, Ok(()), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(true, Ok(()), StatusCode::OK)]
    #[case(true, Err(ProbeError::unavailable("connection refused")), StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn readiness_combines_flag_and_probe(
        #[case] started: bool,
        #[case] answer: Result<(), ProbeError>,
        #[case] expected: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new(probe(answer)));
        if started {
            state.mark_ready();
        }

        let response = call(state, "/health/ready").await;

        assert_eq!(response.status(), expected);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn aggregate_report_lists_database_check() {
        let state = web::Data::new(HealthState::new(probe(Ok(()))));

        let response = call(state, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = actix_test::read_body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["checks"]["database"]["status"], "healthy");
        assert!(body["checks"]["database"].get("message").is_none());
        assert!(body["timestamp"].is_string());
    }

    #[rstest]
    #[actix_web::test]
    async fn aggregate_report_degrades_when_database_fails() {
        let state = web::Data::new(HealthState::new(probe(Err(ProbeError::unavailable(
            "connection refused",
        )))));
        state.mark_ready();

        let response = call(state, "/health").await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = actix_test::read_body_json(response).await;
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["checks"]["database"]["status"], "unhealthy");
        assert_eq!(
            body["checks"]["database"]["message"],
            "database connection failed"
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_fails_after_drain() {
        let state = web::Data::new(HealthState::new(probe(Ok(()))));

        let before = call(state.clone(), "/health/live").await;
        state.mark_unhealthy();
        let after = call(state, "/health/live").await;

        assert_eq!(before.status(), StatusCode::OK);
        assert_eq!(after.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
