// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use fleet_cert_api::{
    ApiError, AuthenticatedActor, ClearPlansResponse, GeneratePlanRequest, GeneratePlanResponse,
    PlanningConfig, RecordCertificationRequest, Role, SetCapacityRequest, SkippedInfo,
    authenticate_stub, clear_plans, export_plans_csv, generate_plan, get_capacity,
    list_due_certifications, period_plans, period_summary, pilot_plans, record_certification,
    set_capacity,
};
use fleet_cert_audit::{AuditEvent, Cause};
use fleet_cert_persistence::{PersistenceError, SqlitePersistence};

/// Fleet Cert Server - HTTP server for the Fleet Certification System
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for plans, capacity, and audit events.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Injected planning configuration (grace periods, roster calendar).
    config: Arc<PlanningConfig>,
}

/// API request for running a planning pass.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct GeneratePlanApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// Horizon in months.
    horizon_months: u32,
    /// Optional reference date (ISO 8601); defaults to today.
    #[serde(skip_serializing_if = "Option::is_none")]
    as_of: Option<String>,
    /// Optional category restriction.
    #[serde(skip_serializing_if = "Option::is_none")]
    category_filter: Option<String>,
    /// Optional pilot restriction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pilot_filter: Option<String>,
}

/// API request for clearing all plans.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ClearPlansApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// API request for recording a due certification.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RecordCertificationApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The pilot's employee identifier.
    pilot_id: String,
    /// The certification category label.
    category: String,
    /// The expiry date (ISO 8601).
    expiry_date: String,
}

/// API request for configuring roster capacity.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SetCapacityApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The roster period code.
    roster_period: String,
    /// The certification category label.
    category: String,
    /// Maximum renewals for the pair.
    max_count: u32,
}

/// Query parameters for listing due certifications.
#[derive(Debug, Deserialize)]
struct DueQuery {
    /// Horizon in months.
    horizon_months: u32,
    /// Optional reference date (ISO 8601).
    as_of: Option<String>,
}

/// Query parameters for period-scoped endpoints.
///
/// Period codes contain a slash ("RP01/2026"), so they travel as a
/// query parameter rather than a path segment.
#[derive(Debug, Deserialize)]
struct PeriodQuery {
    /// The roster period code.
    period: String,
}

/// API response for a completed planning pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeneratePlanApiResponse {
    /// Success indicator.
    success: bool,
    /// Number of plan entries persisted.
    total_plans: usize,
    /// Number of certifications skipped.
    total_skipped: usize,
    /// Entry counts keyed by category label.
    by_category: BTreeMap<String, usize>,
    /// Entry counts keyed by roster period code.
    by_roster_period: BTreeMap<String, usize>,
    /// Skipped certifications with reasons.
    skipped: Vec<SkippedInfo>,
    /// Categories without a grace period entry.
    unconfigured_categories: Vec<String>,
    /// The persisted audit event id.
    event_id: i64,
}

impl From<GeneratePlanResponse> for GeneratePlanApiResponse {
    fn from(response: GeneratePlanResponse) -> Self {
        Self {
            success: true,
            total_plans: response.total_plans,
            total_skipped: response.total_skipped,
            by_category: response.by_category,
            by_roster_period: response.by_roster_period,
            skipped: response.skipped,
            unconfigured_categories: response.unconfigured_categories,
            event_id: response.event_id,
        }
    }
}

/// API response for a destructive clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClearPlansApiResponse {
    /// Success indicator.
    success: bool,
    /// Number of entries deleted.
    deleted_count: usize,
    /// The persisted audit event id.
    event_id: i64,
}

/// Serializable representation of an `AuditEvent` for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditEventResponse {
    /// The event ID.
    event_id: Option<i64>,
    /// The actor ID.
    actor_id: String,
    /// The actor type.
    actor_type: String,
    /// The cause ID.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The action name.
    action_name: String,
    /// Optional action details.
    action_details: Option<String>,
    /// Plan entry count before the operation.
    before_entry_count: usize,
    /// Plan entry count after the operation.
    after_entry_count: usize,
    /// Skip count recorded after the operation.
    after_skip_count: usize,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::PlanNotCommitted { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        if let PersistenceError::EventNotFound(id) = err {
            return Self {
                status: StatusCode::NOT_FOUND,
                message: format!("Audit event not found: {id}"),
            };
        }
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Converts an `AuditEvent` to an `AuditEventResponse`.
fn audit_event_to_response(event: &AuditEvent) -> AuditEventResponse {
    AuditEventResponse {
        event_id: event.event_id,
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_entry_count: event.before.entry_count,
        after_entry_count: event.after.entry_count,
        after_skip_count: event.after.skip_count,
    }
}

/// Parses a role string into a Role enum.
fn parse_role(role_str: &str) -> Result<Role, HttpError> {
    match role_str.to_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "planner" => Ok(Role::Planner),
        _ => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid role: '{role_str}'. Must be 'admin' or 'planner'"),
        }),
    }
}

/// Authenticates the actor named in a request body.
fn authenticate(actor_id: &str, role_str: &str) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = parse_role(role_str)?;
    authenticate_stub(actor_id.to_string(), role).map_err(|e| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: e.to_string(),
    })
}

/// Handler for POST `/plan/generate` endpoint.
///
/// Runs a planning pass over due certifications and persists the result.
async fn handle_generate_plan(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<GeneratePlanApiRequest>,
) -> Result<Json<GeneratePlanApiResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        horizon_months = req.horizon_months,
        "Handling generate_plan request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: GeneratePlanRequest = GeneratePlanRequest {
        horizon_months: req.horizon_months,
        as_of: req.as_of,
        category_filter: req.category_filter,
        pilot_filter: req.pilot_filter,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: GeneratePlanResponse =
        generate_plan(&mut persistence, &app_state.config, &request, &actor, cause)?;
    drop(persistence);

    info!(
        event_id = response.event_id,
        total_plans = response.total_plans,
        total_skipped = response.total_skipped,
        "Successfully generated plan"
    );

    Ok(Json(GeneratePlanApiResponse::from(response)))
}

/// Handler for POST `/plan/clear` endpoint.
///
/// Destructively deletes every plan entry. Admin only.
async fn handle_clear_plans(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ClearPlansApiRequest>,
) -> Result<Json<ClearPlansApiResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        "Handling clear_plans request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = app_state.persistence.lock().await;
    let response: ClearPlansResponse = clear_plans(&mut persistence, &actor, cause)?;
    drop(persistence);

    info!(
        event_id = response.event_id,
        deleted_count = response.deleted_count,
        "Successfully cleared plans"
    );

    Ok(Json(ClearPlansApiResponse {
        success: true,
        deleted_count: response.deleted_count,
        event_id: response.event_id,
    }))
}

/// Handler for POST `/certifications` endpoint.
///
/// Records a certification due for renewal.
async fn handle_record_certification(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RecordCertificationApiRequest>,
) -> Result<Json<fleet_cert_api::RecordCertificationResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        pilot_id = %req.pilot_id,
        category = %req.category,
        "Handling record_certification request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let request: RecordCertificationRequest = RecordCertificationRequest {
        pilot_id: req.pilot_id,
        category: req.category,
        expiry_date: req.expiry_date,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response = record_certification(&mut persistence, &request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/certifications/due` endpoint.
///
/// Lists certifications due within a horizon.
async fn handle_list_due(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<DueQuery>,
) -> Result<Json<fleet_cert_api::DueCertificationsResponse>, HttpError> {
    info!(
        horizon_months = query.horizon_months,
        "Handling list_due request"
    );

    let persistence = app_state.persistence.lock().await;
    let response =
        list_due_certifications(&persistence, query.horizon_months, query.as_of.as_deref())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/capacity` endpoint.
///
/// Configures roster capacity for a period/category pair. Admin only.
async fn handle_set_capacity(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SetCapacityApiRequest>,
) -> Result<Json<fleet_cert_api::CapacityResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        roster_period = %req.roster_period,
        category = %req.category,
        max_count = req.max_count,
        "Handling set_capacity request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let request: SetCapacityRequest = SetCapacityRequest {
        roster_period: req.roster_period,
        category: req.category,
        max_count: req.max_count,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response = set_capacity(&mut persistence, &request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/capacity` endpoint.
async fn handle_get_capacity(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<fleet_cert_api::CapacityResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let response = get_capacity(&persistence, &query.period)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/plans/period` endpoint.
async fn handle_period_plans(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<fleet_cert_api::PeriodPlansResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let response = period_plans(&persistence, &query.period)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/plans/summary` endpoint.
async fn handle_period_summary(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<fleet_cert_api::PeriodSummaryResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let response = period_summary(&persistence, &query.period)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/plans/pilot/{pilot_id}` endpoint.
async fn handle_pilot_plans(
    AxumState(app_state): AxumState<AppState>,
    Path(pilot_id): Path<String>,
) -> Result<Json<fleet_cert_api::PilotPlansResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let response = pilot_plans(&persistence, &pilot_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/plans/export` endpoint.
///
/// Returns the full plan population as CSV.
async fn handle_export(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Response, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let csv: String = export_plans_csv(&persistence)?;
    drop(persistence);

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        csv,
    )
        .into_response())
}

/// Handler for GET `/audit/timeline` endpoint.
async fn handle_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<AuditEventResponse>>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let events: Vec<AuditEvent> = persistence.audit_timeline()?;
    drop(persistence);

    let response: Vec<AuditEventResponse> = events.iter().map(audit_event_to_response).collect();
    Ok(Json(response))
}

/// Handler for GET `/audit/event/{event_id}` endpoint.
async fn handle_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<AuditEventResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let event: AuditEvent = persistence.audit_event(event_id)?;
    drop(persistence);

    Ok(Json(audit_event_to_response(&event)))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/certifications", post(handle_record_certification))
        .route("/certifications/due", get(handle_list_due))
        .route("/capacity", put(handle_set_capacity))
        .route("/capacity", get(handle_get_capacity))
        .route("/plan/generate", post(handle_generate_plan))
        .route("/plan/clear", post(handle_clear_plans))
        .route("/plans/period", get(handle_period_plans))
        .route("/plans/summary", get(handle_period_summary))
        .route("/plans/pilot/{pilot_id}", get(handle_pilot_plans))
        .route("/plans/export", get(handle_export))
        .route("/audit/timeline", get(handle_audit_timeline))
        .route("/audit/event/{event_id}", get(handle_audit_event))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Fleet Cert Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config: Arc::new(PlanningConfig::default()),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            config: Arc::new(PlanningConfig::default()),
        }
    }

    async fn post_json<T: Serialize>(app: &Router, uri: &str, body: &T) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn put_json<T: Serialize>(app: &Router, uri: &str, body: &T) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_uri(app: &Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json<T: for<'de> Deserialize<'de>>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn certification_request(pilot_id: &str, category: &str, expiry: &str) -> RecordCertificationApiRequest {
        RecordCertificationApiRequest {
            actor_id: String::from("admin1"),
            actor_role: String::from("admin"),
            pilot_id: pilot_id.to_string(),
            category: category.to_string(),
            expiry_date: expiry.to_string(),
        }
    }

    fn capacity_request(period: &str, category: &str, max_count: u32) -> SetCapacityApiRequest {
        SetCapacityApiRequest {
            actor_id: String::from("admin1"),
            actor_role: String::from("admin"),
            roster_period: period.to_string(),
            category: category.to_string(),
            max_count,
        }
    }

    fn generate_request(role: &str, horizon_months: u32) -> GeneratePlanApiRequest {
        GeneratePlanApiRequest {
            actor_id: String::from("ops1"),
            actor_role: role.to_string(),
            cause_id: String::from("req-1"),
            cause_description: String::from("Planning run"),
            horizon_months,
            as_of: Some(String::from("2025-11-01")),
            category_filter: None,
            pilot_filter: None,
        }
    }

    /// Seeds three certifications and capacity via the HTTP surface.
    async fn seed_fleet(app: &Router) {
        for (pilot, category, expiry) in [
            ("PX1001", "Proficiency Check", "2026-03-15"),
            ("PX1002", "Medical", "2026-01-20"),
            ("PX1003", "ID Cards", "2026-01-10"),
        ] {
            let response =
                post_json(app, "/certifications", &certification_request(pilot, category, expiry))
                    .await;
            assert_eq!(response.status(), HttpStatusCode::OK);
        }
        for (period, category, max_count) in [
            ("RP13/2025", "Proficiency Check", 2),
            ("RP01/2026", "Medical", 3),
            ("RP01/2026", "ID Cards", 2),
        ] {
            let response =
                put_json(app, "/capacity", &capacity_request(period, category, max_count)).await;
            assert_eq!(response.status(), HttpStatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_generate_plan_endpoint() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;

        let response = post_json(&app, "/plan/generate", &generate_request("admin", 6)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: GeneratePlanApiResponse = body_json(response).await;
        assert!(body.success);
        assert_eq!(body.total_plans, 3);
        assert_eq!(body.total_skipped, 0);
        assert!(body.event_id > 0);
    }

    #[tokio::test]
    async fn test_generate_plan_as_planner_succeeds() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;

        let response = post_json(&app, "/plan/generate", &generate_request("planner", 6)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_role_returns_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = post_json(&app, "/plan/generate", &generate_request("dispatcher", 6)).await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_horizon_returns_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = post_json(&app, "/plan/generate", &generate_request("admin", 0)).await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_run_returns_conflict() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;

        let first = post_json(&app, "/plan/generate", &generate_request("admin", 6)).await;
        assert_eq!(first.status(), HttpStatusCode::OK);

        let second = post_json(&app, "/plan/generate", &generate_request("admin", 6)).await;
        assert_eq!(second.status(), HttpStatusCode::CONFLICT);

        let error: ErrorResponse = body_json(second).await;
        assert!(error.error);
        assert!(error.message.contains("not committed"));
    }

    #[tokio::test]
    async fn test_clear_as_planner_is_forbidden_and_does_not_mutate() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;
        post_json(&app, "/plan/generate", &generate_request("admin", 6)).await;

        let clear_req: ClearPlansApiRequest = ClearPlansApiRequest {
            actor_id: String::from("planner1"),
            actor_role: String::from("planner"),
            cause_id: String::from("req-2"),
            cause_description: String::from("Attempted clear"),
        };
        let response = post_json(&app, "/plan/clear", &clear_req).await;
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        // Only the GeneratePlan event is in the timeline.
        let timeline: Vec<AuditEventResponse> = body_json(get_uri(&app, "/audit/timeline").await).await;
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].action_name, "GeneratePlan");
    }

    #[tokio::test]
    async fn test_clear_as_admin_deletes_plans() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;
        post_json(&app, "/plan/generate", &generate_request("admin", 6)).await;

        let clear_req: ClearPlansApiRequest = ClearPlansApiRequest {
            actor_id: String::from("admin1"),
            actor_role: String::from("admin"),
            cause_id: String::from("req-2"),
            cause_description: String::from("Regeneration"),
        };
        let response = post_json(&app, "/plan/clear", &clear_req).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: ClearPlansApiResponse = body_json(response).await;
        assert!(body.success);
        assert_eq!(body.deleted_count, 3);

        // Plans are gone and the clear was audited.
        let timeline: Vec<AuditEventResponse> = body_json(get_uri(&app, "/audit/timeline").await).await;
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[1].action_name, "ClearPlans");
        assert_eq!(timeline[1].after_entry_count, 0);
    }

    #[tokio::test]
    async fn test_pilot_plans_endpoint() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;
        post_json(&app, "/plan/generate", &generate_request("admin", 6)).await;

        let response = get_uri(&app, "/plans/pilot/PX1003").await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: fleet_cert_api::PilotPlansResponse = body_json(response).await;
        assert_eq!(body.pilot_id, "PX1003");
        assert_eq!(body.plans.len(), 1);
        let entry = &body.plans[0];
        assert_eq!(entry.planned_date, "2026-01-10");
        assert_eq!(entry.status, "planned");
    }

    #[tokio::test]
    async fn test_period_summary_endpoint() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;
        post_json(&app, "/plan/generate", &generate_request("admin", 6)).await;

        let response = get_uri(&app, "/plans/summary?period=RP13/2025").await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: fleet_cert_api::PeriodSummaryResponse = body_json(response).await;
        assert_eq!(body.summary.total_planned, 1);
        assert_eq!(body.summary.total_capacity, 2);
    }

    #[tokio::test]
    async fn test_export_endpoint_returns_csv() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;
        post_json(&app, "/plan/generate", &generate_request("admin", 6)).await;

        let response = get_uri(&app, "/plans/export").await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        assert!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/csv")
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv: String = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.starts_with("pilot_id,"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_due_certifications_endpoint() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;

        let response = get_uri(
            &app,
            "/certifications/due?horizon_months=3&as_of=2025-11-01",
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: fleet_cert_api::DueCertificationsResponse = body_json(response).await;
        // Only the two January expiries fall inside three months.
        assert_eq!(body.certifications.len(), 2);
    }

    #[tokio::test]
    async fn test_audit_event_by_id() {
        let app: Router = build_router(create_test_app_state());
        seed_fleet(&app).await;

        let generate = post_json(&app, "/plan/generate", &generate_request("admin", 6)).await;
        let body: GeneratePlanApiResponse = body_json(generate).await;

        let response = get_uri(&app, &format!("/audit/event/{}", body.event_id)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let event: AuditEventResponse = body_json(response).await;
        assert_eq!(event.action_name, "GeneratePlan");
        assert_eq!(event.actor_id, "ops1");
        assert_eq!(event.after_entry_count, 3);
    }

    #[tokio::test]
    async fn test_missing_audit_event_returns_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = get_uri(&app, "/audit/event/99").await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_capacity_endpoints_round_trip() {
        let app: Router = build_router(create_test_app_state());

        let response = put_json(&app, "/capacity", &capacity_request("RP05/2026", "Medical", 4)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let fetched = get_uri(&app, "/capacity?period=RP05/2026").await;
        assert_eq!(fetched.status(), HttpStatusCode::OK);
        let body: fleet_cert_api::CapacityResponse = body_json(fetched).await;
        assert_eq!(body.by_category.get("Medical"), Some(&4));
    }

    #[tokio::test]
    async fn test_set_capacity_as_planner_is_forbidden() {
        let app: Router = build_router(create_test_app_state());

        let mut request: SetCapacityApiRequest = capacity_request("RP05/2026", "Medical", 4);
        request.actor_role = String::from("planner");
        let response = put_json(&app, "/capacity", &request).await;
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }
}
