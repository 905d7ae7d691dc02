//! # Menu Check API
//!
//! The check lifecycle surface: run a check for a site-month, fetch a
//! check with its aggregate counters, fetch its ordered results with
//! day-level evidence, re-run in place, and the dashboard stats card.
//!
//! Concurrency semantics surface here as status codes: a second run on
//! the same `(site, month, year)` key while one is in flight returns
//! 409 and the caller may retry after backoff.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use mensa_core::{CheckId, CheckResult, MenuCheck, MenuPeriod, RuleEvidence, SiteId};
use mensa_engine::{CheckFilter, ComplianceStats};

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Query parameters for listing checks.
#[derive(Debug, Deserialize)]
pub struct ListChecksParams {
    /// Only checks for this site.
    pub site_id: Option<Uuid>,
    /// Only checks whose period falls in this year.
    pub year: Option<i32>,
    /// Truncate the newest-first listing.
    pub limit: Option<usize>,
}

/// Request body for running a new check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RunCheckRequest {
    pub site_id: Uuid,
    /// 1-based month.
    pub month: u32,
    pub year: i32,
}

/// A check run with its aggregate counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckResponse {
    pub id: Uuid,
    pub site_id: Uuid,
    pub month: u32,
    pub year: i32,
    /// RUNNING, COMPLETE, or FAILED.
    pub status: String,
    pub checked_at: DateTime<Utc>,
    pub dishes_above: u32,
    pub dishes_under: u32,
    pub dishes_even: u32,
    pub critical_findings: u32,
    /// Hex SHA-256 over the canonicalized result set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_digest: Option<String>,
}

impl From<MenuCheck> for CheckResponse {
    fn from(check: MenuCheck) -> Self {
        Self {
            id: *check.id.as_uuid(),
            site_id: *check.site_id.as_uuid(),
            month: check.period.month(),
            year: check.period.year(),
            status: check.status.to_string(),
            checked_at: check.checked_at,
            dishes_above: check.dishes_above,
            dishes_under: check.dishes_under,
            dishes_even: check.dishes_even,
            critical_findings: check.critical_findings,
            results_digest: check.results_digest.map(|d| d.to_hex()),
        }
    }
}

/// Day-level evidence backing one result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvidenceResponse {
    /// Absent only for degraded results.
    pub expected_count: Option<u32>,
    pub actual_count: u32,
    /// above, under, or even.
    pub comparison: String,
    pub found_on_days: Vec<NaiveDate>,
    pub missing_on_days: Vec<NaiveDate>,
    pub warning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<RuleEvidence> for EvidenceResponse {
    fn from(evidence: RuleEvidence) -> Self {
        Self {
            expected_count: evidence.expected_count,
            actual_count: evidence.actual_count,
            comparison: evidence.comparison.to_string(),
            found_on_days: evidence.found_on_days,
            missing_on_days: evidence.missing_on_days,
            warning: evidence.warning,
            note: evidence.note,
        }
    }
}

/// One rule's outcome within a check.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckResultResponse {
    pub id: Uuid,
    pub rule_id: Uuid,
    pub rule_name: String,
    pub rule_category: Option<String>,
    /// critical or warning.
    pub severity: String,
    pub evidence: EvidenceResponse,
}

impl From<CheckResult> for CheckResultResponse {
    fn from(result: CheckResult) -> Self {
        Self {
            id: result.id,
            rule_id: *result.rule_id.as_uuid(),
            rule_name: result.rule_name,
            rule_category: result.rule_category,
            severity: match result.severity {
                mensa_core::Severity::Critical => "critical".to_string(),
                mensa_core::Severity::Warning => "warning".to_string(),
            },
            evidence: result.evidence.into(),
        }
    }
}

/// Dashboard aggregates across all completed checks.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplianceStatsResponse {
    pub total_checks: u32,
    pub dishes_above: u32,
    pub dishes_under: u32,
    pub dishes_even: u32,
    pub critical_findings: u32,
}

impl From<ComplianceStats> for ComplianceStatsResponse {
    fn from(stats: ComplianceStats) -> Self {
        Self {
            total_checks: stats.total_checks,
            dishes_above: stats.dishes_above,
            dishes_under: stats.dishes_under,
            dishes_even: stats.dishes_even,
            critical_findings: stats.critical_findings,
        }
    }
}

/// Build the check lifecycle router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/checks", get(list_checks).post(run_check))
        .route("/v1/checks/:check_id", get(get_check))
        .route("/v1/checks/:check_id/results", get(get_check_results))
        .route("/v1/checks/:check_id/rerun", post(rerun_check))
        .route("/v1/stats", get(compliance_stats))
}

/// GET /v1/checks — List checks, newest first.
#[utoipa::path(
    get,
    path = "/v1/checks",
    params(
        ("site_id" = Option<Uuid>, Query, description = "Only checks for this site"),
        ("year" = Option<i32>, Query, description = "Only checks for this year"),
        ("limit" = Option<usize>, Query, description = "Truncate the newest-first listing"),
    ),
    responses(
        (status = 200, description = "Checks, newest first", body = Vec<CheckResponse>),
    ),
    tag = "checks"
)]
async fn list_checks(
    State(state): State<AppState>,
    Query(params): Query<ListChecksParams>,
) -> Json<Vec<CheckResponse>> {
    let filter = CheckFilter {
        site_id: params.site_id.map(SiteId::from_uuid),
        year: params.year,
        limit: params.limit,
    };
    let checks = state
        .checks
        .list(filter)
        .into_iter()
        .map(CheckResponse::from)
        .collect();
    Json(checks)
}

/// POST /v1/checks — Run a compliance check for a site and month.
#[utoipa::path(
    post,
    path = "/v1/checks",
    request_body = RunCheckRequest,
    responses(
        (status = 201, description = "Check completed", body = CheckResponse),
        (status = 404, description = "No menu deposited for the period", body = ErrorBody),
        (status = 409, description = "A check is already running for the period", body = ErrorBody),
        (status = 422, description = "Invalid month", body = ErrorBody),
    ),
    tag = "checks"
)]
async fn run_check(
    State(state): State<AppState>,
    Json(req): Json<RunCheckRequest>,
) -> Result<(StatusCode, Json<CheckResponse>), AppError> {
    let period = MenuPeriod::new(req.year, req.month)?;
    let check = state
        .orchestrator
        .run_check(SiteId::from_uuid(req.site_id), period)?;
    Ok((StatusCode::CREATED, Json(check.into())))
}

/// GET /v1/checks/{check_id} — Fetch a check with aggregate counters.
#[utoipa::path(
    get,
    path = "/v1/checks/{check_id}",
    params(("check_id" = Uuid, Path, description = "Check identifier")),
    responses(
        (status = 200, description = "The check", body = CheckResponse),
        (status = 404, description = "Unknown check", body = ErrorBody),
    ),
    tag = "checks"
)]
async fn get_check(
    State(state): State<AppState>,
    Path(check_id): Path<Uuid>,
) -> Result<Json<CheckResponse>, AppError> {
    let check = state
        .checks
        .get(CheckId::from_uuid(check_id))
        .ok_or_else(|| AppError::NotFound(format!("check not found: {check_id}")))?;
    Ok(Json(check.into()))
}

/// GET /v1/checks/{check_id}/results — Fetch a check's ordered results.
#[utoipa::path(
    get,
    path = "/v1/checks/{check_id}/results",
    params(("check_id" = Uuid, Path, description = "Check identifier")),
    responses(
        (status = 200, description = "Results in evaluation order", body = Vec<CheckResultResponse>),
        (status = 404, description = "Unknown check", body = ErrorBody),
    ),
    tag = "checks"
)]
async fn get_check_results(
    State(state): State<AppState>,
    Path(check_id): Path<Uuid>,
) -> Result<Json<Vec<CheckResultResponse>>, AppError> {
    let results = state
        .checks
        .results(CheckId::from_uuid(check_id))
        .ok_or_else(|| AppError::NotFound(format!("check not found: {check_id}")))?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

/// POST /v1/checks/{check_id}/rerun — Re-run a check in place.
///
/// Re-reads current rules and menu data and atomically replaces the
/// check's results. Returns no body beyond success/failure.
#[utoipa::path(
    post,
    path = "/v1/checks/{check_id}/rerun",
    params(("check_id" = Uuid, Path, description = "Check identifier")),
    responses(
        (status = 204, description = "Check re-run and results replaced"),
        (status = 404, description = "Unknown check or missing menu", body = ErrorBody),
        (status = 409, description = "A check is already running for the period", body = ErrorBody),
    ),
    tag = "checks"
)]
async fn rerun_check(
    State(state): State<AppState>,
    Path(check_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.orchestrator.rerun_check(CheckId::from_uuid(check_id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/stats — Dashboard aggregates across all completed checks.
#[utoipa::path(
    get,
    path = "/v1/stats",
    responses(
        (status = 200, description = "Aggregates over completed checks", body = ComplianceStatsResponse),
    ),
    tag = "checks"
)]
async fn compliance_stats(State(state): State<AppState>) -> Json<ComplianceStatsResponse> {
    Json(state.checks.stats().into())
}
