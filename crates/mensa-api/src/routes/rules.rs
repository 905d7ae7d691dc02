//! # Compliance Rules API
//!
//! CRUD for rule definitions. Rules are edited out-of-band of check
//! runs: a run snapshots current definitions when it starts, and a
//! re-run picks up edits made here.
//!
//! Deletion is a deactivation: the rule keeps its history and its
//! catalog back-references are nulled (weak-reference semantics — the
//! catalog entries themselves are never touched).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use mensa_core::RuleId;
use mensa_rules::{ComplianceRule, MatchCriteria, RulePeriod, RuleType};

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Query parameters for listing rules.
#[derive(Debug, Deserialize)]
pub struct ListRulesParams {
    /// Exclude deactivated rules.
    pub active_only: Option<bool>,
}

/// A rule definition on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RuleResponse {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    /// min_frequency, max_frequency, or exact_frequency.
    pub rule_type: String,
    /// Tagged criteria object (`{"kind": "keywords", ...}`).
    #[schema(value_type = Object)]
    pub match_criteria: MatchCriteria,
    pub frequency: u32,
    /// month or week.
    pub period: String,
    pub priority: u8,
    pub is_active: bool,
}

impl From<ComplianceRule> for RuleResponse {
    fn from(rule: ComplianceRule) -> Self {
        Self {
            id: *rule.id.as_uuid(),
            name: rule.name,
            category: rule.category,
            rule_type: rule.rule_type.to_string(),
            match_criteria: rule.match_criteria,
            frequency: rule.frequency,
            period: match rule.period {
                RulePeriod::Month => "month".to_string(),
                RulePeriod::Week => "week".to_string(),
            },
            priority: rule.priority,
            is_active: rule.is_active,
        }
    }
}

/// Request body for creating a rule.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRuleRequest {
    pub name: String,
    pub category: Option<String>,
    #[schema(value_type = String)]
    pub rule_type: RuleType,
    #[schema(value_type = Object)]
    pub match_criteria: MatchCriteria,
    pub frequency: u32,
    #[schema(value_type = String)]
    pub period: RulePeriod,
    /// Defaults to 1 (critical tier).
    pub priority: Option<u8>,
}

/// Request body for updating a rule; absent fields are unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateRuleRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>)]
    pub rule_type: Option<RuleType>,
    #[schema(value_type = Option<Object>)]
    pub match_criteria: Option<MatchCriteria>,
    pub frequency: Option<u32>,
    #[schema(value_type = Option<String>)]
    pub period: Option<RulePeriod>,
    pub priority: Option<u8>,
    pub is_active: Option<bool>,
}

/// Build the rules router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/rules", get(list_rules).post(create_rule))
        .route(
            "/v1/rules/:rule_id",
            axum::routing::put(update_rule).delete(delete_rule),
        )
}

/// GET /v1/rules — List rules ordered by priority, then name.
#[utoipa::path(
    get,
    path = "/v1/rules",
    params(
        ("active_only" = Option<bool>, Query, description = "Exclude deactivated rules"),
    ),
    responses(
        (status = 200, description = "Rules ordered by priority then name", body = Vec<RuleResponse>),
    ),
    tag = "rules"
)]
async fn list_rules(
    State(state): State<AppState>,
    Query(params): Query<ListRulesParams>,
) -> Json<Vec<RuleResponse>> {
    let rules = state
        .rules
        .list(params.active_only.unwrap_or(false))
        .into_iter()
        .map(RuleResponse::from)
        .collect();
    Json(rules)
}

/// POST /v1/rules — Create a rule.
#[utoipa::path(
    post,
    path = "/v1/rules",
    request_body = CreateRuleRequest,
    responses(
        (status = 201, description = "Created rule", body = RuleResponse),
        (status = 422, description = "Invalid rule definition", body = ErrorBody),
    ),
    tag = "rules"
)]
async fn create_rule(
    State(state): State<AppState>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<(StatusCode, Json<RuleResponse>), AppError> {
    let rule = ComplianceRule {
        id: RuleId::new(),
        name: req.name,
        category: req.category,
        rule_type: req.rule_type,
        match_criteria: req.match_criteria,
        frequency: req.frequency,
        period: req.period,
        priority: req.priority.unwrap_or(1),
        is_active: true,
    };
    let created = state.rules.insert(rule)?;
    tracing::info!(rule = %created.name, id = %created.id, "compliance rule created");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT /v1/rules/{rule_id} — Update a rule definition.
#[utoipa::path(
    put,
    path = "/v1/rules/{rule_id}",
    params(("rule_id" = Uuid, Path, description = "Rule identifier")),
    request_body = UpdateRuleRequest,
    responses(
        (status = 200, description = "Updated rule", body = RuleResponse),
        (status = 404, description = "Unknown rule", body = ErrorBody),
        (status = 422, description = "Update yields an invalid definition", body = ErrorBody),
    ),
    tag = "rules"
)]
async fn update_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    Json(req): Json<UpdateRuleRequest>,
) -> Result<Json<RuleResponse>, AppError> {
    let rule_id = RuleId::from_uuid(rule_id);
    let mut rule = state
        .rules
        .get(rule_id)
        .ok_or_else(|| AppError::NotFound(format!("rule not found: {rule_id}")))?;

    if let Some(name) = req.name {
        rule.name = name;
    }
    if let Some(category) = req.category {
        rule.category = Some(category);
    }
    if let Some(rule_type) = req.rule_type {
        rule.rule_type = rule_type;
    }
    if let Some(match_criteria) = req.match_criteria {
        rule.match_criteria = match_criteria;
    }
    if let Some(frequency) = req.frequency {
        rule.frequency = frequency;
    }
    if let Some(period) = req.period {
        rule.period = period;
    }
    if let Some(priority) = req.priority {
        rule.priority = priority;
    }
    if let Some(is_active) = req.is_active {
        rule.is_active = is_active;
    }

    let updated = state.rules.update(rule)?;
    Ok(Json(updated.into()))
}

/// DELETE /v1/rules/{rule_id} — Deactivate a rule and unlink the catalog.
#[utoipa::path(
    delete,
    path = "/v1/rules/{rule_id}",
    params(("rule_id" = Uuid, Path, description = "Rule identifier")),
    responses(
        (status = 204, description = "Rule deactivated; catalog references nulled"),
        (status = 404, description = "Unknown rule", body = ErrorBody),
    ),
    tag = "rules"
)]
async fn delete_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .rules
        .deactivate(RuleId::from_uuid(rule_id), &state.catalog)?;
    Ok(StatusCode::NO_CONTENT)
}
