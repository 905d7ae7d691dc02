//! # Dish Catalog API
//!
//! The catalog review surface: list cataloged dishes with filters,
//! assign categories and rule links, the category dropdown options,
//! and the catalog stats card.
//!
//! Rule links are validated against the rule store before they are
//! written — a dangling reference is rejected with 422 up front rather
//! than discovered as an integrity error during the next check run.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use mensa_catalog::{CatalogUpdate, DishCatalogEntry, DishFilter};
use mensa_core::{DishCategory, DishId, RuleId};

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Query parameters for listing the catalog.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Only entries with this category (wire name, e.g. `soup`).
    pub category: Option<String>,
    /// Only entries still needing review (no category or no rule link).
    pub unassigned: Option<bool>,
    /// Substring match on the normalized dish name.
    pub search: Option<String>,
}

/// A catalog entry as shown on the review screen.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DishResponse {
    pub id: Uuid,
    pub dish_name: String,
    pub normalized_name: String,
    pub category: Option<String>,
    pub compliance_rule_id: Option<Uuid>,
    /// Denormalized rule name for display, when linked.
    pub rule_name: Option<String>,
    pub approved: bool,
    /// Drives the "Review" badge.
    pub needs_review: bool,
}

/// Partial update from the review screen; absent fields are unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDishRequest {
    /// Category wire name, e.g. `protein_chicken`.
    pub category: Option<String>,
    pub compliance_rule_id: Option<Uuid>,
}

/// One dropdown option for the category selector.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// Catalog stats card payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogStatsResponse {
    pub total: u32,
    pub categorized: u32,
    pub uncategorized: u32,
    pub rule_linked: u32,
    pub unlinked: u32,
    pub by_category: BTreeMap<String, u32>,
}

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/catalog", get(list_dishes))
        .route("/v1/catalog/categories", get(list_categories))
        .route("/v1/catalog/stats", get(catalog_stats))
        .route("/v1/catalog/:dish_id", axum::routing::put(update_dish))
}

fn dish_response(state: &AppState, entry: DishCatalogEntry) -> DishResponse {
    let rule_name = entry
        .compliance_rule_id
        .and_then(|id| state.rules.get(id))
        .map(|r| r.name);
    DishResponse {
        id: *entry.id.as_uuid(),
        dish_name: entry.dish_name,
        normalized_name: entry.normalized_name,
        category: entry.category.map(|c| c.as_str().to_string()),
        compliance_rule_id: entry.compliance_rule_id.map(|r| *r.as_uuid()),
        rule_name,
        approved: entry.approved,
        needs_review: entry.category.is_none() || entry.compliance_rule_id.is_none(),
    }
}

/// GET /v1/catalog — List cataloged dishes with optional filters.
#[utoipa::path(
    get,
    path = "/v1/catalog",
    params(
        ("category" = Option<String>, Query, description = "Only entries with this category"),
        ("unassigned" = Option<bool>, Query, description = "Only entries still needing review"),
        ("search" = Option<String>, Query, description = "Substring match on the normalized name"),
    ),
    responses(
        (status = 200, description = "Catalog entries sorted by name", body = Vec<DishResponse>),
        (status = 422, description = "Unknown category filter", body = ErrorBody),
    ),
    tag = "catalog"
)]
async fn list_dishes(
    State(state): State<AppState>,
    Query(params): Query<CatalogQuery>,
) -> Result<Json<Vec<DishResponse>>, AppError> {
    let category = params
        .category
        .map(|raw| DishCategory::from_str(&raw))
        .transpose()?;
    let filter = DishFilter {
        category,
        unassigned: params.unassigned.unwrap_or(false),
        search: params.search,
    };
    let dishes = state
        .catalog
        .list(&filter)
        .into_iter()
        .map(|entry| dish_response(&state, entry))
        .collect();
    Ok(Json(dishes))
}

/// PUT /v1/catalog/{dish_id} — Assign category and/or rule link.
#[utoipa::path(
    put,
    path = "/v1/catalog/{dish_id}",
    params(("dish_id" = Uuid, Path, description = "Dish identifier")),
    request_body = UpdateDishRequest,
    responses(
        (status = 200, description = "Updated entry", body = DishResponse),
        (status = 404, description = "Unknown dish", body = ErrorBody),
        (status = 422, description = "Unknown category or rule id", body = ErrorBody),
    ),
    tag = "catalog"
)]
async fn update_dish(
    State(state): State<AppState>,
    Path(dish_id): Path<Uuid>,
    Json(req): Json<UpdateDishRequest>,
) -> Result<Json<DishResponse>, AppError> {
    let category = req
        .category
        .map(|raw| DishCategory::from_str(&raw))
        .transpose()?;

    // No dangling references: the rule must exist before it is linked.
    let compliance_rule_id = req.compliance_rule_id.map(RuleId::from_uuid);
    if let Some(rule_id) = compliance_rule_id {
        if !state.rules.contains(rule_id) {
            return Err(AppError::Validation(format!(
                "compliance rule not found: {rule_id}"
            )));
        }
    }

    let entry = state.catalog.apply_update(
        DishId::from_uuid(dish_id),
        CatalogUpdate {
            category,
            compliance_rule_id,
        },
    )?;
    Ok(Json(dish_response(&state, entry)))
}

/// GET /v1/catalog/categories — Category dropdown options.
#[utoipa::path(
    get,
    path = "/v1/catalog/categories",
    responses(
        (status = 200, description = "Category options in display order", body = Vec<CategoryOption>),
    ),
    tag = "catalog"
)]
async fn list_categories() -> Json<Vec<CategoryOption>> {
    let options = DishCategory::all()
        .iter()
        .map(|c| CategoryOption {
            value: c.as_str().to_string(),
            label: c.label().to_string(),
        })
        .collect();
    Json(options)
}

/// GET /v1/catalog/stats — Catalog stats card.
#[utoipa::path(
    get,
    path = "/v1/catalog/stats",
    responses(
        (status = 200, description = "Catalog aggregates", body = CatalogStatsResponse),
    ),
    tag = "catalog"
)]
async fn catalog_stats(State(state): State<AppState>) -> Json<CatalogStatsResponse> {
    let stats = state.catalog.stats();
    Json(CatalogStatsResponse {
        total: stats.total,
        categorized: stats.categorized,
        uncategorized: stats.uncategorized,
        rule_linked: stats.rule_linked,
        unlinked: stats.unlinked,
        by_category: stats.by_category,
    })
}
