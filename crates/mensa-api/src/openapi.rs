//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`. The spec is the observed contract the
//! dashboard consumes; integrators generate clients from it.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mensa API — Menu Compliance Engine",
        version = "0.3.2",
        description = "Server-side core of the menu compliance dashboard.\n\nProvides:\n- **Menu deposits** from the external menu-parsing collaborator\n- **Check runs** per site-month with atomic re-run in place\n- **Per-rule results** with day-level found/missing evidence\n- **Dish catalog** review (categorization, rule linking, stats)\n- **Compliance rules** CRUD with closed match-criteria variants",
        license(name = "AGPL-3.0-or-later")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // ── Checks ───────────────────────────────────────────────────
        crate::routes::checks::list_checks,
        crate::routes::checks::run_check,
        crate::routes::checks::get_check,
        crate::routes::checks::get_check_results,
        crate::routes::checks::rerun_check,
        crate::routes::checks::compliance_stats,
        // ── Menus ────────────────────────────────────────────────────
        crate::routes::menus::deposit_menu,
        // ── Catalog ──────────────────────────────────────────────────
        crate::routes::catalog::list_dishes,
        crate::routes::catalog::update_dish,
        crate::routes::catalog::list_categories,
        crate::routes::catalog::catalog_stats,
        // ── Rules ────────────────────────────────────────────────────
        crate::routes::rules::list_rules,
        crate::routes::rules::create_rule,
        crate::routes::rules::update_rule,
        crate::routes::rules::delete_rule,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            // ── Check DTOs ───────────────────────────────────────────
            crate::routes::checks::RunCheckRequest,
            crate::routes::checks::CheckResponse,
            crate::routes::checks::CheckResultResponse,
            crate::routes::checks::EvidenceResponse,
            crate::routes::checks::ComplianceStatsResponse,
            // ── Menu DTOs ────────────────────────────────────────────
            crate::routes::menus::MenuDayInput,
            crate::routes::menus::DepositMenuRequest,
            crate::routes::menus::DepositMenuResponse,
            // ── Catalog DTOs ─────────────────────────────────────────
            crate::routes::catalog::DishResponse,
            crate::routes::catalog::UpdateDishRequest,
            crate::routes::catalog::CategoryOption,
            crate::routes::catalog::CatalogStatsResponse,
            // ── Rule DTOs ────────────────────────────────────────────
            crate::routes::rules::RuleResponse,
            crate::routes::rules::CreateRuleRequest,
            crate::routes::rules::UpdateRuleRequest,
        ),
    ),
    tags(
        (name = "checks", description = "Check lifecycle — run, re-run, results with evidence, dashboard stats"),
        (name = "menus", description = "Parsed menu deposits from the menu-parsing collaborator"),
        (name = "catalog", description = "Dish catalog review — categorization, rule linking, stats"),
        (name = "rules", description = "Compliance rule definitions"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router, serving the spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_generates_successfully() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Mensa API — Menu Compliance Engine");
    }

    #[test]
    fn spec_covers_the_observed_contract() {
        let spec = ApiDoc::openapi();
        for path in [
            "/v1/checks",
            "/v1/checks/{check_id}",
            "/v1/checks/{check_id}/results",
            "/v1/checks/{check_id}/rerun",
            "/v1/stats",
            "/v1/menus",
            "/v1/catalog",
            "/v1/catalog/{dish_id}",
            "/v1/catalog/categories",
            "/v1/catalog/stats",
            "/v1/rules",
            "/v1/rules/{rule_id}",
        ] {
            assert!(
                spec.paths.paths.contains_key(path),
                "spec should contain {path}"
            );
        }
    }

    #[test]
    fn spec_has_schemas() {
        let spec = ApiDoc::openapi();
        let schemas = &spec.components.as_ref().unwrap().schemas;
        for name in [
            "CheckResponse",
            "CheckResultResponse",
            "EvidenceResponse",
            "DishResponse",
            "RuleResponse",
            "ErrorBody",
        ] {
            assert!(schemas.contains_key(name), "should contain {name} schema");
        }
    }

    #[test]
    fn spec_serializes_to_json() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("openapi"));
    }

    #[test]
    fn router_builds() {
        let _r = router();
    }
}
