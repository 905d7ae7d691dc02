//! # Menu Deposit API
//!
//! Ingestion endpoint for the external menu-parsing collaborator:
//! `PUT /v1/menus` deposits one site-month of parsed daily menus,
//! replacing any prior deposit for the key. Validation enforces the
//! ingestion contract (dates inside the month, no duplicate dates);
//! the engine performs no parsing itself.

use axum::extract::State;
use axum::routing::put;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use mensa_core::{MenuDay, MenuPeriod, ParsedMenu, SiteId};

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// One parsed day in a menu deposit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuDayInput {
    /// Served date (must fall inside the deposit's month).
    pub date: NaiveDate,
    /// Raw dish names extracted from the source document.
    pub dishes: Vec<String>,
}

/// A full site-month menu deposit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepositMenuRequest {
    pub site_id: Uuid,
    /// 1-based month.
    pub month: u32,
    pub year: i32,
    pub days: Vec<MenuDayInput>,
}

/// Acknowledgement of a deposit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepositMenuResponse {
    pub site_id: Uuid,
    /// Period in `YYYY-MM` form.
    pub period: String,
    /// Number of served days accepted.
    pub days: usize,
}

/// Build the menu deposit router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/menus", put(deposit_menu))
}

/// PUT /v1/menus — Deposit a parsed menu for a site and month.
#[utoipa::path(
    put,
    path = "/v1/menus",
    request_body = DepositMenuRequest,
    responses(
        (status = 200, description = "Menu deposited", body = DepositMenuResponse),
        (status = 422, description = "Invalid deposit (bad month, out-of-period or duplicate dates)", body = ErrorBody),
    ),
    tag = "menus"
)]
async fn deposit_menu(
    State(state): State<AppState>,
    Json(req): Json<DepositMenuRequest>,
) -> Result<Json<DepositMenuResponse>, AppError> {
    let period = MenuPeriod::new(req.year, req.month)?;
    let site_id = SiteId::from_uuid(req.site_id);
    let days = req
        .days
        .into_iter()
        .map(|d| MenuDay {
            date: d.date,
            dishes: d.dishes,
        })
        .collect();
    let menu = ParsedMenu::new(site_id, period, days)?;
    let accepted = menu.days().len();
    state.menus.deposit(menu);

    Ok(Json(DepositMenuResponse {
        site_id: req.site_id,
        period: period.to_string(),
        days: accepted,
    }))
}
