//! # End-to-End API Scenario: One Site, One January
//!
//! Exercises the full HTTP surface as a unified system. One story in
//! five acts: a parsed menu is deposited, a fruit rule is configured,
//! a check runs and reports under-serving with day-level evidence, a
//! reviewer links an unmatched dish to the rule from the catalog
//! screen, and a re-run flips the outcome in place.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use mensa_api::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_app(state: &AppState) -> axum::Router {
    mensa_api::app(state.clone())
}

/// Parse a response body as JSON.
async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a request with a JSON body.
fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a bodyless request.
fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn full_compliance_story() {
    let state = AppState::new();
    let site = Uuid::new_v4();

    // ── Act 1: the parsing collaborator deposits January ─────────────
    // 12 served days; "Fruit Plate" on the first 4, "House Special"
    // (an unseen dish) every day.
    let days: Vec<serde_json::Value> = (5..=16)
        .map(|d| {
            let mut dishes = vec!["House Special".to_string(), "Bread".to_string()];
            if d <= 8 {
                dishes.push("Fruit Plate".to_string());
            }
            serde_json::json!({"date": format!("2026-01-{d:02}"), "dishes": dishes})
        })
        .collect();
    let resp = test_app(&state)
        .oneshot(json_request(
            "PUT",
            "/v1/menus",
            serde_json::json!({"site_id": site, "month": 1, "year": 2026, "days": days}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // ── Act 2: a fruit rule is configured ────────────────────────────
    let resp = test_app(&state)
        .oneshot(json_request(
            "POST",
            "/v1/rules",
            serde_json::json!({
                "name": "Fresh Fruit",
                "category": "Menu Variety",
                "rule_type": "min_frequency",
                "match_criteria": {"kind": "keywords", "keywords": ["fruit", "פרי"]},
                "frequency": 8,
                "period": "month",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let rule = body_json(resp).await;
    let rule_id = rule["id"].as_str().unwrap().to_string();

    // ── Act 3: the check runs and reports under-serving ─────────────
    let resp = test_app(&state)
        .oneshot(json_request(
            "POST",
            "/v1/checks",
            serde_json::json!({"site_id": site, "month": 1, "year": 2026}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let check = body_json(resp).await;
    let check_id = check["id"].as_str().unwrap().to_string();
    assert_eq!(check["status"], "COMPLETE");
    assert_eq!(check["dishes_under"], 1);
    assert_eq!(check["critical_findings"], 1);
    let first_digest = check["results_digest"].as_str().unwrap().to_string();

    let resp = test_app(&state)
        .oneshot(bare_request("GET", &format!("/v1/checks/{check_id}/results")))
        .await
        .unwrap();
    let results = body_json(resp).await;
    let evidence = &results[0]["evidence"];
    assert_eq!(evidence["expected_count"], 8);
    assert_eq!(evidence["actual_count"], 4);
    assert_eq!(evidence["comparison"], "under");
    assert_eq!(evidence["found_on_days"].as_array().unwrap().len(), 4);
    assert_eq!(evidence["missing_on_days"].as_array().unwrap().len(), 4);
    // Evidence days are sorted ascending.
    assert_eq!(evidence["found_on_days"][0], "2026-01-05");
    assert_eq!(evidence["missing_on_days"][0], "2026-01-09");

    // ── Act 4: the reviewer links the unmatched dish ────────────────
    // The check sighted "House Special" and put it on the review queue.
    let resp = test_app(&state)
        .oneshot(bare_request("GET", "/v1/catalog?unassigned=true"))
        .await
        .unwrap();
    let unassigned = body_json(resp).await;
    let house_special = unassigned
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["dish_name"] == "House Special")
        .expect("House Special should be on the review queue");
    assert_eq!(house_special["needs_review"], true);
    let dish_id = house_special["id"].as_str().unwrap();

    let resp = test_app(&state)
        .oneshot(json_request(
            "PUT",
            &format!("/v1/catalog/{dish_id}"),
            serde_json::json!({"category": "desserts", "compliance_rule_id": rule_id}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["rule_name"], "Fresh Fruit");
    assert_eq!(updated["needs_review"], false);

    // Catalog stats reflect the review progress.
    let resp = test_app(&state)
        .oneshot(bare_request("GET", "/v1/catalog/stats"))
        .await
        .unwrap();
    let stats = body_json(resp).await;
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["categorized"], 1);
    assert_eq!(stats["rule_linked"], 1);

    // ── Act 5: the re-run flips the outcome in place ────────────────
    let resp = test_app(&state)
        .oneshot(bare_request("POST", &format!("/v1/checks/{check_id}/rerun")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test_app(&state)
        .oneshot(bare_request("GET", &format!("/v1/checks/{check_id}")))
        .await
        .unwrap();
    let after = body_json(resp).await;
    // Every served day now credits the rule via the catalog link:
    // 12 actual vs 8 expected — above, same check id, new digest.
    assert_eq!(after["id"].as_str().unwrap(), check_id);
    assert_eq!(after["dishes_above"], 1);
    assert_eq!(after["dishes_under"], 0);
    assert_eq!(after["critical_findings"], 0);
    assert_ne!(after["results_digest"].as_str().unwrap(), first_digest);

    // The dashboard stats card follows the stored counters.
    let resp = test_app(&state)
        .oneshot(bare_request("GET", "/v1/stats"))
        .await
        .unwrap();
    let stats = body_json(resp).await;
    assert_eq!(stats["total_checks"], 1);
    assert_eq!(stats["dishes_above"], 1);
    assert_eq!(stats["dishes_under"], 0);
}

#[tokio::test]
async fn rerun_on_missing_check_is_404() {
    let state = AppState::new();
    let resp = test_app(&state)
        .oneshot(bare_request(
            "POST",
            &format!("/v1/checks/{}/rerun", Uuid::new_v4()),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn error_bodies_carry_machine_readable_codes() {
    let state = AppState::new();
    let resp = test_app(&state)
        .oneshot(json_request(
            "POST",
            "/v1/checks",
            serde_json::json!({"site_id": Uuid::new_v4(), "month": 1, "year": 2026}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body["error"]["message"].as_str().unwrap().contains("menu"));
}
