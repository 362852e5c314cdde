//! HTTP-level tests for the web surface.
//!
//! Each test fires requests straight at the router with tower's
//! `oneshot`, backed by a throwaway database file so state survives
//! across the per-request connections.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use wanderlist::export::CSV_HEADER;
use wanderlist::server::{AppState, router};
use wanderlist::storage::SqliteStore;

struct TestApp {
    app: Router,
    _dir: TempDir,
}

fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let database_path = dir.path().join("wanderlist-test.db");
    SqliteStore::open(&database_path).expect("create schema");
    let app = router(Arc::new(AppState { database_path }));
    TestApp { app, _dir: dir }
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_form_ajax(app: &Router, uri: &str, form: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header("X-Requested-With", "XMLHttpRequest")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_empty(app: &Router, uri: &str, ajax: bool) -> Response {
    let mut builder = Request::builder().method("POST").uri(uri);
    if ajax {
        builder = builder.header("X-Requested-With", "XMLHttpRequest");
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn form(name: &str, country: &str, continent: &str, category: &str, priority: &str) -> String {
    fn enc(v: &str) -> String {
        v.replace(' ', "+")
    }
    format!(
        "name={}&country={}&continent={}&category={}&description=Worth+the+trip&priority={}",
        enc(name),
        enc(country),
        enc(continent),
        enc(category),
        enc(priority)
    )
}

fn sample_form(name: &str) -> String {
    form(name, "Japan", "Asia", "Cultural", "High")
}

#[tokio::test]
async fn add_then_list_round_trip() {
    let t = test_app();

    let response = post_form(&t.app, "/add", &sample_form("Kyoto")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/places?notice=Place%20added%20to%20your%20bucket%20list%21"
    );

    let response = get(&t.app, "/places").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["places"][0]["name"], "Kyoto");
    assert_eq!(body["places"][0]["continent"], "Asia");
    assert_eq!(body["places"][0]["visited"], false);
    assert_eq!(body["places"][0]["visited_date"], serde_json::Value::Null);
}

#[tokio::test]
async fn add_rejects_incomplete_or_unknown_input() {
    let t = test_app();

    // Blank name
    let response = post_form(
        &t.app,
        "/add",
        "name=&country=Japan&continent=Asia&category=City&description=x&priority=High",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["values"]["country"], "Japan");

    // Field missing from the form entirely
    let response = post_form(
        &t.app,
        "/add",
        "name=X&country=Y&continent=Asia&category=City&description=z",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Value outside the fixed choice set
    let response = post_form(
        &t.app,
        "/add",
        "name=X&country=Y&continent=Atlantis&category=City&description=z&priority=High",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was stored
    let body = body_json(get(&t.app, "/places").await).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn home_reports_summary_counts() {
    let t = test_app();
    post_form(&t.app, "/add", &sample_form("Kyoto")).await;
    post_form(&t.app, "/add", &form("Santorini", "Greece", "Europe", "Beach", "Medium")).await;
    post_empty(&t.app, "/toggle_visited/1", true).await;

    let body = body_json(get(&t.app, "/").await).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["visited"], 1);
    assert_eq!(body["remaining"], 1);
}

#[tokio::test]
async fn add_form_lists_the_fixed_choices() {
    let t = test_app();
    let body = body_json(get(&t.app, "/add").await).await;

    let continents = body["continents"].as_array().unwrap();
    assert_eq!(continents.len(), 7);
    assert!(continents.iter().any(|v| v == "North America"));

    assert_eq!(body["categories"].as_array().unwrap().len(), 6);
    assert_eq!(body["priorities"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn edit_round_trip() {
    let t = test_app();
    post_form(&t.app, "/add", &sample_form("Kyoto")).await;

    let response = get(&t.app, "/edit/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Kyoto");
    assert_eq!(body["country"], "Japan");

    let response = post_form(&t.app, "/edit/1", &form("Kyoto", "Japan", "Asia", "City", "Low")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/places?notice=Place%20updated.");

    let body = body_json(get(&t.app, "/places").await).await;
    assert_eq!(body["places"][0]["category"], "City");
    assert_eq!(body["places"][0]["priority"], "Low");
}

#[tokio::test]
async fn edit_of_missing_place() {
    let t = test_app();

    // Browser flows bounce back to the listing with a notice
    let response = get(&t.app, "/edit/999").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/places?notice=Place%20not%20found.");

    let response = post_form(&t.app, "/edit/999", &sample_form("Ghost")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/places?notice=Place%20not%20found.");

    // Fetch calls get the structured 404 instead
    let response = post_form_ajax(&t.app, "/edit/999", &sample_form("Ghost")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn edit_validation_echoes_the_form() {
    let t = test_app();
    post_form(&t.app, "/add", &sample_form("Kyoto")).await;

    let response = post_form(
        &t.app,
        "/edit/1",
        "name=Kyoto&country=&continent=Asia&category=City&description=x&priority=High",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["values"]["name"], "Kyoto");

    // The stored row is untouched
    let body = body_json(get(&t.app, "/edit/1").await).await;
    assert_eq!(body["country"], "Japan");
}

#[tokio::test]
async fn delete_answers_by_caller_kind() {
    let t = test_app();
    post_form(&t.app, "/add", &sample_form("Kyoto")).await;
    post_form(&t.app, "/add", &sample_form("Osaka")).await;

    let response = post_empty(&t.app, "/delete/1", true).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);

    let response = post_empty(&t.app, "/delete/2", false).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/places?notice=Place%20deleted.");

    // Deleting an id that never existed still succeeds
    let response = post_empty(&t.app, "/delete/999", true).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(get(&t.app, "/places").await).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn toggle_stamps_and_clears_the_date() {
    let t = test_app();
    post_form(&t.app, "/add", &sample_form("Kyoto")).await;

    let body = body_json(post_empty(&t.app, "/toggle_visited/1", true).await).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["visited"], true);
    assert!(body["visited_date"].is_string());

    let body = body_json(post_empty(&t.app, "/toggle_visited/1", true).await).await;
    assert_eq!(body["visited"], false);
    assert_eq!(body["visited_date"], serde_json::Value::Null);

    // Unknown ids 404 as JSON even without the AJAX header
    let response = post_empty(&t.app, "/toggle_visited/999", false).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);

    // A plain form post lands back on the listing
    let response = post_empty(&t.app, "/toggle_visited/1", false).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/places");
}

#[tokio::test]
async fn listing_filters_combine() {
    let t = test_app();
    post_form(&t.app, "/add", &form("Kyoto", "Japan", "Asia", "Cultural", "High")).await;
    post_form(&t.app, "/add", &form("Santorini", "Greece", "Europe", "Beach", "Medium")).await;
    post_form(&t.app, "/add", &form("Bondi", "Australia", "Australia", "Beach", "Low")).await;
    post_empty(&t.app, "/toggle_visited/3", true).await;

    let body = body_json(get(&t.app, "/places?continent=Europe").await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["places"][0]["name"], "Santorini");

    let body = body_json(get(&t.app, "/places?continent=Asia&category=Beach").await).await;
    assert_eq!(body["total"], 0);

    let body = body_json(get(&t.app, "/places?status=visited").await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["places"][0]["name"], "Bondi");

    let body = body_json(get(&t.app, "/places?search=KYO").await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["places"][0]["name"], "Kyoto");

    // Country text matches too
    let body = body_json(get(&t.app, "/places?search=gree").await).await;
    assert_eq!(body["places"][0]["name"], "Santorini");

    // Unknown filter values: exact fields match nothing, status is ignored
    let body = body_json(get(&t.app, "/places?continent=Narnia").await).await;
    assert_eq!(body["total"], 0);
    let body = body_json(get(&t.app, "/places?status=maybe").await).await;
    assert_eq!(body["total"], 3);

    // Stray parameters such as the notice are ignored
    let body = body_json(get(&t.app, "/places?notice=whatever").await).await;
    assert_eq!(body["total"], 3);

    let body = body_json(get(&t.app, "/places?sort=priority").await).await;
    assert_eq!(body["places"][0]["priority"], "High");
}

#[tokio::test]
async fn listing_paginates_and_coerces_page() {
    let t = test_app();
    for i in 1..=12 {
        post_form(&t.app, "/add", &sample_form(&format!("Stop{i:02}"))).await;
    }

    let body = body_json(get(&t.app, "/places").await).await;
    assert_eq!(body["places"].as_array().unwrap().len(), 10);
    assert_eq!(body["total"], 12);
    assert_eq!(body["places"][0]["name"], "Stop12");

    let body = body_json(get(&t.app, "/places?page=2").await).await;
    assert_eq!(body["places"].as_array().unwrap().len(), 2);
    assert_eq!(body["page"], 2);

    let body = body_json(get(&t.app, "/places?page=0").await).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["places"].as_array().unwrap().len(), 10);

    let body = body_json(get(&t.app, "/places?page=abc").await).await;
    assert_eq!(body["page"], 1);

    // A page far past the data is an empty slice, not an error
    let body = body_json(get(&t.app, "/places?page=9223372036854775807").await).await;
    assert_eq!(body["total"], 12);
    assert!(body["places"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn stats_routes_share_one_payload() {
    let t = test_app();

    let body = body_json(get(&t.app, "/api/stats").await).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["completion_pct"], 0.0);

    post_form(&t.app, "/add", &form("Kyoto", "Japan", "Asia", "Cultural", "High")).await;
    post_form(&t.app, "/add", &form("Santorini", "Greece", "Europe", "Beach", "Medium")).await;
    post_empty(&t.app, "/toggle_visited/1", true).await;

    let api = body_json(get(&t.app, "/api/stats").await).await;
    assert_eq!(api["total"], 2);
    assert_eq!(api["visited"], 1);
    assert_eq!(api["not_visited"], 1);
    assert_eq!(api["by_continent"]["Asia"], 1);
    assert_eq!(api["by_continent"]["Europe"], 1);
    assert_eq!(api["completion_pct"], 50.0);

    let page = body_json(get(&t.app, "/stats").await).await;
    assert_eq!(api, page);
}

#[tokio::test]
async fn export_serves_a_csv_attachment() {
    let t = test_app();
    post_form(&t.app, "/add", &sample_form("Kyoto")).await;
    post_form(&t.app, "/add", &sample_form("Osaka")).await;

    let response = get(&t.app, "/export.csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"places.csv\""
    );

    let text = body_text(response).await;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1].starts_with("1,Kyoto,Japan,Asia,"));
    assert!(lines[2].starts_with("2,Osaka,"));
}

#[tokio::test]
async fn random_redirects_into_the_listing() {
    let t = test_app();

    let response = get(&t.app, "/random").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/add?notice=Your%20list%20is%20empty.%20Add%20a%20place%20first%21"
    );

    post_form(&t.app, "/add", &sample_form("Side Quest Cove")).await;
    let response = get(&t.app, "/random").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(
        location(&response)
            .starts_with("/places?search=Side%20Quest%20Cove&notice=Random%20pick%3A")
    );
}

#[tokio::test]
async fn timeline_lists_dated_visits_newest_first() {
    let t = test_app();
    post_form(&t.app, "/add", &sample_form("Kyoto")).await;
    post_form(&t.app, "/add", &sample_form("Osaka")).await;
    post_form(&t.app, "/add", &sample_form("Nara")).await;
    post_empty(&t.app, "/toggle_visited/1", true).await;
    post_empty(&t.app, "/toggle_visited/3", true).await;

    let body = body_json(get(&t.app, "/timeline").await).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Same-day visits fall back to newest id first
    assert_eq!(entries[0]["name"], "Nara");
    assert_eq!(entries[1]["name"], "Kyoto");
    assert!(entries.iter().all(|e| e["visited"] == true));
    assert!(entries.iter().all(|e| e["visited_date"].is_string()));
}

#[tokio::test]
async fn unknown_paths_fall_through_to_404() {
    let t = test_app();
    let response = get(&t.app, "/definitely-not-a-route").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
