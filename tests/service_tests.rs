use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use weekly_timesheet::{
    GridTarget, RowId, TimesheetConfig, TimesheetService, TimesheetStore, WeekdayKey,
};

fn new_router() -> axum::Router {
    let store = TimesheetStore::new(TimesheetConfig::sample());
    TimesheetService::new(store).router()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = new_router().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn grid_snapshot_includes_totals() {
    let response = new_router().oneshot(get("/grids/draft")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = json_body(response).await;
    assert_eq!(snapshot["rows"].as_array().unwrap().len(), 2);
    assert_eq!(snapshot["rows"][0]["id"], 2);
    assert_eq!(snapshot["gridTotal"], "24.00");
    assert_eq!(snapshot["columnTotals"]["mon"], "8.00");
    assert_eq!(snapshot["columns"][4]["label"], "10/17");
}

#[tokio::test]
async fn hour_edit_round_trip() {
    let app = new_router();

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            "/grids/draft/rows/2/hours/thu",
            json!({ "value": "abc" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let row = json_body(response).await;
    assert_eq!(row["hours"]["thu"], "abc");
    assert_eq!(row["sum"], "12.00");

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            "/grids/draft/rows/2/hours/fri",
            json!({ "value": "3.5" }),
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["sum"], "15.50");

    let snapshot = json_body(app.oneshot(get("/grids/draft")).await.unwrap()).await;
    assert_eq!(snapshot["gridTotal"], "27.50");
    assert_eq!(snapshot["columnTotals"]["fri"], "3.50");
}

#[tokio::test]
async fn field_edit_updates_row() {
    let response = new_router()
        .oneshot(send_json(
            "PUT",
            "/grids/submitted/rows/1/fields/taxAreaName",
            json!({ "value": "Oregon – Portland" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let row = json_body(response).await;
    assert_eq!(row["taxAreaName"], "Oregon – Portland");
    assert_eq!(row["sum"], "24.00");
}

#[tokio::test]
async fn unknown_row_is_no_content() {
    let response = new_router()
        .oneshot(send_json(
            "PUT",
            "/grids/submitted/rows/42/hours/mon",
            json!({ "value": "1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn bad_segments_are_rejected() {
    let app = new_router();

    for (uri, field) in [
        ("/grids/archive/rows/1/hours/mon", "archive"),
        ("/grids/draft/rows/2/hours/sat", "sat"),
        ("/grids/draft/rows/2/fields/sum", "sum"),
        ("/grids/draft/rows/two/hours/mon", "two"),
    ] {
        let response = app
            .clone()
            .oneshot(send_json("PUT", uri, json!({ "value": "1" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid_request");
        assert!(body["message"].as_str().unwrap().contains(field));
    }

    let response = app.oneshot(get("/grids/archive")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_row_then_approve() {
    let app = new_router();

    let response = app
        .clone()
        .oneshot(send_json("POST", "/grids/draft/rows", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["id"], 4);

    let response = app
        .clone()
        .oneshot(send_json("POST", "/approve", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["promoted"], 3);

    let snapshot = json_body(app.oneshot(get("/grids/submitted")).await.unwrap()).await;
    assert_eq!(snapshot["rows"].as_array().unwrap().len(), 3);
    assert_eq!(snapshot["gridTotal"], "24.00");
    assert_eq!(snapshot["rows"][2]["sum"], "0.00");
}

#[tokio::test]
async fn copy_into_draft_returns_new_ids() {
    let app = new_router();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/draft/copy",
            json!([{ "code": "US00044000.8.1", "name": "Project ABC", "hours": { "mon": "2" } }]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["ids"], json!([4]));

    let snapshot = json_body(app.oneshot(get("/grids/draft")).await.unwrap()).await;
    assert_eq!(snapshot["gridTotal"], "26.00");
}

#[tokio::test]
async fn pdf_route_serves_document() {
    let response = new_router()
        .oneshot(get("/grids/submitted/pdf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/pdf"
    );

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF-1.5"));
}

#[tokio::test]
async fn shared_store_sees_http_edits() {
    let shared = Arc::new(RwLock::new(TimesheetStore::new(TimesheetConfig::sample())));
    let service = TimesheetService::with_shared(shared.clone());
    let handle = service.store();
    let app = service.router();

    let response = app
        .oneshot(send_json(
            "PUT",
            "/grids/draft/rows/3/hours/thu",
            json!({ "value": "6" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(Arc::ptr_eq(&shared, &handle));
    {
        let store = shared.read();
        let row = store.draft().row(RowId::new(3)).unwrap();
        assert_eq!(row.hour(WeekdayKey::Thu), Some("6"));
        assert_eq!(row.sum(), "18.00");
    }

    handle
        .write()
        .edit_hour(GridTarget::Draft, RowId::new(3), WeekdayKey::Thu, "");
    assert_eq!(shared.read().draft().grid_total(), "24.00");
}
