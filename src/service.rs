use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    error::StoreError,
    helpers::pdf::render_timesheet_pdf,
    models::work_package::{RowId, WeekdayKey, WorkPackageField, WorkPackageSeed},
    store::{GridTarget, TimesheetStore},
};

/// HTTP front for a timesheet store. Every request takes the store lock, so
/// edits reach the store one at a time.
#[derive(Clone)]
pub struct TimesheetService {
    store: Arc<RwLock<TimesheetStore>>,
}

impl TimesheetService {
    pub fn new(store: TimesheetStore) -> Self {
        info!("Creating new TimesheetService instance");
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Serves a store the host keeps its own handle to.
    pub fn with_shared(store: Arc<RwLock<TimesheetStore>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<RwLock<TimesheetStore>> {
        self.store.clone()
    }

    /// Create an Axum router for the timesheet service
    pub fn router(self) -> Router {
        info!("Creating timesheet service router");

        Router::new()
            .route("/health", get(health))
            .route("/grids/{target}", get(get_grid))
            .route("/grids/{target}/pdf", get(get_grid_pdf))
            .route("/grids/{target}/rows", post(add_row))
            .route("/grids/{target}/rows/{id}/fields/{field}", put(edit_field))
            .route("/grids/{target}/rows/{id}/hours/{day}", put(edit_hour))
            .route("/draft/copy", post(copy_into_draft))
            .route("/approve", post(approve))
            .with_state(self)
    }
}

#[derive(Debug, Deserialize)]
struct CellValue {
    value: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Invalid(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

// Route handlers
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_grid(
    State(service): State<TimesheetService>,
    Path(target): Path<String>,
) -> Result<Response, ApiError> {
    let target: GridTarget = target.parse()?;
    let snapshot = service.store.read().grid(target).snapshot();
    Ok(Json(snapshot).into_response())
}

async fn get_grid_pdf(
    State(service): State<TimesheetService>,
    Path(target): Path<String>,
) -> Result<Response, ApiError> {
    let target: GridTarget = target.parse()?;
    info!("Rendering {} grid as PDF", target);

    let snapshot = service.store.read().grid(target).snapshot();
    let title = match target {
        GridTarget::Submitted => "Timesheet",
        GridTarget::Draft => "Proposed Draft",
    };

    match render_timesheet_pdf(&snapshot, title) {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response()),
        Err(e) => {
            error!("Failed to render {} grid: {}", target, e);
            Err(ApiError::Internal(format!("Error rendering timesheet: {}", e)))
        }
    }
}

async fn add_row(
    State(service): State<TimesheetService>,
    Path(target): Path<String>,
    Json(template): Json<WorkPackageSeed>,
) -> Result<Response, ApiError> {
    let target: GridTarget = target.parse()?;
    info!("Received add-row request for {} grid", target);

    let id = service.store.write().add_row(target, &template);
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
}

async fn edit_field(
    State(service): State<TimesheetService>,
    Path((target, id, field)): Path<(String, String, String)>,
    Json(body): Json<CellValue>,
) -> Result<Response, ApiError> {
    let target: GridTarget = target.parse()?;
    let id: RowId = id.parse()?;
    let field: WorkPackageField = field.parse()?;

    let mut store = service.store.write();
    match store.edit_field(target, id, field, body.value) {
        Some(row) => Ok(Json(row.clone()).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn edit_hour(
    State(service): State<TimesheetService>,
    Path((target, id, day)): Path<(String, String, String)>,
    Json(body): Json<CellValue>,
) -> Result<Response, ApiError> {
    let target: GridTarget = target.parse()?;
    let id: RowId = id.parse()?;
    let day: WeekdayKey = day.parse()?;

    let mut store = service.store.write();
    match store.edit_hour(target, id, day, body.value) {
        Some(row) => Ok(Json(row.clone()).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn copy_into_draft(
    State(service): State<TimesheetService>,
    Json(rows): Json<Vec<WorkPackageSeed>>,
) -> impl IntoResponse {
    info!("Received copy request with {} prior-week rows", rows.len());
    let ids = service.store.write().copy_rows_into_draft(&rows);
    (StatusCode::CREATED, Json(json!({ "ids": ids })))
}

async fn approve(State(service): State<TimesheetService>) -> impl IntoResponse {
    info!("Received approve & submit request");
    let promoted = service.store.write().approve_draft();
    Json(json!({ "promoted": promoted }))
}
