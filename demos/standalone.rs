use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use weekly_timesheet::{TimesheetConfig, TimesheetService, TimesheetStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting weekly timesheet service example");

    let addr: SocketAddr = std::env::var("TIMESHEET_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()
        .context("TIMESHEET_ADDR is not a socket address")?;

    // Seed from a JSON file when given, otherwise use the sample week
    let config = match std::env::var("TIMESHEET_SEED") {
        Ok(path) => {
            info!("Loading seed rows from {}", path);
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file {}", path))?;
            serde_json::from_str::<TimesheetConfig>(&raw)
                .with_context(|| format!("Failed to parse seed file {}", path))?
        }
        Err(_) => TimesheetConfig::sample(),
    };

    let timesheet_service = TimesheetService::new(TimesheetStore::new(config));

    let app = Router::new().nest("/api/timesheet", timesheet_service.router());

    let listener = TcpListener::bind(addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/*
Example usage of the service:

1. GET /api/timesheet/grids/draft
   - Rows, column totals and grid total of the proposed draft

2. PUT /api/timesheet/grids/draft/rows/2/hours/thu   {"value": "3.5"}
   - Edits one hour cell and returns the row with its new sum

3. POST /api/timesheet/approve
   - Replaces the submitted timesheet with a copy of the draft

4. GET /api/timesheet/grids/submitted/pdf
   - Printable rendering of the submitted timesheet
*/
