//! Weekly Timesheet Library
//!
//! This library holds the data model behind a weekly time-entry grid: work
//! package rows with per-day hours, their derived totals, and the pair of
//! submitted and draft grids that a presentation layer edits. An HTTP router
//! and a PDF renderer sit on top of the same store.

pub mod error;
pub mod helpers;
pub mod models;
pub mod service;
pub mod store;

pub use error::StoreError;
pub use service::TimesheetService;
pub use store::{GridTarget, TimesheetConfig, TimesheetStore};

// Re-export key types for convenience
pub use models::week_grid::{DayColumn, GridSnapshot, RowIds, WeekGrid};
pub use models::work_package::{
    RowId, RowMutation, WeekdayKey, WorkPackageField, WorkPackageRecord, WorkPackageSeed,
};
