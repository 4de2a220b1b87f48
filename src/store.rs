use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::week_grid::{RowIds, WeekGrid};
use crate::models::work_package::{
    RowId, RowMutation, WeekdayKey, WorkPackageField, WorkPackageRecord, WorkPackageSeed,
};

/// Configuration for a timesheet store: the week it covers and the initial
/// contents of both grids.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetConfig {
    #[serde(alias = "week_start")]
    pub week_start: NaiveDate,
    #[serde(alias = "week_end")]
    pub week_end: NaiveDate,
    #[serde(default)]
    pub submitted: Vec<WorkPackageSeed>,
    #[serde(default)]
    pub draft: Vec<WorkPackageSeed>,
}

impl TimesheetConfig {
    pub fn new(week_start: NaiveDate, week_end: NaiveDate) -> Self {
        Self {
            week_start,
            week_end,
            submitted: Vec::new(),
            draft: Vec::new(),
        }
    }

    /// The week of 10/13/2025 with one submitted and two draft lines.
    pub fn sample() -> Self {
        let week_start = NaiveDate::from_ymd_opt(2025, 10, 13).unwrap_or_default();
        let week_end = NaiveDate::from_ymd_opt(2025, 10, 17).unwrap_or_default();

        let line = |code: &str, name: &str, per_day: &str| {
            WorkPackageSeed::new(code, name, "207", "California – Los Angeles")
                .with_hours(WeekdayKey::Mon, per_day)
                .with_hours(WeekdayKey::Tue, per_day)
                .with_hours(WeekdayKey::Wed, per_day)
                .with_hours(WeekdayKey::Thu, "")
                .with_hours(WeekdayKey::Fri, "")
        };

        Self {
            week_start,
            week_end,
            submitted: vec![line("US00011000.1.1", "Global G&A Code", "8.00")],
            draft: vec![
                line("US00011000.1.1", "Global G&A Code", "4.00"),
                line("US00044000.8.1", "Project ABC", "4.00"),
            ],
        }
    }
}

/// Which of the two grids an operation addresses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GridTarget {
    Submitted,
    Draft,
}

impl GridTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            GridTarget::Submitted => "submitted",
            GridTarget::Draft => "draft",
        }
    }
}

impl fmt::Display for GridTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridTarget {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "submitted" | "current" => Ok(GridTarget::Submitted),
            "draft" | "proposed" => Ok(GridTarget::Draft),
            _ => Err(StoreError::InvalidTarget(s.to_string())),
        }
    }
}

/// The submitted timesheet and the proposed draft for one week, plus the id
/// allocator both draw from.
#[derive(Debug, Clone)]
pub struct TimesheetStore {
    submitted: WeekGrid,
    draft: WeekGrid,
    ids: RowIds,
}

impl TimesheetStore {
    pub fn new(config: TimesheetConfig) -> Self {
        info!(
            "Initializing timesheet store for week {} to {} ({} submitted, {} draft rows)",
            config.week_start,
            config.week_end,
            config.submitted.len(),
            config.draft.len()
        );

        let mut ids = RowIds::new();
        let mut submitted = WeekGrid::new(config.week_start, config.week_end);
        let mut draft = WeekGrid::new(config.week_start, config.week_end);

        for seed in &config.submitted {
            submitted.add_row(&mut ids, seed);
        }
        for seed in &config.draft {
            draft.add_row(&mut ids, seed);
        }

        Self {
            submitted,
            draft,
            ids,
        }
    }

    pub fn grid(&self, target: GridTarget) -> &WeekGrid {
        match target {
            GridTarget::Submitted => &self.submitted,
            GridTarget::Draft => &self.draft,
        }
    }

    pub fn submitted(&self) -> &WeekGrid {
        &self.submitted
    }

    pub fn draft(&self) -> &WeekGrid {
        &self.draft
    }

    fn grid_mut(&mut self, target: GridTarget) -> &mut WeekGrid {
        match target {
            GridTarget::Submitted => &mut self.submitted,
            GridTarget::Draft => &mut self.draft,
        }
    }

    /// Replaces one descriptive field. Returns the updated row, or `None` when
    /// `id` is not in the target grid.
    pub fn edit_field(
        &mut self,
        target: GridTarget,
        id: RowId,
        field: WorkPackageField,
        value: impl Into<String>,
    ) -> Option<&WorkPackageRecord> {
        debug!("Editing {} of row {} in {} grid", field, id, target);
        self.grid_mut(target)
            .update_row(id, RowMutation::field(field, value))
    }

    /// Replaces one hour cell; the row sum is current when this returns.
    pub fn edit_hour(
        &mut self,
        target: GridTarget,
        id: RowId,
        day: WeekdayKey,
        value: impl Into<String>,
    ) -> Option<&WorkPackageRecord> {
        debug!("Editing {} hours of row {} in {} grid", day, id, target);
        self.grid_mut(target)
            .update_row(id, RowMutation::hour(day, value))
    }

    pub fn add_row(&mut self, target: GridTarget, template: &WorkPackageSeed) -> RowId {
        let grid = match target {
            GridTarget::Submitted => &mut self.submitted,
            GridTarget::Draft => &mut self.draft,
        };
        let id = grid.add_row(&mut self.ids, template);
        info!("Added row {} to {} grid, now {} rows", id, target, grid.len());
        id
    }

    /// Approve & Submit: the submitted grid's rows become a copy of the draft's
    /// rows, under fresh ids, in a single replacement. Returns the number of
    /// rows promoted.
    pub fn approve_draft(&mut self) -> usize {
        let promoted: Vec<WorkPackageRecord> = self
            .draft
            .rows()
            .iter()
            .map(|row| WorkPackageRecord::from_seed(self.ids.next_id(), &row.to_seed()))
            .collect();
        let count = promoted.len();

        self.submitted.replace_rows(promoted);
        info!(
            "Promoted {} draft rows to submitted, submitted total {}",
            count,
            self.submitted.grid_total()
        );
        count
    }

    /// Copy from last week: appends the given prior-week rows to the draft,
    /// each under a fresh id. Returns the new ids in order.
    pub fn copy_rows_into_draft(&mut self, rows: &[WorkPackageSeed]) -> Vec<RowId> {
        let ids: Vec<RowId> = rows
            .iter()
            .map(|seed| self.draft.add_row(&mut self.ids, seed))
            .collect();
        info!(
            "Copied {} prior-week rows into draft, now {} rows",
            ids.len(),
            self.draft.len()
        );
        ids
    }
}

