use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::helpers::hours;
use crate::models::work_package::{
    RowId, RowMutation, WeekdayKey, WorkPackageRecord, WorkPackageSeed,
};

/// Monotonic id source shared by every grid of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIds {
    next: u64,
}

impl RowIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> RowId {
        let id = RowId::new(self.next);
        self.next += 1;
        id
    }
}

impl Default for RowIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Header cell for one weekday column.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DayColumn {
    pub key: WeekdayKey,
    /// Calendar date as `MM/DD`.
    pub label: String,
    pub day: &'static str,
}

/// One week of work package rows. Totals are computed from `rows` on every
/// read.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekGrid {
    week_start: NaiveDate,
    week_end: NaiveDate,
    rows: Vec<WorkPackageRecord>,
    index: HashMap<RowId, usize>,
}

impl WeekGrid {
    pub fn new(week_start: NaiveDate, week_end: NaiveDate) -> Self {
        Self {
            week_start,
            week_end,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn week_end(&self) -> NaiveDate {
        self.week_end
    }

    pub fn rows(&self) -> &[WorkPackageRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: RowId) -> Option<&WorkPackageRecord> {
        self.index.get(&id).map(|&idx| &self.rows[idx])
    }

    pub fn columns(&self) -> Vec<DayColumn> {
        WeekdayKey::ALL
            .iter()
            .map(|&key| DayColumn {
                key,
                label: self
                    .week_start
                    .checked_add_days(Days::new(key.offset()))
                    .map(|date| date.format("%m/%d").to_string())
                    .unwrap_or_default(),
                day: key.label(),
            })
            .collect()
    }

    pub fn column_total(&self, day: WeekdayKey) -> String {
        let total: f64 = self
            .rows
            .iter()
            .map(|row| hours::hours_or_zero(row.hour(day)))
            .sum();
        hours::format_hours(total)
    }

    pub fn column_totals(&self) -> BTreeMap<WeekdayKey, String> {
        WeekdayKey::ALL
            .iter()
            .map(|&day| (day, self.column_total(day)))
            .collect()
    }

    pub fn grid_total(&self) -> String {
        hours::sum_hours(self.rows.iter().map(WorkPackageRecord::sum))
    }

    /// Appends a row built from `template` under a fresh id. Existing rows keep
    /// their positions. Every row of a grid must come from the same `ids`.
    pub fn add_row(&mut self, ids: &mut RowIds, template: &WorkPackageSeed) -> RowId {
        let id = ids.next_id();
        self.push(WorkPackageRecord::from_seed(id, template));
        id
    }

    /// Applies `mutation` to the row with `id` and returns the updated row.
    /// An unknown id leaves the grid untouched and returns `None`.
    pub fn update_row(
        &mut self,
        id: RowId,
        mutation: RowMutation,
    ) -> Option<&WorkPackageRecord> {
        let Some(&idx) = self.index.get(&id) else {
            debug!("No row with id {} in grid, ignoring edit", id);
            return None;
        };

        let mut updated = self.rows[idx].clone();
        mutation.apply(&mut updated);
        self.rows[idx] = updated;
        Some(&self.rows[idx])
    }

    /// Swaps the whole row set in one assignment.
    pub(crate) fn replace_rows(&mut self, rows: Vec<WorkPackageRecord>) {
        self.index = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.id(), idx))
            .collect();
        self.rows = rows;
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            week_start: self.week_start,
            week_end: self.week_end,
            columns: self.columns(),
            rows: self.rows.clone(),
            column_totals: self.column_totals(),
            grid_total: self.grid_total(),
        }
    }

    fn push(&mut self, record: WorkPackageRecord) {
        debug_assert!(
            !self.index.contains_key(&record.id()),
            "duplicate row id {}",
            record.id()
        );
        self.index.insert(record.id(), self.rows.len());
        self.rows.push(record);
    }
}

/// Read view of a grid with every derived value filled in, as a renderer
/// consumes it.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub columns: Vec<DayColumn>,
    pub rows: Vec<WorkPackageRecord>,
    pub column_totals: BTreeMap<WeekdayKey, String>,
    pub grid_total: String,
}
