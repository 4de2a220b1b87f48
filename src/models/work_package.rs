use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;
use crate::helpers::hours;

/// Weekday column of the grid, in display order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayKey {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl WeekdayKey {
    pub const ALL: [WeekdayKey; 5] = [
        WeekdayKey::Mon,
        WeekdayKey::Tue,
        WeekdayKey::Wed,
        WeekdayKey::Thu,
        WeekdayKey::Fri,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WeekdayKey::Mon => "mon",
            WeekdayKey::Tue => "tue",
            WeekdayKey::Wed => "wed",
            WeekdayKey::Thu => "thu",
            WeekdayKey::Fri => "fri",
        }
    }

    /// Short header label, e.g. `Mon`.
    pub fn label(self) -> &'static str {
        match self {
            WeekdayKey::Mon => "Mon",
            WeekdayKey::Tue => "Tue",
            WeekdayKey::Wed => "Wed",
            WeekdayKey::Thu => "Thu",
            WeekdayKey::Fri => "Fri",
        }
    }

    /// Days after the start of the week.
    pub fn offset(self) -> u64 {
        match self {
            WeekdayKey::Mon => 0,
            WeekdayKey::Tue => 1,
            WeekdayKey::Wed => 2,
            WeekdayKey::Thu => 3,
            WeekdayKey::Fri => 4,
        }
    }
}

impl fmt::Display for WeekdayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekdayKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mon" => Ok(WeekdayKey::Mon),
            "tue" => Ok(WeekdayKey::Tue),
            "wed" => Ok(WeekdayKey::Wed),
            "thu" => Ok(WeekdayKey::Thu),
            "fri" => Ok(WeekdayKey::Fri),
            _ => Err(StoreError::UnknownDay(s.to_string())),
        }
    }
}

/// The free-text columns of a work package row.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum WorkPackageField {
    Code,
    Name,
    TaxArea,
    TaxAreaName,
}

impl WorkPackageField {
    pub const ALL: [WorkPackageField; 4] = [
        WorkPackageField::Code,
        WorkPackageField::Name,
        WorkPackageField::TaxArea,
        WorkPackageField::TaxAreaName,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkPackageField::Code => "code",
            WorkPackageField::Name => "name",
            WorkPackageField::TaxArea => "taxArea",
            WorkPackageField::TaxAreaName => "taxAreaName",
        }
    }
}

impl fmt::Display for WorkPackageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkPackageField {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "code" => Ok(WorkPackageField::Code),
            "name" => Ok(WorkPackageField::Name),
            "taxarea" | "tax_area" => Ok(WorkPackageField::TaxArea),
            "taxareaname" | "tax_area_name" => Ok(WorkPackageField::TaxAreaName),
            _ => Err(StoreError::UnknownField(s.to_string())),
        }
    }
}

/// Opaque row identity. Allocated once by the store and never reused.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RowId(u64);

impl RowId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RowId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(RowId)
            .map_err(|_| StoreError::InvalidRowId(s.to_string()))
    }
}

/// Host-supplied row contents without identity or derived values. Used for
/// seeding a store, as an add-row template, and for copying rows between weeks.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkPackageSeed {
    pub code: String,
    pub name: String,
    pub tax_area: String,
    pub tax_area_name: String,
    pub hours: BTreeMap<WeekdayKey, String>,
}

impl WorkPackageSeed {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        tax_area: impl Into<String>,
        tax_area_name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            tax_area: tax_area.into(),
            tax_area_name: tax_area_name.into(),
            hours: BTreeMap::new(),
        }
    }

    pub fn with_hours(mut self, day: WeekdayKey, value: impl Into<String>) -> Self {
        self.hours.insert(day, value.into());
        self
    }
}

/// One edit applied to a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMutation {
    Field {
        field: WorkPackageField,
        value: String,
    },
    Hour {
        day: WeekdayKey,
        value: String,
    },
}

impl RowMutation {
    pub fn field(field: WorkPackageField, value: impl Into<String>) -> Self {
        RowMutation::Field {
            field,
            value: value.into(),
        }
    }

    pub fn hour(day: WeekdayKey, value: impl Into<String>) -> Self {
        RowMutation::Hour {
            day,
            value: value.into(),
        }
    }

    pub fn apply(self, record: &mut WorkPackageRecord) {
        match self {
            RowMutation::Field { field, value } => record.set_field(field, value),
            RowMutation::Hour { day, value } => record.set_hour(day, value),
        }
    }
}

/// A work package row. `sum` is derived from `hours` on every hour write and
/// has no setter.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageRecord {
    id: RowId,
    code: String,
    name: String,
    tax_area: String,
    tax_area_name: String,
    hours: BTreeMap<WeekdayKey, String>,
    sum: String,
}

impl WorkPackageRecord {
    pub fn new(id: RowId) -> Self {
        Self::from_seed(id, &WorkPackageSeed::default())
    }

    pub fn from_seed(id: RowId, seed: &WorkPackageSeed) -> Self {
        let mut record = Self {
            id,
            code: seed.code.clone(),
            name: seed.name.clone(),
            tax_area: seed.tax_area.clone(),
            tax_area_name: seed.tax_area_name.clone(),
            hours: seed.hours.clone(),
            sum: String::new(),
        };
        record.recompute_sum();
        record
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tax_area(&self) -> &str {
        &self.tax_area
    }

    pub fn tax_area_name(&self) -> &str {
        &self.tax_area_name
    }

    pub fn field(&self, field: WorkPackageField) -> &str {
        match field {
            WorkPackageField::Code => &self.code,
            WorkPackageField::Name => &self.name,
            WorkPackageField::TaxArea => &self.tax_area,
            WorkPackageField::TaxAreaName => &self.tax_area_name,
        }
    }

    /// Raw cell text as entered; `None` when the cell was never set.
    pub fn hour(&self, day: WeekdayKey) -> Option<&str> {
        self.hours.get(&day).map(String::as_str)
    }

    pub fn hours(&self) -> &BTreeMap<WeekdayKey, String> {
        &self.hours
    }

    pub fn sum(&self) -> &str {
        &self.sum
    }

    pub fn set_field(&mut self, field: WorkPackageField, value: impl Into<String>) {
        let value = value.into();
        match field {
            WorkPackageField::Code => self.code = value,
            WorkPackageField::Name => self.name = value,
            WorkPackageField::TaxArea => self.tax_area = value,
            WorkPackageField::TaxAreaName => self.tax_area_name = value,
        }
    }

    /// Stores `value` verbatim and recomputes `sum`. Malformed input counts as
    /// zero.
    pub fn set_hour(&mut self, day: WeekdayKey, value: impl Into<String>) {
        self.hours.insert(day, value.into());
        self.recompute_sum();
    }

    pub fn to_seed(&self) -> WorkPackageSeed {
        WorkPackageSeed {
            code: self.code.clone(),
            name: self.name.clone(),
            tax_area: self.tax_area.clone(),
            tax_area_name: self.tax_area_name.clone(),
            hours: self.hours.clone(),
        }
    }

    fn recompute_sum(&mut self) {
        self.sum = hours::sum_hours(self.hours.values().map(String::as_str));
    }
}
