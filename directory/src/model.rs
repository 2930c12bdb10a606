use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An employee record as exchanged on the wire and held by the stores.
///
/// Canonical storage keeps each `direct_reports` entry *dehydrated*: a
/// placeholder carrying only `employee_id`. The full record for a report
/// lives solely under its own store key. Hydrated trees only ever exist in
/// [`ReportingStructure`] responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub direct_reports: Vec<Employee>,
}

impl Employee {
    /// Placeholder reference carrying only the id.
    pub fn dehydrated(id: impl Into<String>) -> Self {
        Self {
            employee_id: id.into(),
            ..Self::default()
        }
    }

    /// Copy with every direct report reduced to its id placeholder, i.e. the
    /// shape the stores keep as canonical.
    pub fn dehydrate(&self) -> Self {
        let mut stored = self.clone();
        stored.direct_reports = stored
            .direct_reports
            .iter()
            .map(|report| Self::dehydrated(report.employee_id.clone()))
            .collect();
        stored
    }
}

/// Computed view of an employee with all transitive reports hydrated in
/// place and counted. Built fresh per request, never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingStructure {
    pub employee: Employee,
    pub number_of_reports: u32,
}

/// Compensation record keyed by the embedded employee's id.
///
/// The full employee snapshot is embedded rather than referenced, so it can
/// drift from the canonical store copy. Kept for wire compatibility; an
/// id-only reference resolved on read would be the cleaner shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    pub employee: Employee,
    pub salary: i64,
    pub effective_date: NaiveDate,
}
