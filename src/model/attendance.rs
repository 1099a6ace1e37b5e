use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Case-insensitive parse; only `present` and `absent` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_str(&raw.to_lowercase()).ok()
    }
}

impl TryFrom<String> for AttendanceStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 10,
    "employee_id": 1,
    "date": "2024-01-05",
    "status": "present"
}))]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: i64,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
}

/// Present-day count for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceSummary {
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = 12)]
    pub present_days: i64,
}

/// Inclusive listing filters; each bound applies independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub employee_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_id.is_none_or(|id| record.employee_id == id)
            && self.date_from.is_none_or(|from| record.date >= from)
            && self.date_to.is_none_or(|to| record.date <= to)
    }
}

/// Result of an attendance upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Created,
    Updated,
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Truncates an incoming date or timestamp to a calendar day in UTC.
///
/// Plain `YYYY-MM-DD` is kept as given. Timestamps with an offset are shifted
/// to UTC before truncation; timestamps without one are read as UTC.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().date_naive())
}

/// Counts present records per employee. Employees without a present day are
/// left out rather than reported as zero.
pub fn summarize_present<'a, I>(records: I) -> Vec<AttendanceSummary>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
    for record in records {
        if record.status == AttendanceStatus::Present {
            *counts.entry(record.employee_id).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(employee_id, present_days)| AttendanceSummary {
            employee_id,
            present_days,
        })
        .collect()
}
