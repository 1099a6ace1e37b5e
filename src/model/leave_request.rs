use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl TryFrom<String> for LeaveStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_id: i64,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRequest {
    pub employee_id: i64,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee_id": 1000,
    "leave_type": "sick",
    "start_date": "2026-01-01",
    "end_date": "2026-01-03",
    "reason": "Flu",
    "status": "pending",
    "created_at": "2026-01-01T00:00:00Z",
    "duration_days": 3
}))]
pub struct LeaveView {
    pub id: i64,
    pub employee_id: i64,
    pub leave_type: String,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
    #[schema(nullable = true)]
    pub reason: Option<String>,
    pub status: LeaveStatus,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    /// inclusive day count
    pub duration_days: i64,
}

impl From<LeaveRequest> for LeaveView {
    fn from(row: LeaveRequest) -> Self {
        let duration_days = duration_days(row.start_date, row.end_date);
        Self {
            id: row.id,
            employee_id: row.employee_id,
            leave_type: row.leave_type,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status: row.status,
            created_at: row.created_at,
            duration_days,
        }
    }
}

/// Number of calendar days covered by a leave, both ends included.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn duration_counts_both_ends() {
        assert_eq!(duration_days(day("2024-01-01"), day("2024-01-03")), 3);
        assert_eq!(duration_days(day("2024-01-01"), day("2024-01-01")), 1);
        assert_eq!(duration_days(day("2024-02-28"), day("2024-03-01")), 3);
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!(LeaveStatus::try_from("approved".to_string()), Ok(LeaveStatus::Approved));
        assert_eq!(LeaveStatus::Rejected.to_string(), "rejected");
        assert!(LeaveStatus::try_from("open".to_string()).is_err());
    }
}
