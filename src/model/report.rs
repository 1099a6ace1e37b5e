use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Raw counters read from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct ReportCounts {
    pub total_employees: i64,
    pub total_attendance: i64,
    pub total_leave_requests: i64,
    pub present_today: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "total_employees": 12,
    "total_attendance": 180,
    "total_leave_requests": 4,
    "present_today": 10,
    "attendance_rate": 50
}))]
pub struct ReportStats {
    pub total_employees: i64,
    pub total_attendance: i64,
    pub total_leave_requests: i64,
    pub present_today: i64,
    /// percent of a 30-day month, rounded
    pub attendance_rate: i64,
}

impl From<ReportCounts> for ReportStats {
    fn from(counts: ReportCounts) -> Self {
        let attendance_rate = if counts.total_employees > 0 {
            let ratio = counts.total_attendance as f64 / (counts.total_employees as f64 * 30.0);
            (ratio * 100.0).round() as i64
        } else {
            0
        };

        Self {
            total_employees: counts.total_employees,
            total_attendance: counts.total_attendance,
            total_leave_requests: counts.total_leave_requests,
            present_today: counts.present_today,
            attendance_rate,
        }
    }
}
