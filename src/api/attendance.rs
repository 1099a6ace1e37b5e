use crate::{
    error::{AppError, AppResult},
    model::attendance::{AttendanceFilter, AttendanceStatus, MarkOutcome, normalize_date},
    repository::{AttendanceRepository, EmployeeRepository},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

/// Employee id as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EmployeeRef {
    Id(i64),
    Text(String),
}

impl EmployeeRef {
    fn is_blank(&self) -> bool {
        matches!(self, EmployeeRef::Text(text) if text.trim().is_empty())
    }

    /// The numeric id, if the reference holds one.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            EmployeeRef::Id(id) => Some(*id),
            EmployeeRef::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkAttendance {
    /// Internal employee id, as a number or a numeric string
    #[schema(example = "1", value_type = String)]
    pub employee_id: Option<EmployeeRef>,
    /// `YYYY-MM-DD` or an ISO 8601 timestamp, truncated to its UTC day
    #[schema(example = "2024-01-05")]
    pub date: Option<String>,
    #[schema(example = "Present")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    /// Only records of this employee
    pub employee_id: Option<i64>,
    /// Inclusive lower bound
    #[schema(example = "2024-01-01")]
    pub date_from: Option<String>,
    /// Inclusive upper bound
    #[schema(example = "2024-01-31")]
    pub date_to: Option<String>,
}

fn parse_bound(raw: Option<&str>, field: &str) -> AppResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => normalize_date(v)
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("Invalid {field}"))),
    }
}

impl AttendanceQuery {
    pub fn to_filter(&self) -> AppResult<AttendanceFilter> {
        Ok(AttendanceFilter {
            employee_id: self.employee_id,
            date_from: parse_bound(self.date_from.as_deref(), "date_from")?,
            date_to: parse_bound(self.date_to.as_deref(), "date_to")?,
        })
    }
}

/// List attendance
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Matching records, latest date first", body = [AttendanceRecord]),
        (status = 400, description = "Unparseable filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    attendance: web::Data<dyn AttendanceRepository>,
    query: web::Query<AttendanceQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.to_filter()?;
    let records = attendance.list(&filter).await?;
    debug!(count = records.len(), filter = ?filter, "Listing attendance");

    Ok(HttpResponse::Ok().json(records))
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "First mark for this employee and day", body = Object, example = json!({
            "success": true
        })),
        (status = 200, description = "Existing mark overwritten", body = Object, example = json!({
            "success": true,
            "updated": true
        })),
        (status = 400, description = "Missing or invalid field", body = Object, example = json!({
            "error": "Status must be Present or Absent"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    employees: web::Data<dyn EmployeeRepository>,
    attendance: web::Data<dyn AttendanceRepository>,
    payload: web::Json<MarkAttendance>,
) -> AppResult<HttpResponse> {
    let employee_ref = payload
        .employee_id
        .as_ref()
        .filter(|r| !r.is_blank())
        .ok_or_else(|| AppError::validation("Employee ID is required"))?;

    let raw_date = payload
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::validation("Date is required"))?;

    let status = payload
        .status
        .as_deref()
        .and_then(AttendanceStatus::parse)
        .ok_or_else(|| AppError::validation("Status must be Present or Absent"))?;

    let employee = match employee_ref.as_id() {
        Some(id) => employees.find_by_id(id).await?,
        None => None,
    };
    let employee_id = employee
        .map(|e| e.id)
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    let date = normalize_date(raw_date).ok_or_else(|| AppError::validation("Invalid date"))?;

    let outcome = attendance.mark(employee_id, date, status).await?;
    info!(employee_id, %date, %status, ?outcome, "Attendance marked");

    Ok(match outcome {
        MarkOutcome::Created => HttpResponse::Created().json(json!({ "success": true })),
        MarkOutcome::Updated => HttpResponse::Ok().json(json!({ "success": true, "updated": true })),
    })
}

/// Present-day summary
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    responses(
        (status = 200, description = "Present days per employee with at least one", body = [AttendanceSummary]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    attendance: web::Data<dyn AttendanceRepository>,
) -> AppResult<HttpResponse> {
    let summary = attendance.summarize().await?;
    Ok(HttpResponse::Ok().json(summary))
}
