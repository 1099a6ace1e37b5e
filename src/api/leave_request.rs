use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::leave_request::{LeaveStatus, LeaveView, NewLeaveRequest},
    repository::{EmployeeRepository, LeaveRepository},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "annual")]
    pub leave_type: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip", nullable = true)]
    pub reason: Option<String>,
}

impl CreateLeave {
    fn into_new_request(self, employee_id: i64) -> AppResult<NewLeaveRequest> {
        let leave_type = self.leave_type.trim();
        if leave_type.is_empty() {
            return Err(AppError::validation("Leave type is required"));
        }

        if self.start_date > self.end_date {
            return Err(AppError::validation("start_date cannot be after end_date"));
        }

        let reason = self
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        Ok(NewLeaveRequest {
            employee_id,
            leave_type: leave_type.to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            reason,
        })
    }
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveView),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No employee profile linked to this user", body = Object, example = json!({
            "error": "No employee profile linked to this user"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    employees: web::Data<dyn EmployeeRepository>,
    leave: web::Data<dyn LeaveRepository>,
    payload: web::Json<CreateLeave>,
) -> AppResult<HttpResponse> {
    let employee = employees
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("No employee profile linked to this user"))?;

    let request = payload.into_inner().into_new_request(employee.id)?;
    let created = leave.create(request).await?;

    Ok(HttpResponse::Created().json(LeaveView::from(created)))
}

/* =========================
List leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/leave",
    responses(
        (status = 200, description = "All leave requests, newest first", body = [LeaveView]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    _auth: AuthUser,
    leave: web::Data<dyn LeaveRepository>,
) -> AppResult<HttpResponse> {
    let views: Vec<LeaveView> = leave
        .list()
        .await?
        .into_iter()
        .map(LeaveView::from)
        .collect();

    Ok(HttpResponse::Ok().json(views))
}

async fn resolve_leave(
    auth: AuthUser,
    leave: web::Data<dyn LeaveRepository>,
    leave_id: i64,
    status: LeaveStatus,
) -> AppResult<HttpResponse> {
    auth.require_hr_or_admin()?;

    let updated = leave.resolve(leave_id, status).await?;
    info!(leave_id, %status, reviewer = %auth.user_id, "Leave request reviewed");

    Ok(HttpResponse::Ok().json(LeaveView::from(updated)))
}

/* =========================
Approve leave (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = LeaveView),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    leave: web::Data<dyn LeaveRepository>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    resolve_leave(auth, leave, path.into_inner(), LeaveStatus::Approved).await
}

/* =========================
Reject leave (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = LeaveView),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    leave: web::Data<dyn LeaveRepository>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    resolve_leave(auth, leave, path.into_inner(), LeaveStatus::Rejected).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn body(start: &str, end: &str) -> CreateLeave {
        CreateLeave {
            leave_type: " Annual ".into(),
            start_date: day(start),
            end_date: day(end),
            reason: Some("   ".into()),
        }
    }

    #[test]
    fn trims_type_and_drops_blank_reason() {
        let request = body("2024-01-01", "2024-01-03").into_new_request(5).unwrap();
        assert_eq!(request.employee_id, 5);
        assert_eq!(request.leave_type, "Annual");
        assert_eq!(request.reason, None);
    }

    #[test]
    fn rejects_reversed_range() {
        let err = body("2024-01-04", "2024-01-03").into_new_request(5).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
