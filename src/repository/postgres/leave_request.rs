use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

use crate::error::{AppError, AppResult, is_foreign_key_violation};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};
use crate::repository::LeaveRepository;

const LEAVE_COLUMNS: &str =
    "id, employee_id, leave_type, start_date, end_date, reason, status, created_at";

pub struct PgLeaveRepository {
    pool: PgPool,
}

impl PgLeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveRepository for PgLeaveRepository {
    async fn create(&self, request: NewLeaveRequest) -> AppResult<LeaveRequest> {
        let sql = format!(
            r#"
            INSERT INTO leave_requests
                (employee_id, leave_type, start_date, end_date, reason, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {LEAVE_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(request.employee_id)
            .bind(&request.leave_type)
            .bind(request.start_date)
            .bind(request.end_date)
            .bind(&request.reason)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::not_found("Employee not found");
                }
                error!(error = %e, employee_id = request.employee_id, "Failed to create leave request");
                AppError::from(e)
            })?;

        info!(id = created.id, employee_id = created.employee_id, "Leave request submitted");
        Ok(created)
    }

    async fn list(&self) -> AppResult<Vec<LeaveRequest>> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests ORDER BY created_at DESC, id DESC");

        sqlx::query_as::<_, LeaveRequest>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch leave list");
                AppError::from(e)
            })
    }

    async fn resolve(&self, id: i64, status: LeaveStatus) -> AppResult<LeaveRequest> {
        let sql = format!(
            r#"
            UPDATE leave_requests
            SET status = $2
            WHERE id = $1
            AND status = 'pending'
            RETURNING {LEAVE_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .bind(status.as_ref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, id, %status, "Leave transition failed");
                AppError::from(e)
            })?;

        if let Some(request) = updated {
            info!(id, %status, "Leave request resolved");
            return Ok(request);
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM leave_requests WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if exists {
            Err(AppError::conflict("Leave request already processed"))
        } else {
            Err(AppError::not_found("Leave request not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::postgres::test_support::seed_employee;
    use chrono::NaiveDate;

    fn request(employee_id: i64) -> NewLeaveRequest {
        NewLeaveRequest {
            employee_id,
            leave_type: "Annual".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            reason: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn resolves_pending_requests_once(pool: PgPool) -> anyhow::Result<()> {
        let emp = seed_employee(&pool, "E1").await?;
        let repo = PgLeaveRepository::new(pool);

        let created = repo.create(request(emp.id)).await?;
        assert_eq!(created.status, LeaveStatus::Pending);

        let approved = repo.resolve(created.id, LeaveStatus::Approved).await?;
        assert_eq!(approved.status, LeaveStatus::Approved);

        let err = repo.resolve(created.id, LeaveStatus::Rejected).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = repo.resolve(created.id + 1000, LeaveStatus::Approved).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let listed = repo.list().await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, LeaveStatus::Approved);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn request_for_missing_employee_is_not_found(pool: PgPool) -> anyhow::Result<()> {
        let repo = PgLeaveRepository::new(pool);

        let err = repo.create(request(9999)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(repo.list().await?.is_empty());
        Ok(())
    }
}
