use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::error;

use crate::error::{AppError, AppResult};
use crate::model::report::ReportCounts;
use crate::repository::ReportRepository;

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn counts(&self, today: NaiveDate) -> AppResult<ReportCounts> {
        sqlx::query_as::<_, ReportCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM employees) AS total_employees,
                (SELECT COUNT(*) FROM attendance) AS total_attendance,
                (SELECT COUNT(*) FROM leave_requests) AS total_leave_requests,
                (SELECT COUNT(*) FROM attendance
                    WHERE status = 'present' AND date = $1) AS present_today
            "#,
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to count report totals");
            AppError::from(e)
        })
    }
}
