use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, error};

use crate::error::{AppError, AppResult, is_foreign_key_violation};
use crate::model::attendance::{
    AttendanceFilter, AttendanceRecord, AttendanceStatus, AttendanceSummary, MarkOutcome,
};
use crate::repository::AttendanceRepository;

pub struct PgAttendanceRepository {
    pool: PgPool,
}

impl PgAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PgAttendanceRepository {
    async fn mark(
        &self,
        employee_id: i64,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> AppResult<MarkOutcome> {
        // xmax is 0 only for a freshly inserted tuple
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO attendance (employee_id, date, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (employee_id, date)
            DO UPDATE SET status = EXCLUDED.status
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(status.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // the employee was removed between the existence check and the write
            if is_foreign_key_violation(&e) {
                return AppError::not_found("Employee not found");
            }
            error!(error = %e, employee_id, %date, "Attendance upsert failed");
            AppError::from(e)
        })?;

        Ok(if inserted {
            MarkOutcome::Created
        } else {
            MarkOutcome::Updated
        })
    }

    async fn list(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT id, employee_id, date, status FROM attendance WHERE 1=1");

        if let Some(employee_id) = filter.employee_id {
            query.push(" AND employee_id = ").push_bind(employee_id);
        }
        if let Some(from) = filter.date_from {
            query.push(" AND date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            query.push(" AND date <= ").push_bind(to);
        }
        query.push(" ORDER BY date DESC, id DESC");

        debug!(sql = %query.sql(), filter = ?filter, "Fetching attendance");

        query
            .build_query_as::<AttendanceRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch attendance");
                AppError::from(e)
            })
    }

    async fn summarize(&self) -> AppResult<Vec<AttendanceSummary>> {
        sqlx::query_as::<_, AttendanceSummary>(
            r#"
            SELECT employee_id, COUNT(*) AS present_days
            FROM attendance
            WHERE status = 'present'
            GROUP BY employee_id
            ORDER BY employee_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to summarize attendance");
            AppError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::EmployeeRepository;
    use crate::repository::postgres::{PgEmployeeRepository, test_support::seed_employee};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn second_mark_overwrites_the_same_row(pool: PgPool) -> anyhow::Result<()> {
        let emp = seed_employee(&pool, "E1").await?;
        let repo = PgAttendanceRepository::new(pool);

        let first = repo.mark(emp.id, day("2024-01-05"), AttendanceStatus::Present).await?;
        let second = repo.mark(emp.id, day("2024-01-05"), AttendanceStatus::Absent).await?;
        assert_eq!(first, MarkOutcome::Created);
        assert_eq!(second, MarkOutcome::Updated);

        let records = repo.list(&AttendanceFilter::default()).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Absent);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn unknown_employee_is_not_found(pool: PgPool) -> anyhow::Result<()> {
        let repo = PgAttendanceRepository::new(pool);

        let err = repo
            .mark(9999, day("2024-01-05"), AttendanceStatus::Present)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn filters_are_inclusive_and_latest_first(pool: PgPool) -> anyhow::Result<()> {
        let e1 = seed_employee(&pool, "E1").await?;
        let e2 = seed_employee(&pool, "E2").await?;
        let repo = PgAttendanceRepository::new(pool);

        for date in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"] {
            repo.mark(e1.id, day(date), AttendanceStatus::Present).await?;
        }
        repo.mark(e2.id, day("2024-01-02"), AttendanceStatus::Absent).await?;

        let filter = AttendanceFilter {
            employee_id: Some(e1.id),
            date_from: Some(day("2024-01-02")),
            date_to: Some(day("2024-01-03")),
        };
        let dates: Vec<NaiveDate> = repo.list(&filter).await?.into_iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day("2024-01-03"), day("2024-01-02")]);

        let only_from = AttendanceFilter {
            date_from: Some(day("2024-01-04")),
            ..Default::default()
        };
        assert_eq!(repo.list(&only_from).await?.len(), 1);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn summary_counts_present_days_and_follows_deletes(pool: PgPool) -> anyhow::Result<()> {
        let e1 = seed_employee(&pool, "E1").await?;
        let e2 = seed_employee(&pool, "E2").await?;
        let employees = PgEmployeeRepository::new(pool.clone());
        let repo = PgAttendanceRepository::new(pool);

        repo.mark(e1.id, day("2024-01-05"), AttendanceStatus::Present).await?;
        repo.mark(e1.id, day("2024-01-06"), AttendanceStatus::Present).await?;
        repo.mark(e2.id, day("2024-01-05"), AttendanceStatus::Absent).await?;

        assert_eq!(
            repo.summarize().await?,
            vec![AttendanceSummary {
                employee_id: e1.id,
                present_days: 2
            }]
        );

        employees.delete(e1.id).await?;
        assert!(repo.summarize().await?.is_empty());
        Ok(())
    }
}
