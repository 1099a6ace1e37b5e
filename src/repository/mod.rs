//! Data access seams. Handlers only see these traits; the concrete store is
//! chosen at startup (postgres) or in tests (memory).

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use actix_web::web::{self, Data};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::model::{
    attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus, AttendanceSummary, MarkOutcome},
    employee::{Employee, NewEmployee},
    leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest},
    report::ReportCounts,
};

/// Conflict message when a user already has an employee profile.
pub const USER_ALREADY_LINKED: &str = "This user is already linked to an employee";

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// All employees, newest id first.
    async fn list(&self) -> AppResult<Vec<Employee>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Employee>>;
    async fn find_by_code(&self, employee_id: &str) -> AppResult<Option<Employee>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Employee>>;
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Employee>>;
    /// Fails with `Conflict` when the code, email or user linkage is taken.
    async fn create(&self, employee: NewEmployee) -> AppResult<Employee>;
    /// Removing an unknown id is not an error.
    async fn delete(&self, id: i64) -> AppResult<()>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Inserts the (employee, date) record or overwrites its status in one step.
    async fn mark(
        &self,
        employee_id: i64,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> AppResult<MarkOutcome>;
    /// Matching records, latest date first.
    async fn list(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>>;
    async fn summarize(&self) -> AppResult<Vec<AttendanceSummary>>;
}

#[async_trait]
pub trait LeaveRepository: Send + Sync {
    async fn create(&self, request: NewLeaveRequest) -> AppResult<LeaveRequest>;
    /// All requests, newest first.
    async fn list(&self) -> AppResult<Vec<LeaveRequest>>;
    /// Moves a pending request to `status`. `NotFound` for unknown ids,
    /// `Conflict` when the request was already resolved.
    async fn resolve(&self, id: i64, status: LeaveStatus) -> AppResult<LeaveRequest>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn counts(&self, today: NaiveDate) -> AppResult<ReportCounts>;
}

/// The repositories handed to the HTTP layer.
#[derive(Clone)]
pub struct Repositories {
    pub employees: Arc<dyn EmployeeRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub leave: Arc<dyn LeaveRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            employees: Arc::new(postgres::PgEmployeeRepository::new(pool.clone())),
            attendance: Arc::new(postgres::PgAttendanceRepository::new(pool.clone())),
            leave: Arc::new(postgres::PgLeaveRepository::new(pool.clone())),
            reports: Arc::new(postgres::PgReportRepository::new(pool)),
        }
    }

    pub fn memory(store: Arc<memory::MemoryStore>) -> Self {
        Self {
            employees: store.clone(),
            attendance: store.clone(),
            leave: store.clone(),
            reports: store,
        }
    }

    /// Registers each repository as `web::Data<dyn Trait>`.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(Data::from(self.employees.clone()))
            .app_data(Data::from(self.attendance.clone()))
            .app_data(Data::from(self.leave.clone()))
            .app_data(Data::from(self.reports.clone()));
    }
}
