//! In-process store implementing every repository trait. It enforces the same
//! uniqueness rules and cascades as the postgres schema so handler tests
//! observe the same outcomes.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::model::{
    attendance::{
        AttendanceFilter, AttendanceRecord, AttendanceStatus, AttendanceSummary, MarkOutcome,
        summarize_present,
    },
    employee::{Employee, NewEmployee},
    leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest},
    report::ReportCounts,
};
use crate::repository::USER_ALREADY_LINKED;
use crate::repository::{
    AttendanceRepository, EmployeeRepository, LeaveRepository, ReportRepository,
};

#[derive(Default)]
struct State {
    next_id: i64,
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    leave: Vec<LeaveRequest>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Employee>> {
        let mut employees = self.read().employees.clone();
        employees.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(employees)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Employee>> {
        Ok(self.read().employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_code(&self, employee_id: &str) -> AppResult<Option<Employee>> {
        Ok(self
            .read()
            .employees
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Employee>> {
        let email = email.to_lowercase();
        Ok(self.read().employees.iter().find(|e| e.email == email).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Employee>> {
        Ok(self
            .read()
            .employees
            .iter()
            .find(|e| e.user_id == Some(user_id))
            .cloned())
    }

    async fn create(&self, employee: NewEmployee) -> AppResult<Employee> {
        let mut state = self.write();

        let taken = state
            .employees
            .iter()
            .any(|e| e.employee_id == employee.employee_id || e.email == employee.email);
        if taken {
            return Err(AppError::conflict("Employee ID or email already exists"));
        }

        let linked = employee.user_id.is_some()
            && state.employees.iter().any(|e| e.user_id == employee.user_id);
        if linked {
            return Err(AppError::conflict(USER_ALREADY_LINKED));
        }

        let row = Employee {
            id: state.next_id(),
            employee_id: employee.employee_id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            department: employee.department,
            user_id: employee.user_id,
        };
        state.employees.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut state = self.write();
        state.employees.retain(|e| e.id != id);
        state.attendance.retain(|a| a.employee_id != id);
        state.leave.retain(|l| l.employee_id != id);
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn mark(
        &self,
        employee_id: i64,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> AppResult<MarkOutcome> {
        let mut state = self.write();

        if !state.employees.iter().any(|e| e.id == employee_id) {
            return Err(AppError::not_found("Employee not found"));
        }

        if let Some(existing) = state
            .attendance
            .iter_mut()
            .find(|a| a.employee_id == employee_id && a.date == date)
        {
            existing.status = status;
            return Ok(MarkOutcome::Updated);
        }

        let id = state.next_id();
        state.attendance.push(AttendanceRecord {
            id,
            employee_id,
            date,
            status,
        });
        Ok(MarkOutcome::Created)
    }

    async fn list(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .read()
            .attendance
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn summarize(&self) -> AppResult<Vec<AttendanceSummary>> {
        Ok(summarize_present(&self.read().attendance))
    }
}

#[async_trait]
impl LeaveRepository for MemoryStore {
    async fn create(&self, request: NewLeaveRequest) -> AppResult<LeaveRequest> {
        let mut state = self.write();

        if !state.employees.iter().any(|e| e.id == request.employee_id) {
            return Err(AppError::not_found("Employee not found"));
        }

        let row = LeaveRequest {
            id: state.next_id(),
            employee_id: request.employee_id,
            leave_type: request.leave_type,
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason,
            status: LeaveStatus::Pending,
            created_at: Utc::now(),
        };
        state.leave.push(row.clone());
        Ok(row)
    }

    async fn list(&self) -> AppResult<Vec<LeaveRequest>> {
        let mut requests = self.read().leave.clone();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(requests)
    }

    async fn resolve(&self, id: i64, status: LeaveStatus) -> AppResult<LeaveRequest> {
        let mut state = self.write();

        let request = state
            .leave
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found("Leave request not found"))?;

        if request.status != LeaveStatus::Pending {
            return Err(AppError::conflict("Leave request already processed"));
        }

        request.status = status;
        Ok(request.clone())
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn counts(&self, today: NaiveDate) -> AppResult<ReportCounts> {
        let state = self.read();
        let present_today = state
            .attendance
            .iter()
            .filter(|a| a.date == today && a.status == AttendanceStatus::Present)
            .count();

        Ok(ReportCounts {
            total_employees: state.employees.len() as i64,
            total_attendance: state.attendance.len() as i64,
            total_leave_requests: state.leave.len() as i64,
            present_today: present_today as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_employee(code: &str, email: &str) -> NewEmployee {
        NewEmployee {
            employee_id: code.into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            email: email.into(),
            department: "Ops".into(),
            user_id: None,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[actix_web::test]
    async fn repeated_marks_keep_a_single_record() {
        let store = MemoryStore::new();
        let emp = EmployeeRepository::create(&store, new_employee("E1", "e1@x.com"))
            .await
            .unwrap();

        let first = store.mark(emp.id, day("2024-01-05"), AttendanceStatus::Present).await.unwrap();
        let second = store.mark(emp.id, day("2024-01-05"), AttendanceStatus::Absent).await.unwrap();

        assert_eq!(first, MarkOutcome::Created);
        assert_eq!(second, MarkOutcome::Updated);

        let records = AttendanceRepository::list(&store, &AttendanceFilter::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Absent);
    }

    #[actix_web::test]
    async fn delete_cascades_to_attendance() {
        let store = MemoryStore::new();
        let emp = EmployeeRepository::create(&store, new_employee("E1", "e1@x.com"))
            .await
            .unwrap();
        store.mark(emp.id, day("2024-01-05"), AttendanceStatus::Present).await.unwrap();

        EmployeeRepository::delete(&store, emp.id).await.unwrap();
        // unknown ids are fine
        EmployeeRepository::delete(&store, 999).await.unwrap();

        assert!(store.summarize().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        EmployeeRepository::create(&store, new_employee("E1", "same@x.com"))
            .await
            .unwrap();

        let err = EmployeeRepository::create(&store, new_employee("E2", "same@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(EmployeeRepository::list(&store).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn second_profile_for_a_user_is_a_conflict() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        let mut first = new_employee("E1", "e1@x.com");
        first.user_id = Some(user);
        EmployeeRepository::create(&store, first).await.unwrap();

        let mut second = new_employee("E2", "e2@x.com");
        second.user_id = Some(user);
        let err = EmployeeRepository::create(&store, second).await.unwrap_err();
        assert_eq!(err.to_string(), USER_ALREADY_LINKED);
    }
}
