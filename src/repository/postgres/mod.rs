mod attendance;
mod employee;
mod leave_request;
mod report;

pub use attendance::PgAttendanceRepository;
pub use employee::PgEmployeeRepository;
pub use leave_request::PgLeaveRepository;
pub use report::PgReportRepository;
