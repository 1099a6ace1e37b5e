use crate::api::attendance::{AttendanceQuery, MarkAttendance};
use crate::api::employee::CreateEmployee;
use crate::api::leave_request::CreateLeave;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::model::employee::EmployeeView;
use crate::model::leave_request::{LeaveStatus, LeaveView};
use crate::model::report::ReportStats;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Desk API",
        version = "0.1.0",
        description = r#"
## HR Desk

Employee directory, daily attendance ledger and leave workflow.

### Key Features
- **Employees**: add, list and remove directory entries
- **Attendance**: mark a day present/absent (re-marking overwrites), filter by employee and date range, present-day summary
- **Leave**: submit requests for your own employee profile, HR/Admin approve or reject pending ones
- **Reports**: headline counters

### Security
Leave endpoints require a **JWT Bearer** token from the authentication service.

### Errors
Every failure responds with `{"error": "<message>"}`.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::attendance_summary,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::report::report_stats
    ),
    components(
        schemas(
            CreateEmployee,
            EmployeeView,
            MarkAttendance,
            AttendanceQuery,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceSummary,
            CreateLeave,
            LeaveStatus,
            LeaveView,
            ReportStats
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Attendance ledger APIs"),
        (name = "Leave", description = "Leave workflow APIs"),
        (name = "Reports", description = "Reporting APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
