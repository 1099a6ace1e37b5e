use crate::{
    error::{AppError, AppResult},
    model::employee::{EmployeeView, NewEmployee, is_valid_email, split_full_name},
    repository::EmployeeRepository,
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-001", value_type = String)]
    pub employee_id: Option<String>,
    #[schema(example = "Jane Doe", value_type = String)]
    pub full_name: Option<String>,
    #[schema(example = "jane@company.com", format = "email", value_type = String)]
    pub email: Option<String>,
    #[schema(example = "HR", value_type = String)]
    pub department: Option<String>,
    /// authentication-service user this employee signs in as
    #[schema(nullable = true)]
    pub user_id: Option<Uuid>,
}

fn required<'a>(value: &'a Option<String>, message: &str) -> AppResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(message))
}

impl CreateEmployee {
    /// Checks required fields and the email shape, then normalizes the
    /// payload into an insertable row.
    pub fn validate(&self) -> AppResult<NewEmployee> {
        let employee_id = required(&self.employee_id, "Employee ID is required")?;
        let full_name = required(&self.full_name, "Full Name is required")?;
        let email = required(&self.email, "Email is required")?;
        let department = required(&self.department, "Department is required")?;

        // the raw value must match; padding is only stripped for storage
        if !is_valid_email(self.email.as_deref().unwrap_or_default()) {
            return Err(AppError::validation("Invalid email format"));
        }

        let (first_name, last_name) = split_full_name(full_name);

        Ok(NewEmployee {
            employee_id: employee_id.to_string(),
            first_name,
            last_name,
            email: email.to_lowercase(),
            department: department.to_string(),
            user_id: self.user_id,
        })
    }
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = [EmployeeView]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    employees: web::Data<dyn EmployeeRepository>,
) -> AppResult<HttpResponse> {
    let rows = employees.list().await?;
    debug!(count = rows.len(), "Listing employees");

    let views: Vec<EmployeeView> = rows.into_iter().map(EmployeeView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = EmployeeView),
        (status = 400, description = "Missing field or invalid email", body = Object, example = json!({
            "error": "Invalid email format"
        })),
        (status = 409, description = "Employee ID or email already in use", body = Object, example = json!({
            "error": "An employee with this email already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    employees: web::Data<dyn EmployeeRepository>,
    payload: web::Json<CreateEmployee>,
) -> AppResult<HttpResponse> {
    let new_employee = payload.validate()?;

    // precise messages first; the unique constraints still guard the insert
    if employees.find_by_code(&new_employee.employee_id).await?.is_some() {
        return Err(AppError::conflict(
            "An employee with this Employee ID already exists",
        ));
    }
    if employees.find_by_email(&new_employee.email).await?.is_some() {
        return Err(AppError::conflict("An employee with this email already exists"));
    }

    let created = employees.create(new_employee).await?;
    info!(id = created.id, employee_id = %created.employee_id, "Employee added to directory");

    Ok(HttpResponse::Created().json(EmployeeView::from(created)))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Internal employee id")
    ),
    responses(
        (status = 200, description = "Deleted (or already absent)", body = Object, example = json!({
            "success": true
        })),
        (status = 400, description = "Missing or malformed id"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    employees: web::Data<dyn EmployeeRepository>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    employees.delete(id).await?;
    info!(id, "Employee removed from directory");

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
