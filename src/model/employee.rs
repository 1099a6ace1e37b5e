use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An employee row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub user_id: Option<Uuid>,
}

impl Employee {
    /// First and last name joined by a space; the first name alone when the
    /// last name is empty.
    pub fn full_name(&self) -> String {
        let joined = [self.first_name.as_str(), self.last_name.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let trimmed = joined.trim();
        if trimmed.is_empty() {
            self.first_name.clone()
        } else {
            trimmed.to_string()
        }
    }
}

/// Display form returned by the directory endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "EMP-001",
        "full_name": "Jane Doe",
        "email": "jane.doe@company.com",
        "department": "HR"
    })
)]
pub struct EmployeeView {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "Jane Doe")]
    pub full_name: String,

    #[schema(example = "jane.doe@company.com")]
    pub email: String,

    #[schema(example = "HR")]
    pub department: String,
}

impl From<Employee> for EmployeeView {
    fn from(row: Employee) -> Self {
        let full_name = row.full_name();
        Self {
            id: row.id,
            employee_id: row.employee_id,
            full_name,
            email: row.email,
            department: row.department,
        }
    }
}

/// A validated, normalized employee ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub user_id: Option<Uuid>,
}

/// Splits a full name on whitespace into the first token and the rest joined
/// by single spaces.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Accepts `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
