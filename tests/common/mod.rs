#![allow(dead_code)]

use std::sync::Arc;

use hr_desk::auth::jwt::generate_access_token;
use hr_desk::config::Config;
use hr_desk::model::employee::{Employee, NewEmployee};
use hr_desk::repository::{EmployeeRepository, memory::MemoryStore};
use uuid::Uuid;

pub const SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        jwt_secret: SECRET.into(),
        server_addr: "127.0.0.1:0".into(),
        db_max_connections: 1,
        rate_api_per_min: 1000,
        api_prefix: "/api".into(),
        log_dir: "logs".into(),
    }
}

/// Builds the full route table over the given repositories.
macro_rules! test_app {
    ($repos:expr) => {
        test_app!($repos, None)
    };
    ($repos:expr, $limiter:expr) => {{
        let repos = $repos.clone();
        let limiter = $limiter;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(common::test_config()))
                .configure(|cfg| {
                    repos.register(cfg);
                    hr_desk::routes::configure(cfg, "/api", limiter);
                }),
        )
        .await
    }};
}

pub fn bearer(user_id: Uuid, role: u8) -> (&'static str, String) {
    let token = generate_access_token(user_id, role, SECRET, 300).expect("token");
    ("Authorization", format!("Bearer {token}"))
}

pub async fn seed_employee(
    store: &Arc<MemoryStore>,
    code: &str,
    user_id: Option<Uuid>,
) -> Employee {
    EmployeeRepository::create(
        store.as_ref(),
        NewEmployee {
            employee_id: code.into(),
            first_name: "Test".into(),
            last_name: code.into(),
            email: format!("{}@example.com", code.to_lowercase()),
            department: "Ops".into(),
            user_id,
        },
    )
    .await
    .expect("seed employee")
}
