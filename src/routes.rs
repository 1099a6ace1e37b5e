use crate::{
    api::{attendance, employee, leave_request, report},
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, Responder, Scope, get, web};
use serde_json::json;
use std::sync::Arc;

pub type ApiLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<ApiLimiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit configuration"))?;

    Ok(Governor::new(&cfg))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Extractor failures become the same JSON errors the handlers return.
fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        AppError::Parse("Invalid request body".into()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected query string");
        AppError::Parse("Invalid query parameters".into()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected path parameter");
        AppError::validation("A valid numeric id is required").into()
    }));
}

/// Mounts `/health` and the API scope; the limiter, when given, guards the
/// API scope only.
pub fn configure(
    cfg: &mut web::ServiceConfig,
    api_prefix: &str,
    limiter: Option<Arc<ApiLimiter>>,
) {
    extractor_config(cfg);

    cfg.service(health);

    let scope = api_scope(api_prefix);
    match limiter {
        Some(limiter) => cfg.service(scope.wrap(limiter)), // rate limiting
        None => cfg.service(scope),
    };
}

fn api_scope(api_prefix: &str) -> Scope {
    web::scope(api_prefix)
        .service(
            web::scope("/employees")
                // /employees
                .service(
                    web::resource("")
                        .route(web::get().to(employee::list_employees))
                        .route(web::post().to(employee::create_employee)),
                )
                // /employees/{id}
                .service(
                    web::resource("/{id}").route(web::delete().to(employee::delete_employee)),
                ),
        )
        .service(
            web::scope("/attendance")
                // /attendance
                .service(
                    web::resource("")
                        .route(web::get().to(attendance::list_attendance))
                        .route(web::post().to(attendance::mark_attendance)),
                )
                // /attendance/summary
                .service(
                    web::resource("/summary")
                        .route(web::get().to(attendance::attendance_summary)),
                ),
        )
        .service(
            web::scope("/leave")
                // /leave
                .service(
                    web::resource("")
                        .route(web::get().to(leave_request::leave_list))
                        .route(web::post().to(leave_request::create_leave)),
                )
                // /leave/{id}/approve
                .service(
                    web::resource("/{id}/approve")
                        .route(web::put().to(leave_request::approve_leave)),
                )
                // /leave/{id}/reject
                .service(
                    web::resource("/{id}/reject")
                        .route(web::put().to(leave_request::reject_leave)),
                ),
        )
        .service(
            web::scope("/reports")
                .service(web::resource("/stats").route(web::get().to(report::report_stats))),
        )
}
