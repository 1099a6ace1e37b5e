use crate::{error::AppResult, model::report::ReportStats, repository::ReportRepository};
use actix_web::{HttpResponse, web};
use chrono::Utc;

/// Headline HR counters
#[utoipa::path(
    get,
    path = "/api/reports/stats",
    responses(
        (status = 200, description = "Directory, attendance and leave totals", body = ReportStats),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reports"
)]
pub async fn report_stats(reports: web::Data<dyn ReportRepository>) -> AppResult<HttpResponse> {
    let today = Utc::now().date_naive();
    let counts = reports.counts(today).await?;

    Ok(HttpResponse::Ok().json(ReportStats::from(counts)))
}
