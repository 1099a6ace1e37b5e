use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use hr_desk::config::Config;
use hr_desk::db::init_db;
use hr_desk::docs::ApiDoc;
use hr_desk::repository::Repositories;
use hr_desk::routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, prefix = %config.api_prefix, "Server starting...");

    let pool = init_db(&config).await?;
    let repositories = Repositories::postgres(pool);
    let limiter = Arc::new(routes::build_limiter(config.rate_api_per_min)?);

    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    HttpServer::new(move || {
        let api_prefix = config_data.api_prefix.clone();
        let repositories = repositories.clone();
        let limiter = limiter.clone();

        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(config_data.clone())
            .configure(move |cfg| {
                repositories.register(cfg);
                routes::configure(cfg, &api_prefix, Some(limiter));
            })
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
