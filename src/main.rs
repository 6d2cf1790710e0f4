use std::sync::Arc;

use actix_governor::Governor;
use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use leave_desk::config::Config;
use leave_desk::docs::ApiDoc;
use leave_desk::store::MemoryStore;
use leave_desk::{LeaveService, routes};

#[get("/")]
async fn index() -> impl Responder {
    "Leave Desk"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "leave-desk.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store = match &config.seed_path {
        Some(path) => MemoryStore::from_seed_file(path)?,
        None => {
            warn!("SEED_PATH not set, starting with an empty leave store");
            MemoryStore::new()
        }
    };
    let service = LeaveService::with_system_clock(Arc::new(store));

    // Limiter state lives in the config and is shared by every worker.
    let limiter = routes::rate_limit(config.rate_protected_per_min)?;

    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(service.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            .service(
                actix_web::web::scope("")
                    .wrap(Governor::new(&limiter)) // rate limiting
                    .configure(|cfg| routes::configure(cfg, &api_prefix)),
            )
    })
    .bind(&server_addr)
    .with_context(|| format!("binding {server_addr}"))?
    .run()
    .await
    .context("server stopped with an error")
}
