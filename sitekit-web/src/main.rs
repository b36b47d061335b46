use actix_web::{HttpServer, web};
use anyhow::Context;
use sitekit_web::config::AppConfig;
use sitekit_web::state::AppState;
use sitekit_web::{create_app, logging};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    let _log_guard = logging::init(&config.logging).context("initializing logging")?;

    let state = web::Data::new(AppState::from_config(&config).context("building toolbox")?);
    let bind = (config.server.host.clone(), config.server.port);
    let workers = config.server.worker_count();

    tracing::info!(
        host = %bind.0,
        port = bind.1,
        workers,
        cors_origin = %config.cors.allow_origin,
        "Starting sitekit API server"
    );

    HttpServer::new(move || create_app(state.clone(), &config))
        .workers(workers)
        .bind(&bind)
        .with_context(|| format!("binding {}:{}", bind.0, bind.1))?
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
