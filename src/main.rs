use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use acadex_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{CatalogService, HttpCatalog, HttpNotifier, Notifier},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
    tasks,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // Load configuration
    let config = Config::from_toml().expect("Failed to load configuration file");

    // Database pool + schema
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Collaborator clients
    let catalog: Arc<dyn CatalogService> = Arc::new(HttpCatalog::new(config.catalog.clone()));
    let notifier: Arc<dyn Notifier> = Arc::new(HttpNotifier::new(config.notifier.clone()));

    // Services
    let user_service = UserService::new(pool.clone());
    let affiliate_service = AffiliateService::new(pool.clone());
    let discount_service = DiscountService::new(pool.clone());
    let checkout_service = CheckoutService::new(
        pool.clone(),
        catalog.clone(),
        discount_service.clone(),
        affiliate_service.clone(),
        user_service.clone(),
        notifier.clone(),
    );
    let withdrawal_service =
        WithdrawalService::new(pool.clone(), user_service.clone(), notifier.clone());

    // Background reaper for expired/inactive discount instruments
    tasks::spawn_all(discount_service.clone(), config.reaper.interval_secs);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(checkout_service.clone()))
            .app_data(web::Data::new(withdrawal_service.clone()))
            .app_data(web::Data::new(discount_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::checkout_config)
                    .configure(handlers::withdrawal_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
