use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tatame::config::Config;
use tatame::middleware::RequestId;
use tatame::modules::fees::controllers::fee_controller;
use tatame::modules::fees::repositories::MySqlFeeRepository;
use tatame::modules::fees::services::{FeeService, OverdueChecker};
use tatame::modules::graduations::controllers::graduation_controller;
use tatame::modules::graduations::repositories::MySqlGraduationRepository;
use tatame::modules::graduations::services::EligibilityService;
use tatame::modules::health::controllers::health_controller;
use tatame::modules::notifications::controllers::notification_controller;
use tatame::modules::notifications::services::{HttpMailer, NotificationService};
use tatame::modules::payments::controllers::payment_controller;
use tatame::modules::payments::repositories::MySqlPaymentRepository;
use tatame::modules::payments::services::PaymentService;
use tatame::modules::students::repositories::MySqlStudentRepository;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tatame=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Tatame academy management core");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config.database.create_pool().await?;

    tracing::info!(
        "Database pool initialized ({}-{} connections)",
        config.database.min_connections,
        config.database.max_connections
    );

    // Repositories
    let fee_repo = Arc::new(MySqlFeeRepository::new(db_pool.clone()))
        as Arc<dyn tatame::modules::fees::repositories::FeeRepository>;
    let payment_repo = Arc::new(MySqlPaymentRepository::new(db_pool.clone()))
        as Arc<dyn tatame::modules::payments::repositories::PaymentRepository>;
    let student_repo = Arc::new(MySqlStudentRepository::new(db_pool.clone()))
        as Arc<dyn tatame::modules::students::repositories::StudentRepository>;
    let graduation_repo = Arc::new(MySqlGraduationRepository::new(db_pool.clone()))
        as Arc<dyn tatame::modules::graduations::repositories::GraduationRepository>;

    // Services
    let fee_service = Arc::new(FeeService::new(fee_repo.clone()));
    let payment_service = Arc::new(PaymentService::new(
        payment_repo,
        fee_repo.clone(),
        config.billing.settle_on_partial,
    ));
    let mailer = Arc::new(HttpMailer::new(config.email.clone()))
        as Arc<dyn tatame::modules::notifications::services::EmailSender>;
    let notification_service = Arc::new(NotificationService::new(
        fee_repo.clone(),
        student_repo.clone(),
        mailer,
    ));
    let eligibility_service = Arc::new(EligibilityService::new(
        graduation_repo,
        student_repo,
        config.eligibility.clone(),
    ));

    // Background overdue sweep
    let checker = Arc::new(OverdueChecker::new(
        fee_repo,
        Duration::from_secs(config.billing.overdue_check_interval_secs),
    ));
    tokio::spawn(checker.start());

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .wrap(Cors::permissive())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(fee_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(eligibility_service.clone()))
            .configure(health_controller::configure)
            .service(
                web::scope("/api")
                    // payment routes first: the /fees scope must not
                    // swallow /fees/{id}/payments
                    .configure(payment_controller::configure)
                    .configure(fee_controller::configure)
                    .configure(notification_controller::configure)
                    .configure(graduation_controller::configure),
            )
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
