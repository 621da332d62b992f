use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use desideri_backend::{
    config::Config,
    database::{create_pool, run_migrations, seed_defaults},
    external::{PaymentGateway, StripeService, mailer_from_config},
    handlers,
    middlewares::{AdminAuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::hash_password,
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

    // `desideri-backend hash-password <password>` prints a value for ADMIN_PASSWORD_HASH
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let Some(password) = args.get(2) else {
            eprintln!("usage: {} hash-password <password>", args[0]);
            std::process::exit(2);
        };
        let hashed = hash_password(password).expect("Failed to hash password");
        println!("{hashed}");
        return Ok(());
    }

    let config = Config::from_toml().expect("Failed to load configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    seed_defaults(&pool)
        .await
        .expect("Failed to seed default catalog");

    // External collaborators
    let gateway: Arc<dyn PaymentGateway> = Arc::new(StripeService::new(config.stripe.clone()));
    let mailer = mailer_from_config(&config.email);

    // Services
    let notification_service = NotificationService::new(
        pool.clone(),
        mailer,
        config.site.name.clone(),
        config.email.admin_recipient.clone(),
    );
    let payment_service =
        PaymentService::new(pool.clone(), gateway, notification_service.clone());
    let booking_service = BookingService::new(
        pool.clone(),
        payment_service.clone(),
        config.site.public_url.clone(),
        config.stripe.currency.clone(),
    );
    let room_service = RoomService::new(pool.clone());
    let availability_service = AvailabilityService::new(pool.clone());
    let pricing_service = PricingService::new(pool.clone());
    let calendar_service = CalendarService::new(pool.clone(), config.site.name.clone());
    let upsell_service = UpsellService::new(pool.clone());
    let coupon_service = CouponService::new(pool.clone());
    let review_service = ReviewService::new(pool.clone());
    let contact_service = ContactService::new(pool.clone(), notification_service);
    let settings_service = SettingsService::new(pool.clone());
    let auth_service = AdminAuthService::new(pool.clone(), config.admin.clone());
    let dashboard_service = DashboardService::new(pool.clone());

    if config.tasks.enabled {
        tasks::spawn_all(
            &config.tasks,
            payment_service.clone(),
            booking_service.clone(),
            auth_service.clone(),
        );
    } else {
        log::warn!("Background tasks are disabled");
    }

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let server_config = config.server.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(AdminAuthMiddleware::new(auth_service.clone()))
            .wrap(create_cors(&server_config))
            .wrap(Logger::default())
            .app_data(web::Data::new(room_service.clone()))
            .app_data(web::Data::new(availability_service.clone()))
            .app_data(web::Data::new(pricing_service.clone()))
            .app_data(web::Data::new(booking_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(calendar_service.clone()))
            .app_data(web::Data::new(upsell_service.clone()))
            .app_data(web::Data::new(coupon_service.clone()))
            .app_data(web::Data::new(review_service.clone()))
            .app_data(web::Data::new(contact_service.clone()))
            .app_data(web::Data::new(settings_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api").configure(handlers::api_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
