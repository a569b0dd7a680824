use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write;

use eventhub_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{AssistantClient, MailerService},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // one JSON object per line
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

    let config = Config::from_toml().expect("Failed to load configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let activity_service = ActivityLogService::new(pool.clone());
    let mail_service =
        MailSettingsService::new(pool.clone(), MailerService::new(), activity_service.clone());
    mail_service
        .seed_from_config(&config.mail)
        .await
        .expect("Failed to initialise mail settings");

    let auth_service = AuthService::new(
        pool.clone(),
        jwt_service.clone(),
        mail_service.clone(),
        activity_service.clone(),
    );
    auth_service
        .ensure_admin(&config.admin)
        .await
        .expect("Failed to create the initial administrator");

    let category_service = CategoryService::new(pool.clone(), activity_service.clone());
    let team_service = TeamService::new(pool.clone(), activity_service.clone());
    let venue_service = VenueService::new(pool.clone(), activity_service.clone());
    let event_service = EventService::new(pool.clone(), activity_service.clone());
    let ticket_type_service = TicketTypeService::new(
        pool.clone(),
        event_service.clone(),
        activity_service.clone(),
    );
    let speaker_service = SpeakerService::new(pool.clone(), activity_service.clone());
    let sponsor_service = SponsorService::new(pool.clone(), activity_service.clone());
    let vendor_service = VendorService::new(pool.clone(), activity_service.clone());
    let page_service = PageService::new(pool.clone(), activity_service.clone());
    let survey_service = SurveyService::new(pool.clone(), activity_service.clone());
    let review_service = ReviewService::new(pool.clone(), activity_service.clone());
    let promo_code_service = PromoCodeService::new(pool.clone(), activity_service.clone());
    let order_service = OrderService::new(pool.clone(), activity_service.clone());
    let trash_service = TrashService::new(pool.clone(), activity_service.clone());
    let backup_service = BackupService::new(
        &config.backup,
        &config.database.url,
        activity_service.clone(),
    );
    let assistant_service = AssistantService::new(AssistantClient::new(config.assistant.clone()));
    if !config.assistant.api_key.is_empty() {
        log::info!("Assistant enabled with model {}", config.assistant.model);
    }

    tasks::spawn_all(auth_service.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let cors_origins = config.server.cors_allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors(&cors_origins))
            .wrap(Logger::default())
            .app_data(web::Data::new(activity_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(mail_service.clone()))
            .app_data(web::Data::new(category_service.clone()))
            .app_data(web::Data::new(team_service.clone()))
            .app_data(web::Data::new(venue_service.clone()))
            .app_data(web::Data::new(event_service.clone()))
            .app_data(web::Data::new(ticket_type_service.clone()))
            .app_data(web::Data::new(speaker_service.clone()))
            .app_data(web::Data::new(sponsor_service.clone()))
            .app_data(web::Data::new(vendor_service.clone()))
            .app_data(web::Data::new(page_service.clone()))
            .app_data(web::Data::new(survey_service.clone()))
            .app_data(web::Data::new(review_service.clone()))
            .app_data(web::Data::new(promo_code_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(trash_service.clone()))
            .app_data(web::Data::new(backup_service.clone()))
            .app_data(web::Data::new(assistant_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api/v1").configure(handlers::api_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
