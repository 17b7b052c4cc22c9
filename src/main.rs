use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use payrun_be::database::{
    init_database,
    repositories::{
        AuditRepository, EmployeeRepository, LocationRepository, PaymentRepository,
        SubmissionRepository, UserRepository,
    },
};
use payrun_be::handlers::{auth, drafts, employees, payments, periods, submissions};
use payrun_be::services::{
    AuditLogger, AuthService, DraftService, PostingService, SubmissionService,
};
use payrun_be::{AppState, Config};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Payrun API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Payrun API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Initialize repositories and services
    let user_repository = UserRepository::new(pool.clone());
    let location_repository = LocationRepository::new(pool.clone());
    let employee_repository = EmployeeRepository::new(pool.clone());
    let submission_repository = SubmissionRepository::new(pool.clone());
    let audit_repository = AuditRepository::new(pool.clone());
    let payment_repository = PaymentRepository::new(pool.clone());

    let auth_service = AuthService::new(user_repository.clone(), config.clone());
    let audit_logger = AuditLogger::new(audit_repository.clone());
    let draft_service = DraftService::new(
        employee_repository.clone(),
        submission_repository.clone(),
    );
    let submission_service = SubmissionService::new(
        employee_repository.clone(),
        submission_repository.clone(),
    );
    let posting_service = PostingService::new(
        submission_repository.clone(),
        employee_repository.clone(),
        location_repository.clone(),
        payment_repository.clone(),
        audit_logger.clone(),
    );

    // Create app state and shared data
    let app_state = web::Data::new(AppState { auth_service });
    let employee_repo_data = web::Data::new(employee_repository);
    let submission_repo_data = web::Data::new(submission_repository);
    let audit_repo_data = web::Data::new(audit_repository);
    let payment_repo_data = web::Data::new(payment_repository);
    let location_repo_data = web::Data::new(location_repository);
    let draft_service_data = web::Data::new(draft_service);
    let submission_service_data = web::Data::new(submission_service);
    let posting_service_data = web::Data::new(posting_service);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(employee_repo_data.clone())
            .app_data(submission_repo_data.clone())
            .app_data(audit_repo_data.clone())
            .app_data(payment_repo_data.clone())
            .app_data(location_repo_data.clone())
            .app_data(draft_service_data.clone())
            .app_data(submission_service_data.clone())
            .app_data(posting_service_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                    ])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(hello)
            .service(health)
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/auth")
                            .route("/login", web::post().to(auth::login))
                            .route("/me", web::get().to(auth::me)),
                    )
                    .service(
                        web::scope("/periods").route("", web::get().to(periods::get_periods)),
                    )
                    .service(
                        web::scope("/employees")
                            .route("", web::get().to(employees::get_employees)),
                    )
                    .service(web::scope("/drafts").route("", web::put().to(drafts::save_draft)))
                    .service(
                        web::scope("/submissions")
                            .route("", web::post().to(submissions::submit))
                            .route("", web::get().to(submissions::get_submissions))
                            .route("/{id}", web::get().to(submissions::get_submission))
                            .route("/{id}/audit", web::get().to(submissions::get_audit_trail))
                            .route(
                                "/{id}/approve",
                                web::post().to(submissions::approve_submission),
                            )
                            .route(
                                "/{id}/reject",
                                web::post().to(submissions::reject_submission),
                            ),
                    )
                    .service(
                        web::scope("/payments").route("", web::get().to(payments::get_payments)),
                    ),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
