use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{web, App, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod certificate;
pub mod config;
pub mod db;
pub mod registrant;
pub mod views;

pub use crate::config::Config;
pub use crate::db::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }

    pub fn service_unavailable(message: &str) -> Self {
        Self::new("ServiceUnavailable", message)
    }
}

/// Readiness probe: the process only serves traffic once the template store
/// loaded, so this reports the database plus the loaded template count.
#[utoipa::path(
    tag = "Health",
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Stores are ready"),
        (status = 503, description = "Registrant store unreachable", body = ErrorResponse)
    )
)]
pub async fn healthz(data: web::Data<AppState>) -> HttpResponse {
    match data.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "templates": data.templates.len(),
        })),
        Err(e) => {
            log::error!("readiness probe failed: {e}");
            HttpResponse::ServiceUnavailable()
                .json(ErrorResponse::service_unavailable("registrant store unreachable"))
        }
    }
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::registrant::handlers::login,
            crate::certificate::handlers::download_certificate,
            crate::healthz,
        ),
        components(
            schemas(
                registrant::model::Registrant,
                registrant::model::LoginForm,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Registrant Service", description = "Login and profile endpoints."),
            (name = "Certificate Service", description = "Attendance certificate download."),
            (name = "Health", description = "Readiness probe.")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok(); // Load .env file
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "failed to initialize stores. Check DATABASE_URL and TEMPLATE_DIR \
                 and ensure the database is running. Error: {e}"
            );
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("conference_cert_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");
    if let Err(e) = prometheus
        .registry
        .register(Box::new(certificate::handlers::CERTIFICATES_ISSUED.clone()))
    {
        log::warn!("failed to register certificate counter: {e}");
    }

    log::info!("Starting server at http://{}", config.bind_addr);
    let bind_addr = config.bind_addr.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .service(web::resource("/").route(web::get().to(registrant::handlers::login_page)))
            .service(web::resource("/login").route(web::post().to(registrant::handlers::login)))
            .service(
                web::resource("/certificate/{id}")
                    .route(web::get().to(certificate::handlers::download_certificate)),
            )
            .service(web::resource("/healthz").route(web::get().to(healthz)))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind_addr)?
    .run()
    .await
}
