use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{error, http::header, web, App, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod forms;
pub mod generation;
pub mod metrics;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

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

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::generation::handlers::list_forms,
        crate::generation::handlers::generate,
        crate::generation::handlers::generate_all,
        crate::generation::handlers::count_entries,
        crate::generation::handlers::template_fields
    ),
    components(
        schemas(
            forms::FormId,
            forms::FieldInfo,
            forms::AcroFieldKind,
            forms::FieldWarning,
            forms::FillReport,
            generation::models::GenerateRequest,
            generation::models::FormSummary,
            generation::models::EntryCountResponse,
            generation::models::DocumentPayload,
            generation::models::GenerateAllResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Forms", description = "Admission packet form generation endpoints.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

/// JSON body settings: size limit and `ErrorResponse` bodies for malformed requests.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let message = err.to_string();
            error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
            )
            .into()
        })
}

/// Query string settings: `ErrorResponse` bodies for unparsable parameters such as `?index=-1`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
        )
        .into()
    })
}

/// Register the `/api` routes and the form metrics endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").configure(generation::config))
        .service(
            web::resource("/metrics/forms")
                .route(web::get().to(generation::handlers::form_metrics)),
        );
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState::new(&config));

    let prometheus = PrometheusMetricsBuilder::new("nybar_packet_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let bind = (config.host.clone(), config.port);
    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![
                header::CONTENT_DISPOSITION,
                header::HeaderName::from_static("x-field-warnings"),
            ])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .app_data(json_config(config.max_payload_bytes))
            .app_data(query_config())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await
}
