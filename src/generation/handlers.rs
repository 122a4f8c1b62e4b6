use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse, ResponseError};

use super::models::{
    DocumentPayload, EntryCountResponse, FormSummary, GenerateAllResponse, GenerateRequest,
    SelectionQuery,
};
use crate::forms::generators::generator_for;
use crate::forms::{FieldInfo, FormId, GeneratedDocument, GeneratorError};
use crate::{metrics, AppState, ErrorResponse};

/// Number of fields that could not be written into the returned PDF.
pub const FIELD_WARNINGS_HEADER: &str = "X-Field-Warnings";

impl ResponseError for GeneratorError {
    fn status_code(&self) -> StatusCode {
        match self {
            GeneratorError::UnknownForm(_) => StatusCode::NOT_FOUND,
            GeneratorError::InvalidPayload { .. }
            | GeneratorError::SelectionOutOfRange { .. }
            | GeneratorError::NoEntries { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        let body = match self.status_code() {
            StatusCode::NOT_FOUND => ErrorResponse::not_found(&message),
            StatusCode::BAD_REQUEST => ErrorResponse::bad_request(&message),
            _ => ErrorResponse::internal_error(&message),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

fn pdf_response(doc: GeneratedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", doc.filename),
        ))
        .insert_header((FIELD_WARNINGS_HEADER, doc.report.warnings.len().to_string()))
        .body(doc.pdf)
}

#[utoipa::path(
    get,
    path = "/api/forms",
    tag = "Forms",
    responses(
        (status = 200, description = "Every form the packet can produce", body = Vec<FormSummary>)
    )
)]
pub async fn list_forms() -> HttpResponse {
    let forms: Vec<FormSummary> = FormId::ALL.into_iter().map(FormSummary::from).collect();
    HttpResponse::Ok().json(forms)
}

#[utoipa::path(
    post,
    path = "/api/forms/{form}/generate",
    tag = "Forms",
    request_body = GenerateRequest,
    params(
        ("form" = String, Path, description = "Form slug, e.g. `law-school-certificate`"),
        SelectionQuery
    ),
    responses(
        (status = 200, description = "Filled PDF", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Selection out of range or payload not an object", body = ErrorResponse),
        (status = 404, description = "Unknown form", body = ErrorResponse),
        (status = 500, description = "Template or mapping unavailable", body = ErrorResponse)
    )
)]
pub async fn generate(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<SelectionQuery>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, GeneratorError> {
    let form: FormId = path.parse()?;
    let doc = state.forms.generate(form, &body.data, query.index).await?;
    Ok(pdf_response(doc))
}

#[utoipa::path(
    post,
    path = "/api/forms/{form}/generate-all",
    tag = "Forms",
    request_body = GenerateRequest,
    params(("form" = String, Path, description = "Form slug")),
    responses(
        (status = 200, description = "A single PDF when there is one entry, otherwise every document base64-encoded", body = GenerateAllResponse),
        (status = 400, description = "No entries to generate", body = ErrorResponse),
        (status = 404, description = "Unknown form", body = ErrorResponse),
        (status = 500, description = "Template or mapping unavailable", body = ErrorResponse)
    )
)]
pub async fn generate_all(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, GeneratorError> {
    let form: FormId = path.parse()?;
    let mut documents = state.forms.generate_all(form, &body.data).await?;

    match documents.len() {
        0 => Err(GeneratorError::NoEntries {
            form,
            collection: generator_for(form).collection().unwrap_or("entries"),
        }),
        1 => Ok(pdf_response(documents.remove(0))),
        count => {
            let documents = documents.into_iter().map(DocumentPayload::from).collect();
            Ok(HttpResponse::Ok().json(GenerateAllResponse { count, documents }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/forms/{form}/entries",
    tag = "Forms",
    request_body = GenerateRequest,
    params(("form" = String, Path, description = "Form slug")),
    responses(
        (status = 200, description = "How many documents generate-all would produce", body = EntryCountResponse),
        (status = 404, description = "Unknown form", body = ErrorResponse)
    )
)]
pub async fn count_entries(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, GeneratorError> {
    let form: FormId = path.parse()?;
    let count = state.forms.entry_count(form, &body.data);
    Ok(HttpResponse::Ok().json(EntryCountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/api/forms/{form}/fields",
    tag = "Forms",
    params(("form" = String, Path, description = "Form slug")),
    responses(
        (status = 200, description = "Fields found in the form's template", body = Vec<FieldInfo>),
        (status = 404, description = "Unknown form", body = ErrorResponse),
        (status = 500, description = "Template unavailable", body = ErrorResponse)
    )
)]
pub async fn template_fields(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, GeneratorError> {
    let form: FormId = path.parse()?;
    let fields = state.forms.template_fields(form).await?;
    Ok(HttpResponse::Ok().json(fields))
}

/// Form generation counters in Prometheus text format.
pub async fn form_metrics() -> HttpResponse {
    match metrics::render() {
        Ok((content_type, text)) => HttpResponse::Ok().content_type(content_type).body(text),
        Err(e) => {
            log::error!("Failed to encode form metrics: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to encode metrics"))
        }
    }
}

/// Configure form routes (mounted under `/api`)
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/forms").route(web::get().to(list_forms)))
        .service(web::resource("/forms/{form}/generate").route(web::post().to(generate)))
        .service(web::resource("/forms/{form}/generate-all").route(web::post().to(generate_all)))
        .service(web::resource("/forms/{form}/entries").route(web::post().to(count_entries)))
        .service(web::resource("/forms/{form}/fields").route(web::get().to(template_fields)));
}
