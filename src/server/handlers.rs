use crate::{
    models::{DownloadQuery, GenerateResponse, GenerationOutcome, GenerationRequest},
    relay::{GenerationRelay, ImageProxy},
    server::errors::ApiError,
};
use actix_web::{
    http::{header, Method},
    middleware, web, HttpResponse,
};
use serde_json::{json, Value};

/// Shared per-worker state.
#[derive(Clone)]
pub struct AppState {
    pub relay: GenerationRelay,
    pub proxy: ImageProxy,
}

impl AppState {
    pub fn new(relay: GenerationRelay, proxy: ImageProxy) -> Self {
        Self { relay, proxy }
    }
}

/// An empty or `null` body is treated as `{}`.
pub fn parse_generation_request(body: &[u8]) -> Result<GenerationRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerationRequest::default());
    }
    let value: Value = serde_json::from_slice(body).map_err(ApiError::invalid_body)?;
    if value.is_null() {
        return Ok(GenerationRequest::default());
    }
    serde_json::from_value(value).map_err(ApiError::invalid_body)
}

pub async fn generate_poster(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let request = parse_generation_request(&body)?;

    match state.relay.generate(&request).await {
        Ok(GenerationOutcome::Resolved { href, .. }) => {
            Ok(HttpResponse::Ok().json(GenerateResponse { href }))
        }
        Ok(GenerationOutcome::NoImage { output }) => {
            Err(ApiError::unexpected_output_shape(output))
        }
        Err(err) => Err(ApiError::for_generation(err)),
    }
}

pub async fn download_image(
    state: web::Data<AppState>,
    query: web::Query<DownloadQuery>,
) -> Result<HttpResponse, ApiError> {
    let image = state
        .proxy
        .download(query.url.as_deref())
        .await
        .map_err(ApiError::for_download)?;

    let disposition = image.content_disposition();
    Ok(HttpResponse::Ok()
        .content_type(image.content_type)
        .insert_header((header::CONTENT_DISPOSITION, disposition))
        .body(image.bytes))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .insert_header((header::ACCESS_CONTROL_MAX_AGE, "86400"))
        .finish()
}

/// Any origin may call the relay.
pub fn cors_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new().add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
}

/// Query strings that fail to deserialize are reported like an unparseable URL.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::for_download(crate::error::RelayError::InvalidUrl(err.to_string())).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(vec!["/generateposter", "/api/generate"])
            .route(web::post().to(generate_poster))
            .route(web::method(Method::OPTIONS).to(preflight)),
    )
    .service(
        web::resource(vec!["/download-image", "/api/download-image"])
            .route(web::get().to(download_image))
            .route(web::method(Method::OPTIONS).to(preflight)),
    )
    .route("/health", web::get().to(health));
}
