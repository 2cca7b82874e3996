//! HTTP surface: `POST /resolve` and `GET /health`.

use actix_web::{error, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use shared::dto::{ResolveRequest, ResolveResponse};
use tracing::debug;

use crate::resolver::Resolver;

const INVALID_REQUEST: &str =
    "Invalid request. 'query' field is required and must be a non-empty string.";

fn bad_request() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": INVALID_REQUEST }))
}

/// Simple liveness endpoint for orchestration.
async fn health() -> impl Responder {
    "OK"
}

async fn resolve(
    resolver: web::Data<Resolver>,
    body: web::Json<ResolveRequest>,
) -> HttpResponse {
    let query = body.into_inner().query;
    if query.trim().is_empty() {
        return bad_request();
    }
    let resolution = resolver.resolve(&query).await;
    HttpResponse::Ok().json(ResolveResponse::from(resolution))
}

async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    debug!(method = %req.method(), "rejected method on /resolve");
    HttpResponse::MethodNotAllowed().json(json!({ "error": "Method not allowed" }))
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("rejected resolve payload: {err}");
    error::InternalError::from_response(err, bad_request()).into()
}

/// Registers the routes; expects a `web::Data<Resolver>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/health", web::get().to(health))
        .service(
            web::resource("/resolve")
                .route(web::post().to(resolve))
                .default_service(web::to(method_not_allowed)),
        );
}
