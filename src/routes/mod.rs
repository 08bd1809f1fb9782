// Route exports
pub mod matches;
pub mod profiles;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use std::sync::Arc;

use crate::config::DiscoverySettings;
use crate::core::{Ranker, SwipeTracker};
use crate::error::MatchError;
use crate::models::ErrorResponse;
use crate::services::{BreakdownCache, InMemoryMatchStore, InMemoryProfileStore, InMemorySwipeStore};

pub type Tracker = SwipeTracker<InMemoryProfileStore, InMemorySwipeStore, InMemoryMatchStore>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<InMemoryProfileStore>,
    pub ranker: Ranker,
    pub tracker: Arc<Tracker>,
    pub cache: Arc<BreakdownCache>,
    pub discovery: DiscoverySettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(profiles::configure)
            .configure(matches::configure),
    );
}

/// JSON extractor config answering malformed bodies with an [`ErrorResponse`]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(handle_json_payload_error)
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let body = ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    };
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

impl ResponseError for MatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            MatchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            MatchError::NotFound(_) => StatusCode::NOT_FOUND,
            MatchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            MatchError::InvalidInput(_) => "invalid_input",
            MatchError::NotFound(_) => "not_found",
            MatchError::Store(_) => "store_error",
        };
        if let MatchError::Store(_) = self {
            tracing::error!("Request failed: {}", self);
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
            message: self.to_string(),
            status_code: self.status_code().as_u16(),
        })
    }
}
