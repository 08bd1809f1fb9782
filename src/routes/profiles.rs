use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::core::ProfileStore;
use crate::error::MatchError;
use crate::models::{HealthResponse, Profile, ScoringWeights, WeightsResponse};
use crate::routes::AppState;

/// Configure profile, weight and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/profiles/{id}", web::put().to(upsert_profile))
        .route("/profiles/{id}", web::get().to(get_profile))
        .route("/scoring/weights", web::get().to(get_weights))
        .route("/scoring/weights", web::put().to(set_weights));
}

#[derive(Debug, Serialize)]
struct StoredProfileResponse {
    profile: Profile,
    revision: u64,
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        profiles: state.profiles.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Store a profile snapshot
///
/// PUT /api/v1/profiles/{id}
///
/// The body id may be omitted; when present it must equal the path id.
async fn upsert_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Profile>,
) -> Result<HttpResponse, MatchError> {
    let id = path.into_inner();
    let mut profile = body.into_inner();

    if id.trim().is_empty() {
        return Err(MatchError::InvalidInput("profile id is empty".to_string()));
    }
    if profile.id.is_empty() {
        profile.id = id.clone();
    } else if profile.id != id {
        return Err(MatchError::InvalidInput(format!(
            "body id {} does not match path id {}",
            profile.id, id
        )));
    }

    let revision = state.profiles.upsert(profile.clone());
    tracing::debug!("Stored profile {} at revision {}", id, revision);

    Ok(HttpResponse::Ok().json(StoredProfileResponse { profile, revision }))
}

/// GET /api/v1/profiles/{id}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, MatchError> {
    let profile = state.profiles.require(&path)?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/v1/scoring/weights
async fn get_weights(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.ranker.scorer().config().snapshot();
    HttpResponse::Ok().json(WeightsResponse {
        weights: snapshot.weights,
        revision: snapshot.revision,
    })
}

/// Replace the scoring weights
///
/// PUT /api/v1/scoring/weights
///
/// Weights must be non-negative and sum to 1.0. Scores computed after this
/// call use the new weights; nothing already returned is rescored.
async fn set_weights(
    state: web::Data<AppState>,
    body: web::Json<ScoringWeights>,
) -> Result<HttpResponse, MatchError> {
    let snapshot = state.ranker.scorer().config().set_weights(body.into_inner())?;

    // Entries keyed on the old revision can no longer be hit
    state.cache.invalidate_all();

    Ok(HttpResponse::Ok().json(WeightsResponse {
        weights: snapshot.weights,
        revision: snapshot.revision,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{configure_routes, test_support::create_state};
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_upsert_and_get_profile() {
        let state = create_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/v1/profiles/alice")
            .set_json(serde_json::json!({ "id": "", "photoCount": 2 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/v1/profiles/alice").to_request();
        let profile: Profile = test::call_and_read_body_json(&app, req).await;
        assert_eq!(profile.id, "alice");
        assert_eq!(profile.photo_count, 2);

        let req = test::TestRequest::get().uri("/api/v1/profiles/bob").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_mismatched_profile_id_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/v1/profiles/alice")
            .set_json(serde_json::json!({ "id": "bob" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_set_weights_validates() {
        let state = create_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let bad = ScoringWeights { lifestyle: 0.5, ..ScoringWeights::default() };
        let req = test::TestRequest::put()
            .uri("/api/v1/scoring/weights")
            .set_json(bad)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let good = ScoringWeights { lifestyle: 0.30, age: 0.0, ..ScoringWeights::default() };
        let req = test::TestRequest::put()
            .uri("/api/v1/scoring/weights")
            .set_json(good)
            .to_request();
        let body: WeightsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.revision, 1);
        assert_eq!(state.ranker.scorer().config().weights().lifestyle, 0.30);
    }
}
