use actix_web::{web, HttpResponse};
use std::collections::HashSet;
use validator::Validate;

use crate::core::{ProfileStore, SwipeStore};
use crate::error::MatchError;
use crate::models::{
    CompatibilityRequest, DiscoverRequest, DiscoverResponse, MatchesResponse, Profile,
    SwipeHistoryResponse, SwipeRequest, SwipeResponse,
};
use crate::routes::{validation_failed, AppState};
use crate::services::CacheKey;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/compatibility", web::post().to(compatibility))
        .route("/discover", web::post().to(discover))
        .route("/swipes", web::post().to(swipe))
        .route("/swipes/{actor_id}", web::get().to(swipe_history))
        .route("/matches/{user_id}", web::get().to(list_matches))
        .route("/matches/{user_id}/{other_id}", web::delete().to(unmatch));
}

/// Compatibility breakdown of one profile for another
///
/// POST /api/v1/compatibility
///
/// Request body:
/// ```json
/// {
///   "viewerId": "string",
///   "candidateId": "string"
/// }
/// ```
async fn compatibility(
    state: web::Data<AppState>,
    req: web::Json<CompatibilityRequest>,
) -> Result<HttpResponse, MatchError> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    let not_found = |id: &str| MatchError::profile_not_found(id);
    let viewer = state
        .profiles
        .get_stored(&req.viewer_id)
        .ok_or_else(|| not_found(&req.viewer_id))?;
    let candidate = state
        .profiles
        .get_stored(&req.candidate_id)
        .ok_or_else(|| not_found(&req.candidate_id))?;

    let scorer = state.ranker.scorer();
    let snapshot = scorer.config().snapshot();
    let key = CacheKey {
        viewer_id: viewer.profile.id.clone(),
        viewer_revision: viewer.revision,
        candidate_id: candidate.profile.id.clone(),
        candidate_revision: candidate.revision,
        weights_revision: snapshot.revision,
    };

    let breakdown = state
        .cache
        .get_or_score(key, || {
            scorer.score_with(&snapshot.weights, &viewer.profile, &candidate.profile)
        })
        .await;

    Ok(HttpResponse::Ok().json(breakdown))
}

/// Ranked discovery feed
///
/// POST /api/v1/discover
///
/// Request body:
/// ```json
/// {
///   "viewerId": "string",
///   "filters": { "ageRange": { "min": 18, "max": 99 }, "minCompatibilityScore": 0 },
///   "limit": 20,
///   "excludeIds": ["string"]
/// }
/// ```
async fn discover(
    state: web::Data<AppState>,
    req: web::Json<DiscoverRequest>,
) -> Result<HttpResponse, MatchError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for discover request: {:?}", errors);
        return Ok(validation_failed(errors));
    }

    let viewer = state.profiles.require(&req.viewer_id)?;
    let limit = req
        .limit
        .unwrap_or(state.discovery.default_limit)
        .min(state.discovery.max_limit);

    let mut excluded: HashSet<String> = req.exclude_ids.iter().cloned().collect();
    if state.discovery.exclude_swiped {
        excluded.extend(state.tracker.swipes().swiped_targets(&viewer.id)?);
    }

    let pool: Vec<Profile> = state
        .profiles
        .all()
        .into_iter()
        .filter(|p| !excluded.contains(&p.id))
        .collect();

    tracing::debug!(
        "Discovering for {} over {} profiles ({} excluded)",
        viewer.id,
        pool.len(),
        excluded.len()
    );

    let result = state.ranker.discover(&viewer, &pool, &req.filters, limit)?;

    tracing::info!(
        "Returning {} candidates for {} (of {} eligible)",
        result.feed.len(),
        viewer.id,
        result.total_eligible
    );

    Ok(HttpResponse::Ok().json(DiscoverResponse {
        feed: result.feed,
        total_eligible: result.total_eligible,
        has_more: result.has_more,
    }))
}

/// Record a swipe
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "actorId": "string",
///   "targetId": "string",
///   "action": "like|pass|super_like"
/// }
/// ```
async fn swipe(
    state: web::Data<AppState>,
    req: web::Json<SwipeRequest>,
) -> Result<HttpResponse, MatchError> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    let outcome = state.tracker.swipe(&req.actor_id, &req.target_id, req.action)?;

    Ok(HttpResponse::Ok().json(SwipeResponse {
        swipe: outcome.record,
        is_mutual: outcome.is_mutual,
        mutual_match: outcome.mutual_match,
        newly_matched: outcome.newly_matched,
    }))
}

/// GET /api/v1/swipes/{actor_id}
async fn swipe_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, MatchError> {
    let actor_id = path.into_inner();
    let swipes = state.tracker.history(&actor_id)?;

    Ok(HttpResponse::Ok().json(SwipeHistoryResponse {
        count: swipes.len(),
        actor_id,
        swipes,
    }))
}

/// GET /api/v1/matches/{user_id}
///
/// Active matches, newest first.
async fn list_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, MatchError> {
    let user_id = path.into_inner();
    let matches = state.tracker.matches_for(&user_id)?;

    Ok(HttpResponse::Ok().json(MatchesResponse { user_id, matches }))
}

/// DELETE /api/v1/matches/{user_id}/{other_id}
async fn unmatch(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, MatchError> {
    let (user_id, other_id) = path.into_inner();
    let updated = state.tracker.unmatch(&user_id, &other_id)?;
    Ok(HttpResponse::Ok().json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Location, SwipeAction};
    use crate::routes::{configure_routes, json_config, test_support::create_state};
    use actix_web::{http::StatusCode, test, App};
    use chrono::NaiveDate;

    fn seed(state: &AppState, id: &str, city: &str) {
        let mut profile = Profile::new(id);
        profile.birth_date = NaiveDate::from_ymd_opt(1996, 5, 1);
        profile.gender = Some(Gender::Female);
        profile.location = Some(Location { city: city.to_string(), state: "WA".to_string() });
        state.profiles.upsert(profile);
    }

    #[actix_web::test]
    async fn test_swipe_flow_creates_match() {
        let state = create_state();
        seed(&state, "a", "Seattle");
        seed(&state, "b", "Seattle");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let like = |actor: &str, target: &str| {
            test::TestRequest::post()
                .uri("/api/v1/swipes")
                .set_json(SwipeRequest {
                    actor_id: actor.to_string(),
                    target_id: target.to_string(),
                    action: SwipeAction::Like,
                })
                .to_request()
        };

        let first: SwipeResponse = test::call_and_read_body_json(&app, like("a", "b")).await;
        assert!(!first.is_mutual);

        let second: SwipeResponse = test::call_and_read_body_json(&app, like("b", "a")).await;
        assert!(second.is_mutual);
        assert!(second.newly_matched);

        let req = test::TestRequest::get().uri("/api/v1/matches/a").to_request();
        let matches: MatchesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(matches.matches.len(), 1);

        let resp = test::call_service(&app, like("a", "a")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(&app, like("a", "nobody")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_discover_excludes_swiped() {
        let state = create_state();
        seed(&state, "viewer", "Seattle");
        seed(&state, "x", "Seattle");
        seed(&state, "y", "Tacoma");
        state.tracker.swipe("viewer", "x", SwipeAction::Pass).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/discover")
            .set_json(serde_json::json!({ "viewerId": "viewer", "limit": 10 }))
            .to_request();
        let body: DiscoverResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.total_eligible, 1);
        assert_eq!(body.feed[0].profile.id, "y");
        assert!(!body.has_more);
    }

    #[actix_web::test]
    async fn test_compatibility_is_cached_per_revision() {
        let state = create_state();
        seed(&state, "a", "Seattle");
        seed(&state, "b", "Seattle");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let request = || {
            test::TestRequest::post()
                .uri("/api/v1/compatibility")
                .set_json(serde_json::json!({ "viewerId": "a", "candidateId": "b" }))
                .to_request()
        };

        let first: crate::models::CompatibilityBreakdown =
            test::call_and_read_body_json(&app, request()).await;
        let _: crate::models::CompatibilityBreakdown =
            test::call_and_read_body_json(&app, request()).await;
        assert_eq!(state.cache.stats().hit_count, 1);

        // A new revision of b is scored afresh
        seed(&state, "b", "Tacoma");
        let third: crate::models::CompatibilityBreakdown =
            test::call_and_read_body_json(&app, request()).await;
        assert_eq!(state.cache.stats().hit_count, 1);
        assert!(third.categories.location < first.categories.location);
    }

    #[actix_web::test]
    async fn test_malformed_json_gets_error_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .app_data(json_config())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/swipes")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: crate::models::ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "invalid_json");
    }
}
