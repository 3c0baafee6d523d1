// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{achievements, admin, auth, feedback, journey, preferences, session},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public: auth, journey browsing, the badge catalog.
/// * Signed in: sessions, achievements, preferences, feedback.
/// * Admin: journey and challenge authoring.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let journey_routes = Router::new()
        .route("/", get(journey::list_journeys))
        .route("/{id}", get(journey::get_journey));

    let session_routes = Router::new()
        .route("/", post(session::start_session))
        .route("/{id}", get(session::get_session))
        .route("/{id}/submit", post(session::submit_answer))
        .route("/{id}/advance", post(session::advance))
        .route("/{id}/reveal", post(session::reveal_answer))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let me_routes = Router::new()
        .route("/achievements", get(achievements::my_achievements))
        .route(
            "/preferences",
            get(preferences::get_preferences).put(preferences::update_preferences),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let feedback_routes = Router::new()
        .route("/", post(feedback::submit_feedback))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/journeys", post(admin::create_journey))
        .route("/challenges", post(admin::create_challenge))
        .route("/challenges/{id}", delete(admin::delete_challenge))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/journeys", journey_routes)
        .nest("/api/sessions", session_routes)
        .nest("/api/me", me_routes)
        .nest("/api/feedback", feedback_routes)
        .route("/api/badges", get(achievements::list_badges))
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, store::MemoryStore};

    fn app() -> Router {
        let config = Config {
            database_url: None,
            jwt_secret: "router_secret".to_string(),
            jwt_expiration: 60,
            rust_log: "error".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            auto_advance: false,
            admin_username: None,
            admin_password: None,
        };
        create_router(AppState::new(Arc::new(MemoryStore::new()), config))
    }

    #[tokio::test]
    async fn test_public_routes_need_no_token() {
        let response = app()
            .oneshot(Request::get("/api/badges").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_routes_need_a_token() {
        let response = app()
            .oneshot(
                Request::post("/api/sessions")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"journey_id":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
