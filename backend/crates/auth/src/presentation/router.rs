//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthStore;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_access_token;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
///
/// Mounts `/auth/*` for end users and `/user/{id}` lookups for other services.
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AuthStore,
{
    let state = AuthAppState::new(repo, config);

    let protected = Router::new()
        .route("/auth/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.issuer.clone(),
            require_access_token,
        ));

    Router::new()
        .route("/auth/signup", post(handlers::sign_up::<R>))
        .route("/auth/login", post(handlers::login::<R>))
        .route("/auth/refresh", get(handlers::refresh::<R>))
        .route("/auth/logout", post(handlers::logout::<R>))
        .route("/user/{id}", get(handlers::user_exists::<R>))
        .route("/user/{id}/role", get(handlers::user_role::<R>))
        .with_state(state)
        .merge(protected)
}
