//! Auth Routers

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserRole;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AllowedRoles, require_auth, restrict_to};

const ADMIN_ONLY: AllowedRoles = AllowedRoles(&[UserRole::Admin]);

/// Routes mounted at `/api/auth`
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/logout", post(handlers::sign_out::<R>))
        .route("/change-password", patch(handlers::change_password::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R>,
        ));

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::sign_in::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .merge(protected)
        .with_state(state)
}

/// Routes mounted at `/api/users`; every route requires authentication
pub fn users_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let admin = Router::new()
        .route("/", get(handlers::list_users::<R>))
        .route("/{id}", get(handlers::get_user::<R>))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, restrict_to));

    Router::new()
        .route(
            "/me",
            get(handlers::get_me::<R>)
                .patch(handlers::update_me::<R>)
                .delete(handlers::delete_me::<R>),
        )
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R>,
        ))
        .with_state(state)
}
