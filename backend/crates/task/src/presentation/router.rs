//! Task Router

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use auth::AuthAppState;
use auth::domain::repository::UserRepository;
use auth::middleware::require_auth;

use crate::domain::repository::TaskRepository;
use crate::presentation::handlers::{self, TaskAppState};

/// Routes mounted at `/api/tasks`; every route requires authentication
pub fn task_router<T, U>(state: TaskAppState<T>, auth: AuthAppState<U>) -> Router
where
    T: TaskRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_tasks::<T>).post(handlers::create_task::<T>),
        )
        // Static segments win over `/{id}`
        .route("/stats", get(handlers::task_stats::<T>))
        .route("/bulk", delete(handlers::bulk_delete_tasks::<T>))
        .route(
            "/{id}",
            get(handlers::get_task::<T>)
                .patch(handlers::update_task::<T>)
                .delete(handlers::delete_task::<T>),
        )
        .route_layer(middleware::from_fn_with_state(auth, require_auth::<U>))
        .with_state(state)
}
