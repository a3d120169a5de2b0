//! Router composition

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use crate::{
    cats::handlers::{create_cat, delete_cat, list_cats, update_cat},
    filter::translate_errors,
    health::{health, readiness},
    repository::CatRepository,
    state::AppState,
};

/// All routes, with error translation applied, before the server's
/// middleware stack
pub fn build_router<R: CatRepository>(state: AppState<R>) -> Router {
    Router::new()
        .route("/cats", get(list_cats::<R>).post(create_cat::<R>))
        .route("/cats/{id}", patch(update_cat::<R>).delete(delete_cat::<R>))
        .route("/health", get(health::<R>))
        .route("/ready", get(readiness::<R>))
        .layer(middleware::from_fn(translate_errors))
        .with_state(state)
}
