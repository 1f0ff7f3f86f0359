use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_basic_auth;
use crate::handlers::{handle_edit, handle_home, handle_save, handle_static, handle_view};
use crate::types::AppState;

/// Assemble the route table.
///
/// Page routes sit behind Basic auth; the credential check runs before the
/// page id is validated, so unauthenticated requests never reach the store.
/// The bare `/view/`-style routes exist so an empty id is reported as a
/// validation error rather than falling through to a 404.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route("/view/", get(handle_view))
        .route("/view/*id", get(handle_view))
        .route("/edit/", get(handle_edit))
        .route("/edit/*id", get(handle_edit))
        .route("/save/", post(handle_save))
        .route("/save/*id", post(handle_save))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_basic_auth));

    Router::new()
        .route("/", get(handle_home))
        .route("/static/*path", get(handle_static))
        .merge(pages)
        .with_state(state)
}
