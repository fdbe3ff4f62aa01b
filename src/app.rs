use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::record_handler;
use crate::routes;
use crate::state::AppState;

/// Build the service router.
///
/// Records are served from the fallback so that key extraction, not the
/// route table, decides what a path means. Docs routes, when enabled, shadow
/// the matching record keys.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new().fallback(record_handler);

    if state.config.docs_enabled {
        router = router
            .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
