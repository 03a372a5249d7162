use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Room left in the body limit for multipart framing and text fields
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.uploads.max_size() + MULTIPART_OVERHEAD;
    let uploads = ServeDir::new(state.uploads.root());

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .nest_service("/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Closet
        .route(
            "/closet",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route("/closet/upload", post(handlers::upload_item))
        .route("/closet/:item_id", delete(handlers::delete_item))
        .route("/closet/:item_id/wear", post(handlers::record_wear))
        // Outfits
        .route("/outfits", get(handlers::list_outfits))
        .route("/outfits/daily", get(handlers::daily_outfits))
        .route("/outfits/save", post(handlers::save_outfit))
        // Colors
        .route("/colors/analyze", post(handlers::analyze_colors))
        .route("/colors/compatibility", post(handlers::color_compatibility))
        // Shopping
        .route(
            "/shopping/recommendations",
            get(handlers::shopping_recommendations),
        )
        // Stylist chat
        .route("/chat/message", post(handlers::send_chat_message))
        .route("/chat/messages", get(handlers::chat_history))
        .route("/stats", get(handlers::user_stats))
}
