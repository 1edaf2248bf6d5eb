use axum::{extract::State, routing::get, Json, Router};

use crate::cache::CacheStats;
use crate::state::SharedState;

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/admin/cache/stats", get(cache_stats))
        .with_state(state)
}

/// Read-only snapshot; expired entries are swept by inserts, not here.
async fn cache_stats(State(state): State<SharedState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
