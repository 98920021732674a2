use axum::Router;
use std::sync::Arc;
use crate::AppContext;

pub mod record;
pub mod translate;

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .merge(record::record_router(ctx.clone()))
        .merge(translate::translate_router(ctx))
}
