use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub(crate) fn apply_limits(router: Router, body_limit_bytes: usize, concurrency: usize) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(ConcurrencyLimitLayer::new(concurrency))
}

pub(crate) fn apply_trace(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}
