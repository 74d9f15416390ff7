use std::sync::Arc;
use axum::{
    Extension, Router,
    extract::Request,
    http::{
        HeaderValue, Method,
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE},
    },
    response::IntoResponse,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use crate::{
    AppState,
    config::Config,
    error::HttpError,
    modules::comment::handler::comment_router,
};

async fn not_found(request: Request) -> impl IntoResponse {
    HttpError::<()>::not_found(
        format!("Route {} {} does not exist", request.method(), request.uri().path()),
        None,
    )
}
fn cors_layer(config: &Config) -> CorsLayer {
    let allow_origin = match &config.cors_allow_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.env);
    let api_route = Router::new()
        .merge(comment_router())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));
    Router::new().nest("/api", api_route)
        .fallback(not_found)
        .layer(cors)
        // CorsLayer only sends these on pre-flights; browsers get them on every answer.
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
}
