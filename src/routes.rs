use std::time::Duration;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::AppState;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn create_router(state: AppState) -> Router {
    // Credential endpoints share one per-IP window.
    let auth_limiter = RateLimiter::new(
        state.config.auth_rate_limit_per_minute,
        Duration::from_secs(60),
    );

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/forgot/:email", get(handlers::auth::forgot_password))
        .route(
            "/reset/:code",
            get(handlers::auth::email_by_reset_code).post(handlers::auth::password_reset_by_code),
        )
        .route("/reset", post(handlers::auth::password_reset))
        .route("/oauth2/:provider", post(handlers::auth::oauth2_login))
        .route_layer(middleware::from_fn_with_state(
            auth_limiter.clone(),
            rate_limit_middleware,
        ))
        // Authenticated; not rate limited.
        .route("/edit/password", put(handlers::auth::update_password));

    let registration_routes = Router::new()
        .route("/", post(handlers::registration::register))
        .route_layer(middleware::from_fn_with_state(
            auth_limiter,
            rate_limit_middleware,
        ))
        .route("/activate/:code", get(handlers::registration::activate));

    let user_routes = Router::new().route("/me", get(handlers::users::get_profile));

    let order_routes = Router::new()
        .route(
            "/",
            get(handlers::orders::get_user_orders).post(handlers::orders::post_order),
        )
        .route("/:order_id", get(handlers::orders::get_order_by_id))
        .route("/:order_id/items", get(handlers::orders::get_order_items))
        .route("/graphql", post(handlers::orders::graphql_user_orders));

    let perfume_routes = Router::new()
        .route("/", get(handlers::perfumes::get_all_perfumes))
        .route("/:id", get(handlers::perfumes::get_perfume_by_id))
        .route("/search", post(handlers::perfumes::find_by_filter))
        .route("/search/gender", post(handlers::perfumes::find_by_gender))
        .route("/search/perfumer", post(handlers::perfumes::find_by_perfumer));

    let admin_routes = Router::new()
        .route("/orders", get(handlers::admin::get_all_orders))
        .route("/order/:email", get(handlers::admin::get_user_orders_by_email))
        .route("/order/delete/:order_id", delete(handlers::admin::delete_order))
        .route("/graphql/orders", post(handlers::admin::graphql_orders))
        .route("/graphql/user/orders", post(handlers::admin::graphql_orders))
        .route("/perfumes", post(handlers::admin::add_perfume));

    let cors = cors_layer(&state.config.allowed_origins());

    Router::new()
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/registration", registration_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/orders", order_routes)
        .nest("/api/v1/perfumes", perfume_routes)
        .nest("/api/v1/admin", admin_routes)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "ok"
}
