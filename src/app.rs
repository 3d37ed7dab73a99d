use crate::handlers;
use crate::state::AppState;
use crate::store::OrderStore;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router<S: OrderStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(handlers::index::<S>))
        .route(
            "/api/products",
            get(handlers::get_products::<S>).post(handlers::add_product::<S>),
        )
        .route("/api/products/:name", delete(handlers::delete_product::<S>))
        .route("/api/selection", post(handlers::select_product::<S>))
        .route(
            "/api/day",
            get(handlers::get_day::<S>).post(handlers::save_day::<S>),
        )
        .route(
            "/api/stats",
            get(handlers::get_stats::<S>).delete(handlers::reset_stats::<S>),
        )
        .route(
            "/api/stats/products",
            get(handlers::get_historical_products::<S>),
        )
        .route("/api/notifications", get(handlers::get_notifications::<S>))
        .with_state(state)
}
