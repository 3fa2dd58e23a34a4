use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/alarms", get(handlers::list_alarms).post(handlers::create_alarm))
        .route(
            "/api/alarms/:id",
            get(handlers::get_alarm)
                .put(handlers::update_alarm)
                .delete(handlers::delete_alarm),
        )
        .route("/api/alarms/:id/restore", post(handlers::restore_alarm))
        .route("/api/alarms/:id/toggle", post(handlers::toggle_alarm))
        .route("/api/time", get(handlers::get_time))
        .route("/api/curves/preview", post(handlers::preview_curve))
        .route("/api/curves/evaluate", post(handlers::evaluate_curve))
        .route("/api/curves/kind", post(handlers::switch_curve_kind))
        .route("/api/curves/edit", post(handlers::edit_curve))
        .with_state(state)
}
