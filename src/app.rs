use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/water/add", post(handlers::water_add))
        .route("/water/sub", post(handlers::water_sub))
        .route("/challenge/today", post(handlers::challenge_today))
        .route("/challenge/clear", post(handlers::challenge_clear))
        .route("/api/today", get(handlers::get_today))
        .route("/api/board", get(handlers::get_board))
        .route("/api/history", get(handlers::get_history))
        .route("/api/rooms", get(handlers::get_rooms))
        .route("/api/tasks/toggle", post(handlers::toggle_task))
        .route("/api/water", post(handlers::adjust_water))
        .route("/api/notes", post(handlers::save_notes))
        .route("/api/board/move", post(handlers::move_card))
        .route("/api/challenge", post(handlers::set_challenge))
        .route("/api/mode", post(handlers::set_mode))
        .route("/api/layout", post(handlers::set_layout))
        .route("/api/profile", post(handlers::save_profile))
        .with_state(state)
}
