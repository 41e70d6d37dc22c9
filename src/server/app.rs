use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::predict::Predictor;
use crate::server::handler::{create_prediction, get_calendar, get_options};

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/options", get(get_options))
        .route("/calendar", get(get_calendar))
        .route("/prediction", post(create_prediction))
        .with_state(app_state)
}
