//! HTTP front end
//!
//! JSON endpoints over the shared predictor: option lists, per-month day
//! choices and predictions.

pub mod app;
pub mod handler;
pub mod schema;

use std::sync::Arc;

use crate::predict::Predictor;
use crate::{Config, Result};

pub use app::{create_router, AppState};

/// Serve the HTTP front end until the process is stopped
pub async fn serve(config: &Config, bind: &str) -> Result<()> {
    let state = AppState {
        predictor: Arc::new(Predictor::from_config(config)?),
    };

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
