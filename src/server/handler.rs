use axum::http::StatusCode;
use axum::{
    extract::{rejection::JsonRejection, Json, Query, State},
    response::IntoResponse,
};
use serde_json::Value;

use crate::features::category::{FACILITIES, HOURS, MONTHS, PRECIPITATION};
use crate::present::{detail_message, model_message, result_message};
use crate::server::app::AppState;
use crate::server::schema::{CalendarOptions, MonthCalendar, SelectionOptions};
use crate::{ParkingError, Selection};

fn error_response(e: &ParkingError) -> (StatusCode, Json<Value>) {
    let status = match e {
        ParkingError::UnknownLabel { .. } | ParkingError::InvalidDay(_) => StatusCode::BAD_REQUEST,
        ParkingError::ModelNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(serde_json::json!({"error": e.to_string(), "success": false})),
    )
}

pub async fn get_options() -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let labels = |map: &crate::features::CategoryMap| -> Vec<String> {
        map.labels().map(str::to_string).collect()
    };

    let options = SelectionOptions {
        months: labels(&MONTHS),
        days: (1..=31).map(|d| d.to_string()).collect(),
        hours: labels(&HOURS),
        facilities: labels(&FACILITIES),
        precipitation: labels(&PRECIPITATION),
    };

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"data": options, "success": true})),
    ))
}

pub async fn get_calendar(
    Query(opts): Query<CalendarOptions>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let calendar = state.predictor.encoder().calendar();
    let month = MONTHS.code(&opts.month).map_err(|e| error_response(&e))?;
    let num_days = calendar.days_in_month(month).unwrap_or(31);

    let data = MonthCalendar {
        year: calendar.year(),
        month: opts.month,
        days: (1..=num_days).map(|d| d.to_string()).collect(),
        holidays: calendar.holidays_in_month(month),
    };

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"data": data, "success": true})),
    ))
}

pub async fn create_prediction(
    State(state): State<AppState>,
    payload: Result<Json<Selection>, JsonRejection>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let Json(payload) = payload.map_err(|rejection| {
        log::warn!("Rejected prediction payload: {}", rejection.body_text());
        (
            rejection.status(),
            Json(serde_json::json!({"error": rejection.body_text(), "success": false})),
        )
    })?;
    let predictor = state.predictor.clone();
    // Model loading reads from disk
    let result = tokio::task::spawn_blocking(move || predictor.predict(&payload))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string(), "success": false})),
            )
        })?;

    match result {
        Ok(outcome) => Ok((
            StatusCode::OK,
            Json(serde_json::json!({
                "data": outcome,
                "message": result_message(&outcome),
                "detail": detail_message(&outcome),
                "model": model_message(&outcome),
                "success": true,
            })),
        )),
        Err(e) => {
            log::warn!("Prediction failed: {}", e);
            Err(error_response(&e))
        }
    }
}
