// GET /health handler

use std::convert::Infallible;
use warp::http::StatusCode;

use super::json_response;
use crate::models::HealthResponse;

pub async fn health_handler() -> Result<warp::reply::Response, Infallible> {
    Ok(json_response(StatusCode::OK, &HealthResponse { ok: true }))
}
