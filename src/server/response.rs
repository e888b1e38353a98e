// src/server/response.rs
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Body, Response, StatusCode};
use serde::Serialize;
use tracing::error;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Serialize)]
struct ServerError {
    server_error: &'static str,
}

const SERVER_ERROR: ServerError = ServerError {
    server_error: "Could not parse error message",
};

/// Serializes `body` as JSON with the given status.
///
/// If `body` can't be encoded the response degrades to a fixed
/// `{"server_error": ...}` body with 500. If even that fails the response is
/// an empty 500.
pub fn json_response<T>(status: StatusCode, body: &T) -> Response<Body>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_vec(body) {
        Ok(payload) => json(status, payload),
        Err(e) => {
            error!("Error serializing health status: {}", e);
            server_error_response()
        }
    }
}

pub fn server_error_response() -> Response<Body> {
    match serde_json::to_vec(&SERVER_ERROR) {
        Ok(payload) => json(StatusCode::INTERNAL_SERVER_ERROR, payload),
        Err(e) => {
            error!("Error serializing health status failure message: {}", e);
            empty(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub fn not_found() -> Response<Body> {
    empty(StatusCode::NOT_FOUND)
}

fn json(status: StatusCode, payload: Vec<u8>) -> Response<Body> {
    let length = payload.len();
    let mut response = Response::new(Body::from(payload));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    response
}

fn empty(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}
