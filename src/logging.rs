//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};
use serde_json::Value;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged at the `debug` level.
///
/// Password fields in JSON request bodies are redacted before logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_text) = extract_header_and_body_text_from_request(request).await;

    if headers.method.eq(&axum::http::Method::POST)
        && headers
            .headers
            .get(CONTENT_TYPE)
            .and_then(|content_type| content_type.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("application/json"))
    {
        let display_text = redact_password(&body_text, "password");
        log_request(&headers, &display_text);
    } else {
        log_request(&headers, &body_text);
    }

    let request = Request::from_parts(headers, body_text.into());
    let response = next.run(request).await;

    let (headers, body_text) = extract_header_and_body_text_from_response(response).await;
    log_response(&headers, &body_text);

    Response::from_parts(headers, body_text.into())
}

fn redact_password(body_text: &str, field_name: &str) -> String {
    let mut body: Value = match serde_json::from_str(body_text) {
        Ok(body) => body,
        Err(_) => return body_text.to_string(),
    };

    if let Some(field) = body.get_mut(field_name) {
        *field = Value::String("********".to_string());
    }

    body.to_string()
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (headers, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Cut `body` down to at most `limit` bytes without splitting a multi-byte
/// character, which would panic when slicing.
fn truncate_to_char_boundary(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body;
    }

    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {headers:#?}\nbody: {:}...",
            truncate_to_char_boundary(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {headers:#?}\nbody: {:}...",
            truncate_to_char_boundary(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod truncate_tests {
    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;

    use crate::logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware, truncate_to_char_boundary};

    #[test]
    fn truncates_before_a_multi_byte_character_on_the_boundary() {
        // The two-byte 'é' starts one byte before the limit.
        let body = format!("{}é and more", "a".repeat(LOG_BODY_LENGTH_LIMIT - 1));

        let truncated = truncate_to_char_boundary(&body, LOG_BODY_LENGTH_LIMIT);

        assert_eq!(truncated, "a".repeat(LOG_BODY_LENGTH_LIMIT - 1));
    }

    #[test]
    fn leaves_short_bodies_unchanged() {
        let body = "a short body";

        assert_eq!(truncate_to_char_boundary(body, LOG_BODY_LENGTH_LIMIT), body);
    }

    #[tokio::test]
    async fn logs_long_multi_byte_body_without_panicking() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);
        let body = format!("{}é and a tail past the limit", "a".repeat(LOG_BODY_LENGTH_LIMIT - 1));

        let response = server.post("/echo").text(body.clone()).await;

        response.assert_status_ok();
        response.assert_text(&body);
    }
}
