//! Lenient JSON body decoding
//!
//! Bodies are decoded regardless of `Content-Type`, and any decode failure
//! becomes a JSON 400 in the common error format.

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Decode a request body, reporting failures as a bad request
pub fn decode_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        let message = if e.is_data() {
            format!("Invalid JSON data: {}", e)
        } else {
            format!("Invalid JSON syntax: {}", e)
        };
        ApiError::bad_request(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Body {
        name: String,
    }

    #[test]
    fn test_decode_valid_body() {
        let body: Body = decode_json(&Bytes::from_static(br#"{"name":"a"}"#)).unwrap();
        assert_eq!(body.name, "a");
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_json::<Body>(&Bytes::from_static(b"{not json")).unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.response.message.starts_with("Invalid JSON syntax"));
    }

    #[test]
    fn test_decode_wrong_shape() {
        let err = decode_json::<Body>(&Bytes::from_static(br#"{"name":1}"#)).unwrap_err();

        assert!(err.response.message.starts_with("Invalid JSON data"));
    }

    #[test]
    fn test_decode_empty_body() {
        let err = decode_json::<Body>(&Bytes::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
