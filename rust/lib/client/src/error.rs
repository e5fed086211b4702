use serde::Deserialize;
use tradedesk_core::ServiceError;

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `code` is the server's error code, if it sent one.
    #[error("HTTP {status}: {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("auth: {0}")]
    Auth(String),

    #[error("decode: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl ApiError {
    /// Build a `Server` error from a failed response.
    pub(crate) async fn from_response(resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(e) => ApiError::Server {
                status,
                code: e.code,
                message: e.message,
            },
            Err(_) => ApiError::Server {
                status,
                code: String::new(),
                message: body,
            },
        }
    }
}

impl From<ApiError> for ServiceError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Server { status: 401, code, message } if code.is_empty() => {
                ServiceError::Unauthorized(message)
            }
            ApiError::Server { status: 404, code, message } if code.is_empty() => {
                ServiceError::NotFound(message)
            }
            ApiError::Server { code, message, .. } => ServiceError::from_code(&code, message),
            ApiError::Network(e) => ServiceError::Storage(format!("network: {}", e)),
            ApiError::Auth(msg) => ServiceError::Unauthorized(msg),
            ApiError::Decode(msg) => ServiceError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_code_maps_back() {
        let err = ApiError::Server {
            status: 404,
            code: "NOT_FOUND".into(),
            message: "Unit 'u1' not found".into(),
        };
        assert_eq!(ServiceError::from(err), ServiceError::NotFound("Unit 'u1' not found".into()));

        let err = ApiError::Server {
            status: 400,
            code: "VALIDATION_FAILED".into(),
            message: "Unit is required".into(),
        };
        assert_eq!(ServiceError::from(err), ServiceError::Validation("Unit is required".into()));
    }

    #[test]
    fn bare_status_falls_back() {
        let err = ApiError::Server { status: 404, code: String::new(), message: "".into() };
        assert!(ServiceError::from(err).is_not_found());

        let err = ApiError::Server { status: 502, code: String::new(), message: "bad gateway".into() };
        assert_eq!(ServiceError::from(err), ServiceError::Internal("bad gateway".into()));
    }

    #[test]
    fn auth_is_unauthorized() {
        let err = ServiceError::from(ApiError::Auth("not signed in".into()));
        assert_eq!(err.error_code(), "UNAUTHENTICATED");
    }
}
