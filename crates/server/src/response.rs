// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Response envelope, error mapping, and JSON body extraction.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tablebook_api::ApiError;
use tracing::{error, warn};

/// Message returned for every 403. The refused action is only logged.
const FORBIDDEN_MESSAGE: &str = "Unauthorized access";

/// Message returned for every 500. Details are only logged.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// The body of every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// True on success.
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub const fn success(data: T) -> Self {
        Self {
            status: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            status: false,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

impl Envelope<()> {
    /// A success that carries only a message.
    pub fn done(message: &str) -> Self {
        Self {
            status: true,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

/// Result of a read or update handler.
pub type ApiResponse<T> = Result<Json<Envelope<T>>, HttpError>;

/// Result of a create handler, answered with 201.
pub type Created<T> = Result<(StatusCode, Json<Envelope<T>>), HttpError>;

pub const fn ok<T>(data: T) -> ApiResponse<T> {
    Ok(Json(Envelope::success(data)))
}

pub const fn created<T>(data: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(Envelope::success(data))))
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The client-facing message.
    pub message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(Envelope::<()>::failure(&self.message))).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { reason } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: reason,
            },
            ApiError::Unauthorized { action, reason } => {
                warn!(%action, %reason, "Access denied");
                Self {
                    status: StatusCode::FORBIDDEN,
                    message: FORBIDDEN_MESSAGE.to_string(),
                }
            }
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::InvalidInput { .. }
            | ApiError::DomainRuleViolation { .. }
            | ApiError::PasswordPolicyViolation { .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            ApiError::Internal { message } => {
                error!(error = %message, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: INTERNAL_MESSAGE.to_string(),
                }
            }
        }
    }
}

/// JSON body extractor that answers malformed bodies with 422 in the
/// response envelope.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "Rejected request body");
                Err(HttpError {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    message: rejection.body_text(),
                })
            }
        }
    }
}
