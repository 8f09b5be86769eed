//! Request body extractor accepting JSON or URL-encoded forms.
//!
//! The front-end posts JSON, but a plain HTML form posts
//! `application/x-www-form-urlencoded`; both decode into the same type.
//! A request with no recognised body type decodes as `T::default()`, so
//! handlers report missing fields the same way they report empty ones.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Client-facing message for a body that could not be decoded.
pub const INVALID_BODY: &str = "Invalid request body.";

/// A decoded request body.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

/// The body declared a JSON or form content type but did not decode.
#[derive(Debug)]
pub struct PayloadRejection {
    detail: String,
}

impl PayloadRejection {
    /// Decoder error text, for logs only.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        AppError::BadRequest(INVALID_BODY.to_owned()).into_response()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Encoding {
    Json,
    Form,
    Other,
}

fn encoding(request: &Request) -> Encoding {
    let Some(content_type) = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return Encoding::Other;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/json" || essence.ends_with("+json") {
        Encoding::Json
    } else if essence == "application/x-www-form-urlencoded" {
        Encoding::Form
    } else {
        Encoding::Other
    }
}

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match encoding(&request) {
            Encoding::Json => Json::<T>::from_request(request, state)
                .await
                .map(|Json(value)| Self(value))
                .map_err(|e| PayloadRejection {
                    detail: e.body_text(),
                }),
            Encoding::Form => Form::<T>::from_request(request, state)
                .await
                .map(|Form(value)| Self(value))
                .map_err(|e| PayloadRejection {
                    detail: e.body_text(),
                }),
            Encoding::Other => Ok(Self(T::default())),
        }
    }
}
