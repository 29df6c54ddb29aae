//! Request extractors whose rejections are reported as [`AppError`].
//!
//! Axum's stock `Json`, `Path` and `Query` reject with plain-text bodies.
//! These wrappers run the stock extractor and convert its rejection so every
//! failure reaches the client in the standard JSON error shape.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use releasetracker_core::types::ReleaseId;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

/// Query string parameters.
#[derive(Debug)]
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(AppQuery(value))
    }
}

/// The `{id}` path segment of a release route, parsed as a UUID.
///
/// The raw segment is echoed back in the error message when it does not parse.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseIdPath(pub ReleaseId);

impl<S> FromRequestParts<S> for ReleaseIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;

        raw.parse::<ReleaseId>().map(ReleaseIdPath).map_err(|_| {
            AppError::bad_request("Invalid parameter", format!("Invalid UUID format: {raw}"))
        })
    }
}
