//! Extractors that report malformed input as `INVALID_ARGUMENT`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServerError;

/// JSON body extractor with the server's error body on rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor with the server's error body on rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub struct ApiQuery<T>(pub T);
