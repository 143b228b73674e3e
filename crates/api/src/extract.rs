//! Request extractors that report rejections through [`AppError`].

use axum::extract::FromRequest;

use crate::error::AppError;

/// [`axum::Json`] whose rejections (wrong content type, malformed JSON,
/// mistyped fields) become a `{message, code}` 400 instead of axum's
/// plain-text 415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
