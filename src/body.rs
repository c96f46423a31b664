use axum::extract::FromRequest;

use crate::ChatError;

/// `axum::Json`, rejecting malformed bodies as a `ChatError` so clients get
/// the usual JSON error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ChatError))]
pub struct JsonBody<T>(pub T);
