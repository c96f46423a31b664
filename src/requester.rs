use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{sanitize, ChatError};

pub const USER: &str = "user";

/// The name a request acts as, taken from the `User` header.
#[derive(Debug, Clone)]
pub struct Requester(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Requester {
    type Rejection = ChatError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = match parts.headers.get(USER) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| ChatError::invalid("user", "must be text"))?,
            ),
            None => None,
        };

        Ok(Requester(sanitize::required("user", raw)?))
    }
}
