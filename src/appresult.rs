use axum::{extract::rejection::JsonRejection, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

pub type AppResult<T> = Result<T, ChatError>;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid {field}: {reason}")]
    ValidationFailed {
        field: &'static str,
        reason: &'static str,
    },

    #[error("name {0} already in use")]
    NameTaken(String),

    #[error("{0} is not in the room")]
    UnknownSender(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{requester} may not modify message {id}")]
    Forbidden { requester: String, id: String },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

impl From<JsonRejection> for ChatError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected body: {}", rejection.body_text());
        Self::invalid("body", "must be a JSON object with the expected fields")
    }
}

impl ChatError {
    pub fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::ValidationFailed { field, reason }
    }

    pub fn kind(&self) -> &'static str {
        use ChatError::*;
        match self {
            ValidationFailed { .. } => "validation_failed",
            NameTaken(_) => "name_taken",
            UnknownSender(_) => "unknown_sender",
            NotFound(_) => "not_found",
            Forbidden { .. } => "forbidden",
            StoreUnavailable(_) => "store_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        use ChatError::*;
        match self {
            ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            NameTaken(_) => StatusCode::CONFLICT,
            UnknownSender(_) | NotFound(_) => StatusCode::NOT_FOUND,
            Forbidden { .. } => StatusCode::FORBIDDEN,
            StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        if let ChatError::StoreUnavailable(err) = &self {
            tracing::error!("store failure: {err}");
        }

        let body = Json(json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_unknown_sender_share_status_but_not_kind() {
        let missing = ChatError::NotFound("message 1".to_owned());
        let stranger = ChatError::UnknownSender("bob".to_owned());

        assert_eq!(missing.status(), stranger.status());
        assert_ne!(missing.kind(), stranger.kind());
    }

    #[test]
    fn validation_message_names_the_field() {
        let err = ChatError::invalid("to", "must not be empty");
        assert_eq!(err.to_string(), "invalid to: must not be empty");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn forbidden_is_distinct_from_not_found() {
        let err = ChatError::Forbidden { requester: "bob".to_owned(), id: "x".to_owned() };
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.kind(), "forbidden");
    }
}
