use serde::Deserialize;

use crate::{sanitize, AppResult, ChatError};

use super::{Kind, MessageFields, EVERYONE};

/// Body of a send or an edit. Every field is optional here so that a missing
/// one is reported by name instead of as a generic parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    pub to: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Checks fields in the order `to`, `text`, `type`, failing on the first bad one.
pub fn validate(body: &MessageBody) -> AppResult<MessageFields> {
    let to = sanitize::required("to", body.to.as_deref())?;
    let text = sanitize::required("text", body.text.as_deref())?;

    let kind = match body.kind.as_deref().map(str::trim) {
        None => return Err(ChatError::invalid("type", "is required")),
        Some("broadcast") => Kind::Broadcast,
        Some("private") => Kind::Private,
        Some(_) => return Err(ChatError::invalid("type", "must be broadcast or private")),
    };

    if kind == Kind::Private && to == EVERYONE {
        return Err(ChatError::invalid("to", "private messages need a single addressee"));
    }

    Ok(MessageFields { to, text, kind })
}
