use scraper::Html;

use crate::{AppResult, ChatError};

/// Drops any markup and surrounding whitespace, keeping only the text.
pub fn clean(raw: &str) -> String {
    Html::parse_fragment(raw)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}

pub fn required(field: &'static str, raw: Option<&str>) -> AppResult<String> {
    let Some(raw) = raw else {
        return Err(ChatError::invalid(field, "is required"));
    };

    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return Err(ChatError::invalid(field, "must not be empty"));
    }

    Ok(cleaned)
}
