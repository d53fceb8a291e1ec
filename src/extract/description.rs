use std::sync::LazyLock;

use regex::Regex;

use super::Field;

pub const NO_DESCRIPTION: &str = "No description parsed";

static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Title description\n+```(.*?)```").unwrap());

/// Interior of the fenced block that follows the "Title description" marker.
pub fn extract(text: &str) -> Field {
    DESCRIPTION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| Field::found(m.as_str().trim()))
        .unwrap_or_else(|| Field::default_to(NO_DESCRIPTION))
}
