use std::sync::LazyLock;

use regex::Regex;

use super::Field;
use crate::normalize::last_segment;

static SUM_OF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Sum of (.*?)\)").unwrap());

/// `... Sum of <title>)` or the last path segment of `source`.
pub fn extract(text: &str, source: &str) -> Field {
    SUM_OF_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| Field::found(m.as_str()))
        .unwrap_or_else(|| Field::default_to(last_segment(source)))
}
