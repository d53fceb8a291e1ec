use std::sync::LazyLock;

use regex::Regex;

use super::Field;

pub const GENERAL_LOGIC: &str = "General Logic";

static PREREQ_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)## (?:Prerequisite knowledge|Prerequisites)\n+(.*?)\n+##").unwrap()
});

const BULLETS: &[char] = &['-', '*', '+'];

/// Section body between a prerequisites heading and the next `##` heading,
/// with list bullets removed.
pub fn extract(text: &str) -> Field {
    PREREQ_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| Field::found(strip_bullets(m.as_str())))
        .unwrap_or_else(|| Field::default_to(GENERAL_LOGIC))
}

/// Drops the bullet character of each list line, then trims the whole block.
/// Indentation after the bullet is kept: `"- a\n- b"` becomes `"a\n b"`.
fn strip_bullets(section: &str) -> String {
    section
        .lines()
        .map(|line| {
            let indent = line.len() - line.trim_start().len();
            let rest = &line[indent..];
            match rest.strip_prefix(BULLETS) {
                Some(after) => format!("{}{}", &line[..indent], after),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
