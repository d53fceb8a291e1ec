use std::sync::LazyLock;

use regex::Regex;

use super::Field;

pub const DEFAULT_COMPLEXITY: &str = "O(N)";

// ASCII or full-width colon.
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Time complexity[:：]\s*(O\(.*?\))").unwrap());
static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Space complexity[:：]\s*(O\(.*?\))").unwrap());

pub fn extract_time(text: &str) -> Field {
    capture_big_o(&TIME_RE, text)
}

pub fn extract_space(text: &str) -> Field {
    capture_big_o(&SPACE_RE, text)
}

fn capture_big_o(re: &Regex, text: &str) -> Field {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| Field::found(m.as_str()))
        .unwrap_or_else(|| Field::default_to(DEFAULT_COMPLEXITY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_fullwidth_colons() {
        let text = "time complexity: O(N log N)\nSPACE COMPLEXITY：O(1)";
        assert_eq!(extract_time(text), Field::found("O(N log N)"));
        assert_eq!(extract_space(text), Field::found("O(1)"));
    }

    #[test]
    fn defaults_independently() {
        let text = "Space complexity: O(N^2)";
        assert_eq!(extract_time(text), Field::default_to(DEFAULT_COMPLEXITY));
        assert_eq!(extract_space(text), Field::found("O(N^2)"));
    }

    #[test]
    fn label_without_big_o_is_a_miss() {
        assert!(!extract_time("Time complexity: linear").matched);
    }
}
