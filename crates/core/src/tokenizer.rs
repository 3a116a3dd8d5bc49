//! Query tokenizer.
//!
//! A token is a maximal run of ASCII lowercase letters and digits found after
//! lowercasing the input. Every other character is a separator.

/// Split `text` into lowercase alphanumeric tokens, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
