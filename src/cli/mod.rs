pub mod add;
pub mod export;
pub mod prompt;

/// Split comma-separated input into trimmed tags, dropping empty pieces.
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
