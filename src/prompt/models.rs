//! Short model aliases accepted on the command line and from scripts.

/// Model used when an alias is not recognized.
pub const DEFAULT_MODEL: &str = "llama3.1";

const MODEL_ALIASES: [(&str, &str); 5] = [
    ("l", "llama3.1"),
    ("d", "deepseek-coder-v2"),
    ("c", "codestral"),
    ("s", "sqlcoder"),
    ("cl", "codellama"),
];

/// Map an alias to a full model identifier, falling back to [`DEFAULT_MODEL`].
pub fn resolve_model(alias: &str) -> &'static str {
    MODEL_ALIASES
        .iter()
        .find(|(short, _)| *short == alias)
        .map(|(_, model)| *model)
        .unwrap_or(DEFAULT_MODEL)
}
