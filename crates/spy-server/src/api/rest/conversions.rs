//! Query parameter conversions

/// Split a comma-separated verb list, ignoring blanks
pub(super) fn split_verbs(verbs: Option<&str>) -> Vec<String> {
    verbs
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|verb| !verb.is_empty())
        .map(str::to_string)
        .collect()
}
