use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for caption track tags
///
/// Caption tracks are keyed by tags such as `es`, `es-419` or `en-US`:
/// an ISO 639-1 (2-letter) or ISO 639-3 (3-letter) primary subtag followed
/// by optional region or variant subtags.

/// Return the lowercase primary subtag of a language tag (`es-419` -> `es`)
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Look up the ISO language of a tag's primary subtag
fn language_for_tag(tag: &str) -> Option<Language> {
    let primary = primary_subtag(tag);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    }
}

/// Check if a tag has a known primary language and well-formed subtags
pub fn is_valid_language_tag(tag: &str) -> bool {
    if language_for_tag(tag).is_none() {
        return false;
    }

    tag.trim()
        .split(['-', '_'])
        .skip(1)
        .all(|subtag| {
            (1..=8).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

/// Check if two tags name the same primary language (`es-ES` and `es-419` do)
pub fn same_primary_language(tag1: &str, tag2: &str) -> bool {
    match (language_for_tag(tag1), language_for_tag(tag2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name for a tag
pub fn get_language_name(tag: &str) -> Result<String> {
    let lang = language_for_tag(tag)
        .ok_or_else(|| anyhow!("Invalid language tag: {}", tag))?;

    Ok(lang.to_name().to_string())
}
