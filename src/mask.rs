use anyhow::{Context, Result};
use regex::{NoExpand, RegexBuilder};

/// Replaces the definition's mentions of the phrase.
pub const ELLIPSIS: &str = "...";
/// Stands in for the phrase in the masked example sentence.
pub const PLACEHOLDER: &str = " [...] ";

/// Case-insensitive, non-overlapping replace-all of `needle` in `haystack`.
pub fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> Result<String> {
    if needle.is_empty() {
        return Ok(haystack.to_string());
    }
    let re = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .with_context(|| format!("Cannot build a matcher for \"{needle}\""))?;
    Ok(re.replace_all(haystack, NoExpand(replacement)).into_owned())
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Replaces every occurrence of `phrase` with `marker` so the result no
/// longer contains the phrase.
///
/// A marker that itself contains the phrase (`..` inside `...`) is dropped,
/// and occurrences formed across a replacement boundary are removed until
/// none are left.
fn mask_with(text: &str, phrase: &str, marker: &str) -> Result<String> {
    let marker = if contains_ignore_case(marker, phrase) {
        ""
    } else {
        marker
    };

    let mut masked = replace_ignore_case(text, phrase, marker)?;
    while contains_ignore_case(&masked, phrase) {
        let shorter = replace_ignore_case(&masked, phrase, "")?;
        if shorter == masked {
            break;
        }
        masked = shorter;
    }
    Ok(masked)
}

pub fn mask_definition(definition: &str, phrase: &str) -> Result<String> {
    mask_with(definition, phrase, ELLIPSIS)
}

/// The model is asked to mask the phrase itself; this catches what it missed.
pub fn mask_help(help: &str, phrase: &str) -> Result<String> {
    if contains_ignore_case(help, phrase) {
        mask_with(help, phrase, PLACEHOLDER)
    } else {
        Ok(help.to_string())
    }
}
