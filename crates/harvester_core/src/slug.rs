use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

/// Replaces each run of non-alphanumeric characters.
pub const SEPARATOR: char = '_';

/// Turns free text into a filesystem-safe identifier.
///
/// Letters are stripped of diacritical marks and lowercased, and every run of
/// other characters becomes a single [`SEPARATOR`], except leading or trailing
/// runs. Marks, modifiers, control and format characters are dropped without
/// splitting words. An empty result means the text had nothing usable.
pub fn clean(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.nfkd() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            pending_separator = true;
        } else if is_ignorable(c) {
            // dropped
        } else if pending_separator {
            slug.push(SEPARATOR);
            pending_separator = false;
        }
    }

    if slug.ends_with(SEPARATOR) {
        slug.pop();
    }
    slug
}

fn is_ignorable(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::NonspacingMark
            | GeneralCategory::SpacingMark
            | GeneralCategory::EnclosingMark
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::ModifierLetter
            | GeneralCategory::Control
            | GeneralCategory::Format
    )
}
