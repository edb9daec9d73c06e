//! Name canonicalization for cross-source matching, and slug generation.
//!
//! Sources disagree on how they write the same person: AniList lists staff as
//! `Hajime Isayama`, MAL as `Isayama, Hajime`; accents and punctuation come and
//! go between the two. [`normalize`] reduces a name to a form where those
//! differences vanish, so creators and companies can be compared by plain
//! string equality.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonicalize a name for equality matching.
///
/// Steps, in order:
/// 1. `Last, First` becomes `First Last` (only with exactly two non-empty
///    comma-separated segments)
/// 2. locale-invariant lowercasing
/// 3. accent stripping (NFKD, combining marks dropped)
/// 4. punctuation and symbols removed, whitespace collapsed and trimmed
///
/// The result is idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use watchlist_catalog::normalize::normalize;
///
/// assert_eq!(normalize("Isayama, Hajime"), "hajime isayama");
/// assert_eq!(normalize("Hajime Isayama"), "hajime isayama");
/// assert_eq!(normalize("  Kōichi  Yamadera "), "koichi yamadera");
/// ```
pub fn normalize(name: &str) -> String {
    let reordered = reorder_last_first(name);
    let lowered = reordered.to_lowercase();
    let stripped = strip_diacritics(&lowered);
    collapse_whitespace(&erase_punctuation(&stripped))
}

/// Reorder a `Last, First` name to `First Last`.
///
/// Anything that is not exactly two non-empty comma-separated segments is
/// returned unchanged.
pub fn reorder_last_first(name: &str) -> String {
    let segments: Vec<&str> = name.split(',').collect();
    if segments.len() != 2 {
        return name.to_string();
    }
    let last = segments[0].trim();
    let first = segments[1].trim();
    if last.is_empty() || first.is_empty() {
        return name.to_string();
    }
    format!("{first} {last}")
}

/// Decompose and drop combining marks. Compatibility decomposition can surface
/// uppercase letters (`℡` → `TEL`), so the output is lowercased again.
fn strip_diacritics(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Drop everything that is neither alphanumeric nor whitespace.
fn erase_punctuation(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Generate a URL-safe slug.
///
/// Non-ASCII letters that do not decompose to ASCII are dropped, so a
/// Japanese-only name produces an empty slug; callers fall back to an id.
///
/// # Examples
///
/// ```
/// use watchlist_catalog::normalize::slugify;
///
/// assert_eq!(slugify("My Dress-Up Darling"), "my-dress-up-darling");
/// assert_eq!(slugify("Fate/Zero"), "fate-zero");
/// assert_eq!(slugify("Pokémon"), "pokemon");
/// ```
pub fn slugify(text: &str) -> String {
    let ascii: String = text.nfkd().filter(|c| c.is_ascii()).collect();
    let lowered = ascii.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for c in lowered.trim().chars() {
        let c = if c == '/' || c == '\\' { '-' } else { c };
        if c == '-' || c.is_ascii_whitespace() {
            pending_separator = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_requires_two_segments() {
        assert_eq!(reorder_last_first("Isayama, Hajime"), "Hajime Isayama");
        assert_eq!(reorder_last_first("Smith, Jr., John"), "Smith, Jr., John");
        assert_eq!(reorder_last_first("Madhouse"), "Madhouse");
        assert_eq!(reorder_last_first("Trigger,"), "Trigger,");
    }

    #[test]
    fn compatibility_forms_are_lowercased() {
        assert_eq!(strip_diacritics("℡"), "tel");
        assert_eq!(strip_diacritics("é"), "e");
    }
}
