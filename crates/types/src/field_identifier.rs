//! Structured view over the `prefix-<index>-suffix` naming convention.
//!
//! Every field in a managed row carries its row ordinal inside its `id`,
//! `name` and `for` attributes, e.g. `id_item-3-title`. Instead of pattern
//! replacement on raw strings, the attribute is decomposed into
//! `(leading, prefix, index, suffix)` and re-rendered with a new index.

use std::{error::Error, fmt, str::FromStr};

/// Token used in place of a row ordinal inside template rows.
pub const PLACEHOLDER_TOKEN: &str = "__prefix__";

/// Position segment of a field identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormIndex {
    /// Zero-based ordinal of a live row.
    Position(usize),
    /// The `__prefix__` token used by templates.
    Placeholder,
}

impl FormIndex {
    /// Returns the ordinal when this is a live position.
    pub fn position(self) -> Option<usize> {
        match self {
            Self::Position(position) => Some(position),
            Self::Placeholder => None,
        }
    }

    pub fn is_placeholder(self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

impl From<usize> for FormIndex {
    fn from(position: usize) -> Self {
        Self::Position(position)
    }
}

impl fmt::Display for FormIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => write!(f, "{position}"),
            Self::Placeholder => f.write_str(PLACEHOLDER_TOKEN),
        }
    }
}

impl FromStr for FormIndex {
    type Err = ParseFormIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == PLACEHOLDER_TOKEN {
            return Ok(Self::Placeholder);
        }
        if s.is_empty() || !s.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(ParseFormIndexError);
        }
        s.parse::<usize>().map(Self::Position).map_err(|_| ParseFormIndexError)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFormIndexError;

impl fmt::Display for ParseFormIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a row ordinal or `{PLACEHOLDER_TOKEN}`")
    }
}

impl Error for ParseFormIndexError {}

/// A field attribute split around its embedded row index.
///
/// `leading` holds whatever precedes the prefix (Django ids start with
/// `id_`), `suffix` everything after the dash that follows the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIdentifier {
    leading: String,
    prefix: String,
    index: FormIndex,
    suffix: String,
}

impl FieldIdentifier {
    /// Builds an identifier with no leading text.
    pub fn new(prefix: impl Into<String>, index: impl Into<FormIndex>, suffix: impl Into<String>) -> Self {
        Self {
            leading: String::new(),
            prefix: prefix.into(),
            index: index.into(),
            suffix: suffix.into(),
        }
    }

    /// Locates the first `prefix-<digits|__prefix__>-` segment in `raw`.
    ///
    /// Returns `None` when the attribute does not follow the convention, in
    /// which case callers leave the attribute untouched.
    pub fn parse(raw: &str, prefix: &str) -> Option<Self> {
        let needle = format!("{prefix}-");
        for (start, _) in raw.char_indices() {
            let Some(after_prefix) = raw[start..].strip_prefix(needle.as_str()) else {
                continue;
            };
            let Some((index, consumed)) = split_index(after_prefix) else {
                continue;
            };
            let Some(suffix) = after_prefix[consumed..].strip_prefix('-') else {
                continue;
            };
            return Some(Self {
                leading: raw[..start].to_string(),
                prefix: prefix.to_string(),
                index,
                suffix: suffix.to_string(),
            });
        }
        None
    }

    pub fn leading(&self) -> &str {
        &self.leading
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn index(&self) -> FormIndex {
        self.index
    }

    /// Field name after the index, e.g. `title` in `item-0-title`.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns the same identifier pointing at another row.
    pub fn with_index(mut self, index: impl Into<FormIndex>) -> Self {
        self.index = index.into();
        self
    }
}

impl fmt::Display for FieldIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}-{}", self.leading, self.prefix, self.index, self.suffix)
    }
}

/// Rewrites the index embedded in `raw`, or returns `None` when `raw` has none.
pub fn rewrite_index(raw: &str, prefix: &str, index: FormIndex) -> Option<String> {
    FieldIdentifier::parse(raw, prefix).map(|identifier| identifier.with_index(index).to_string())
}

fn split_index(input: &str) -> Option<(FormIndex, usize)> {
    if input.starts_with(PLACEHOLDER_TOKEN) {
        return Some((FormIndex::Placeholder, PLACEHOLDER_TOKEN.len()));
    }
    let digit_count = input.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }
    // Ordinals too large for `usize` are still replaced; only the span matters.
    let position = input[..digit_count].parse::<usize>().unwrap_or(usize::MAX);
    Some((FormIndex::Position(position), digit_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_django_style_identifier() {
        let identifier = FieldIdentifier::parse("id_item-12-title", "item").expect("identifier");
        assert_eq!(identifier.leading(), "id_");
        assert_eq!(identifier.prefix(), "item");
        assert_eq!(identifier.index(), FormIndex::Position(12));
        assert_eq!(identifier.suffix(), "title");
    }

    #[test]
    fn parses_placeholder_index() {
        let identifier = FieldIdentifier::parse("item-__prefix__-DELETE", "item").expect("identifier");
        assert!(identifier.index().is_placeholder());
        assert_eq!(identifier.suffix(), "DELETE");
    }

    #[test]
    fn rewrite_keeps_surrounding_text() {
        assert_eq!(rewrite_index("id_item-0-price-amount", "item", FormIndex::Position(4)).as_deref(), Some("id_item-4-price-amount"));
        assert_eq!(rewrite_index("item-__prefix__-name", "item", FormIndex::Position(2)).as_deref(), Some("item-2-name"));
        assert_eq!(rewrite_index("item-7-name", "item", FormIndex::Placeholder).as_deref(), Some("item-__prefix__-name"));
    }

    #[test]
    fn only_first_segment_is_rewritten() {
        let rewritten = rewrite_index("item-1-item-1-nested", "item", FormIndex::Position(0));
        assert_eq!(rewritten.as_deref(), Some("item-0-item-1-nested"));
    }

    #[test]
    fn skips_segments_that_do_not_follow_the_convention() {
        assert_eq!(rewrite_index("item-x-item-3-name", "item", FormIndex::Position(0)).as_deref(), Some("item-x-item-0-name"));
        assert!(rewrite_index("item-TOTAL_FORMS", "item", FormIndex::Position(0)).is_none());
        assert!(rewrite_index("item-3", "item", FormIndex::Position(0)).is_none());
        assert!(rewrite_index("other-3-name", "item", FormIndex::Position(0)).is_none());
    }

    #[test]
    fn oversized_ordinals_are_still_rewritten() {
        let raw = "id_item-99999999999999999999999-title";
        assert_eq!(rewrite_index(raw, "item", FormIndex::Position(1)).as_deref(), Some("id_item-1-title"));
    }

    #[test]
    fn form_index_parses_and_displays() {
        assert_eq!("3".parse::<FormIndex>(), Ok(FormIndex::Position(3)));
        assert_eq!(PLACEHOLDER_TOKEN.parse::<FormIndex>(), Ok(FormIndex::Placeholder));
        assert!("-1".parse::<FormIndex>().is_err());
        assert!("".parse::<FormIndex>().is_err());
        assert_eq!(FormIndex::Position(9).to_string(), "9");
        assert_eq!(FieldIdentifier::new("form", 1usize, "email").to_string(), "form-1-email");
    }
}
