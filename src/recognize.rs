//! Identifier and quantity recognition on token text

use once_cell::sync::Lazy;
use regex::Regex;

/// Tag grammar: 2-4 letters, 3-4 digits, `-` or `_`, 3-4 digits
pub(crate) const TAG_PATTERN: &str = r"[A-Za-z]{2,4}[0-9]{3,4}[-_][0-9]{3,4}";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(TAG_PATTERN).unwrap());

/// Longest digit string still considered a quantity. Longer all-digit
/// tokens are drawing numbers, part numbers or revisions.
pub const MAX_QUANTITY_DIGITS: usize = 3;

/// Find the first tag contained in `text` and return it in canonical form.
///
/// The search is unanchored so tags embedded in filenames
/// (`wpa1302_0101.dxf`) are still recognized.
pub fn recognize_tag(text: &str) -> Option<String> {
    TAG_RE.find(text).map(|m| canonicalize_tag(m.as_str()))
}

/// All non-overlapping tags in `text`, canonicalized, in order of appearance
pub fn find_tags(text: &str) -> impl Iterator<Item = String> + '_ {
    TAG_RE.find_iter(text).map(|m| canonicalize_tag(m.as_str()))
}

/// Uppercase and normalize the separator to `-`
pub fn canonicalize_tag(raw: &str) -> String {
    raw.to_ascii_uppercase().replace('_', "-")
}

/// Recognize a short all-digit token as a quantity (0-999)
pub fn recognize_quantity(text: &str) -> Option<u32> {
    if text.is_empty()
        || text.len() > MAX_QUANTITY_DIGITS
        || !text.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_tag() {
        assert_eq!(recognize_tag("WPA1302-0101"), Some("WPA1302-0101".into()));
        assert_eq!(recognize_tag("wpa1302_0101"), Some("WPA1302-0101".into()));
        assert_eq!(recognize_tag("Ab123-456"), Some("AB123-456".into()));
        assert_eq!(
            recognize_tag("10381-13-QRS4567_8901.dxf"),
            Some("QRS4567-8901".into())
        );
        assert_eq!(recognize_tag("A1234-5678"), None);
        assert_eq!(recognize_tag("ABC12-3456"), None);
        assert_eq!(recognize_tag("ABC1234.5678"), None);
        assert_eq!(recognize_tag("QTY"), None);
        assert_eq!(recognize_tag(""), None);
    }

    #[test]
    fn test_tag_output_shape() {
        let shape = Regex::new(r"^[A-Z]{2,4}[0-9]{3,4}-[0-9]{3,4}$").unwrap();
        for input in ["abc123_456", "XyZw9999-0000", "zz100_1000", "pre-AB123-456-post"] {
            let tag = recognize_tag(input).unwrap();
            assert!(shape.is_match(&tag), "bad shape: {tag}");
        }
    }

    #[test]
    fn test_find_tags() {
        let tags: Vec<String> = find_tags("ab123-456 and CD7890_1234").collect();
        assert_eq!(tags, vec!["AB123-456", "CD7890-1234"]);
    }

    #[test]
    fn test_recognize_quantity() {
        assert_eq!(recognize_quantity("0"), Some(0));
        assert_eq!(recognize_quantity("5"), Some(5));
        assert_eq!(recognize_quantity("042"), Some(42));
        assert_eq!(recognize_quantity("999"), Some(999));
        assert_eq!(recognize_quantity("1024"), None);
        assert_eq!(recognize_quantity(""), None);
        assert_eq!(recognize_quantity("5x"), None);
        assert_eq!(recognize_quantity("-5"), None);
        assert_eq!(recognize_quantity("٣"), None);
    }
}
