//! Ordered, duplicate-free tag sequences.

use serde::{Deserialize, Serialize};

/// The tags of an article: an ordered sequence with no duplicates.
///
/// Insertion preserves the order tags were added in; comparison is exact and
/// case-sensitive. Serialized transparently as a sequence of strings, with
/// duplicates dropped on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagList(Vec<String>);

impl TagList {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Trim `raw` and append it, unless the trimmed value is empty or already
    /// present. Returns whether the list changed.
    pub fn insert(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    /// Remove every tag equal to `name`. Since tags are unique this removes at
    /// most one element. Returns whether the list changed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|tag| tag != name);
        self.0.len() != before
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|existing| existing == tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<Vec<String>> for TagList {
    /// Deduplicate, preserving the first occurrence of each tag.
    fn from(tags: Vec<String>) -> Self {
        let mut list = Self::new();
        for tag in tags {
            list.insert(&tag);
        }
        list
    }
}

impl From<TagList> for Vec<String> {
    fn from(list: TagList) -> Self {
        list.0
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::TagList;

    fn list(tags: &[&str]) -> TagList {
        TagList::from(tags.iter().map(ToString::to_string).collect::<Vec<_>>())
    }

    #[test]
    fn insert_appends_and_preserves_order() {
        let mut tags = list(&["go"]);
        assert!(tags.insert("rust"));
        assert_eq!(tags.as_slice(), ["go", "rust"]);
    }

    #[test]
    fn insert_trims_whitespace() {
        let mut tags = TagList::new();
        assert!(tags.insert("  rust  "));
        assert_eq!(tags.as_slice(), ["rust"]);
    }

    #[test]
    fn insert_rejects_duplicates_after_trimming() {
        let mut tags = list(&["go"]);
        assert!(!tags.insert(" go "));
        assert_eq!(tags.as_slice(), ["go"]);
    }

    #[test]
    fn insert_rejects_whitespace_only_input() {
        let mut tags = list(&["go"]);
        assert!(!tags.insert("   "));
        assert!(!tags.insert(""));
        assert_eq!(tags.as_slice(), ["go"]);
    }

    #[test]
    fn duplicate_comparison_is_case_sensitive() {
        let mut tags = list(&["Go"]);
        assert!(tags.insert("go"));
        assert_eq!(tags.as_slice(), ["Go", "go"]);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut tags = list(&["go", "rust", "zig"]);
        assert!(tags.remove("rust"));
        assert_eq!(tags.as_slice(), ["go", "zig"]);
    }

    #[test]
    fn remove_missing_is_a_no_op() {
        let mut tags = list(&["go"]);
        assert!(!tags.remove("rust"));
        assert_eq!(tags.as_slice(), ["go"]);
    }

    #[test]
    fn from_vec_deduplicates_preserving_first_occurrence() {
        let tags = list(&["go", "rust", "go", "zig", "rust"]);
        assert_eq!(tags.as_slice(), ["go", "rust", "zig"]);
    }
}
