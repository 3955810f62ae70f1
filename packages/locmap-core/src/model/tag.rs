//! Domain tags
//!
//! A tag is a dot-separated path of sibling indices from the root
//! (`"0.1.2"`). The root domain carries the empty tag. Tags encode depth
//! and ancestry without graph lookup: a domain's tag is always a strict
//! one-component extension of its parent's tag.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Position of a locality domain in the hierarchy, addressed from the root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DomainTag(String);

impl DomainTag {
    /// The root tag (empty path)
    pub fn root() -> Self {
        DomainTag(String::new())
    }

    pub fn new(tag: impl Into<String>) -> Self {
        DomainTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of path components (root = 0)
    pub fn depth(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.matches('.').count() + 1
        }
    }

    /// Extend this tag by one sibling index
    pub fn child(&self, sibling_index: usize) -> Self {
        if self.0.is_empty() {
            DomainTag(sibling_index.to_string())
        } else {
            DomainTag(format!("{}.{}", self.0, sibling_index))
        }
    }

    /// Tag of the parent domain, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        match self.0.rfind('.') {
            Some(i) => Some(DomainTag(self.0[..i].to_string())),
            None => Some(DomainTag::root()),
        }
    }

    /// Last path component, `None` for the root
    pub fn sibling_index(&self) -> Option<usize> {
        if self.0.is_empty() {
            return None;
        }
        let last = match self.0.rfind('.') {
            Some(i) => &self.0[i + 1..],
            None => &self.0,
        };
        last.parse().ok()
    }

    /// Component-wise prefix test (`"0.1"` is an ancestor of `"0.1.2"`
    /// but not of `"0.12"`); every tag is an ancestor-or-self of itself.
    pub fn is_ancestor_or_self_of(&self, other: &str) -> bool {
        if self.0.is_empty() {
            return true;
        }
        other == self.0
            || (other.starts_with(&self.0) && other.as_bytes().get(self.0.len()) == Some(&b'.'))
    }

    /// Longest common tag across the given tags, trimmed back to the last
    /// complete dot-separated component.
    ///
    /// A partial trailing component is never treated as a valid tag:
    /// the common character prefix of `"0.1"` and `"0.12"` is `"0.1"`,
    /// but their common tag is `"0"`. An empty input yields the root tag.
    pub fn common_prefix<'a, I>(tags: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tags: Vec<&str> = tags.into_iter().collect();
        let first = match tags.first() {
            Some(first) => *first,
            None => return DomainTag::root(),
        };

        let mut len = first.len();
        for tag in &tags[1..] {
            let mut common = 0;
            for (a, b) in first.chars().zip(tag.chars()) {
                if a != b {
                    break;
                }
                common += a.len_utf8();
            }
            len = len.min(common);
        }
        let lcp = &first[..len];

        // A prefix ending on a dot is complete up to that dot.
        if let Some(stripped) = lcp.strip_suffix('.') {
            return DomainTag(stripped.to_string());
        }
        // Otherwise the prefix is complete only if every tag ends exactly
        // here or continues with a component separator.
        let complete = tags
            .iter()
            .all(|t| t.len() == len || t.as_bytes()[len] == b'.');
        if complete {
            DomainTag(lcp.to_string())
        } else {
            match lcp.rfind('.') {
                Some(i) => DomainTag(lcp[..i].to_string()),
                None => DomainTag::root(),
            }
        }
    }
}

impl std::fmt::Display for DomainTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for DomainTag {
    fn from(tag: &str) -> Self {
        DomainTag(tag.to_string())
    }
}

impl From<String> for DomainTag {
    fn from(tag: String) -> Self {
        DomainTag(tag)
    }
}

impl Borrow<str> for DomainTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DomainTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DomainTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_and_parent() {
        let root = DomainTag::root();
        let node = root.child(1);
        let numa = node.child(0);

        assert_eq!(node.as_str(), "1");
        assert_eq!(numa.as_str(), "1.0");
        assert_eq!(numa.parent(), Some(node.clone()));
        assert_eq!(node.parent(), Some(root.clone()));
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn test_depth_and_sibling_index() {
        assert_eq!(DomainTag::root().depth(), 0);
        assert_eq!(DomainTag::new("0").depth(), 1);
        assert_eq!(DomainTag::new("0.1.2").depth(), 3);
        assert_eq!(DomainTag::new("0.1.2").sibling_index(), Some(2));
        assert_eq!(DomainTag::root().sibling_index(), None);
    }

    #[test]
    fn test_ancestor_or_self() {
        let tag = DomainTag::new("0.1");
        assert!(tag.is_ancestor_or_self_of("0.1"));
        assert!(tag.is_ancestor_or_self_of("0.1.2"));
        assert!(!tag.is_ancestor_or_self_of("0.12"));
        assert!(!tag.is_ancestor_or_self_of("0"));
        assert!(DomainTag::root().is_ancestor_or_self_of("3.4.5"));
    }

    #[test]
    fn test_common_prefix_siblings() {
        let lca = DomainTag::common_prefix(["0.0.0", "0.0.1"]);
        assert_eq!(lca.as_str(), "0.0");
    }

    #[test]
    fn test_common_prefix_disjoint() {
        let lca = DomainTag::common_prefix(["0.0.0", "1.1.1"]);
        assert!(lca.is_root());
    }

    #[test]
    fn test_common_prefix_partial_component() {
        // "0.1" is a character prefix of "0.12" but not a tag prefix
        let lca = DomainTag::common_prefix(["0.1", "0.12"]);
        assert_eq!(lca.as_str(), "0");
    }

    #[test]
    fn test_common_prefix_nested() {
        let lca = DomainTag::common_prefix(["0.1", "0.1.2", "0.1.3"]);
        assert_eq!(lca.as_str(), "0.1");
    }

    #[test]
    fn test_common_prefix_single_and_empty() {
        assert_eq!(DomainTag::common_prefix(["0.1.2"]).as_str(), "0.1.2");
        assert!(DomainTag::common_prefix([]).is_root());
        assert!(DomainTag::common_prefix(["", "0"]).is_root());
    }
}
