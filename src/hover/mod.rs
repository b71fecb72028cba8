//! Hover Detection Engine
//!
//! Classifies which page region sits under the pointer by running element
//! candidates through include/exclude selector sets, binds enter/leave
//! observation to every match, and feeds hover-target updates into the
//! state store.
//!
//! Three categories are checked independently: text (paragraphs, captions,
//! headings), small areas (inline links), and large areas (big clickable
//! containers). The default small and large sets exclude each other's
//! marker class, so an element maps to at most one category.

mod engine;

pub use engine::HoverEngine;

use serde::{Deserialize, Serialize};

use crate::platform::Element;

/// Include/exclude pattern pair describing one hover category.
///
/// Pattern strings are interpreted by the host; the set only owns the
/// combination logic, so classification stays host-agnostic and testable
/// without a live page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSet {
    /// Patterns any of which admits an element
    #[serde(default)]
    pub include: Vec<String>,
    /// Patterns any of which rejects an element
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl SelectorSet {
    /// Build a set from pattern literals.
    pub fn new(include: &[&str], exclude: &[&str]) -> Self {
        Self {
            include: include.iter().map(|s| (*s).to_string()).collect(),
            exclude: exclude.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Effective selection expression for hosts that query natively:
    /// every include pattern qualified by `:not()` of the excludes.
    pub fn compose(&self) -> String {
        if self.exclude.is_empty() {
            return self.include.join(",");
        }
        let not = self.exclude.join(",");
        self.include
            .iter()
            .map(|include| format!("{}:not({})", include, not))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Host-agnostic predicate: any include pattern matches and no exclude
    /// pattern does. Empty include lists match nothing.
    pub fn matches(&self, element: &dyn Element) -> bool {
        self.include
            .iter()
            .any(|pattern| element.matches_selector(pattern))
            && !self
                .exclude
                .iter()
                .any(|pattern| element.matches_selector(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use crate::platform::StylePatch;

    /// Element whose selector matching is a plain token lookup.
    struct FakeElement {
        tokens: Vec<&'static str>,
    }

    impl FakeElement {
        fn new(tokens: &[&'static str]) -> Self {
            Self {
                tokens: tokens.to_vec(),
            }
        }
    }

    impl Element for FakeElement {
        fn matches_selector(&self, pattern: &str) -> bool {
            self.tokens.contains(&pattern)
        }

        fn bounds(&self) -> Option<Rect> {
            None
        }

        fn is_visible(&self) -> bool {
            true
        }

        fn font_size(&self) -> f64 {
            16.0
        }

        fn set_inline(&self, _patch: &StylePatch) {}

        fn clear_inline(&self, _properties: &[&str]) {}
    }

    #[test]
    fn test_compose_without_excludes() {
        let set = SelectorSet::new(&["a", ".cta"], &[]);
        assert_eq!(set.compose(), "a,.cta");
    }

    #[test]
    fn test_compose_qualifies_every_include() {
        let set = SelectorSet::new(&["a", ".cta"], &[".big", ".plain"]);
        assert_eq!(set.compose(), "a:not(.big,.plain),.cta:not(.big,.plain)");
    }

    #[test]
    fn test_matches_requires_an_include() {
        let set = SelectorSet::new(&["a"], &[]);
        assert!(set.matches(&FakeElement::new(&["a"])));
        assert!(!set.matches(&FakeElement::new(&["p"])));
    }

    #[test]
    fn test_matches_rejects_on_any_exclude() {
        let set = SelectorSet::new(&["a"], &[".big"]);
        assert!(!set.matches(&FakeElement::new(&["a", ".big"])));
        assert!(set.matches(&FakeElement::new(&["a"])));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = SelectorSet::default();
        assert!(!set.matches(&FakeElement::new(&["a"])));
        assert_eq!(set.compose(), "");
    }
}
