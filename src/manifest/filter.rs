use anyhow::{Context, Result};
use glob::Pattern;

/// Selects manifest paths for `check` and for filtered merges.
///
/// A pattern containing `*`, `?` or `[` is matched as a glob against the
/// whole repository-relative path; anything else matches as a substring.
#[derive(Debug, Clone)]
pub enum PathFilter {
    /// Glob matched against the full path (`*` also crosses `/`).
    Glob(Pattern),
    /// Plain substring of the path.
    Substring(String),
}

impl PathFilter {
    /// Builds a filter from a command-line pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern looks like a glob but does not parse.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.contains(['*', '?', '[']) {
            let glob =
                Pattern::new(pattern).with_context(|| format!("Invalid pattern: {pattern}"))?;
            Ok(Self::Glob(glob))
        } else {
            Ok(Self::Substring(pattern.to_string()))
        }
    }

    /// Whether `path` is selected.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Glob(glob) => glob.matches(path),
            Self::Substring(needle) => path.contains(needle.as_str()),
        }
    }
}

/// `true` when there is no filter or the filter selects `path`.
#[must_use]
pub fn selected(filter: Option<&PathFilter>, path: &str) -> bool {
    filter.is_none_or(|f| f.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("data", "data/x.bin", true)]
    #[case("x.b", "data/x.bin", true)]
    #[case("other", "data/x.bin", false)]
    #[case("*.bin", "data/x.bin", true)]
    #[case("*.iso", "data/x.bin", false)]
    #[case("data/?.bin", "data/x.bin", true)]
    #[case("[ab]*", "b/file", true)]
    #[case("[ab]*", "c/file", false)]
    fn test_matches(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
        let filter = PathFilter::new(pattern).unwrap();
        assert_eq!(filter.matches(path), expected);
    }

    #[test]
    fn test_invalid_glob() {
        assert!(PathFilter::new("[unclosed").is_err());
    }

    #[test]
    fn test_selected_without_filter() {
        assert!(selected(None, "anything"));
        let filter = PathFilter::new("a").unwrap();
        assert!(!selected(Some(&filter), "zzz"));
    }
}
