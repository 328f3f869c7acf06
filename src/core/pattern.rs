//! Inclusion pattern matching for the compressor.
//!
//! A case-insensitive glob matched against base filenames only (never full
//! paths). Compiled once at startup and passed by reference into the
//! planning and archiving code.

use std::path::Path;

use crate::error::{Error, Result};

/// Case-insensitive glob over base filenames.
///
/// Case-insensitivity is implemented by lowercasing both the pattern and the
/// candidate name before matching, so `*.RAW` and `*.raw` behave identically.
#[derive(Debug, Clone)]
pub struct IncludePattern {
    raw: String,
    compiled: glob::Pattern,
}

impl IncludePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let compiled =
            glob::Pattern::new(&pattern.to_lowercase()).map_err(|source| Error::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(IncludePattern {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// The pattern as given on the command line.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a base filename (not a path) against the pattern.
    pub fn matches_name(&self, name: &str) -> bool {
        self.compiled.matches(&name.to_lowercase())
    }

    /// Match the base name of `path`. Paths without a final component never match.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .map(|n| self.matches_name(&n.to_string_lossy()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn match_all_is_default_behavior() {
        let p = IncludePattern::new("*").unwrap();
        assert!(p.matches_name("anything.raw"));
        assert!(p.matches_name("no_extension"));
    }

    #[test]
    fn match_is_case_insensitive_both_ways() {
        let p = IncludePattern::new("*.RAW").unwrap();
        assert!(p.matches_name("sample.raw"));
        assert!(p.matches_name("SAMPLE.RAW"));
        assert!(!p.matches_name("sample.mzml"));

        let p = IncludePattern::new("*.raw").unwrap();
        assert!(p.matches_name("Sample.Raw"));
    }

    #[test]
    fn match_applies_to_base_name_only() {
        let p = IncludePattern::new("*.d").unwrap();
        assert!(p.matches_path(&PathBuf::from("/study/POS/run1.d")));
        // The directory part must not leak into the match.
        assert!(!p.matches_path(&PathBuf::from("/study.d/run1.raw")));
    }

    #[test]
    fn invalid_pattern_is_rejected_at_construction() {
        let err = IncludePattern::new("[").unwrap_err();
        assert_eq!(err.code(), "INVALID_PATTERN");
    }
}
