//! Name sanitization for the renamer.
//!
//! Portable names are restricted to `[0-9A-Za-z._-]`. `+` gets a readable
//! `_PLUS_` token; every other disallowed character becomes `__`.

use regex::Regex;

/// Replacement token for a single `+` character.
const PLUS_TOKEN: &str = "_PLUS_";

/// Replacement token for any other disallowed character.
const SUBST_TOKEN: &str = "__";

/// Allowed-name policy with the valid-name pattern compiled once.
#[derive(Debug, Clone)]
pub struct NamePolicy {
    valid_name: Regex,
}

impl NamePolicy {
    pub fn new() -> Self {
        NamePolicy {
            // Compile error is impossible for this literal pattern.
            valid_name: Regex::new(r"^[0-9A-Za-z._-]+$").expect("valid-name pattern"),
        }
    }

    /// A name needs no rename iff it matches `^[0-9A-Za-z._-]+$` and
    /// contains no `+`.
    pub fn is_valid(&self, name: &str) -> bool {
        self.valid_name.is_match(name) && !name.contains('+')
    }

    /// Rewrite `name` into the allowed character set.
    ///
    /// Each `+` becomes `_PLUS_`, then each remaining disallowed character
    /// becomes its own `__` token. Substitution is per character, never per
    /// run: `"a  b"` expands to `"a____b"`.
    pub fn sanitize(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for ch in name.chars() {
            if ch == '+' {
                out.push_str(PLUS_TOKEN);
            } else if is_allowed(ch) {
                out.push(ch);
            } else {
                out.push_str(SUBST_TOKEN);
            }
        }
        out
    }
}

impl Default for NamePolicy {
    fn default() -> Self {
        Self::new()
    }
}

fn is_allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-')
}

/// Split a sanitized name into (stem, extension) following the filesystem
/// extension convention: the extension runs from the last `.` (inclusive) to
/// the end, and is empty when the name has no dot. `".profile"` splits into
/// `("", ".profile")`.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}
