//! Filename sanitizer — rewrite non-portable names across a directory tree.
//!
//! Candidates are collected in a single top-down walk (parents discovered
//! before children, each name evaluated against its current on-disk form),
//! then applied in reverse discovery order so renaming a directory never
//! invalidates the pending paths of its descendants. Dry-run mode reports the
//! full plan without touching the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sanitize::{split_extension, NamePolicy};

// ============================================================================
// Types
// ============================================================================

/// A planned rename, resolved against the pre-rename tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameCandidate {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

/// One applied (or previewed) rename.
#[derive(Debug, Clone)]
pub struct RenameOutcome {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    /// Populated when a live rename failed; the run continues regardless.
    pub error: Option<String>,
}

/// Result of a renamer run, in application (bottom-up) order.
#[derive(Debug, Clone)]
pub struct RenameReport {
    pub outcomes: Vec<RenameOutcome>,
    /// False for a dry run.
    pub applied: bool,
}

// ============================================================================
// Run
// ============================================================================

/// Sanitize every path component under `root` (never the root itself).
///
/// With `dry_run` the report lists every intended rename without mutating
/// anything. In live mode a failed rename is recorded on its outcome and the
/// remaining candidates are still processed.
pub fn run(root: &Path, dry_run: bool) -> Result<RenameReport> {
    if !root.is_dir() {
        return Err(Error::InvalidRoot(root.display().to_string()));
    }

    let policy = NamePolicy::new();
    let mut candidates = Vec::new();
    collect_candidates(root, &policy, &mut candidates);

    // Reverse discovery order: deepest entries first, so every rename's
    // parent directory path is still valid when it runs.
    let mut outcomes = Vec::with_capacity(candidates.len());
    for candidate in candidates.into_iter().rev() {
        let error = if dry_run {
            None
        } else {
            fs::rename(&candidate.old_path, &candidate.new_path)
                .err()
                .map(|e| e.to_string())
        };

        outcomes.push(RenameOutcome {
            old_path: candidate.old_path,
            new_path: candidate.new_path,
            error,
        });
    }

    Ok(RenameReport {
        outcomes,
        applied: !dry_run,
    })
}

// ============================================================================
// Candidate collection
// ============================================================================

fn collect_candidates(dir: &Path, policy: &NamePolicy, out: &mut Vec<RenameCandidate>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log_status!("rename", "Error reading {}: {}", dir.display(), e);
            return;
        }
    };

    // Sorted for a deterministic discovery (and therefore application) order.
    let mut children: Vec<(PathBuf, bool)> = entries
        .flatten()
        .map(|entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (entry.path(), is_dir)
        })
        .collect();
    children.sort();

    for (path, is_dir) in children {
        if let Some(candidate) = evaluate(&path, policy) {
            out.push(candidate);
        }
        if is_dir {
            collect_candidates(&path, policy, out);
        }
    }
}

/// Decide whether `path`'s final component needs a rename, and if so resolve
/// a collision-free target beside it.
fn evaluate(path: &Path, policy: &NamePolicy) -> Option<RenameCandidate> {
    let old_name = path.file_name()?.to_string_lossy().into_owned();

    if policy.is_valid(&old_name) {
        return None;
    }

    let sanitized = policy.sanitize(&old_name);
    if sanitized == old_name {
        return None;
    }

    let dir = path.parent()?;
    let (stem, ext) = split_extension(&sanitized);

    let mut new_path = dir.join(&sanitized);
    let mut suffix = 1;
    while new_path.exists() && new_path != path {
        new_path = dir.join(format!("{}_{}{}", stem, suffix, ext));
        suffix += 1;
    }

    Some(RenameCandidate {
        old_path: path.to_path_buf(),
        new_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn valid_tree_yields_no_candidates() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("good_dir")).unwrap();
        touch(&dir.path().join("good_dir").join("fine-01.raw"));

        let report = run(dir.path(), true).unwrap();
        assert!(report.outcomes.is_empty());
        assert!(!report.applied);
    }

    #[test]
    fn root_itself_is_never_renamed() {
        let parent = TempDir::new().unwrap();
        let root = parent.path().join("bad root");
        fs::create_dir(&root).unwrap();

        let report = run(&root, false).unwrap();
        assert!(report.outcomes.is_empty());
        assert!(root.exists());
    }

    #[test]
    fn live_run_renames_nested_invalid_names_bottom_up() {
        let dir = TempDir::new().unwrap();
        let bad_dir = dir.path().join("pos mode");
        fs::create_dir(&bad_dir).unwrap();
        touch(&bad_dir.join("run 1.raw"));

        let report = run(dir.path(), false).unwrap();
        assert!(report.applied);
        assert_eq!(report.outcomes.len(), 2);

        // Descendant applied strictly before its ancestor.
        assert_eq!(
            report.outcomes[0].old_path,
            bad_dir.join("run 1.raw"),
            "file must be renamed before its parent directory"
        );
        assert_eq!(report.outcomes[1].old_path, bad_dir);
        assert!(report.outcomes.iter().all(|o| o.error.is_none()));

        let renamed_dir = dir.path().join("pos__mode");
        assert!(renamed_dir.is_dir());
        assert!(renamed_dir.join("run__1.raw").is_file());
        assert!(!bad_dir.exists());
    }

    #[test]
    fn dry_run_reports_without_mutating() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a+b c.d"));

        let report = run(dir.path(), true).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert!(!report.applied);
        assert_eq!(
            report.outcomes[0].new_path,
            dir.path().join("a_PLUS_b__c.d")
        );
        assert!(dir.path().join("a+b c.d").exists());
        assert!(!dir.path().join("a_PLUS_b__c.d").exists());
    }

    #[test]
    fn collision_appends_numeric_suffix_before_extension() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a__b.txt"));
        touch(&dir.path().join("a b.txt"));

        let report = run(dir.path(), false).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].new_path, dir.path().join("a__b_1.txt"));
        assert!(dir.path().join("a__b.txt").is_file());
        assert!(dir.path().join("a__b_1.txt").is_file());
    }

    #[test]
    fn collision_suffix_increments_until_free() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("x__y"));
        touch(&dir.path().join("x__y_1"));
        touch(&dir.path().join("x y"));

        let report = run(dir.path(), false).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].new_path, dir.path().join("x__y_2"));
        assert!(dir.path().join("x__y_2").is_file());
    }

    #[test]
    fn resolved_path_never_overwrites_distinct_entry() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keep__me"), b"original").unwrap();
        touch(&dir.path().join("keep me"));

        run(dir.path(), false).unwrap();
        assert_eq!(fs::read(dir.path().join("keep__me")).unwrap(), b"original");
    }

    #[test]
    fn plus_names_are_candidates_even_when_otherwise_valid() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("ESI+.d"));

        let report = run(dir.path(), false).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert!(dir.path().join("ESI_PLUS_.d").is_file());
    }

    #[test]
    fn invalid_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = run(&missing, true).unwrap_err();
        assert_eq!(err.code(), "INVALID_ROOT");
    }
}
