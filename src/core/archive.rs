//! Folder compressor — archive immediate subfolders into per-folder zips.
//!
//! Each non-hidden subfolder with at least one pattern-matching file anywhere
//! in its tree becomes `<name>.zip` beside it; on success the source folder
//! is moved into the sibling `<root>_original/` backup directory. Existing
//! archives are validated before being trusted, so an interrupted run can be
//! repeated safely.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::pattern::IncludePattern;

// ============================================================================
// Types
// ============================================================================

/// One planned archive job, built during enumeration and consumed once.
#[derive(Debug, Clone)]
pub struct ArchiveTask {
    /// 1-based position in the run, for progress reporting.
    pub index: usize,
    pub folder_name: String,
    pub subfolder: PathBuf,
    pub zip_path: PathBuf,
}

/// How a single folder ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderStatus {
    /// Archived and moved into the backup directory.
    Archived,
    /// A valid archive already existed; nothing was touched.
    SkippedValidZip,
    /// Archive creation failed; the folder was left in place.
    ArchiveFailed(String),
    /// Archive succeeded but the folder could not be moved aside.
    MoveFailed(String),
}

#[derive(Debug, Clone)]
pub struct FolderOutcome {
    pub folder_name: String,
    pub status: FolderStatus,
}

/// Result of a compressor run, in processing order.
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub backup_dir: PathBuf,
    pub outcomes: Vec<FolderOutcome>,
}

// ============================================================================
// Run
// ============================================================================

/// Archive every eligible immediate subfolder of `root`.
///
/// Root-level failures (unreadable root, backup directory creation) are
/// fatal; per-folder failures are recorded on their outcome and the run
/// continues with the next folder.
pub fn run(root: &Path, pattern: &IncludePattern, verbose: bool) -> Result<ArchiveReport> {
    if !root.is_dir() {
        return Err(Error::InvalidRoot(root.display().to_string()));
    }

    let entries = sorted_children(root)?;
    let backup_dir = backup_dir_for(root);
    fs::create_dir_all(&backup_dir)?;

    let tasks = plan_tasks(root, &entries, pattern);
    let total = tasks.len();

    let mut outcomes = Vec::with_capacity(total);
    for task in &tasks {
        log_status!(
            "compress",
            "[{}/{}] Checking: {}",
            task.index,
            total,
            task.folder_name
        );

        if task.zip_path.is_file() {
            if is_valid_zip(&task.zip_path) {
                // Note: no re-check whether the source subfolder was already
                // moved on a prior run. A manually restored subfolder is
                // neither re-archived nor re-moved.
                outcomes.push(FolderOutcome {
                    folder_name: task.folder_name.clone(),
                    status: FolderStatus::SkippedValidZip,
                });
                continue;
            }
            // One-shot recovery: drop the corrupt archive and redo it.
            let _ = fs::remove_file(&task.zip_path);
        }

        if let Err(e) = zip_folder(&task.subfolder, &task.zip_path, pattern, verbose) {
            outcomes.push(FolderOutcome {
                folder_name: task.folder_name.clone(),
                status: FolderStatus::ArchiveFailed(e.to_string()),
            });
            continue;
        }

        let status = match fs::rename(&task.subfolder, backup_dir.join(&task.folder_name)) {
            Ok(()) => FolderStatus::Archived,
            Err(e) => FolderStatus::MoveFailed(e.to_string()),
        };
        outcomes.push(FolderOutcome {
            folder_name: task.folder_name.clone(),
            status,
        });
    }

    Ok(ArchiveReport {
        backup_dir,
        outcomes,
    })
}

/// The sibling backup directory: `<root>` with `_original` appended.
pub fn backup_dir_for(root: &Path) -> PathBuf {
    let mut os = OsString::from(root.as_os_str());
    os.push("_original");
    PathBuf::from(os)
}

// ============================================================================
// Task planning
// ============================================================================

/// Build the task list: immediate subdirectories of `root`, skipping hidden
/// ones and ones whose tree contains no pattern-matching file. Emptiness is
/// decided once, here.
fn plan_tasks(root: &Path, entries: &[(PathBuf, bool)], pattern: &IncludePattern) -> Vec<ArchiveTask> {
    let mut tasks = Vec::new();

    for (path, is_dir) in entries {
        if !is_dir {
            continue;
        }
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        if is_hidden(&name) {
            continue;
        }
        if !has_matching_file(path, pattern) {
            continue;
        }

        tasks.push(ArchiveTask {
            index: tasks.len() + 1,
            folder_name: name.clone(),
            subfolder: path.clone(),
            zip_path: root.join(format!("{}.zip", name)),
        });
    }

    tasks
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// True when any file anywhere under `dir` matches the pattern. Early exit on
/// the first hit; unreadable directories count as empty.
fn has_matching_file(dir: &Path, pattern: &IncludePattern) -> bool {
    let Ok(children) = sorted_children(dir) else {
        return false;
    };

    for (path, is_dir) in children {
        if is_dir {
            if has_matching_file(&path, pattern) {
                return true;
            }
        } else if pattern.matches_path(&path) {
            return true;
        }
    }

    false
}

// ============================================================================
// Zip creation and validation
// ============================================================================

/// A zip is valid iff it opens and at least one contained entry opens for
/// reading. Zero-entry archives are invalid.
pub fn is_valid_zip(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let Ok(mut archive) = ZipArchive::new(file) else {
        return false;
    };

    for i in 0..archive.len() {
        if archive.by_index(i).is_ok() {
            return true;
        }
    }

    false
}

/// Write every pattern-matching file under `folder` into `zip_path`.
///
/// Entry paths are relative to `folder`'s parent, so the archive's contents
/// are prefixed with the folder's own name. On error a partial zip file may
/// remain; a later run classifies it as invalid and redoes it.
pub fn zip_folder(
    folder: &Path,
    zip_path: &Path,
    pattern: &IncludePattern,
    verbose: bool,
) -> Result<()> {
    let file = File::create(zip_path)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let base = folder.parent().unwrap_or(folder);
    add_dir(&mut writer, folder, base, pattern, options, verbose)?;

    writer.finish()?;
    Ok(())
}

fn add_dir(
    writer: &mut ZipWriter<File>,
    dir: &Path,
    base: &Path,
    pattern: &IncludePattern,
    options: FileOptions,
    verbose: bool,
) -> Result<()> {
    for (path, is_dir) in sorted_children(dir)? {
        if is_dir {
            add_dir(writer, &path, base, pattern, options, verbose)?;
            continue;
        }
        if !pattern.matches_path(&path) {
            continue;
        }

        let rel = path.strip_prefix(base).unwrap_or(&path);
        let entry_name = zip_entry_name(rel);
        if verbose {
            log_status!("compress", "+ {}", entry_name);
        }

        writer.start_file(entry_name, options)?;
        let mut source = File::open(&path)?;
        io::copy(&mut source, writer)?;
    }

    Ok(())
}

/// POSIX-style entry path regardless of the host separator.
fn zip_entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn sorted_children(dir: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let mut children: Vec<(PathBuf, bool)> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (entry.path(), is_dir)
        })
        .collect();
    children.sort();
    Ok(children)
}
