use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use exptree::archive::{self, FolderStatus};
use exptree::pattern::IncludePattern;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "exptree-compress")]
#[command(version = VERSION)]
#[command(about = "Archive each immediate subfolder into a per-folder zip, moving originals aside")]
struct Cli {
    /// Root folder containing the subfolders to archive
    folder_path: String,

    /// Glob pattern for files to include (e.g. *.d, *.raw, *)
    #[arg(long, default_value = "*")]
    include: String,

    /// Print each file added to an archive
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let root = cli
        .folder_path
        .strip_suffix(std::path::MAIN_SEPARATOR)
        .unwrap_or(&cli.folder_path);

    let pattern = match IncludePattern::new(&cli.include) {
        Ok(pattern) => pattern,
        Err(e) => {
            println!("{}", e);
            return ExitCode::SUCCESS;
        }
    };

    // Errors are printed, not signaled: the tool always exits 0.
    let report = match archive::run(Path::new(root), &pattern, cli.verbose) {
        Ok(report) => report,
        Err(e) => {
            println!("{}", e);
            return ExitCode::SUCCESS;
        }
    };

    let total = report.outcomes.len();
    if total == 0 {
        println!("No non-empty, visible folders found.");
        return ExitCode::SUCCESS;
    }

    println!("Found {} folders to process.", total);
    for (i, outcome) in report.outcomes.iter().enumerate() {
        let prefix = format!("[{}/{}] {}", i + 1, total, outcome.folder_name);
        match &outcome.status {
            FolderStatus::Archived => println!("{}: archived", prefix),
            FolderStatus::SkippedValidZip => println!("{}: valid zip exists, skipped", prefix),
            FolderStatus::ArchiveFailed(e) => println!("{}: error zipping: {}", prefix, e),
            FolderStatus::MoveFailed(e) => println!(
                "{}: archived, but failed to move to {}: {}",
                prefix,
                report.backup_dir.display(),
                e
            ),
        }
    }

    println!("All done.");
    ExitCode::SUCCESS
}
