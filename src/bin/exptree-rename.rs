use std::path::Path;
use std::process::ExitCode;

use clap::{ArgAction, Parser};

use exptree::rename;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "exptree-rename")]
#[command(version = VERSION)]
#[command(about = "Rewrite non-portable file and folder names under a root, bottom-up")]
struct Cli {
    /// Preview changes without renaming (pass --dry=false to apply)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    dry: bool,

    /// Folder whose tree should be sanitized
    folder_path: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("Dry run mode: {}", cli.dry);

    let root = cli
        .folder_path
        .strip_suffix(std::path::MAIN_SEPARATOR)
        .unwrap_or(&cli.folder_path);

    // An invalid folder prints a message and exits 0; only a missing
    // argument (handled by clap) exits non-zero.
    let report = match rename::run(Path::new(root), cli.dry) {
        Ok(report) => report,
        Err(e) => {
            println!("{}", e);
            return ExitCode::SUCCESS;
        }
    };

    for outcome in &report.outcomes {
        println!(
            "{} -> {}",
            outcome.old_path.display(),
            outcome.new_path.display()
        );
        if let Some(e) = &outcome.error {
            println!("  Rename failed: {}", e);
        }
    }

    let count = report.outcomes.len();
    if report.applied {
        if count > 0 {
            println!("Done. Renamed {} item(s).", count);
        } else {
            println!("Done. There is no item to be renamed.");
        }
    } else if count > 0 {
        println!("Dry run complete. {} item(s) would be renamed.", count);
        println!("Run again with --dry=false to rename them.");
    } else {
        println!("Dry run complete. There is no item to be renamed.");
    }

    ExitCode::SUCCESS
}
