//! Check fact files for lines the loader would skip
//!
//! Usage: cargo run --bin factcheck -- <files-or-dirs...>

use animal_guess::load_report;
use anyhow::Result;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::ERROR)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <fact-files-or-dirs...>", args[0]);
        eprintln!("Example: {} animals.pl data/", args[0]);
        std::process::exit(1);
    }

    let mut total_files = 0;
    let mut total_skipped = 0;
    let mut unreadable = 0;

    for arg in &args[1..] {
        let root = PathBuf::from(arg);
        if !root.exists() {
            eprintln!("Warning: {} does not exist, skipping", arg);
            continue;
        }

        for path in fact_files(&root) {
            total_files += 1;
            match check_file(&path) {
                Ok(skipped) => total_skipped += skipped,
                Err(e) => {
                    unreadable += 1;
                    eprintln!("  ✗ {}: {}", path.display(), e);
                }
            }
        }
    }

    println!("\n========================================");
    println!("Checked {} file(s)", total_files);
    println!("  Skipped lines: {}", total_skipped);
    println!("  Unreadable:    {}", unreadable);
    println!("========================================");

    if unreadable > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Every `*.pl` file under `root` (or `root` itself if it is a file), sorted
fn fact_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("pl"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Parse one file and print its summary; returns the number of skipped lines
fn check_file(path: &Path) -> Result<usize> {
    let report = load_report(path)?;

    println!(
        "  ✓ {} ({} animals, {} facts)",
        path.display(),
        report.knowledge.len(),
        report.facts_applied
    );
    for skipped in &report.skipped {
        println!(
            "      line {}: {} ({})",
            skipped.line_number, skipped.text, skipped.reason
        );
    }

    Ok(report.skipped.len())
}
