//! Import command
//!
//! Usage: canonex import <PATH> [--no-seed]

use std::path::PathBuf;

use canonex_core::{CanonicalSeedPolicy, ExampleStore, FirstExamplePerIntent, NoSeeding};
use clap::Args;

use super::print_displacements;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to a .json, .yaml or .yml import file, or a directory of them
    pub path: PathBuf,

    /// Do not make the first example of each intent canonical
    #[arg(long)]
    pub no_seed: bool,
}

pub fn execute(store: &ExampleStore, args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let policy: &dyn CanonicalSeedPolicy = if args.no_seed {
        &NoSeeding
    } else {
        &FirstExamplePerIntent
    };

    let files = if args.path.is_dir() {
        // Sorted for determinism
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| matches!(ext, "json" | "yaml" | "yml"))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    for file in files {
        println!("Importing {}...", file.display());
        let report = canonex_store::import::import_file(store, &file, policy)?;
        print_displacements(&report.displaced);
        println!(
            "Imported {} examples ({} marked canonical, {} seeded, digest: {})",
            report.inserted.len(),
            report.marked.len(),
            report.seeded.len(),
            report.digest
        );
    }

    Ok(())
}
