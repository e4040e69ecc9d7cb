use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Args;

use schema_chain::DirectoryScanner;

use super::new;

#[derive(Args)]
pub struct InitArgs {
    /// Forcibly re-initialize, removing any existing alters
    #[arg(short, long)]
    pub force: bool,
}

/// Initialize a schema directory: create it if needed and seed it with a
/// root alter pair.
pub fn run(dir: &Path, args: &InitArgs) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("could not create directory '{}'", dir.display()))?;

    let scanner = DirectoryScanner::new();
    let existing: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("could not read directory '{}'", dir.display()))?
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| scanner.is_alter_file(name))
        })
        .map(|entry| entry.path())
        .collect();

    if !existing.is_empty() {
        ensure!(
            args.force,
            "directory '{}' already contains alters; pass --force to wipe and re-initialize",
            dir.display()
        );
        for file in existing {
            fs::remove_file(&file)
                .with_context(|| format!("failed to remove '{}'", file.display()))?;
        }
    }

    let (up, down) = new::create_pair(dir, "init", None)?;
    println!("Initialized schema directory {}", dir.display());
    println!("Created {}", up.display());
    println!("Created {}", down.display());
    Ok(())
}
