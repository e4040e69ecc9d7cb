use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{ensure, Context, Result};
use clap::Args;

use schema_chain::{ChainError, ChainToolError, DirectoryScanner, Direction, LogSink};

use super::gen_ref;

#[derive(Args)]
pub struct NewArgs {
    /// Name of the new file (without direction suffix or extension)
    #[arg(short, long)]
    pub file: Option<String>,
}

/// Create a new alter pair at the end of the chain. The existing chain must
/// be valid since the new pair's backref points at the old tail; an
/// alter-less directory just means we are creating the root.
pub fn run(dir: &Path, args: &NewArgs) -> Result<()> {
    let name = args.file.as_deref().unwrap_or("alter");

    let mut sink = LogSink;
    let parent = match schema_chain::load_chain(dir, &mut sink) {
        Ok(chain) => Some(chain.tail_ref().to_string()),
        Err(ChainToolError::Chain(ChainError::Empty { .. })) => None,
        Err(err) => return Err(err.into()),
    };

    let (up, down) = create_pair(dir, name, parent.as_deref())?;
    println!("Created {}", up.display());
    println!("Created {}", down.display());
    Ok(())
}

/// Write an up/down pair sharing a fresh ref. Shared with `init`.
pub(crate) fn create_pair(
    dir: &Path,
    name: &str,
    parent: Option<&str>,
) -> Result<(PathBuf, PathBuf)> {
    let seq = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let ref_key = gen_ref::generate();
    let scanner = DirectoryScanner::new();

    let up = write_alter(dir, &scanner, seq, name, &ref_key, parent, Direction::Up)?;
    let down = write_alter(dir, &scanner, seq, name, &ref_key, parent, Direction::Down)?;
    Ok((up, down))
}

fn write_alter(
    dir: &Path,
    scanner: &DirectoryScanner,
    seq: u64,
    name: &str,
    ref_key: &str,
    parent: Option<&str>,
    direction: Direction,
) -> Result<PathBuf> {
    let file_name = format!("{seq}-{name}-{direction}.sql");
    // The scanner's own filter decides what qualifies; path separators can
    // never appear in a scanned name, so they are rejected here as well.
    ensure!(
        scanner.is_alter_file(&file_name) && !name.contains(['/', '\\']),
        "'{name}' does not produce a valid alter filename ('{file_name}')"
    );

    let path = dir.join(&file_name);
    ensure!(!path.exists(), "file '{}' already exists", path.display());

    let mut header = format!("-- ref: {ref_key}\n");
    if let Some(parent) = parent {
        header.push_str(&format!("-- backref: {parent}\n"));
    }
    header.push_str(&format!("-- direction: {direction}\n\n"));

    fs::write(&path, header).with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(path)
}
