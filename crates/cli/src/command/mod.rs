pub mod check;
pub mod down;
pub mod gen_ref;
pub mod gen_sql;
pub mod init;
pub mod new;
pub mod server;
pub mod up;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use schema_chain::{AlterGroup, Chain, LogSink};

/// Scan and validate the alter chain rooted at `dir`.
pub(crate) fn load_chain(dir: &Path) -> Result<Chain> {
    let mut sink = LogSink;
    Ok(schema_chain::load_chain(dir, &mut sink)?)
}

/// Whether a group may run in `env` given its gating sets.
///
/// A non-empty require-env set admits only its members (and nothing when no
/// environment was named); otherwise the skip-env set excludes its members.
pub(crate) fn env_allows(group: &AlterGroup, env: Option<&str>) -> bool {
    if !group.require_env.is_empty() {
        return env.is_some_and(|name| group.require_env.contains(name));
    }
    match env {
        Some(name) => !group.skip_env.contains(name),
        None => true,
    }
}

/// Print one alter file under a banner naming it. The metadata header lines
/// are valid SQL comments, so the output is directly runnable.
pub(crate) fn print_sql(path: &Path) -> Result<()> {
    let sql = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    println!("-- file: {}", path.display());
    print!("{sql}");
    if !sql.ends_with('\n') {
        println!();
    }
    Ok(())
}
