use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

#[derive(Args)]
pub struct UpArgs {
    /// Stop after this ref (defaults to the chain tail)
    pub ref_key: Option<String>,

    /// Plan at most N alters
    #[arg(short, long)]
    pub number: Option<usize>,

    /// Environment name used for require-env / skip-env gating
    #[arg(short, long)]
    pub env: Option<String>,
}

/// Print the ordered up SQL from the chain head through the given ref.
/// Nothing is executed against a database; this is the plan a DBA or a
/// wrapper script would apply.
pub fn run(dir: &Path, args: &UpArgs) -> Result<()> {
    let chain = super::load_chain(dir)?;

    let ordered: Vec<_> = chain.iter().collect();
    let end = match &args.ref_key {
        Some(target) => {
            ordered
                .iter()
                .position(|(key, _)| *key == target.as_str())
                .with_context(|| format!("ref '{target}' could not be found in the chain"))?
                + 1
        }
        None => ordered.len(),
    };
    let mut selected = &ordered[..end];
    if let Some(number) = args.number {
        selected = &selected[..number.min(selected.len())];
    }

    for (key, group) in selected {
        if !super::env_allows(group, args.env.as_deref()) {
            log::info!("skipping '{key}' (environment gating)");
            continue;
        }
        if let Some(alter) = group.up.as_ref() {
            super::print_sql(&alter.file)?;
        }
    }

    Ok(())
}
