use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

#[derive(Args)]
pub struct DownArgs {
    /// Roll back from the tail through this ref (inclusive)
    pub ref_key: Option<String>,

    /// Roll back N alters from the tail (default 1)
    #[arg(short, long)]
    pub number: Option<usize>,

    /// Environment name used for require-env / skip-env gating
    #[arg(short, long)]
    pub env: Option<String>,
}

/// Print the ordered down SQL walking backwards from the chain tail.
/// Nothing is executed against a database; this is the rollback plan.
pub fn run(dir: &Path, args: &DownArgs) -> Result<()> {
    let chain = super::load_chain(dir)?;

    let ordered: Vec<_> = chain.iter().collect();
    let start = match &args.ref_key {
        Some(target) => ordered
            .iter()
            .position(|(key, _)| *key == target.as_str())
            .with_context(|| format!("ref '{target}' could not be found in the chain"))?,
        None => {
            let number = args.number.unwrap_or(1).min(ordered.len());
            ordered.len() - number
        }
    };

    for (key, group) in ordered[start..].iter().rev() {
        if !super::env_allows(group, args.env.as_deref()) {
            log::info!("skipping '{key}' (environment gating)");
            continue;
        }
        if let Some(alter) = group.down.as_ref() {
            super::print_sql(&alter.file)?;
        }
    }

    Ok(())
}
