use std::path::Path;

use anyhow::{ensure, Result};
use clap::Args;

#[derive(Args)]
pub struct GenSqlArgs {
    /// Refs to generate SQL for (defaults to the whole chain)
    pub refs: Vec<String>,

    /// Generate SQL for down alters, in reverse chain order
    #[arg(long)]
    pub down: bool,
}

/// Emit the SQL of the selected alters in chain order. Mainly intended for
/// DBAs who want to run alters by hand.
pub fn run(dir: &Path, args: &GenSqlArgs) -> Result<()> {
    let chain = super::load_chain(dir)?;

    for ref_key in &args.refs {
        ensure!(
            chain.contains(ref_key),
            "ref '{ref_key}' could not be found in the chain"
        );
    }

    let mut ordered: Vec<_> = chain
        .iter()
        .filter(|(key, _)| args.refs.is_empty() || args.refs.iter().any(|r| r == *key))
        .collect();
    if args.down {
        ordered.reverse();
    }

    for (_, group) in ordered {
        let alter = if args.down {
            group.down.as_ref()
        } else {
            group.up.as_ref()
        };
        // A validated chain always carries both members.
        if let Some(alter) = alter {
            super::print_sql(&alter.file)?;
        }
    }

    Ok(())
}
