use std::path::Path;

use anyhow::Result;

use schema_chain::LogSink;

/// Determine whether the local alter chain is well formed: a single root
/// exists, every non-root group has a resolvable parent, every parent has
/// one child. Other commands run these checks implicitly; this one exposes
/// them for scripts and manual testing.
pub fn run(dir: &Path) -> Result<()> {
    let mut sink = LogSink;
    if let Err(err) = schema_chain::load_chain(dir, &mut sink) {
        eprintln!("{err}");
        std::process::exit(1);
    }

    println!("Everything looks good!");
    Ok(())
}
