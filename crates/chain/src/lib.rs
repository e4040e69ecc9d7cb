//! # Schema Chain
//!
//! Reconstructs a single, validated, linear history of database schema
//! changes ("alters") from a directory of paired up/down SQL files.
//!
//! ## Architecture
//!
//! ```text
//! schema directory
//!     │
//!     ├──> Directory Scanner (filename filter, top level only)
//!     │      ├─ Header Reader (leading `--` comment block, capped)
//!     │      ├─ Metadata Parser (`-- key: value` entries)
//!     │      └─ group alters by ref into up/down pairs
//!     │
//!     └──> Chain Builder
//!            ├─ Pass A: per-group pair/backref/env consistency
//!            ├─ Pass B: link groups via backrefs, reject divergence
//!            └─ locate the unique head and tail, reject cycles
//! ```
//!
//! Scanning and validation are deliberately separate: the scanner returns a
//! "soft" chain that may be topologically broken, so callers can inspect the
//! partial structure for diagnostics before the builder rejects it.

mod builder;
mod error;
mod header;
mod meta;
mod scanner;
mod types;
mod warn;

pub use builder::ChainBuilder;
pub use error::{ChainError, ChainToolError, DuplicateRefError, MetadataError, Result};
pub use header::{HeaderReader, MAX_HEADER_LINES};
pub use meta::MetadataParser;
pub use scanner::DirectoryScanner;
pub use types::{Alter, AlterGroup, Chain, ChainIter, Direction};
pub use warn::{LogSink, WarningSink};

use std::path::Path;

/// Scan `dir` and validate the result into a [`Chain`] in one step.
///
/// Equivalent to [`DirectoryScanner::scan`] followed by
/// [`ChainBuilder::build`].
pub fn load_chain(dir: &Path, warnings: &mut dyn WarningSink) -> Result<Chain> {
    let groups = DirectoryScanner::new().scan(dir, warnings)?;
    let chain = ChainBuilder::default().build(groups)?;
    Ok(chain)
}
