use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{ChainError, DuplicateRefError, MetadataError, Result};
use crate::header::HeaderReader;
use crate::meta::MetadataParser;
use crate::types::{AlterGroup, Direction};
use crate::warn::WarningSink;

/// Scans a schema directory into ref-keyed alter groups.
///
/// The returned groups are unvalidated aside from per-file metadata parsing;
/// a chain that parses but is topologically broken (missing pair member,
/// dangling backref, cycle) is still returned here so callers can inspect
/// the partial structure. Run [`crate::ChainBuilder`] for the full checks.
pub struct DirectoryScanner {
    filename: Regex,
    header: HeaderReader,
    parser: MetadataParser,
}

impl DirectoryScanner {
    pub fn new() -> Self {
        Self {
            // Leading digits give a human-sortable ordering hint; the
            // authoritative order comes from the chain links.
            filename: Regex::new(r"^\d+(-[^-]+)+-(up|down)\.sql$").expect("alter filename pattern"),
            header: HeaderReader,
            parser: MetadataParser::new(),
        }
    }

    /// Whether `name` conforms to the alter filename convention.
    pub fn is_alter_file(&self, name: &str) -> bool {
        self.filename.is_match(name)
    }

    /// Scan the top level of `dir`, returning a map from ref to group.
    ///
    /// Subdirectories are skipped without error. Entries are visited in
    /// filename order so any error raised is stable across runs.
    pub fn scan(
        &self,
        dir: &Path,
        warnings: &mut dyn WarningSink,
    ) -> Result<BTreeMap<String, AlterGroup>> {
        if !dir.is_dir() {
            return Err(ChainError::NotADirectory {
                path: dir.to_path_buf(),
            }
            .into());
        }

        let mut groups: BTreeMap<String, AlterGroup> = BTreeMap::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let file = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| dir.to_path_buf());
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("unreadable directory entry"));
                    return Err(MetadataError::Io { file, source }.into());
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !self.is_alter_file(name) {
                continue;
            }

            let path = entry.path();
            let lines = self.header.read(path)?;
            let alter = self.parser.parse(&lines, path, warnings)?;

            let group = groups.entry(alter.ref_key.clone()).or_default();
            let slot = match alter.direction {
                Direction::Up => &mut group.up,
                Direction::Down => &mut group.down,
            };
            if let Some(existing) = slot {
                return Err(DuplicateRefError {
                    ref_key: alter.ref_key,
                    direction: alter.direction,
                    existing: existing.file.clone(),
                    incoming: alter.file,
                }
                .into());
            }
            *slot = Some(alter);
        }

        if groups.is_empty() {
            return Err(ChainError::Empty {
                dir: dir.to_path_buf(),
            }
            .into());
        }

        Ok(groups)
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new()
    }
}
