use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::MetadataError;

/// Cap on the continuous comment block at the top of an alter file. Protects
/// the metadata parser from treating an entire SQL file as header.
pub const MAX_HEADER_LINES: usize = 256;

/// Reads the leading comment block of an alter file.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderReader;

impl HeaderReader {
    /// Return the maximal prefix of lines beginning with `--`, stopping at
    /// the first non-matching line.
    ///
    /// The file handle is dropped on every exit path; nothing past the
    /// header is retained.
    pub fn read(&self, path: &Path) -> std::result::Result<Vec<String>, MetadataError> {
        let file = File::open(path).map_err(|source| MetadataError::Io {
            file: path.to_path_buf(),
            source,
        })?;

        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| MetadataError::Io {
                file: path.to_path_buf(),
                source,
            })?;
            if !line.starts_with("--") {
                break;
            }
            if lines.len() == MAX_HEADER_LINES {
                return Err(MetadataError::HeaderTooLarge {
                    file: path.to_path_buf(),
                    limit: MAX_HEADER_LINES,
                });
            }
            lines.push(line);
        }

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_header_and_stops_at_first_non_comment_line() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("100-init-up.sql");
        fs::write(
            &path,
            "-- ref: abc\n-- direction: up\nCREATE TABLE t (id INT);\n-- trailing comment\n",
        )
        .unwrap();

        let lines = HeaderReader.read(&path).unwrap();

        assert_eq!(lines, vec!["-- ref: abc", "-- direction: up"]);
    }

    #[test]
    fn header_only_file_is_fine() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("100-init-down.sql");
        fs::write(&path, "-- ref: abc\n-- direction: down\n").unwrap();

        let lines = HeaderReader.read(&path).unwrap();

        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp = tempdir().unwrap();
        let err = HeaderReader
            .read(&temp.path().join("100-gone-up.sql"))
            .unwrap_err();

        assert!(matches!(err, MetadataError::Io { .. }));
    }

    #[test]
    fn exactly_max_header_lines_succeeds() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("100-big-up.sql");
        let header = "-- filler\n".repeat(MAX_HEADER_LINES);
        fs::write(&path, format!("{header}SELECT 1;\n")).unwrap();

        let lines = HeaderReader.read(&path).unwrap();

        assert_eq!(lines.len(), MAX_HEADER_LINES);
    }

    #[test]
    fn one_line_past_the_cap_fails() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("100-big-up.sql");
        fs::write(&path, "-- filler\n".repeat(MAX_HEADER_LINES + 1)).unwrap();

        let err = HeaderReader.read(&path).unwrap_err();

        assert!(matches!(err, MetadataError::HeaderTooLarge { limit, .. } if limit == 256));
    }
}
