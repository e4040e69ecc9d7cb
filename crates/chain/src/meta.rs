use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;

use crate::error::MetadataError;
use crate::types::{Alter, Direction};
use crate::warn::WarningSink;

/// Parses `-- key: value` header lines into an [`Alter`] record.
///
/// Regular expressions are compiled once here and owned by the parser; a
/// single instance is meant to be reused across every file in a scan.
pub struct MetadataParser {
    entry: Regex,
    ref_chars: Regex,
}

impl MetadataParser {
    pub fn new() -> Self {
        Self {
            // `-- key : value` with arbitrary surrounding whitespace.
            entry: Regex::new(r"^--\s*(\S+)\s*:(.+)$").expect("metadata entry pattern"),
            ref_chars: Regex::new(r"^[0-9A-Za-z]+$").expect("ref pattern"),
        }
    }

    /// Whether `value` is a well-formed ref identifier.
    pub fn is_valid_ref(&self, value: &str) -> bool {
        self.ref_chars.is_match(value)
    }

    /// Produce a single [`Alter`] from extracted header lines, or fail.
    ///
    /// Lines that do not look like metadata entries are free-form comments
    /// and are skipped. Unknown keys are recorded on `warnings` and ignored.
    /// Duplicate keys resolve to last-write-wins.
    pub fn parse(
        &self,
        lines: &[String],
        file: &Path,
        warnings: &mut dyn WarningSink,
    ) -> std::result::Result<Alter, MetadataError> {
        let mut ref_key: Option<String> = None;
        let mut back_ref: Option<String> = None;
        let mut direction: Option<Direction> = None;
        let mut require_env = BTreeSet::new();
        let mut skip_env = BTreeSet::new();

        for line in lines {
            let Some(caps) = self.entry.captures(line) else {
                continue;
            };
            let key = caps[1].to_ascii_lowercase();
            let value = caps[2].trim().to_string();

            match key.as_str() {
                "ref" => {
                    if !self.is_valid_ref(&value) {
                        return Err(MetadataError::InvalidRef {
                            value,
                            file: file.to_path_buf(),
                        });
                    }
                    ref_key = Some(value);
                }
                "backref" => {
                    if value.is_empty() {
                        return Err(MetadataError::InvalidBackRef {
                            file: file.to_path_buf(),
                        });
                    }
                    back_ref = Some(value);
                }
                "direction" => match Direction::parse(&value) {
                    Some(parsed) => direction = Some(parsed),
                    None => {
                        return Err(MetadataError::InvalidDirection {
                            value: value.to_ascii_lowercase(),
                            file: file.to_path_buf(),
                        });
                    }
                },
                "require-env" => require_env = split_env_list(&value),
                "skip-env" => skip_env = split_env_list(&value),
                other => warnings.record(format!(
                    "unknown property '{other}' found in '{}'",
                    file.display()
                )),
            }
        }

        let ref_key = ref_key.ok_or_else(|| MetadataError::MissingRef {
            file: file.to_path_buf(),
        })?;
        let direction = direction.ok_or_else(|| MetadataError::MissingDirection {
            file: file.to_path_buf(),
        })?;
        if !require_env.is_empty() && !skip_env.is_empty() {
            return Err(MetadataError::ConflictingEnv {
                file: file.to_path_buf(),
            });
        }

        Ok(Alter {
            file: file.to_path_buf(),
            direction,
            ref_key,
            back_ref,
            require_env,
            skip_env,
        })
    }
}

impl Default for MetadataParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Comma-separated environment list: entries trimmed, empties discarded, so
/// trailing commas and blank lists resolve to an empty set rather than an
/// error.
fn split_env_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn parse(header: &str) -> std::result::Result<Alter, MetadataError> {
        let lines: Vec<String> = header.lines().map(str::to_string).collect();
        let mut warnings = Vec::new();
        MetadataParser::new().parse(&lines, &PathBuf::from("./test.sql"), &mut warnings)
    }

    fn envs(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn parses_minimal_header() {
        let alter = parse("--ref: 1234abcd\n--direction: down").unwrap();
        assert_eq!(alter.ref_key, "1234abcd");
        assert_eq!(alter.direction, Direction::Down);
        assert_eq!(alter.back_ref, None);
    }

    #[test]
    fn direction_value_is_case_insensitive() {
        let alter = parse("--ref: 1234\n--direction: DOWN").unwrap();
        assert_eq!(alter.direction, Direction::Down);
    }

    #[test]
    fn tolerates_whitespace_around_keys_and_values() {
        for header in [
            "--ref: 1234\n--direction: up",
            "--ref:1234\n--direction:up",
            "-- ref: 1234\n-- direction: up",
            "-- ref:1234\n-- direction:up",
        ] {
            let alter = parse(header).unwrap();
            assert_eq!(alter.ref_key, "1234");
            assert_eq!(alter.direction, Direction::Up);
        }
    }

    #[test]
    fn parses_backref() {
        let alter = parse("--ref: 1234\n--backref:abcd\n--direction: down").unwrap();
        assert_eq!(alter.back_ref.as_deref(), Some("abcd"));
    }

    #[test]
    fn env_lists_drop_blank_entries() {
        let alter = parse("--ref:1234\n--direction:up\n--require-env: one,,,").unwrap();
        assert_eq!(alter.require_env, envs(&["one"]));

        let alter = parse("--ref:1234\n--direction:up\n--skip-env: one,two,three").unwrap();
        assert_eq!(alter.skip_env, envs(&["one", "two", "three"]));

        let alter = parse("--ref:1234\n--direction:up\n--require-env: ,,,").unwrap();
        assert!(alter.require_env.is_empty());

        let alter = parse("--ref:1234\n--direction:up\n--skip-env: ").unwrap();
        assert!(alter.skip_env.is_empty());
    }

    #[test]
    fn unknown_keys_warn_but_do_not_fail() {
        let lines: Vec<String> = "--ref: 1234\n--direction: up\n--boop:boop"
            .lines()
            .map(str::to_string)
            .collect();
        let mut warnings = Vec::new();
        let alter = MetadataParser::new()
            .parse(&lines, &PathBuf::from("./test.sql"), &mut warnings)
            .unwrap();

        assert_eq!(alter.ref_key, "1234");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("boop"));
    }

    #[test]
    fn non_metadata_comment_lines_are_ignored() {
        let alter = parse("--ref: 1234\n-- just a note about this alter\n--direction: up").unwrap();
        assert_eq!(alter.ref_key, "1234");
    }

    #[test]
    fn missing_or_invalid_direction_is_rejected() {
        assert!(matches!(
            parse("--ref: 1234\n--direction: sideways"),
            Err(MetadataError::InvalidDirection { .. })
        ));
        assert!(matches!(
            parse("--ref: 1234\n--direction: upp"),
            Err(MetadataError::InvalidDirection { .. })
        ));
        assert!(matches!(
            parse("--ref: 1234"),
            Err(MetadataError::MissingDirection { .. })
        ));
    }

    #[test]
    fn bad_or_missing_refs_are_rejected() {
        assert!(matches!(
            parse("--ref:1.2-4%"),
            Err(MetadataError::InvalidRef { .. })
        ));
        assert!(matches!(
            parse("--backref:1234\n--direction: up"),
            Err(MetadataError::MissingRef { .. })
        ));
    }

    #[test]
    fn empty_backref_value_is_rejected() {
        assert!(matches!(
            parse("--ref:1234\n--backref: \n--direction: up"),
            Err(MetadataError::InvalidBackRef { .. })
        ));
    }

    #[test]
    fn require_and_skip_env_are_mutually_exclusive() {
        assert!(matches!(
            parse("--ref:1234\n--direction:up\n--skip-env: one\n--require-env:one"),
            Err(MetadataError::ConflictingEnv { .. })
        ));
        assert!(matches!(
            parse("--ref:1234\n--direction:up\n--skip-env: one\n--require-env:two"),
            Err(MetadataError::ConflictingEnv { .. })
        ));
    }

    #[test]
    fn duplicate_keys_resolve_to_last_write() {
        let alter = parse("--ref: first1\n--ref: second2\n--direction: up").unwrap();
        assert_eq!(alter.ref_key, "second2");
    }

    #[test]
    fn ref_character_validation() {
        let parser = MetadataParser::new();
        assert!(parser.is_valid_ref("hello"));
        assert!(parser.is_valid_ref("1234567890"));
        assert!(parser.is_valid_ref("1234abcd"));
        assert!(parser.is_valid_ref("abc1234def"));
        assert!(!parser.is_valid_ref(""));
        assert!(!parser.is_valid_ref(" 1234 "));
        assert!(!parser.is_valid_ref("1.2-4%"));
    }
}
