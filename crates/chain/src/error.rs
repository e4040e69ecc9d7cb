use std::path::PathBuf;

use thiserror::Error;

use crate::types::Direction;

pub type Result<T> = std::result::Result<T, ChainToolError>;

/// Top-level error: the closed set of kinds callers branch on.
///
/// Every error is deterministic and structural; there is nothing to retry,
/// and no partial chain is ever returned alongside one.
#[derive(Error, Debug)]
pub enum ChainToolError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    DuplicateRef(#[from] DuplicateRefError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Malformed or missing per-file metadata. Always attributable to a single
/// alter file.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to read '{}': {source}", .file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "header lines (continuous block of lines starting with '--') in '{}' exceed {limit}; \
         add a blank line between the meta-data and any comment lines that follow",
        .file.display()
    )]
    HeaderTooLarge { file: PathBuf, limit: usize },

    #[error("missing required field 'ref' in '{}'", .file.display())]
    MissingRef { file: PathBuf },

    #[error("invalid 'ref' value '{value}' found in '{}'", .file.display())]
    InvalidRef { value: String, file: PathBuf },

    #[error("invalid 'backref' value found in '{}'", .file.display())]
    InvalidBackRef { file: PathBuf },

    #[error("missing required field 'direction' in '{}'", .file.display())]
    MissingDirection { file: PathBuf },

    #[error("invalid direction '{value}' found in '{}'", .file.display())]
    InvalidDirection { value: String, file: PathBuf },

    #[error(
        "mutually exclusive fields 'require-env' and 'skip-env' cannot be used together in '{}'",
        .file.display()
    )]
    ConflictingEnv { file: PathBuf },
}

/// Two files declared the same (ref, direction) pair. Detected per-file
/// during the scan, independent of chain shape.
#[derive(Error, Debug)]
#[error(
    "duplicate '{direction}' alter for ref '{ref_key}' ('{}' collides with '{}')",
    .incoming.display(),
    .existing.display()
)]
pub struct DuplicateRefError {
    pub ref_key: String,
    pub direction: Direction,
    /// The file that already occupied the slot.
    pub existing: PathBuf,
    /// The file that tried to claim it.
    pub incoming: PathBuf,
}

/// Whole-chain topology problems.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("path '{}' is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("directory '{}' does not contain any alters", .dir.display())]
    Empty { dir: PathBuf },

    #[error("missing {missing} alter for '{ref_key}' (sibling file '{}')", .sibling.display())]
    MissingAlter {
        ref_key: String,
        missing: Direction,
        sibling: PathBuf,
    },

    #[error("'backref' values for '{ref_key}' do not match ('{up_value}' and '{down_value}')")]
    BackRefMismatch {
        ref_key: String,
        up_value: String,
        down_value: String,
    },

    #[error(
        "'{field}' values do not match between '{}' and '{}'; \
         both files must declare the same set",
        .up_file.display(),
        .down_file.display()
    )]
    EnvMismatch {
        field: &'static str,
        up_file: PathBuf,
        down_file: PathBuf,
    },

    #[error("invalid backref '{back_ref}' found for '{}'", .file.display())]
    InvalidBackRef { back_ref: String, file: PathBuf },

    #[error(
        "duplicate parent defined in '{first_child}' and '{second_child}' - both point to \
         '{parent}'; chain must be linear"
    )]
    Divergent {
        parent: String,
        first_child: String,
        second_child: String,
    },

    #[error("duplicate root alters found ('{first}' and '{second}'); chain must have one root alter")]
    DuplicateRoot { first: String, second: String },

    #[error("chain is cyclic and has no head or tail")]
    Cyclic,
}
