use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use sha2::{Digest, Sha256};

/// Generated refs are 8 lowercase hex characters.
const REF_LEN: usize = 8;

/// Derive a fresh ref from a digest of the current wall-clock time.
pub fn generate() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let digest = Sha256::digest(nanos.to_be_bytes());

    let mut ref_key = String::with_capacity(REF_LEN);
    for byte in digest.iter().take(REF_LEN / 2) {
        let _ = write!(ref_key, "{byte:02x}");
    }
    ref_key
}

/// Print a reference that could be used for an alter file. A utility for
/// workflows that create alter files by hand.
pub fn run() -> Result<()> {
    println!("{}", generate());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_refs_are_valid_identifiers() {
        let ref_key = generate();
        assert_eq!(ref_key.len(), REF_LEN);
        assert!(ref_key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
