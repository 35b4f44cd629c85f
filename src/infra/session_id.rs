use std::path::Path;

use sha2::{Digest, Sha256};

/// Short stable id for a watch root: first 4 bytes of SHA-256 of the
/// absolute path, as 8 hex chars. The viewer is handed this id on its
/// command line.
pub fn session_id(root: &Path) -> String {
    let hash = Sha256::digest(root.to_string_lossy().as_bytes());
    hash[..4].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_value() {
        assert_eq!(session_id(Path::new("/home/user/project")), "9dad1e4e");
    }

    #[test]
    fn distinct_roots_differ() {
        let a = session_id(Path::new("/a"));
        assert_eq!(a.len(), 8);
        assert_ne!(a, session_id(Path::new("/b")));
    }
}
