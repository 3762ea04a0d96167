use sha2::{Digest, Sha256};

/// Fixed secret prefixed to every password before hashing. There is no
/// per-user salt: the same password always produces the same digest, which is
/// what makes byte-for-byte comparison against the stored column possible.
const SECRET_PREFIX: &str = "todolist.rs#";

/// Derives the stored digest for a password: SHA-256 over the secret prefix
/// concatenated with the password. Pure function, 32-byte output.
pub fn digest(password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(SECRET_PREFIX.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// Checks a submitted password against a stored digest by recomputing and
/// comparing both sides through a stable hex encoding.
pub fn verify(password: &str, stored: &[u8]) -> bool {
    hex::encode(digest(password)) == hex::encode(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(digest("password123"), digest("password123"));
        assert_ne!(digest("password123"), digest("password124"));
    }

    #[test]
    fn test_digest_shape() {
        let d = digest("password123");
        assert_eq!(d.len(), 32);
        assert_eq!(hex::encode(&d).len(), 64);
        // The digest must never be the plaintext.
        assert_ne!(d, b"password123".to_vec());
    }

    #[test]
    fn test_verify() {
        let stored = digest("correct horse");
        assert!(verify("correct horse", &stored));
        assert!(!verify("wrong horse", &stored));
        assert!(!verify("correct horse", b"not-a-digest"));
    }
}
