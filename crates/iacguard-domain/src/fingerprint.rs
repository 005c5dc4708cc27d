use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a resource finding.
///
/// Identity fields:
/// - rule_id
/// - code
/// - template path
/// - node logical id
pub fn fingerprint_for_node(rule_id: &str, code: &str, template: &str, node_id: &str) -> String {
    let canonical = [rule_id, code, template, node_id].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
