//! Digest tokens attached to write actions.
//!
//! The service checks these hashes to accept votes and snags. They are SHA-1
//! hex digests over fields concatenated in a fixed order; the order is part
//! of the wire protocol.

use ring::digest::{SHA1_FOR_LEGACY_USE_ONLY, digest as sha1};

/// SHA-1 hex digest of `value`.
pub fn digest(value: &str) -> String {
    hex::encode(sha1(&SHA1_FOR_LEGACY_USE_ONLY, value.as_bytes()))
}

/// Random nonce in the service's format, a float in `[0, 1)`.
pub fn nonce() -> String {
    rand::random::<f64>().to_string()
}

/// `vh` token of a vote.
pub fn vote_hash(room: &str, direction: &str, song: &str) -> String {
    digest(&format!("{room}{direction}{song}"))
}

/// `vh` token of a snag. `sh` is the snag's own nonce digest.
pub fn snag_hash(user: &str, dj: &str, song: &str, room: &str, sh: &str) -> String {
    digest(&[user, dj, song, room, "queue", "board", "false", "false", sh].join("/"))
}
