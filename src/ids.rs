//! Identifier generation for nodes and connections.
//!
//! Ids have the shape `{prefix}_{unix-millis}_{random-suffix}`, where the prefix is
//! the node type tag (or `conn` for connections). Collisions are not impossible,
//! only negligible; the store still re-draws an id that is already taken.

use crate::catalog::NodeType;
use rand::Rng;

pub const DEFAULT_SUFFIX_LEN: usize = 9;
pub const MIN_SUFFIX_LEN: usize = 4;
const CONNECTION_PREFIX: &str = "conn";
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A fresh node id, e.g. `router_agent_1718000000000_k3j9x0a2b`.
pub fn node_id(node_type: NodeType, suffix_len: usize) -> String {
    generate(node_type.as_str(), suffix_len)
}

/// A fresh connection id, e.g. `conn_1718000000000_p0q8r7s6t`.
pub fn connection_id(suffix_len: usize) -> String {
    generate(CONNECTION_PREFIX, suffix_len)
}

fn generate(prefix: &str, suffix_len: usize) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    format!("{}_{}_{}", prefix, timestamp, random_suffix(suffix_len))
}

fn random_suffix(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len.max(MIN_SUFFIX_LEN))
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
