//! The in-memory workflow graph: nodes, connections and the graph aggregate.

pub mod connection;
pub mod graph;
pub mod node;
pub mod wire;

pub use connection::{Connection, ConnectionConfig, RetryPolicy};
pub use graph::Graph;
pub use node::{Node, NodeStatus, Port, Position};
pub use wire::{IntoGraph, RawConnection, RawGraph, RawNode};

/// The open key/value configuration carried by nodes and connections.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// Shallow-merges `partial` into `target`; keys in `partial` win.
pub(crate) fn merge_config(target: &mut ConfigMap, partial: ConfigMap) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}
