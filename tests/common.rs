//! Common test utilities for building graphs and wire data.
use kumitate::prelude::*;

/// The node ids of the three-node chat fixture.
#[allow(dead_code)]
pub struct ChatIds {
    pub start: String,
    pub router: String,
    pub end: String,
}

/// Builds `start -> router_agent -> end` through the store.
#[allow(dead_code)]
pub fn chat_store(catalog: &NodeCatalog) -> (GraphStore<'_>, ChatIds) {
    let mut store = GraphStore::new(catalog);
    let start = store
        .add_node("start", Position::new(100.0, 200.0))
        .expect("start node");
    let router = store
        .add_node("router_agent", Position::new(350.0, 200.0))
        .expect("router node");
    let end = store
        .add_node("end", Position::new(600.0, 200.0))
        .expect("end node");
    store
        .add_connection(&start.id, &router.id, None)
        .expect("start -> router");
    store
        .add_connection(&router.id, &end.id, None)
        .expect("router -> end");

    let ids = ChatIds {
        start: start.id,
        router: router.id,
        end: end.id,
    };
    (store, ids)
}

/// Loads a graph from JSON, panicking with the load error on failure.
#[allow(dead_code)]
pub fn load(json: &str, catalog: &NodeCatalog) -> Graph {
    Graph::from_json(json, catalog).unwrap_or_else(|e| panic!("Failed to load graph: {}", e))
}

/// The chat fixture as saved by the editor, with fixed ids.
#[allow(dead_code)]
pub const CHAT_GRAPH_JSON: &str = r#"{
    "id": "wf_1",
    "name": "Chat",
    "description": "Three node chat",
    "nodes": [
        { "id": "s", "type": "start", "name": "Start", "position": { "x": 100, "y": 200 } },
        { "id": "r", "type": "router_agent", "name": "Router", "position": { "x": 350, "y": 200 } },
        { "id": "e", "type": "end", "name": "End", "position": { "x": 600, "y": 200 } }
    ],
    "connections": [
        { "id": "c1", "from": "s", "to": "r" },
        { "id": "c2", "from": "r", "to": "e" }
    ]
}"#;

/// A connection as `(from index, to index, source port, condition)`.
#[allow(dead_code)]
pub type Link = (usize, usize, Option<String>, Option<String>);

/// Shape of a graph with ids abstracted away: node types in order and
/// connections as index pairs with their port and condition.
#[allow(dead_code)]
pub fn topology(graph: &Graph) -> (Vec<NodeType>, Vec<Link>) {
    let index_of = |id: &str| {
        graph
            .nodes()
            .iter()
            .position(|n| n.id == id)
            .expect("connection endpoint exists")
    };
    let types = graph.nodes().iter().map(|n| n.node_type).collect();
    let links = graph
        .connections()
        .iter()
        .map(|c| {
            (
                index_of(&c.from),
                index_of(&c.to),
                c.from_port.clone(),
                c.condition.clone(),
            )
        })
        .collect();
    (types, links)
}

/// Kinds of a list of issues, in order.
#[allow(dead_code)]
pub fn kinds(issues: &[ValidationIssue]) -> Vec<IssueKind> {
    issues.iter().map(|i| i.kind).collect()
}
