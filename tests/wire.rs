//! Loading graphs from and saving them to the editor's JSON.
mod common;
use common::*;
use kumitate::prelude::*;
use kumitate::model::RawGraph;
use serde_json::json;

#[cfg(test)]
mod wire_tests {
    use super::*;

    #[test]
    fn test_chat_graph_loads() {
        let catalog = NodeCatalog::new();
        let graph = load(CHAT_GRAPH_JSON, &catalog);
        assert_eq!(graph.id.as_deref(), Some("wf_1"));
        assert_eq!(graph.name, "Chat");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.connection_count(), 2);

        let router = graph.node("r").unwrap();
        assert_eq!(router.node_type, NodeType::RouterAgent);
        assert_eq!(router.inputs, catalog.ports_for_type("router_agent").inputs);
        assert_eq!(graph.outgoing("r").count(), 1);
        assert_eq!(graph.incoming("r").next().unwrap().id, "c1");
        assert_eq!(graph.start_nodes().count(), 1);
        assert_eq!(graph.end_nodes().next().unwrap().id, "e");
    }

    #[test]
    fn test_react_flow_edge_names_are_accepted() {
        let catalog = NodeCatalog::new();
        let json = r#"{
            "name": "Edges",
            "nodes": [
                { "id": "c", "type": "condition", "position": { "x": 0, "y": 0 } },
                { "id": "e", "type": "end", "position": { "x": 0, "y": 0 } }
            ],
            "edges": [
                { "id": "x", "source": "c", "target": "e", "sourceHandle": "true", "condition": " " }
            ]
        }"#;
        let graph = load(json, &catalog);
        let edge = graph.connection("x").unwrap();
        assert_eq!(edge.from, "c");
        assert_eq!(edge.to, "e");
        assert_eq!(edge.from_port.as_deref(), Some("true"));
        assert!(edge.is_unconditional());
        assert_eq!(graph.node("c").unwrap().name, "Condition");
    }

    #[test]
    fn test_load_errors_are_typed() {
        let catalog = NodeCatalog::new();

        assert!(matches!(
            Graph::from_json("[1, 2", &catalog),
            Err(LoadError::Json(_))
        ));
        // Missing `position`.
        assert!(matches!(
            Graph::from_json(
                r#"{ "name": "x", "nodes": [{ "id": "a", "type": "start" }] }"#,
                &catalog
            ),
            Err(LoadError::Json(_))
        ));
        assert_eq!(
            Graph::from_json(
                r#"{ "name": "x", "nodes": [{ "id": "a", "type": "warp", "position": { "x": 0, "y": 0 } }] }"#,
                &catalog
            )
            .unwrap_err(),
            LoadError::UnknownNodeType {
                node_id: "a".to_string(),
                type_name: "warp".to_string()
            }
        );
        assert_eq!(
            Graph::from_json(
                r#"{ "name": "x", "nodes": [
                    { "id": "a", "type": "start", "position": { "x": 0, "y": 0 } },
                    { "id": "a", "type": "end", "position": { "x": 0, "y": 0 } }
                ] }"#,
                &catalog
            )
            .unwrap_err(),
            LoadError::DuplicateNodeId("a".to_string())
        );
        let doubled = CHAT_GRAPH_JSON.replace(r#""id": "c2""#, r#""id": "c1""#);
        assert_eq!(
            Graph::from_json(&doubled, &catalog).unwrap_err(),
            LoadError::DuplicateConnectionId("c1".to_string())
        );
    }

    #[test]
    fn test_negative_positions_are_clamped_on_load() {
        let catalog = NodeCatalog::new();
        let json = r#"{ "name": "x", "nodes": [
            { "id": "a", "type": "start", "position": { "x": -20, "y": 35.5 } }
        ] }"#;
        let graph = load(json, &catalog);
        assert_eq!(graph.node("a").unwrap().position, Position::new(0.0, 35.5));
    }

    #[test]
    fn test_saved_snapshot_reloads_identically() {
        let catalog = NodeCatalog::new();
        let (mut store, ids) = chat_store(&catalog);
        store.set_description("Saved from the editor");
        store
            .set_node_status(&ids.router, Some(NodeStatus::Success))
            .unwrap();
        let connection_id = store.graph().connections()[1].id.clone();
        store.set_condition(&connection_id, Some("done")).unwrap();

        let saved = store.graph().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(value["nodes"][1]["type"], json!("router_agent"));
        assert_eq!(value["nodes"][1]["status"], json!("success"));
        assert!(value["nodes"][0].get("status").is_none());
        assert_eq!(value["connections"][1]["condition"], json!("done"));
        assert!(value.get("id").is_none());

        let reloaded = load(&saved, &catalog);
        assert_eq!(&reloaded, store.graph());
    }

    #[test]
    fn test_custom_formats_convert_through_into_graph() {
        let catalog = NodeCatalog::builder().with_alias("llm", "planning_agent").build();
        let raw: RawGraph = serde_json::from_value(json!({
            "name": "Aliased",
            "nodes": [
                { "id": "s", "type": "start", "position": { "x": 0, "y": 0 } },
                { "id": "p", "type": "llm", "position": { "x": 0, "y": 0 }, "config": { "temperature": 0.1 } }
            ],
            "connections": [{ "id": "c", "from": "s", "to": "p" }]
        }))
        .unwrap();
        let graph = raw.into_graph(&catalog).unwrap();
        let planner = graph.node("p").unwrap();
        assert_eq!(planner.node_type, NodeType::PlanningAgent);

        let typed: kumitate::catalog::AgentConfig = planner.typed_config().unwrap();
        assert_eq!(typed.temperature, 0.1);
        assert_eq!(typed.max_tokens, 2000);
    }
}
