//! Validation passes and fixes.
mod common;
use common::*;
use kumitate::prelude::*;
use serde_json::json;

#[cfg(test)]
mod validator_tests {
    use super::*;

    #[test]
    fn test_connected_chat_graph_has_no_issues() {
        let catalog = NodeCatalog::new();
        let (store, _) = chat_store(&catalog);
        let validator = Validator::new(&catalog);
        assert!(validator.validate(store.graph()).is_empty());

        let loaded = load(CHAT_GRAPH_JSON, &catalog);
        let report = validator.report(&loaded);
        assert!(report.is_valid);
        assert_eq!(report.state(), GraphState::Valid);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_single_router_reports_missing_input_and_terminal() {
        let catalog = NodeCatalog::new();
        let mut store = GraphStore::new(&catalog);
        let router = store
            .add_node("router_agent", Position::new(0.0, 0.0))
            .unwrap();

        let issues = Validator::new(&catalog).validate(store.graph());
        let kinds = kinds(&issues);
        assert!(
            kinds.contains(&IssueKind::Orphan) || kinds.contains(&IssueKind::MissingRequiredInput)
        );
        let terminal = issues
            .iter()
            .find(|i| i.kind == IssueKind::TerminalCompleteness)
            .unwrap();
        assert_eq!(terminal.severity, Severity::Error);
        assert!(terminal.node_id.is_none());

        // Node issues come first in check order, graph-level issues last.
        assert_eq!(
            kinds,
            vec![
                IssueKind::Orphan,
                IssueKind::MissingRequiredInput,
                IssueKind::Unreachable,
                IssueKind::DeadEnd,
                IssueKind::TerminalCompleteness,
                IssueKind::MissingStart,
            ]
        );
        assert!(issues[..4].iter().all(|i| i.node_id.as_deref() == Some(router.id.as_str())));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let catalog = NodeCatalog::new();
        let (mut store, ids) = chat_store(&catalog);
        store.add_node("webhook", Position::new(10.0, 10.0)).unwrap();
        store
            .add_connection(&ids.router, &ids.end, Some("intent == 'x'"))
            .unwrap();
        store.remove_node(&ids.start);

        let validator = Validator::new(&catalog);
        let first = validator.validate(store.graph());
        let second = validator.validate(store.graph());
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_issues_are_ordered_by_node_then_check() {
        let catalog = NodeCatalog::new();
        let json = r#"{
            "name": "Ordering",
            "nodes": [
                { "id": "s", "type": "start", "position": { "x": 0, "y": 0 } },
                { "id": "a", "type": "email_send", "position": { "x": 0, "y": 0 } },
                { "id": "b", "type": "end", "position": { "x": 0, "y": 0 } }
            ],
            "connections": [
                { "id": "c1", "from": "s", "to": "b" },
                { "id": "c2", "from": "b", "to": "gone" }
            ]
        }"#;
        let issues = Validator::new(&catalog).validate(&load(json, &catalog));
        let anchored: Vec<_> = issues
            .iter()
            .map(|i| (i.node_id.as_deref(), i.kind))
            .collect();
        assert_eq!(
            anchored,
            vec![
                (Some("a"), IssueKind::Orphan),
                (Some("a"), IssueKind::MissingRequiredInput),
                (Some("a"), IssueKind::Unreachable),
                (Some("a"), IssueKind::DeadEnd),
                (Some("b"), IssueKind::DanglingConnection),
            ]
        );
    }

    #[test]
    fn test_named_port_satisfies_required_input() {
        let catalog = NodeCatalog::new();
        let json = r#"{
            "name": "Ports",
            "nodes": [
                { "id": "s", "type": "start", "position": { "x": 0, "y": 0 } },
                { "id": "l", "type": "loop", "position": { "x": 0, "y": 0 } },
                { "id": "e", "type": "end", "position": { "x": 0, "y": 0 } }
            ],
            "connections": [
                { "id": "c1", "from": "s", "to": "l", "toPort": "feedback" },
                { "id": "c2", "from": "l", "to": "e", "fromPort": "done" }
            ]
        }"#;
        let validator = Validator::new(&catalog);
        let issues = validator.validate(&load(json, &catalog));
        assert_eq!(kinds(&issues), vec![IssueKind::MissingRequiredInput]);
        assert_eq!(issues[0].node_id.as_deref(), Some("l"));
        assert!(!issues[0].fixable);

        let fixed = json.replace(r#""toPort": "feedback""#, r#""toPort": "input""#);
        assert!(validator.validate(&load(&fixed, &catalog)).is_empty());
    }

    #[test]
    fn test_remove_node_leaves_no_dangling_connections() {
        let catalog = NodeCatalog::new();
        let (mut store, ids) = chat_store(&catalog);
        store.remove_node(&ids.router);

        let issues = Validator::new(&catalog).validate(store.graph());
        assert!(
            issues
                .iter()
                .all(|i| i.kind != IssueKind::DanglingConnection)
        );
        assert!(issues.iter().all(|i| i.node_id.as_deref() != Some(ids.router.as_str())));
    }

    #[test]
    fn test_dangling_connection_is_fixable() {
        let catalog = NodeCatalog::new();
        let json = CHAT_GRAPH_JSON.replace(
            r#"{ "id": "c2", "from": "r", "to": "e" }"#,
            r#"{ "id": "c2", "from": "r", "to": "e" },
               { "id": "c3", "from": "ghost", "to": "e" }"#,
        );
        let graph = load(&json, &catalog);
        let validator = Validator::new(&catalog);
        let issues = validator.validate(&graph);
        assert_eq!(kinds(&issues), vec![IssueKind::DanglingConnection]);
        let issue = &issues[0];
        assert_eq!(issue.severity, Severity::Error);
        assert!(issue.fixable);
        assert_eq!(issue.connection_id.as_deref(), Some("c3"));

        let mut store = GraphStore::builder(&catalog).graph(graph).build();
        assert!(validator.fix(&mut store, issue));
        assert!(validator.validate(store.graph()).is_empty());
        // The same fix no longer applies.
        assert!(!validator.fix(&mut store, issue));
    }

    #[test]
    fn test_duplicate_unconditional_connections_merge() {
        let catalog = NodeCatalog::new();
        let json = CHAT_GRAPH_JSON.replace(
            r#"{ "id": "c2", "from": "r", "to": "e" }"#,
            r#"{ "id": "c2", "from": "r", "to": "e", "config": { "priority": 1 } },
               { "id": "c3", "from": "r", "to": "e", "config": { "priority": 5, "delay": 100 } },
               { "id": "c4", "from": "r", "to": "e", "condition": "retry" }"#,
        );
        let graph = load(&json, &catalog);
        let validator = Validator::new(&catalog);
        let issues = validator.validate(&graph);
        assert_eq!(kinds(&issues), vec![IssueKind::DuplicateConnection]);
        let issue = &issues[0];
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(
            issue.fix,
            Some(IssueFix::MergeConnections {
                keep: "c2".to_string(),
                remove: vec!["c3".to_string()],
            })
        );

        let mut store = GraphStore::builder(&catalog).graph(graph).build();
        assert!(validator.fix(&mut store, issue));
        let graph = store.graph();
        assert!(graph.connection("c3").is_none());
        assert!(graph.connection("c4").is_some());
        let kept = graph.connection("c2").unwrap();
        assert_eq!(kept.config["priority"], json!(1));
        assert_eq!(kept.config["delay"], json!(100));
        assert!(validator.validate(graph).is_empty());
    }

    #[test]
    fn test_unfixable_issue_is_left_alone() {
        let catalog = NodeCatalog::new();
        let mut store = GraphStore::new(&catalog);
        store.add_node("start", Position::new(0.0, 0.0)).unwrap();
        let validator = Validator::new(&catalog);
        let issues = validator.validate(store.graph());
        let terminal = issues
            .iter()
            .find(|i| i.kind == IssueKind::TerminalCompleteness)
            .unwrap();
        assert!(!validator.fix(&mut store, terminal));
        assert_eq!(store.graph().node_count(), 1);
    }

    #[test]
    fn test_cycles_need_a_loop_node() {
        let catalog = NodeCatalog::new();
        let cyclic = |middle: &str| {
            format!(
                r#"{{
                "name": "Cycle",
                "nodes": [
                    {{ "id": "s", "type": "start", "position": {{ "x": 0, "y": 0 }} }},
                    {{ "id": "a", "type": "{}", "position": {{ "x": 0, "y": 0 }} }},
                    {{ "id": "b", "type": "planning_agent", "position": {{ "x": 0, "y": 0 }} }},
                    {{ "id": "e", "type": "end", "position": {{ "x": 0, "y": 0 }} }}
                ],
                "connections": [
                    {{ "id": "c1", "from": "s", "to": "a" }},
                    {{ "id": "c2", "from": "a", "to": "b" }},
                    {{ "id": "c3", "from": "b", "to": "a", "toPort": "{}" }},
                    {{ "id": "c4", "from": "b", "to": "e" }}
                ]
            }}"#,
                middle,
                if middle == "loop" { "feedback" } else { "context" }
            )
        };
        let validator = Validator::new(&catalog);

        let issues = validator.validate(&load(&cyclic("router_agent"), &catalog));
        assert_eq!(kinds(&issues), vec![IssueKind::Cycle]);
        assert_eq!(issues[0].node_id.as_deref(), Some("a"));
        assert!(issues[0].is_error());

        let issues = validator.validate(&load(&cyclic("loop"), &catalog));
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn test_loop_free_cycle_next_to_loop_path_is_reported() {
        let catalog = NodeCatalog::new();
        let json = r#"{
            "name": "Side loop",
            "nodes": [
                { "id": "s", "type": "start", "position": { "x": 0, "y": 0 } },
                { "id": "a", "type": "http_request", "position": { "x": 100, "y": 0 } },
                { "id": "l", "type": "loop", "position": { "x": 200, "y": 0 } },
                { "id": "b", "type": "http_request", "position": { "x": 300, "y": 0 } },
                { "id": "e", "type": "end", "position": { "x": 400, "y": 0 } }
            ],
            "connections": [
                { "id": "c1", "from": "s", "to": "a" },
                { "id": "c2", "from": "a", "to": "l" },
                { "id": "c3", "from": "l", "to": "b", "fromPort": "body" },
                { "id": "c4", "from": "a", "to": "b" },
                { "id": "c5", "from": "b", "to": "a" },
                { "id": "c6", "from": "b", "to": "e" }
            ]
        }"#;
        let issues = Validator::new(&catalog).validate(&load(json, &catalog));
        assert_eq!(kinds(&issues), vec![IssueKind::Cycle]);
        assert_eq!(issues[0].node_id.as_deref(), Some("a"));
        assert!(issues[0].message.contains("'HTTP Request'"));
    }

    #[test]
    fn test_long_chain_validates_without_recursion() {
        let catalog = NodeCatalog::new();
        let steps = 5000;
        let node = |id: &str, tag: &str, x: usize| {
            json!({ "id": id, "type": tag, "position": { "x": x, "y": 0 } })
        };
        let mut nodes = vec![node("s", "start", 0)];
        let mut connections = Vec::new();
        let mut previous = "s".to_string();
        for step in 0..steps {
            let id = format!("n{}", step);
            nodes.push(node(&id, "http_request", step + 1));
            connections.push(json!({ "id": format!("c{}", step), "from": previous, "to": id }));
            previous = id;
        }
        nodes.push(node("e", "end", steps + 1));
        connections.push(json!({ "id": "c_end", "from": previous, "to": "e" }));
        let json = json!({ "name": "Chain", "nodes": nodes, "connections": connections });

        let graph = load(&json.to_string(), &catalog);
        assert_eq!(graph.node_count(), steps + 2);
        let issues = Validator::new(&catalog).validate(&graph);
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn test_self_connection_from_storage_is_fixable() {
        let catalog = NodeCatalog::new();
        let json = CHAT_GRAPH_JSON.replace(
            r#"{ "id": "c2", "from": "r", "to": "e" }"#,
            r#"{ "id": "c2", "from": "r", "to": "e" },
               { "id": "c3", "from": "r", "to": "r", "toPort": "context" }"#,
        );
        let graph = load(&json, &catalog);
        let validator = Validator::new(&catalog);
        let issues = validator.validate(&graph);
        assert_eq!(kinds(&issues), vec![IssueKind::SelfConnection]);

        let mut store = GraphStore::builder(&catalog).graph(graph).build();
        assert_eq!(validator.fix_all(&mut store), 1);
        assert!(validator.validate(store.graph()).is_empty());
    }

    #[test]
    fn test_wrongly_typed_config_is_reported() {
        let catalog = NodeCatalog::new();
        let (mut store, ids) = chat_store(&catalog);
        let mut partial = ConfigMap::new();
        partial.insert("maxTokens".to_string(), json!("lots"));
        store.update_node_config(&ids.router, partial).unwrap();

        let connection_id = store.graph().connections()[0].id.clone();
        let mut partial = ConfigMap::new();
        partial.insert("delay".to_string(), json!(-5));
        store.update_connection_config(&connection_id, partial).unwrap();

        let issues = Validator::new(&catalog).validate(store.graph());
        let anchored: Vec<_> = issues
            .iter()
            .map(|i| (i.node_id.clone(), i.connection_id.clone(), i.kind))
            .collect();
        assert_eq!(
            anchored,
            vec![
                (Some(ids.start.clone()), Some(connection_id), IssueKind::InvalidConfig),
                (Some(ids.router.clone()), None, IssueKind::InvalidConfig),
            ]
        );
    }

    #[test]
    fn test_every_builtin_template_is_valid() {
        let catalog = NodeCatalog::new();
        let registry = TemplateRegistry::builtin();
        let loader = TemplateLoader::new(&catalog, &registry);
        let validator = Validator::new(&catalog);

        for summary in loader.list_templates(None) {
            let graph = loader.instantiate(&summary.id).unwrap();
            let issues = validator.validate(&graph);
            assert!(issues.is_empty(), "{}: {:?}", summary.id, issues);
        }
    }

    #[test]
    fn test_report_serializes_for_the_editor() {
        let catalog = NodeCatalog::new();
        let graph = Graph::new("Empty");
        let report = Validator::new(&catalog).report(&graph);
        assert!(!report.is_valid);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["isValid"], json!(false));
        assert_eq!(value["issues"][0]["kind"], json!("terminal_completeness"));
        assert_eq!(value["issues"][1]["kind"], json!("missing_start"));
    }
}
