use super::{Template, TemplateConnection, TemplateNode};
use crate::catalog::NodeType;
use crate::model::{ConfigMap, Position};
use serde_json::{Value, json};

/// Small helper for writing template definitions in code.
struct Blueprint {
    template: Template,
}

impl Blueprint {
    fn new(id: &str, name: &str, description: &str, categories: &[&str]) -> Self {
        Self {
            template: Template {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                categories: categories.iter().map(|c| c.to_string()).collect(),
                nodes: Vec::new(),
                connections: Vec::new(),
            },
        }
    }

    fn node(mut self, id: &str, node_type: NodeType, name: &str, x: f64, y: f64) -> Self {
        self.template.nodes.push(TemplateNode {
            id: id.to_string(),
            node_type,
            name: name.to_string(),
            position: Position::new(x, y),
            config: ConfigMap::new(),
        });
        self
    }

    /// Like `node`, with config overrides given as a JSON object.
    fn configured(
        self,
        id: &str,
        node_type: NodeType,
        name: &str,
        x: f64,
        y: f64,
        config: Value,
    ) -> Self {
        let mut this = self.node(id, node_type, name, x, y);
        if let (Some(node), Value::Object(map)) = (this.template.nodes.last_mut(), config) {
            node.config = map;
        }
        this
    }

    fn link(self, from: &str, to: &str) -> Self {
        self.link_via(from, None, to, None)
    }

    fn link_via(
        mut self,
        from: &str,
        from_port: Option<&str>,
        to: &str,
        condition: Option<&str>,
    ) -> Self {
        let id = format!("conn_{}", self.template.connections.len() + 1);
        self.template.connections.push(TemplateConnection {
            id,
            from: from.to_string(),
            to: to.to_string(),
            from_port: from_port.map(str::to_string),
            to_port: None,
            condition: condition.map(str::to_string),
            config: ConfigMap::new(),
        });
        self
    }

    fn build(self) -> Template {
        self.template
    }
}

pub(super) fn templates() -> Vec<Template> {
    vec![
        simple_chat(),
        customer_service(),
        knowledge_qa(),
        data_pipeline(),
        content_creation(),
        api_integration(),
    ]
}

fn simple_chat() -> Template {
    Blueprint::new(
        "simple_chat",
        "Simple Chat",
        "A single router agent answering user messages",
        &["recommended"],
    )
    .node("start_1", NodeType::Start, "Start", 100.0, 200.0)
    .node("router_1", NodeType::RouterAgent, "Chat Router", 350.0, 200.0)
    .node("end_1", NodeType::End, "End", 600.0, 200.0)
    .link("start_1", "router_1")
    .link("router_1", "end_1")
    .build()
}

fn customer_service() -> Template {
    Blueprint::new(
        "customer_service",
        "Customer Service Automation",
        "Routes questions to a knowledge agent and everything else to a service agent",
        &["recommended", "customer-service"],
    )
    .node("start_1", NodeType::Start, "Start", 100.0, 250.0)
    .configured(
        "router_1",
        NodeType::RouterAgent,
        "Intent Router",
        350.0,
        250.0,
        json!({ "systemPrompt": "Classify the customer's intent as 'question' or 'request'." }),
    )
    .node("qa_1", NodeType::KnowledgeQaAgent, "FAQ Answering", 600.0, 150.0)
    .node("service_1", NodeType::CustomerServiceAgent, "Service Desk", 600.0, 350.0)
    .node("end_1", NodeType::End, "End", 850.0, 250.0)
    .link("start_1", "router_1")
    .link_via("router_1", Some("output"), "qa_1", Some("intent == 'question'"))
    .link_via("router_1", Some("output"), "service_1", Some("intent != 'question'"))
    .link("qa_1", "end_1")
    .link("service_1", "end_1")
    .build()
}

fn knowledge_qa() -> Template {
    Blueprint::new(
        "knowledge_qa",
        "Knowledge Base Q&A",
        "Answers questions grounded in a knowledge base",
        &["customer-service"],
    )
    .node("start_1", NodeType::Start, "Start", 100.0, 200.0)
    .configured(
        "qa_1",
        NodeType::KnowledgeQaAgent,
        "Knowledge QA",
        350.0,
        200.0,
        json!({ "temperature": 0.2 }),
    )
    .node("end_1", NodeType::End, "End", 600.0, 200.0)
    .link("start_1", "qa_1")
    .link("qa_1", "end_1")
    .build()
}

fn data_pipeline() -> Template {
    Blueprint::new(
        "data_pipeline",
        "Data Processing Pipeline",
        "Fetches data, turns a question into SQL and runs it",
        &["data-processing"],
    )
    .node("start_1", NodeType::Start, "Start", 100.0, 200.0)
    .configured(
        "fetch_1",
        NodeType::HttpRequest,
        "Fetch Source",
        300.0,
        200.0,
        json!({ "url": "https://api.example.com/records" }),
    )
    .node("sql_1", NodeType::Text2SqlAgent, "Write SQL", 500.0, 200.0)
    .node("query_1", NodeType::DatabaseQuery, "Run Query", 700.0, 200.0)
    .node("end_1", NodeType::End, "End", 900.0, 200.0)
    .link("start_1", "fetch_1")
    .link_via("fetch_1", Some("response"), "sql_1", None)
    .link("sql_1", "query_1")
    .link_via("query_1", Some("rows"), "end_1", None)
    .build()
}

fn content_creation() -> Template {
    Blueprint::new(
        "content_creation",
        "Content Creation",
        "Plans, drafts and mails out a piece of content",
        &["recommended", "content-creation"],
    )
    .node("start_1", NodeType::Start, "Start", 100.0, 200.0)
    .node("plan_1", NodeType::PlanningAgent, "Outline", 300.0, 200.0)
    .configured(
        "write_1",
        NodeType::ContentCreationAgent,
        "Draft",
        500.0,
        200.0,
        json!({ "temperature": 0.9, "maxTokens": 4000 }),
    )
    .node("mail_1", NodeType::EmailSend, "Send Draft", 700.0, 200.0)
    .node("end_1", NodeType::End, "End", 900.0, 200.0)
    .link("start_1", "plan_1")
    .link("plan_1", "write_1")
    .link("write_1", "mail_1")
    .link_via("mail_1", Some("sent"), "end_1", None)
    .build()
}

fn api_integration() -> Template {
    Blueprint::new(
        "api_integration",
        "API Integration",
        "Calls an API and forwards successful responses to a webhook",
        &["data-processing"],
    )
    .node("start_1", NodeType::Start, "Start", 100.0, 200.0)
    .configured(
        "call_1",
        NodeType::HttpRequest,
        "Call API",
        300.0,
        200.0,
        json!({ "url": "https://api.example.com/status", "timeout": 10000 }),
    )
    .configured(
        "check_1",
        NodeType::Condition,
        "Succeeded?",
        500.0,
        200.0,
        json!({ "expression": "response.status == 200" }),
    )
    .configured(
        "notify_1",
        NodeType::Webhook,
        "Notify",
        700.0,
        120.0,
        json!({ "url": "https://hooks.example.com/workflow" }),
    )
    .node("end_1", NodeType::End, "End", 900.0, 200.0)
    .link("start_1", "call_1")
    .link_via("call_1", Some("response"), "check_1", None)
    .link_via("check_1", Some("true"), "notify_1", None)
    .link_via("check_1", Some("false"), "end_1", None)
    .link("notify_1", "end_1")
    .build()
}
