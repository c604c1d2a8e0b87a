use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad grouping of node types, used by editors to build their palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Control,
    Integration,
    Agent,
}

/// Static description of one port in a node type's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortDefinition {
    pub name: &'static str,
    pub label: &'static str,
    /// Only meaningful for input ports.
    pub required: bool,
}

/// The structural contract of a node type: ports plus display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub node_type: NodeType,
    pub category: NodeCategory,
    pub label: &'static str,
    pub description: &'static str,
    pub inputs: &'static [PortDefinition],
    pub outputs: &'static [PortDefinition],
}

/// Master macro defining the closed set of node types, their tags and their descriptors.
///
/// Variant order is declaration order; `DESCRIPTORS` is indexed by discriminant.
macro_rules! define_node_types {
    ( $(
        ($variant:ident, $tag:literal, $category:ident, $label:literal, $description:literal,
            in [ $( ($in_name:literal, $in_label:literal, $in_required:literal) ),* $(,)? ],
            out [ $( ($out_name:literal, $out_label:literal) ),* $(,)? ])
    ),* $(,)? ) => {
        /// Every node type a workflow graph can contain.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeType {
            $(
                #[serde(rename = $tag)]
                $variant,
            )*
        }

        static DESCRIPTORS: &[NodeDescriptor] = &[
            $(
                NodeDescriptor {
                    node_type: NodeType::$variant,
                    category: NodeCategory::$category,
                    label: $label,
                    description: $description,
                    inputs: &[ $( PortDefinition { name: $in_name, label: $in_label, required: $in_required } ),* ],
                    outputs: &[ $( PortDefinition { name: $out_name, label: $out_label, required: false } ),* ],
                },
            )*
        ];

        impl NodeType {
            /// All node types in declaration order.
            pub const ALL: &'static [NodeType] = &[ $( NodeType::$variant ),* ];

            /// The wire tag of this type, e.g. `"http_request"`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( NodeType::$variant => $tag, )*
                }
            }

            /// Looks up a type by its canonical tag. Aliases are resolved by `NodeCatalog`.
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( $tag => Some(NodeType::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_node_types! {
    // Control flow
    (Start, "start", Control, "Start", "Entry point of the workflow",
        in [],
        out [("output", "Output")]),
    (End, "end", Control, "End", "Terminates the workflow and returns its result",
        in [("input", "Input", true)],
        out []),
    (Condition, "condition", Control, "Condition", "Routes execution by evaluating an expression",
        in [("input", "Input", true)],
        out [("true", "True"), ("false", "False")]),
    (Parallel, "parallel", Control, "Parallel", "Fans execution out to several branches at once",
        in [("input", "Input", true)],
        out [("branches", "Branches")]),
    (Loop, "loop", Control, "Loop", "Repeats its body until a break condition holds",
        in [("input", "Input", true), ("feedback", "Feedback", false)],
        out [("body", "Body"), ("done", "Done")]),

    // Integrations
    (HttpRequest, "http_request", Integration, "HTTP Request", "Calls an HTTP endpoint",
        in [("input", "Input", true)],
        out [("response", "Response"), ("error", "Error")]),
    (DatabaseQuery, "database_query", Integration, "Database Query", "Runs a query against a configured datasource",
        in [("input", "Input", true)],
        out [("rows", "Rows"), ("error", "Error")]),
    (FileOperation, "file_operation", Integration, "File Operation", "Reads, writes or deletes a file",
        in [("input", "Input", true)],
        out [("output", "Output"), ("error", "Error")]),
    (EmailSend, "email_send", Integration, "Send Email", "Sends an email message",
        in [("input", "Input", true)],
        out [("sent", "Sent"), ("error", "Error")]),
    (Webhook, "webhook", Integration, "Webhook", "Posts a payload to an external webhook",
        in [("payload", "Payload", true)],
        out [("response", "Response")]),

    // Agents
    (RouterAgent, "router_agent", Agent, "Router Agent", "Classifies a request and routes it to a specialist",
        in [("input", "Input", true), ("context", "Context", false)],
        out [("output", "Output"), ("fallback", "Fallback")]),
    (PlanningAgent, "planning_agent", Agent, "Planning Agent", "Breaks a goal into ordered steps",
        in [("input", "Input", true), ("context", "Context", false)],
        out [("output", "Output")]),
    (CustomerServiceAgent, "customer_service_agent", Agent, "Customer Service Agent", "Answers customer requests",
        in [("input", "Input", true), ("context", "Context", false)],
        out [("output", "Output")]),
    (KnowledgeQaAgent, "knowledge_qa_agent", Agent, "Knowledge QA Agent", "Answers questions from a knowledge base",
        in [("input", "Input", true), ("context", "Context", false)],
        out [("output", "Output")]),
    (Text2SqlAgent, "text2sql_agent", Agent, "Text2SQL Agent", "Turns natural language into SQL",
        in [("input", "Input", true), ("context", "Context", false)],
        out [("output", "Output")]),
    (ContentCreationAgent, "content_creation_agent", Agent, "Content Creation Agent", "Drafts written content",
        in [("input", "Input", true), ("context", "Context", false)],
        out [("output", "Output")]),
}

impl NodeType {
    /// The static contract for this type.
    pub fn descriptor(self) -> &'static NodeDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn category(self) -> NodeCategory {
        self.descriptor().category
    }

    pub fn is_agent(self) -> bool {
        self.category() == NodeCategory::Agent
    }

    /// No node type in the catalog accepts a connection to itself.
    pub fn allows_self_loop(self) -> bool {
        false
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_line_up_with_variants() {
        for node_type in NodeType::ALL {
            assert_eq!(node_type.descriptor().node_type, *node_type);
        }
    }

    #[test]
    fn tags_round_trip_through_from_tag() {
        for node_type in NodeType::ALL {
            assert_eq!(NodeType::from_tag(node_type.as_str()), Some(*node_type));
        }
        assert_eq!(NodeType::from_tag("not_a_node"), None);
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&NodeType::KnowledgeQaAgent).unwrap();
        assert_eq!(json, "\"knowledge_qa_agent\"");
        let parsed: NodeType = serde_json::from_str("\"http_request\"").unwrap();
        assert_eq!(parsed, NodeType::HttpRequest);
    }
}
