use thiserror::Error;

/// Errors raised by `GraphStore` mutations.
///
/// Every failing operation leaves the graph exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node type '{type_name}' is not registered in the node catalog")]
    UnknownNodeType { type_name: String },

    #[error("Node '{node_id}' not found in the graph")]
    NodeNotFound { node_id: String },

    #[error("Connection '{connection_id}' not found in the graph")]
    ConnectionNotFound { connection_id: String },

    #[error(
        "A connection from '{from}' to '{to}' with the same condition already exists"
    )]
    DuplicateConnection { from: String, to: String },

    #[error("Node '{node_id}' cannot be connected to itself")]
    SelfConnection { node_id: String },

    #[error("Node '{node_id}' has no port named '{port}'")]
    PortNotFound { node_id: String, port: String },
}

/// Errors that can occur while turning serialized data into a `Graph` or a `Template`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Failed to parse JSON: {0}")]
    Json(String),

    #[error("Node '{node_id}' has an unregistered node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Node id '{0}' appears more than once")]
    DuplicateNodeId(String),

    #[error("Connection id '{0}' appears more than once")]
    DuplicateConnectionId(String),

    #[error(
        "Connection '{connection_id}' references node '{node_id}', which is not part of the template"
    )]
    DanglingReference {
        connection_id: String,
        node_id: String,
    },
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json(err.to_string())
    }
}

/// Errors raised by the template registry and loader.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    #[error("Template '{0}' is already registered")]
    DuplicateTemplate(String),

    #[error("Failed to load template definitions: {0}")]
    Load(#[from] LoadError),
}

/// Errors raised while reading store settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse settings JSON: {0}")]
    Json(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}
