//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kumitate crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use kumitate::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let catalog = NodeCatalog::new();
//! let json = std::fs::read_to_string("path/to/workflow.json")?;
//! let graph = Graph::from_json(&json, &catalog)?;
//!
//! let report = Validator::new(&catalog).report(&graph);
//! println!("Valid: {}", report.is_valid);
//! # Ok(())
//! # }
//! ```

// Catalog
pub use crate::catalog::{NodeCatalog, NodeCategory, NodeDescriptor, NodeType, PortLayout};

// Graph model
pub use crate::model::{
    ConfigMap, Connection, ConnectionConfig, Graph, IntoGraph, Node, NodeStatus, Port, Position,
};

// Editing
pub use crate::store::{GraphStore, NewConnection, StoreConfig};

// Templates
pub use crate::template::{Template, TemplateLoader, TemplateRegistry, TemplateSummary};

// Validation
pub use crate::validator::{
    GraphState, IssueFix, IssueKind, Severity, ValidationIssue, ValidationReport, Validator,
};

// Error types
pub use crate::error::{ConfigError, GraphError, LoadError, TemplateError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
