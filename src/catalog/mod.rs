//! The node catalog: a fixed registry mapping node-type tags to their structural contract.
//!
//! The set of node types is closed (`NodeType`); the catalog adds a lookup layer on
//! top of it so that graphs produced by other editors can use their own tag names
//! via aliases, much like a type mapping.

use crate::model::{ConfigMap, Port};
use ahash::AHashMap;

pub mod config;
mod types;

pub use config::{
    AgentConfig, ConditionConfig, DatabaseQueryConfig, EmailSendConfig, EndConfig, FileAction,
    FileOperationConfig, HttpMethod, HttpRequestConfig, LoopConfig, MemoryConfig, ParallelConfig,
    StartConfig, WebhookConfig,
};
pub use types::{NodeCategory, NodeDescriptor, NodeType, PortDefinition};

/// The input and output ports a node type is created with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortLayout {
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
}

impl PortLayout {
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

impl From<&NodeDescriptor> for PortLayout {
    fn from(descriptor: &NodeDescriptor) -> Self {
        Self {
            inputs: descriptor.inputs.iter().map(Port::from).collect(),
            outputs: descriptor.outputs.iter().map(Port::from).collect(),
        }
    }
}

/// Read-only lookup from node-type tag to ports, default config and display metadata.
///
/// All lookups are pure. A catalog is cheap to build and safe to share across threads.
#[derive(Debug, Clone)]
pub struct NodeCatalog {
    aliases: AHashMap<String, NodeType>,
}

pub struct NodeCatalogBuilder {
    aliases: AHashMap<String, NodeType>,
}

impl NodeCatalogBuilder {
    pub fn new() -> Self {
        Self {
            aliases: AHashMap::new(),
        }
    }

    /// Makes `alias` resolve to the built-in type tagged `canonical`.
    ///
    /// Unknown canonical tags are ignored.
    pub fn with_alias(mut self, alias: &str, canonical: &str) -> Self {
        match NodeType::from_tag(canonical) {
            Some(node_type) => {
                self.aliases.insert(alias.to_string(), node_type);
            }
            None => log::warn!(
                "Ignoring alias '{}': '{}' is not a registered node type",
                alias,
                canonical
            ),
        }
        self
    }

    pub fn build(self) -> NodeCatalog {
        NodeCatalog {
            aliases: self.aliases,
        }
    }
}

impl Default for NodeCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeCatalog {
    /// A catalog holding only the built-in tags.
    pub fn new() -> Self {
        NodeCatalogBuilder::new().build()
    }

    pub fn builder() -> NodeCatalogBuilder {
        NodeCatalogBuilder::new()
    }

    /// Resolves a tag (canonical or alias) to its node type.
    pub fn resolve(&self, tag: &str) -> Option<NodeType> {
        NodeType::from_tag(tag).or_else(|| self.aliases.get(tag).copied())
    }

    pub fn descriptor(&self, tag: &str) -> Option<&'static NodeDescriptor> {
        self.resolve(tag).map(NodeType::descriptor)
    }

    /// Canonical ports for `tag`. Unregistered tags yield an empty layout.
    pub fn ports_for_type(&self, tag: &str) -> PortLayout {
        self.descriptor(tag).map(PortLayout::from).unwrap_or_default()
    }

    /// Default config for `tag`. Unregistered tags yield an empty map.
    pub fn default_config(&self, tag: &str) -> ConfigMap {
        self.resolve(tag)
            .map(config::default_config)
            .unwrap_or_default()
    }

    pub fn is_agent_type(&self, tag: &str) -> bool {
        self.resolve(tag).is_some_and(NodeType::is_agent)
    }

    /// All descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static NodeDescriptor> + Clone {
        NodeType::ALL.iter().map(|t| t.descriptor())
    }
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self::new()
    }
}
