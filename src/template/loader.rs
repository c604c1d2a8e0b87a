use super::{TemplateRegistry, TemplateSummary};
use crate::catalog::{NodeCatalog, PortLayout, config::default_config};
use crate::error::{LoadError, TemplateError};
use crate::ids;
use crate::model::connection::normalize_condition;
use crate::model::{Connection, Graph, Node, merge_config};
use ahash::{AHashMap, AHashSet};

/// Instantiates graphs from the templates in a registry.
///
/// The registry is never mutated; instantiating the same template twice yields two
/// graphs with the same shape and disjoint ids.
pub struct TemplateLoader<'a> {
    catalog: &'a NodeCatalog,
    registry: &'a TemplateRegistry,
    suffix_len: usize,
}

impl<'a> TemplateLoader<'a> {
    pub fn new(catalog: &'a NodeCatalog, registry: &'a TemplateRegistry) -> Self {
        Self {
            catalog,
            registry,
            suffix_len: ids::DEFAULT_SUFFIX_LEN,
        }
    }

    /// Sets the length of the random part of generated ids.
    pub fn with_suffix_length(mut self, suffix_len: usize) -> Self {
        self.suffix_len = suffix_len;
        self
    }

    pub fn catalog(&self) -> &'a NodeCatalog {
        self.catalog
    }

    /// Summaries of the registered templates, optionally restricted to one category.
    ///
    /// The returned iterator is lazy and can be cloned to restart it.
    pub fn list_templates<'s>(
        &'s self,
        category: Option<&'s str>,
    ) -> impl Iterator<Item = TemplateSummary> + Clone + 's {
        self.registry
            .iter()
            .filter(move |t| category.is_none_or(|c| t.has_category(c)))
            .map(|t| t.summary())
    }

    /// Builds a new graph from the template `template_id`.
    ///
    /// Every node and connection receives a fresh id; connection endpoints are
    /// rewritten through the mapping built while the nodes are copied. Conditions
    /// and config are copied verbatim, with node config laid over the catalog
    /// defaults. Relative positions are kept: a template reaching into negative
    /// coordinates is moved as a whole until it fits on the canvas.
    pub fn instantiate(&self, template_id: &str) -> Result<Graph, TemplateError> {
        let template = self
            .registry
            .get(template_id)
            .ok_or_else(|| TemplateError::TemplateNotFound(template_id.to_string()))?;

        let mut id_map: AHashMap<&str, String> = AHashMap::with_capacity(template.nodes.len());
        let mut taken: AHashSet<String> = AHashSet::new();
        let mut graph =
            Graph::new(template.name.clone()).with_description(template.description.clone());
        let shift = template.canvas_shift();

        for template_node in &template.nodes {
            let id = fresh(&mut taken, || {
                ids::node_id(template_node.node_type, self.suffix_len)
            });
            id_map.insert(template_node.id.as_str(), id.clone());

            let mut config = default_config(template_node.node_type);
            merge_config(&mut config, template_node.config.clone());
            let layout = PortLayout::from(template_node.node_type.descriptor());

            graph.nodes.push(Node {
                id,
                node_type: template_node.node_type,
                name: template_node.name.clone(),
                position: template_node.position.offset(shift).clamped(),
                config,
                inputs: layout.inputs,
                outputs: layout.outputs,
                status: None,
            });
        }

        for template_connection in &template.connections {
            let remap = |endpoint: &str| {
                id_map.get(endpoint).cloned().ok_or_else(|| LoadError::DanglingReference {
                    connection_id: template_connection.id.clone(),
                    node_id: endpoint.to_string(),
                })
            };
            let from = remap(&template_connection.from)?;
            let to = remap(&template_connection.to)?;

            graph.connections.push(Connection {
                id: fresh(&mut taken, || ids::connection_id(self.suffix_len)),
                from,
                to,
                from_port: template_connection.from_port.clone(),
                to_port: template_connection.to_port.clone(),
                condition: normalize_condition(template_connection.condition.as_deref()),
                config: template_connection.config.clone(),
            });
        }

        log::info!(
            "Instantiated template '{}' with {} node(s) and {} connection(s)",
            template.id,
            graph.node_count(),
            graph.connection_count()
        );
        Ok(graph)
    }
}

/// Draws ids until one is not yet used in the graph being built.
fn fresh(taken: &mut AHashSet<String>, mut generate: impl FnMut() -> String) -> String {
    loop {
        let id = generate();
        if taken.insert(id.clone()) {
            return id;
        }
    }
}
