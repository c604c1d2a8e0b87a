//! Workflow templates: immutable, named graph blueprints.
//!
//! A template's ids are placeholders. `TemplateLoader::instantiate` turns a template
//! into a fresh `Graph` where every node and connection gets a newly generated id.

use crate::catalog::{NodeCatalog, NodeType};
use crate::error::{LoadError, TemplateError};
use crate::model::{ConfigMap, Position};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

mod builtin;
mod loader;

pub use loader::TemplateLoader;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    pub position: Position,
    /// Overrides applied on top of the catalog defaults.
    pub config: ConfigMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConnection {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub config: ConfigMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Open set of tags such as `recommended` or `data-processing`.
    pub categories: Vec<String>,
    pub nodes: Vec<TemplateNode>,
    pub connections: Vec<TemplateConnection>,
}

impl Template {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            categories: self.categories.clone(),
            node_count: self.nodes.len(),
            connection_count: self.connections.len(),
        }
    }

    /// Offset that moves the leftmost and topmost nodes onto the canvas edge when
    /// the template reaches into negative coordinates. Zero otherwise.
    pub fn canvas_shift(&self) -> Position {
        let finite = |v: f64| v.is_finite().then_some(v);
        let min_x = self.nodes.iter().filter_map(|n| finite(n.position.x)).fold(0.0, f64::min);
        let min_y = self.nodes.iter().filter_map(|n| finite(n.position.y)).fold(0.0, f64::min);
        Position::new(-min_x, -min_y)
    }

    /// Checks internal consistency: unique ids and connections that stay inside the template.
    fn check(&self) -> Result<(), LoadError> {
        let mut node_ids = AHashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(LoadError::DuplicateNodeId(node.id.clone()));
            }
        }
        let mut connection_ids = AHashSet::new();
        for connection in &self.connections {
            if !connection_ids.insert(connection.id.as_str()) {
                return Err(LoadError::DuplicateConnectionId(connection.id.clone()));
            }
            for endpoint in [&connection.from, &connection.to] {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(LoadError::DanglingReference {
                        connection_id: connection.id.clone(),
                        node_id: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// What the template picker shows for one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    pub node_count: usize,
    pub connection_count: usize,
}

// --- Wire format for template definitions ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemplate {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, alias = "category")]
    categories: Vec<String>,
    nodes: Vec<RawTemplateNode>,
    #[serde(default, alias = "edges")]
    connections: Vec<TemplateConnection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemplateNode {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    name: Option<String>,
    position: Position,
    #[serde(default)]
    config: ConfigMap,
}

impl RawTemplate {
    fn into_template(self, catalog: &NodeCatalog) -> Result<Template, LoadError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|raw| {
                let node_type =
                    catalog
                        .resolve(&raw.node_type)
                        .ok_or_else(|| LoadError::UnknownNodeType {
                            node_id: raw.id.clone(),
                            type_name: raw.node_type.clone(),
                        })?;
                Ok(TemplateNode {
                    name: raw
                        .name
                        .unwrap_or_else(|| node_type.descriptor().label.to_string()),
                    id: raw.id,
                    node_type,
                    position: raw.position,
                    config: raw.config,
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        Ok(Template {
            id: self.id,
            name: self.name,
            description: self.description,
            categories: self.categories,
            nodes,
            connections: self.connections,
        })
    }
}

/// Read-only set of templates, loaded once and handed to a `TemplateLoader`.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
}

impl TemplateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The templates shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            templates: builtin::templates(),
        }
    }

    /// Loads template definitions from a JSON array.
    pub fn from_json(json: &str, catalog: &NodeCatalog) -> Result<Self, TemplateError> {
        let mut registry = Self::new();
        registry.extend_from_json(json, catalog)?;
        Ok(registry)
    }

    /// Adds the templates in a JSON array. Nothing is added if any definition is invalid.
    pub fn extend_from_json(
        &mut self,
        json: &str,
        catalog: &NodeCatalog,
    ) -> Result<(), TemplateError> {
        let raw: Vec<RawTemplate> = serde_json::from_str(json).map_err(LoadError::from)?;
        let templates = raw
            .into_iter()
            .map(|t| t.into_template(catalog))
            .collect::<Result<Vec<_>, LoadError>>()?;

        let mut seen: AHashSet<&str> = self.templates.iter().map(|t| t.id.as_str()).collect();
        for template in &templates {
            template.check()?;
            if !seen.insert(template.id.as_str()) {
                return Err(TemplateError::DuplicateTemplate(template.id.clone()));
            }
        }

        log::info!("Loaded {} template definition(s)", templates.len());
        self.templates.extend(templates);
        Ok(())
    }

    pub fn register(&mut self, template: Template) -> Result<(), TemplateError> {
        template.check()?;
        if self.get(&template.id).is_some() {
            return Err(TemplateError::DuplicateTemplate(template.id));
        }
        self.templates.push(template);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
