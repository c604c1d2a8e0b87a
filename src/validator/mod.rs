//! Structural validation of workflow graphs.
//!
//! A validation pass runs a fixed sequence of checks over a read-only `Graph` and
//! returns every finding as a `ValidationIssue`. Issues are ordered by the insertion
//! index of the node they concern, then by check number; graph-level issues come last.
//! The validator holds no state between passes, so validating an unchanged graph
//! twice yields identical lists.

use crate::catalog::NodeCatalog;
use crate::model::{ConfigMap, Graph};
use crate::store::GraphStore;

mod checks;
mod issue;

pub use issue::{GraphState, IssueFix, IssueKind, Severity, ValidationIssue, ValidationReport};

use checks::{Findings, GraphIndex};

/// Runs the structural checks and applies their fixes.
pub struct Validator<'c> {
    catalog: &'c NodeCatalog,
}

impl<'c> Validator<'c> {
    pub fn new(catalog: &'c NodeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c NodeCatalog {
        self.catalog
    }

    /// Runs every check over `graph` and returns the issues in report order.
    pub fn validate(&self, graph: &Graph) -> Vec<ValidationIssue> {
        let index = GraphIndex::new(graph);
        let mut findings = Findings::default();

        checks::orphans(&index, &mut findings);
        checks::missing_required_inputs(&index, &mut findings);
        checks::unreachable(&index, &mut findings);
        checks::terminal_completeness(&index, &mut findings);
        checks::dangling_connections(&index, &mut findings);
        checks::duplicate_connections(&index, &mut findings);
        checks::missing_start(&index, &mut findings);
        checks::invalid_config(&index, &mut findings);
        checks::cycles(&index, &mut findings);
        checks::dead_ends(&index, &mut findings);
        checks::self_connections(&index, &mut findings);

        let issues = findings.into_sorted();
        log::info!(
            "Validated '{}': {} issue(s), {} error(s)",
            graph.name,
            issues.len(),
            issues.iter().filter(|i| i.is_error()).count()
        );
        issues
    }

    /// Like `validate`, wrapped with the overall verdict.
    pub fn report(&self, graph: &Graph) -> ValidationReport {
        ValidationReport::new(self.validate(graph))
    }

    /// Applies the fix attached to `issue` through the store's mutators.
    ///
    /// Returns `false` when the issue is not fixable or the fix no longer applies.
    /// The caller re-validates afterwards; fixes are never chained.
    pub fn fix(&self, store: &mut GraphStore<'_>, issue: &ValidationIssue) -> bool {
        let Some(fix) = issue.fix.as_ref().filter(|_| issue.fixable) else {
            return false;
        };

        match fix {
            IssueFix::RemoveConnection { connection_id } => {
                store.remove_connection(connection_id).is_some()
            }
            IssueFix::MergeConnections { keep, remove } => {
                let Some(kept) = store.graph().connection(keep) else {
                    log::warn!("Cannot merge into connection '{}': it no longer exists", keep);
                    return false;
                };

                let mut inherited = ConfigMap::new();
                for id in remove {
                    let Some(other) = store.graph().connection(id) else {
                        continue;
                    };
                    for (key, value) in &other.config {
                        if !kept.config.contains_key(key) && !inherited.contains_key(key) {
                            inherited.insert(key.clone(), value.clone());
                        }
                    }
                }

                if store.update_connection_config(keep, inherited).is_err() {
                    return false;
                }
                let removed = remove
                    .iter()
                    .filter(|id| store.remove_connection(id).is_some())
                    .count();
                log::debug!("Merged {} connection(s) into '{}'", removed, keep);
                removed > 0
            }
        }
    }

    /// Applies every fixable issue of one pass in order and returns how many applied.
    pub fn fix_all(&self, store: &mut GraphStore<'_>) -> usize {
        let issues = self.validate(store.graph());
        issues.iter().filter(|issue| self.fix(store, issue)).count()
    }
}
