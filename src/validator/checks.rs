use super::issue::{IssueFix, IssueKind, Severity, ValidationIssue};
use crate::catalog::{NodeType, config::check_config};
use crate::model::{Connection, Graph, Node};
use ahash::AHashMap;
use itertools::Itertools;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::VecDeque;

/// Where an issue sorts: by node insertion order, then check number, then a
/// per-check sequence (port or connection index). Graph-level issues sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct SortKey {
    anchor: usize,
    check: u8,
    seq: usize,
}

/// Adjacency over the graph's live connections, built once per pass.
///
/// Live means both endpoints exist and the connection is not a self-loop; the
/// remaining connections are reported by their own checks.
pub(super) struct GraphIndex<'g> {
    graph: &'g Graph,
    positions: AHashMap<&'g str, usize>,
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
}

impl<'g> GraphIndex<'g> {
    pub(super) fn new(graph: &'g Graph) -> Self {
        let positions: AHashMap<&str, usize> = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let mut incoming = vec![Vec::new(); graph.node_count()];
        let mut outgoing = vec![Vec::new(); graph.node_count()];
        for (c, connection) in graph.connections().iter().enumerate() {
            if connection.is_self_loop() {
                continue;
            }
            if let (Some(&from), Some(&to)) = (
                positions.get(connection.from.as_str()),
                positions.get(connection.to.as_str()),
            ) {
                outgoing[from].push(c);
                incoming[to].push(c);
            }
        }

        Self {
            graph,
            positions,
            incoming,
            outgoing,
        }
    }

    fn node(&self, index: usize) -> &'g Node {
        &self.graph.nodes()[index]
    }

    fn connection(&self, index: usize) -> &'g Connection {
        &self.graph.connections()[index]
    }

    fn position(&self, node_id: &str) -> Option<usize> {
        self.positions.get(node_id).copied()
    }

    fn graph_anchor(&self) -> usize {
        self.graph.node_count()
    }

    /// Connection issues attach to their source node when it exists.
    fn connection_anchor(&self, connection: &Connection) -> usize {
        self.position(&connection.from)
            .unwrap_or_else(|| self.graph_anchor())
    }

    fn successors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.outgoing[index]
            .iter()
            .filter_map(|&c| self.position(&self.connection(c).to))
    }
}

/// Issues collected during a pass, each with its sort key.
#[derive(Default)]
pub(super) struct Findings {
    entries: Vec<(SortKey, ValidationIssue)>,
}

impl Findings {
    fn push(&mut self, anchor: usize, seq: usize, issue: ValidationIssue) {
        let key = SortKey {
            anchor,
            check: issue.kind.check_number(),
            seq,
        };
        self.entries.push((key, issue));
    }

    pub(super) fn into_sorted(self) -> Vec<ValidationIssue> {
        self.entries
            .into_iter()
            .sorted_by_key(|(key, _)| *key)
            .map(|(_, issue)| issue)
            .collect()
    }
}

pub(super) fn orphans(index: &GraphIndex, findings: &mut Findings) {
    for (i, node) in index.graph.nodes().iter().enumerate() {
        if node.is_start() || !index.incoming[i].is_empty() {
            continue;
        }
        findings.push(
            i,
            0,
            ValidationIssue::new(
                IssueKind::Orphan,
                Severity::Warning,
                format!("Node '{}' has no incoming connections", node.name),
            )
            .on_node(&node.id)
            .suggest(format!(
                "Connect an upstream node to '{}' or remove it",
                node.name
            )),
        );
    }
}

pub(super) fn missing_required_inputs(index: &GraphIndex, findings: &mut Findings) {
    for (i, node) in index.graph.nodes().iter().enumerate() {
        for (p, port) in node.inputs.iter().enumerate() {
            if !port.required {
                continue;
            }
            let supplied = index.incoming[i].iter().any(|&c| {
                match &index.connection(c).to_port {
                    Some(target) => *target == port.name,
                    None => p == 0,
                }
            });
            if supplied {
                continue;
            }
            findings.push(
                i,
                p,
                ValidationIssue::new(
                    IssueKind::MissingRequiredInput,
                    Severity::Error,
                    format!(
                        "Required input '{}' of node '{}' is not connected",
                        port.name, node.name
                    ),
                )
                .on_node(&node.id)
                .suggest(format!("Connect a node to the '{}' input", port.name)),
            );
        }
    }
}

pub(super) fn unreachable(index: &GraphIndex, findings: &mut Findings) {
    let node_count = index.graph.node_count();
    let mut reached = vec![false; node_count];
    let mut queue: VecDeque<usize> = (0..node_count)
        .filter(|&i| index.node(i).is_start())
        .collect();
    for &i in &queue {
        reached[i] = true;
    }

    while let Some(current) = queue.pop_front() {
        for next in index.successors(current) {
            if !reached[next] {
                reached[next] = true;
                queue.push_back(next);
            }
        }
    }

    for (i, node) in index.graph.nodes().iter().enumerate() {
        if reached[i] {
            continue;
        }
        findings.push(
            i,
            0,
            ValidationIssue::new(
                IssueKind::Unreachable,
                Severity::Warning,
                format!("Node '{}' cannot be reached from a start node", node.name),
            )
            .on_node(&node.id),
        );
    }
}

pub(super) fn terminal_completeness(index: &GraphIndex, findings: &mut Findings) {
    if index.graph.end_nodes().next().is_none() {
        findings.push(
            index.graph_anchor(),
            0,
            ValidationIssue::new(
                IssueKind::TerminalCompleteness,
                Severity::Error,
                "The workflow has no end node".to_string(),
            )
            .suggest("Add an end node and connect the final step to it"),
        );
    }
}

pub(super) fn dangling_connections(index: &GraphIndex, findings: &mut Findings) {
    for (c, connection) in index.graph.connections().iter().enumerate() {
        let missing = [&connection.from, &connection.to]
            .into_iter()
            .filter(|id| index.position(id).is_none())
            .unique()
            .join("', '");
        if missing.is_empty() {
            continue;
        }
        let mut issue = ValidationIssue::new(
            IssueKind::DanglingConnection,
            Severity::Error,
            format!(
                "Connection '{}' references missing node(s) '{}'",
                connection.id, missing
            ),
        )
        .on_connection(&connection.id)
        .suggest("Remove the connection")
        .with_fix(IssueFix::RemoveConnection {
            connection_id: connection.id.clone(),
        });
        if index.position(&connection.from).is_some() {
            issue = issue.on_node(&connection.from);
        }
        findings.push(index.connection_anchor(connection), c, issue);
    }
}

pub(super) fn duplicate_connections(index: &GraphIndex, findings: &mut Findings) {
    let mut groups: AHashMap<(&str, &str), Vec<usize>> = AHashMap::new();
    let mut order: Vec<(&str, &str)> = Vec::new();
    for i in 0..index.graph.node_count() {
        for &c in &index.outgoing[i] {
            let connection = index.connection(c);
            if !connection.is_unconditional() {
                continue;
            }
            let key = (connection.from.as_str(), connection.to.as_str());
            let group = groups.entry(key).or_default();
            if group.is_empty() {
                order.push(key);
            }
            group.push(c);
        }
    }

    for key in order {
        let Some(group) = groups.get(&key) else {
            continue;
        };
        let Some((&first, rest)) = group.split_first() else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        let keep = index.connection(first);
        let from_name = index.node(index.connection_anchor(keep)).name.as_str();
        let to_name = index
            .position(&keep.to)
            .map(|t| index.node(t).name.as_str())
            .unwrap_or(keep.to.as_str());
        findings.push(
            index.connection_anchor(keep),
            first,
            ValidationIssue::new(
                IssueKind::DuplicateConnection,
                Severity::Warning,
                format!(
                    "{} unconditional connections lead from '{}' to '{}'",
                    group.len(),
                    from_name,
                    to_name
                ),
            )
            .on_node(&keep.from)
            .on_connection(&keep.id)
            .suggest("Merge them into a single connection")
            .with_fix(IssueFix::MergeConnections {
                keep: keep.id.clone(),
                remove: rest
                    .iter()
                    .map(|&c| index.connection(c).id.clone())
                    .collect(),
            }),
        );
    }
}

pub(super) fn missing_start(index: &GraphIndex, findings: &mut Findings) {
    if index.graph.start_nodes().next().is_none() {
        findings.push(
            index.graph_anchor(),
            0,
            ValidationIssue::new(
                IssueKind::MissingStart,
                Severity::Error,
                "The workflow has no start node".to_string(),
            )
            .suggest("Add a start node as the entry point"),
        );
    }
}

pub(super) fn invalid_config(index: &GraphIndex, findings: &mut Findings) {
    for (i, node) in index.graph.nodes().iter().enumerate() {
        if let Err(reason) = check_config(node.node_type, &node.config) {
            findings.push(
                i,
                0,
                ValidationIssue::new(
                    IssueKind::InvalidConfig,
                    Severity::Error,
                    format!("Node '{}' has invalid configuration: {}", node.name, reason),
                )
                .on_node(&node.id),
            );
        }
    }

    for (c, connection) in index.graph.connections().iter().enumerate() {
        if let Err(reason) = connection.settings() {
            let mut issue = ValidationIssue::new(
                IssueKind::InvalidConfig,
                Severity::Error,
                format!(
                    "Connection '{}' has invalid configuration: {}",
                    connection.id, reason
                ),
            )
            .on_connection(&connection.id);
            if index.position(&connection.from).is_some() {
                issue = issue.on_node(&connection.from);
            }
            // Node-level config issues on the same anchor sort first.
            findings.push(index.connection_anchor(connection), c + 1, issue);
        }
    }
}

/// Reports every strongly connected component of two or more nodes left once loop
/// nodes are taken out. A cycle avoiding all loop nodes exists exactly when such a
/// component does.
pub(super) fn cycles(index: &GraphIndex, findings: &mut Findings) {
    let mut flow: DiGraph<usize, ()> = DiGraph::new();
    let mut handles: Vec<Option<NodeIndex>> = vec![None; index.graph.node_count()];
    for (i, node) in index.graph.nodes().iter().enumerate() {
        if node.node_type != NodeType::Loop {
            handles[i] = Some(flow.add_node(i));
        }
    }
    for (i, handle) in handles.iter().enumerate() {
        let Some(from) = *handle else {
            continue;
        };
        for next in index.successors(i) {
            if let Some(to) = handles[next] {
                flow.add_edge(from, to, ());
            }
        }
    }

    for component in tarjan_scc(&flow) {
        if component.len() < 2 {
            continue;
        }
        let members: Vec<usize> = component.iter().map(|&h| flow[h]).sorted().collect();
        let entry = members[0];
        let names = members
            .iter()
            .map(|&n| format!("'{}'", index.node(n).name))
            .join(", ");
        findings.push(
            entry,
            0,
            ValidationIssue::new(
                IssueKind::Cycle,
                Severity::Error,
                format!("Nodes {} form a cycle that passes through no loop node", names),
            )
            .on_node(&index.node(entry).id)
            .suggest("Break the cycle or route it through a loop node"),
        );
    }
}

pub(super) fn dead_ends(index: &GraphIndex, findings: &mut Findings) {
    for (i, node) in index.graph.nodes().iter().enumerate() {
        if node.is_end() || !index.outgoing[i].is_empty() {
            continue;
        }
        findings.push(
            i,
            0,
            ValidationIssue::new(
                IssueKind::DeadEnd,
                Severity::Info,
                format!("Output of node '{}' is not used by any other node", node.name),
            )
            .on_node(&node.id),
        );
    }
}

pub(super) fn self_connections(index: &GraphIndex, findings: &mut Findings) {
    for (c, connection) in index.graph.connections().iter().enumerate() {
        let Some(anchor) = index.position(&connection.from) else {
            continue;
        };
        if !connection.is_self_loop() {
            continue;
        }
        findings.push(
            anchor,
            c,
            ValidationIssue::new(
                IssueKind::SelfConnection,
                Severity::Error,
                format!(
                    "Connection '{}' connects node '{}' to itself",
                    connection.id,
                    index.node(anchor).name
                ),
            )
            .on_node(&connection.from)
            .on_connection(&connection.id)
            .suggest("Remove the connection")
            .with_fix(IssueFix::RemoveConnection {
                connection_id: connection.id.clone(),
            }),
        );
    }
}
