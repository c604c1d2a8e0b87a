use serde::{Deserialize, Serialize};

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// The check that produced an issue. Declaration order is check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A non-start node without incoming connections.
    Orphan,
    /// A required input port with nothing connected to it.
    MissingRequiredInput,
    /// A node no start node can reach.
    Unreachable,
    /// The graph has no end node.
    TerminalCompleteness,
    /// A connection whose endpoint node does not exist.
    DanglingConnection,
    /// Several unconditional connections between the same ordered pair of nodes.
    DuplicateConnection,
    /// The graph has no start node.
    MissingStart,
    /// A config value whose shape does not fit the node family or connection settings.
    InvalidConfig,
    /// A cycle that does not pass through a loop node.
    Cycle,
    /// A non-end node without outgoing connections.
    DeadEnd,
    /// A connection from a node to itself.
    SelfConnection,
}

impl IssueKind {
    /// One-based position of the check in a validation pass.
    pub fn check_number(self) -> u8 {
        self as u8 + 1
    }
}

/// The mutation that resolves a fixable issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum IssueFix {
    RemoveConnection {
        connection_id: String,
    },
    /// Keep one connection, fold the others' config into it and remove them.
    MergeConnections {
        keep: String,
        remove: Vec<String>,
    },
}

/// One finding of a validation pass. Never persisted; regenerated on every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub fixable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<IssueFix>,
}

impl ValidationIssue {
    pub(super) fn new(kind: IssueKind, severity: Severity, message: String) -> Self {
        Self {
            kind,
            severity,
            message,
            node_id: None,
            connection_id: None,
            suggestion: None,
            fixable: false,
            fix: None,
        }
    }

    pub(super) fn on_node(mut self, node_id: &str) -> Self {
        self.node_id = Some(node_id.to_string());
        self
    }

    pub(super) fn on_connection(mut self, connection_id: &str) -> Self {
        self.connection_id = Some(connection_id.to_string());
        self
    }

    pub(super) fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub(super) fn with_fix(mut self, fix: IssueFix) -> Self {
        self.fixable = true;
        self.fix = Some(fix);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The two observable states of a graph under validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphState {
    /// No error-severity issues.
    Valid,
    /// At least one error-severity issue.
    Invalid,
}

/// The result of one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: !issues.iter().any(ValidationIssue::is_error),
            issues,
        }
    }

    pub fn state(&self) -> GraphState {
        if self.is_valid {
            GraphState::Valid
        } else {
            GraphState::Invalid
        }
    }

    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.with_severity(Severity::Warning)
    }

    pub fn infos(&self) -> Vec<&ValidationIssue> {
        self.with_severity(Severity::Info)
    }

    pub fn fixable(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.fixable)
    }

    fn with_severity(&self, severity: Severity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }
}
