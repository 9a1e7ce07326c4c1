use thiserror::Error;

/// Errors raised while building or querying a [`crate::dag::Dag`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DagError {
    /// A declaration references a parent that has not been declared yet.
    /// Covers forward references and cycles alike.
    #[error("invalid graph: node {child} contains parent ({parent}) not in graph yet")]
    UnknownParent { child: String, parent: String },

    #[error("node {name} not present in graph")]
    NotFound { name: String },

    #[error("node {name} declared more than once")]
    DuplicateNode { name: String },

    #[error("malformed declaration on line {line}: {reason}")]
    MalformedDeclaration { line: usize, reason: String },
}

impl DagError {
    pub fn unknown_parent(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::UnknownParent {
            child: child.into(),
            parent: parent.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DagError>;
