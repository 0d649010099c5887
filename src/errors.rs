use thiserror::Error;

/// Errors raised by mutating tree operations.
///
/// Every operation that returns one of these has left the tree unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("cannot add a node to itself")]
    SelfReference,

    #[error("node is already a child of the target")]
    DuplicateChild,

    #[error("node is already a descendant of the target")]
    DescendantCycle,

    #[error("node contains the target, insertion would create a cycle")]
    AncestorCycle,

    #[error("child index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("arena handle is no longer valid")]
    InvalidHandle,

    #[error("internal tree invariant violated: {0}")]
    InternalConsistency(String),
}

impl TreeError {
    /// True for the variants that guard acyclicity.
    pub fn is_cycle(&self) -> bool {
        matches!(self, TreeError::DescendantCycle | TreeError::AncestorCycle)
    }
}

pub type TreeResult<T> = Result<T, TreeError>;
