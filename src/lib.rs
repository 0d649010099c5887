//! Strongly-typed trees with owning child links and weak parent links.
//!
//! [`Tree`] is the node type: every node owns its children, observes its
//! parent without owning it, and carries an optional payload. Mutations keep
//! the tree free of cycles, duplicate siblings and stale parent links, or
//! fail without changing anything.

pub mod arena;
pub mod cli;
mod codec;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod id;
mod insertion;
pub mod ticket;
pub mod tree;
pub mod tree_traits;
pub mod util;

pub use arena::{ArenaNode, TreeArena};
pub use errors::{TreeError, TreeResult};
pub use id::Id;
pub use ticket::Ticket;
pub use tree::{Descendants, Tree, TreeId, WeakTree};
pub use tree_traits::TreeNodeConvert;
