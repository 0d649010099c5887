use std::fmt::Display;

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::arena::TreeArena;
use crate::tree::{Tree, TreeId};

/// Conversion into a printable `termtree` structure.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> TermTree<String> {
        self.to_tree_string_with(false)
    }

    /// Like `to_tree_string`, optionally appending each node's id.
    fn to_tree_string_with(&self, show_ids: bool) -> TermTree<String>;
}

fn label<T: Display>(id: TreeId<T>, content: Option<&T>, show_ids: bool) -> String {
    match (content, show_ids) {
        (Some(content), false) => content.to_string(),
        (Some(content), true) => format!("{content} [{id}]"),
        (None, _) => format!("[{id}]"),
    }
}

impl<T: Display> TreeNodeConvert for Tree<T> {
    #[instrument(level = "trace", skip_all)]
    fn to_tree_string_with(&self, show_ids: bool) -> TermTree<String> {
        let root = self.map_content(|content| label(self.id(), content, show_ids));

        // Recursively construct the children
        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|child| child.to_tree_string_with(show_ids))
            .collect();

        TermTree::new(root).with_leaves(leaves)
    }
}

impl<T: Display> TreeNodeConvert for TreeArena<T> {
    fn to_tree_string_with(&self, show_ids: bool) -> TermTree<String> {
        fn build_tree<T: Display>(
            arena: &TreeArena<T>,
            node_idx: generational_arena::Index,
            show_ids: bool,
        ) -> TermTree<String> {
            let Some(node) = arena.get_node(node_idx) else {
                return TermTree::new("<removed>".to_string());
            };
            let leaves: Vec<_> = node
                .children()
                .iter()
                .map(|&child| build_tree(arena, child, show_ids))
                .collect();
            TermTree::new(label(node.id(), node.content(), show_ids)).with_leaves(leaves)
        }

        match self.root() {
            Some(root_idx) => build_tree(self, root_idx, show_ids),
            None => TermTree::new("Empty tree".to_string()),
        }
    }
}
