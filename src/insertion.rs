//! Splicing a node in above an existing one.

use tracing::{debug, instrument, warn};

use crate::errors::{TreeError, TreeResult};
use crate::tree::Tree;

impl<T> Tree<T> {
    /// Inserts a new, empty node above this one.
    ///
    /// * This node becomes the new node's only child.
    /// * If this node had a parent, the new node takes its place at the same
    ///   child index; otherwise the new node is a new root.
    ///
    /// Returns the new node.
    pub fn insert_new_tree_above(&self) -> TreeResult<Tree<T>> {
        let above = Tree::new(None);
        self.insert_above(&above)?;
        Ok(above)
    }

    /// Splices `above` into this node's position and moves this node under it.
    ///
    /// `above` is detached from any previous parent first. Children it already
    /// has are kept, and this node is appended after them.
    #[instrument(level = "trace", skip_all, fields(node = %self.id(), above = %above.id()))]
    pub fn insert_above(&self, above: &Tree<T>) -> TreeResult<()> {
        if let Err(e) = self.check_splice(above) {
            warn!("insert_above rejected: {}", e);
            return Err(e);
        }

        above.remove_from_parent();
        if let Some(parent) = self.parent() {
            // Recomputed: detaching `above` may have shifted earlier siblings.
            let index = parent
                .position_of(self.id())
                .ok_or_else(|| missing_from_parent(self, &parent))?;
            parent.node.borrow_mut().children[index] = above.clone();
            above.set_parent(Some(&parent));
        }
        self.set_parent(Some(above));
        above.node.borrow_mut().children.push(self.clone());
        debug!("inserted node above");
        Ok(())
    }

    fn check_splice(&self, above: &Tree<T>) -> TreeResult<()> {
        let above_id = above.id();
        if above_id == self.id() {
            return Err(TreeError::SelfReference);
        }
        if self.contains_id(above_id) {
            return Err(TreeError::DescendantCycle);
        }
        if above.contains_id(self.id()) {
            return Err(TreeError::AncestorCycle);
        }
        if let Some(parent) = self.parent() {
            if parent.position_of(self.id()).is_none() {
                return Err(missing_from_parent(self, &parent));
            }
            // A sibling may move into this slot, a different node with its id may not.
            let clashing_sibling = parent
                .children()
                .into_iter()
                .any(|sibling| sibling.id() == above_id && !sibling.ptr_eq(above));
            if clashing_sibling {
                return Err(TreeError::DuplicateChild);
            }
        }
        Ok(())
    }
}

fn missing_from_parent<T>(node: &Tree<T>, parent: &Tree<T>) -> TreeError {
    TreeError::InternalConsistency(format!(
        "node {} has parent {} but no child index",
        node.id(),
        parent.id()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_root_when_inserting_new_tree_above_then_new_root() {
        let sut = Tree::with_content("sut".to_string());
        let parent = sut.insert_new_tree_above().unwrap();

        assert!(!sut.is_root());
        assert!(sut.is_leaf());
        assert!(parent.is_root());
        assert!(parent.contains(&sut));
        assert!(!sut.contains(&parent));
        assert_eq!(parent.content(), None);
    }

    #[test]
    fn given_parent_when_inserting_new_tree_above_then_nested_between() {
        let sut = Tree::with_content("sut".to_string());
        let original_parent = sut.insert_new_tree_above().unwrap();
        let new_parent = sut.insert_new_tree_above().unwrap();

        assert!(original_parent.is_root());
        assert!(!original_parent.is_leaf());
        assert!(original_parent.contains(&new_parent));
        assert!(original_parent.contains(&sut));
        assert!(!new_parent.is_root());
        assert!(!new_parent.is_leaf());
        assert!(new_parent.contains(&sut));
        assert!(!sut.is_root());
        assert!(sut.is_leaf());
        assert!(!sut.contains(&original_parent));
        assert!(!sut.contains(&new_parent));
    }

    #[test]
    fn given_earlier_sibling_when_inserted_above_then_takes_shifted_slot() {
        let root: Tree<u8> = Tree::default();
        let a = Tree::default();
        let b = Tree::default();
        let c = Tree::default();
        for child in [&a, &b, &c] {
            root.append_child(child).unwrap();
        }

        c.insert_above(&a).unwrap();

        let ids: Vec<_> = root.children().iter().map(Tree::id).collect();
        assert_eq!(ids, vec![b.id(), a.id()]);
        assert!(c.parent().unwrap().ptr_eq(&a));
        root.validate().unwrap();
    }

    #[test]
    fn given_parent_when_inserted_above_then_cycle_rejected() {
        let root: Tree<u8> = Tree::default();
        let child = Tree::default();
        root.append_child(&child).unwrap();

        assert_eq!(child.insert_above(&root), Err(TreeError::AncestorCycle));
        assert_eq!(root.insert_above(&child), Err(TreeError::DescendantCycle));
        assert_eq!(child.insert_above(&child), Err(TreeError::SelfReference));
        root.validate().unwrap();
    }
}
