//! Tree nodes with owning child links and weak parent links.
//!
//! A [`Tree`] is a handle onto shared node state. Cloning the handle does not
//! copy the node: both handles observe and mutate the same node. Children are
//! held through strong `Rc`s, the parent through a `Weak`, so dropping the last
//! handle to a detached subtree releases the whole subtree.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, instrument, warn};

use crate::errors::{TreeError, TreeResult};
use crate::id::Id;

/// Identifier domain of tree nodes.
pub type TreeId<T> = Id<Tree<T>>;

pub(crate) type TreeNodeRef<T> = Rc<RefCell<TreeNode<T>>>;
pub(crate) type WeakTreeNodeRef<T> = Weak<RefCell<TreeNode<T>>>;

#[derive(Debug)]
pub(crate) struct TreeNode<T> {
    pub(crate) id: TreeId<T>,
    pub(crate) content: Option<T>,
    pub(crate) parent: WeakTreeNodeRef<T>,
    pub(crate) children: Vec<Tree<T>>,
}

// Releases descendants from an explicit stack; the default recursive drop
// overflows on deep chains.
impl<T> Drop for TreeNode<T> {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(child) = stack.pop() {
            // Nodes still held elsewhere stay alive with their subtree.
            if let Ok(cell) = Rc::try_unwrap(child.node) {
                stack.append(&mut cell.into_inner().children);
            }
        }
    }
}

/// A node of a tree, which is itself the root of its own subtree.
pub struct Tree<T> {
    pub(crate) node: TreeNodeRef<T>,
}

/// Non-owning handle to a node, used to observe whether it is still alive.
pub struct WeakTree<T> {
    node: WeakTreeNodeRef<T>,
}

impl<T> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<T> Clone for WeakTree<T> {
    fn clone(&self) -> Self {
        Self {
            node: Weak::clone(&self.node),
        }
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("Tree")
            .field("id", &node.id)
            .field("content", &node.content)
            .field("children", &node.children)
            .finish()
    }
}

impl<T> WeakTree<T> {
    pub fn upgrade(&self) -> Option<Tree<T>> {
        self.node.upgrade().map(|node| Tree { node })
    }

    pub fn is_alive(&self) -> bool {
        self.node.strong_count() > 0
    }
}

impl<T> Tree<T> {
    /// Creates a root node with a fresh identifier and no children.
    pub fn new(content: Option<T>) -> Self {
        Self::from_parts(Id::new(), content, Vec::new())
    }

    pub fn with_content(content: T) -> Self {
        Self::new(Some(content))
    }

    /// Builds a node from already materialized children and wires their
    /// parent links back to the new node.
    ///
    /// Callers guarantee the children are roots with distinct ids.
    pub(crate) fn from_parts(id: TreeId<T>, content: Option<T>, children: Vec<Tree<T>>) -> Self {
        let tree = Self {
            node: Rc::new(RefCell::new(TreeNode {
                id,
                content,
                parent: Weak::new(),
                children,
            })),
        };
        for child in &tree.node.borrow().children {
            child.set_parent(Some(&tree));
        }
        tree
    }

    pub fn id(&self) -> TreeId<T> {
        self.node.borrow().id
    }

    /// True if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Tree<T>) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    pub fn downgrade(&self) -> WeakTree<T> {
        WeakTree {
            node: Rc::downgrade(&self.node),
        }
    }

    pub fn parent(&self) -> Option<Tree<T>> {
        self.node.borrow().parent.upgrade().map(|node| Tree { node })
    }

    pub fn children(&self) -> Vec<Tree<T>> {
        self.node.borrow().children.clone()
    }

    pub fn child(&self, index: usize) -> Option<Tree<T>> {
        self.node.borrow().children.get(index).cloned()
    }

    pub fn child_count(&self) -> usize {
        self.node.borrow().children.len()
    }

    pub fn content(&self) -> Option<T>
    where
        T: Clone,
    {
        self.node.borrow().content.clone()
    }

    /// Runs `f` against the payload without cloning it.
    pub fn map_content<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.node.borrow().content.as_ref())
    }

    /// Replaces the payload, returning the previous one.
    pub fn set_content(&self, content: Option<T>) -> Option<T> {
        std::mem::replace(&mut self.node.borrow_mut().content, content)
    }

    pub fn take_content(&self) -> Option<T> {
        self.node.borrow_mut().content.take()
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.node.borrow().children.is_empty()
    }

    /// Tests whether this node, or any of its descendants, has the id of `other`.
    ///
    /// A node always contains itself.
    pub fn contains(&self, other: &Tree<T>) -> bool {
        self.contains_id(other.id())
    }

    pub fn contains_id(&self, id: TreeId<T>) -> bool {
        self.descendants().any(|node| node.id() == id)
    }

    /// Pre-order walk of this subtree, starting with this node.
    pub fn descendants(&self) -> Descendants<T> {
        Descendants {
            stack: vec![self.clone()],
        }
    }

    /// True if walking parent links from this node (exclusive) reaches `candidate`.
    pub fn has_ancestor(&self, candidate: &Tree<T>) -> bool {
        let candidate_id = candidate.id();
        let mut current = self.parent();
        while let Some(ancestor) = current {
            if ancestor.id() == candidate_id {
                return true;
            }
            current = ancestor.parent();
        }
        false
    }

    /// The topmost ancestor. A node without a parent is its own root.
    pub fn root(&self) -> Tree<T> {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    pub fn depth_from_root(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent();
        }
        depth
    }

    /// Position of this node within its parent's children, `None` for a root.
    pub fn child_index(&self) -> Option<usize> {
        self.parent()?.position_of(self.id())
    }

    /// Sum of the child indices along the path from this node up to the root.
    pub fn offset_from_root(&self) -> usize {
        // Only the root lacks an index; `validate` reports a missing back-link.
        std::iter::successors(Some(self.clone()), Tree::parent)
            .filter_map(|node| node.child_index())
            .sum()
    }

    /// Number of nodes in this subtree, including this node.
    pub fn size(&self) -> usize {
        self.descendants().count()
    }

    /// Number of levels in this subtree; a leaf has height 1.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self.clone(), 1)];
        while let Some((current, level)) = stack.pop() {
            height = height.max(level);
            let node = current.node.borrow();
            stack.extend(node.children.iter().map(|child| (child.clone(), level + 1)));
        }
        height
    }

    /// Leaves of this subtree in left-to-right order.
    pub fn leaves(&self) -> Vec<Tree<T>> {
        self.descendants().filter(|node| node.is_leaf()).collect()
    }

    /// Depth-first search of this subtree by id.
    pub fn find(&self, id: TreeId<T>) -> Option<Tree<T>> {
        self.descendants().find(|node| node.id() == id)
    }

    pub(crate) fn position_of(&self, id: TreeId<T>) -> Option<usize> {
        self.node
            .borrow()
            .children
            .iter()
            .position(|child| child.id() == id)
    }

    pub(crate) fn set_parent(&self, parent: Option<&Tree<T>>) {
        self.node.borrow_mut().parent = match parent {
            Some(parent) => Rc::downgrade(&parent.node),
            None => Weak::new(),
        };
    }

    /// Broad check shared by `append_child`, `insert_child` and `replace_child`.
    fn check_insertable(&self, child: &Tree<T>) -> TreeResult<()> {
        let child_id = child.id();
        if child_id == self.id() {
            return Err(TreeError::SelfReference);
        }
        if self.position_of(child_id).is_some() {
            return Err(TreeError::DuplicateChild);
        }
        if self.contains_id(child_id) {
            return Err(TreeError::DescendantCycle);
        }
        if child.contains_id(self.id()) {
            return Err(TreeError::AncestorCycle);
        }
        Ok(())
    }

    /// Moves `child` under this node: detaches it from any previous parent
    /// and points its parent link here. The caller places it in `children`.
    fn adopt(&self, child: &Tree<T>) {
        child.remove_from_parent();
        child.set_parent(Some(self));
    }

    /// Appends `child` to the end of the children.
    ///
    /// Rejects the child if this node already contains it anywhere in its
    /// subtree, or if the child contains this node. A child that still has
    /// another parent is moved.
    #[instrument(level = "trace", skip_all, fields(parent = %self.id(), child = %child.id()))]
    pub fn append_child(&self, child: &Tree<T>) -> TreeResult<()> {
        if let Err(e) = self.check_insertable(child) {
            warn!("append_child rejected: {}", e);
            return Err(e);
        }
        self.adopt(child);
        self.node.borrow_mut().children.push(child.clone());
        debug!("appended child");
        Ok(())
    }

    /// Adds `child` with the narrow duplicate check: only this node's own id
    /// and its direct children are compared.
    ///
    /// A deeper descendant may be added; it is moved up to become a direct
    /// child. Inserting an ancestor of this node is still rejected.
    #[instrument(level = "trace", skip_all, fields(parent = %self.id(), child = %child.id()))]
    pub fn add(&self, child: &Tree<T>) -> TreeResult<()> {
        let child_id = child.id();
        let result = if child_id == self.id() {
            Err(TreeError::SelfReference)
        } else if self.position_of(child_id).is_some() {
            Err(TreeError::DuplicateChild)
        } else if child.contains_id(self.id()) {
            Err(TreeError::AncestorCycle)
        } else {
            Ok(())
        };
        if let Err(e) = result {
            warn!("add rejected: {}", e);
            return Err(e);
        }
        self.adopt(child);
        self.node.borrow_mut().children.push(child.clone());
        debug!("added child");
        Ok(())
    }

    /// Inserts `child` at `index`, shifting later children right.
    ///
    /// Structural errors take precedence over `IndexOutOfBounds`.
    #[instrument(level = "trace", skip_all, fields(parent = %self.id(), child = %child.id(), index = index))]
    pub fn insert_child(&self, child: &Tree<T>, index: usize) -> TreeResult<()> {
        if let Err(e) = self.check_insertable(child) {
            warn!("insert_child rejected: {}", e);
            return Err(e);
        }
        let len = self.child_count();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.adopt(child);
        self.node.borrow_mut().children.insert(index, child.clone());
        debug!("inserted child");
        Ok(())
    }

    /// Swaps the child at `index` for `replacement` and returns the displaced
    /// child, which is left as a root.
    #[instrument(level = "trace", skip_all, fields(parent = %self.id(), replacement = %replacement.id(), index = index))]
    pub fn replace_child(&self, index: usize, replacement: &Tree<T>) -> TreeResult<Tree<T>> {
        if let Err(e) = self.check_insertable(replacement) {
            warn!("replace_child rejected: {}", e);
            return Err(e);
        }
        let len = self.child_count();
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.adopt(replacement);
        let displaced = {
            let mut node = self.node.borrow_mut();
            std::mem::replace(&mut node.children[index], replacement.clone())
        };
        displaced.set_parent(None);
        debug!(displaced = %displaced.id(), "replaced child");
        Ok(displaced)
    }

    /// Removes this node from its parent's children and clears its parent link.
    ///
    /// Does nothing for a root.
    #[instrument(level = "trace", skip_all, fields(node = %self.id()))]
    pub fn remove_from_parent(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        let id = self.id();
        parent
            .node
            .borrow_mut()
            .children
            .retain(|child| child.id() != id);
        self.set_parent(None);
        debug!(parent = %parent.id(), "removed from parent");
    }

    /// Checks sibling id uniqueness and back-link consistency for this node
    /// and its whole subtree.
    pub fn validate(&self) -> TreeResult<()> {
        if let Some(parent) = self.parent() {
            if parent.position_of(self.id()).is_none() {
                return Err(TreeError::InternalConsistency(format!(
                    "node {} is missing from the children of its parent {}",
                    self.id(),
                    parent.id()
                )));
            }
        }
        self.validate_subtree()
    }

    fn validate_subtree(&self) -> TreeResult<()> {
        let mut visited = HashSet::new();
        let mut stack = vec![self.clone()];
        while let Some(current) = stack.pop() {
            if !visited.insert(Rc::as_ptr(&current.node)) {
                return Err(TreeError::InternalConsistency(format!(
                    "node {} is reachable more than once",
                    current.id()
                )));
            }
            let node = current.node.borrow();
            let mut sibling_ids = HashSet::new();
            for child in &node.children {
                let child_id = child.id();
                if !sibling_ids.insert(child_id) {
                    return Err(TreeError::InternalConsistency(format!(
                        "duplicate child {} under {}",
                        child_id, node.id
                    )));
                }
                let linked_back = child
                    .parent()
                    .is_some_and(|parent| Rc::ptr_eq(&parent.node, &current.node));
                if !linked_back {
                    return Err(TreeError::InternalConsistency(format!(
                        "child {} does not link back to {}",
                        child_id, node.id
                    )));
                }
            }
            stack.extend(node.children.iter().cloned());
        }
        Ok(())
    }
}

/// Pre-order iterator over a subtree, children left to right.
pub struct Descendants<T> {
    stack: Vec<Tree<T>>,
}

impl<T> Iterator for Descendants<T> {
    type Item = Tree<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack
            .extend(current.node.borrow().children.iter().rev().cloned());
        Some(current)
    }
}
