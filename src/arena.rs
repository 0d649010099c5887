use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::tree::{Tree, TreeId};

/// A node stored in a [`TreeArena`].
#[derive(Debug, Clone)]
pub struct ArenaNode<T> {
    id: TreeId<T>,
    content: Option<T>,
    /// Handle of the parent, None for the root
    parent: Option<Index>,
    children: Vec<Index>,
}

impl<T> ArenaNode<T> {
    pub fn id(&self) -> TreeId<T> {
        self.id
    }

    pub fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut T> {
        self.content.as_mut()
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }
}

/// Flattened, index-based snapshot of a tree.
///
/// Parent links are generational handles instead of pointers. Removing a
/// subtree invalidates the handles of every removed node; lookups through a
/// stale handle return `None`.
#[derive(Debug)]
pub struct TreeArena<T> {
    arena: Arena<ArenaNode<T>>,
    root: Option<Index>,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a node below `parent`, or as the root when `parent` is None.
    #[instrument(level = "trace", skip(self, content))]
    pub fn insert_node(
        &mut self,
        id: TreeId<T>,
        content: Option<T>,
        parent: Option<Index>,
    ) -> TreeResult<Index> {
        match parent {
            Some(parent_idx) if !self.arena.contains(parent_idx) => {
                return Err(TreeError::InvalidHandle)
            }
            None if self.root.is_some() => {
                return Err(TreeError::InternalConsistency(
                    "arena already has a root".to_string(),
                ))
            }
            _ => {}
        }

        let node_idx = self.arena.insert(ArenaNode {
            id,
            content,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|parent_idx| self.arena.get_mut(parent_idx)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.root = Some(node_idx),
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode<T>> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut ArenaNode<T>> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn find(&self, id: TreeId<T>) -> Option<Index> {
        self.iter().find(|(_, node)| node.id == id).map(|(idx, _)| idx)
    }

    /// Parent hops from `idx` to the root.
    pub fn depth(&self, idx: Index) -> TreeResult<usize> {
        let mut node = self.get_node(idx).ok_or(TreeError::InvalidHandle)?;
        let mut depth = 0;
        while let Some(parent_idx) = node.parent {
            node = self.get_node(parent_idx).ok_or(TreeError::InvalidHandle)?;
            depth += 1;
        }
        Ok(depth)
    }

    /// Number of levels below and including the root, 0 for an empty arena.
    pub fn height(&self) -> usize {
        self.root.map_or(0, |root| self.calculate_height(root))
    }

    fn calculate_height(&self, node_idx: Index) -> usize {
        self.get_node(node_idx).map_or(0, |node| {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_height(child))
                .max()
                .unwrap_or(0)
        })
    }

    /// Handles of all leaves in left-to-right order.
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self)
    }

    /// Removes the node at `idx` together with its descendants and returns how
    /// many nodes were removed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> TreeResult<usize> {
        let parent = self.get_node(idx).ok_or(TreeError::InvalidHandle)?.parent;

        let mut doomed = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.get(current) {
                stack.extend(node.children.iter().copied());
                doomed.push(current);
            }
        }
        for current in &doomed {
            self.arena.remove(*current);
        }

        match parent.and_then(|parent_idx| self.arena.get_mut(parent_idx)) {
            Some(parent) => parent.children.retain(|&child| child != idx),
            None => self.root = None,
        }

        debug!("removed {} nodes", doomed.len());
        Ok(doomed.len())
    }

    /// Rebuilds a linked tree with the same ids, content and order.
    pub fn to_tree(&self) -> Option<Tree<T>>
    where
        T: Clone,
    {
        self.root.and_then(|root| self.build_tree(root))
    }

    fn build_tree(&self, idx: Index) -> Option<Tree<T>>
    where
        T: Clone,
    {
        let node = self.get_node(idx)?;
        let children = node
            .children
            .iter()
            .filter_map(|&child| self.build_tree(child))
            .collect();
        Some(Tree::from_parts(node.id, node.content.clone(), children))
    }
}

impl<T: Clone> Tree<T> {
    /// Flattens this subtree into an arena. This node becomes the arena root.
    #[instrument(level = "debug", skip_all, fields(root = %self.id()))]
    pub fn to_arena(&self) -> TreeArena<T> {
        let mut arena = TreeArena::new();
        let mut stack = vec![(self.clone(), None)];

        while let Some((current, parent_idx)) = stack.pop() {
            let inserted = arena.insert_node(current.id(), current.content(), parent_idx);
            // Parents are always inserted before their children.
            let Ok(current_idx) = inserted else {
                continue;
            };
            // Reverse so siblings are popped, and stored, in order.
            for child in current.children().into_iter().rev() {
                stack.push((child, Some(current_idx)));
            }
        }

        debug!("flattened {} nodes", arena.len());
        arena
    }
}

/// Pre-order traversal, children left to right.
pub struct TreeIterator<'a, T> {
    arena: &'a TreeArena<T>,
    stack: Vec<Index>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(arena: &'a TreeArena<T>) -> Self {
        Self {
            arena,
            stack: arena.root().into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (Index, &'a ArenaNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T> {
    arena: &'a TreeArena<T>,
    stack: Vec<(Index, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(arena: &'a TreeArena<T>) -> Self {
        Self {
            arena,
            stack: arena.root().map(|root| (root, false)).into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (Index, &'a ArenaNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
