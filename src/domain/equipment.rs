//! Composite equipment tree.
//!
//! Leaf parts and composite assemblies share one node type and one interface.
//! The arena owns every node; a parent owns its subtree through the
//! parent/children links, and destroying a node destroys that subtree.

use std::collections::{HashMap, HashSet};
use std::fmt;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Handle to a node in an [`EquipmentArena`].
///
/// Handles are generational: once the node is destroyed the handle
/// resolves to [`DomainError::NodeNotFound`] instead of a recycled slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EquipmentRef(Index);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentKind {
    /// Primitive part, never holds children
    Leaf,
    /// Container part, owns an ordered list of children
    Composite,
}

/// Data payload for equipment nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentData {
    /// Identifier, unique among live nodes of one arena
    pub id: i32,
    /// Display name
    pub name: String,
    /// Own unit price, excluding children
    pub price: i64,
    pub kind: EquipmentKind,
}

impl fmt::Display for EquipmentData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

#[derive(Debug)]
pub struct EquipmentNode {
    pub data: EquipmentData,
    /// Owning parent, None for detached roots
    pub parent: Option<Index>,
    /// Children in insertion order
    pub children: Vec<Index>,
}

/// Arena-based storage for equipment hierarchies.
///
/// Holds any number of independent trees. Nodes that have not been attached
/// to a composite are roots owned directly by the arena.
#[derive(Debug, Default)]
pub struct EquipmentArena {
    arena: Arena<EquipmentNode>,
    ids: HashMap<i32, Index>,
}

impl EquipmentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached leaf part.
    pub fn new_leaf(&mut self, id: i32, name: &str, price: i64) -> DomainResult<EquipmentRef> {
        self.insert(id, name, price, EquipmentKind::Leaf)
    }

    /// Create a detached composite assembly.
    pub fn new_composite(
        &mut self,
        id: i32,
        name: &str,
        price: i64,
    ) -> DomainResult<EquipmentRef> {
        self.insert(id, name, price, EquipmentKind::Composite)
    }

    #[instrument(level = "trace", skip(self))]
    fn insert(
        &mut self,
        id: i32,
        name: &str,
        price: i64,
        kind: EquipmentKind,
    ) -> DomainResult<EquipmentRef> {
        if self.ids.contains_key(&id) {
            return Err(DomainError::DuplicateId(id));
        }
        let node = EquipmentNode {
            data: EquipmentData {
                id,
                name: name.to_string(),
                price,
                kind,
            },
            parent: None,
            children: Vec::new(),
        };
        let idx = self.arena.insert(node);
        self.ids.insert(id, idx);
        Ok(EquipmentRef(idx))
    }

    fn node(&self, node: EquipmentRef) -> DomainResult<&EquipmentNode> {
        self.arena.get(node.0).ok_or(DomainError::NodeNotFound)
    }

    pub fn data(&self, node: EquipmentRef) -> DomainResult<&EquipmentData> {
        self.node(node).map(|n| &n.data)
    }

    pub fn id(&self, node: EquipmentRef) -> DomainResult<i32> {
        self.data(node).map(|d| d.id)
    }

    pub fn name(&self, node: EquipmentRef) -> DomainResult<&str> {
        self.data(node).map(|d| d.name.as_str())
    }

    /// Own price, excluding children. See [`Self::net_price`] for the aggregate.
    pub fn price(&self, node: EquipmentRef) -> DomainResult<i64> {
        self.data(node).map(|d| d.price)
    }

    pub fn kind(&self, node: EquipmentRef) -> DomainResult<EquipmentKind> {
        self.data(node).map(|d| d.kind)
    }

    pub fn parent(&self, node: EquipmentRef) -> DomainResult<Option<EquipmentRef>> {
        self.node(node).map(|n| n.parent.map(EquipmentRef))
    }

    pub fn children(&self, node: EquipmentRef) -> DomainResult<Vec<EquipmentRef>> {
        self.node(node)
            .map(|n| n.children.iter().copied().map(EquipmentRef).collect())
    }

    /// Look up a live node by identifier.
    pub fn find(&self, id: i32) -> Option<EquipmentRef> {
        self.ids.get(&id).copied().map(EquipmentRef)
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Attach `child` under the composite `parent`, transferring ownership.
    ///
    /// # Errors
    /// * `UnsupportedOperation` if `parent` is a leaf
    /// * `AlreadyAttached` if `child` is owned by another composite
    /// * `CycleDetected` if `child` is `parent` or one of its ancestors
    #[instrument(level = "trace", skip(self))]
    pub fn add(&mut self, parent: EquipmentRef, child: EquipmentRef) -> DomainResult<()> {
        let parent_data = self.data(parent)?;
        let parent_id = parent_data.id;
        if parent_data.kind == EquipmentKind::Leaf {
            return Err(DomainError::UnsupportedOperation {
                id: parent_id,
                op: "add",
            });
        }

        let child_node = self.node(child)?;
        let child_id = child_node.data.id;
        if let Some(owner) = child_node.parent {
            let owner_id = self.arena.get(owner).map(|n| n.data.id).unwrap_or(parent_id);
            return Err(DomainError::AlreadyAttached {
                child: child_id,
                parent: owner_id,
            });
        }

        // Walk the ancestor chain of the parent; a visited set keeps a corrupted
        // chain from looping forever.
        let mut visited = HashSet::new();
        let mut cursor = Some(parent.0);
        while let Some(idx) = cursor {
            if idx == child.0 || !visited.insert(idx) {
                return Err(DomainError::CycleDetected {
                    parent: parent_id,
                    child: child_id,
                });
            }
            cursor = self.arena.get(idx).and_then(|n| n.parent);
        }

        if let Some(node) = self.arena.get_mut(child.0) {
            node.parent = Some(parent.0);
        }
        if let Some(node) = self.arena.get_mut(parent.0) {
            node.children.push(child.0);
        }
        debug!("add: #{} <- #{}", parent_id, child_id);
        Ok(())
    }

    /// Remove the child whose identifier equals `child`'s and destroy its subtree.
    ///
    /// Returns the destroyed nodes in post-order.
    pub fn remove(
        &mut self,
        parent: EquipmentRef,
        child: EquipmentRef,
    ) -> DomainResult<Vec<EquipmentData>> {
        // leaf check comes first so a leaf rejects the call whatever the argument
        self.ensure_composite(parent, "remove")?;
        let id = self.id(child)?;
        self.remove_id(parent, id)
    }

    /// Remove the child with identifier `id` and destroy its subtree.
    ///
    /// # Errors
    /// * `UnsupportedOperation` if `parent` is a leaf
    /// * `NotFound` if no direct child carries `id`
    #[instrument(level = "trace", skip(self))]
    pub fn remove_id(
        &mut self,
        parent: EquipmentRef,
        id: i32,
    ) -> DomainResult<Vec<EquipmentData>> {
        let parent_id = self.ensure_composite(parent, "remove")?;
        let position = self
            .node(parent)?
            .children
            .iter()
            .position(|&c| self.arena.get(c).map(|n| n.data.id) == Some(id))
            .ok_or(DomainError::NotFound {
                parent: parent_id,
                child: id,
            })?;

        let child_idx = match self.arena.get_mut(parent.0) {
            Some(node) => node.children.remove(position),
            None => return Err(DomainError::NodeNotFound),
        };
        debug!("remove: #{} -/- #{}", parent_id, id);
        Ok(self.destroy_subtree(child_idx))
    }

    /// Destroy `node` and its whole subtree, unlinking it from its owner first.
    ///
    /// Returns the destroyed nodes in post-order (children before parents).
    #[instrument(level = "trace", skip(self))]
    pub fn destroy(&mut self, node: EquipmentRef) -> DomainResult<Vec<EquipmentData>> {
        let owner = self.node(node)?.parent;
        if let Some(owner) = owner.and_then(|o| self.arena.get_mut(o)) {
            owner.children.retain(|&c| c != node.0);
        }
        Ok(self.destroy_subtree(node.0))
    }

    fn destroy_subtree(&mut self, root: Index) -> Vec<EquipmentData> {
        let order: Vec<Index> = PostOrderIterator::new(self, root)
            .map(|(node, _)| node.0)
            .collect();
        let mut destroyed = Vec::with_capacity(order.len());
        for idx in order {
            if let Some(node) = self.arena.remove(idx) {
                debug!("destroying {}", node.data);
                self.ids.remove(&node.data.id);
                destroyed.push(node.data);
            }
        }
        destroyed
    }

    fn ensure_composite(&self, node: EquipmentRef, op: &'static str) -> DomainResult<i32> {
        let data = self.data(node)?;
        match data.kind {
            EquipmentKind::Composite => Ok(data.id),
            EquipmentKind::Leaf => Err(DomainError::UnsupportedOperation { id: data.id, op }),
        }
    }

    /// Own price plus the net price of every child, depth-first, left to right.
    ///
    /// Fails with `PriceOverflow` naming the innermost node whose sum leaves `i64`.
    #[instrument(level = "debug", skip(self))]
    pub fn net_price(&self, node: EquipmentRef) -> DomainResult<i64> {
        self.node(node)?;
        self.subtree_price(node.0)
    }

    fn subtree_price(&self, idx: Index) -> DomainResult<i64> {
        let Some(node) = self.arena.get(idx) else {
            return Ok(0);
        };
        node.children.iter().try_fold(node.data.price, |total, &child| {
            total
                .checked_add(self.subtree_price(child)?)
                .ok_or(DomainError::PriceOverflow { id: node.data.id })
        })
    }

    /// Number of levels in the subtree rooted at `node` (a lone node is 1).
    pub fn depth(&self, node: EquipmentRef) -> DomainResult<usize> {
        self.node(node)?;
        Ok(self.calculate_depth(node.0))
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        if let Some(node) = self.arena.get(idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Pre-order traversal of the subtree rooted at `node`.
    pub fn iter(&self, node: EquipmentRef) -> DomainResult<PreOrderIterator<'_>> {
        self.node(node)?;
        Ok(PreOrderIterator::new(self, node.0))
    }

    /// Post-order traversal of the subtree rooted at `node`.
    pub fn iter_postorder(&self, node: EquipmentRef) -> DomainResult<PostOrderIterator<'_>> {
        self.node(node)?;
        Ok(PostOrderIterator::new(self, node.0))
    }

    /// Render the subtree as a `termtree` with own and net prices per node.
    pub fn to_tree(&self, node: EquipmentRef) -> DomainResult<Tree<String>> {
        self.node(node)?;
        Ok(self.build_tree(node.0))
    }

    fn build_tree(&self, idx: Index) -> Tree<String> {
        match self.arena.get(idx) {
            Some(node) => {
                let net = match self.subtree_price(idx) {
                    Ok(net) => net.to_string(),
                    Err(_) => "overflow".to_string(),
                };
                let label = format!("{}: own={} net={}", node.data, node.data.price, net);
                let leaves: Vec<_> = node.children.iter().map(|&c| self.build_tree(c)).collect();
                Tree::new(label).with_leaves(leaves)
            }
            None => Tree::new("<destroyed>".to_string()),
        }
    }
}

pub struct PreOrderIterator<'a> {
    arena: &'a EquipmentArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a EquipmentArena, root: Index) -> Self {
        Self {
            arena,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (EquipmentRef, &'a EquipmentData);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.arena.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((EquipmentRef(current), &node.data));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a EquipmentArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a EquipmentArena, root: Index) -> Self {
        Self {
            arena,
            stack: vec![(root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (EquipmentRef, &'a EquipmentData);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.arena.get(current) {
                if !visited {
                    self.stack.push((current, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((EquipmentRef(current), &node.data));
                }
            }
        }
        None
    }
}
