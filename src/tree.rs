//! Module provide binary search tree implemented by [RbTree] type.
//!
//! RbTree is implemented using [red-black][wiki-rbt] rules, with parent
//! links, as described in CLRS.
//!
//! - Each node in RbTree instance correspond to a single value.
//! - Parametrised over `value-type`.
//! - Insert via insert() api, duplicate values are retained.
//! - Exact search, minimum, maximum and in-order successor.
//! - Pre-order and in-order traversal.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Nodes are held in an arena, a vector owned by the tree, and refer to
//! each other using [NodeId]. Parent links are plain identifiers, they
//! don't own anything.
//!
//! [wiki-rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use log::{debug, trace};

use std::{
    borrow::Borrow,
    cmp::{self, Ordering},
    fmt, ptr,
};

use crate::{
    node::{Color, Node, NodeId, Side},
    Error, Result,
};

/// RbTree manage a single instance of in-memory binary search tree
/// using [red-black][rbt] rules.
///
/// RbTree has no internal locking. All mutations need `&mut self`, to
/// share an instance between threads wrap it with a lock, like
/// `Arc<Mutex<RbTree<T>>>`.
///
/// [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbTree<T> {
    root: Option<NodeId>,
    nodes: Vec<Node<T>>, // arena, indexed by NodeId
}

impl<T> Default for RbTree<T> {
    fn default() -> RbTree<T> {
        RbTree::new()
    }
}

impl<T> RbTree<T> {
    /// Create an empty instance of RbTree.
    pub fn new() -> RbTree<T> {
        RbTree {
            root: None,
            nodes: Vec::default(),
        }
    }
}

/// Maintenance API.
impl<T> RbTree<T> {
    /// Return number of values in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether this instance is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the number of nodes on the longest path from root to leaf.
    /// For a valid tree this never exceeds `2 * log2(n + 1)`.
    pub fn height(&self) -> usize {
        self.depth(self.root)
    }

    /// Validate red-black tree with following rules:
    ///
    /// * Root is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Values are in sorted order.
    /// * Parent links agree with child links.
    pub fn validate(&self) -> Result<()>
    where
        T: Ord + fmt::Debug,
    {
        let root = match self.root {
            Some(root) => root,
            None if self.nodes.is_empty() => return Ok(()),
            None => err_at!(Fatal, msg: "no root for {} nodes", self.nodes.len())?,
        };
        if !self.node(root).is_black() {
            err_at!(Fatal, msg: "red root {:?}", self.node(root).value)?;
        }

        let mut n_count = 0;
        self.validate_tree(Some(root), None, false, 0, &mut n_count)?;
        if n_count != self.nodes.len() {
            err_at!(Fatal, msg: "reachable {} arena {}", n_count, self.nodes.len())?;
        }

        let mut prev: Option<&T> = None;
        for value in self.iter() {
            if let Some(pvalue) = prev {
                if pvalue.gt(value) {
                    err_at!(Fatal, msg: "in-order {:?} before {:?}", pvalue, value)?;
                }
            }
            prev = Some(value);
        }

        Ok(())
    }
}

impl<T> RbTree<T> {
    /// Insert `value` into this tree and return the identifier of its
    /// node. Passing `None` is rejected with [Error::InvalidArgument], and
    /// leaves the tree untouched.
    ///
    /// Values that compare equal to an existing value are inserted as new
    /// nodes, to the left of the equal node.
    pub fn insert<V>(&mut self, value: V) -> Result<NodeId>
    where
        T: Ord,
        V: Into<Option<T>>,
    {
        let value = match value.into() {
            Some(value) => value,
            None => {
                debug!("insert rejected, null value into tree of {}", self.len());
                err_at!(InvalidArgument, msg: "null value attempting to be inserted")?
            }
        };

        let (mut parent, mut side) = (None, Side::Left);
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            side = if value.le(&node.value) {
                Side::Left
            } else {
                Side::Right
            };
            parent = Some(id);
            cursor = node.child(side);
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(value, parent));
        match parent {
            Some(parent) => self.node_mut(parent).set_child(side, Some(id)),
            None => self.root = Some(id),
        }

        self.fix_insert(id);
        Ok(id)
    }
}

/// Read API.
impl<T> RbTree<T> {
    /// Return the root node, None if tree is empty.
    pub fn root(&self) -> Option<NodeRef<T>> {
        self.root.map(|id| self.to_node_ref(id))
    }

    /// Return a view into node `id`, None if `id` is not part of this
    /// tree's arena.
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<T>> {
        if id.0 < self.nodes.len() {
            Some(self.to_node_ref(id))
        } else {
            None
        }
    }

    /// Search for `key`, return the first node found that compares equal.
    pub fn search<Q>(&self, key: &Q) -> Option<NodeRef<T>>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root;
        while let Some(id) = node {
            let nref = self.node(id);
            node = match nref.value.borrow().cmp(key) {
                Ordering::Less => nref.right,
                Ordering::Greater => nref.left,
                Ordering::Equal => return Some(self.to_node_ref(id)),
            };
        }
        None
    }

    /// Return node with the smallest value, None if tree is empty.
    pub fn minimum(&self) -> Option<NodeRef<T>> {
        self.root.map(|id| self.to_node_ref(self.min_from(id)))
    }

    /// Return node with the largest value, None if tree is empty.
    pub fn maximum(&self) -> Option<NodeRef<T>> {
        self.root.map(|id| self.to_node_ref(self.max_from(id)))
    }

    /// Return the node that follows `id` in in-order sequence, None
    /// if `id` is the maximum.
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn successor(&self, id: NodeId) -> Option<NodeRef<T>> {
        let node = self.node(id);
        if let Some(right) = node.right {
            return Some(self.to_node_ref(self.min_from(right)));
        }

        let (mut child, mut parent) = (id, node.parent);
        while let Some(p) = parent {
            if self.node(p).right != Some(child) {
                break;
            }
            child = p;
            parent = self.node(p).parent;
        }
        parent.map(|p| self.to_node_ref(p))
    }

    /// Walk the tree in pre-order, node then left then right, calling
    /// `visit` for each node.
    pub fn pre_order_visit<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        self.pre_order(self.root, &mut visit)
    }

    /// Walk the tree in-order, left then node then right, calling
    /// `visit` for each node. Values are visited in sorted order.
    pub fn in_order_visit<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        self.in_order(self.root, &mut visit)
    }

    /// Return an iterator over all values in sorted order.
    pub fn iter(&self) -> Iter<T> {
        let mut paths = Vec::default();
        build_iter(self, self.root, &mut paths);
        Iter { tree: self, paths }
    }
}

impl<T> RbTree<T> {
    #[inline]
    fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    #[inline]
    fn to_node_ref(&self, id: NodeId) -> NodeRef<T> {
        NodeRef { tree: self, id }
    }

    fn is_red(&self, node: Option<NodeId>) -> bool {
        node.map_or(false, |id| self.node(id).is_red())
    }

    fn side_of(&self, id: NodeId) -> Side {
        match self.node(id).parent {
            Some(parent) if self.node(parent).left == Some(id) => Side::Left,
            Some(_) => Side::Right,
            None => panic!("side_of(): root {} has no side, call the programmer", id),
        }
    }

    fn grandparent(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).parent {
            Some(parent) => self.node(parent).parent,
            None => panic!("grandparent(): {} has no parent, call the programmer", id),
        }
    }

    fn min_from(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    fn max_from(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    fn depth(&self, node: Option<NodeId>) -> usize {
        match node {
            Some(id) => {
                let node = self.node(id);
                1 + cmp::max(self.depth(node.left), self.depth(node.right))
            }
            None => 0,
        }
    }

    // Restore red-black rules after `z` is attached as a red leaf. Both
    // mirror cases go through the same path, `side` is the side of z's
    // parent under the grandparent.
    fn fix_insert(&mut self, mut z: NodeId) {
        loop {
            let parent = match self.node(z).parent {
                Some(parent) if self.node(parent).is_red() => parent,
                _ => break,
            };
            let grand = match self.grandparent(z) {
                Some(grand) => grand,
                None => panic!("fix_insert(): red root {}, call the programmer", parent),
            };
            let side = self.side_of(parent);
            let uncle = self.node(grand).child(side.opposite());

            if self.is_red(uncle) {
                trace!("fix_insert recolor at {}", grand);
                self.node_mut(parent).set_black();
                if let Some(uncle) = uncle {
                    self.node_mut(uncle).set_black();
                }
                self.node_mut(grand).set_red();
                z = grand;
                continue;
            }

            // triangle, rotate it into a line.
            let parent = if self.side_of(z) == side {
                parent
            } else {
                trace!("fix_insert triangle at {}", parent);
                self.rotate(parent, side);
                std::mem::replace(&mut z, parent)
            };

            trace!("fix_insert line at {}", grand);
            self.node_mut(parent).set_black();
            self.node_mut(grand).set_red();
            self.rotate(grand, side.opposite());
        }

        if let Some(root) = self.root {
            self.node_mut(root).set_black()
        }
    }

    //            (p)                      (p)
    //             |                        |
    //             x                        y
    //            / \      rotate Left     / \
    //           a   y     ---------->    x   c
    //              / \                  / \
    //             b   c                a   b
    //
    // rotate(x, Left) is the left-rotation above, rotate(x, Right) is the
    // mirror image. Colors are left as is.
    fn rotate(&mut self, x: NodeId, side: Side) {
        let up = side.opposite();
        let y = match self.node(x).child(up) {
            Some(y) => y,
            None => panic!("rotate(): {} has no child to promote, call the programmer", x),
        };
        trace!("rotate {:?} at {} promote {}", side, x, y);

        let inner = self.node(y).child(side);
        self.node_mut(x).set_child(up, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }

        let parent = self.node(x).parent;
        match parent {
            Some(parent) => {
                let pside = self.side_of(x);
                self.node_mut(parent).set_child(pside, Some(y));
            }
            None => self.root = Some(y),
        }
        self.node_mut(y).parent = parent;

        self.node_mut(y).set_child(side, Some(x));
        self.node_mut(x).parent = Some(y);
    }

    fn pre_order<'a, F>(&'a self, node: Option<NodeId>, visit: &mut F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        if let Some(id) = node {
            visit(self.to_node_ref(id));
            self.pre_order(self.node(id).left, visit);
            self.pre_order(self.node(id).right, visit);
        }
    }

    fn in_order<'a, F>(&'a self, node: Option<NodeId>, visit: &mut F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        if let Some(id) = node {
            self.in_order(self.node(id).left, visit);
            visit(self.to_node_ref(id));
            self.in_order(self.node(id).right, visit);
        }
    }

    fn validate_tree(
        &self,
        node: Option<NodeId>,
        parent: Option<NodeId>,
        fromred: bool,
        mut n_blacks: usize,
        n_count: &mut usize,
    ) -> Result<usize>
    where
        T: Ord + fmt::Debug,
    {
        let id = match node {
            Some(id) => id,
            None => return Ok(n_blacks),
        };
        let node = self.node(id);
        *n_count += 1;

        if node.parent != parent {
            err_at!(Fatal, msg: "parent link {:?} expected {:?}", node.parent, parent)?;
        }

        let red = node.is_red();
        if fromred && red {
            return err_at!(Fatal, msg: "consecutive reds at {:?}", node.value)?;
        }

        if !red {
            n_blacks += 1;
        }

        let (left, right) = (node.left, node.right);
        let lblacks = self.validate_tree(left, Some(id), red, n_blacks, n_count)?;
        let rblacks = self.validate_tree(right, Some(id), red, n_blacks, n_count)?;
        if lblacks != rblacks {
            err_at!(Fatal, msg: "unbalanced blacks {} {}", lblacks, rblacks)?;
        }

        if let Some(left) = left.map(|id| self.node(id)) {
            if left.value.gt(&node.value) {
                err_at!(Fatal, msg: "sort lvalue:{:?} parent:{:?}", left.value, node.value)?;
            }
        }
        if let Some(right) = right.map(|id| self.node(id)) {
            if right.value.lt(&node.value) {
                err_at!(Fatal, msg: "sort rvalue:{:?} parent:{:?}", right.value, node.value)?;
            }
        }

        Ok(lblacks)
    }
}

/// Render values in sorted order, root is enclosed in parenthesis.
impl<T> fmt::Display for RbTree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        let mut res = Ok(());
        self.in_order_visit(|nref| {
            if res.is_err() {
                return;
            }
            let sep = if first { "" } else { " " };
            first = false;
            res = match nref.parent() {
                None => write!(f, "{}({})", sep, nref.as_value()),
                Some(_) => write!(f, "{}{}", sep, nref.as_value()),
            };
        });
        res
    }
}

/// Read-only view into a node of [RbTree].
///
/// A NodeRef borrows the tree it came from, it can't outlive the tree
/// and the tree can't be mutated while the view is held.
pub struct NodeRef<'a, T> {
    tree: &'a RbTree<T>,
    id: NodeId,
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T> PartialEq for NodeRef<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<'a, T> NodeRef<'a, T> {
    /// Return the arena identifier for this node.
    #[inline]
    pub fn to_id(&self) -> NodeId {
        self.id
    }

    /// Return the value held by this node.
    #[inline]
    pub fn as_value(&self) -> &'a T {
        &self.tree.node(self.id).value
    }

    /// Return this node's color.
    #[inline]
    pub fn to_color(&self) -> Color {
        self.tree.node(self.id).to_color()
    }

    /// Return whether this node is black.
    #[inline]
    pub fn is_black(&self) -> bool {
        self.tree.node(self.id).is_black()
    }

    /// Return whether this node is red.
    #[inline]
    pub fn is_red(&self) -> bool {
        self.tree.node(self.id).is_red()
    }

    /// Return parent node, None for root.
    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        let tree = self.tree;
        tree.node(self.id).parent.map(|id| tree.to_node_ref(id))
    }

    /// Return left child, None if absent.
    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        let tree = self.tree;
        tree.node(self.id).left.map(|id| tree.to_node_ref(id))
    }

    /// Return right child, None if absent.
    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        let tree = self.tree;
        tree.node(self.id).right.map(|id| tree.to_node_ref(id))
    }

    /// Return parent's parent. Panics if this node is the root, callers
    /// must only ask for grandparent on a node that has a parent.
    pub fn grandparent(&self) -> Option<NodeRef<'a, T>> {
        let tree = self.tree;
        tree.grandparent(self.id).map(|id| tree.to_node_ref(id))
    }

    /// Same as [RbTree::successor].
    pub fn successor(&self) -> Option<NodeRef<'a, T>> {
        self.tree.successor(self.id)
    }
}

impl<'a, T> fmt::Debug for NodeRef<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("value", self.as_value())
            .field("color", &self.to_color())
            .finish()
    }
}

/// Iterator over values of [RbTree] in sorted order.
pub struct Iter<'a, T> {
    tree: &'a RbTree<T>,
    paths: Vec<Fragment>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let path = self.paths.last_mut()?;
            match path.flag {
                IFlag::Left => {
                    path.flag = IFlag::Center;
                    break Some(&tree.node(path.node).value);
                }
                IFlag::Center => {
                    path.flag = IFlag::Right;
                    let right = tree.node(path.node).right;
                    build_iter(tree, right, &mut self.paths)
                }
                IFlag::Right => {
                    self.paths.pop();
                }
            }
        }
    }
}

#[derive(Copy, Clone)]
enum IFlag {
    Left,
    Center,
    Right,
}

struct Fragment {
    flag: IFlag,
    node: NodeId,
}

fn build_iter<T>(tree: &RbTree<T>, node: Option<NodeId>, paths: &mut Vec<Fragment>) {
    if let Some(node) = node {
        paths.push(Fragment {
            flag: IFlag::Left,
            node,
        });
        build_iter(tree, tree.node(node).left, paths)
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
