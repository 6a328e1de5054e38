use std::fmt;

/// Identify a node within the arena of a single [RbTree][crate::RbTree].
///
/// Identifiers are stable for the life of the tree, they are never
/// reused since nodes are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Return the arena offset for this node.
    #[inline]
    pub fn to_index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Color of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

// Side of a child relative to its parent. Fixup and rotation are written
// once against Side and applied to both mirror cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// Node corresponds to a single value in RbTree instance.
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) black: bool,             // store: black or red
    pub(crate) parent: Option<NodeId>,  // link: none for root
    pub(crate) left: Option<NodeId>,    // link: left child
    pub(crate) right: Option<NodeId>,   // link: right child
}

impl<T> Node<T> {
    /// New nodes are always red, with no children.
    pub(crate) fn new(value: T, parent: Option<NodeId>) -> Node<T> {
        Node {
            value,
            black: false,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn set_red(&mut self) {
        self.black = false
    }

    #[inline]
    pub(crate) fn set_black(&mut self) {
        self.black = true
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

impl<T> Node<T> {
    #[inline]
    pub(crate) fn is_black(&self) -> bool {
        self.black
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        !self.black
    }

    #[inline]
    pub(crate) fn to_color(&self) -> Color {
        if self.black {
            Color::Black
        } else {
            Color::Red
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
