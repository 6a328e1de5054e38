//! Package implement a Red-Black binary search tree.
//!
//! Quoting from [Wikipedia][wiki-rbt]:
//!
//! > A red–black tree is a self-balancing binary search tree data
//! > structure noted for fast storage and retrieval of ordered
//! > information. The nodes in a red-black tree hold an extra "color" bit,
//! > often drawn as red and black, which help ensure that the tree is always
//! > approximately balanced.
//!
//! [RbTree] keeps following rules after every insert:
//!
//! * Every node is either red or black.
//! * Root is black.
//! * Every leaf (missing child) is black.
//! * A red node has only black children.
//! * Every path from a node to its descendant leaves has the same number
//!   of black nodes.
//!
//! which bounds the height of the tree to `2 * log2(n + 1)`.
//!
//! - Parametrised over any value-type that implements [Ord].
//! - Insert, exact search, minimum, maximum and in-order successor.
//! - Pre-order and in-order traversal, via callback or iterator.
//! - Duplicate values are retained.
//! - No deletion.
//! - Not thread safe, wrap it in a lock to share across threads.
//!
//! Nodes are kept in an arena owned by the tree and link each other via
//! [NodeId]. Lookups return a [NodeRef], a read-only view that borrows the
//! tree, hence it is not possible to hold on to a node while mutating the
//! tree.
//!
//! ```
//! use rbtree::{Color, RbTree};
//!
//! let mut index: RbTree<&str> = RbTree::new();
//! for value in ["D", "B", "A", "C", "F"].iter() {
//!     index.insert(*value).unwrap();
//! }
//! assert_eq!(index.len(), 5);
//!
//! let node = index.search("B").unwrap();
//! assert_eq!(*node.as_value(), "B");
//! assert_eq!(node.to_color(), Color::Black);
//!
//! assert_eq!(*index.minimum().unwrap().as_value(), "A");
//! assert_eq!(*index.maximum().unwrap().as_value(), "F");
//!
//! let next = index.successor(node.to_id()).unwrap();
//! assert_eq!(*next.as_value(), "C");
//!
//! let values: Vec<&str> = index.iter().cloned().collect();
//! assert_eq!(values, vec!["A", "B", "C", "D", "F"]);
//!
//! assert!(index.insert(None::<&str>).is_err());
//! ```
//!
//! [wiki-rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{error, fmt, result};

// Short form to compose Error values.
//
// ```ignore
// use crate::Error;
// err_at!(InvalidArgument, msg: "bad value {}", value);
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
}

mod node;
mod tree;

pub use node::{Color, NodeId};
pub use tree::{Iter, NodeRef, RbTree};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    Fatal(String, String),
    InvalidArgument(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            InvalidArgument(p, msg) => write!(f, "{} InvalidArgument: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
