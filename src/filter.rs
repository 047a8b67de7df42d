//! Path-driven filtering of tree substructure.
//!
//! Four variants share one recursive matcher, parameterized by two
//! independent flags: `inverted` keeps non-matches instead of matches, and
//! `recursive` restarts the search at every descendant position instead of
//! only at the root.
//!
//! # Examples
//!
//! ```
//! use confit::{filter, Node};
//! use std::collections::BTreeMap;
//!
//! let v = Node::Object(BTreeMap::from([(
//!     "foo".to_string(),
//!     Node::Object(BTreeMap::from([
//!         ("blep".to_string(), Node::Number(3.0)),
//!         ("mlem".to_string(), Node::Number(5.0)),
//!     ])),
//! )]));
//! let kept = filter(&v, "foo.blep").unwrap();
//! let expected = Node::Object(BTreeMap::from([(
//!     "foo".to_string(),
//!     Node::Object(BTreeMap::from([("blep".to_string(), Node::Number(3.0))])),
//! )]));
//! assert_eq!(kept, expected);
//! ```

use crate::path;
use crate::tree::Node;
use std::collections::BTreeMap;

struct Filterer<'a> {
    inverted: bool,
    recursive: bool,
    // the complete path, used to restart matching at descendants
    full_path: &'a str,
}

impl Filterer<'_> {
    fn filter(&self, v: &Node, path: &str) -> Option<Node> {
        if path.is_empty() {
            return if self.inverted { None } else { Some(v.clone()) };
        }
        if let Some(literal) = path::equality_literal(path) {
            if literal == *v {
                return if self.inverted { None } else { Some(v.clone()) };
            }
            // not equal: fall through and let the container dispatch decide
        }
        match v {
            Node::Object(entries) => {
                let (key, rest) = path::next_key(path).unwrap_or(("", path));
                let mut kept = BTreeMap::new();
                for (k, val) in entries {
                    if key == "*" || key == k {
                        if let Some(found) = self.filter(val, rest) {
                            kept.insert(k.clone(), found);
                        }
                    } else if self.recursive {
                        if let Some(found) = self.filter(val, self.full_path) {
                            kept.insert(k.clone(), found);
                        }
                    } else if self.inverted {
                        kept.insert(k.clone(), val.clone());
                    }
                }
                if self.inverted || !kept.is_empty() {
                    Some(Node::Object(kept))
                } else {
                    None
                }
            }
            Node::Array(items) => {
                let (lower, upper, rest, sliced) = path::next_slice(path, items.len());
                let mut kept = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    let in_bounds = i >= lower && i < upper;
                    if self.recursive && in_bounds {
                        // prefer the combined match: the rest of the path,
                        // then the full path applied to what it kept
                        let direct = self.filter(item, rest);
                        let chained = direct
                            .as_ref()
                            .and_then(|found| self.filter(found, self.full_path));
                        if let Some(found) = chained.or(direct) {
                            kept.push(found);
                        }
                    } else if in_bounds {
                        if let Some(found) = self.filter(item, rest) {
                            kept.push(found);
                        }
                    } else if self.recursive && !sliced {
                        if let Some(found) = self.filter(item, self.full_path) {
                            kept.push(found);
                        }
                    } else if self.inverted {
                        kept.push(item.clone());
                    }
                }
                if self.inverted || !kept.is_empty() {
                    Some(Node::Array(kept))
                } else {
                    None
                }
            }
            _ => {
                // a scalar with path remaining ends path consumption
                if self.inverted {
                    Some(v.clone())
                } else {
                    None
                }
            }
        }
    }
}

/// Filters a tree according to the path. Elements that do not match are
/// removed. The path must match from the root.
pub fn filter(v: &Node, path: &str) -> Option<Node> {
    Filterer {
        inverted: false,
        recursive: false,
        full_path: "",
    }
    .filter(v, path)
}

/// Filters a tree according to the path, inverted: elements that match are
/// removed. The path must match from the root.
pub fn filter_inverted(v: &Node, path: &str) -> Option<Node> {
    Filterer {
        inverted: true,
        recursive: false,
        full_path: "",
    }
    .filter(v, path)
}

/// Filters a tree according to the path, recursively: the path may match at
/// any depth. Elements that do not match are removed.
pub fn filter_recursive(v: &Node, path: &str) -> Option<Node> {
    Filterer {
        inverted: false,
        recursive: true,
        full_path: path,
    }
    .filter(v, path)
}

/// Filters a tree according to the path, inverted and recursive: the path
/// may match at any depth, and elements that match are removed.
pub fn filter_inverted_recursive(v: &Node, path: &str) -> Option<Node> {
    Filterer {
        inverted: true,
        recursive: true,
        full_path: path,
    }
    .filter(v, path)
}

/// Drops null values at every depth.
pub fn drop_null(v: &Node) -> Option<Node> {
    filter_inverted_recursive(v, "==null")
}
