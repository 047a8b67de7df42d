//! Structural merge: right-biased recursive union of two trees.

use crate::tree::Node;

/// Merges `b` into `a`, with `b` taking precedence wherever both define a
/// value at the same structural position.
///
/// Both operands are consumed; the result may reuse `a`'s backing storage.
/// Mismatched variants are never reconciled: the right operand wins outright.
/// Folding `merge` left-to-right over a sequence of inputs is associative in
/// effect, but the operation is not commutative.
///
/// # Examples
///
/// ```
/// use confit::{merge, Node};
/// use std::collections::BTreeMap;
///
/// let a = Node::Object(BTreeMap::from([
///     ("a".to_string(), Node::Number(1.0)),
///     ("b".to_string(), Node::Number(2.0)),
/// ]));
/// let b = Node::Object(BTreeMap::from([
///     ("b".to_string(), Node::Number(3.0)),
///     ("c".to_string(), Node::Number(4.0)),
/// ]));
/// let merged = merge(a, b);
/// let expected = Node::Object(BTreeMap::from([
///     ("a".to_string(), Node::Number(1.0)),
///     ("b".to_string(), Node::Number(3.0)),
///     ("c".to_string(), Node::Number(4.0)),
/// ]));
/// assert_eq!(merged, expected);
/// ```
pub fn merge(a: Node, b: Node) -> Node {
    match (a, b) {
        (Node::Object(mut a), Node::Object(b)) => {
            for (k, v) in b {
                match a.remove(&k) {
                    Some(u) => {
                        a.insert(k, merge(u, v));
                    }
                    None => {
                        a.insert(k, v);
                    }
                }
            }
            Node::Object(a)
        }
        (Node::Array(mut a), Node::Array(b)) => {
            for (i, v) in b.into_iter().enumerate() {
                if i < a.len() {
                    let u = std::mem::take(&mut a[i]);
                    a[i] = merge(u, v);
                } else {
                    a.push(v);
                }
            }
            Node::Array(a)
        }
        // mismatched variants and matching scalars alike: right wins
        (_, b) => b,
    }
}
