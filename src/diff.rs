//! Structural diff: the minimal change needed to turn one tree into another.
//!
//! `diff` is the transpose of [`merge`](crate::merge::merge): for trees `a`
//! and `b`, merging `a` with `diff(a, b)` reconstructs `b`'s defined
//! positions.

use crate::tree::Node;
use std::collections::BTreeMap;

/// Computes the change set that turns `a` into `b`.
///
/// Returns `None` when the trees are deeply equal; otherwise a fresh tree
/// containing only the positions where `b` differs from `a`. A variant
/// change always surfaces as the whole right value, even when the two sides
/// would render identically.
pub fn diff(a: &Node, b: &Node) -> Option<Node> {
    let (v, total) = diff_inner(a, b);
    if total {
        None
    } else {
        Some(v)
    }
}

// The bool is the "total" flag: true means no difference at this position,
// so the parent omits the key or truncates the index.
fn diff_inner(a: &Node, b: &Node) -> (Node, bool) {
    if a == b {
        return (b.clone(), true);
    }
    match (a, b) {
        (Node::Object(am), Node::Object(bm)) => {
            let mut c = BTreeMap::new();
            for (k, v) in bm {
                match am.get(k) {
                    Some(u) => {
                        let (o, total) = diff_inner(u, v);
                        if !total {
                            c.insert(k.clone(), o);
                        }
                    }
                    None => {
                        c.insert(k.clone(), v.clone());
                    }
                }
            }
            // keys only in `a` are dropped: the diff describes how to reach
            // `b`, and surplus left-hand keys are irrelevant to that goal
            (Node::Object(c), false)
        }
        (Node::Array(av), Node::Array(bv)) => {
            let mut c = vec![Node::Null; bv.len()];
            let mut keep = bv.len();
            let mut found = false;
            for i in (0..bv.len()).rev() {
                if i >= av.len() {
                    c[i] = bv[i].clone();
                    found = true;
                    continue;
                }
                let (o, total) = diff_inner(&av[i], &bv[i]);
                if !total {
                    c[i] = o;
                    found = true;
                } else if found {
                    // unchanged, but a later index differs: keep the original
                    // value as a placeholder so index alignment survives a
                    // subsequent merge
                    c[i] = av[i].clone();
                } else {
                    // fully unchanged suffix: truncate instead of emitting
                    keep = i;
                }
            }
            c.truncate(keep);
            (Node::Array(c), !found)
        }
        // mismatched variants and differing scalars alike: the right value
        (_, b) => (b.clone(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(ns: &[f64]) -> Node {
        Node::Array(ns.iter().map(|n| Node::Number(*n)).collect())
    }

    #[test]
    fn test_identity_is_total() {
        assert_eq!(diff(&Node::Number(0.0), &Node::Number(0.0)), None);
        assert_eq!(diff(&nums(&[0.0, 1.0, 2.0]), &nums(&[0.0, 1.0, 2.0])), None);
    }

    #[test]
    fn test_variant_change_surfaces() {
        assert_eq!(
            diff(&Node::Number(0.0), &Node::Bool(false)),
            Some(Node::Bool(false))
        );
    }

    #[test]
    fn test_array_appended_tail() {
        assert_eq!(
            diff(&nums(&[0.0, 1.0, 2.0]), &nums(&[0.0, 1.0, 2.0, 3.0])),
            Some(nums(&[0.0, 1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn test_array_trailing_unchanged_truncated() {
        assert_eq!(
            diff(&nums(&[0.0, 1.0, 2.0]), &nums(&[2.0, 3.0, 2.0])),
            Some(nums(&[2.0, 3.0]))
        );
        assert_eq!(
            diff(&nums(&[0.0, 1.0, 2.0]), &nums(&[0.0, 3.0, 2.0])),
            Some(nums(&[0.0, 3.0]))
        );
    }

    #[test]
    fn test_shorter_right_is_total() {
        // every compared position is unchanged, so nothing remains
        assert_eq!(diff(&nums(&[0.0, 1.0, 2.0]), &nums(&[0.0, 1.0])), None);
    }
}
