//! The pipeline accumulator: ordered tree slots driven by the CLI.
//!
//! Most invocations use exactly one slot; several exist only when a merge
//! or diff input decodes to multiple documents, which spread across slots
//! by index. Every operation applies to every slot, strictly in pipeline
//! order, and each operation observes the cumulative effect of all prior
//! ones.

use crate::diff::diff;
use crate::error::RenderError;
use crate::filter;
use crate::merge::merge;
use crate::query;
use crate::render;
use crate::tree::Node;
use std::io::Write;

/// An ordered collection of independent tree value slots.
#[derive(Debug, Default)]
pub struct Pipeline {
    slots: Vec<Node>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: Vec<Node>) -> Self {
        Self { slots: values }
    }

    // new slots default to null
    fn grow_to(&mut self, len: usize) {
        while self.slots.len() < len {
            self.slots.push(Node::Null);
        }
    }

    /// Merges `values[i]` into slot `i`, growing the slot list on demand.
    pub fn merge(&mut self, values: Vec<Node>) {
        self.grow_to(values.len());
        for (i, value) in values.into_iter().enumerate() {
            let current = std::mem::take(&mut self.slots[i]);
            self.slots[i] = merge(current, value);
        }
    }

    /// Diffs slot `i` against `values[i]`, growing the slot list on demand.
    /// A slot with no difference becomes null.
    pub fn diff(&mut self, values: Vec<Node>) {
        self.grow_to(values.len());
        for (i, value) in values.into_iter().enumerate() {
            self.slots[i] = diff(&self.slots[i], &value).unwrap_or(Node::Null);
        }
    }

    pub fn filter(&mut self, path: &str) {
        for slot in &mut self.slots {
            let kept = filter::filter(slot, path).unwrap_or(Node::Null);
            *slot = kept;
        }
    }

    pub fn filter_inverted(&mut self, path: &str) {
        for slot in &mut self.slots {
            let kept = filter::filter_inverted(slot, path).unwrap_or(Node::Null);
            *slot = kept;
        }
    }

    pub fn filter_recursive(&mut self, path: &str) {
        for slot in &mut self.slots {
            let kept = filter::filter_recursive(slot, path).unwrap_or(Node::Null);
            *slot = kept;
        }
    }

    pub fn filter_inverted_recursive(&mut self, path: &str) {
        for slot in &mut self.slots {
            let kept = filter::filter_inverted_recursive(slot, path).unwrap_or(Node::Null);
            *slot = kept;
        }
    }

    /// Replaces each slot with the result of the query expression. A failed
    /// evaluation leaves the slot null: query extracts, it does not
    /// validate.
    pub fn query(&mut self, expr: &str) {
        for slot in &mut self.slots {
            let result = query::eval(expr, slot).unwrap_or(Node::Null);
            *slot = result;
        }
    }

    /// Renders the template once per slot, in slot order, into `out`,
    /// failing fast on the first error.
    pub fn render<W: Write>(&self, out: &mut W, template: &str) -> Result<(), RenderError> {
        render::render_all(out, template, &self.slots)
    }

    pub fn value(&self, index: usize) -> Option<&Node> {
        self.slots.get(index)
    }

    pub fn values(&self) -> &[Node] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_then_merge_overlays() {
        let mut p = Pipeline::new();
        p.merge(vec![Node::Bool(false)]);
        p.merge(vec![Node::Bool(true)]);
        assert_eq!(p.value(0), Some(&Node::Bool(true)));
    }

    #[test]
    fn test_slots_grow_on_demand() {
        let mut p = Pipeline::new();
        p.merge(vec![Node::Number(1.0), Node::Number(2.0)]);
        assert_eq!(p.values().len(), 2);
        p.diff(vec![Node::Number(1.0)]);
        assert_eq!(p.value(0), Some(&Node::Null));
        assert_eq!(p.value(1), Some(&Node::Number(2.0)));
    }

    #[test]
    fn test_diff_on_fresh_slot_takes_input() {
        // merge and diff agree on a null slot: the tree becomes the input
        let mut p = Pipeline::new();
        p.diff(vec![Node::Number(7.0)]);
        assert_eq!(p.value(0), Some(&Node::Number(7.0)));
    }

    #[test]
    fn test_out_of_range_slot_is_none() {
        let p = Pipeline::new();
        assert_eq!(p.value(3), None);
    }
}
