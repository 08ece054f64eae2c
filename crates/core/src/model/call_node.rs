use bfg_protocol::SharedStr;
use serde::Serialize;

/// One node of the aggregated call tree.
///
/// `sample_count` is sampled CPU time in seconds. Children are kept in the
/// order the backend reported them; that order decides left-to-right
/// placement in the flame graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallNode {
    pub label: SharedStr,
    pub sample_count: f64,
    pub children: Vec<CallNode>,
}

impl CallNode {
    pub fn new(label: impl Into<SharedStr>, sample_count: f64) -> Self {
        Self {
            label: label.into(),
            sample_count,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<CallNode>) -> Self {
        self.children = children;
        self
    }

    /// Spacers have an empty label and stand for idle/gap time. They take
    /// up width but are never drawn or hovered.
    pub fn is_spacer(&self) -> bool {
        self.label.is_empty()
    }

    /// Sum of the immediate children's sample counts.
    pub fn children_total(&self) -> f64 {
        self.children.iter().map(|c| c.sample_count).sum()
    }

    /// Weight of the subtree: its own count, or the children's sum if the
    /// backend under-reported the parent.
    pub fn total(&self) -> f64 {
        self.sample_count.max(self.children_total())
    }

    /// Number of depth levels in the subtree (a leaf has one).
    pub fn depth_count(&self) -> usize {
        self.preorder().map(|(depth, _)| depth + 1).max().unwrap_or(1)
    }

    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }

    /// Pre-order traversal yielding `(depth, node)`, root first.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: vec![(0, self)],
        }
    }
}

pub struct Preorder<'a> {
    stack: Vec<(usize, &'a CallNode)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a CallNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}
