//! Partition layout: call tree → normalized flame graph rectangles.

use bfg_protocol::Rect;

use crate::model::CallNode;

/// Horizontal extent of one call node as a fraction of the root's weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect<'a> {
    pub x0: f64,
    pub x1: f64,
    pub depth: usize,
    pub node: &'a CallNode,
}

impl LayoutRect<'_> {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Result of laying out a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout<'a> {
    /// The root carries no samples (run shorter than the sampling interval).
    NoData,
    Partition(Partition<'a>),
}

/// Rectangles for every node, root first in pre-order, plus the pixel
/// box they are mapped into.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<'a> {
    pub rects: Vec<LayoutRect<'a>>,
    pub depth_count: usize,
    pub width: f64,
    pub height: f64,
}

impl Partition<'_> {
    /// Height of one depth band in pixels.
    pub fn band_height(&self) -> f64 {
        self.height / self.depth_count as f64
    }

    /// Pixel rectangle for `rect`. The root sits in the bottom band and
    /// deeper frames stack upward.
    pub fn pixel_rect(&self, rect: &LayoutRect<'_>) -> Rect {
        let band = self.band_height();
        Rect::new(
            rect.x0 * self.width,
            self.height - (rect.depth + 1) as f64 * band,
            rect.width() * self.width,
            band,
        )
    }
}

/// Lay out `root` into a `pixel_width` × `pixel_height` box.
///
/// The root spans `[0, 1]`. Each node's children split the node's own
/// extent left to right, in child order, proportionally to their share of
/// the siblings' total sample count. Spacer nodes get rectangles like any
/// other node; callers decide not to paint them.
pub fn layout(root: &CallNode, pixel_width: f64, pixel_height: f64) -> Layout<'_> {
    if root.total() <= 0.0 {
        return Layout::NoData;
    }

    let mut rects = Vec::with_capacity(root.node_count());
    let mut depth_count = 1;
    let mut stack = vec![LayoutRect {
        x0: 0.0,
        x1: 1.0,
        depth: 0,
        node: root,
    }];
    let mut siblings = Vec::new();

    while let Some(rect) = stack.pop() {
        depth_count = depth_count.max(rect.depth + 1);
        split_children(&rect, &mut siblings);
        stack.extend(siblings.drain(..).rev());
        rects.push(rect);
    }

    log::trace!(
        "laid out {} frames over {depth_count} levels at {pixel_width:.0}x{pixel_height:.0}px",
        rects.len()
    );
    Layout::Partition(Partition {
        rects,
        depth_count,
        width: pixel_width,
        height: pixel_height,
    })
}

/// Place the children of `parent` inside its extent.
///
/// Boundaries come from the running sum of counts so that siblings are
/// contiguous and the last one ends exactly on the parent's `x1`. When all
/// siblings are empty they collapse onto the parent's `x0`.
fn split_children<'a>(parent: &LayoutRect<'a>, out: &mut Vec<LayoutRect<'a>>) {
    let children = &parent.node.children;
    let total = parent.node.children_total();
    let span = parent.width();

    let mut cumulative = 0.0;
    let mut cursor = parent.x0;
    for child in children {
        cumulative += child.sample_count;
        let end = if total <= 0.0 {
            parent.x0
        } else if cumulative >= total {
            parent.x1
        } else {
            parent.x0 + span * (cumulative / total)
        };
        out.push(LayoutRect {
            x0: cursor,
            x1: end,
            depth: parent.depth + 1,
            node: child,
        });
        cursor = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(layout: Layout<'_>) -> Partition<'_> {
        match layout {
            Layout::Partition(p) => p,
            Layout::NoData => panic!("expected a partition"),
        }
    }

    #[test]
    fn splits_root_by_child_share() {
        let root = CallNode::new("root", 10.0)
            .with_children(vec![CallNode::new("a", 6.0), CallNode::new("b", 4.0)]);
        let p = partition(layout(&root, 1000.0, 200.0));
        let spans: Vec<_> = p
            .rects
            .iter()
            .map(|r| (r.node.label.as_str(), r.x0, r.x1, r.depth))
            .collect();
        assert_eq!(
            spans,
            [("root", 0.0, 1.0, 0), ("a", 0.0, 0.6, 1), ("b", 0.6, 1.0, 1)]
        );
        assert_eq!(p.depth_count, 2);
    }

    #[test]
    fn widths_compound_with_depth() {
        let root = CallNode::new("root", 4.0).with_children(vec![
            CallNode::new("a", 2.0)
                .with_children(vec![CallNode::new("a1", 1.0), CallNode::new("a2", 3.0)]),
            CallNode::new("b", 2.0),
        ]);
        let p = partition(layout(&root, 100.0, 30.0));
        let a2 = p.rects.iter().find(|r| r.node.label == "a2");
        assert_eq!(a2.map(|r| (r.x0, r.x1)), Some((0.125, 0.5)));
    }

    #[test]
    fn preorder_and_spacers_keep_width() {
        let root = CallNode::new("", 3.0).with_children(vec![
            CallNode::new("", 1.0),
            CallNode::new("work", 2.0).with_children(vec![CallNode::new("leaf", 2.0)]),
        ]);
        let p = partition(layout(&root, 300.0, 90.0));
        let order: Vec<_> = p.rects.iter().map(|r| r.node.label.as_str()).collect();
        assert_eq!(order, ["", "", "work", "leaf"]);
        let spacer = &p.rects[1];
        assert!(spacer.node.is_spacer());
        assert!((spacer.width() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_sample_root_is_no_data() {
        let root = CallNode::new("root", 0.0);
        assert_eq!(layout(&root, 800.0, 600.0), Layout::NoData);
    }

    #[test]
    fn empty_siblings_collapse_to_zero_width() {
        let root = CallNode::new("root", 1.0)
            .with_children(vec![CallNode::new("a", 0.0), CallNode::new("b", 0.0)]);
        let p = partition(layout(&root, 100.0, 20.0));
        assert!(p.rects[1..].iter().all(|r| r.x0 == 0.0 && r.x1 == 0.0));
    }

    #[test]
    fn pixel_rects_stack_upward_from_bottom() {
        let root = CallNode::new("root", 2.0).with_children(vec![CallNode::new("a", 1.0)]);
        let p = partition(layout(&root, 200.0, 100.0));
        assert_eq!(p.pixel_rect(&p.rects[0]), Rect::new(0.0, 50.0, 200.0, 50.0));
        assert_eq!(p.pixel_rect(&p.rects[1]), Rect::new(0.0, 0.0, 200.0, 50.0));
    }

    #[test]
    fn layout_is_deterministic() {
        let root = CallNode::new("root", 3.0).with_children(vec![
            CallNode::new("x", 1.1),
            CallNode::new("y", 0.7),
            CallNode::new("z", 1.2),
        ]);
        assert_eq!(layout(&root, 640.0, 480.0), layout(&root, 640.0, 480.0));
    }
}
