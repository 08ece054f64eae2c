//! Property-based invariant tests for layout, zoom and label truncation.
//!
//! Verifies:
//! 1. Children tile their parent's extent: contiguous, in order, and the
//!    last child ends on the parent's right edge.
//! 2. Every rectangle stays inside `[0, 1]` and inside its parent.
//! 3. `adjust` never leaves `[0, 12]`, and a no-op adjust reports false.
//! 4. Truncation is idempotent and never exceeds the slot budget.

use bfg_core::CallNode;
use bfg_core::layout::{Layout, LayoutRect, layout};
use bfg_core::views::truncate_label;
use bfg_core::zoom::{MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL, ZoomState, scale_factor};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        4 => "[a-z_]{1,12}",
    ]
}

fn arb_tree() -> impl Strategy<Value = CallNode> {
    let leaf = (arb_label(), 0.0f64..10.0).prop_map(|(label, count)| CallNode::new(label, count));
    leaf.prop_recursive(5, 64, 6, |inner| {
        (arb_label(), 0.0f64..10.0, prop::collection::vec(inner, 0..6)).prop_map(
            |(label, own, children)| {
                let sum: f64 = children.iter().map(|c| c.sample_count).sum();
                CallNode::new(label, own + sum).with_children(children)
            },
        )
    })
}

fn children_of<'a>(rects: &'a [LayoutRect<'a>], parent: usize) -> Vec<&'a LayoutRect<'a>> {
    let depth = rects[parent].depth;
    rects[parent + 1..]
        .iter()
        .take_while(|r| r.depth > depth)
        .filter(|r| r.depth == depth + 1)
        .collect()
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn children_tile_their_parent(root in arb_tree()) {
        let Layout::Partition(partition) = layout(&root, 1000.0, 400.0) else {
            prop_assert!(root.total() <= 0.0);
            return Ok(());
        };
        let rects = &partition.rects;
        prop_assert_eq!(rects.len(), root.node_count());

        for (i, parent) in rects.iter().enumerate() {
            let children = children_of(rects, i);
            if children.is_empty() || parent.node.children_total() <= 0.0 {
                continue;
            }
            let mut cursor = parent.x0;
            for child in &children {
                prop_assert!((child.x0 - cursor).abs() < EPS);
                prop_assert!(child.x1 >= child.x0);
                cursor = child.x1;
            }
            prop_assert_eq!(cursor, parent.x1);
        }
    }

    #[test]
    fn rects_stay_in_bounds(root in arb_tree()) {
        if let Layout::Partition(partition) = layout(&root, 800.0, 300.0) {
            for rect in &partition.rects {
                prop_assert!(rect.x0 >= -EPS && rect.x1 <= 1.0 + EPS);
                let px = partition.pixel_rect(rect);
                prop_assert!(px.y >= -EPS && px.y + px.h <= 300.0 + EPS);
            }
        }
    }

    #[test]
    fn zoom_never_leaves_its_range(deltas in prop::collection::vec(-20i32..20, 0..40)) {
        let mut zoom = ZoomState::new();
        for delta in deltas {
            let before = zoom.level();
            let changed = zoom.adjust(delta);
            prop_assert!((MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL).contains(&zoom.level()));
            prop_assert_eq!(changed, before != zoom.level());
            prop_assert_eq!(zoom.scale_factor(), scale_factor(zoom.level()));
        }
    }

    #[test]
    fn truncation_is_a_fixed_point(label in "\\PC{0,40}", width in 0.0f64..600.0) {
        let once = truncate_label(&label, width, 10.0);
        let twice = truncate_label(&once, width, 10.0);
        prop_assert_eq!(&twice, &once);
        let keep = (width / 10.0).floor() as usize;
        if once != label {
            let prefix: String = label.chars().take(keep).collect();
            let expected = format!("{prefix}...");
            prop_assert!(once.is_empty() || once == expected);
        }
    }
}
