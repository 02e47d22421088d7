//! Layout pass — turn a resource tree into absolute node rectangles.
//!
//! The pass is a pure function of the tree and the fixed constants. Nothing is
//! cached between calls; every call recomputes the whole layout.

use kurbo::{Point, Rect, Size, Vec2};

use crate::layout::connector::{self, Connector};
use crate::types::node::Node;


/// Fixed geometry used by every layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstants {
    /// Vertical distance between a parent's top edge and its children's.
    pub level_height: f64,
    pub node_width: f64,
    pub node_height: f64,
    /// Horizontal gap between adjacent siblings.
    pub sibling_gap: f64,
    /// Added once to each canvas dimension.
    pub padding: f64,
}

impl LayoutConstants {
    pub const DEFAULT: LayoutConstants = LayoutConstants {
        level_height: 250.0,
        node_width: 300.0,
        node_height: 150.0,
        sibling_gap: 60.0,
        padding: 100.0,
    };

    /// Distance between the left edges of adjacent siblings.
    pub fn stride(&self) -> f64 {
        self.node_width + self.sibling_gap
    }

    /// Width spanned by `k` siblings placed side by side.
    pub fn combined_width(&self, k: usize) -> f64 {
        if k == 0 {
            return 0.0;
        }
        k as f64 * self.stride() - self.sibling_gap
    }
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self::DEFAULT
    }
}


/// A node with its computed rectangle, in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub name: String,
    pub rect: Rect,
    pub children: Vec<PositionedNode>,
}

impl PositionedNode {
    pub fn x(&self) -> f64 {
        self.rect.x0
    }

    pub fn y(&self) -> f64 {
        self.rect.y0
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    pub fn center_x(&self) -> f64 {
        self.rect.center().x
    }

    /// Pre-order visit of every positioned node.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a PositionedNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    fn translate_x(&mut self, dx: f64) {
        self.rect = self.rect + Vec2::new(dx, 0.0);
        for child in &mut self.children {
            child.translate_x(dx);
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "x": self.x(),
            "y": self.y(),
            "width": self.width(),
            "height": self.height(),
            "children": self.children.iter().map(|c| c.to_json()).collect::<Vec<_>>(),
        })
    }
}


/// The full result of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub root: PositionedNode,
    pub canvas: Size,
    /// Parent-to-child curves in pre-order.
    pub connectors: Vec<Connector>,
}

impl Layout {
    /// Serialize for the rendering surface.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "canvas": { "width": self.canvas.width, "height": self.canvas.height },
            "tree": self.root.to_json(),
            "connectors": self.connectors
                .iter()
                .map(|c| serde_json::json!({
                    "parent": c.parent,
                    "child": c.child,
                    "path": c.svg_path(),
                }))
                .collect::<Vec<_>>(),
        })
        .to_string()
    }
}


/// Lay out a tree with the default constants.
pub fn layout(root: &Node) -> Layout {
    layout_with(root, &LayoutConstants::DEFAULT)
}

/// Lay out a tree.
///
/// # Algorithm
///
/// 1. Place the root's rectangle at `(0, 0)`.
/// 2. For a node with `k` children, the children span
///    `k * (node_width + gap) - gap`. The leftmost child's left edge sits half
///    that span left of the parent's horizontal center; each next sibling is
///    one stride to the right. Children sit one `level_height` below.
/// 3. Take the bounding box of all rectangles (the origin is always included).
///    The canvas is wide enough to hold every node on either side of the
///    root's center, plus padding, and tall enough for the deepest node plus
///    padding. For a lopsided tree this is wider than the plain
///    `max_x - min_x + padding`: the width is twice the larger of the two
///    half-extents around the root's center, so the root can sit at the
///    canvas center without pushing any node off either edge.
/// 4. Shift everything horizontally so the root's center is the canvas center.
/// 5. Emit one connector per parent-child pair, in pre-order.
pub fn layout_with(root: &Node, constants: &LayoutConstants) -> Layout {
    let mut positioned = place(root, Point::ZERO, constants);

    let (min_x, max_x, max_y) = bounds(&positioned);
    let center = positioned.center_x();
    let half_width = (center - min_x).max(max_x - center);
    let canvas = Size::new(
        2.0 * half_width + constants.padding,
        max_y + constants.padding,
    );

    positioned.translate_x(canvas.width / 2.0 - center);
    let connectors = connector::connectors(&positioned);

    Layout {
        root: positioned,
        canvas,
        connectors,
    }
}

fn place(node: &Node, origin: Point, constants: &LayoutConstants) -> PositionedNode {
    let rect = Rect::from_origin_size(origin, Size::new(constants.node_width, constants.node_height));
    let start_x = rect.center().x - constants.combined_width(node.children.len()) / 2.0;
    let child_y = origin.y + constants.level_height;

    let children = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let x = start_x + i as f64 * constants.stride();
            place(child, Point::new(x, child_y), constants)
        })
        .collect();

    PositionedNode {
        id: node.id.clone(),
        name: node.name.clone(),
        rect,
        children,
    }
}

/// `(min x, max x, max y)` over all rectangles, seeded with the origin.
fn bounds(root: &PositionedNode) -> (f64, f64, f64) {
    let mut min_x: f64 = 0.0;
    let mut max_x: f64 = 0.0;
    let mut max_y: f64 = 0.0;
    root.visit(&mut |n| {
        min_x = min_x.min(n.rect.x0);
        max_x = max_x.max(n.rect.x1);
        max_y = max_y.max(n.rect.y1);
    });
    (min_x, max_x, max_y)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const EPS: f64 = 1e-9;

    fn tree(children: usize) -> Node {
        let mut root = Node::new("r", "Root");
        for i in 0..children {
            root.children.push(Arc::new(Node::new(format!("c{}", i), "Child")));
        }
        root
    }

    #[test]
    fn combined_width_formula() {
        let c = LayoutConstants::DEFAULT;
        assert_eq!(c.combined_width(0), 0.0);
        assert_eq!(c.combined_width(1), 300.0);
        assert_eq!(c.combined_width(3), 3.0 * 360.0 - 60.0);
    }

    #[test]
    fn single_node_canvas() {
        let l = layout(&Node::new("r", "Root"));
        assert_eq!(l.canvas, Size::new(400.0, 250.0));
        assert!((l.root.center_x() - 200.0).abs() < EPS);
        assert_eq!(l.root.y(), 0.0);
        assert_eq!(l.root.width(), 300.0);
        assert_eq!(l.root.height(), 150.0);
        assert!(l.connectors.is_empty());
    }

    #[test]
    fn children_sit_one_level_down() {
        let l = layout(&tree(2));
        for child in &l.root.children {
            assert_eq!(child.y(), 250.0);
        }
        assert_eq!(l.canvas.height, 250.0 + 150.0 + 100.0);
    }

    #[test]
    fn siblings_are_centered_under_parent() {
        for k in 1..6 {
            let l = layout(&tree(k));
            let parent = l.root.center_x();
            let centers: Vec<f64> = l.root.children.iter().map(|c| c.center_x()).collect();
            for i in 0..k {
                let mirrored = centers[k - 1 - i];
                assert!(
                    ((centers[i] - parent) + (mirrored - parent)).abs() < EPS,
                    "k={} i={} not symmetric",
                    k,
                    i
                );
            }
        }
    }

    #[test]
    fn sibling_stride_is_fixed() {
        let l = layout(&tree(3));
        let xs: Vec<f64> = l.root.children.iter().map(|c| c.x()).collect();
        assert!((xs[1] - xs[0] - 360.0).abs() < EPS);
        assert!((xs[2] - xs[1] - 360.0).abs() < EPS);
    }

    #[test]
    fn root_is_centered_and_nodes_fit() {
        let mut root = tree(3);
        let mut deep = Node::new("d", "Deep");
        for i in 0..4 {
            deep.children.push(Arc::new(Node::new(format!("d{}", i), "Leaf")));
        }
        root.children.push(Arc::new(deep));

        let l = layout(&root);
        assert!((l.root.center_x() - l.canvas.width / 2.0).abs() < EPS);
        l.root.visit(&mut |n| {
            assert!(n.rect.x0 >= 0.0, "{} left of canvas", n.id);
            assert!(n.rect.x1 <= l.canvas.width, "{} right of canvas", n.id);
            assert!(n.rect.y1 <= l.canvas.height);
        });
    }

    #[test]
    fn lopsided_canvas_uses_wider_half() {
        // c1's four children reach from x = -360 to x = 1020 around a root
        // center of 150: half-extents 510 and 870.
        let mut root = tree(1);
        let mut right = Node::new("c1", "Right");
        for i in 0..4 {
            right.children.push(Arc::new(Node::new(format!("g{}", i), "Leaf")));
        }
        root.children.push(Arc::new(right));

        let l = layout(&root);
        assert!((l.canvas.width - (2.0 * 870.0 + 100.0)).abs() < EPS);
        assert!(l.canvas.width > 1020.0 + 360.0 + 100.0);
        assert!((l.root.center_x() - l.canvas.width / 2.0).abs() < EPS);
        let rightmost = l.root.children[1].children[3].rect.x1;
        assert!((rightmost - (l.canvas.width - 50.0)).abs() < EPS);
    }

    #[test]
    fn layout_is_deterministic() {
        let root = tree(4);
        assert_eq!(layout(&root), layout(&root));
    }

    #[test]
    fn to_json_has_canvas_tree_and_connectors() {
        let l = layout(&tree(2));
        let json: serde_json::Value = serde_json::from_str(&l.to_json()).unwrap();
        assert_eq!(json["canvas"]["height"], 500.0);
        assert_eq!(json["tree"]["children"].as_array().unwrap().len(), 2);
        assert_eq!(json["connectors"].as_array().unwrap().len(), 2);
        assert_eq!(json["connectors"][0]["parent"], "r");
    }
}
