//! Connector curves between a parent and each of its children.

use kurbo::{CubicBez, Point};

use crate::layout::position::PositionedNode;


/// An S-shaped cubic from a parent's bottom center to a child's top center.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub parent: String,
    pub child: String,
    pub curve: CubicBez,
}

impl Connector {
    /// The curve as an SVG path: `M sx sy C c1x c1y, c2x c2y, ex ey`.
    pub fn svg_path(&self) -> String {
        let CubicBez { p0, p1, p2, p3 } = self.curve;
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
        )
    }
}


/// Build the curve for one parent-child pair.
///
/// Both control points sit on the horizontal line halfway between the two
/// endpoints, directly below the start and directly above the end.
pub fn connector(parent: &PositionedNode, child: &PositionedNode) -> Connector {
    let start = Point::new(parent.center_x(), parent.rect.y1);
    let end = Point::new(child.center_x(), child.rect.y0);
    let mid_y = (start.y + end.y) / 2.0;
    Connector {
        parent: parent.id.clone(),
        child: child.id.clone(),
        curve: CubicBez::new(start, Point::new(start.x, mid_y), Point::new(end.x, mid_y), end),
    }
}

/// All connectors of a positioned tree, in pre-order.
pub fn connectors(root: &PositionedNode) -> Vec<Connector> {
    let mut out = Vec::new();
    collect(root, &mut out);
    out
}

fn collect(node: &PositionedNode, out: &mut Vec<Connector>) {
    for child in &node.children {
        out.push(connector(node, child));
        collect(child, out);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn positioned(id: &str, x: f64, y: f64, children: Vec<PositionedNode>) -> PositionedNode {
        PositionedNode {
            id: id.into(),
            name: id.into(),
            rect: Rect::new(x, y, x + 300.0, y + 150.0),
            children,
        }
    }

    #[test]
    fn curve_endpoints_and_controls() {
        let child = positioned("c", 400.0, 250.0, vec![]);
        let parent = positioned("p", 0.0, 0.0, vec![]);
        let c = connector(&parent, &child);
        assert_eq!(c.curve.p0, Point::new(150.0, 150.0));
        assert_eq!(c.curve.p1, Point::new(150.0, 200.0));
        assert_eq!(c.curve.p2, Point::new(550.0, 200.0));
        assert_eq!(c.curve.p3, Point::new(550.0, 250.0));
    }

    #[test]
    fn svg_path_format() {
        let c = connector(
            &positioned("p", 0.0, 0.0, vec![]),
            &positioned("c", 0.0, 250.0, vec![]),
        );
        assert_eq!(c.svg_path(), "M 150 150 C 150 200, 150 200, 150 250");
    }

    #[test]
    fn connectors_follow_pre_order() {
        let tree = positioned(
            "r",
            0.0,
            0.0,
            vec![
                positioned("a", -200.0, 250.0, vec![positioned("a1", -200.0, 500.0, vec![])]),
                positioned("b", 200.0, 250.0, vec![]),
            ],
        );
        let pairs: Vec<(String, String)> = connectors(&tree)
            .into_iter()
            .map(|c| (c.parent, c.child))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("r".to_string(), "a".to_string()),
                ("a".to_string(), "a1".to_string()),
                ("r".to_string(), "b".to_string()),
            ]
        );
    }
}
