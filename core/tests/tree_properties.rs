//! Property tests for the tree invariants over random edit sequences.

use proptest::prelude::*;
use tracktree_core::data::tree;
use tracktree_core::layout;
use tracktree_core::sys::Sys;
use tracktree_core::types::node::Node;
use tracktree_core::types::track::TrackKind;

const TRACKS: [&str; 3] = ["a", "b", "c"];

#[derive(Debug, Clone)]
enum Op {
    AddChild(usize),
    Delete(usize),
    Toggle(usize, usize),
    Set(usize, usize, f64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<usize>().prop_map(Op::AddChild),
        1 => any::<usize>().prop_map(Op::Delete),
        4 => (any::<usize>(), 0..TRACKS.len()).prop_map(|(n, t)| Op::Toggle(n, t)),
        2 => (any::<usize>(), 0..TRACKS.len(), -1e6..1e6f64).prop_map(|(n, t, v)| Op::Set(n, t, v)),
    ]
}

fn node_ids(sys: &Sys) -> Vec<String> {
    tree::walk(sys.tree()).iter().map(|n| n.id.clone()).collect()
}

/// Build a session by replaying `ops`. Individual failures (deleting the
/// root, setting an inactive track) are expected and ignored.
fn build(ops: &[Op]) -> Sys {
    let mut sys = Sys::default();
    for t in TRACKS {
        sys.add_track(t.to_uppercase(), "#888888".into(), TrackKind::Regular, Some(t.into()))
            .unwrap();
    }
    for op in ops {
        let ids = node_ids(&sys);
        let pick = |i: usize| ids[i % ids.len()].clone();
        let _ = match op {
            Op::AddChild(p) => sys.add_node(&pick(*p), "n").map(|_| ()),
            Op::Delete(n) => sys.delete_node(&pick(*n)),
            Op::Toggle(n, t) => sys.toggle_track(&pick(*n), TRACKS[*t]).map(|_| ()),
            Op::Set(n, t, v) => sys.set_quantity(&pick(*n), TRACKS[*t], *v),
        };
    }
    sys
}

fn check_inheritance(node: &Node) -> Result<(), TestCaseError> {
    for child in &node.children {
        for t in &child.active_tracks {
            prop_assert!(node.is_active(t), "{} has {} but parent {} does not", child.id, t, node.id);
        }
        check_inheritance(child)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn edits_preserve_invariants(ops in prop::collection::vec(op(), 0..60)) {
        let sys = build(&ops);
        check_inheritance(sys.tree())?;
        for n in tree::walk(sys.tree()) {
            for k in n.quantities.keys() {
                prop_assert!(n.is_active(k), "{} has quantity for inactive {}", n.id, k);
            }
        }
        prop_assert!(sys.violations().is_empty());
    }

    #[test]
    fn deactivation_cascades(ops in prop::collection::vec(op(), 0..60), pick in any::<usize>(), t in 0..TRACKS.len()) {
        let mut sys = build(&ops);
        let track = TRACKS[t];
        let active: Vec<String> = tree::walk(sys.tree())
            .iter()
            .filter(|n| n.is_active(track))
            .map(|n| n.id.clone())
            .collect();
        prop_assume!(!active.is_empty());
        let target = active[pick % active.len()].clone();

        prop_assert!(sys.toggle_track(&target, track).unwrap());
        let node = tree::find(sys.tree(), &target).unwrap();
        prop_assert!(!node.references_track(track));
    }

    #[test]
    fn deleting_a_track_removes_it_everywhere(ops in prop::collection::vec(op(), 0..60), t in 0..TRACKS.len()) {
        let mut sys = build(&ops);
        let track = TRACKS[t];
        sys.delete_track(track).unwrap();
        prop_assert!(!sys.tracks().contains(track));
        prop_assert!(!sys.tree().references_track(track));
        prop_assert!(sys.violations().is_empty());
    }

    #[test]
    fn layout_is_pure_and_centered(ops in prop::collection::vec(op(), 0..40)) {
        let sys = build(&ops);
        let first = layout::layout(sys.tree());
        prop_assert_eq!(&first, &layout::layout(sys.tree()));

        let mut stack = vec![&first.root];
        while let Some(parent) = stack.pop() {
            let k = parent.children.len();
            for i in 0..k {
                let left = parent.children[i].center_x() - parent.center_x();
                let right = parent.children[k - 1 - i].center_x() - parent.center_x();
                prop_assert!((left + right).abs() < 1e-6);
            }
            stack.extend(parent.children.iter());
        }
        prop_assert_eq!(first.connectors.len(), tree::node_count(sys.tree()) - 1);
    }

    #[test]
    fn export_import_round_trip(ops in prop::collection::vec(op(), 0..40)) {
        let sys = build(&ops);
        let text = sys.export().unwrap();
        let mut other = Sys::default();
        other.import(&text).unwrap();
        prop_assert_eq!(other.tracks(), sys.tracks());
        prop_assert_eq!(other.tree(), sys.tree());
    }
}
