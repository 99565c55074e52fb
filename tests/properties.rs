mod common;

use common::{node, scene};
use glam::Vec2;
use proptest::prelude::*;
use std::collections::HashSet;
use texnode::nodes::{NodeGraph, NodeId, NodeTypeId, SocketAddr};

const NODES: usize = 6;

fn reaches_itself(graph: &NodeGraph, start: NodeId) -> bool {
    let mut seen = HashSet::new();
    let mut stack = graph.upstream_nodes(start);
    while let Some(current) = stack.pop() {
        if current == start {
            return true;
        }
        if seen.insert(current) {
            stack.extend(graph.upstream_nodes(current));
        }
    }
    false
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever is attempted, the graph stays acyclic and a refused
    /// connection changes nothing
    #[test]
    fn prop_random_connections_keep_the_graph_acyclic(
        attempts in prop::collection::vec((0..NODES, 0..NODES, 0usize..3), 1..40)
    ) {
        let mut scene = scene();
        let ids: Vec<NodeId> = (0..NODES)
            .map(|i| node(&mut scene, NodeTypeId::Mix, i as f32 * 300.0, 0.0))
            .collect();

        for (from, to, input) in attempts {
            let edges = scene.graph().edges().len();
            let depth = scene.history().len();
            let end = SocketAddr::input(ids[to], input);
            match scene.connect(SocketAddr::output(ids[from], 0), end) {
                Ok(edge) => {
                    let edge = scene.graph().edge(edge).expect("live edge");
                    prop_assert_eq!(edge.end_socket(), end);
                    prop_assert_eq!(scene.graph().input_edge(end), Some(edge.id));
                }
                Err(_) => {
                    prop_assert_eq!(scene.graph().edges().len(), edges);
                    prop_assert_eq!(scene.history().len(), depth);
                }
            }
            for id in &ids {
                prop_assert!(!reaches_itself(scene.graph(), *id));
            }
        }

        while scene.undo() {}
        prop_assert!(scene.graph().edges().is_empty());
        prop_assert!(scene.graph().nodes().is_empty());
    }

    /// Consecutive resizes of one frame collapse into a single undo step
    #[test]
    fn prop_resizes_merge_into_their_sum(
        offsets in prop::collection::vec((-20i32..20, -20i32..20, -20i32..20, -20i32..20), 1..8)
    ) {
        let mut scene = scene();
        let frame = scene.create_frame(Vec2::ZERO);
        let start = {
            let f = scene.graph().frame(frame).unwrap();
            (f.position(), f.size())
        };
        let depth = scene.history().len();

        let mut position_sum = Vec2::ZERO;
        let mut size_sum = Vec2::ZERO;
        for (px, py, sx, sy) in offsets {
            let position = Vec2::new(px as f32, py as f32);
            let size = Vec2::new(sx as f32, sy as f32);
            scene.resize_frame(frame, position, size).unwrap();
            position_sum += position;
            size_sum += size;
        }
        prop_assert_eq!(scene.history().len(), depth + 1);
        let f = scene.graph().frame(frame).unwrap();
        prop_assert_eq!(f.position(), start.0 + position_sum);
        prop_assert_eq!(f.size(), start.1 + size_sum);

        scene.undo();
        let f = scene.graph().frame(frame).unwrap();
        prop_assert_eq!((f.position(), f.size()), start);
    }
}
