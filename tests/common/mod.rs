#![allow(dead_code)]

use glam::Vec2;
use texnode::editor::Scene;
use texnode::nodes::{ItemRef, NodeId, NodeTypeId, SequentialOperator, SocketAddr};
use texnode::EditorConfig;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn scene() -> Scene<SequentialOperator> {
    init_logging();
    Scene::new(EditorConfig::default(), SequentialOperator::new())
}

pub fn node(scene: &mut Scene<SequentialOperator>, type_id: NodeTypeId, x: f32, y: f32) -> NodeId {
    scene.create_node(type_id, Vec2::new(x, y))
}

pub fn link(scene: &mut Scene<SequentialOperator>, from: NodeId, to: NodeId, input: usize) -> usize {
    scene
        .connect(SocketAddr::output(from, 0), SocketAddr::input(to, input))
        .expect("connection accepted")
}

pub fn position(scene: &Scene<SequentialOperator>, id: NodeId) -> Vec2 {
    scene.graph().node(id).expect("live node").position
}

/// Structural state that undo must restore exactly
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<(NodeId, Vec2, Option<usize>)>,
    pub frames: Vec<(usize, Vec2, Vec2, String, Vec<NodeId>)>,
    pub edges: Vec<(usize, SocketAddr, SocketAddr)>,
    pub selection: Vec<ItemRef>,
}

pub fn snapshot(scene: &Scene<SequentialOperator>) -> Snapshot {
    let graph = scene.graph();
    Snapshot {
        nodes: graph
            .nodes()
            .values()
            .map(|n| (n.id, n.position, n.attached_frame()))
            .collect(),
        frames: graph
            .frames()
            .values()
            .map(|f| {
                let mut content = f.content().to_vec();
                content.sort_unstable();
                (f.id, f.position(), f.size(), f.title().to_string(), content)
            })
            .collect(),
        edges: graph
            .edges()
            .values()
            .map(|e| (e.id, e.start_socket(), e.end_socket()))
            .collect(),
        selection: scene.selection().to_vec(),
    }
}

/// Input socket values of every node, for commands that do not re-evaluate
pub fn input_values(scene: &Scene<SequentialOperator>) -> Vec<(NodeId, Vec<u32>)> {
    scene
        .graph()
        .nodes()
        .values()
        .map(|n| (n.id, n.input_values().iter().map(|v| v.0).collect()))
        .collect()
}
