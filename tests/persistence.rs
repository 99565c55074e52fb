mod common;

use common::{link, node, position, scene};
use glam::Vec2;
use texnode::editor::{FileManager, SceneDocument};
use texnode::nodes::{ItemRef, NodeTypeId, Property, PropertyValue, SocketAddr};

fn sample() -> texnode::Scene<texnode::nodes::SequentialOperator> {
    let mut scene = scene();
    let a = node(&mut scene, NodeTypeId::Noise, 0.0, 0.0);
    let b = node(&mut scene, NodeTypeId::Inverse, 300.0, 40.0);
    node(&mut scene, NodeTypeId::Color, 0.0, 400.0);
    link(&mut scene, a, b, 0);
    scene
        .change_property(ItemRef::Node(a), Property::Scale, PropertyValue::Int(12))
        .unwrap();
    scene.select(vec![ItemRef::Node(a), ItemRef::Node(b)]);
    let frame = scene.create_frame(Vec2::ZERO);
    scene.rename_frame(frame, "Base").unwrap();
    scene.pan_by(Vec2::new(15.0, 5.0));
    scene
}

#[test]
fn document_survives_a_json_round_trip() {
    let original = sample();
    let document = original.save_document().unwrap();
    let json = serde_json::to_string(&document).unwrap();
    let parsed: SceneDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, document);

    let mut restored = scene();
    restored.load_document(&parsed).unwrap();
    assert_eq!(restored.save_document().unwrap(), document);
    assert!(!restored.can_undo());
    assert!(restored.selection().is_empty());

    let graph = restored.graph();
    assert_eq!(graph.nodes().len(), 3);
    assert_eq!(graph.edges().len(), 1);
    let frame = graph.frames().values().next().unwrap();
    assert_eq!(frame.title(), "Base");
    assert_eq!(frame.content().len(), 2);
    assert_eq!(
        graph.node(0).unwrap().property(Property::Scale).unwrap(),
        PropertyValue::Int(12)
    );
    assert_eq!(position(&restored, 1), Vec2::new(300.0, 40.0));
}

#[test]
fn loaded_scene_is_evaluated() {
    let document = sample().save_document().unwrap();
    let mut restored = scene();
    restored.load_document(&document).unwrap();
    let graph = restored.graph();
    let output = graph.socket(SocketAddr::output(0, 0)).unwrap().value();
    assert_eq!(graph.socket(SocketAddr::input(1, 0)).unwrap().value(), output);
    assert_eq!(restored.engine().last_stats().evaluated.len(), 3);
}

#[test]
fn edge_to_unknown_socket_fails_and_leaves_scene_empty() {
    let mut document = sample().save_document().unwrap();
    document.edges[0].start_socket.0 = uuid::Uuid::new_v4();

    let mut restored = scene();
    node(&mut restored, NodeTypeId::Color, 0.0, 0.0);
    assert!(restored.load_document(&document).is_err());
    assert!(restored.graph().nodes().is_empty());
}

#[test]
fn file_manager_saves_and_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bricks.json");
    let original = sample();

    let mut manager = FileManager::new();
    manager.mark_modified();
    manager.save_to_file(&path, &original).unwrap();
    assert!(!manager.has_unsaved_changes());
    assert_eq!(manager.file_display_name(), "bricks.json");

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["version"], "1.0");
    assert!(value["metadata"]["creator"].as_str().unwrap().starts_with("texnode"));

    let mut restored = scene();
    let mut loader = FileManager::new();
    loader.load_from_file(&path, &mut restored).unwrap();
    assert_eq!(loader.current_file_path(), Some(path.as_path()));
    assert_eq!(restored.save_document().unwrap(), original.save_document().unwrap());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut restored = scene();
    let result = FileManager::new().load_from_file(&dir.path().join("absent.json"), &mut restored);
    assert!(matches!(result, Err(texnode::GraphError::Io(_))));
}

#[test]
fn degenerate_view_is_clamped_on_load() {
    let mut source = scene();
    node(&mut source, NodeTypeId::Noise, 0.0, 0.0);
    let mut document = source.save_document().unwrap();
    document.view.scale = 0.0;

    let mut restored = scene();
    restored.load_document(&document).unwrap();
    assert_eq!(restored.view().scale, 0.1);
    let hit = restored.to_device(Vec2::new(10.0, 10.0));
    assert_eq!(restored.node_at(hit), Some(0));

    document.view.scale = f32::NAN;
    document.view.pan = Vec2::new(f32::INFINITY, 0.0);
    restored.load_document(&document).unwrap();
    assert_eq!(restored.view().scale, 1.0);
    assert_eq!(restored.view().pan, Vec2::ZERO);
}
