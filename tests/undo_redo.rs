mod common;

use common::{input_values, link, node, position, scene, snapshot};
use glam::Vec2;
use texnode::constants::frame::{HEADER_HEIGHT, MARGIN};
use texnode::editor::Scene;
use texnode::nodes::{ItemRef, NodeTypeId, Property, PropertyValue, SequentialOperator, SocketAddr};

type Step = Box<dyn Fn(&mut Scene<SequentialOperator>)>;

fn step(f: impl Fn(&mut Scene<SequentialOperator>) + 'static) -> Step {
    Box::new(f)
}

#[test]
fn moving_a_frame_moves_its_nodes_and_undoes() {
    let mut scene = scene();
    let n = node(&mut scene, NodeTypeId::Noise, 100.0, 100.0);
    scene.select(vec![ItemRef::Node(n)]);
    let f = scene.create_frame(Vec2::ZERO);
    let frame_before = scene.graph().frame(f).unwrap().position();
    assert_eq!(frame_before, Vec2::new(100.0 - MARGIN, 100.0 - MARGIN - HEADER_HEIGHT));

    scene.move_items(&[ItemRef::Frame(f)], Vec2::new(10.0, 10.0));
    assert_eq!(position(&scene, n), Vec2::new(110.0, 110.0));
    assert_eq!(scene.graph().frame(f).unwrap().position(), frame_before + Vec2::new(10.0, 10.0));

    assert!(scene.undo());
    assert_eq!(position(&scene, n), Vec2::new(100.0, 100.0));
    assert_eq!(scene.graph().frame(f).unwrap().position(), frame_before);
}

#[test]
fn delete_with_save_connection_bridges_and_undoes() {
    let mut scene = scene();
    let up = node(&mut scene, NodeTypeId::Color, 0.0, 0.0);
    let n = node(&mut scene, NodeTypeId::Inverse, 300.0, 0.0);
    let down = node(&mut scene, NodeTypeId::Grayscale, 600.0, 0.0);
    let e1 = link(&mut scene, up, n, 0);
    let e2 = link(&mut scene, n, down, 0);

    scene.select(vec![ItemRef::Node(n)]);
    scene.delete_selection(true);

    let graph = scene.graph();
    assert!(graph.node(n).is_none());
    assert!(graph.edge(e1).is_none() && graph.edge(e2).is_none());
    let bridge = graph
        .find_edge(SocketAddr::output(up, 0), SocketAddr::input(down, 0))
        .expect("bridge edge");
    assert_eq!(graph.edges().len(), 1);
    // the bridge feeds the downstream node
    assert_eq!(
        graph.socket(SocketAddr::input(down, 0)).unwrap().value(),
        graph.socket(SocketAddr::output(up, 0)).unwrap().value()
    );

    assert!(scene.undo());
    let graph = scene.graph();
    assert!(graph.edge(bridge).is_none());
    assert!(graph.node(n).is_some());
    assert_eq!(graph.edge(e1).unwrap().end_socket(), SocketAddr::input(n, 0));
    assert_eq!(graph.edge(e2).unwrap().start_socket(), SocketAddr::output(n, 0));
    assert_eq!(scene.selection(), &[ItemRef::Node(n)]);
}

#[test]
fn delete_of_frame_keeps_members() {
    let mut scene = scene();
    let n = node(&mut scene, NodeTypeId::Noise, 0.0, 0.0);
    scene.select(vec![ItemRef::Node(n)]);
    let f = scene.create_frame(Vec2::ZERO);
    scene.select(vec![ItemRef::Frame(f)]);
    scene.delete_selection(false);
    assert!(scene.graph().frame(f).is_none());
    assert_eq!(scene.graph().node(n).unwrap().attached_frame(), None);

    scene.undo();
    assert_eq!(scene.graph().node(n).unwrap().attached_frame(), Some(f));
    assert_eq!(scene.graph().frame(f).unwrap().content(), &[n]);
}

#[test]
fn every_command_undoes_to_the_previous_state() {
    let mut scene = scene();
    let a = node(&mut scene, NodeTypeId::Color, 0.0, 0.0);
    let b = node(&mut scene, NodeTypeId::Inverse, 300.0, 0.0);
    let c = node(&mut scene, NodeTypeId::Blur, 600.0, 0.0);
    let edge = link(&mut scene, a, b, 0);
    scene.select(vec![ItemRef::Node(b)]);
    let frame = scene.create_frame(Vec2::ZERO);

    let steps: Vec<(&str, Step)> = vec![
        ("select", step(move |s| s.select(vec![ItemRef::Node(a), ItemRef::Frame(frame)]))),
        ("move", step(move |s| s.move_items(&[ItemRef::Node(c)], Vec2::new(5.0, -5.0)))),
        ("add node", step(|s| {
            s.create_node(NodeTypeId::Threshold, Vec2::new(0.0, 400.0));
        })),
        ("add edge", step(move |s| {
            s.connect(SocketAddr::output(b, 0), SocketAddr::input(c, 1)).unwrap();
        })),
        ("add frame", step(move |s| {
            s.select(vec![ItemRef::Node(c)]);
            s.create_frame(Vec2::ZERO);
        })),
        ("reroute", step(move |s| s.reroute_edge(edge, SocketAddr::input(c, 0)).unwrap())),
        ("detach", step(move |s| s.detach_from_frame(&[b]))),
        ("resize", step(move |s| {
            s.resize_frame(frame, Vec2::new(-4.0, 0.0), Vec2::new(8.0, 2.0)).unwrap()
        })),
        ("title", step(move |s| s.rename_frame(frame, "Base").unwrap())),
        ("property", step(move |s| {
            s.change_property(ItemRef::Node(c), Property::Intensity, PropertyValue::Float(0.9))
                .unwrap()
        })),
        ("delete", step(move |s| {
            s.select(vec![ItemRef::Node(b), ItemRef::Frame(frame)]);
            s.delete_selection(true);
        })),
    ];

    for (name, apply) in steps {
        let before = snapshot(&scene);
        let depth = scene.history().len();
        apply(&mut scene);
        let after = snapshot(&scene);

        while scene.history().len() > depth {
            assert!(scene.undo(), "{name}: undo");
        }
        assert_eq!(snapshot(&scene), before, "{name}: undo");

        while scene.can_redo() {
            scene.redo();
        }
        assert_eq!(snapshot(&scene), after, "{name}: redo");
        for _ in depth..scene.history().len() {
            scene.undo();
        }
        assert_eq!(snapshot(&scene), before, "{name}: undo after redo");
        while scene.can_redo() {
            scene.redo();
        }
    }
}

#[test]
fn geometry_only_commands_restore_socket_values() {
    let mut scene = scene();
    let a = node(&mut scene, NodeTypeId::Color, 0.0, 0.0);
    let b = node(&mut scene, NodeTypeId::Inverse, 300.0, 0.0);
    link(&mut scene, a, b, 0);
    let values = input_values(&scene);

    scene.move_items(&[ItemRef::Node(a), ItemRef::Node(b)], Vec2::new(30.0, 0.0));
    scene.select(vec![ItemRef::Node(b)]);
    scene.undo();
    scene.undo();
    assert_eq!(input_values(&scene), values);
}

#[test]
fn dragging_a_node_over_an_edge_splices_it() {
    let mut scene = scene();
    let a = node(&mut scene, NodeTypeId::Color, 0.0, 0.0);
    let b = node(&mut scene, NodeTypeId::Grayscale, 800.0, 0.0);
    let n = node(&mut scene, NodeTypeId::Inverse, 400.0, 600.0);
    let edge = link(&mut scene, a, b, 0);
    let before = snapshot(&scene);

    let start = scene.to_device(Vec2::new(450.0, 650.0));
    scene.press_node(n, start, false);
    scene.drag_to(start + Vec2::new(0.0, -300.0));
    scene.drag_to(start + Vec2::new(0.0, -600.0));
    assert_eq!(scene.interaction().splice_candidate(), Some(edge));
    assert!(scene.graph().edge(edge).unwrap().selected());
    scene.release();

    let graph = scene.graph();
    assert_eq!(position(&scene, n), Vec2::new(400.0, 0.0));
    assert_eq!(graph.edge(edge).unwrap().end_socket(), SocketAddr::input(n, 0));
    assert!(graph.find_edge(SocketAddr::output(n, 0), SocketAddr::input(b, 0)).is_some());
    assert!(!graph.edge(edge).unwrap().selected());
    let b_inputs = &scene.operator().renders().last().unwrap();
    assert_eq!(b_inputs.node, b);

    // one undo for the move, one for the selection
    scene.undo();
    scene.undo();
    assert_eq!(snapshot(&scene), before);
}

#[test]
fn dropping_a_node_into_a_frame_adopts_it() {
    let mut scene = scene();
    let inside = node(&mut scene, NodeTypeId::Noise, 0.0, 0.0);
    scene.select(vec![ItemRef::Node(inside)]);
    let f = scene.create_frame(Vec2::ZERO);
    let geometry = {
        let frame = scene.graph().frame(f).unwrap();
        (frame.position(), frame.size())
    };
    let loose = node(&mut scene, NodeTypeId::Color, 1000.0, 0.0);

    let start = scene.to_device(Vec2::new(1010.0, 10.0));
    scene.press_node(loose, start, false);
    scene.drag_to(start - Vec2::new(1000.0, 0.0));
    scene.release();

    assert_eq!(scene.graph().node(loose).unwrap().attached_frame(), Some(f));
    assert!(scene.graph().frame(f).unwrap().contains_node(loose));

    scene.undo();
    let frame = scene.graph().frame(f).unwrap();
    assert_eq!(scene.graph().node(loose).unwrap().attached_frame(), None);
    assert_eq!((frame.position(), frame.size()), geometry);
    assert_eq!(position(&scene, loose), Vec2::new(1000.0, 0.0));
}

#[test]
fn undoing_a_move_restores_a_resized_parent_frame() {
    let mut scene = scene();
    let n = node(&mut scene, NodeTypeId::Noise, 100.0, 100.0);
    scene.select(vec![ItemRef::Node(n)]);
    let f = scene.create_frame(Vec2::ZERO);
    scene.resize_frame(f, Vec2::ZERO, Vec2::new(100.0, 0.0)).unwrap();
    scene.select(vec![ItemRef::Node(n)]);
    let geometry = |scene: &Scene<SequentialOperator>| {
        let frame = scene.graph().frame(f).unwrap();
        (frame.position(), frame.size())
    };
    let resized = geometry(&scene);

    scene.move_items(&[ItemRef::Node(n)], Vec2::new(10.0, 0.0));
    let moved = geometry(&scene);
    assert_ne!(moved, resized);

    assert!(scene.undo());
    assert_eq!(geometry(&scene), resized);
    assert_eq!(position(&scene, n), Vec2::new(100.0, 100.0));
    assert!(scene.redo());
    assert_eq!(geometry(&scene), moved);
}

#[test]
fn cancelled_drag_puts_items_back() {
    let mut scene = scene();
    let n = node(&mut scene, NodeTypeId::Noise, 100.0, 100.0);
    scene.select(vec![ItemRef::Node(n)]);
    let f = scene.create_frame(Vec2::ZERO);
    scene.resize_frame(f, Vec2::ZERO, Vec2::new(100.0, 0.0)).unwrap();
    scene.select(Vec::new());

    let start = scene.to_device(Vec2::new(110.0, 110.0));
    scene.press_node(n, start, false);
    let before = snapshot(&scene);
    let depth = scene.history().len();

    scene.drag_to(start + Vec2::new(40.0, 0.0));
    scene.drag_to(start + Vec2::new(80.0, 30.0));
    assert_ne!(snapshot(&scene), before);
    scene.cancel_drag();

    assert_eq!(snapshot(&scene), before);
    assert_eq!(scene.history().len(), depth);
    scene.release();
    assert_eq!(scene.history().len(), depth);
}

#[test]
fn click_on_group_member_collapses_selection() {
    let mut scene = scene();
    let a = node(&mut scene, NodeTypeId::Color, 0.0, 0.0);
    let b = node(&mut scene, NodeTypeId::Color, 300.0, 0.0);
    scene.select(vec![ItemRef::Node(a), ItemRef::Node(b)]);
    scene.press_node(b, Vec2::ZERO, false);
    assert_eq!(scene.selection(), &[ItemRef::Node(a), ItemRef::Node(b)]);
    scene.release();
    assert_eq!(scene.selection(), &[ItemRef::Node(b)]);
    assert!(!scene.graph().node(a).unwrap().selected());

    scene.press_node(a, Vec2::ZERO, true);
    scene.release();
    assert_eq!(scene.selection(), &[ItemRef::Node(b), ItemRef::Node(a)]);
}

#[test]
fn consecutive_resizes_are_one_undo_step() {
    let mut scene = scene();
    let f = scene.create_frame(Vec2::ZERO);
    let size = scene.graph().frame(f).unwrap().size();
    scene.resize_frame(f, Vec2::ZERO, Vec2::new(10.0, 0.0)).unwrap();
    scene.resize_frame(f, Vec2::ZERO, Vec2::new(0.0, 7.0)).unwrap();
    assert_eq!(scene.graph().frame(f).unwrap().size(), size + Vec2::new(10.0, 7.0));
    scene.undo();
    assert_eq!(scene.graph().frame(f).unwrap().size(), size);
    assert_eq!(scene.history().undo_text().as_deref(), Some("Add Frame"));
}

#[test]
fn cycles_and_occupied_targets_are_rejected_before_mutation() {
    let mut scene = scene();
    let a = node(&mut scene, NodeTypeId::Inverse, 0.0, 0.0);
    let b = node(&mut scene, NodeTypeId::Grayscale, 300.0, 0.0);
    let c = node(&mut scene, NodeTypeId::Mix, 600.0, 0.0);
    link(&mut scene, a, b, 0);
    let bc = link(&mut scene, b, c, 0);
    let depth = scene.history().len();

    assert!(scene.connect(SocketAddr::output(c, 0), SocketAddr::input(a, 0)).is_err());
    assert!(scene.reroute_edge(bc, SocketAddr::input(a, 0)).is_err());
    assert_eq!(scene.history().len(), depth);
    assert_eq!(scene.graph().edges().len(), 2);
}
