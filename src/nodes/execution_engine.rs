//! Node graph execution engine
//!
//! Keeps every texture consistent after an edit:
//! - Dirty roots are collected from node state
//! - Their downstream closure is found with an iterative walk
//! - The closure is ordered with Kahn's topological sort
//! - Each node runs at most once, and only if it was dirty or an upstream
//!   node produced a new texture in this pass
//!
//! After a node runs, its new output is pushed into every connected
//! downstream input socket.

use crate::nodes::{NodeGraph, NodeId, TextureHandle, TextureOperator};
use log::debug;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Represents the execution state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Output is consistent with inputs and parameters
    #[default]
    Idle,
    /// Needs re-evaluation
    Dirty,
}

/// Why a node did not recompute in a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    ResolutionMismatch(NodeId),
    AwaitingInput,
}

/// Statistics about the last evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Nodes considered in the pass (dirty roots plus their downstream closure)
    pub visited: usize,
    /// Nodes whose operation ran, in order
    pub evaluated: Vec<NodeId>,
    /// Nodes that refused to recompute
    pub skipped: Vec<NodeId>,
}

/// Execution engine for node graphs
#[derive(Debug, Default)]
pub struct ExecutionEngine {
    last_stats: ExecutionStats,
    total_evaluations: usize,
}

impl ExecutionEngine {
    /// Create a new execution engine
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_stats(&self) -> &ExecutionStats {
        &self.last_stats
    }

    /// Number of node operations run since the engine was created
    pub fn total_evaluations(&self) -> usize {
        self.total_evaluations
    }

    /// Whether any node is waiting for evaluation
    pub fn has_dirty(graph: &NodeGraph) -> bool {
        graph.nodes().values().any(|n| n.state() == NodeState::Dirty)
    }

    /// Run every dirty node and whatever depends on it
    pub fn evaluate(
        &mut self,
        graph: &mut NodeGraph,
        operator: &mut dyn TextureOperator,
    ) -> &ExecutionStats {
        let roots: BTreeSet<NodeId> = graph
            .nodes()
            .values()
            .filter(|n| n.state() == NodeState::Dirty)
            .map(|n| n.id)
            .collect();

        let mut stats = ExecutionStats::default();
        if roots.is_empty() {
            self.last_stats = stats;
            return &self.last_stats;
        }

        let closure = Self::downstream_closure(graph, &roots);
        let order = Self::execution_order(graph, &closure);
        stats.visited = order.len();

        let mut changed: HashSet<NodeId> = HashSet::new();
        for node_id in order {
            let upstream_changed = graph
                .upstream_nodes(node_id)
                .iter()
                .any(|n| changed.contains(n));
            if !roots.contains(&node_id) && !upstream_changed {
                continue;
            }

            match Self::check_inputs(graph, node_id) {
                Some(Skip::ResolutionMismatch(upstream)) => {
                    debug!(
                        "Node {} skipped: resolution differs from upstream node {}",
                        node_id, upstream
                    );
                    stats.skipped.push(node_id);
                }
                Some(Skip::AwaitingInput) => {
                    debug!("Node {} skipped: input not restored yet", node_id);
                    stats.skipped.push(node_id);
                }
                None => {
                    let output = match graph.node(node_id) {
                        Some(node) => operator.render(&node.render_request()),
                        None => continue,
                    };
                    Self::publish(graph, node_id, output);
                    changed.insert(node_id);
                    stats.evaluated.push(node_id);
                    self.total_evaluations += 1;
                }
            }
            if let Some(node) = graph.node_mut(node_id) {
                node.mark_idle();
            }
        }

        debug!(
            "Evaluation pass: {} visited, {} evaluated, {} skipped",
            stats.visited,
            stats.evaluated.len(),
            stats.skipped.len()
        );
        self.last_stats = stats;
        &self.last_stats
    }

    /// Roots plus every node reachable downstream from them
    fn downstream_closure(graph: &NodeGraph, roots: &BTreeSet<NodeId>) -> BTreeSet<NodeId> {
        let mut closure = roots.clone();
        let mut queue: VecDeque<NodeId> = roots.iter().copied().collect();
        while let Some(node_id) = queue.pop_front() {
            for next in graph.downstream_nodes(node_id) {
                if closure.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        closure
    }

    /// Kahn's algorithm restricted to the given nodes
    fn execution_order(graph: &NodeGraph, nodes: &BTreeSet<NodeId>) -> Vec<NodeId> {
        let mut in_degree: HashMap<NodeId, usize> = nodes.iter().map(|n| (*n, 0)).collect();
        for &node_id in nodes {
            for next in graph.downstream_nodes(node_id) {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree += 1;
                }
            }
        }

        let mut queue: VecDeque<NodeId> = nodes
            .iter()
            .copied()
            .filter(|n| in_degree.get(n) == Some(&0))
            .collect();
        let mut result = Vec::with_capacity(nodes.len());
        while let Some(node_id) = queue.pop_front() {
            result.push(node_id);
            for next in graph.downstream_nodes(node_id) {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(next);
                    }
                }
            }
        }

        if result.len() != nodes.len() {
            // Connections are checked for cycles before they are made
            log::warn!("Cycle detected in node graph, {} nodes not ordered", nodes.len() - result.len());
        }
        result
    }

    /// Connected inputs must match this node's resolution, and while a node is
    /// still loading they must already carry a texture
    fn check_inputs(graph: &NodeGraph, node_id: NodeId) -> Option<Skip> {
        let node = graph.node(node_id)?;
        for addr in node.input_addrs() {
            let Some(edge_id) = graph.input_edge(addr) else {
                continue;
            };
            let upstream = graph.edge(edge_id).map(|e| e.start_socket().node);
            if let Some(upstream) = upstream.and_then(|u| graph.node(u)) {
                if upstream.resolution() != node.resolution() {
                    return Some(Skip::ResolutionMismatch(upstream.id));
                }
            }
            let empty = graph.socket(addr).is_some_and(|s| s.value().is_empty());
            if empty && node.is_deserializing() {
                return Some(Skip::AwaitingInput);
            }
        }
        None
    }

    /// Store a new output and push it into every downstream input
    fn publish(graph: &mut NodeGraph, node_id: NodeId, output: TextureHandle) {
        let targets: Vec<_> = match graph.node_mut(node_id) {
            Some(node) => {
                node.set_preview(output);
                node.set_outputs(output);
                node.set_deserializing(false);
                node.outputs().iter().flat_map(|s| s.edges().to_vec()).collect()
            }
            None => return,
        };
        for edge_id in targets {
            let Some(end) = graph.edge(edge_id).map(|e| e.end_socket()) else {
                continue;
            };
            if let Some(socket) = graph.socket_mut(end) {
                socket.set_value(output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{
        Bpc, Edge, Node, NodeParams, NodeTypeId, Property, PropertyValue, SequentialOperator,
        SocketAddr,
    };
    use glam::{UVec2, Vec2};

    fn add(graph: &mut NodeGraph, type_id: NodeTypeId) -> NodeId {
        let id = graph.alloc_node_id();
        let node = Node::new(id, NodeParams::default_for(type_id), UVec2::splat(64), Bpc::Rgba8);
        graph.insert_node(node)
    }

    fn connect(graph: &mut NodeGraph, from: NodeId, to: NodeId, input: usize) {
        let id = graph.alloc_edge_id();
        graph
            .link_edge(Edge::new(id, SocketAddr::output(from, 0), SocketAddr::input(to, input)))
            .unwrap();
    }

    #[test]
    fn test_diamond_runs_each_node_once_in_order() {
        let mut graph = NodeGraph::new();
        let source = add(&mut graph, NodeTypeId::Noise);
        let left = add(&mut graph, NodeTypeId::Inverse);
        let right = add(&mut graph, NodeTypeId::Grayscale);
        let mix = add(&mut graph, NodeTypeId::Mix);
        connect(&mut graph, source, left, 0);
        connect(&mut graph, source, right, 0);
        connect(&mut graph, left, mix, 0);
        connect(&mut graph, right, mix, 1);

        let mut engine = ExecutionEngine::new();
        let mut operator = SequentialOperator::new();
        engine.evaluate(&mut graph, &mut operator);
        assert!(!ExecutionEngine::has_dirty(&graph));

        graph
            .node_mut(source)
            .unwrap()
            .set_property(Property::Scale, &PropertyValue::Int(9))
            .unwrap();
        let stats = engine.evaluate(&mut graph, &mut operator).clone();
        assert_eq!(stats.evaluated.len(), 4);
        assert_eq!(stats.evaluated[0], source);
        assert_eq!(stats.evaluated[3], mix);

        let mix_inputs = &operator.renders().last().unwrap().inputs;
        assert_eq!(mix_inputs[0], graph.node(left).unwrap().preview());
        assert_eq!(mix_inputs[1], graph.node(right).unwrap().preview());
    }

    #[test]
    fn test_only_dirty_part_reruns() {
        let mut graph = NodeGraph::new();
        let a = add(&mut graph, NodeTypeId::Color);
        let b = add(&mut graph, NodeTypeId::Inverse);
        let c = add(&mut graph, NodeTypeId::Color);
        connect(&mut graph, a, b, 0);

        let mut engine = ExecutionEngine::new();
        let mut operator = SequentialOperator::new();
        engine.evaluate(&mut graph, &mut operator);
        graph.node_mut(b).unwrap().mark_dirty();
        let stats = engine.evaluate(&mut graph, &mut operator);
        assert_eq!(stats.evaluated, vec![b]);
        assert!(!stats.evaluated.contains(&c));
    }

    #[test]
    fn test_resolution_mismatch_leaves_output_stale() {
        let mut graph = NodeGraph::new();
        let a = add(&mut graph, NodeTypeId::Color);
        let b = add(&mut graph, NodeTypeId::Inverse);
        connect(&mut graph, a, b, 0);
        let mut engine = ExecutionEngine::new();
        let mut operator = SequentialOperator::new();
        engine.evaluate(&mut graph, &mut operator);
        let before = graph.node(b).unwrap().preview();

        graph
            .node_mut(a)
            .unwrap()
            .set_property(Property::Resolution, &PropertyValue::Vec2(Vec2::splat(128.0)))
            .unwrap();
        let stats = engine.evaluate(&mut graph, &mut operator).clone();
        assert_eq!(stats.evaluated, vec![a]);
        assert_eq!(stats.skipped, vec![b]);
        assert_eq!(graph.node(b).unwrap().preview(), before);
    }

    #[test]
    fn test_deserializing_node_waits_for_input() {
        let mut graph = NodeGraph::new();
        let a = add(&mut graph, NodeTypeId::Color);
        let b = add(&mut graph, NodeTypeId::Inverse);
        connect(&mut graph, a, b, 0);
        graph.node_mut(b).unwrap().set_deserializing(true);
        graph.node_mut(a).unwrap().mark_idle();

        let mut engine = ExecutionEngine::new();
        let mut operator = SequentialOperator::new();
        let stats = engine.evaluate(&mut graph, &mut operator).clone();
        assert_eq!(stats.skipped, vec![b]);
        assert!(graph.node(b).unwrap().is_deserializing());

        graph.node_mut(a).unwrap().mark_dirty();
        engine.evaluate(&mut graph, &mut operator);
        assert!(!graph.node(b).unwrap().is_deserializing());
        assert!(!graph.node(b).unwrap().preview().is_empty());
    }
}
