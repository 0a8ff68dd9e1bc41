use std::collections::HashMap;
use smallvec::SmallVec;
use log::{trace, warn};

use crate::input::level::{EdgeDescriptor, NodeDescriptor, NodeKind, GridPos};
use super::geometry::{self, Point};
use super::{BuildError, EdgeIdx, NodeIdx};

pub type NameMap = HashMap<String, usize>;

const CURVE_SAMPLES: usize = 20;
const DIRECTION_DELTA: f64 = 0.01;
const MIN_LENGTH_MULTIPLIER: f64 = 0.1;
const MIN_EDGE_LENGTH: f64 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub edge: EdgeIdx,
    pub node: NodeIdx,
}

#[derive(Debug)]
pub struct Node {
    pub id: String,
    pub grid: GridPos,
    pub world: Point,
    pub kind: NodeKind,
    neighbors: SmallVec<[Neighbor; 4]>,
}

impl Node {
    /// Outgoing connections in the order the edges were added.
    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }
}

#[derive(Debug)]
pub struct Edge {
    pub id: String,
    pub a: NodeIdx,
    pub b: NodeIdx,
    pub length_multiplier: f64,
    pub one_time_use: bool,
    pub one_way: bool,
    pub elevation: i32,
    pub control_points: SmallVec<[Point; 2]>,
    broken: bool,
    world_length: f64,
}

impl Edge {
    pub fn is_curved(&self) -> bool {
        !self.control_points.is_empty()
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Track length in world units, multiplier included. Always positive.
    pub fn world_length(&self) -> f64 {
        self.world_length
    }

    pub fn other_end(&self, node: NodeIdx) -> NodeIdx {
        if node == self.a { self.b } else { self.a }
    }
}

/// The rail graph. Nothing changes after construction except the broken
/// flag on one-time-use edges.
#[derive(Debug, Default)]
pub struct Network {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_names: NameMap,
    edge_names: NameMap,
}

impl Network {
    pub fn new() -> Network {
        Default::default()
    }

    /// Builds a network from descriptor lists, collecting every rejected edge.
    pub fn build(nodes: &[NodeDescriptor], edges: &[EdgeDescriptor]) -> (Network, Vec<BuildError>) {
        let mut network = Network::new();
        for n in nodes {
            network.add_node(n);
        }
        let mut errors = Vec::new();
        for e in edges {
            if let Err(err) = network.add_edge(e) {
                errors.push(err);
            }
        }
        (network, errors)
    }

    pub fn add_node(&mut self, desc: &NodeDescriptor) -> NodeIdx {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            id: desc.id.clone(),
            grid: desc.grid,
            world: geometry::grid_to_world(desc.grid),
            kind: desc.kind,
            neighbors: SmallVec::new(),
        });
        if self.node_names.insert(desc.id.clone(), idx).is_some() {
            warn!("Node {} defined more than once, the last definition wins.", desc.id);
        }
        idx
    }

    pub fn add_edge(&mut self, desc: &EdgeDescriptor) -> Result<EdgeIdx, BuildError> {
        let a = self.resolve_endpoint(desc, &desc.from)?;
        let b = self.resolve_endpoint(desc, &desc.to)?;

        let mut edge = Edge {
            id: desc.id.clone(),
            a,
            b,
            length_multiplier: desc.length_multiplier.max(MIN_LENGTH_MULTIPLIER),
            one_time_use: desc.one_time_use,
            one_way: desc.one_way,
            elevation: desc.elevation,
            control_points: desc.control_points.iter().map(|p| geometry::grid_to_world(*p)).collect(),
            broken: false,
            world_length: 0.0,
        };
        edge.world_length = (self.measure(&edge) * edge.length_multiplier).max(MIN_EDGE_LENGTH);

        let idx = self.edges.len();
        trace!("Edge {} ({} -> {}) length {:.3}", edge.id, desc.from, desc.to, edge.world_length);
        self.edges.push(edge);
        self.edge_names.insert(desc.id.clone(), idx);

        self.nodes[a].neighbors.push(Neighbor { edge: idx, node: b });
        if !desc.one_way {
            self.nodes[b].neighbors.push(Neighbor { edge: idx, node: a });
        }
        Ok(idx)
    }

    fn resolve_endpoint(&self, desc: &EdgeDescriptor, name: &str) -> Result<NodeIdx, BuildError> {
        self.node_index(name).ok_or_else(|| {
            warn!("Edge {} references missing node {}.", desc.id, name);
            BuildError::MissingEdgeEndpoint { edge: desc.id.clone(), node: name.to_string() }
        })
    }

    fn measure(&self, edge: &Edge) -> f64 {
        if !edge.is_curved() {
            return self.nodes[edge.a].world.distance(self.nodes[edge.b].world);
        }
        let mut length = 0.0;
        let mut prev = self.eval(edge, 0.0);
        for i in 1..=CURVE_SAMPLES {
            let pos = self.eval(edge, i as f64 / CURVE_SAMPLES as f64);
            length += prev.distance(pos);
            prev = pos;
        }
        length
    }

    fn eval(&self, edge: &Edge, t: f64) -> Point {
        let start = self.nodes[edge.a].world;
        let end = self.nodes[edge.b].world;
        match edge.control_points.as_slice() {
            [c] => geometry::quadratic_bezier(start, *c, end, t),
            [c0, c1] => geometry::cubic_bezier(start, *c0, *c1, end, t),
            _ => start.lerp(end, t),
        }
    }

    /// Position along the edge, `t` running from A (0) to B (1).
    pub fn point_at(&self, edge: EdgeIdx, t: f64) -> Point {
        self.eval(&self.edges[edge], t)
    }

    /// Unit tangent at `t` in the A to B direction.
    pub fn direction_at(&self, edge: EdgeIdx, t: f64) -> Point {
        let e = &self.edges[edge];
        let t0 = (t - DIRECTION_DELTA).max(0.0);
        let t1 = (t + DIRECTION_DELTA).min(1.0);
        (self.eval(e, t1) - self.eval(e, t0)).normalized()
    }

    pub fn edge_between(&self, from: NodeIdx, to: NodeIdx) -> Option<EdgeIdx> {
        self.nodes[from].neighbors.iter().find(|n| n.node == to).map(|n| n.edge)
    }

    pub(crate) fn mark_broken(&mut self, edge: EdgeIdx) {
        self.edges[edge].broken = true;
    }

    pub fn node(&self, idx: NodeIdx) -> &Node { &self.nodes[idx] }
    pub fn edge(&self, idx: EdgeIdx) -> &Edge { &self.edges[idx] }
    pub fn nodes(&self) -> &[Node] { &self.nodes }
    pub fn edges(&self) -> &[Edge] { &self.edges }

    pub fn node_index(&self, id: &str) -> Option<NodeIdx> {
        self.node_names.get(id).cloned()
    }

    pub fn edge_index(&self, id: &str) -> Option<EdgeIdx> {
        self.edge_names.get(id).cloned()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_index(id).map(|i| &self.nodes[i])
    }

    pub fn edge_by_id(&self, id: &str) -> Option<&Edge> {
        self.edge_index(id).map(|i| &self.edges[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::level::{edge, node, NodeKind::*};
    use smallvec::smallvec;

    fn line() -> Network {
        let (net, errors) = Network::build(
            &[node("a", (0.0, 0.0), Start), node("b", (4.0, -4.0), Generic), node("c", (8.0, -8.0), Finish)],
            &[edge("ab", "a", "b"), EdgeDescriptor { one_way: true, ..edge("bc", "b", "c") }]);
        assert!(errors.is_empty());
        net
    }

    #[test]
    fn test_missing_endpoint_is_skipped() {
        let (net, errors) = Network::build(
            &[node("a", (0.0, 0.0), Generic)],
            &[edge("ax", "a", "x"), edge("xa", "x", "a")]);
        assert_eq!(net.edges().len(), 0);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], BuildError::MissingEdgeEndpoint { edge: "ax".into(), node: "x".into() });
        assert!(net.node(0).neighbors().is_empty());
    }

    #[test]
    fn test_adjacency_and_one_way() {
        let net = line();
        let a = net.node_index("a").unwrap();
        let b = net.node_index("b").unwrap();
        let c = net.node_index("c").unwrap();
        assert_eq!(net.edge_between(a, b), Some(0));
        assert_eq!(net.edge_between(b, a), Some(0));
        assert_eq!(net.edge_between(b, c), Some(1));
        assert_eq!(net.edge_between(c, b), None);
        assert_eq!(net.edge_between(a, c), None);
        let order: Vec<_> = net.node(b).neighbors().iter().map(|n| n.node).collect();
        assert_eq!(order, vec![a, c]);
    }

    #[test]
    fn test_straight_length_and_multiplier() {
        let (net, _) = Network::build(
            &[node("a", (0.0, 0.0), Generic), node("b", (4.0, -4.0), Generic)],
            &[edge("ab", "a", "b"),
              EdgeDescriptor { length_multiplier: 2.5, ..edge("ab2", "a", "b") },
              EdgeDescriptor { length_multiplier: -1.0, ..edge("ab3", "a", "b") }]);
        assert_eq!(net.edge(0).world_length(), 4.0);
        assert!((net.edge(1).world_length() - 10.0).abs() < 1e-12);
        assert!((net.edge(2).world_length() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_lengths_always_positive() {
        let (net, _) = Network::build(
            &[node("a", (1.0, 1.0), Generic), node("b", (1.0, 1.0), Generic)],
            &[edge("ab", "a", "b"), edge("loop", "a", "a")]);
        for e in net.edges() {
            assert!(e.world_length() > 0.0);
        }
    }

    #[test]
    fn test_curved_edge() {
        let (net, _) = Network::build(
            &[node("a", (0.0, 0.0), Generic), node("b", (4.0, -4.0), Generic)],
            &[EdgeDescriptor { control_points: smallvec![(4.0, 0.0)], ..edge("q", "a", "b") },
              EdgeDescriptor { control_points: smallvec![(1.0, 1.0), (3.0, -1.0)], ..edge("c", "a", "b") },
              EdgeDescriptor { control_points: smallvec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)], ..edge("bad", "a", "b") }]);
        let quad = net.edge(0);
        assert!(quad.is_curved());
        // A bent track is longer than the chord.
        assert!(quad.world_length() > 4.0);
        assert_eq!(net.point_at(0, 0.0), net.node(0).world);
        assert_eq!(net.point_at(0, 1.0), net.node(1).world);
        // Control point (4,0) projects to (2,1): the curve bulges upwards.
        assert!(net.point_at(0, 0.5).y > 0.0);
        assert!(net.edge(1).world_length() > 4.0);
        // Unsupported control point counts fall back to the straight line.
        assert_eq!(net.point_at(2, 0.5), Point::new(2.0, 0.0));
    }

    #[test]
    fn test_direction() {
        let net = line();
        let d = net.direction_at(0, 0.0);
        assert!((d.x - 1.0).abs() < 1e-12 && d.y.abs() < 1e-12);
        let d = net.direction_at(0, 1.0);
        assert!((d.x - 1.0).abs() < 1e-12);
    }
}
