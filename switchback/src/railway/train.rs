use crate::input::level::{TrainDescriptor, TrainKind};
use super::geometry::Point;
use super::network::Network;
use super::{EdgeIdx, NodeIdx};

#[derive(Clone, Debug)]
pub struct TrainBlueprint {
    pub id: String,
    pub kind: TrainKind,
    pub speed: f64,
    pub color: Option<String>,
}

impl TrainBlueprint {
    pub fn from_descriptor(desc: &TrainDescriptor) -> TrainBlueprint {
        TrainBlueprint {
            id: desc.id.clone(),
            kind: desc.kind,
            speed: desc.speed,
            color: desc.color.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FinishCause {
    Arrived,
    DeadEnd,
    Derailed,
    Forced,
}

/// Where a train is. Exactly one of these holds at any time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Movement {
    AtNode {
        node: NodeIdx,
        came_from: Option<NodeIdx>,
    },
    OnEdge {
        edge: EdgeIdx,
        from: NodeIdx,
        to: NodeIdx,
        distance: f64,
    },
    /// Terminal. `node` is where the train stopped, if it stopped on a node.
    Finished {
        node: Option<NodeIdx>,
        cause: FinishCause,
    },
}

#[derive(Clone, Debug)]
pub struct TrainRuntime {
    pub blueprint: TrainBlueprint,
    movement: Movement,
}

impl TrainRuntime {
    pub fn at_node(blueprint: TrainBlueprint, node: NodeIdx) -> TrainRuntime {
        TrainRuntime {
            blueprint,
            movement: Movement::AtNode { node, came_from: None },
        }
    }

    pub fn movement(&self) -> Movement {
        self.movement
    }

    pub fn speed(&self) -> f64 {
        self.blueprint.speed
    }

    pub fn is_finished(&self) -> bool {
        match self.movement {
            Movement::Finished { .. } => true,
            _ => false,
        }
    }

    pub fn current_node(&self) -> Option<NodeIdx> {
        match self.movement {
            Movement::AtNode { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn current_edge(&self) -> Option<EdgeIdx> {
        match self.movement {
            Movement::OnEdge { edge, .. } => Some(edge),
            _ => None,
        }
    }

    /// The node the train has most recently left.
    pub fn previous_node(&self) -> Option<NodeIdx> {
        match self.movement {
            Movement::AtNode { came_from, .. } => came_from,
            Movement::OnEdge { from, .. } => Some(from),
            Movement::Finished { .. } => None,
        }
    }

    pub fn next_node(&self) -> Option<NodeIdx> {
        match self.movement {
            Movement::OnEdge { to, .. } => Some(to),
            _ => None,
        }
    }

    /// Node a finished train stopped at.
    pub fn final_node(&self) -> Option<NodeIdx> {
        match self.movement {
            Movement::Finished { node, .. } => node,
            _ => None,
        }
    }

    pub fn finish_cause(&self) -> Option<FinishCause> {
        match self.movement {
            Movement::Finished { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Leaves the current node along `edge` towards the target node.
    /// Missing either one finishes the train as a dead end. Returns
    /// whether the train is now on the edge.
    pub fn begin_edge(&mut self, next: Option<(NodeIdx, EdgeIdx)>) -> bool {
        let node = match self.movement {
            Movement::AtNode { node, .. } => node,
            _ => return false,
        };
        match next {
            Some((to, edge)) => {
                self.movement = Movement::OnEdge { edge, from: node, to, distance: 0.0 };
                true
            }
            None => {
                self.mark_finished(FinishCause::DeadEnd);
                false
            }
        }
    }

    /// Steps off the edge onto its target node.
    pub fn arrive_at_node(&mut self) -> Option<NodeIdx> {
        match self.movement {
            Movement::OnEdge { from, to, .. } => {
                self.movement = Movement::AtNode { node: to, came_from: Some(from) };
                Some(to)
            }
            _ => None,
        }
    }

    pub(crate) fn advance_on_edge(&mut self, dx: f64, edge_length: f64) {
        if let Movement::OnEdge { ref mut distance, .. } = self.movement {
            *distance = (*distance + dx).min(edge_length);
        }
    }

    pub fn mark_finished(&mut self, cause: FinishCause) {
        self.finish_at(self.current_node(), cause);
    }

    pub(crate) fn finish_at(&mut self, node: Option<NodeIdx>, cause: FinishCause) {
        if self.is_finished() {
            return;
        }
        self.movement = Movement::Finished { node, cause };
    }

    /// Along-edge progress as a fraction of the edge in the A to B frame,
    /// along with whether the train runs B to A.
    fn edge_progress(&self, net: &Network) -> Option<(EdgeIdx, f64, bool)> {
        match self.movement {
            Movement::OnEdge { edge, from, distance, .. } => {
                let e = net.edge(edge);
                let len = e.world_length();
                let t = if len < 1e-4 { 0.0 } else { (distance / len).max(0.0).min(1.0) };
                let reversed = from != e.a;
                Some((edge, if reversed { 1.0 - t } else { t }, reversed))
            }
            _ => None,
        }
    }

    /// Offset from the edge's A endpoint, for comparing trains sharing an edge.
    pub fn offset_from_a(&self, net: &Network) -> Option<f64> {
        self.edge_progress(net).map(|(edge, t, _)| t * net.edge(edge).world_length())
    }

    pub fn world_position(&self, net: &Network) -> Option<Point> {
        match self.movement {
            Movement::AtNode { node, .. } => Some(net.node(node).world),
            Movement::Finished { node, .. } => node.map(|n| net.node(n).world),
            Movement::OnEdge { .. } => {
                self.edge_progress(net).map(|(edge, t, _)| net.point_at(edge, t))
            }
        }
    }

    pub fn direction(&self, net: &Network) -> Point {
        match self.movement {
            Movement::OnEdge { edge, from, to, .. } => {
                let e = net.edge(edge);
                if e.is_curved() {
                    let (_, t, reversed) = match self.edge_progress(net) {
                        Some(p) => p,
                        None => return Point::new(1.0, 0.0),
                    };
                    let d = net.direction_at(edge, t);
                    if reversed { d * -1.0 } else { d }
                } else {
                    (net.node(to).world - net.node(from).world).normalized()
                }
            }
            Movement::AtNode { node, came_from: Some(prev) } => {
                (net.node(node).world - net.node(prev).world).normalized()
            }
            _ => Point::new(1.0, 0.0),
        }
    }

    pub fn elevation(&self, net: &Network) -> i32 {
        self.current_edge().map(|e| net.edge(e).elevation).unwrap_or(0)
    }
}
