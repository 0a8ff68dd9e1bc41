use crate::railway::network::Network;
use crate::railway::switch::SwitchTable;
use crate::railway::NodeIdx;

/// Picks the node a train standing at `node` heads for next.
///
/// A switch wins unless it points back where the train came from. Otherwise
/// the first neighbor in insertion order other than the previous node is
/// taken, and failing that the train reverses.
pub fn resolve_next(net: &Network, switches: &SwitchTable, node: NodeIdx, previous: Option<NodeIdx>)
    -> Option<NodeIdx> {
    let current = net.node(node);
    let previous_id = previous.map(|p| net.node(p).id.as_str());

    if let Some(target) = switches.current_target(&current.id) {
        if Some(target) != previous_id {
            return net.node_index(target);
        }
    }

    current.neighbors().iter()
        .find(|n| Some(n.node) != previous)
        .map(|n| n.node)
        .or(previous)
}

/// True when a train arriving at junction `node` from `came_from` enters
/// through a branch the switch is not set for. Single-track approaches
/// (nodes of degree two or less) are treated as through lines.
pub fn enters_against_switch(net: &Network, switches: &SwitchTable, node: NodeIdx, came_from: Option<NodeIdx>)
    -> bool {
    let junction = net.node(node);
    if junction.neighbors().len() <= 2 {
        return false;
    }
    let target = match switches.current_target(&junction.id) {
        Some(t) => t,
        None => return false,
    };
    let from = match came_from {
        Some(n) => n,
        None => return false,
    };
    if net.node(from).id == target || net.node(from).neighbors().len() <= 2 {
        return false;
    }
    match net.node_index(target) {
        Some(t) => t != from,
        None => false,
    }
}
