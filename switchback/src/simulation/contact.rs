use crate::railway::bonus::BonusRuntime;
use crate::railway::network::Network;
use crate::railway::train::TrainRuntime;
use crate::railway::{BonusIdx, TrainIdx};
use super::SimConfig;

/// Collision test between two running trains. Symmetric in its arguments.
pub fn trains_collide(net: &Network, config: &SimConfig, a: &TrainRuntime, b: &TrainRuntime) -> bool {
    if a.is_finished() || b.is_finished() || a.blueprint.id == b.blueprint.id {
        return false;
    }
    if a.elevation(net) != b.elevation(net) {
        return false;
    }

    if let (Some(ea), Some(eb)) = (a.current_edge(), b.current_edge()) {
        if ea == eb {
            if let (Some(da), Some(db)) = (a.offset_from_a(net), b.offset_from_a(net)) {
                if (da - db).abs() < config.collision_edge_threshold {
                    return true;
                }
            }
        }
    }

    if let (Some(na), Some(nb)) = (a.current_node(), b.current_node()) {
        if na == nb {
            return true;
        }
    }

    match (a.world_position(net), b.world_position(net)) {
        (Some(pa), Some(pb)) => pa.distance(pb) < config.collision_radius,
        _ => false,
    }
}

/// First colliding pair in spawn order, if any.
pub fn first_collision(net: &Network, config: &SimConfig, trains: &[TrainRuntime]) -> Option<(TrainIdx, TrainIdx)> {
    for (i, a) in trains.iter().enumerate() {
        if a.is_finished() {
            continue;
        }
        for (j, b) in trains.iter().enumerate().skip(i + 1) {
            if trains_collide(net, config, a, b) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Uncollected bonuses paired with the first running train on the same edge
/// that is within pickup range.
pub fn bonus_pickups(net: &Network, config: &SimConfig, trains: &[TrainRuntime], bonuses: &[BonusRuntime])
    -> Vec<(BonusIdx, TrainIdx)> {
    let mut pickups = Vec::new();
    for (bi, bonus) in bonuses.iter().enumerate() {
        if bonus.is_collected() {
            continue;
        }
        let hit = trains.iter().position(|t| {
            !t.is_finished()
                && t.current_edge() == Some(bonus.edge)
                && t.world_position(net).map_or(false, |p| p.distance(bonus.world) <= config.pickup_radius)
        });
        if let Some(ti) = hit {
            pickups.push((bi, ti));
        }
    }
    pickups
}
