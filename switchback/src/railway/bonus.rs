use log::warn;

use crate::input::level::BonusDescriptor;
use super::geometry::Point;
use super::network::Network;
use super::{BuildError, EdgeIdx};

/// A collectible sitting at a fixed point along one edge.
#[derive(Clone, Debug)]
pub struct BonusRuntime {
    pub id: String,
    pub edge: EdgeIdx,
    pub position: f64,
    pub stars: u32,
    pub world: Point,
    collected: bool,
}

impl BonusRuntime {
    pub fn new(desc: &BonusDescriptor, net: &Network) -> Result<BonusRuntime, BuildError> {
        let edge = match net.edge_index(&desc.edge) {
            Some(e) => e,
            None => {
                warn!("Bonus {} references missing edge {}.", desc.id, desc.edge);
                return Err(BuildError::MissingBonusEdge { bonus: desc.id.clone(), edge: desc.edge.clone() });
            }
        };
        let position = desc.position.max(0.0).min(1.0);
        Ok(BonusRuntime {
            id: desc.id.clone(),
            edge,
            position,
            stars: desc.stars.max(1),
            world: net.point_at(edge, position),
            collected: false,
        })
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Returns true only for the first call.
    pub(crate) fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::level::{bonus, edge, node, NodeKind::*};

    #[test]
    fn test_bonus_placement() {
        let (net, _) = Network::build(
            &[node("a", (0.0, 0.0), Generic), node("b", (4.0, -4.0), Generic)],
            &[edge("ab", "a", "b")]);
        let b = BonusRuntime::new(&bonus("s", "ab", 0.25, 0), &net).unwrap();
        assert_eq!(b.world, Point::new(1.0, 0.0));
        assert_eq!(b.stars, 1);
        let clamped = BonusRuntime::new(&bonus("s", "ab", 3.0, 2), &net).unwrap();
        assert_eq!(clamped.world, Point::new(4.0, 0.0));
        assert!(BonusRuntime::new(&bonus("s", "nope", 0.5, 1), &net).is_err());
    }

    #[test]
    fn test_collect_once() {
        let (net, _) = Network::build(
            &[node("a", (0.0, 0.0), Generic), node("b", (4.0, -4.0), Generic)],
            &[edge("ab", "a", "b")]);
        let mut b = BonusRuntime::new(&bonus("s", "ab", 0.5, 1), &net).unwrap();
        assert!(b.collect());
        assert!(!b.collect());
        assert!(b.is_collected());
    }
}
