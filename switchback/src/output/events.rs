use crate::railway::geometry::Point;
use crate::railway::{BonusIdx, EdgeIdx, NodeIdx, TrainIdx};

/// Outcomes reported by the simulation, in emission order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SimEvent {
    TrainReachedGoal { train: TrainIdx, node: NodeIdx },
    CollisionDetected { a: TrainIdx, b: TrainIdx },
    DeadEndReached { train: TrainIdx },
    WrongSwitchEntry { train: TrainIdx, node: NodeIdx },
    EdgeBroken { edge: EdgeIdx, position: Point },
    BonusCollected { bonus: BonusIdx, train: TrainIdx, stars: u32 },
}

impl SimEvent {
    pub fn name(&self) -> &'static str {
        use self::SimEvent::*;
        match *self {
            TrainReachedGoal { .. } => "goal",
            CollisionDetected { .. } => "collision",
            DeadEndReached { .. } => "dead_end",
            WrongSwitchEntry { .. } => "wrong_switch",
            EdgeBroken { .. } => "edge_broken",
            BonusCollected { .. } => "bonus",
        }
    }
}

pub type Listener = Box<dyn FnMut(&SimEvent)>;
