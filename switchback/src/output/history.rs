use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use super::events::{Listener, SimEvent};
use crate::simulation::Simulation;

/// Time-stamped record of every event a simulation emitted.
#[derive(Debug, Default)]
pub struct History {
    pub events: Vec<(f64, SimEvent)>,
}

/// Shared handle that records events from a listener while the simulation
/// keeps running. The clock is advanced by the owner between ticks.
#[derive(Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<(f64, SimEvent)>>>,
    time: Rc<RefCell<f64>>,
}

impl Recorder {
    pub fn new() -> Recorder {
        Default::default()
    }

    pub fn listener(&self) -> Listener {
        let log = self.log.clone();
        let time = self.time.clone();
        Box::new(move |ev| log.borrow_mut().push((*time.borrow(), *ev)))
    }

    pub fn set_time(&self, t: f64) {
        *self.time.borrow_mut() = t;
    }

    pub fn history(&self) -> History {
        History { events: self.log.borrow().clone() }
    }
}

/// Print one event per line on the format `time event refs`.
pub fn summary(sim: &Simulation, h: &History) -> Result<String, failure::Error> {
    let mut s = String::new();
    let net = sim.network();
    let train = |i: usize| sim.trains()[i].blueprint.id.as_str();
    for &(t, ref ev) in &h.events {
        write!(s, "{:.2} {}", t, ev.name())?;
        use super::events::SimEvent::*;
        match *ev {
            TrainReachedGoal { train: tr, node } => write!(s, " {} {}", train(tr), net.node(node).id)?,
            CollisionDetected { a, b } => write!(s, " {} {}", train(a), train(b))?,
            DeadEndReached { train: tr } => write!(s, " {}", train(tr))?,
            WrongSwitchEntry { train: tr, node } => write!(s, " {} {}", train(tr), net.node(node).id)?,
            EdgeBroken { edge, position } => {
                write!(s, " {} ({:.2}, {:.2})", net.edge(edge).id, position.x, position.y)?
            }
            BonusCollected { bonus, train: tr, stars } => {
                write!(s, " {} {} {}", sim.bonuses()[bonus].id, train(tr), stars)?
            }
        }
        s.push('\n');
    }
    Ok(s)
}
