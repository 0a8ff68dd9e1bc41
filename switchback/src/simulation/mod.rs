//! Stepped train simulation over a rail network.
//!
//! The `Simulation` owns the network, the switch table, every train and
//! every bonus. Callers drive it with `advance` once per frame and observe
//! outcomes through listeners or by draining `take_events`.

mod routing;
mod contact;


use log::{debug, info, trace, warn};
use rand::Rng;

use crate::input::level::{BonusDescriptor, LevelDescriptor, NodeKind, TrainDescriptor};
use crate::output::events::{Listener, SimEvent};
use crate::railway::bonus::BonusRuntime;
use crate::railway::network::Network;
use crate::railway::switch::SwitchTable;
use crate::railway::train::{FinishCause, Movement, TrainBlueprint, TrainRuntime};
use crate::railway::{BuildError, EdgeIdx, NodeIdx, TrainIdx};

pub use self::contact::trains_collide;
pub use self::routing::{enters_against_switch, resolve_next};

/// Contact distances used by collision and bonus detection.
#[derive(Copy, Clone, Debug)]
pub struct SimConfig {
    /// Two trains on the same edge collide when their offsets differ by less than this.
    pub collision_edge_threshold: f64,
    pub collision_radius: f64,
    pub pickup_radius: f64,
}

impl Default for SimConfig {
    fn default() -> SimConfig {
        SimConfig {
            collision_edge_threshold: 0.1,
            collision_radius: 0.15,
            pickup_radius: 0.35,
        }
    }
}

pub struct Simulation {
    config: SimConfig,
    network: Network,
    switches: SwitchTable,
    trains: Vec<TrainRuntime>,
    bonuses: Vec<BonusRuntime>,
    pending: Vec<SimEvent>,
    listeners: Vec<Listener>,
}

impl Simulation {
    pub fn new(network: Network, switches: SwitchTable) -> Simulation {
        Simulation::with_config(network, switches, SimConfig::default())
    }

    pub fn with_config(network: Network, switches: SwitchTable, config: SimConfig) -> Simulation {
        Simulation {
            config,
            network,
            switches,
            trains: Vec::new(),
            bonuses: Vec::new(),
            pending: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Builds the network, switches, trains and bonuses of a level. Items
    /// that cannot be built are left out and reported.
    pub fn from_level(level: &LevelDescriptor, config: SimConfig) -> (Simulation, Vec<BuildError>) {
        let (network, mut errors) = Network::build(&level.nodes, &level.edges);

        let mut switches = SwitchTable::from_descriptors(&level.switches);
        for d in &level.switches {
            if network.node_index(&d.node).is_none() {
                warn!("Switch references missing node {}.", d.node);
                errors.push(BuildError::MissingSwitchNode { node: d.node.clone() });
            }
        }
        switches.retain(|s| network.node_index(&s.node).is_some());

        let mut sim = Simulation::with_config(network, switches, config);
        errors.extend(sim.spawn_trains(&level.trains));
        errors.extend(sim.spawn_bonuses(&level.bonuses));

        info!("Level {}: {} nodes, {} edges, {} switches, {} trains, {} bonuses, {} problems",
              level.id, sim.network.nodes().len(), sim.network.edges().len(), sim.switches.len(),
              sim.trains.len(), sim.bonuses.len(), errors.len());
        (sim, errors)
    }

    /// Like `from_level`, with every switch starting at a random position.
    pub fn from_level_randomized<R: Rng>(level: &LevelDescriptor, config: SimConfig, rng: &mut R)
        -> (Simulation, Vec<BuildError>) {
        let (mut sim, errors) = Simulation::from_level(level, config);
        sim.switches.randomize(rng);
        (sim, errors)
    }

    /// Replaces all trains. Trains without a valid departure are skipped.
    pub fn spawn_trains(&mut self, descs: &[TrainDescriptor]) -> Vec<BuildError> {
        self.trains.clear();
        let mut errors = Vec::new();
        for d in descs {
            match self.spawn_train(d) {
                Ok(train) => self.trains.push(train),
                Err(e) => {
                    warn!("{}", e);
                    errors.push(e);
                }
            }
        }
        errors
    }

    fn spawn_train(&self, d: &TrainDescriptor) -> Result<TrainRuntime, BuildError> {
        let start = self.network.node_index(&d.start).ok_or_else(|| {
            BuildError::MissingStartNode { train: d.id.clone(), node: d.start.clone() }
        })?;
        let next = d.initial_next.as_ref()
            .and_then(|n| self.network.node_index(n))
            .or_else(|| self.network.node(start).neighbors().first().map(|n| n.node))
            .ok_or_else(|| BuildError::NoDeparture { train: d.id.clone(), node: d.start.clone() })?;
        let edge = self.network.edge_between(start, next).ok_or_else(|| {
            BuildError::NoDepartureEdge {
                train: d.id.clone(),
                from: d.start.clone(),
                to: self.network.node(next).id.clone(),
            }
        })?;

        let mut train = TrainRuntime::at_node(TrainBlueprint::from_descriptor(d), start);
        train.begin_edge(Some((next, edge)));
        Ok(train)
    }

    /// Replaces all bonuses. Bonuses on unknown edges are skipped.
    pub fn spawn_bonuses(&mut self, descs: &[BonusDescriptor]) -> Vec<BuildError> {
        self.bonuses.clear();
        let mut errors = Vec::new();
        for d in descs {
            match BonusRuntime::new(d, &self.network) {
                Ok(b) => self.bonuses.push(b),
                Err(e) => errors.push(e),
            }
        }
        errors
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Drains the events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::replace(&mut self.pending, Vec::new())
    }

    fn emit(&mut self, ev: SimEvent) {
        for l in self.listeners.iter_mut() {
            l(&ev);
        }
        self.pending.push(ev);
    }

    pub fn toggle_switch(&mut self, node: &str) -> bool {
        self.switches.toggle(node)
    }

    /// Moves every running train `speed * dt` along the network, then checks
    /// for collisions and bonus pickups once.
    pub fn advance(&mut self, dt: f64, goal: Option<&str>) {
        let goal = goal.and_then(|g| self.network.node_index(g));
        for idx in 0..self.trains.len() {
            if self.trains[idx].is_finished() {
                continue;
            }
            self.advance_train(idx, dt);

            if let Some(node) = self.trains[idx].final_node() {
                if goal == Some(node) || self.network.node(node).kind == NodeKind::Finish {
                    info!("Train {} reached goal {}", self.trains[idx].blueprint.id, self.network.node(node).id);
                    self.emit(SimEvent::TrainReachedGoal { train: idx, node });
                }
            }
        }

        self.detect_collision();
        self.collect_bonuses();
    }

    fn advance_train(&mut self, idx: TrainIdx, dt: f64) {
        let mut budget = self.trains[idx].speed() * dt;
        // Bounds the number of node crossings in one tick.
        let max_crossings = self.network.edges().len().max(1);
        let mut crossings = 0;

        while budget > 0.0 && !self.trains[idx].is_finished() {
            let (edge, distance) = match self.trains[idx].movement() {
                Movement::OnEdge { edge, distance, .. } => (edge, distance),
                _ => break,
            };
            let length = self.network.edge(edge).world_length();
            let remaining = (length - distance).max(0.0);
            if budget < remaining {
                self.trains[idx].advance_on_edge(budget, length);
                break;
            }

            budget -= remaining;
            crossings += 1;
            let node = match self.trains[idx].arrive_at_node() {
                Some(node) => node,
                None => break,
            };
            trace!("Train {} at node {}", self.trains[idx].blueprint.id, self.network.node(node).id);
            self.arrive(idx, edge, node, crossings > max_crossings);
        }
    }

    fn arrive(&mut self, idx: TrainIdx, edge: EdgeIdx, node: NodeIdx, exhausted: bool) {
        let e = self.network.edge(edge);
        if e.one_time_use && !e.is_broken() {
            self.network.mark_broken(edge);
            let position = self.network.point_at(edge, 0.5);
            debug!("Edge {} broke behind train {}", self.network.edge(edge).id, self.trains[idx].blueprint.id);
            self.emit(SimEvent::EdgeBroken { edge, position });
        }

        if self.network.node(node).kind == NodeKind::Finish {
            self.trains[idx].mark_finished(FinishCause::Arrived);
            return;
        }

        let came_from = self.trains[idx].previous_node();
        if enters_against_switch(&self.network, &self.switches, node, came_from) {
            debug!("Train {} entered junction {} against the switch",
                   self.trains[idx].blueprint.id, self.network.node(node).id);
            self.trains[idx].mark_finished(FinishCause::Derailed);
            self.emit(SimEvent::WrongSwitchEntry { train: idx, node });
            return;
        }

        let next = if exhausted {
            None
        } else {
            let network = &self.network;
            resolve_next(network, &self.switches, node, came_from)
                .and_then(|to| network.edge_between(node, to).map(|e| (to, e)))
                .filter(|&(_, e)| !network.edge(e).is_broken())
        };

        match next {
            Some(next) => {
                self.trains[idx].begin_edge(Some(next));
            }
            None => {
                debug!("Train {} reached a dead end at {}", self.trains[idx].blueprint.id, self.network.node(node).id);
                self.trains[idx].mark_finished(FinishCause::DeadEnd);
                self.emit(SimEvent::DeadEndReached { train: idx });
            }
        }
    }

    /// Finishes a train outside the normal arrival logic and reports it as
    /// having reached `node`, or the closest node it knows of. Does nothing
    /// for a train that has already finished.
    pub fn force_complete_train(&mut self, idx: TrainIdx, node: Option<NodeIdx>) -> bool {
        let node_count = self.network.nodes().len();
        let node = match self.trains.get(idx) {
            Some(t) if !t.is_finished() => node
                .filter(|&n| n < node_count)
                .or(t.current_node())
                .or(t.next_node())
                .or(t.previous_node()),
            _ => return false,
        };
        let node = match node {
            Some(n) => n,
            None => return false,
        };
        self.trains[idx].finish_at(Some(node), FinishCause::Forced);
        info!("Train {} completed at {}", self.trains[idx].blueprint.id, self.network.node(node).id);
        self.emit(SimEvent::TrainReachedGoal { train: idx, node });
        true
    }

    fn detect_collision(&mut self) {
        if let Some((a, b)) = contact::first_collision(&self.network, &self.config, &self.trains) {
            info!("Collision between {} and {}", self.trains[a].blueprint.id, self.trains[b].blueprint.id);
            self.emit(SimEvent::CollisionDetected { a, b });
        }
    }

    fn collect_bonuses(&mut self) {
        for (bonus, train) in contact::bonus_pickups(&self.network, &self.config, &self.trains, &self.bonuses) {
            if self.bonuses[bonus].collect() {
                let stars = self.bonuses[bonus].stars;
                debug!("Bonus {} picked up by {}", self.bonuses[bonus].id, self.trains[train].blueprint.id);
                self.emit(SimEvent::BonusCollected { bonus, train, stars });
            }
        }
    }

    pub fn config(&self) -> &SimConfig { &self.config }
    pub fn network(&self) -> &Network { &self.network }
    pub fn switches(&self) -> &SwitchTable { &self.switches }
    pub fn trains(&self) -> &[TrainRuntime] { &self.trains }
    pub fn bonuses(&self) -> &[BonusRuntime] { &self.bonuses }

    pub fn train_index(&self, id: &str) -> Option<TrainIdx> {
        self.trains.iter().position(|t| t.blueprint.id == id)
    }

    pub fn all_finished(&self) -> bool {
        self.trains.iter().all(|t| t.is_finished())
    }
}
