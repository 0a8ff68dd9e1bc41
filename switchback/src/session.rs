//! One play-through of a level: planning countdown, the running simulation,
//! and the win or loss that ends it.

use log::{debug, info};
use ordered_float::OrderedFloat;
use rand::Rng;

use crate::input::level::{LevelDescriptor, NodeKind};
use crate::output::events::{Listener, SimEvent};
use crate::railway::geometry::Point;
use crate::railway::BuildError;
use crate::simulation::{SimConfig, Simulation};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LossReason {
    Collision,
    Timeout,
    DeadEnd,
    Derailed,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Phase {
    Planning { remaining: f64 },
    Running { elapsed: f64 },
    Won { stars: u32 },
    Lost(LossReason),
}

impl Phase {
    pub fn is_over(&self) -> bool {
        match *self {
            Phase::Won { .. } | Phase::Lost(_) => true,
            _ => false,
        }
    }

    fn accepts_input(&self) -> bool {
        match *self {
            Phase::Planning { .. } | Phase::Running { .. } => true,
            _ => false,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SessionConfig {
    /// Replaces the level's own planning time when set.
    pub planning_time: Option<f64>,
    pub max_run_duration: f64,
    /// Running trains this close to a finish node are completed there.
    pub finish_proximity_radius: f64,
    pub switch_pick_radius: f64,
    pub randomize_switches: bool,
    pub sim: SimConfig,
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            planning_time: None,
            max_run_duration: 30.0,
            finish_proximity_radius: 0.6,
            switch_pick_radius: 0.8,
            randomize_switches: false,
            sim: SimConfig::default(),
        }
    }
}

pub struct Session {
    level: LevelDescriptor,
    config: SessionConfig,
    sim: Simulation,
    diagnostics: Vec<BuildError>,
    phase: Phase,
    completed: usize,
    stars: u32,
}

impl Session {
    pub fn start<R: Rng>(level: LevelDescriptor, config: SessionConfig, rng: &mut R) -> Session {
        let (sim, diagnostics) = build_simulation(&level, &config, rng);
        let mut session = Session {
            level,
            config,
            sim,
            diagnostics,
            phase: Phase::Planning { remaining: 0.0 },
            completed: 0,
            stars: 0,
        };
        session.enter_planning();
        session
    }

    /// Throws away all progress and builds the level again.
    pub fn restart<R: Rng>(&mut self, rng: &mut R) {
        let (sim, diagnostics) = build_simulation(&self.level, &self.config, rng);
        self.sim = sim;
        self.diagnostics = diagnostics;
        self.completed = 0;
        self.stars = 0;
        info!("Restarting level {}", self.level.id);
        self.enter_planning();
    }

    fn enter_planning(&mut self) {
        let planning = self.config.planning_time.unwrap_or(self.level.planning_time);
        if planning > 0.0 {
            info!("Level {}: planning for {:.1}s", self.level.id, planning);
            self.phase = Phase::Planning { remaining: planning };
        } else {
            self.phase = Phase::Planning { remaining: 0.0 };
            self.begin_running();
        }
    }

    /// Ends planning early. Does nothing outside the planning phase.
    pub fn begin_running(&mut self) {
        if let Phase::Planning { .. } = self.phase {
            info!("Level {}: trains departing", self.level.id);
            self.phase = Phase::Running { elapsed: 0.0 };
        }
    }

    pub fn toggle_switch(&mut self, node: &str) -> bool {
        self.phase.accepts_input() && self.sim.toggle_switch(node)
    }

    /// Toggles the switch closest to `point`, if one lies within the pick
    /// radius. Returns the node id of the toggled switch.
    pub fn toggle_switch_near(&mut self, point: Point) -> Option<String> {
        if !self.phase.accepts_input() {
            return None;
        }
        let net = self.sim.network();
        let radius = self.config.switch_pick_radius;
        let nearest = self.sim.switches().iter()
            .filter_map(|s| net.node_by_id(&s.node).map(|n| (point.distance(n.world), s.node.as_str())))
            .filter(|&(d, _)| d <= radius)
            .min_by_key(|&(d, id)| (OrderedFloat(d), id))
            .map(|(_, id)| id.to_string())?;
        self.sim.toggle_switch(&nearest);
        Some(nearest)
    }

    /// Steps the session by one frame of wall-clock time and returns the
    /// simulation events of this frame.
    pub fn update(&mut self, real_dt: f64) -> Vec<SimEvent> {
        match self.phase {
            Phase::Planning { remaining } => {
                let remaining = (remaining - real_dt).max(0.0);
                self.phase = Phase::Planning { remaining };
                if remaining <= 0.0 {
                    self.begin_running();
                }
                Vec::new()
            }
            Phase::Running { elapsed } => self.run_frame(elapsed + real_dt, real_dt),
            Phase::Won { .. } | Phase::Lost(_) => Vec::new(),
        }
    }

    fn run_frame(&mut self, elapsed: f64, real_dt: f64) -> Vec<SimEvent> {
        self.phase = Phase::Running { elapsed };
        if elapsed >= self.config.max_run_duration {
            self.end(Phase::Lost(LossReason::Timeout));
            return Vec::new();
        }

        self.sim.advance(real_dt * self.level.simulation_speed, self.level.goal.as_deref());
        self.complete_near_finish();

        let events = self.sim.take_events();
        let mut lost = None;
        for ev in &events {
            match *ev {
                SimEvent::TrainReachedGoal { .. } => self.completed += 1,
                SimEvent::BonusCollected { stars, .. } => self.stars += stars,
                SimEvent::CollisionDetected { .. } => { lost.get_or_insert(LossReason::Collision); }
                SimEvent::DeadEndReached { .. } => { lost.get_or_insert(LossReason::DeadEnd); }
                SimEvent::WrongSwitchEntry { .. } => { lost.get_or_insert(LossReason::Derailed); }
                SimEvent::EdgeBroken { .. } => {}
            }
        }

        let total = self.sim.trains().len();
        if let Some(reason) = lost {
            self.end(Phase::Lost(reason));
        } else if total > 0 && self.completed >= total {
            self.end(Phase::Won { stars: self.stars });
        }
        events
    }

    fn complete_near_finish(&mut self) {
        let radius = self.config.finish_proximity_radius;
        let arrivals: Vec<_> = {
            let net = self.sim.network();
            self.sim.trains().iter().enumerate()
                .filter(|(_, t)| !t.is_finished())
                .filter_map(|(i, t)| {
                    let pos = t.world_position(net)?;
                    net.nodes().iter().enumerate()
                        .filter(|(_, n)| n.kind == NodeKind::Finish)
                        .map(|(ni, n)| (OrderedFloat(pos.distance(n.world)), ni))
                        .filter(|&(d, _)| d.0 <= radius)
                        .min()
                        .map(|(_, ni)| (i, ni))
                })
                .collect()
        };
        for (train, node) in arrivals {
            debug!("Train {} close enough to finish {}", self.sim.trains()[train].blueprint.id,
                   self.sim.network().node(node).id);
            self.sim.force_complete_train(train, Some(node));
        }
    }

    fn end(&mut self, phase: Phase) {
        info!("Level {} over: {:?} ({} of {} trains home, {} stars)",
              self.level.id, phase, self.completed, self.sim.trains().len(), self.stars);
        self.phase = phase;
    }

    pub fn phase(&self) -> Phase { self.phase }
    pub fn is_over(&self) -> bool { self.phase.is_over() }
    pub fn level(&self) -> &LevelDescriptor { &self.level }
    pub fn config(&self) -> &SessionConfig { &self.config }
    pub fn simulation(&self) -> &Simulation { &self.sim }
    pub fn diagnostics(&self) -> &[BuildError] { &self.diagnostics }
    pub fn trains_completed(&self) -> usize { self.completed }
    pub fn stars(&self) -> u32 { self.stars }

    /// Attaches to the current simulation. A restart drops all listeners.
    pub fn subscribe(&mut self, listener: Listener) {
        self.sim.subscribe(listener);
    }
}

fn build_simulation<R: Rng>(level: &LevelDescriptor, config: &SessionConfig, rng: &mut R)
    -> (Simulation, Vec<BuildError>) {
    if config.randomize_switches {
        Simulation::from_level_randomized(level, config.sim, rng)
    } else {
        Simulation::from_level(level, config.sim)
    }
}
