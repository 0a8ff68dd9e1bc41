use std::collections::HashMap;
use smallvec::SmallVec;
use rand::Rng;
use log::debug;

use crate::input::level::SwitchDescriptor;

/// Routing state of one junction: a cyclic choice among its neighbors.
#[derive(Clone, Debug)]
pub struct SwitchState {
    pub node: String,
    cycle: SmallVec<[String; 4]>,
    index: usize,
}

impl SwitchState {
    pub fn new(desc: &SwitchDescriptor) -> SwitchState {
        let cycle: SmallVec<[String; 4]> = desc.cycle.iter().cloned().collect();
        let index = desc.initial_index.min(cycle.len().saturating_sub(1));
        SwitchState { node: desc.node.clone(), cycle, index }
    }

    pub fn cycle(&self) -> &[String] {
        &self.cycle
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_target(&self) -> Option<&str> {
        self.cycle.get(self.index).map(|s| s.as_str())
    }

    pub fn toggle(&mut self) {
        if self.cycle.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.cycle.len();
    }

    /// Applies a uniformly chosen number of toggles in `[0, cycle length)`.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        if self.cycle.is_empty() {
            return;
        }
        let n = rng.gen_range(0..self.cycle.len());
        for _ in 0..n {
            self.toggle();
        }
    }
}

/// All junction switches of a level, keyed by junction node id.
#[derive(Clone, Debug, Default)]
pub struct SwitchTable {
    switches: HashMap<String, SwitchState>,
}

impl SwitchTable {
    pub fn new() -> SwitchTable {
        Default::default()
    }

    pub fn from_descriptors(descs: &[SwitchDescriptor]) -> SwitchTable {
        let mut table = SwitchTable::new();
        for d in descs {
            table.insert(SwitchState::new(d));
        }
        table
    }

    /// Builds the table and optionally scrambles the initial positions.
    pub fn build<R: Rng>(descs: &[SwitchDescriptor], randomize: bool, rng: &mut R) -> SwitchTable {
        let mut table = SwitchTable::from_descriptors(descs);
        if randomize {
            table.randomize(rng);
        }
        table
    }

    pub fn insert(&mut self, state: SwitchState) {
        self.switches.insert(state.node.clone(), state);
    }

    /// Randomizes every switch. Switches are visited in sorted node order so
    /// that a given seed always gives the same layout.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        let mut keys: Vec<String> = self.switches.keys().cloned().collect();
        keys.sort();
        for k in keys {
            if let Some(sw) = self.switches.get_mut(&k) {
                sw.randomize(rng);
            }
        }
    }

    pub fn toggle(&mut self, node: &str) -> bool {
        match self.switches.get_mut(node) {
            Some(sw) => {
                sw.toggle();
                debug!("Switch {} now points to {:?}", node, sw.current_target());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, node: &str) -> Option<&SwitchState> {
        self.switches.get(node)
    }

    pub fn current_target(&self, node: &str) -> Option<&str> {
        self.switches.get(node).and_then(|s| s.current_target())
    }

    pub fn len(&self) -> usize {
        self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwitchState> {
        self.switches.values()
    }

    pub(crate) fn retain<F: FnMut(&SwitchState) -> bool>(&mut self, mut f: F) {
        self.switches.retain(|_, s| f(s));
    }
}
