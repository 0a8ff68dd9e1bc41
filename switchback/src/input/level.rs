use smallvec::SmallVec;

pub type GridPos = (f64, f64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Generic,
    Start,
    Finish,
}

impl Default for NodeKind {
    fn default() -> NodeKind { NodeKind::Generic }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrainKind {
    Passenger,
    Freight,
}

impl Default for TrainKind {
    fn default() -> TrainKind { TrainKind::Passenger }
}

#[derive(Clone, Debug, Default)]
pub struct NodeDescriptor {
    pub id: String,
    pub grid: GridPos,
    pub kind: NodeKind,
}

#[derive(Clone, Debug)]
pub struct EdgeDescriptor {
    pub id: String,
    pub from: String,
    pub to: String,
    pub length_multiplier: f64,
    /// Track breaks after the first train has crossed it.
    pub one_time_use: bool,
    /// Only traversable from `from` to `to`.
    pub one_way: bool,
    pub elevation: i32,
    /// Bezier control points in grid space. One gives a quadratic curve,
    /// two a cubic one.
    pub control_points: SmallVec<[GridPos; 2]>,
}

impl Default for EdgeDescriptor {
    fn default() -> EdgeDescriptor {
        EdgeDescriptor {
            id: String::new(),
            from: String::new(),
            to: String::new(),
            length_multiplier: 1.0,
            one_time_use: false,
            one_way: false,
            elevation: 0,
            control_points: SmallVec::new(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SwitchDescriptor {
    pub node: String,
    pub cycle: Vec<String>,
    pub initial_index: usize,
}

#[derive(Clone, Debug)]
pub struct TrainDescriptor {
    pub id: String,
    pub kind: TrainKind,
    pub start: String,
    pub initial_next: Option<String>,
    pub speed: f64,
    /// Hex color such as `FF5500`, passed through for presentation.
    pub color: Option<String>,
}

impl Default for TrainDescriptor {
    fn default() -> TrainDescriptor {
        TrainDescriptor {
            id: "Train".to_string(),
            kind: TrainKind::Passenger,
            start: String::new(),
            initial_next: None,
            speed: 2.0,
            color: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BonusDescriptor {
    pub id: String,
    pub edge: String,
    pub position: f64,
    pub stars: u32,
}

impl Default for BonusDescriptor {
    fn default() -> BonusDescriptor {
        BonusDescriptor {
            id: String::new(),
            edge: String::new(),
            position: 0.5,
            stars: 1,
        }
    }
}

/// Everything needed to build one playable level.
#[derive(Clone, Debug)]
pub struct LevelDescriptor {
    pub id: String,
    pub planning_time: f64,
    pub simulation_speed: f64,
    pub goal: Option<String>,
    pub nodes: Vec<NodeDescriptor>,
    pub edges: Vec<EdgeDescriptor>,
    pub switches: Vec<SwitchDescriptor>,
    pub trains: Vec<TrainDescriptor>,
    pub bonuses: Vec<BonusDescriptor>,
}

impl Default for LevelDescriptor {
    fn default() -> LevelDescriptor {
        LevelDescriptor {
            id: "Level".to_string(),
            planning_time: 10.0,
            simulation_speed: 1.0,
            goal: None,
            nodes: vec![],
            edges: vec![],
            switches: vec![],
            trains: vec![],
            bonuses: vec![],
        }
    }
}

// Shorthands for building descriptors in code.

pub fn node(id: &str, grid: GridPos, kind: NodeKind) -> NodeDescriptor {
    NodeDescriptor { id: id.to_string(), grid, kind }
}

pub fn edge(id: &str, from: &str, to: &str) -> EdgeDescriptor {
    EdgeDescriptor {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        ..Default::default()
    }
}

pub fn switch(node: &str, cycle: &[&str]) -> SwitchDescriptor {
    SwitchDescriptor {
        node: node.to_string(),
        cycle: cycle.iter().map(|s| s.to_string()).collect(),
        initial_index: 0,
    }
}

pub fn train(id: &str, start: &str, next: Option<&str>, speed: f64) -> TrainDescriptor {
    TrainDescriptor {
        id: id.to_string(),
        start: start.to_string(),
        initial_next: next.map(|s| s.to_string()),
        speed,
        ..Default::default()
    }
}

pub fn bonus(id: &str, edge: &str, position: f64, stars: u32) -> BonusDescriptor {
    BonusDescriptor {
        id: id.to_string(),
        edge: edge.to_string(),
        position,
        stars,
    }
}
