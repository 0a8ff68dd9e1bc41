use super::level::*;
use super::level::NodeKind::*;

/// A two-train level. The express needs the junction switched before it
/// gets there; the default position sends it down a spur and back over a
/// bridge that only holds once.
pub fn demo_level() -> LevelDescriptor {
    LevelDescriptor {
        id: "Junction".to_string(),
        planning_time: 3.0,
        nodes: vec![
            node("depot", (0.0, 0.0), Start),
            node("j", (4.0, -4.0), Generic),
            node("spur", (8.0, -8.0), Generic),
            node("north", (8.0, -4.0), Finish),
            node("yard", (0.0, -8.0), Start),
            node("south", (4.0, -8.0), Finish),
        ],
        edges: vec![
            EdgeDescriptor { one_time_use: true, ..edge("bridge", "depot", "j") },
            edge("j-spur", "j", "spur"),
            EdgeDescriptor { control_points: smallvec::smallvec![(7.0, -5.0)], ..edge("j-north", "j", "north") },
            edge("yard-south", "yard", "south"),
        ],
        switches: vec![switch("j", &["spur", "north"])],
        trains: vec![
            TrainDescriptor { color: Some("D94040".to_string()), ..train("express", "depot", Some("j"), 2.0) },
            TrainDescriptor { kind: TrainKind::Freight, ..train("freight", "yard", None, 1.0) },
        ],
        bonuses: vec![bonus("star", "j-north", 0.5, 2)],
        ..Default::default()
    }
}
