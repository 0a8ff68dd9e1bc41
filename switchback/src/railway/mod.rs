//! Rail network model and the per-entity runtime state built on it.

pub mod geometry;
pub mod network;
pub mod switch;
pub mod train;
pub mod bonus;

pub type NodeIdx = usize;
pub type EdgeIdx = usize;
pub type TrainIdx = usize;
pub type BonusIdx = usize;

/// Problems found while building a level from descriptors.
/// None of them are fatal: the offending item is left out.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum BuildError {
    #[fail(display = "edge {} references missing node {}", edge, node)]
    MissingEdgeEndpoint { edge: String, node: String },
    #[fail(display = "switch references missing node {}", node)]
    MissingSwitchNode { node: String },
    #[fail(display = "train {} references missing start node {}", train, node)]
    MissingStartNode { train: String, node: String },
    #[fail(display = "train {} has no neighbor to depart to from node {}", train, node)]
    NoDeparture { train: String, node: String },
    #[fail(display = "train {} cannot find an edge from {} to {}", train, from, to)]
    NoDepartureEdge { train: String, from: String, to: String },
    #[fail(display = "bonus {} references missing edge {}", bonus, edge)]
    MissingBonusEdge { bonus: String, edge: String },
}
