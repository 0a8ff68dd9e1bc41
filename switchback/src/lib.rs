#[macro_use] extern crate failure_derive;

pub mod input;
pub mod railway;
pub mod simulation;
pub mod output;
pub mod session;

pub use simulation::{SimConfig, Simulation};
pub use session::{LossReason, Phase, Session, SessionConfig};
pub use output::events::SimEvent;

pub type AppResult<T> = Result<T, failure::Error>;
