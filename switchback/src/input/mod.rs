//! Level descriptor data, as handed over by whatever loads levels.

pub mod level;
pub mod demo;
