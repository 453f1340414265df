//! Application layer: affinity scoring, ranking, search, resolution and the toggle command.

pub mod affinity;
pub mod rank;
pub mod resolve;
pub mod search;
pub mod toggle;
