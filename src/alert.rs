pub mod classify;
pub mod job;
pub mod partition;
pub mod render;
pub mod tally;
