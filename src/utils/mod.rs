//! Small pure helpers: feed-timestamp parsing, wei formatting.

pub mod date;
pub mod ether;
