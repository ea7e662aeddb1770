//! Built-in front ends

pub mod snapshot;
