//! Small text helpers shared by the overtime operations.

pub mod duration;
