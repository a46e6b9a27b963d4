#![allow(dead_code)] // Each test binary uses a different subset of these helpers

pub mod builders;
pub mod recording_observer;
pub mod strategies;

pub use builders::*;
pub use recording_observer::*;
pub use strategies::*;
