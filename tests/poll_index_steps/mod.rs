//! Step definitions for the published poll listing scenarios.

pub mod given;
pub mod when;
pub mod world;
