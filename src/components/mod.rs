//! Reusable view pieces: the mesh canvas, charts and navigation.

pub(crate) mod charts;
pub mod force_graph;
pub(crate) mod nav;
pub(crate) mod timers;
